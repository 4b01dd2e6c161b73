use std::io;
use std::time::Duration;

use crate::eeprom::EEPROM_SIZE;
use crate::i2c::{
	BusError,
	BusId,
	DeviceAddress,
	SmbusDevice,
	Transfer,
};

type ReadNoise = Box<dyn FnMut(usize, usize, u8) -> u8>;
type WriteSticks = Box<dyn FnMut(usize) -> bool>;

/// Simulated EEPROM; passes are counted in units of `EEPROM_SIZE` transactions.
pub struct MockBus {
	pub memory: [u8; EEPROM_SIZE],
	pub reads: usize,
	pub writes: usize,
	pub settles: Vec<Duration>,
	/// fail the read of this register with an I/O error
	pub fail_read_at: Option<u8>,
	// (pass, address, stored value) -> value seen by the reader
	read_noise: ReadNoise,
	// write pass -> whether the bytes of this pass reach the memory
	write_sticks: WriteSticks,
}

impl MockBus {
	pub fn new(memory: [u8; EEPROM_SIZE]) -> Self {
		MockBus {
			memory,
			reads: 0,
			writes: 0,
			settles: Vec::new(),
			fail_read_at: None,
			read_noise: Box::new(|_, _, value| value),
			write_sticks: Box::new(|_| true),
		}
	}

	pub fn with_read_noise<F>(mut self, noise: F) -> Self
	where
		F: FnMut(usize, usize, u8) -> u8 + 'static,
	{
		self.read_noise = Box::new(noise);
		self
	}

	pub fn with_write_sticks<F>(mut self, sticks: F) -> Self
	where
		F: FnMut(usize) -> bool + 'static,
	{
		self.write_sticks = Box::new(sticks);
		self
	}

	pub fn read_passes(&self) -> usize {
		self.reads / EEPROM_SIZE
	}

	pub fn write_passes(&self) -> usize {
		self.writes / EEPROM_SIZE
	}
}

impl SmbusDevice for MockBus {
	fn read_byte(&mut self, register: u8) -> crate::AResult<u8> {
		if self.fail_read_at == Some(register) {
			return Err(BusError {
				bus: BusId(1),
				address: DeviceAddress::new(0x56)?,
				transfer: Transfer::Read,
				register,
				cause: io::Error::new(io::ErrorKind::Other, "simulated NACK"),
			}.into());
		}
		let pass = self.reads / EEPROM_SIZE;
		self.reads += 1;
		let address = register as usize;
		Ok((self.read_noise)(pass, address, self.memory[address]))
	}

	fn write_byte(&mut self, register: u8, data: u8) -> crate::AResult<()> {
		let pass = self.writes / EEPROM_SIZE;
		self.writes += 1;
		if (self.write_sticks)(pass) {
			self.memory[register as usize] = data;
		}
		Ok(())
	}

	fn settle(&mut self, duration: Duration) {
		self.settles.push(duration);
	}
}
