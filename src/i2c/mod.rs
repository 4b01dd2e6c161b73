//! Byte access to a single device on an SMBus-style two-wire bus.
//!
//! A read of register `r` first sends `r` as a single byte (which moves the
//! EEPROM's address pointer) and then receives one byte; a write uses the
//! "write byte data" transaction. The device address is fixed when the
//! handle is opened.

mod address;
mod linux;
#[cfg(test)]
pub(crate) mod mock;

use std::fmt;
use std::io;
use std::thread;
use std::time::{
	Duration,
	Instant,
};

pub use self::address::{
	BusId,
	DeviceAddress,
	MAX_DEVICE_ADDRESS,
	MIN_DEVICE_ADDRESS,
};

// OS-specific. for now linux only.
pub use self::linux::{
	I2cDevice,
	open_device,
};

pub fn reliable_sleep(mut duration: Duration) {
	loop {
		let now = Instant::now();
		thread::sleep(duration);
		let elapsed = now.elapsed();
		if elapsed >= duration {
			return;
		}
		duration -= elapsed;
	}
}

pub trait SmbusDevice {
	fn read_byte(&mut self, register: u8) -> crate::AResult<u8>;
	fn write_byte(&mut self, register: u8, data: u8) -> crate::AResult<()>;

	// block for (at least) `duration`, e.g. while the device programs a byte
	fn settle(&mut self, duration: Duration) {
		reliable_sleep(duration);
	}
}

impl<'a, D: ?Sized + SmbusDevice> SmbusDevice for &'a mut D {
	fn read_byte(&mut self, register: u8) -> crate::AResult<u8> {
		D::read_byte(*self, register)
	}
	fn write_byte(&mut self, register: u8, data: u8) -> crate::AResult<()> {
		D::write_byte(*self, register, data)
	}
	fn settle(&mut self, duration: Duration) {
		D::settle(*self, duration)
	}
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Transfer {
	Read,
	Write,
}

impl fmt::Display for Transfer {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		match self {
			Transfer::Read => write!(f, "read"),
			Transfer::Write => write!(f, "write"),
		}
	}
}

/// A single bus transaction failed; these are never retried.
#[derive(Debug, Fail)]
#[fail(display = "i2c bus {}: {} of register 0x{:02x} on device {} failed: {}", bus, transfer, register, address, cause)]
pub struct BusError {
	pub bus: BusId,
	pub address: DeviceAddress,
	pub transfer: Transfer,
	pub register: u8,
	#[fail(cause)]
	pub cause: io::Error,
}
