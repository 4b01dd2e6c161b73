use std::fs;
use std::io;
use std::os::unix::io::AsRawFd;
use std::ptr;

use libc::{
	c_ulong,
	ioctl,
};

use crate::i2c::{
	BusError,
	BusId,
	DeviceAddress,
	SmbusDevice,
	Transfer,
};

/* from <linux/i2c-dev.h> and <linux/i2c.h> */
const I2C_SLAVE: libc::Ioctl = 0x0703;
const I2C_SMBUS: libc::Ioctl = 0x0720;

const I2C_SMBUS_WRITE: u8 = 0;
const I2C_SMBUS_READ: u8 = 1;

const I2C_SMBUS_BYTE: u32 = 1;
const I2C_SMBUS_BYTE_DATA: u32 = 2;

const I2C_SMBUS_BLOCK_MAX: usize = 32;

#[repr(C)]
union SmbusData {
	byte: u8,
	// the kernel may copy the whole union
	_block: [u8; I2C_SMBUS_BLOCK_MAX + 2],
}

#[repr(C)]
struct SmbusIoctlData {
	read_write: u8,
	command: u8,
	size: u32,
	data: *mut SmbusData,
}

#[derive(Debug)]
pub struct I2cDevice {
	file: fs::File,
	bus: BusId,
	address: DeviceAddress,
}

impl I2cDevice {
	fn smbus_access(&mut self, read_write: u8, command: u8, size: u32, data: *mut SmbusData) -> io::Result<()> {
		let mut args = SmbusIoctlData {
			read_write,
			command,
			size,
			data,
		};
		let res = unsafe { ioctl(self.file.as_raw_fd(), I2C_SMBUS, &mut args as *mut SmbusIoctlData) };
		if -1 == res {
			return Err(io::Error::last_os_error());
		}
		Ok(())
	}

	// "send byte": a write without data, only the command byte
	fn smbus_send_byte(&mut self, value: u8) -> io::Result<()> {
		self.smbus_access(I2C_SMBUS_WRITE, value, I2C_SMBUS_BYTE, ptr::null_mut())
	}

	fn smbus_receive_byte(&mut self) -> io::Result<u8> {
		let mut data = SmbusData { _block: [0u8; I2C_SMBUS_BLOCK_MAX + 2] };
		self.smbus_access(I2C_SMBUS_READ, 0, I2C_SMBUS_BYTE, &mut data)?;
		Ok(unsafe { data.byte })
	}

	fn smbus_write_byte_data(&mut self, command: u8, value: u8) -> io::Result<()> {
		let mut data = SmbusData { byte: value };
		self.smbus_access(I2C_SMBUS_WRITE, command, I2C_SMBUS_BYTE_DATA, &mut data)
	}

	fn bus_error(&self, transfer: Transfer, register: u8, cause: io::Error) -> failure::Error {
		BusError {
			bus: self.bus,
			address: self.address,
			transfer,
			register,
			cause,
		}.into()
	}
}

impl SmbusDevice for I2cDevice {
	fn read_byte(&mut self, register: u8) -> crate::AResult<u8> {
		let res = match self.smbus_send_byte(register) {
			Ok(()) => self.smbus_receive_byte(),
			Err(e) => Err(e),
		};
		res.map_err(|e| self.bus_error(Transfer::Read, register, e))
	}

	fn write_byte(&mut self, register: u8, data: u8) -> crate::AResult<()> {
		self.smbus_write_byte_data(register, data)
			.map_err(|e| self.bus_error(Transfer::Write, register, e))
	}
}

// TODO: flock() the device node so a second instance cannot interleave transactions
pub fn inner_open(bus: BusId, address: DeviceAddress) -> io::Result<I2cDevice> {
	let file = fs::OpenOptions::new()
		.read(true)
		.write(true)
		.open(bus.device_path())?;

	let res = unsafe { ioctl(file.as_raw_fd(), I2C_SLAVE, address.get() as c_ulong) };
	if -1 == res {
		return Err(io::Error::last_os_error());
	}
	debug!("i2c bus {}: opened device {}", bus, address);

	Ok(I2cDevice {
		file,
		bus,
		address,
	})
}
