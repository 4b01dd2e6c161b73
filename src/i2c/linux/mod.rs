use std::io;

mod dev;

pub use self::dev::I2cDevice;

use crate::i2c::{
	BusId,
	DeviceAddress,
};

pub fn open_device(bus: BusId, address: DeviceAddress) -> io::Result<I2cDevice> {
	dev::inner_open(bus, address)
}
