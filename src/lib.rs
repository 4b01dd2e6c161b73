#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

macro_rules! with_context {
	(( $fmt:tt $($t:tt)* ), $e:expr) => {{
		use failure::Error;

		match (|| { $e })() {
			Ok(v) => Ok(v),
			Err(e) => {
				let e: Error = e;
				let msg = format!(concat!($fmt, ": {}") $($t)*, e);
				Err(Error::from(e.context(msg)))
			}
		}
	}};

	($msg:expr, $e:expr) => {
		with_context!(("{}", $msg), $e)
	};
}

pub type AResult<T> = Result<T, failure::Error>;

pub mod eeprom;
pub mod i2c;
pub mod image;
pub mod wiring;

/// Open the bus for the duration of `f` only; the device handle is closed on
/// every exit path.
pub fn with_eeprom<F, R>(bus: i2c::BusId, address: i2c::DeviceAddress, tuning: eeprom::Tuning, f: F) -> AResult<R>
where
	F: FnOnce(&mut eeprom::Eeprom<i2c::I2cDevice>) -> AResult<R>,
{
	tuning.validate()?;
	let device = with_context!(("couldn't open i2c device {} on bus {}", address, bus),
		Ok(i2c::open_device(bus, address)?)
	)?;
	let mut eeprom = eeprom::Eeprom::new(device, tuning)?;
	f(&mut eeprom)
}
