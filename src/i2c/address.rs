use std::fmt;
use std::path::PathBuf;
use std::str;

pub const MIN_DEVICE_ADDRESS: u8 = 0x03;
pub const MAX_DEVICE_ADDRESS: u8 = 0x77;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct BusId(pub u32);

impl BusId {
	pub fn device_path(&self) -> PathBuf {
		PathBuf::from(format!("/dev/i2c-{}", self.0))
	}
}

impl fmt::Display for BusId {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl str::FromStr for BusId {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let bus = with_context!(("invalid i2c bus: {:?}", s),
			Ok(s.parse::<u32>()?)
		)?;
		Ok(BusId(bus))
	}
}

/// 7-bit device address, restricted to the non-reserved range
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct DeviceAddress(u8);

impl DeviceAddress {
	pub fn new(address: u8) -> crate::AResult<Self> {
		ensure!(address >= MIN_DEVICE_ADDRESS && address <= MAX_DEVICE_ADDRESS,
			"invalid i2c address 0x{:02x} (must be between 0x{:02x} and 0x{:02x})", address, MIN_DEVICE_ADDRESS, MAX_DEVICE_ADDRESS
		);
		Ok(DeviceAddress(address))
	}

	pub fn get(&self) -> u8 {
		self.0
	}
}

impl fmt::Display for DeviceAddress {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "0x{:02x}", self.0)
	}
}

// prefix selects the radix: 0x.. hex, 0o.. octal, 0b.. binary, otherwise decimal
fn parse_with_radix(s: &str) -> Option<u32> {
	let lower = s.to_ascii_lowercase();
	let (digits, radix) = if lower.starts_with("0x") {
		(&lower[2..], 16)
	} else if lower.starts_with("0o") {
		(&lower[2..], 8)
	} else if lower.starts_with("0b") {
		(&lower[2..], 2)
	} else {
		(&lower[..], 10)
	};
	if digits.is_empty() || digits.starts_with('+') || digits.starts_with('-') {
		return None;
	}
	u32::from_str_radix(digits, radix).ok()
}

impl str::FromStr for DeviceAddress {
	type Err = ::failure::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let value = match parse_with_radix(s.trim()) {
			Some(v) => v,
			None => bail!("invalid number {:?} for i2c address", s),
		};
		ensure!(value >= MIN_DEVICE_ADDRESS as u32 && value <= MAX_DEVICE_ADDRESS as u32,
			"invalid number {:?} for i2c address (must be between 0x{:02x} and 0x{:02x})", s, MIN_DEVICE_ADDRESS, MAX_DEVICE_ADDRESS
		);
		Ok(DeviceAddress(value as u8))
	}
}
