//! Whole-image access to the 256-byte cartridge EEPROM.
//!
//! Single reads or writes over the cartridge contacts are not trustworthy:
//! bits flip and bytes get dropped. Everything above the raw passes works on
//! complete images only: `read_consistent` repeats full reads until enough of
//! them agree, `write_verified` rewrites the full image until a consistent
//! read-back matches.

mod consensus;
mod error;
mod progress;
mod reset;
mod verify;

use std::fmt;
use std::ops::Deref;
use std::time::Duration;

use crate::i2c::SmbusDevice;

pub use self::error::{
	ConsistencyError,
	IdentifierMismatch,
	VerificationError,
};

pub use self::progress::{
	DotProgress,
	LogProgress,
	Progress,
};

pub use self::reset::{
	COUNTER_LEN,
	COUNTER_OFFSETS,
	SIGNATURE,
	check_signature,
	has_signature,
	zero_counters,
};

pub const EEPROM_SIZE: usize = 0x100;

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Image([u8; EEPROM_SIZE]);

impl Image {
	pub fn new(bytes: [u8; EEPROM_SIZE]) -> Self {
		Image(bytes)
	}

	pub fn from_slice(data: &[u8]) -> crate::AResult<Self> {
		ensure!(data.len() == EEPROM_SIZE, "invalid image size: {} bytes (expected {})", data.len(), EEPROM_SIZE);
		let mut bytes = [0u8; EEPROM_SIZE];
		bytes.copy_from_slice(data);
		Ok(Image(bytes))
	}

	pub fn as_bytes(&self) -> &[u8; EEPROM_SIZE] {
		&self.0
	}

	pub fn into_bytes(self) -> [u8; EEPROM_SIZE] {
		self.0
	}

	/// addresses at which `self` and `other` differ
	pub fn differences<'a>(&'a self, other: &'a Image) -> impl Iterator<Item = usize> + 'a {
		self.0.iter().zip(other.0.iter()).enumerate().filter(|(_, (a, b))| a != b).map(|(address, _)| address)
	}
}

impl Deref for Image {
	type Target = [u8];

	fn deref(&self) -> &Self::Target {
		&self.0[..]
	}
}

impl fmt::Debug for Image {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "Image(")?;
		for (i, b) in self.0.iter().enumerate() {
			if 0 != i && 0 == i % 16 {
				write!(f, " |")?;
			}
			write!(f, " {:02x}", b)?;
		}
		write!(f, " )")
	}
}

/// Pass and retry budgets; the defaults match the timing of the cartridge
/// chips and shouldn't be changed without testing on real hardware.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Tuning {
	/// full read passes per consistent read
	pub max_passes: usize,
	/// identical passes needed to accept a read
	pub quorum: usize,
	/// full write + verify attempts
	pub max_retries: usize,
	/// delay after each written byte (internal program cycle)
	pub settle: Duration,
}

pub const DEFAULT_MAX_PASSES: usize = 10;
pub const DEFAULT_QUORUM: usize = 3;
pub const DEFAULT_MAX_RETRIES: usize = 3;
pub const DEFAULT_SETTLE: Duration = Duration::from_millis(5);

impl Default for Tuning {
	fn default() -> Self {
		Tuning {
			max_passes: DEFAULT_MAX_PASSES,
			quorum: DEFAULT_QUORUM,
			max_retries: DEFAULT_MAX_RETRIES,
			settle: DEFAULT_SETTLE,
		}
	}
}

impl Tuning {
	/// Reject budgets that void the consensus/verify guarantees.
	pub fn validate(&self) -> crate::AResult<()> {
		ensure!(self.quorum >= 1, "invalid tuning: quorum must be at least 1");
		ensure!(self.quorum <= self.max_passes,
			"invalid tuning: quorum {} can't be reached in {} passes", self.quorum, self.max_passes
		);
		ensure!(self.max_retries >= 1, "invalid tuning: need at least one write attempt");
		Ok(())
	}
}

pub struct Eeprom<B: SmbusDevice> {
	bus: B,
	tuning: Tuning,
	progress: Box<dyn Progress>,
}

impl<B: SmbusDevice> Eeprom<B> {
	pub fn new(bus: B, tuning: Tuning) -> crate::AResult<Self> {
		tuning.validate()?;
		Ok(Eeprom {
			bus,
			tuning,
			progress: Box::new(LogProgress),
		})
	}

	pub fn set_progress(&mut self, progress: Box<dyn Progress>) {
		self.progress = progress;
	}

	pub fn bus(&self) -> &B {
		&self.bus
	}

	pub fn into_bus(self) -> B {
		self.bus
	}

	/// One pass over the device, in increasing address order.
	pub fn read_raw(&mut self) -> crate::AResult<Image> {
		let mut bytes = [0u8; EEPROM_SIZE];
		for address in 0..EEPROM_SIZE {
			bytes[address] = self.bus.read_byte(address as u8)?;
		}
		Ok(Image(bytes))
	}

	/// One unverified pass writing `image`, in increasing address order.
	///
	/// Waits `tuning.settle` after every byte; the chip silently drops or
	/// NACKs writes during its program cycle.
	pub fn write_raw(&mut self, image: &Image) -> crate::AResult<()> {
		for address in 0..EEPROM_SIZE {
			self.bus.write_byte(address as u8, image.0[address])?;
			self.progress.byte_written(address);
			self.bus.settle(self.tuning.settle);
		}
		self.progress.write_finished();
		Ok(())
	}
}
