use std::fmt;

use super::{
	Eeprom,
	IdentifierMismatch,
	Image,
};
use crate::i2c::SmbusDevice;

/// Every supported cartridge image starts with this
pub const SIGNATURE: &[u8] = b"SAMSUNG";

/// Offsets of the two page counter fields
pub const COUNTER_OFFSETS: [usize; 2] = [0x88, 0x90];
pub const COUNTER_LEN: usize = 4;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
enum ResetState {
	Idle,
	Reading,
	Aborted,
	Patching,
	Writing,
	Verified,
	Failed,
}

impl fmt::Display for ResetState {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		let name = match self {
			ResetState::Idle => "idle",
			ResetState::Reading => "reading",
			ResetState::Aborted => "aborted",
			ResetState::Patching => "patching",
			ResetState::Writing => "writing",
			ResetState::Verified => "verified",
			ResetState::Failed => "failed",
		};
		write!(f, "{}", name)
	}
}

pub fn has_signature(image: &Image) -> bool {
	image.starts_with(SIGNATURE)
}

// only a prefix check; variant layouts have differing data after it
pub fn check_signature(image: &Image) -> Result<(), IdentifierMismatch> {
	if has_signature(image) {
		return Ok(());
	}
	Err(IdentifierMismatch {
		expected: SIGNATURE.to_vec(),
		found: image[..SIGNATURE.len()].to_vec(),
	})
}

/// Copy of `image` with both counter fields zeroed; the rest is unchanged.
pub fn zero_counters(image: &Image) -> Image {
	let mut bytes = image.into_bytes();
	for &offset in COUNTER_OFFSETS.iter() {
		for b in &mut bytes[offset..offset + COUNTER_LEN] {
			*b = 0;
		}
	}
	Image::new(bytes)
}

fn counter_fields(image: &Image) -> String {
	let mut fields = Vec::new();
	for &offset in COUNTER_OFFSETS.iter() {
		let hex: Vec<String> = image[offset..offset + COUNTER_LEN].iter().map(|b| format!("{:02x}", b)).collect();
		fields.push(format!("@{:02x}: {}", offset, hex.join(" ")));
	}
	fields.join(", ")
}

fn enter(state: &mut ResetState, next: ResetState) {
	debug!("counter reset: {} -> {}", state, next);
	*state = next;
}

impl<B: SmbusDevice> Eeprom<B> {
	/// Zero the toner page counters.
	///
	/// Aborts with `IdentifierMismatch` before any write if the image doesn't
	/// carry the expected signature. Returns the number of write attempts.
	pub fn reset_counter(&mut self) -> crate::AResult<usize> {
		let mut state = ResetState::Idle;

		enter(&mut state, ResetState::Reading);
		let current = self.read_consistent()?;

		if let Err(mismatch) = check_signature(&current) {
			enter(&mut state, ResetState::Aborted);
			warn!("not resetting counter: {}", mismatch);
			return Err(mismatch.into());
		}

		enter(&mut state, ResetState::Patching);
		info!("page counter fields before reset: {}", counter_fields(&current));
		let patched = zero_counters(&current);

		enter(&mut state, ResetState::Writing);
		match self.write_verified(&patched) {
			Ok(attempts) => {
				enter(&mut state, ResetState::Verified);
				Ok(attempts)
			},
			Err(e) => {
				enter(&mut state, ResetState::Failed);
				Err(e)
			},
		}
	}
}
