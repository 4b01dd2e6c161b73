use super::{
	ConsistencyError,
	Eeprom,
	Image,
	VerificationError,
};
use crate::i2c::SmbusDevice;

impl<B: SmbusDevice> Eeprom<B> {
	/// Write `image` and confirm it with a consistent read-back.
	///
	/// On a mismatch (or a read-back without consensus) the complete image is
	/// written again, up to `max_retries` times in total; there is no way to
	/// tell which bytes didn't make it. Returns the number of attempts used.
	pub fn write_verified(&mut self, image: &Image) -> crate::AResult<usize> {
		let max_attempts = self.tuning.max_retries;

		for attempt in 1..=max_attempts {
			self.progress.write_attempt(attempt, max_attempts);
			self.write_raw(image)?;

			let readback = match self.read_consistent() {
				Ok(readback) => readback,
				Err(e) => {
					if e.downcast_ref::<ConsistencyError>().is_none() {
						return Err(e);
					}
					warn!("attempt {}/{}: couldn't verify written image: {}", attempt, max_attempts, e);
					continue;
				}
			};

			if readback == *image {
				info!("image verified after {} write attempt(s)", attempt);
				return Ok(attempt);
			}

			let mut differences = readback.differences(image);
			if let Some(first) = differences.next() {
				warn!("attempt {}/{}: verify failed at {} byte(s), first at 0x{:02x}: expected 0x{:02x}, read 0x{:02x}",
					attempt, max_attempts, 1 + differences.count(), first, image[first], readback[first]
				);
			}
		}

		Err(VerificationError { attempts: max_attempts }.into())
	}
}
