use super::{
	ConsistencyError,
	Eeprom,
	Image,
};
use crate::i2c::SmbusDevice;

impl<B: SmbusDevice> Eeprom<B> {
	/// Read the full device until `quorum` passes returned the same image.
	///
	/// Stops after `max_passes` passes with a `ConsistencyError`. Bus errors
	/// abort immediately. Three identical garbage reads are unlikely but not
	/// impossible; this is a heuristic.
	pub fn read_consistent(&mut self) -> crate::AResult<Image> {
		let max_passes = self.tuning.max_passes;
		let quorum = self.tuning.quorum;
		let mut attempts: Vec<Image> = Vec::with_capacity(max_passes);

		for pass in 1..=max_passes {
			self.progress.pass(pass, max_passes);
			let image = self.read_raw()?;
			attempts.push(image);

			let matching = attempts.iter().filter(|a| **a == image).count();
			if matching >= quorum {
				debug!("consistent read after {} passes ({} matching)", pass, matching);
				return Ok(image);
			}
		}

		warn!("no {} matching reads in {} passes", quorum, max_passes);
		Err(ConsistencyError { passes: max_passes }.into())
	}
}

#[cfg(test)]
mod test {
	use std::cell::RefCell;
	use std::rc::Rc;

	use crate::eeprom::{
		ConsistencyError,
		EEPROM_SIZE,
		Eeprom,
		Progress,
		Tuning,
		test::pattern,
	};
	use crate::i2c::mock::MockBus;

	struct CountPasses(Rc<RefCell<Vec<(usize, usize)>>>);

	impl Progress for CountPasses {
		fn pass(&mut self, pass: usize, max_passes: usize) {
			self.0.borrow_mut().push((pass, max_passes));
		}
	}

	#[test]
	fn clean_bus_needs_exactly_quorum_passes() {
		let mut eeprom = Eeprom::new(MockBus::new(pattern()), Tuning::default()).unwrap();
		let image = eeprom.read_consistent().unwrap();
		assert_eq!(image.as_bytes(), &pattern());
		assert_eq!(eeprom.bus().read_passes(), 3);
		assert_eq!(eeprom.bus().reads, 3 * EEPROM_SIZE);
	}

	#[test]
	fn quorum_from_interleaved_garbage() {
		// passes 1, 3 and 5 are clean, every other pass differently corrupted
		let bus = MockBus::new(pattern()).with_read_noise(|pass, address, value| {
			if 0 == pass % 2 {
				value
			} else {
				value ^ (pass as u8) ^ (address as u8).rotate_left(pass as u32)
			}
		});
		let mut eeprom = Eeprom::new(bus, Tuning::default()).unwrap();
		let image = eeprom.read_consistent().unwrap();
		assert_eq!(image.as_bytes(), &pattern());
		assert_eq!(eeprom.bus().read_passes(), 5);
	}

	#[test]
	fn single_flipped_bit_breaks_agreement() {
		// one bit in one byte differs on every pass but the last three
		let bus = MockBus::new(pattern()).with_read_noise(|pass, address, value| {
			if pass < 4 && address == 0x90 {
				value ^ (1 << pass)
			} else {
				value
			}
		});
		let mut eeprom = Eeprom::new(bus, Tuning::default()).unwrap();
		let image = eeprom.read_consistent().unwrap();
		assert_eq!(image.as_bytes(), &pattern());
		assert_eq!(eeprom.bus().read_passes(), 7);
	}

	#[test]
	fn no_quorum_within_pass_budget() {
		let passes = Rc::new(RefCell::new(Vec::new()));
		let bus = MockBus::new(pattern()).with_read_noise(|pass, _, value| value ^ (pass as u8 + 1));
		let mut eeprom = Eeprom::new(bus, Tuning::default()).unwrap();
		eeprom.set_progress(Box::new(CountPasses(passes.clone())));

		let err = eeprom.read_consistent().unwrap_err();
		match err.downcast_ref::<ConsistencyError>() {
			Some(e) => assert_eq!(e.passes, 10),
			None => panic!("unexpected error: {}", err),
		}
		assert_eq!(err.to_string(), "no consistent read after 10 passes");
		assert_eq!(eeprom.bus().reads, 10 * EEPROM_SIZE);
		assert_eq!(*passes.borrow(), (1..=10).map(|p| (p, 10)).collect::<Vec<_>>());
	}

	#[test]
	fn configurable_budget() {
		let tuning = Tuning {
			max_passes: 4,
			quorum: 2,
			..Tuning::default()
		};
		// the clean image (passes 0 and 2) alternates with its inverse and reaches 2 first
		let bus = MockBus::new(pattern()).with_read_noise(|pass, _, value| if 1 == pass % 2 { !value } else { value });
		let mut eeprom = Eeprom::new(bus, tuning).unwrap();
		let image = eeprom.read_consistent().unwrap();
		assert_eq!(image.as_bytes(), &pattern());
		assert_eq!(eeprom.bus().read_passes(), 3);

		let bus = MockBus::new(pattern()).with_read_noise(|pass, _, value| value.wrapping_add(pass as u8));
		let mut eeprom = Eeprom::new(bus, tuning).unwrap();
		assert!(eeprom.read_consistent().is_err());
		assert_eq!(eeprom.bus().read_passes(), 4);
	}

	#[test]
	fn bus_error_is_not_retried() {
		let mut bus = MockBus::new(pattern());
		bus.fail_read_at = Some(0);
		let mut eeprom = Eeprom::new(bus, Tuning::default()).unwrap();
		let err = eeprom.read_consistent().unwrap_err();
		assert!(err.downcast_ref::<crate::i2c::BusError>().is_some());
		assert!(err.downcast_ref::<ConsistencyError>().is_none());
	}
}
