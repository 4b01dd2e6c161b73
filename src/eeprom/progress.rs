use std::io::{
	self,
	Write,
};

/// Receives progress of long running operations.
///
/// Implementations must not block for long and can't fail the operation.
pub trait Progress {
	fn pass(&mut self, pass: usize, max_passes: usize) {
		let _ = (pass, max_passes);
	}

	fn write_attempt(&mut self, attempt: usize, max_attempts: usize) {
		let _ = (attempt, max_attempts);
	}

	fn byte_written(&mut self, address: usize) {
		let _ = address;
	}

	fn write_finished(&mut self) {}
}

pub struct LogProgress;

impl Progress for LogProgress {
	fn pass(&mut self, pass: usize, max_passes: usize) {
		debug!("read pass {}/{}", pass, max_passes);
	}

	fn write_attempt(&mut self, attempt: usize, max_attempts: usize) {
		info!("writing EEPROM (attempt {}/{})", attempt, max_attempts);
	}

	fn byte_written(&mut self, address: usize) {
		trace!("wrote byte 0x{:02x}", address);
	}

	fn write_finished(&mut self) {
		debug!("write pass finished");
	}
}

/// Like `LogProgress`, but also draws one `.` per written byte on stderr.
pub struct DotProgress {
	log: LogProgress,
}

impl DotProgress {
	pub fn new() -> Self {
		DotProgress { log: LogProgress }
	}
}

impl Default for DotProgress {
	fn default() -> Self {
		DotProgress::new()
	}
}

impl Progress for DotProgress {
	fn pass(&mut self, pass: usize, max_passes: usize) {
		self.log.pass(pass, max_passes);
	}

	fn write_attempt(&mut self, attempt: usize, max_attempts: usize) {
		self.log.write_attempt(attempt, max_attempts);
	}

	fn byte_written(&mut self, address: usize) {
		let mut stderr = io::stderr();
		let _ = stderr.write_all(b".");
		let _ = stderr.flush();
		self.log.byte_written(address);
	}

	fn write_finished(&mut self) {
		let _ = io::stderr().write_all(b" ok\n");
		self.log.write_finished();
	}
}
