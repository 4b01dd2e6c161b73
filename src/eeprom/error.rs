use std::ascii;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Fail)]
#[fail(display = "no consistent read after {} passes", passes)]
pub struct ConsistencyError {
	pub passes: usize,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Fail)]
#[fail(display = "verification failed after {} attempts", attempts)]
pub struct VerificationError {
	pub attempts: usize,
}

/// The image doesn't start with the expected device identifier; nothing was
/// written.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IdentifierMismatch {
	pub expected: Vec<u8>,
	pub found: Vec<u8>,
}

fn escaped(data: &[u8]) -> String {
	data.iter().flat_map(|b| ascii::escape_default(*b)).map(char::from).collect()
}

impl fmt::Display for IdentifierMismatch {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(f, "unexpected device identifier \"{}\" (expected \"{}\")", escaped(&self.found), escaped(&self.expected))
	}
}

impl failure::Fail for IdentifierMismatch {}
