use std::fs;
use std::path::Path;

use crate::eeprom::Image;

/// Load a raw dump; offset in the file is the EEPROM address.
pub fn load_bytes<P: AsRef<Path>>(path: P) -> crate::AResult<Image> {
	let path = path.as_ref();
	with_context!(("couldn't load image from {}", path.display()), {
		let data = fs::read(path)?;
		Image::from_slice(&data)
	})
}

pub fn save_bytes<P: AsRef<Path>>(path: P, image: &Image) -> crate::AResult<()> {
	let path = path.as_ref();
	with_context!(("couldn't save image to {}", path.display()), {
		fs::write(path, image.as_bytes())?;
		Ok(())
	})
}
