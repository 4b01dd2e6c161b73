mod file;
mod hexdump;

pub use self::file::{
	load_bytes,
	save_bytes,
};

pub use self::hexdump::{
	hexdump,
	hexline,
};
