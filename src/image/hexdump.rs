use std::fmt::Write;

const LINE_BYTES: usize = 16;
const GROUP_BYTES: usize = 8;

fn printable(b: u8) -> char {
	if b == b' ' || b.is_ascii_graphic() {
		b as char
	} else {
		'.'
	}
}

/// Format up to 16 bytes as
/// `00000010  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f  |................|`
pub fn hexline(offset: usize, block: &[u8]) -> String {
	assert!(block.len() <= LINE_BYTES);

	let mut line = format!("{:08x} ", offset);
	for i in 0..LINE_BYTES {
		if 0 == i % GROUP_BYTES {
			line.push(' ');
		}
		match block.get(i) {
			Some(b) => { let _ = write!(line, "{:02x} ", b); },
			None => line.push_str("   "),
		}
	}
	line.push_str(" |");
	line.extend(block.iter().map(|b| printable(*b)));
	line.push('|');
	line
}

pub fn hexdump(data: &[u8]) -> String {
	let mut out = String::new();
	for (i, block) in data.chunks(LINE_BYTES).enumerate() {
		out.push_str(&hexline(i * LINE_BYTES, block));
		out.push('\n');
	}
	out
}
