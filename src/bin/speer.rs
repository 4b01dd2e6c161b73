#[macro_use]
extern crate clap;
#[macro_use]
extern crate failure;
#[macro_use]
extern crate log;

extern crate speer;
use speer::*;

use std::process::exit;

use speer::eeprom::{
	DotProgress,
	IdentifierMismatch,
	Tuning,
};
use speer::i2c::{
	BusId,
	DeviceAddress,
};

const DEFAULT_BUS: &str = "1";
const DEFAULT_ADDRESS: &str = "0x56";

// exit code when the cartridge isn't recognized and nothing was written
const EXIT_IDENTIFIER_MISMATCH: i32 = 2;

fn get_param<T>(matches: &clap::ArgMatches, name: &str) -> AResult<T>
where
	T: std::str::FromStr,
	failure::Error: From<<T as std::str::FromStr>::Err>,
{
	let param = match matches.value_of(name) {
		Some(p) => p,
		None => bail!("missing parameter {}", name),
	};
	param.parse::<T>().map_err(|e| {
		let e = failure::Error::from(e);
		let msg = format!("invalid parameter {}: {}", name, e);
		e.context(msg).into()
	})
}

// only parsed for commands touching the bus, so `-w` works with any --addr
fn get_target(matches: &clap::ArgMatches) -> AResult<(BusId, DeviceAddress)> {
	let bus: BusId = get_param(matches, "bus")?;
	let address: DeviceAddress = get_param(matches, "addr")?;
	Ok((bus, address))
}

fn backup_and_dump(bus: BusId, address: DeviceAddress, backup: Option<&str>, dump: bool) -> AResult<()> {
	let current = with_eeprom(bus, address, Tuning::default(), |ee| ee.read_consistent())?;

	if dump {
		print!("{}", image::hexdump(&current));
	}
	if let Some(filename) = backup {
		info!("backing up EEPROM to file {}", filename);
		image::save_bytes(filename, &current)?;
	}

	Ok(())
}

fn restore(bus: BusId, address: DeviceAddress, filename: &str) -> AResult<()> {
	info!("restoring EEPROM from file {}", filename);
	// load before touching the bus: a broken file must not get written
	let target = image::load_bytes(filename)?;

	with_eeprom(bus, address, Tuning::default(), |ee| {
		ee.set_progress(Box::new(DotProgress::new()));
		ee.write_verified(&target)
	})?;

	Ok(())
}

fn reset_counter(bus: BusId, address: DeviceAddress) -> AResult<()> {
	info!("setting page counter to zero");
	let attempts = with_eeprom(bus, address, Tuning::default(), |ee| {
		ee.set_progress(Box::new(DotProgress::new()));
		ee.reset_counter()
	})?;
	info!("page counter reset ({} write attempt(s))", attempts);

	Ok(())
}

fn app() -> clap::App<'static, 'static> {
	clap_app!(@app (app_from_crate!())
		(@arg backup: -b +takes_value value_name("FILE") conflicts_with[restore zero wiring] "backup EEPROM to file")
		(@arg hexdump: -x conflicts_with[restore zero wiring] "output hex dump of EEPROM")
		(@arg restore: -r +takes_value value_name("FILE") conflicts_with[backup hexdump zero wiring] "restore EEPROM from file")
		(@arg zero: -z conflicts_with[backup hexdump restore wiring] "auto-zero page counter in EEPROM")
		(@arg wiring: -w "print wiring information")
		(@arg bus: --bus +takes_value value_name("BUS") default_value(DEFAULT_BUS) "i2c bus")
		(@arg addr: --addr +takes_value value_name("ADDR") default_value(DEFAULT_ADDRESS) "i2c address (0x03 to 0x77)")
	)
}

fn main_app() -> AResult<()> {
	let mut app = app();
	let matches = app.clone().get_matches();

	if matches.is_present("wiring") {
		println!("{}", wiring::WIRING);
		return Ok(());
	}

	let backup = matches.value_of("backup");
	let dump = matches.is_present("hexdump");
	let restore_file = matches.value_of("restore");
	let zero = matches.is_present("zero");

	if backup.is_none() && !dump && restore_file.is_none() && !zero {
		app.print_help()?;
		println!();
		return Ok(());
	}

	let (bus, address) = get_target(&matches)?;

	if let Some(filename) = restore_file {
		restore(bus, address, filename)
	} else if zero {
		reset_counter(bus, address)
	} else {
		backup_and_dump(bus, address, backup, dump)
	}
}

fn main() {
	env_logger::from_env(env_logger::Env::default().default_filter_or("info")).init();

	if let Err(e) = main_app() {
		if let Some(mismatch) = e.downcast_ref::<IdentifierMismatch>() {
			error!("Aborted, nothing was written: {}", mismatch);
			exit(EXIT_IDENTIFIER_MISMATCH);
		}
		error!("Error: {}", e);
		exit(1);
	}
}

#[cfg(test)]
mod test {
	use super::{
		app,
		get_target,
	};
	use speer::i2c::BusId;

	fn accepts(args: &[&str]) -> bool {
		let mut argv = vec!["speer"];
		argv.extend_from_slice(args);
		app().get_matches_from_safe(argv).is_ok()
	}

	fn target(args: &[&str]) -> speer::AResult<(BusId, u8)> {
		let mut argv = vec!["speer"];
		argv.extend_from_slice(args);
		let matches = app().get_matches_from_safe(argv)?;
		let (bus, address) = get_target(&matches)?;
		Ok((bus, address.get()))
	}

	#[test]
	fn conflicting_commands() {
		assert!(accepts(&["-b", "dump.bin", "-x"]));
		assert!(accepts(&["-r", "dump.bin"]));
		assert!(accepts(&["-z"]));
		assert!(accepts(&["-w"]));
		assert!(!accepts(&["-w", "-b", "dump.bin"]));
		assert!(!accepts(&["-x", "-r", "dump.bin"]));
		assert!(!accepts(&["-b", "a.bin", "-z"]));
		assert!(!accepts(&["-b", "a.bin", "-r", "b.bin"]));
		assert!(!accepts(&["-z", "-w"]));
	}

	#[test]
	fn bus_and_address() {
		assert_eq!(target(&["-x"]).unwrap(), (BusId(1), 0x56));
		assert_eq!(target(&["-x", "--bus", "2", "--addr", "0x50"]).unwrap(), (BusId(2), 0x50));
		assert_eq!(target(&["-z", "--addr", "80"]).unwrap(), (BusId(1), 0x50));
		assert!(target(&["-b", "dump.bin", "--addr", "0x99"]).is_err());
		assert!(target(&["-x", "--addr", "0x02"]).is_err());
		assert!(target(&["-x", "--bus", "one"]).is_err());
	}

	#[test]
	fn wiring_ignores_address() {
		assert!(accepts(&["-w", "--addr", "0x99"]));
		let matches = app().get_matches_from_safe(vec!["speer", "-w", "--addr", "0x99"]).unwrap();
		assert!(matches.is_present("wiring"));
	}
}
