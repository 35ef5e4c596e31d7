use std::{fs, num::ParseIntError, path::Path};
use wraperr::{wrapf, Error, WrapErr};

fn read(path: &Path) -> Result<String, Error> {
	fs::read_to_string(path).wrap_err_with(|| format!("reading {}", path.display()))
}

fn parse(content: &str) -> Result<u32, Error> {
	let parsed: Result<u32, ParseIntError> = content.trim().parse();
	match wrapf!(parsed.as_ref().err().cloned(), "parsing {:?}", content.trim()) {
		Some(err) => Err(err),
		None => Ok(parsed.unwrap_or_default()),
	}
}

fn main() {
	let result = read(Path::new("file.txt")).and_then(|content| parse(&content));

	match result {
		Ok(content) => println!("content is {}", content),
		Err(err) => {
			println!("{:#}\n", err);
			println!("{:?}\n", err);
			eprintln!("{}", err.report());
		}
	}
}
