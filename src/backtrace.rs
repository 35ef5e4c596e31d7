use crate::stack::{StackTrace, UNKNOWN};
use once_cell::sync::Lazy;
use owo_colors::OwoColorize;
use std::{fmt::Display, path::PathBuf};

/// how much of a stack trace a [`Report`](crate::Report) prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Verbosity {
	/// no frames at all.
	Minimal,
	/// user frames, with runtime start-up frames hidden.
	Medium,
	/// every captured frame.
	Full,
}

impl Verbosity {
	/// reads `RUST_LIB_BACKTRACE`, falling back to `RUST_BACKTRACE`.
	pub fn from_env() -> Verbosity {
		let var = std::env::var("RUST_LIB_BACKTRACE").or_else(|_| std::env::var("RUST_BACKTRACE"));
		Verbosity::parse(var.ok().as_deref())
	}

	fn parse(value: Option<&str>) -> Verbosity {
		match value {
			None | Some("0") => Verbosity::Minimal,
			Some("full") => Verbosity::Full,
			Some(_) => Verbosity::Medium,
		}
	}
}

/// the verbosity of the process, read once on first use.
pub static VERBOSITY: Lazy<Verbosity> = Lazy::new(Verbosity::from_env);

/// hint on how to get more frames than the current verbosity shows.
pub(crate) struct BacktraceOmitted(pub Verbosity);

impl Display for BacktraceOmitted {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let hint = match self.0 {
			Verbosity::Minimal => {
				"Backtrace omitted. Run with RUST_BACKTRACE=1 environment variable to display it."
			}
			Verbosity::Medium => {
				"Run with RUST_BACKTRACE=full to include runtime frames."
			}
			Verbosity::Full => return Ok(()),
		};

		writeln!(f, "{}", hint.dimmed())
	}
}

#[derive(Debug)]
struct Line {
	n: usize,
	name: Option<String>,
	line: Option<u32>,
	file: Option<PathBuf>,
}

impl Line {
	fn is_wraperr_code(&self) -> bool {
		const SYM_PREFIXES: &[&str] = &[
			"backtrace::",
			"wraperr::stack::",
			"wraperr::error::",
			"wraperr::ext::",
			"wraperr::recover::",
			"<core::result::Result<T,E> as wraperr::ext::WrapErr<T>>::",
		];

		let Some(name) = self.name.as_deref() else {
			return false;
		};

		SYM_PREFIXES.iter().any(|x| name.starts_with(x))
	}

	/// taken from
	/// <https://github.com/eyre-rs/eyre/blob/dded7dededca017b23dde6126bd5596eddb2deca/color-eyre/src/config.rs#L360-L382>
	///
	/// licensed under MIT or APACHE 2.0
	fn is_runtime_init_code(&self) -> bool {
		const SYM_PREFIXES: &[&str] = &[
			"std::rt::lang_start::",
			"test::run_test::run_test_inner::",
			"std::sys_common::backtrace::__rust_begin_short_backtrace",
			"std::sys::backtrace::__rust_begin_short_backtrace",
		];

		let Some(name) = self.name.as_deref() else {
			return false;
		};

		if SYM_PREFIXES.iter().any(|x| name.starts_with(x)) {
			return true;
		}

		if let Some(file) = self.file.as_deref() {
			let file = file.to_string_lossy();

			// for linux, this is the best rule for skipping test init i found
			if name == "{{closure}}" && file == "src/libtest/lib.rs" {
				return true;
			}
		}

		false
	}
}

impl Display for Line {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:>2}: ", self.n)?;

		let name = self.name.as_deref().unwrap_or(UNKNOWN);
		writeln!(f, "{}", name.green())?;

		write!(f, "    at ")?;
		if let Some(file) = self.file.as_deref() {
			write!(f, "{}", file.display().purple())?;
		} else {
			write!(f, "{}", UNKNOWN.purple())?;
		}
		if let Some(line) = self.line {
			writeln!(f, ":{}", line.purple())?;
		} else {
			writeln!(f, ":{}", UNKNOWN.purple())?;
		}

		Ok(())
	}
}

/// a numbered, colored rendering of a [`StackTrace`].
pub(crate) struct PrettyStack<'a> {
	pub stack: &'a StackTrace,
	pub verbosity: Verbosity,
}

impl PrettyStack<'_> {
	fn lines(&self) -> Vec<Line> {
		self.stack
			.frames()
			.iter()
			.zip(1..)
			.map(|(frame, n)| {
				let symbol = frame.resolve();
				Line {
					n,
					name: symbol.name,
					line: symbol.line,
					file: symbol.file,
				}
			})
			.collect()
	}
}

fn filter_lines(mut lines: Vec<Line>) -> Vec<Line> {
	// the stack is normally cut right after the constructor already, this
	// only matters when the capture could not locate itself.
	let wraperr_cutoff = lines
		.iter()
		.rposition(|line| line.is_wraperr_code())
		.map(|idx| idx + 2) // lines are 1-indexed
		.unwrap_or(0);

	let runtime_init_cutoff = lines
		.iter()
		.position(|line| line.is_runtime_init_code())
		.map(|idx| idx + 1) // lines are 1-indexed
		.unwrap_or(usize::MAX);

	let range = wraperr_cutoff..runtime_init_cutoff;
	lines.retain(|line| range.contains(&line.n));

	lines
}

fn print_hidden(amt: usize, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
	let tmp = format!(
		"{decor} {amt} frame{plural} hidden {decor}",
		decor = "⋮",
		plural = if amt == 1 { "" } else { "s" }
	);

	writeln!(f, "{:^80}", tmp.cyan())
}

impl Display for PrettyStack<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		writeln!(f, "{:━^80}", " BACKTRACE ")?;

		let lines = self.lines();
		let total = lines.len();

		let lines = if self.verbosity == Verbosity::Full {
			lines
		} else {
			filter_lines(lines)
		};

		let Some(last) = lines.last() else {
			return writeln!(f, "<empty backtrace>");
		};

		let mut last_printed = 0;
		for line in &lines {
			let delta = line.n - last_printed;
			if delta > 1 {
				print_hidden(delta - 1, f)?;
			}

			write!(f, "{}", line)?;

			last_printed = line.n;
		}

		if last.n < total {
			print_hidden(total - last.n, f)?;
		}

		Ok(())
	}
}
