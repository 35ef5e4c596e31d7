use std::{
	fmt::{self, Debug, Display},
	path::PathBuf,
};

/// placeholder for any part of a frame that could not be resolved.
pub(crate) const UNKNOWN: &str = "unknown";

/// a single call site of a [`StackTrace`].
///
/// only the instruction pointer is stored when the stack is captured,
/// symbol information is looked up every time the frame is rendered.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
	ip: usize,
}

/// symbol information of a resolved [`Frame`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Symbol {
	pub name: Option<String>,
	pub file: Option<PathBuf>,
	pub line: Option<u32>,
}

impl Frame {
	#[cfg(test)]
	pub(crate) fn from_ip(ip: usize) -> Frame {
		Frame { ip }
	}

	/// the raw instruction pointer of this frame.
	pub fn ip(&self) -> usize {
		self.ip
	}

	/// looks up the symbol of this frame.
	///
	/// if the frame was inlined into its caller, the innermost symbol wins.
	pub fn resolve(&self) -> Symbol {
		resolve_ip(self.ip)
	}

	/// the demangled function name, or `unknown`.
	pub fn function(&self) -> String {
		self.resolve().name.unwrap_or_else(|| UNKNOWN.to_owned())
	}

	/// the source file, or `unknown`.
	pub fn file(&self) -> String {
		self.resolve()
			.file
			.map(|file| file.display().to_string())
			.unwrap_or_else(|| UNKNOWN.to_owned())
	}

	/// the source line, if known.
	pub fn line(&self) -> Option<u32> {
		self.resolve().line
	}
}

#[cfg(feature = "backtrace")]
fn resolve_ip(ip: usize) -> Symbol {
	let mut symbol = None;
	::backtrace::resolve(ip as *mut std::ffi::c_void, |sym| {
		if symbol.is_some() {
			return;
		}

		symbol = Some(Symbol {
			name: sym.name().map(|name| format!("{:#}", name)),
			file: sym.filename().map(ToOwned::to_owned),
			line: sym.lineno(),
		});
	});

	symbol.unwrap_or_default()
}

#[cfg(not(feature = "backtrace"))]
fn resolve_ip(_ip: usize) -> Symbol {
	Symbol::default()
}

impl Display for Frame {
	/// `function  file:line`, with `unknown` for anything unresolved.
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let Symbol { name, file, line } = self.resolve();

		let name = name.as_deref().unwrap_or(UNKNOWN);
		write!(f, "{}  ", name)?;

		match file {
			Some(file) => write!(f, "{}", file.display())?,
			None => f.write_str(UNKNOWN)?,
		}

		match line {
			Some(line) => write!(f, ":{}", line),
			None => write!(f, ":{}", UNKNOWN),
		}
	}
}

impl Debug for Frame {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Frame")
			.field("ip", &format_args!("{:#x}", self.ip))
			.finish()
	}
}

/// the call stack that was active when an error was constructed,
/// innermost frame first.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StackTrace {
	frames: Vec<Frame>,
}

impl StackTrace {
	/// a stack trace without any frames.
	pub const fn empty() -> StackTrace {
		StackTrace { frames: Vec::new() }
	}

	pub fn frames(&self) -> &[Frame] {
		&self.frames
	}

	pub fn len(&self) -> usize {
		self.frames.len()
	}

	pub fn is_empty(&self) -> bool {
		self.frames.is_empty()
	}
}

impl From<Vec<Frame>> for StackTrace {
	fn from(frames: Vec<Frame>) -> Self {
		StackTrace { frames }
	}
}

impl Display for StackTrace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for frame in &self.frames {
			write!(f, "\n{}", frame)?;
		}

		Ok(())
	}
}

impl Debug for StackTrace {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_list().entries(&self.frames).finish()
	}
}

/// captures the current call stack.
///
/// the frames of the capturing machinery, this function and its direct
/// caller (the constructor) are dropped, followed by `skip` more frames.
/// the cut is found by comparing symbol addresses against this function,
/// so it does not depend on how many frames the unwinder itself pushes.
#[cfg(feature = "backtrace")]
#[inline(never)]
pub(crate) fn capture(skip: usize) -> StackTrace {
	let marker = capture as usize;

	let mut ips = Vec::new();
	let mut origin = None;
	::backtrace::trace(|frame| {
		if origin.is_none() && frame.symbol_address() as usize == marker {
			origin = Some(ips.len());
		}

		ips.push(frame.ip() as usize);
		true
	});

	let start = match origin {
		Some(idx) => idx + 2 + skip,
		None => skip,
	};
	let start = start.min(ips.len());

	let frames = ips[start..].iter().map(|&ip| Frame { ip }).collect();
	StackTrace { frames }
}

#[cfg(not(feature = "backtrace"))]
#[inline(always)]
pub(crate) fn capture(_skip: usize) -> StackTrace {
	StackTrace::empty()
}
