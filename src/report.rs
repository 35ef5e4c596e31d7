use crate::{
	backtrace::{BacktraceOmitted, PrettyStack, Verbosity, VERBOSITY},
	Error,
};
use owo_colors::OwoColorize;
use std::fmt::{self, Debug, Display};

/// a colored, multi-line rendering of an [`Error`] for humans.
///
/// lists the message, every cause, the location the error was created at
/// and the stack of the innermost [`Error`] in the chain, the one closest
/// to the original failure. how much of the stack is shown depends on the
/// [`Verbosity`], which defaults to [`VERBOSITY`].
///
/// ```
/// use wraperr::{Error, Verbosity};
///
/// let err = Error::wrap(Error::new("disk full"), "saving");
/// let report = err.report().verbosity(Verbosity::Minimal).to_string();
/// assert!(report.contains("disk full"));
/// assert!(report.contains("Location:"));
/// ```
#[derive(Clone, Copy)]
pub struct Report<'a> {
	error: &'a Error,
	verbosity: Verbosity,
}

impl<'a> Report<'a> {
	pub(crate) fn new(error: &'a Error) -> Self {
		Report {
			error,
			verbosity: *VERBOSITY,
		}
	}

	/// overrides the verbosity read from the environment.
	pub fn verbosity(mut self, verbosity: Verbosity) -> Self {
		self.verbosity = verbosity;
		self
	}
}

impl Display for Report<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.error.message().red())?;

		let mut sources = self.error.chain().skip(1).peekable();
		if sources.peek().is_some() {
			write!(f, "\n\nSource:")?;
			for (idx, source) in sources.enumerate() {
				write!(f, "\n   {}: {}", idx, source.magenta())?;
			}
		}

		write!(f, "\n\nLocation:")?;
		write!(f, "\n   {}", self.error.location().cyan())?;

		let stack = self.error.innermost_stack_trace();

		write!(f, "\n\n")?;
		if self.verbosity > Verbosity::Minimal {
			let pretty = PrettyStack {
				stack,
				verbosity: self.verbosity,
			};
			write!(f, "{}", pretty)?;
		}
		write!(f, "{}", BacktraceOmitted(self.verbosity))?;

		#[cfg(feature = "spantrace")]
		write!(f, "{}", crate::spantrace::PrettySpanTrace(self.error.span_trace()))?;

		Ok(())
	}
}

impl Debug for Report<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		Display::fmt(self, f)
	}
}
