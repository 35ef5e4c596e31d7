use std::fmt::Display;
use tracing_error::{SpanTrace, SpanTraceStatus};

/// the colorized span trace of an error, if one was captured.
pub(crate) struct PrettySpanTrace<'a>(pub &'a SpanTrace);

impl Display for PrettySpanTrace<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		if self.0.status() == SpanTraceStatus::CAPTURED {
			write!(f, "\n{:━^80}\n", " SPANTRACE ")?;
			write!(f, "\n{}", color_spantrace::colorize(self.0))
		} else {
			Ok(())
		}
	}
}

pub(crate) fn spantrace() -> SpanTrace {
	SpanTrace::capture()
}
