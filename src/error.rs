use crate::{
	chain::Chain,
	report::Report,
	stack::{self, StackTrace},
};
use std::{
	error::Error as StdError,
	fmt::{self, Debug, Display, Write},
	panic::Location,
};

/// an owned, type-erased error that can be wrapped by an [`Error`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// appended to a message when one of its format arguments failed to render.
pub(crate) const FORMAT_FAILED: &str = "<formatting failed>";

/// an error message with an optional underlying cause.
///
/// an `Error` without a cause is a leaf, created by [`Error::new`] or
/// [`errorf!`](crate::errorf). wrapping an existing error via
/// [`Error::wrap`], [`wrap`] or [`wrapf!`](crate::wrapf) creates a new
/// `Error` that owns the wrapped one. every `Error` remembers the source
/// location it was created at, and the call stack active at that point.
///
/// # rendering
///
/// | format  | output                                                  |
/// |---------|---------------------------------------------------------|
/// | `{}`    | the own message only                                    |
/// | `{:#}`  | every message in the chain, joined by `": "`            |
/// | `{:?}`  | the chain root first, one message and stack per error   |
/// | `{:#?}` | the struct layout                                       |
///
/// ```
/// let root = wraperr::Error::new("connection refused");
/// let err = wraperr::Error::wrap(root, "fetching config");
///
/// assert_eq!(format!("{}", err), "fetching config");
/// assert_eq!(format!("{:#}", err), "fetching config: connection refused");
/// ```
pub struct Error {
	inner: Box<ErrorImpl>,
}

struct ErrorImpl {
	message: String,
	source: Option<BoxError>,
	source_stack: Option<StackAccessor>,
	location: &'static Location<'static>,
	stack: StackTrace,
	#[cfg(feature = "spantrace")]
	spantrace: tracing_error::SpanTrace,
}

/// reads the stack of a wrapped source whose concrete type is known
/// only at the wrap site.
type StackAccessor = for<'a> fn(&'a (dyn StdError + 'static)) -> Option<&'a StackTrace>;

fn traced_stack<'a, E>(err: &'a (dyn StdError + 'static)) -> Option<&'a StackTrace>
where
	E: StdError + StackTracer + 'static,
{
	err.downcast_ref::<E>().map(StackTracer::stack_trace)
}

/// how [`Error::render`] turns an error into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
	/// the own message only, same as `{}`.
	Compact,
	/// all messages of the chain joined by `": "`, same as `{:#}`.
	Composed,
	/// every message of the chain with its stack trace, same as `{:?}`.
	Extended,
	/// the own message as a quoted string literal.
	Quoted,
}

impl Error {
	/// creates a leaf error with the given message.
	#[track_caller]
	#[inline(never)]
	pub fn new<M>(message: M) -> Error
	where
		M: Into<String>,
	{
		let stack = stack::capture(0);
		Error::assemble(message.into(), None, stack)
	}

	/// creates a leaf error from preformatted arguments.
	///
	/// usually called through [`errorf!`](crate::errorf). if one of the
	/// arguments fails to format, whatever was written so far is kept and
	/// `<formatting failed>` is appended.
	#[track_caller]
	#[inline(never)]
	pub fn from_args(args: fmt::Arguments<'_>) -> Error {
		let stack = stack::capture(0);
		Error::assemble(format_message(args), None, stack)
	}

	/// wraps `err` with an additional message.
	#[track_caller]
	#[inline(never)]
	pub fn wrap<E, M>(err: E, message: M) -> Error
	where
		E: Into<BoxError>,
		M: Into<String>,
	{
		let stack = stack::capture(0);
		Error::assemble(message.into(), Some(err.into()), stack)
	}

	/// wraps `err` with a message built from preformatted arguments.
	///
	/// usually called through [`wrapf!`](crate::wrapf).
	#[track_caller]
	#[inline(never)]
	pub fn wrap_args<E>(err: E, args: fmt::Arguments<'_>) -> Error
	where
		E: Into<BoxError>,
	{
		let stack = stack::capture(0);
		Error::assemble(format_message(args), Some(err.into()), stack)
	}

	/// wraps an error that carries its own [`StackTrace`].
	///
	/// the stack of `err` shows up in `{:?}` and in [`Error::report`] like
	/// the stack of a wrapped [`Error`] would.
	#[track_caller]
	#[inline(never)]
	pub fn wrap_traced<E, M>(err: E, message: M) -> Error
	where
		E: StdError + StackTracer + Send + Sync + 'static,
		M: Into<String>,
	{
		let stack = stack::capture(0);
		let mut wrapped = Error::assemble(message.into(), Some(Box::new(err) as BoxError), stack);
		wrapped.inner.source_stack = Some(traced_stack::<E>);
		wrapped
	}

	#[track_caller]
	pub(crate) fn assemble(message: String, source: Option<BoxError>, stack: StackTrace) -> Error {
		let inner = ErrorImpl {
			message,
			source,
			source_stack: None,
			location: Location::caller(),
			stack,
			#[cfg(feature = "spantrace")]
			spantrace: crate::spantrace::spantrace(),
		};

		Error {
			inner: Box::new(inner),
		}
	}

	/// the message of this error, without any of its causes.
	pub fn message(&self) -> &str {
		&self.inner.message
	}

	/// the source location this error was created at.
	pub fn location(&self) -> &'static Location<'static> {
		self.inner.location
	}

	/// the error at the end of the chain.
	///
	/// returns `self` if this error has no cause.
	pub fn root_cause(&self) -> &(dyn StdError + 'static) {
		let mut err: &(dyn StdError + 'static) = self;
		while let Some(source) = err.source() {
			err = source;
		}

		err
	}

	/// iterates over this error and all of its causes, outermost first.
	pub fn chain(&self) -> Chain<'_> {
		Chain::new(self)
	}

	/// the span trace captured when this error was created.
	#[cfg(feature = "spantrace")]
	pub fn span_trace(&self) -> &tracing_error::SpanTrace {
		&self.inner.spantrace
	}

	/// the stack trace of the direct cause, if it has one.
	///
	/// works for wrapped [`Error`]s and for errors wrapped through
	/// [`Error::wrap_traced`].
	pub fn source_stack_trace(&self) -> Option<&StackTrace> {
		let source = self.source()?;
		match self.inner.source_stack {
			Some(accessor) => accessor(source),
			None => stack_trace_of(source),
		}
	}

	/// the stack of the innermost error in the chain that has one.
	pub(crate) fn innermost_stack_trace(&self) -> &StackTrace {
		let mut stack = &self.inner.stack;
		let mut parent = Some(self);
		for err in self.chain().skip(1) {
			let found = match parent {
				Some(parent) => parent.source_stack_trace(),
				None => stack_trace_of(err),
			};
			if let Some(found) = found {
				stack = found;
			}
			parent = err.downcast_ref::<Error>();
		}

		stack
	}

	/// renders the error in the given mode.
	pub fn render(&self, mode: Mode) -> String {
		match mode {
			Mode::Compact => format!("{}", self),
			Mode::Composed => format!("{:#}", self),
			Mode::Extended => format!("{:?}", self),
			Mode::Quoted => self.quoted().to_string(),
		}
	}

	/// displays the own message as a quoted and escaped string.
	///
	/// ```
	/// let err = wraperr::Error::wrap(wraperr::Error::new("x"), "say \"y\"");
	/// assert_eq!(err.quoted().to_string(), r#""say \"y\"""#);
	/// ```
	pub fn quoted(&self) -> Quoted<'_> {
		Quoted(self)
	}

	/// a colored, human readable report of the whole chain.
	pub fn report(&self) -> Report<'_> {
		Report::new(self)
	}
}

/// wraps `err` with an additional message, if there is an error at all.
///
/// `None` is passed through without capturing anything.
///
/// ```
/// let ok = wraperr::wrap(None::<std::io::Error>, "reading");
/// assert!(ok.is_none());
/// ```
#[track_caller]
#[inline(never)]
pub fn wrap<E, M>(err: Option<E>, message: M) -> Option<Error>
where
	E: Into<BoxError>,
	M: Into<String>,
{
	let err = err?;
	let stack = stack::capture(0);
	Some(Error::assemble(message.into(), Some(err.into()), stack))
}

pub(crate) fn format_message(args: fmt::Arguments<'_>) -> String {
	if let Some(message) = args.as_str() {
		return message.to_owned();
	}

	let mut message = String::new();
	if message.write_fmt(args).is_err() {
		message.push_str(FORMAT_FAILED);
	}

	message
}

/// capability of errors that carry a [`StackTrace`].
pub trait StackTracer {
	fn stack_trace(&self) -> &StackTrace;
}

impl StackTracer for Error {
	fn stack_trace(&self) -> &StackTrace {
		&self.inner.stack
	}
}

/// the stack trace of a type-erased error, if it is an [`Error`].
///
/// foreign [`StackTracer`]s are only visible through the [`Error`] that
/// wraps them, see [`Error::source_stack_trace`].
pub fn stack_trace_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a StackTrace> {
	err.downcast_ref::<Error>().map(StackTracer::stack_trace)
}

/// the quoted message of an [`Error`], see [`Error::quoted`].
pub struct Quoted<'a>(&'a Error);

impl Display for Quoted<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self.0.message())
	}
}

fn write_composed(err: &(dyn StdError + 'static), f: &mut fmt::Formatter<'_>) -> fmt::Result {
	if let Some(err) = err.downcast_ref::<Error>() {
		return write!(f, "{:#}", err);
	}

	write!(f, "{}", err)?;
	match err.source() {
		Some(source) => {
			f.write_str(": ")?;
			write_composed(source, f)
		}
		None => Ok(()),
	}
}

fn write_extended(
	err: &(dyn StdError + 'static),
	stack: Option<&StackTrace>,
	f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
	let own = err.downcast_ref::<Error>();

	if let Some(source) = err.source() {
		let source_stack = match own {
			Some(own) => own.source_stack_trace(),
			None => stack_trace_of(source),
		};
		write_extended(source, source_stack, f)?;
		f.write_char('\n')?;
	}

	match own {
		Some(own) => f.write_str(&own.inner.message)?,
		None => write!(f, "{}", err)?,
	}

	match stack {
		Some(stack) => write!(f, "{}", stack),
		None => Ok(()),
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.inner.message)?;

		if f.alternate() {
			if let Some(source) = self.source() {
				f.write_str(": ")?;
				write_composed(source, f)?;
			}
		}

		Ok(())
	}
}

impl Debug for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if f.alternate() {
			return f
				.debug_struct("Error")
				.field("message", &self.inner.message)
				.field("location", &self.inner.location)
				.field("source", &self.inner.source)
				.finish();
		}

		write_extended(self, Some(&self.inner.stack), f)
	}
}

impl StdError for Error {
	fn source(&self) -> Option<&(dyn StdError + 'static)> {
		self.inner
			.source
			.as_deref()
			.map(|source| source as &(dyn StdError + 'static))
	}
}
