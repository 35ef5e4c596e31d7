use crate::{stack, BoxError, Error};
use std::{
	any::Any,
	panic::{self, UnwindSafe},
};

/// extra frames skipped by [`Error::from_recovered`].
///
/// a panic payload only reaches the caller after unwinding has finished,
/// so the stack at that point already starts in user code.
pub const RECOVERED_SKIP: usize = 0;

const NON_STRING_PAYLOAD: &str = "<non string panic payload>";

macro_rules! primitive_message {
	($payload:expr, $($ty:ty),+ $(,)?) => {
		$(
			if let Some(value) = $payload.downcast_ref::<$ty>() {
				return format!("panic: {}", value);
			}
		)+
	};
}

impl Error {
	/// turns a panic payload, as returned by [`std::panic::catch_unwind`],
	/// into a leaf error.
	///
	/// | payload                      | message                          |
	/// |------------------------------|----------------------------------|
	/// | [`Error`]                    | its composed message (`{:#}`)    |
	/// | [`BoxError`]                 | its message                      |
	/// | `&str`, `String`             | the string                       |
	/// | integers, floats, bool, char | `panic: {value}`                 |
	/// | anything else                | `panic: <non string panic payload>` |
	///
	/// other error types cannot be recognized behind `dyn Any`, so they take
	/// the last row. box them as a [`BoxError`] or an [`Error`] before
	/// passing them to [`std::panic::panic_any`] to keep their message.
	///
	/// ```
	/// let payload = std::panic::catch_unwind(|| std::panic::panic_any(42)).unwrap_err();
	/// let err = wraperr::Error::from_recovered(payload);
	/// assert_eq!(err.message(), "panic: 42");
	/// ```
	#[track_caller]
	#[inline(never)]
	pub fn from_recovered(payload: Box<dyn Any + Send>) -> Error {
		Error::recovered(payload, RECOVERED_SKIP + 1)
	}

	/// like [`Error::from_recovered`], but skips `skip` extra frames of the
	/// captured stack, e.g. when called from inside a recovery helper.
	#[track_caller]
	#[inline(never)]
	pub fn from_recovered_with_skip(payload: Box<dyn Any + Send>, skip: usize) -> Error {
		Error::recovered(payload, skip + 1)
	}

	#[track_caller]
	#[inline(never)]
	fn recovered(payload: Box<dyn Any + Send>, skip: usize) -> Error {
		let stack = stack::capture(skip);
		Error::assemble(recovered_message(payload), None, stack)
	}
}

fn recovered_message(payload: Box<dyn Any + Send>) -> String {
	let payload = match payload.downcast::<Error>() {
		Ok(err) => return format!("{:#}", err),
		Err(payload) => payload,
	};

	let payload = match payload.downcast::<BoxError>() {
		Ok(err) => return err.to_string(),
		Err(payload) => payload,
	};

	if let Some(message) = payload.downcast_ref::<&'static str>() {
		return (*message).to_owned();
	}

	let payload = match payload.downcast::<String>() {
		Ok(message) => return *message,
		Err(payload) => payload,
	};

	primitive_message!(
		payload, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
		bool, char,
	);

	format!("panic: {}", NON_STRING_PAYLOAD)
}

/// runs `f`, turning a panic into an [`Error`].
///
/// the panic hook still runs as usual, this only converts the payload
/// once unwinding reached this boundary.
///
/// ```
/// let err = wraperr::recover(|| -> u32 { panic!("boom") }).unwrap_err();
/// assert_eq!(err.message(), "boom");
///
/// assert_eq!(wraperr::recover(|| 7).unwrap(), 7);
/// ```
#[track_caller]
#[inline(never)]
pub fn recover<F, T>(f: F) -> Result<T, Error>
where
	F: FnOnce() -> T + UnwindSafe,
{
	match panic::catch_unwind(f) {
		Ok(value) => Ok(value),
		Err(payload) => Err(Error::recovered(payload, RECOVERED_SKIP + 1)),
	}
}

#[cfg(test)]
mod tests {
	use crate::{BoxError, Error, StackTracer};
	use std::error::Error as _;

	#[test]
	fn str_payload_is_used_verbatim() {
		let err = Error::from_recovered(Box::new("boom"));
		assert_eq!(err.message(), "boom");
		assert_eq!(err.to_string(), "boom");
	}

	#[test]
	fn string_payload_is_used_verbatim() {
		let err = Error::from_recovered(Box::new(String::from("boom")));
		assert_eq!(err.message(), "boom");
	}

	#[test]
	fn primitive_payload_is_prefixed() {
		assert_eq!(Error::from_recovered(Box::new(42)).message(), "panic: 42");
		assert_eq!(Error::from_recovered(Box::new(1.5f64)).message(), "panic: 1.5");
		assert_eq!(Error::from_recovered(Box::new(true)).message(), "panic: true");
	}

	#[test]
	fn unknown_payload_falls_back() {
		struct Opaque;

		let err = Error::from_recovered(Box::new(Opaque));
		assert_eq!(err.message(), "panic: <non string panic payload>");
	}

	#[test]
	fn error_payload_reuses_its_message() {
		let payload = Error::wrap(Error::new("inner"), "outer");
		let err = Error::from_recovered(Box::new(payload));
		assert_eq!(err.message(), "outer: inner");
		assert!(err.source().is_none());

		let payload: BoxError = "boxed".into();
		let err = Error::from_recovered(Box::new(payload));
		assert_eq!(err.message(), "boxed");
	}

	#[test]
	fn recover_converts_panics() {
		let err = crate::recover(|| -> () { panic!("went {}", "wrong") }).unwrap_err();
		assert_eq!(err.message(), "went wrong");

		let value = crate::recover(|| 1 + 1).unwrap();
		assert_eq!(value, 2);
	}

	#[test]
	fn skip_drops_frames() {
		let full = Error::from_recovered(Box::new("a"));
		let skipped = Error::from_recovered_with_skip(Box::new("a"), 1);
		assert!(skipped.stack_trace().len() <= full.stack_trace().len());
	}
}
