use crate::{stack, BoxError, Error};

/// wraps the error of a [`Result`], leaving `Ok` untouched.
///
/// ```
/// use wraperr::WrapErr;
///
/// fn parse(input: &str) -> Result<u32, wraperr::Error> {
/// 	input.parse::<u32>().wrap_err_with(|| format!("parsing {:?}", input))
/// }
///
/// assert_eq!(parse("7").unwrap(), 7);
/// assert_eq!(
/// 	format!("{:#}", parse("x").unwrap_err()),
/// 	"parsing \"x\": invalid digit found in string"
/// );
/// ```
pub trait WrapErr<T>: Sized {
	fn wrap_err<M>(self, message: M) -> Result<T, Error>
	where
		M: Into<String>;

	/// like [`WrapErr::wrap_err`], but only builds the message on error.
	fn wrap_err_with<M, F>(self, message: F) -> Result<T, Error>
	where
		M: Into<String>,
		F: FnOnce() -> M;
}

impl<T, E> WrapErr<T> for Result<T, E>
where
	E: Into<BoxError>,
{
	#[track_caller]
	#[inline(never)]
	fn wrap_err<M>(self, message: M) -> Result<T, Error>
	where
		M: Into<String>,
	{
		match self {
			Ok(value) => Ok(value),
			Err(err) => {
				let stack = stack::capture(0);
				Err(Error::assemble(message.into(), Some(err.into()), stack))
			}
		}
	}

	#[track_caller]
	#[inline(never)]
	fn wrap_err_with<M, F>(self, message: F) -> Result<T, Error>
	where
		M: Into<String>,
		F: FnOnce() -> M,
	{
		match self {
			Ok(value) => Ok(value),
			Err(err) => {
				let stack = stack::capture(0);
				Err(Error::assemble(message().into(), Some(err.into()), stack))
			}
		}
	}
}
