/// creates a leaf [`Error`](crate::Error) from a format string.
///
/// ```
/// let err = wraperr::errorf!("unknown key {:?}", "port");
/// assert_eq!(err.to_string(), "unknown key \"port\"");
/// ```
#[macro_export]
macro_rules! errorf {
	($($arg:tt)+) => {
		$crate::Error::from_args(::core::format_args!($($arg)+))
	};
}

/// wraps an `Option` of an error with a formatted message.
///
/// `None` stays `None`, and the format arguments are not evaluated.
///
/// ```
/// let err = Some(std::fmt::Error);
/// let err = wraperr::wrapf!(err, "line {}", 3).unwrap();
/// assert_eq!(format!("{:#}", err), "line 3: an error occurred when formatting an argument");
///
/// assert!(wraperr::wrapf!(None::<std::fmt::Error>, "line {}", 3).is_none());
/// ```
#[macro_export]
macro_rules! wrapf {
	($err:expr, $($arg:tt)+) => {
		match $err {
			::core::option::Option::Some(err) => ::core::option::Option::Some(
				$crate::Error::wrap_args(err, ::core::format_args!($($arg)+)),
			),
			::core::option::Option::None => ::core::option::Option::None,
		}
	};
}
