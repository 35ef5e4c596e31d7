//! annotate errors with context while keeping the original error around.
//!
//! ```
//! use wraperr::{cause, Error, WrapErr};
//!
//! fn read_port(raw: &str) -> Result<u16, Error> {
//! 	raw.parse::<u16>().wrap_err("invalid port")
//! }
//!
//! fn load() -> Result<u16, Error> {
//! 	read_port("http").wrap_err("loading config")
//! }
//!
//! let err = load().unwrap_err();
//! assert_eq!(err.to_string(), "loading config");
//! assert_eq!(
//! 	format!("{:#}", err),
//! 	"loading config: invalid port: invalid digit found in string"
//! );
//!
//! let root = cause(Some(&err)).unwrap();
//! assert!(root.is::<std::num::ParseIntError>());
//! ```
//!
//! every error records where it was created and, with the `backtrace`
//! feature, the call stack at that point. `{:?}` prints the whole chain
//! root first together with those stacks, [`Error::report`] prints a
//! colored report meant for humans.

#[macro_use]
mod macros;

mod backtrace;
mod chain;
mod error;
mod ext;
mod recover;
mod report;
#[cfg(feature = "spantrace")]
mod spantrace;
mod stack;

pub use crate::backtrace::{Verbosity, VERBOSITY};
pub use crate::chain::{cause, Chain};
pub use crate::error::{stack_trace_of, wrap, BoxError, Error, Mode, Quoted, StackTracer};
pub use crate::ext::WrapErr;
pub use crate::recover::{recover, RECOVERED_SKIP};
pub use crate::report::Report;
pub use crate::stack::{Frame, StackTrace, Symbol};
