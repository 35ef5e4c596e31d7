use std::{error::Error as _, io, thread};
use wraperr::{
	cause, errorf, stack_trace_of, wrap, wrapf, BoxError, Error, Mode, StackTrace, StackTracer,
	WrapErr,
};

#[derive(Debug, thiserror::Error)]
#[error("token expired")]
struct Expired;

#[inline(never)]
fn root() -> Error {
	Error::new("root failure")
}

#[inline(never)]
fn outer() -> Error {
	Error::wrap(root(), "outer context")
}

#[test]
fn cause_of_leaf_is_the_leaf() {
	let leaf = errorf!("code {}", 7);
	let found = cause(Some(&leaf)).expect("leaf");

	let found = found.downcast_ref::<Error>().expect("own error");
	assert!(std::ptr::eq(found, &leaf));
}

#[test]
fn wrap_composes_messages() {
	let err = Error::new("inner");
	let expected = format!("ctx: {:#}", err);

	let wrapped = wrap(Some(err), "ctx").expect("wrapped");
	assert_eq!(wrapped.render(Mode::Composed), expected);
	assert_eq!(wrapped.render(Mode::Compact), "ctx");
}

#[test]
fn wrap_of_nothing_is_nothing() {
	assert!(wrap(None::<io::Error>, "ctx").is_none());
	assert!(wrapf!(None::<io::Error>, "ctx {}", 1).is_none());
}

#[test]
fn cause_unwinds_two_levels() {
	let a = wrap(Some(Expired), "a");
	let b = wrap(a, "b").expect("wrapped");

	let root = cause(Some(&b)).expect("root");
	assert!(root.is::<Expired>());
}

#[test]
fn extended_lists_root_then_outer() {
	let err = outer();
	let root = err
		.source()
		.and_then(stack_trace_of)
		.expect("root stack");

	let mut expected = String::from("root failure");
	expected.push_str(&root.to_string());
	expected.push('\n');
	expected.push_str("outer context");
	expected.push_str(&err.stack_trace().to_string());

	assert_eq!(format!("{:?}", err), expected);
	assert_eq!(err.render(Mode::Extended), expected);
}

#[cfg(feature = "backtrace")]
#[test]
fn stacks_start_in_the_calling_function() {
	let err = outer();
	let root = err.source().and_then(stack_trace_of).expect("root stack");

	let first = root.frames()[0].function();
	assert!(first.contains("root"), "{}", first);

	let first = err.stack_trace().frames()[0].function();
	assert!(first.contains("outer"), "{}", first);
}

#[test]
fn recovered_values() {
	assert_eq!(Error::from_recovered(Box::new("boom")).to_string(), "boom");
	assert_eq!(Error::from_recovered(Box::new(42)).to_string(), "panic: 42");

	let err = wraperr::recover(|| -> () {
		std::panic::panic_any(Error::wrap(Expired, "refreshing"))
	})
	.unwrap_err();
	assert_eq!(err.message(), "refreshing: token expired");

	let err = wraperr::recover(|| -> () {
		let boxed: BoxError = Box::new(Expired);
		std::panic::panic_any(boxed)
	})
	.unwrap_err();
	assert_eq!(err.message(), "token expired");
}

#[derive(Debug, thiserror::Error)]
#[error("query failed")]
struct QueryFailed {
	stack: StackTrace,
}

impl StackTracer for QueryFailed {
	fn stack_trace(&self) -> &StackTrace {
		&self.stack
	}
}

#[inline(never)]
fn failing_query() -> QueryFailed {
	let stack = Error::new("capture").stack_trace().clone();
	QueryFailed { stack }
}

#[test]
fn foreign_stack_takes_part_in_extended_rendering() {
	let query = failing_query();
	let stack = query.stack.clone();
	let err = Error::wrap_traced(query, "loading user");

	assert_eq!(err.source_stack_trace(), Some(&stack));

	let expected = format!("query failed{}\nloading user{}", stack, err.stack_trace());
	assert_eq!(format!("{:?}", err), expected);

	let lines = format!("{:?}", err).lines().count();
	assert_eq!(lines, 2 + stack.len() + err.stack_trace().len());
}

#[test]
fn quoted_uses_own_message() {
	let err = Error::wrap(Error::new("x"), "y");
	assert_eq!(err.render(Mode::Quoted), "\"y\"");
}

#[test]
fn result_extension_wraps_foreign_errors() {
	let res: Result<(), Expired> = Err(Expired);
	let err = res.wrap_err("authenticating").unwrap_err();

	assert_eq!(format!("{:#}", err), "authenticating: token expired");
	assert!(err.root_cause().is::<Expired>());
	assert_eq!(err.chain().count(), 2);
}

#[test]
fn concurrent_construction_keeps_values_intact() {
	let errors = thread::scope(|scope| {
		let handles = (0..8)
			.map(|thread| {
				scope.spawn(move || {
					(0..64)
						.map(|n| {
							let leaf = errorf!("leaf {}-{}", thread, n);
							wrapf!(Some(leaf), "wrap {}-{}", thread, n).expect("wrapped")
						})
						.collect::<Vec<_>>()
				})
			})
			.collect::<Vec<_>>();

		handles
			.into_iter()
			.map(|handle| handle.join().expect("thread panicked"))
			.collect::<Vec<_>>()
	});

	for (thread, errors) in errors.iter().enumerate() {
		for (n, err) in errors.iter().enumerate() {
			assert_eq!(
				format!("{:#}", err),
				format!("wrap {thread}-{n}: leaf {thread}-{n}")
			);
		}
	}

	let shared = Error::wrap(Expired, "shared");
	thread::scope(|scope| {
		for _ in 0..4 {
			scope.spawn(|| {
				assert_eq!(shared.to_string(), "shared");
				assert!(cause(Some(&shared)).expect("root").is::<Expired>());
			});
		}
	});
}
