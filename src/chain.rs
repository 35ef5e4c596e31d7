use std::{error::Error, iter::FusedIterator};

/// iterator over an error and its sources, outermost first.
#[derive(Clone)]
pub struct Chain<'a> {
	next: Option<&'a (dyn Error + 'static)>,
}

impl<'a> Chain<'a> {
	pub fn new(head: &'a (dyn Error + 'static)) -> Self {
		Chain { next: Some(head) }
	}
}

impl<'a> Iterator for Chain<'a> {
	type Item = &'a (dyn Error + 'static);

	fn next(&mut self) -> Option<Self::Item> {
		let current = self.next?;
		self.next = current.source();
		Some(current)
	}
}

impl FusedIterator for Chain<'_> {}

/// follows [`Error::source`] until an error without a source is reached.
///
/// `None` is returned as is. an error that has no source is returned
/// unchanged, so `cause` of a leaf is the leaf itself.
///
/// ```
/// use wraperr::{cause, Error};
///
/// let err = Error::wrap(Error::wrap(Error::new("root"), "a"), "b");
/// let root = cause(Some(&err)).unwrap();
/// assert_eq!(root.to_string(), "root");
///
/// assert!(cause(None).is_none());
/// ```
pub fn cause<'a>(err: Option<&'a (dyn Error + 'static)>) -> Option<&'a (dyn Error + 'static)> {
	let mut err = err?;
	while let Some(source) = err.source() {
		err = source;
	}

	Some(err)
}

#[cfg(test)]
mod tests {
	use super::{cause, Chain};
	use crate::Error;
	use std::io;

	fn same(a: &dyn std::error::Error, b: &dyn std::error::Error) -> bool {
		std::ptr::eq(a as *const _ as *const u8, b as *const _ as *const u8)
	}

	#[test]
	fn cause_of_none_is_none() {
		assert!(cause(None).is_none());
	}

	#[test]
	fn cause_of_leaf_is_identity() {
		let leaf = Error::new("leaf");
		let root = cause(Some(&leaf)).expect("leaf");
		assert!(same(root, &leaf));
	}

	#[test]
	fn cause_of_foreign_error_is_identity() {
		let err = io::Error::new(io::ErrorKind::Other, "plain");
		let root = cause(Some(&err)).expect("io error");
		assert!(same(root, &err));
	}

	#[test]
	fn cause_unwinds_nested_wraps() {
		let err = io::Error::new(io::ErrorKind::NotFound, "missing");
		let wrapped = Error::wrap(Error::wrap(err, "a"), "b");

		let root = cause(Some(&wrapped)).expect("root");
		let root = root.downcast_ref::<io::Error>().expect("io error");
		assert_eq!(root.kind(), io::ErrorKind::NotFound);
		assert_eq!(root.to_string(), "missing");
	}

	#[test]
	fn chain_lists_every_message() {
		let err = Error::wrap(Error::wrap(Error::new("c"), "b"), "a");
		let messages = Chain::new(&err)
			.map(|err| err.to_string())
			.collect::<Vec<_>>();
		assert_eq!(messages, ["a", "b", "c"]);
	}
}
