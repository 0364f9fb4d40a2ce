//! Internal read-buffer management.
//!
//! The tee reads through a reusable buffer taken from a small thread-local
//! pool. It is an implementation detail and not part of the public API.

mod pool;

pub(crate) use pool::ReadBuffer;
