//! Splitting one byte stream into two deliveries.
//!
//! - [`TeeReader`] - wraps a [`std::io::Read`] source and feeds every byte it
//!   yields into an [`Accumulator`](crate::Accumulator) first
//! - [`Chunks`] - iterator view over a `TeeReader`, yielding owned chunks

mod chunks;
mod reader;

pub use chunks::Chunks;
pub use reader::TeeReader;
