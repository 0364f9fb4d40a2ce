//! The relay pipeline.
//!
//! - [`Relay`] - drives one source through the tee into an envelope
//! - [`RelayReport`] - summary of a successful run
//! - [`Stage`] - pipeline stage, reported in logs

mod engine;
mod report;

pub use engine::Relay;
pub use report::{RelayReport, Stage};
