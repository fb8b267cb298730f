//! Data models for the bookmark backend.
//!
//! Field names serialize in camelCase to match what views bind to.

mod collection;
mod record;

pub use collection::*;
pub use record::*;
