//! # Utilities Module
//!
//! Internal helpers that are not part of the logger itself.

pub(crate) mod logger;

pub use logger::{setup_logger, TaggedFormatter};
