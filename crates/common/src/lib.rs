//! DocWarp Common Utilities
//!
//! Shared infrastructure for all DocWarp crates:
//! - Error taxonomy and result aliases
//! - Epoch clock used to stamp dataset items
//! - Tracing/logging initialization
//! - Configuration loading

pub mod clock;
pub mod config;
pub mod error;
pub mod logging;

pub use clock::*;
pub use config::*;
pub use error::*;
