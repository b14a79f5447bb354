//! DocWarp Dataset Generation
//!
//! Turns effect identifiers into rendered images:
//! - **Orchestrator:** one effect, one source image, one render
//! - **Batch pipeline:** every catalog effect (or a subset) into a dataset
//!   directory, with per-item progress and per-item failure isolation
//! - **Files:** preset export, preview saving, and collision-free moves
//! - **Jobs:** run a batch on a worker thread and stream progress back
//!
//! Rendering is strictly sequential. The orchestrator owns the only scene
//! renderer and every operation that touches it takes `&mut self`.

pub mod batch;
pub mod files;
pub mod job;
pub mod orchestrator;

pub use batch::*;
pub use files::*;
pub use job::*;
pub use orchestrator::*;
