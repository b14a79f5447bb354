//! DocWarp Effect Catalog
//!
//! The static registry that maps user-facing effect identifiers
//! (`"Fold TL"`, `"Crease Diagonal 2"`, ...) to the renderer scene presets
//! that implement them:
//! - **Groups:** the eight fixed effect families, in presentation order
//! - **Descriptors:** one entry per effect, identifier → preset file
//! - **Catalog:** immutable lookup table built once at startup
//!
//! Effect identifiers are part of the dataset contract: they appear verbatim
//! in generated file names and must never be renamed.

pub mod catalog;
pub mod group;

pub use catalog::*;
pub use group::*;
