//! DocWarp Render Engine
//!
//! Adapter between a warp request and the external 3D renderer. Every
//! render is expressed as a [`ScenePlan`]: an ordered list of engine steps
//! that always begins by resetting the engine, so no scene, material, or
//! shading state survives from one render to the next.
//!
//! # Render Choreography
//!
//! ```text
//! source.png ──► load  ──┐
//!                        │
//! effect ──► RenderRequest ──► ScenePlan
//!                                 │  reset scene
//!                                 │  open preset (.blend)
//!                                 │  bake physics caches
//!                                 │  bind target object
//!                                 │  attach image material
//!                                 │  shade smooth (curl family)
//!                                 │  transparent RGBA output
//!                                 ▼  render still
//!                           RenderBackend (Blender)
//!                                 │
//!                                 ▼
//!                         temp render.png
//! ```

pub mod adapter;
pub mod backend;
pub mod blender;
pub mod plan;
pub mod source;

pub use adapter::*;
pub use backend::*;
pub use blender::BlenderBackend;
pub use plan::*;
pub use source::*;
