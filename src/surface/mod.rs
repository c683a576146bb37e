//! # Target surface abstractions.
//!
//! This module provides the host-environment seam:
//! - [`Surface`] - trait over the render surface being injected into
//! - [`SurfaceRef`] - shared reference to a surface (`Arc<dyn Surface>`)
//! - [`Node`] - script/style/element artifacts handed to the surface
//! - [`Listener`], [`Completion`] - callback handle types
//!
//! The surface is owned by the host, not by this crate; the scheduler only
//! observes its readiness and funnels mutations through the trait methods.

mod node;
mod surface;

pub use node::{Completion, Listener, Node};
pub use surface::{Surface, SurfaceRef};
