//! # Surface trait - the render surface being injected into.
//!
//! This module defines the [`Surface`] trait and the shared handle type
//! [`SurfaceRef`], an `Arc<dyn Surface>` suitable for sharing across the
//! scheduler.
//!
//! A surface is constructed asynchronously by the host environment; its
//! structural anchors (head, body) appear at times the caller does not
//! control. The readiness predicates are **monotonic**: once an anchor
//! exists, the corresponding predicate stays `true` for the lifetime of the
//! surface.

use std::sync::Arc;

use crate::error::InjectError;
use crate::surface::node::{Listener, Node};

/// # The target surface: observed readiness, funneled mutation.
///
/// Implemented by the host environment. The scheduler only calls these
/// methods; all mutation of the underlying document tree goes through
/// [`append_to_head`](Surface::append_to_head) and
/// [`add_body_listener`](Surface::add_body_listener) from the scheduler's
/// execution context, so implementors need interior mutability but no
/// external synchronization beyond it.
///
/// # Example
/// ```
/// use std::sync::Mutex;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use domvisor::{InjectError, Listener, Node, Surface};
///
/// #[derive(Default)]
/// struct PageStub {
///     head_ready: AtomicBool,
///     head: Mutex<Vec<Node>>,
/// }
///
/// impl Surface for PageStub {
///     fn head_ready(&self) -> bool {
///         self.head_ready.load(Ordering::Acquire)
///     }
///
///     fn body_ready(&self) -> bool {
///         false
///     }
///
///     fn append_to_head(&self, node: Node) -> Result<(), InjectError> {
///         self.head.lock().unwrap().push(node);
///         Ok(())
///     }
///
///     fn add_body_listener(&self, _event: &str, _listener: Listener) -> Result<(), InjectError> {
///         Err(InjectError::Apply { op: "body_event", reason: "no body".into() })
///     }
/// }
/// ```
pub trait Surface: Send + Sync + 'static {
    /// True once the head anchor exists. Monotonic: never reverts to false.
    fn head_ready(&self) -> bool;

    /// True once the body anchor exists. Monotonic: never reverts to false.
    fn body_ready(&self) -> bool;

    /// Appends an artifact to the head.
    ///
    /// Only called while [`head_ready`](Surface::head_ready) holds.
    fn append_to_head(&self, node: Node) -> Result<(), InjectError>;

    /// Registers a permanent listener for `event` on the body.
    ///
    /// Only called while [`body_ready`](Surface::body_ready) holds. The
    /// listener fires once per matching event for the remaining life of the
    /// surface.
    fn add_body_listener(&self, event: &str, listener: Listener) -> Result<(), InjectError>;
}

/// Shared handle to a surface.
pub type SurfaceRef = Arc<dyn Surface>;
