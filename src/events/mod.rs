//! Scheduler events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to events emitted by the deferred queues, the pollers,
//! the facade and the subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `DeferredQueue` (buffer/flush/apply), `Injector`
//!   (module loading), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the facade's subscriber listener (fans out to
//!   `SubscriberSet`) and any receiver obtained from [`Bus::subscribe`].
//!
//! See `core/mod.rs` for the system-level wiring diagram.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
