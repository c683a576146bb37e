//! # Event subscribers for the domvisor scheduler.
//!
//! This module provides the [`Subscribe`] trait, the non-blocking
//! [`SubscriberSet`] fan-out, and a built-in stdout logger (behind the
//! `logging` feature).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   DeferredQueue ── publish(Event) ──► Bus ──► Injector listener
//!                                                    │
//!                                              SubscriberSet::emit(&Event)
//!                                                    │
//!                                         ┌──────────┼──────────┐
//!                                         ▼          ▼          ▼
//!                                     LogWriter   Metrics    Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```rust
//! use domvisor::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct FailureCounter;
//!
//! #[async_trait]
//! impl Subscribe for FailureCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if event.kind == EventKind::ApplyFailed {
//!             // increment failure counter
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str {
//!         "failure_counter"
//!     }
//! }
//! ```

mod set;
mod subscribe;

#[cfg(feature = "logging")]
mod log;

pub use set::SubscriberSet;
pub use subscribe::Subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
