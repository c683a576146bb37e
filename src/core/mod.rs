//! Scheduler core: readiness gates, deferred queues, and the facade.
//!
//! This module contains the embedded implementation of the domvisor
//! scheduler. The public API from this module is [`Injector`], the
//! per-surface facade, plus the building blocks it is assembled from
//! ([`DeferredQueue`], [`ReadyWatch`], [`Gate`]) for hosts that want to gate
//! their own operations.
//!
//! ## System wiring
//! ```text
//! caller ──► Injector
//!              ├─ scripts     : DeferredQueue ── Gate(head_ready) ─┐
//!              ├─ head_fns    : DeferredQueue ── Gate(head_ready)  ├──► Surface
//!              └─ body_events : DeferredQueue ── Gate(body_ready) ─┘
//!
//! submit(item):
//!   gate open   ──► drain buffer, apply item, run completion   (no buffering)
//!   gate closed ──► buffer item; spawn watcher iff none running
//!
//! watcher: ReadyWatch::wait_ready(gate) ──► flush: apply FIFO, completions
//!          (one watcher per queue; cancelled via the facade's token)
//!
//! every step ── publish(Event) ──► Bus ──► Injector listener ──► SubscriberSet
//! ```
//!
//! Internal modules:
//! - [`poller`]: gate predicates and the swappable readiness-watch seam;
//! - [`queue`]: ordered buffering, single-watcher polling, isolated flush;
//! - [`module`]: client-module wrapping and the source-loader seam;
//! - [`injector`]: the facade and its builder.

mod injector;
mod module;
mod poller;
mod queue;

pub use injector::{Injector, InjectorBuilder};
pub use module::{wrap_module, FsLoader, ModuleLoader, MODULE_CONFIG_PARAM};
pub use poller::{Gate, GateKind, IntervalPoller, ReadyWatch};
pub use queue::{DeferredQueue, Operation, PendingItem};
