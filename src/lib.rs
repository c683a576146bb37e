//! # domvisor
//!
//! **Domvisor** is a deferred, readiness-gated injection scheduler for Rust.
//!
//! It lets a host inject scripts, stylesheets, whole client modules,
//! one-shot head-level functions and persistent event listeners into a
//! render surface (a document tree) whose structural readiness - does it
//! yet have a head node? a body node? - is not under the caller's control
//! and changes asynchronously as the surface finishes constructing itself.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     caller
//!        │ inject_script / inject_style / inject_module /
//!        │ run_on_head_ready / inject_body_event
//!        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Injector (per-surface facade)                                    │
//! │  - scripts     : DeferredQueue, Gate(head_ready)                  │
//! │  - head_fns    : DeferredQueue, Gate(head_ready)                  │
//! │  - body_events : DeferredQueue, Gate(body_ready)                  │
//! │  - Bus (broadcast events) + SubscriberSet (fan-out)               │
//! └──────┬──────────────────────┬─────────────────────────┬──────────┘
//!        ▼                      ▼                         ▼
//!   gate open?             gate closed:              ReadyWatch
//!   apply now,             buffer item,              (IntervalPoller)
//!   run completion         ensure ONE watcher  ───►  polls gate, then
//!                                                    flush FIFO
//! ```
//!
//! ### Submission lifecycle
//! ```text
//! submit(operation, completion)
//!   ├─ gate open  ──► apply(operation) ──► completion()        (synchronous)
//!   │
//!   └─ gate closed ─► pending.push_back(item)
//!            │        watcher already running? ── yes ─► done
//!            │                                └── no ──► spawn watcher
//!            ▼
//!        watcher: sleep(period) ─► gate open? ── no ─► sleep again
//!                                        └ yes ─► flush:
//!                                            for item in pending (FIFO):
//!                                              apply(op) ─► completion()
//!                                            (errors isolated per item)
//! ```
//!
//! ## Features
//! | Area              | Description                                                          | Key types / traits                  |
//! |-------------------|----------------------------------------------------------------------|--------------------------------------|
//! | **Facade**        | Inject elements, scripts, styles, modules, functions, listeners.    | [`Injector`], [`InjectorBuilder`]    |
//! | **Queues**        | Ordered buffering behind a readiness gate, exactly-once flush.      | [`DeferredQueue`], [`PendingItem`]   |
//! | **Readiness**     | Swappable "wait until the gate opens" seam; default polls.          | [`ReadyWatch`], [`IntervalPoller`]   |
//! | **Surface seam**  | Host-owned render surface: readiness + mutation primitives.         | [`Surface`], [`Node`]                |
//! | **Modules**       | Wrap external code units with a JSON config payload.                | [`ModuleLoader`], [`wrap_module`]    |
//! | **Subscriber API**| Hook into scheduler events (logging, metrics, custom subscribers).  | [`Subscribe`], [`Bus`]               |
//! | **Errors**        | Typed errors for loading and application failures.                  | [`InjectError`]                      |
//! | **Configuration** | Centralize poll periods and bus capacity.                           | [`Config`]                           |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicBool, Ordering};
//! use std::sync::{Arc, Mutex};
//! use std::time::Duration;
//! use domvisor::{InjectError, Injector, Listener, Node, Surface};
//!
//! // A host-owned surface that becomes ready asynchronously.
//! #[derive(Default)]
//! struct Page {
//!     head_ready: AtomicBool,
//!     head: Mutex<Vec<Node>>,
//! }
//!
//! impl Surface for Page {
//!     fn head_ready(&self) -> bool {
//!         self.head_ready.load(Ordering::Acquire)
//!     }
//!     fn body_ready(&self) -> bool {
//!         false
//!     }
//!     fn append_to_head(&self, node: Node) -> Result<(), InjectError> {
//!         self.head.lock().unwrap().push(node);
//!         Ok(())
//!     }
//!     fn add_body_listener(&self, _: &str, _: Listener) -> Result<(), InjectError> {
//!         unreachable!("this page never reports body readiness")
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let page = Arc::new(Page::default());
//!     let injector = Injector::new(page.clone());
//!
//!     // Submitted before the head exists: buffered, nothing applied yet.
//!     injector.inject_style("body { margin: 0 }", None);
//!     injector.inject_script("window.__booted = true;", None);
//!     assert!(page.head.lock().unwrap().is_empty());
//!
//!     // The surface finishes constructing itself; the poller notices and
//!     // flushes in submission order.
//!     page.head_ready.store(true, Ordering::Release);
//!     tokio::time::sleep(Duration::from_millis(100)).await;
//!     assert_eq!(page.head.lock().unwrap().len(), 2);
//!
//!     // From here on the gate is open and injections apply synchronously.
//!     injector.inject_style(".late { display: none }", None);
//!     assert_eq!(page.head.lock().unwrap().len(), 3);
//! }
//! ```

mod config;
mod core;
mod error;
mod events;
mod subscribers;
mod surface;

// ---- Public re-exports ----

pub use config::Config;
pub use core::{
    wrap_module, DeferredQueue, FsLoader, Gate, GateKind, Injector, InjectorBuilder,
    IntervalPoller, ModuleLoader, Operation, PendingItem, ReadyWatch, MODULE_CONFIG_PARAM,
};
pub use error::InjectError;
pub use events::{Bus, Event, EventKind};
pub use subscribers::{Subscribe, SubscriberSet};
pub use surface::{Completion, Listener, Node, Surface, SurfaceRef};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
