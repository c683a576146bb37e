//! # Injector: the per-surface injection facade.
//!
//! One [`Injector`] exists per target surface and is passed explicitly to
//! consumers (dependency injection) - there is no module-wide singleton.
//!
//! ## Key responsibilities
//! - expose the injection operations (elements, scripts, styles, client
//!   modules, head-ready functions, body-event listeners)
//! - own the three deferred queues and their gates
//! - subscribe to the [`Bus`] and **fan-out** events via [`SubscriberSet`]
//! - stop watcher tasks and subscriber workers at shutdown
//!
//! ## Queue layout
//! ```text
//! inject_element / inject_script / inject_style / inject_module
//!                          │
//!                          ▼
//!                  scripts queue ──── Gate(head_ready), head_poll period
//!
//! run_on_head_ready ─► head_fns queue ── Gate(head_ready), head_poll period
//!
//! inject_body_event ─► body_events queue ─ Gate(body_ready), body_poll period
//! ```
//!
//! The two head-gated queues share a gate kind but buffer independently:
//! artifact insertion and function invocation are distinct operation kinds.
//! Across queues no relative ordering is guaranteed; within one queue,
//! submission order is application order.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::module::{wrap_module, FsLoader, ModuleLoader};
use crate::core::poller::{Gate, GateKind, IntervalPoller, ReadyWatch};
use crate::core::queue::{DeferredQueue, PendingItem};
use crate::error::InjectError;
use crate::events::Bus;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::surface::{Completion, Listener, Node, SurfaceRef};

/// Builder for constructing an [`Injector`] with optional features.
pub struct InjectorBuilder {
    surface: SurfaceRef,
    config: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    loader: Arc<dyn ModuleLoader>,
    head_watch: Option<Arc<dyn ReadyWatch>>,
    body_watch: Option<Arc<dyn ReadyWatch>>,
}

impl InjectorBuilder {
    /// Creates a new builder for the given surface with default config.
    pub fn new(surface: SurfaceRef) -> Self {
        Self {
            surface,
            config: Config::default(),
            subscribers: Vec::new(),
            loader: Arc::new(FsLoader),
            head_watch: None,
            body_watch: None,
        }
    }

    /// Sets the scheduler configuration (poll periods, bus capacity).
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive scheduler events (buffering, flushes, apply
    /// failures) through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Replaces the client-module source loader (default: filesystem).
    pub fn with_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Replaces the readiness watch for the head-gated queues.
    ///
    /// Hosts with a native mutation-observation mechanism can plug it in
    /// here; the default polls at [`Config::head_poll`].
    pub fn with_head_watch(mut self, watch: Arc<dyn ReadyWatch>) -> Self {
        self.head_watch = Some(watch);
        self
    }

    /// Replaces the readiness watch for the body-gated queue.
    pub fn with_body_watch(mut self, watch: Arc<dyn ReadyWatch>) -> Self {
        self.body_watch = Some(watch);
        self
    }

    /// Builds and returns the Injector instance.
    ///
    /// Initializes the event bus, the three deferred queues and (when
    /// subscribers were supplied) the fan-out listener. Must be called
    /// within a Tokio runtime.
    pub fn build(self) -> Arc<Injector> {
        let bus = Bus::new(self.config.bus_capacity_clamped());
        let token = CancellationToken::new();

        if !self.subscribers.is_empty() {
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            spawn_subscriber_listener(set, bus.clone(), token.clone());
        }

        let head_watch = self
            .head_watch
            .unwrap_or_else(|| Arc::new(IntervalPoller::new(self.config.head_poll_clamped())));
        let body_watch = self
            .body_watch
            .unwrap_or_else(|| Arc::new(IntervalPoller::new(self.config.body_poll_clamped())));

        let head_gate = {
            let s = Arc::clone(&self.surface);
            Gate::new(GateKind::Head, move || s.head_ready())
        };
        let fn_gate = {
            let s = Arc::clone(&self.surface);
            Gate::new(GateKind::Head, move || s.head_ready())
        };
        let body_gate = {
            let s = Arc::clone(&self.surface);
            Gate::new(GateKind::Body, move || s.body_ready())
        };

        Arc::new(Injector {
            scripts: DeferredQueue::new(
                head_gate,
                Arc::clone(&head_watch),
                bus.clone(),
                token.clone(),
            ),
            head_fns: DeferredQueue::new(fn_gate, head_watch, bus.clone(), token.clone()),
            body_events: DeferredQueue::new(body_gate, body_watch, bus.clone(), token.clone()),
            surface: self.surface,
            loader: self.loader,
            bus,
            token,
        })
    }
}

/// Forwards bus events to the subscriber set until shutdown.
fn spawn_subscriber_listener(set: SubscriberSet, bus: Bus, token: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = token.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
        }
        set.shutdown().await;
    });
}

/// Per-surface injection facade.
///
/// Lets a host inject scripts, stylesheets, whole client modules, one-shot
/// head-level functions and persistent body-event listeners into a surface
/// whose structural readiness changes asynchronously as the surface finishes
/// constructing itself.
///
/// Every operation is observably identical on the immediate and deferred
/// paths: the operation applies, then its completion (if any) runs.
///
/// # Example
/// ```no_run
/// use std::sync::Arc;
/// use domvisor::{Injector, SurfaceRef};
/// # fn surface() -> SurfaceRef { unimplemented!() }
///
/// # async fn demo() {
/// let surface: SurfaceRef = surface();
/// let injector = Injector::new(surface);
///
/// injector.inject_style("body { margin: 0; }", None);
/// injector.inject_script(
///     "window.__booted = true;",
///     Some(Box::new(|| println!("script landed"))),
/// );
/// injector.run_on_head_ready(|| println!("head exists now"));
/// injector.inject_body_event("click", Arc::new(|| println!("clicked")));
/// # }
/// ```
pub struct Injector {
    surface: SurfaceRef,
    scripts: DeferredQueue,
    head_fns: DeferredQueue,
    body_events: DeferredQueue,
    loader: Arc<dyn ModuleLoader>,
    bus: Bus,
    token: CancellationToken,
}

impl Injector {
    /// Creates an injector over `surface` with default configuration and no
    /// subscribers. Must be called within a Tokio runtime.
    pub fn new(surface: SurfaceRef) -> Arc<Self> {
        Self::builder(surface).build()
    }

    /// Returns a builder for constructing an injector with optional features.
    pub fn builder(surface: SurfaceRef) -> InjectorBuilder {
        InjectorBuilder::new(surface)
    }

    /// Injects an element into the head.
    ///
    /// Applies immediately when the head anchor already exists, otherwise
    /// buffers until it does. `completion` runs once, right after the node
    /// lands.
    pub fn inject_element(&self, node: Node, completion: Option<Completion>) {
        self.submit_head_node(node.label(), node, completion);
    }

    /// Injects raw script code into the head, verbatim.
    pub fn inject_script(&self, code: impl Into<String>, completion: Option<Completion>) {
        self.inject_element(Node::script(code), completion);
    }

    /// Injects a raw stylesheet into the head, verbatim.
    pub fn inject_style(&self, css: impl Into<String>, completion: Option<Completion>) {
        self.inject_element(Node::style(css), completion);
    }

    /// Injects a client module with no configuration payload.
    ///
    /// Reads the module source via the configured [`ModuleLoader`], wraps it
    /// so the module observes an `undefined` config parameter, and injects
    /// it as a script. On read failure returns
    /// [`InjectError::ModuleLoad`] identifying the path; `completion` is
    /// never invoked and no retry occurs.
    pub async fn inject_module(
        &self,
        path: impl AsRef<Path>,
        completion: Option<Completion>,
    ) -> Result<(), InjectError> {
        self.inject_module_inner(path.as_ref(), None, completion)
            .await
    }

    /// Injects a client module with a JSON-serializable configuration.
    ///
    /// The wrapped module receives `config` serialized to JSON as its single
    /// parameter. Failure semantics match [`Injector::inject_module`].
    pub async fn inject_module_with_config<C: Serialize>(
        &self,
        path: impl AsRef<Path>,
        config: &C,
        completion: Option<Completion>,
    ) -> Result<(), InjectError> {
        let json = serde_json::to_string(config).map_err(|source| InjectError::Config { source })?;
        self.inject_module_inner(path.as_ref(), Some(json), completion)
            .await
    }

    /// Runs `f` with no arguments exactly once, as soon as head-readiness
    /// holds - synchronously when the head anchor already exists, otherwise
    /// from the flush that observes it.
    pub fn run_on_head_ready(&self, f: impl FnOnce() + Send + 'static) {
        self.head_fns.submit(PendingItem::new(
            "head_fn",
            Box::new(move || {
                f();
                Ok(())
            }),
            None,
        ));
    }

    /// Registers a permanent body-event listener.
    ///
    /// Fire-and-forget: there is no completion and no way to unregister.
    /// The listener fires once per matching event for the remaining life of
    /// the surface, whether registration happened before or after the body
    /// anchor appeared.
    pub fn inject_body_event(&self, event: impl Into<String>, listener: Listener) {
        let event = event.into();
        let surface = Arc::clone(&self.surface);
        self.body_events.submit(PendingItem::new(
            "body_event",
            Box::new(move || surface.add_body_listener(&event, listener)),
            None,
        ));
    }

    /// Returns the event bus for attaching extra receivers (tests, hosts).
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Returns the target surface handle.
    pub fn surface(&self) -> &SurfaceRef {
        &self.surface
    }

    /// Stops watcher tasks and subscriber workers.
    ///
    /// Items still buffered at this point are dropped; this is process
    /// wind-down, not a per-item cancellation API (none exists). Also runs
    /// on drop.
    pub fn close(&self) {
        self.token.cancel();
    }

    async fn inject_module_inner(
        &self,
        path: &Path,
        config_json: Option<String>,
        completion: Option<Completion>,
    ) -> Result<(), InjectError> {
        let source =
            self.loader
                .read_text(path)
                .await
                .map_err(|source| InjectError::ModuleLoad {
                    path: path.to_path_buf(),
                    source,
                })?;
        let wrapped = wrap_module(&source, config_json.as_deref());
        self.submit_head_node("module", Node::script(wrapped), completion);
        Ok(())
    }

    fn submit_head_node(&self, label: &'static str, node: Node, completion: Option<Completion>) {
        let surface = Arc::clone(&self.surface);
        self.scripts.submit(PendingItem::new(
            label,
            Box::new(move || surface.append_to_head(node)),
            completion,
        ));
    }
}

impl Drop for Injector {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
