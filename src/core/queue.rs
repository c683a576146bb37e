//! # DeferredQueue: ordered buffering behind a readiness gate.
//!
//! A [`DeferredQueue`] accepts operations against the target surface and
//! either applies them immediately (gate already open) or buffers them until
//! a [`ReadyWatch`] observes the gate opening, then flushes the whole buffer
//! in submission order, exactly once per item.
//!
//! ## State machine
//! ```text
//!            submit, gate closed
//!   Idle ───────────────────────────► Buffering
//!   (empty,                           (non-empty,
//!    no watcher)   ◄───────────────    one watcher)
//!                      flush
//! ```
//!
//! ## Rules
//! - **Single watcher**: at most one watcher task exists per queue at any
//!   instant; the check happens under the state mutex, so submission bursts
//!   never start a second one.
//! - **FIFO flush**: buffered items are applied in the exact order submitted;
//!   each item's completion runs immediately after its own operation, not
//!   batched at the end.
//! - **Isolation**: an operation that fails or panics, or a completion that
//!   panics, is contained to that item - the rest of the buffer still runs.
//!   Failures surface as [`ApplyFailed`](crate::EventKind::ApplyFailed) /
//!   [`CompletionPanicked`](crate::EventKind::CompletionPanicked) events.
//! - **No cancellation**: once submitted, a buffered item runs as soon as its
//!   gate opens; there is no API to withdraw it. The facade's token only
//!   stops watcher tasks at process wind-down.
//!
//! Buffered items are applied **outside** the state lock, so a completion
//! that re-enters `submit` sees an empty queue with an open gate and takes
//! the immediate-apply fast path.

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::core::poller::{Gate, ReadyWatch};
use crate::error::InjectError;
use crate::events::{Bus, Event, EventKind};
use crate::surface::Completion;

/// A deferred action against the target surface.
pub type Operation = Box<dyn FnOnce() -> Result<(), InjectError> + Send + 'static>;

/// An ordered pair of operation and optional completion, plus a label for
/// events/logs.
///
/// Created when an operation is submitted; consumed exactly once, in FIFO
/// order, when its queue applies it.
pub struct PendingItem {
    label: &'static str,
    operation: Operation,
    completion: Option<Completion>,
}

impl PendingItem {
    /// Creates a pending item.
    ///
    /// `label` is a short operation tag (`"script"`, `"body_event"`, ...)
    /// carried on every event this item produces.
    pub fn new(label: &'static str, operation: Operation, completion: Option<Completion>) -> Self {
        Self {
            label,
            operation,
            completion,
        }
    }

    /// Returns the operation label.
    pub fn label(&self) -> &'static str {
        self.label
    }
}

/// Queue state guarded by one mutex.
///
/// Invariant: `watcher` is `Some` iff `pending` is non-empty and readiness
/// has not yet been observed.
#[derive(Default)]
struct State {
    pending: VecDeque<PendingItem>,
    watcher: Option<JoinHandle<()>>,
}

struct QueueInner {
    gate: Gate,
    watch: Arc<dyn ReadyWatch>,
    bus: Bus,
    token: CancellationToken,
    state: Mutex<State>,
}

/// Ordered, readiness-gated buffer of operations.
///
/// Cheap to clone (internally `Arc`). One queue exists per gating condition
/// for the lifetime of the facade; it cycles between idle and buffering
/// indefinitely as new operations arrive after a prior flush.
#[derive(Clone)]
pub struct DeferredQueue {
    inner: Arc<QueueInner>,
}

impl DeferredQueue {
    /// Creates a queue over `gate`, watched by `watch`.
    ///
    /// `token` stops the watcher task at facade shutdown; it never cancels
    /// individual items.
    pub fn new(gate: Gate, watch: Arc<dyn ReadyWatch>, bus: Bus, token: CancellationToken) -> Self {
        Self {
            inner: Arc::new(QueueInner {
                gate,
                watch,
                bus,
                token,
                state: Mutex::new(State::default()),
            }),
        }
    }

    /// Submits an operation.
    ///
    /// - Gate open: applies the item synchronously before returning (after
    ///   draining anything still buffered, so application order always
    ///   matches submission order).
    /// - Gate closed: buffers the item and ensures exactly one watcher task
    ///   is polling the gate.
    pub fn submit(&self, item: PendingItem) {
        if self.inner.gate.is_open() {
            // The gate may have opened between watcher ticks; older buffered
            // items must still be applied first.
            self.flush();
            self.apply(item);
            return;
        }

        let kind = self.inner.gate.kind();
        let label = item.label;
        let (buffered, started) = {
            let mut st = self.lock_state();
            st.pending.push_back(item);
            let n = st.pending.len();
            let started = if st.watcher.is_none() {
                st.watcher = Some(self.spawn_watcher());
                true
            } else {
                false
            };
            (n, started)
        };

        self.inner.bus.publish(
            Event::new(EventKind::Buffered)
                .with_gate(kind)
                .with_op(label)
                .with_pending(buffered),
        );
        if started {
            self.inner
                .bus
                .publish(Event::new(EventKind::PollStarted).with_gate(kind));
        }
    }

    /// Drains and applies every buffered item in submission order.
    ///
    /// The buffer and the watcher handle are cleared atomically under the
    /// state lock; application happens outside it. Items submitted while the
    /// flush is running are fresh submissions against the now-empty queue
    /// and, the gate being open, take the fast path.
    pub fn flush(&self) {
        let drained: Vec<PendingItem> = {
            let mut st = self.lock_state();
            if st.pending.is_empty() {
                return;
            }
            if let Some(handle) = st.watcher.take() {
                // When the watcher itself flushes this aborts its own task,
                // which only takes effect at its next await - after the
                // flush has completed.
                handle.abort();
            }
            st.pending.drain(..).collect()
        };

        self.inner.bus.publish(
            Event::new(EventKind::Flushed)
                .with_gate(self.inner.gate.kind())
                .with_pending(drained.len()),
        );

        for item in drained {
            self.apply(item);
        }
    }

    /// Number of currently buffered items.
    pub fn pending(&self) -> usize {
        self.lock_state().pending.len()
    }

    /// True if a watcher task is currently polling the gate.
    pub fn watching(&self) -> bool {
        self.lock_state().watcher.is_some()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        // A poisoning panic can only originate outside the lock (operations
        // run unlocked), so recovery is safe.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn spawn_watcher(&self) -> JoinHandle<()> {
        let q = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = q.inner.token.cancelled() => {}
                _ = q.inner.watch.wait_ready(&q.inner.gate) => {
                    q.inner.bus.publish(
                        Event::new(EventKind::GateOpen).with_gate(q.inner.gate.kind()),
                    );
                    q.flush();
                }
            }
        })
    }

    /// Applies one item: operation first, then its completion.
    ///
    /// Errors and panics are contained to the item and published on the bus;
    /// a failed operation's completion is not invoked.
    fn apply(&self, item: PendingItem) {
        let PendingItem {
            label,
            operation,
            completion,
        } = item;
        let kind = self.inner.gate.kind();

        match catch_unwind(AssertUnwindSafe(operation)) {
            Ok(Ok(())) => {
                self.inner.bus.publish(
                    Event::new(EventKind::Applied)
                        .with_gate(kind)
                        .with_op(label),
                );
            }
            Ok(Err(err)) => {
                self.inner.bus.publish(
                    Event::new(EventKind::ApplyFailed)
                        .with_gate(kind)
                        .with_op(label)
                        .with_reason(err.as_message()),
                );
                return;
            }
            Err(panic) => {
                self.inner.bus.publish(
                    Event::new(EventKind::ApplyFailed)
                        .with_gate(kind)
                        .with_op(label)
                        .with_reason(panic_message(panic)),
                );
                return;
            }
        }

        if let Some(done) = completion {
            if let Err(panic) = catch_unwind(AssertUnwindSafe(done)) {
                self.inner.bus.publish(
                    Event::new(EventKind::CompletionPanicked)
                        .with_gate(kind)
                        .with_op(label)
                        .with_reason(panic_message(panic)),
                );
            }
        }
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "opaque panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::poller::{GateKind, IntervalPoller};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn queue_over(flag: Arc<AtomicBool>, period_ms: u64) -> DeferredQueue {
        let gate = Gate::new(GateKind::Head, move || flag.load(Ordering::Acquire));
        DeferredQueue::new(
            gate,
            Arc::new(IntervalPoller::new(Duration::from_millis(period_ms))),
            Bus::new(64),
            CancellationToken::new(),
        )
    }

    fn recording_item(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> PendingItem {
        let op_log = Arc::clone(log);
        let done_log = Arc::clone(log);
        PendingItem::new(
            tag,
            Box::new(move || {
                op_log.lock().unwrap().push(format!("op:{tag}"));
                Ok(())
            }),
            Some(Box::new(move || {
                done_log.lock().unwrap().push(format!("done:{tag}"));
            })),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_gate_buffers_then_flushes_fifo() {
        let flag = Arc::new(AtomicBool::new(false));
        let q = queue_over(Arc::clone(&flag), 10);
        let log = Arc::new(Mutex::new(Vec::new()));

        q.submit(recording_item(&log, "a"));
        q.submit(recording_item(&log, "b"));
        q.submit(recording_item(&log, "c"));
        assert_eq!(q.pending(), 3);
        assert!(log.lock().unwrap().is_empty());

        flag.store(true, Ordering::Release);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(
            *log.lock().unwrap(),
            vec!["op:a", "done:a", "op:b", "done:b", "op:c", "done:c"]
        );
        assert_eq!(q.pending(), 0);
        assert!(!q.watching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_gate_applies_synchronously() {
        let q = queue_over(Arc::new(AtomicBool::new(true)), 10);
        let log = Arc::new(Mutex::new(Vec::new()));

        q.submit(recording_item(&log, "x"));
        // No awaiting: the fast path already ran both the op and completion.
        assert_eq!(*log.lock().unwrap(), vec!["op:x", "done:x"]);
        assert_eq!(q.pending(), 0);
        assert!(!q.watching());
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_starts_only_one_watcher() {
        let flag = Arc::new(AtomicBool::new(false));
        let q = queue_over(Arc::clone(&flag), 10);
        let mut rx = q.inner.bus.subscribe();
        let log = Arc::new(Mutex::new(Vec::new()));

        for _ in 0..50 {
            q.submit(recording_item(&log, "n"));
        }
        assert!(q.watching());

        let mut poll_started = 0;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::PollStarted {
                poll_started += 1;
            }
        }
        assert_eq!(poll_started, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failing_item_does_not_starve_the_rest() {
        let flag = Arc::new(AtomicBool::new(false));
        let q = queue_over(Arc::clone(&flag), 10);
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut rx = q.inner.bus.subscribe();

        q.submit(PendingItem::new(
            "bad_err",
            Box::new(|| {
                Err(InjectError::Apply {
                    op: "bad_err",
                    reason: "rejected".into(),
                })
            }),
            Some(Box::new(|| panic!("completion must not run"))),
        ));
        q.submit(PendingItem::new(
            "bad_panic",
            Box::new(|| panic!("boom")),
            None,
        ));
        q.submit(recording_item(&log, "good"));

        flag.store(true, Ordering::Release);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*log.lock().unwrap(), vec!["op:good", "done:good"]);

        let mut failed = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::ApplyFailed {
                failed.push(ev.op.as_deref().unwrap().to_string());
            }
        }
        assert_eq!(failed, vec!["bad_err", "bad_panic"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_panicking_completion_is_isolated() {
        let flag = Arc::new(AtomicBool::new(false));
        let q = queue_over(Arc::clone(&flag), 10);
        let log = Arc::new(Mutex::new(Vec::new()));

        q.submit(PendingItem::new(
            "first",
            Box::new(|| Ok(())),
            Some(Box::new(|| panic!("completion boom"))),
        ));
        q.submit(recording_item(&log, "second"));

        flag.store(true, Ordering::Release);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*log.lock().unwrap(), vec!["op:second", "done:second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reentrant_submission_from_completion_takes_fast_path() {
        let flag = Arc::new(AtomicBool::new(false));
        let q = queue_over(Arc::clone(&flag), 10);
        let log = Arc::new(Mutex::new(Vec::<String>::new()));

        let q2 = q.clone();
        let inner_log = Arc::clone(&log);
        let outer_log = Arc::clone(&log);
        q.submit(PendingItem::new(
            "outer",
            Box::new(move || {
                outer_log.lock().unwrap().push("op:outer".into());
                Ok(())
            }),
            Some(Box::new(move || {
                let il = Arc::clone(&inner_log);
                q2.submit(PendingItem::new(
                    "inner",
                    Box::new(move || {
                        il.lock().unwrap().push("op:inner".into());
                        Ok(())
                    }),
                    None,
                ));
            })),
        ));

        flag.store(true, Ordering::Release);
        tokio::time::sleep(Duration::from_millis(20)).await;

        assert_eq!(*log.lock().unwrap(), vec!["op:outer", "op:inner"]);
        assert_eq!(q.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_queue_cycles_idle_buffering_idle() {
        let flag = Arc::new(AtomicBool::new(false));
        let q = queue_over(Arc::clone(&flag), 10);
        let log = Arc::new(Mutex::new(Vec::new()));

        q.submit(recording_item(&log, "one"));
        flag.store(true, Ordering::Release);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!q.watching());

        // Gate stays open; later submissions run synchronously.
        q.submit(recording_item(&log, "two"));
        assert_eq!(
            *log.lock().unwrap(),
            vec!["op:one", "done:one", "op:two", "done:two"]
        );
    }
}
