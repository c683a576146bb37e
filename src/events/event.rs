//! # Scheduler events emitted by the deferred queues and the facade.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Queue lifecycle**: buffering, polling, gate opening, flushing
//! - **Application outcomes**: per-item apply success/failure
//! - **Subscriber events**: fan-out worker overflow/panic
//!
//! The [`Event`] struct carries additional metadata such as timestamps, the
//! gate a queue is keyed on, the operation label and failure reasons.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.
//!
//! ## Example
//! ```rust
//! use domvisor::{Event, EventKind, GateKind};
//!
//! let ev = Event::new(EventKind::ApplyFailed)
//!     .with_gate(GateKind::Head)
//!     .with_op("script")
//!     .with_reason("surface rejected node");
//!
//! assert_eq!(ev.kind, EventKind::ApplyFailed);
//! assert_eq!(ev.gate, Some(GateKind::Head));
//! assert_eq!(ev.op.as_deref(), Some("script"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::core::GateKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of scheduler events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Queue lifecycle events ===
    /// An operation was submitted while its gate was closed and buffered.
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `op`: operation label
    /// - `pending`: buffer length after the append
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Buffered,

    /// A watcher task started polling the gate for this queue.
    ///
    /// Exactly one watcher runs per queue while its buffer is non-empty.
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    PollStarted,

    /// The watcher observed the gate open.
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    GateOpen,

    /// A queue drained its buffer (in submission order).
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `pending`: number of items drained
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Flushed,

    // === Application outcomes ===
    /// An operation was applied to the surface (immediately or from a flush).
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `op`: operation label
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    Applied,

    /// An operation failed or panicked; remaining buffered items still run.
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `op`: operation label
    /// - `reason`: error message or panic info
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    ApplyFailed,

    /// A completion callback panicked after its operation was applied.
    ///
    /// Sets:
    /// - `gate`: the queue's gate kind
    /// - `op`: operation label
    /// - `reason`: panic info
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    CompletionPanicked,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `op`: subscriber name
    /// - `reason`: panic info/message
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `op`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    /// - `at`: wall-clock timestamp
    /// - `seq`: global sequence
    SubscriberOverflow,
}

/// A scheduler event with metadata.
///
/// Constructed with [`Event::new`] and enriched with `with_*` builder
/// methods. Cheap to clone: string payloads are `Arc<str>`.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,
    /// Wall-clock timestamp at construction.
    pub at: SystemTime,
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Gate kind of the queue this event belongs to, if any.
    pub gate: Option<GateKind>,
    /// Short operation label (`"element"`, `"script"`, `"style"`,
    /// `"module"`, `"head_fn"`, `"body_event"`) or subscriber name.
    pub op: Option<Arc<str>>,
    /// Human-readable failure reason or panic info.
    pub reason: Option<Arc<str>>,
    /// Buffer length associated with the event (buffered/flushed counts).
    pub pending: Option<usize>,
}

impl Event {
    /// Creates a new event of the given kind, stamped with the current time
    /// and the next global sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            gate: None,
            op: None,
            reason: None,
            pending: None,
        }
    }

    /// Attaches the gate kind of the originating queue.
    #[inline]
    pub fn with_gate(mut self, gate: GateKind) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Attaches an operation label (or subscriber name).
    #[inline]
    pub fn with_op(mut self, op: impl Into<Arc<str>>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a buffer length.
    #[inline]
    pub fn with_pending(mut self, n: usize) -> Self {
        self.pending = Some(n);
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_op(subscriber)
            .with_reason(reason)
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_op(subscriber)
            .with_reason(info)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_strictly_increasing() {
        let a = Event::new(EventKind::Buffered);
        let b = Event::new(EventKind::Flushed);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::new(EventKind::Buffered)
            .with_gate(GateKind::Body)
            .with_op("body_event")
            .with_pending(3);
        assert_eq!(ev.gate, Some(GateKind::Body));
        assert_eq!(ev.op.as_deref(), Some("body_event"));
        assert_eq!(ev.pending, Some(3));
        assert!(ev.reason.is_none());
    }
}
