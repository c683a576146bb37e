//! # Readiness gates and the polling watch.
//!
//! This module defines [`Gate`] (a labeled, monotonic readiness predicate
//! over the target surface) and [`ReadyWatch`], the seam behind which the
//! "wait until the precondition holds" mechanism lives.
//!
//! The structural readiness of a surface comes with no guaranteed
//! notification, so the default implementation, [`IntervalPoller`], simply
//! re-evaluates the gate on a fixed period. Because the seam is a trait, a
//! host with a native mutation-observation mechanism can swap in its own
//! implementation without touching [`DeferredQueue`](crate::DeferredQueue)
//! or the facade.
//!
//! ## Contract
//! - The gate predicate is assumed total and side-effect-free.
//! - `wait_ready` evaluates the gate no more often than every period.
//! - `wait_ready` never completes synchronously, even if the gate is already
//!   open at call time: the first evaluation happens only after one full
//!   period. Readiness-already-true is handled by the queue's fast path,
//!   never by starting a watch.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

/// Which structural anchor a gate is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    /// The head anchor exists.
    Head,
    /// The body anchor exists.
    Body,
}

impl GateKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            GateKind::Head => "head",
            GateKind::Body => "body",
        }
    }
}

/// A labeled readiness predicate.
///
/// Gates are **monotonic**: once open, they stay open for the lifetime of
/// the surface. The scheduler relies on this - a flush never re-checks the
/// gate per item.
#[derive(Clone)]
pub struct Gate {
    kind: GateKind,
    predicate: Arc<dyn Fn() -> bool + Send + Sync>,
}

impl Gate {
    /// Creates a gate from a predicate.
    ///
    /// The predicate must be total, side-effect-free, and monotonic
    /// (false-then-permanently-true).
    pub fn new(kind: GateKind, predicate: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            kind,
            predicate: Arc::new(predicate),
        }
    }

    /// Evaluates the predicate.
    #[inline]
    pub fn is_open(&self) -> bool {
        (self.predicate)()
    }

    /// Returns the gate's anchor kind.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gate").field("kind", &self.kind).finish()
    }
}

/// # Seam for "complete once the gate opens".
///
/// The default is [`IntervalPoller`]; custom implementations may use any
/// notification mechanism as long as they honor the module contract
/// (periodic evaluation at most, never synchronous completion).
#[async_trait]
pub trait ReadyWatch: Send + Sync + 'static {
    /// Completes on the first observed open state of `gate`.
    async fn wait_ready(&self, gate: &Gate);
}

/// Fixed-period polling watch.
///
/// Sleeps one period, then evaluates the gate; repeats until the gate is
/// observed open. The period comes from [`Config`](crate::Config) - timing
/// literals never live in queue or facade code.
#[derive(Debug, Clone)]
pub struct IntervalPoller {
    period: Duration,
}

impl IntervalPoller {
    /// Creates a poller with the given period.
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    /// Returns the poll period.
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[async_trait]
impl ReadyWatch for IntervalPoller {
    async fn wait_ready(&self, gate: &Gate) {
        loop {
            tokio::time::sleep(self.period).await;
            if gate.is_open() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

    #[test]
    fn test_gate_reflects_predicate() {
        let flag = Arc::new(AtomicBool::new(false));
        let f = Arc::clone(&flag);
        let gate = Gate::new(GateKind::Head, move || f.load(Ordering::Acquire));
        assert!(!gate.is_open());
        flag.store(true, Ordering::Release);
        assert!(gate.is_open());
        assert_eq!(gate.kind(), GateKind::Head);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_never_completes_before_one_period() {
        let gate = Gate::new(GateKind::Head, || true);
        let poller = IntervalPoller::new(Duration::from_millis(10));

        let wait = tokio::spawn(async move { poller.wait_ready(&gate).await });
        // Even with the gate already open, the watch needs one period.
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!wait.is_finished());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(wait.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn test_poller_checks_once_per_period() {
        let checks = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&checks);
        let gate = Gate::new(GateKind::Body, move || {
            c.fetch_add(1, Ordering::AcqRel);
            false
        });
        let poller = IntervalPoller::new(Duration::from_millis(100));

        let wait = tokio::spawn(async move { poller.wait_ready(&gate).await });
        tokio::time::sleep(Duration::from_millis(350)).await;
        assert_eq!(checks.load(Ordering::Acquire), 3);
        wait.abort();
    }
}
