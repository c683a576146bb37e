//! # Global scheduler configuration.
//!
//! Provides [`Config`], centralized settings for the injection scheduler.
//!
//! Config is consumed at facade construction:
//! `Injector::builder(surface).with_config(config)`. `Injector::new(surface)`
//! uses the defaults below.
//!
//! ## Sentinel values
//! - `head_poll = 0` / `body_poll = 0` → clamped up to 1 ms (a zero-period
//!   poller would spin the executor)
//! - `bus_capacity = 0` → clamped up to 1 by the Bus

use std::time::Duration;

/// Global configuration for an [`Injector`](crate::Injector).
///
/// Defines:
/// - **Poll periods**: how often each readiness gate is re-checked
/// - **Event system**: bus capacity for event delivery
///
/// ## Field semantics
/// - `head_poll`: period of the head-readiness pollers. The head anchor
///   settles early in surface construction, so this period is short.
/// - `body_poll`: period of the body-readiness poller. Body construction
///   typically lags head construction, so this period is longer.
/// - `bus_capacity`: event bus ring buffer size (min 1; clamped by Bus).
///
/// Poll periods live here and nowhere else; queue and poller code never
/// hard-codes a timing literal.
#[derive(Clone, Debug)]
pub struct Config {
    /// Poll period for head-gated queues (elements/scripts/styles and
    /// head-ready functions).
    pub head_poll: Duration,

    /// Poll period for the body-gated queue (persistent event listeners).
    pub body_poll: Duration,

    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages
    /// will receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl Config {
    /// Returns the head poll period clamped to a minimum of 1 ms.
    #[inline]
    pub fn head_poll_clamped(&self) -> Duration {
        self.head_poll.max(Duration::from_millis(1))
    }

    /// Returns the body poll period clamped to a minimum of 1 ms.
    #[inline]
    pub fn body_poll_clamped(&self) -> Duration {
        self.body_poll.max(Duration::from_millis(1))
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    ///
    /// The `Bus` should use this value to avoid constructing an invalid
    /// channel.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `head_poll = 10ms` (head anchors settle fast)
    /// - `body_poll = 100ms` (body construction lags head)
    /// - `bus_capacity = 1024` (good baseline)
    fn default() -> Self {
        Self {
            head_poll: Duration::from_millis(10),
            body_poll: Duration::from_millis(100),
            bus_capacity: 1024,
        }
    }
}
