//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//! This is primarily useful for development, debugging, and examples.
//!
//! ## Output format
//! ```text
//! [buffered] gate=head op=script pending=2
//! [poll-started] gate=head
//! [gate-open] gate=head
//! [flushed] gate=head pending=2
//! [applied] gate=head op=script
//! [apply-failed] gate=head op=element reason="surface rejected node"
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Prints human-readable event
/// descriptions to stdout for debugging and demonstration purposes.
///
/// Not intended for production use - implement a custom [`Subscribe`] for
/// structured logging or metrics collection.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        match e.kind {
            EventKind::Buffered => {
                println!(
                    "[buffered] gate={:?} op={:?} pending={:?}",
                    e.gate, e.op, e.pending
                );
            }
            EventKind::PollStarted => {
                println!("[poll-started] gate={:?}", e.gate);
            }
            EventKind::GateOpen => {
                println!("[gate-open] gate={:?}", e.gate);
            }
            EventKind::Flushed => {
                println!("[flushed] gate={:?} pending={:?}", e.gate, e.pending);
            }
            EventKind::Applied => {
                println!("[applied] gate={:?} op={:?}", e.gate, e.op);
            }
            EventKind::ApplyFailed => {
                println!(
                    "[apply-failed] gate={:?} op={:?} reason={:?}",
                    e.gate, e.op, e.reason
                );
            }
            EventKind::CompletionPanicked => {
                println!(
                    "[completion-panicked] gate={:?} op={:?} reason={:?}",
                    e.gate, e.op, e.reason
                );
            }
            EventKind::SubscriberPanicked => {
                println!("[subscriber-panicked] name={:?} reason={:?}", e.op, e.reason);
            }
            EventKind::SubscriberOverflow => {
                println!("[subscriber-overflow] name={:?} reason={:?}", e.op, e.reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
