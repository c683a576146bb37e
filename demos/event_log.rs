//! # Example: event_log
//!
//! Watch the scheduler's event stream with the built-in [`LogWriter`]
//! subscriber (requires the `logging` feature).
//!
//! Demonstrates how to:
//! - Attach subscribers through [`InjectorBuilder::with_subscribers`].
//! - Read the buffer/poll/flush lifecycle off the event stream.
//!
//! ## Run
//! ```bash
//! cargo run --example event_log --features logging
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use domvisor::{InjectError, Injector, Listener, LogWriter, Node, Subscribe, Surface};

#[derive(Default)]
struct Page {
    head_ready: AtomicBool,
    body_ready: AtomicBool,
    head: Mutex<Vec<Node>>,
}

impl Surface for Page {
    fn head_ready(&self) -> bool {
        self.head_ready.load(Ordering::Acquire)
    }

    fn body_ready(&self) -> bool {
        self.body_ready.load(Ordering::Acquire)
    }

    fn append_to_head(&self, node: Node) -> Result<(), InjectError> {
        self.head.lock().unwrap().push(node);
        Ok(())
    }

    fn add_body_listener(&self, _event: &str, _listener: Listener) -> Result<(), InjectError> {
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let page = Arc::new(Page::default());
    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter)];
    let injector = Injector::builder(page.clone()).with_subscribers(subs).build();

    // Buffered: head not ready yet.
    injector.inject_script("boot();", None);
    injector.inject_style(".spinner { display: none }", None);

    // Body listener buffers independently on the slower body poller.
    injector.inject_body_event("click", Arc::new(|| {}));

    tokio::time::sleep(Duration::from_millis(30)).await;
    page.head_ready.store(true, Ordering::Release);
    tokio::time::sleep(Duration::from_millis(30)).await;
    page.body_ready.store(true, Ordering::Release);

    // Let the body poller (100ms period) catch up before exiting.
    tokio::time::sleep(Duration::from_millis(250)).await;
}
