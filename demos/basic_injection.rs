//! # Example: basic_injection
//!
//! Minimal example of injecting into a surface that becomes ready while
//! injections are already queued.
//!
//! Demonstrates how to:
//! - Implement [`Surface`] for a host-owned page double.
//! - Inject a style and a script before the head anchor exists.
//! - Observe the buffered items flushing, in order, once it does.
//!
//! ## Flow
//! ```text
//! inject_style / inject_script (head not ready)
//!     ├─► scripts queue buffers both items
//!     └─► one watcher polls head_ready every 10ms
//! host marks head ready
//!     └─► watcher flushes: style lands, script lands, completions fire
//! ```
//!
//! ## Run
//! ```bash
//! cargo run --example basic_injection
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use domvisor::{InjectError, Injector, Listener, Node, Surface};

/// A stand-in for a real render surface: the head "appears" when the host
/// flips the flag.
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
        println!("[page] head <- {}", node.label());
        self.head.lock().unwrap().push(node);
        Ok(())
    }

    fn add_body_listener(&self, event: &str, _listener: Listener) -> Result<(), InjectError> {
        println!("[page] body listener <- {event}");
        Ok(())
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // 1. The host owns the surface; the injector only observes it
    let page = Arc::new(Page::default());
    let injector = Injector::new(page.clone());

    // 2. Inject before the head exists: everything buffers
    injector.inject_style(
        "body { margin: 0 }",
        Some(Box::new(|| println!("[demo] style landed"))),
    );
    injector.inject_script(
        "window.__booted = true;",
        Some(Box::new(|| println!("[demo] script landed"))),
    );
    injector.run_on_head_ready(|| println!("[demo] head is ready"));
    println!("[demo] submitted 3 operations, head not ready yet");

    // 3. Simulate the surface finishing construction a little later
    tokio::time::sleep(Duration::from_millis(50)).await;
    page.head_ready.store(true, Ordering::Release);
    println!("[demo] head anchor appeared");

    // 4. Give the pollers a tick to notice and flush
    tokio::time::sleep(Duration::from_millis(50)).await;
    println!("[demo] head now holds {} nodes", page.head.lock().unwrap().len());

    // 5. The gate stays open: this applies synchronously
    injector.inject_script("console.log('late');", None);
    println!("[demo] head now holds {} nodes", page.head.lock().unwrap().len());
}
