//! Warning capture for log assertions.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Collects the messages of every `WARN` event.
#[derive(Clone, Default)]
pub struct WarningCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl WarningCapture {
    /// Number of warnings seen so far.
    pub fn count(&self) -> usize {
        self.messages.lock().len()
    }

    /// The captured warning messages, in order.
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

struct MessageVisitor(String);

impl Visit for MessageVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.0 = format!("{:?}", value);
        }
    }
}

impl<S: Subscriber> Layer<S> for WarningCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            let mut visitor = MessageVisitor(String::new());
            event.record(&mut visitor);
            self.messages.lock().push(visitor.0);
        }
    }
}

/// Installs a capturing subscriber for the current thread.
///
/// Use with current-thread runtimes so spawned lookups log on the same
/// thread. Capture stops when the guard is dropped.
pub fn capture_warnings() -> (WarningCapture, DefaultGuard) {
    let capture = WarningCapture::default();
    let subscriber = tracing_subscriber::registry().with(capture.clone());
    let guard = tracing::subscriber::set_default(subscriber);
    (capture, guard)
}
