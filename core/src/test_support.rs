//! Helpers shared by the unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// Counts events at one level while it is the active subscriber.
#[derive(Clone)]
pub(crate) struct EventCounter {
    level: Level,
    seen: Arc<AtomicUsize>,
}

impl EventCounter {
    pub(crate) fn new(level: Level) -> Self {
        Self {
            level,
            seen: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub(crate) fn count(&self) -> usize {
        self.seen.load(Ordering::SeqCst)
    }

    /// Run `f` with this counter as the thread's subscriber.
    pub(crate) fn watch<R>(&self, f: impl FnOnce() -> R) -> R {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    /// Make this counter the thread's subscriber until the guard drops.
    /// Suits single-threaded async tests.
    pub(crate) fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::set_default(subscriber)
    }
}

impl<S: Subscriber> Layer<S> for EventCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == self.level {
            self.seen.fetch_add(1, Ordering::SeqCst);
        }
    }
}
