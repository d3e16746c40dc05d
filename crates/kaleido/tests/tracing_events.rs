//! The runtime reports commits, scope registration and rejected undos
//! through `tracing`.

use std::sync::{Arc, Mutex};

use kaleido::prelude::*;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::Registry;

#[derive(Clone, Default)]
struct Captured {
    events: Arc<Mutex<Vec<(Level, String)>>>,
}

struct MessageVisitor<'a>(&'a mut String);

impl tracing::field::Visit for MessageVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            *self.0 = format!("{value:?}");
        }
    }
}

impl<S: Subscriber> Layer<S> for Captured {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut message = String::new();
        event.record(&mut MessageVisitor(&mut message));
        if let Ok(mut events) = self.events.lock() {
            events.push((*event.metadata().level(), message));
        }
    }
}

impl Captured {
    fn count(&self, level: Level, message: &str) -> usize {
        self.events
            .lock()
            .map(|events| {
                events
                    .iter()
                    .filter(|(l, m)| *l == level && m == message)
                    .count()
            })
            .unwrap_or(0)
    }
}

fn with_capture(f: impl FnOnce()) -> Captured {
    let captured = Captured::default();
    let subscriber = Registry::default().with(captured.clone());
    tracing::subscriber::with_default(subscriber, f);
    captured
}

#[test]
fn one_trace_event_per_commit() {
    let captured = with_capture(|| {
        let store = Store::new();
        let a = store.scope(path!["a"]);
        a.set(1);
        a.update(|_| Value::Int(2));
        store.undo(1).unwrap();
    });
    assert_eq!(captured.count(Level::TRACE, "commit"), 3);
}

#[test]
fn scope_registration_logged_once_per_path() {
    let captured = with_capture(|| {
        let store = Store::new();
        let _ = store.scope(path!["a"]);
        let _ = store.scope(path!["a"]);
        let _ = store.scope(path!["b"]);
    });
    assert_eq!(captured.count(Level::DEBUG, "registered scope"), 2);
}

#[test]
fn rejected_undo_warns() {
    let captured = with_capture(|| {
        let store = Store::new();
        assert!(store.undo(3).is_err());
    });
    assert_eq!(captured.count(Level::WARN, "undo out of range"), 1);
}
