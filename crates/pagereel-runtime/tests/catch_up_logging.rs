#![forbid(unsafe_code)]

//! A host that stalls for a long time gets bounded catch-up, one warning,
//! and a merged message that still accounts for every elapsed interval.
//!
//! Run:
//!   cargo test -p pagereel-runtime --test catch_up_logging

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pagereel_runtime::{ManualScheduler, Scheduler};
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};

struct MessageCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for MessageCapture
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() != tracing::Level::WARN {
            return;
        }

        struct Visitor(Option<String>);

        impl tracing::field::Visit for Visitor {
            fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
                if field.name() == "message" {
                    self.0 = Some(format!("{value:?}"));
                }
            }
        }

        let mut visitor = Visitor(None);
        event.record(&mut visitor);
        if let Some(message) = visitor.0 {
            self.messages.lock().expect("capture lock").push(message);
        }
    }
}

#[test]
fn stalled_host_merges_overdue_ticks_with_warning() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let subscriber = tracing_subscriber::registry().with(MessageCapture {
        messages: Arc::clone(&messages),
    });
    let _guard = tracing::subscriber::set_default(subscriber);
    tracing::callsite::rebuild_interest_cache();

    let mut scheduler: ManualScheduler<u64> = ManualScheduler::new();
    scheduler
        .schedule_repeating(Duration::from_secs(2), Box::new(|ticks| ticks))
        .unwrap();

    // One hour at a two-second interval is 1800 ticks.
    let queued = scheduler.advance(Duration::from_secs(3600));
    assert_eq!(queued, 64);
    let ticks = scheduler.drain_messages();
    assert_eq!(ticks.len(), 64);
    assert_eq!(ticks.iter().sum::<u64>(), 1800);
    assert_eq!(
        messages.lock().expect("capture lock").as_slice(),
        ["merging overdue ticks"]
    );

    // The schedule resumes on the regular grid afterwards.
    assert_eq!(scheduler.advance(Duration::from_secs(2)), 1);
}
