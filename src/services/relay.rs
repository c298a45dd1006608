use crate::config::RelayConfig;
use crate::domain::event::RelayEvent;
use dashmap::DashMap;
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Histogram, UpDownCounter},
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Outbound side of the real-time relay.
pub trait ChatRelay: Send + Sync + std::fmt::Debug {
    /// Pushes an event to every live session of `user_id`. Never blocks and never fails.
    fn publish(&self, user_id: i64, event: RelayEvent);
}

#[derive(Clone, Debug)]
struct Metrics {
    published_total: Counter<u64>,
    active_channels: UpDownCounter<i64>,
    gc_duration_seconds: Histogram<f64>,
    gc_reclaimed_total: Counter<u64>,
}

impl Metrics {
    fn new() -> Self {
        let meter = global::meter("dignity-server");
        Self {
            published_total: meter
                .u64_counter("relay_events_published_total")
                .with_description("Relay events published, labelled by whether a session was listening")
                .build(),
            active_channels: meter
                .i64_up_down_counter("relay_active_channels")
                .with_description("Number of per-user relay channels")
                .build(),
            gc_duration_seconds: meter
                .f64_histogram("relay_gc_duration_seconds")
                .with_description("Time taken to perform a single GC iteration")
                .build(),
            gc_reclaimed_total: meter
                .u64_counter("relay_gc_reclaimed_total")
                .with_description("Total number of stale channels reclaimed by GC")
                .build(),
        }
    }
}

/// In-process fan-out of relay events to connected WebSocket sessions.
///
/// Each user gets one broadcast channel shared by all of their sessions.
/// Channels are created on first subscribe and reclaimed by [`RelayHub::perform_gc`]
/// once the last receiver is dropped.
#[derive(Clone, Debug)]
pub struct RelayHub {
    channels: Arc<DashMap<i64, broadcast::Sender<RelayEvent>>>,
    user_channel_capacity: usize,
    metrics: Metrics,
}

impl RelayHub {
    #[must_use]
    pub fn new(config: &RelayConfig) -> Self {
        Self {
            channels: Arc::new(DashMap::new()),
            user_channel_capacity: config.user_channel_capacity.max(1),
            metrics: Metrics::new(),
        }
    }

    #[tracing::instrument(level = "debug", skip(self))]
    pub fn subscribe(&self, user_id: i64) -> broadcast::Receiver<RelayEvent> {
        self.channels
            .entry(user_id)
            .or_insert_with(|| {
                self.metrics.active_channels.add(1, &[]);
                let (tx, _rx) = broadcast::channel(self.user_channel_capacity);
                tx
            })
            .value()
            .subscribe()
    }

    /// Drops channels nobody listens to. Returns how many were reclaimed.
    pub fn perform_gc(&self) -> u64 {
        let start = std::time::Instant::now();
        let mut reclaimed = 0;

        self.channels.retain(|_, sender| {
            let active = sender.receiver_count() > 0;
            if !active {
                self.metrics.active_channels.add(-1, &[]);
                reclaimed += 1;
            }
            active
        });

        self.metrics.gc_duration_seconds.record(start.elapsed().as_secs_f64(), &[]);
        if reclaimed > 0 {
            tracing::debug!(reclaimed, "Reclaimed idle relay channels");
            self.metrics.gc_reclaimed_total.add(reclaimed, &[]);
        }
        reclaimed
    }

    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

impl ChatRelay for RelayHub {
    fn publish(&self, user_id: i64, event: RelayEvent) {
        let kind = event.kind.as_str();
        let delivered = self.channels.get(&user_id).is_some_and(|tx| tx.send(event).is_ok());

        tracing::trace!(user_id, kind, delivered, "Relay event published");
        self.metrics
            .published_total
            .add(1, &[KeyValue::new("event", kind), KeyValue::new("delivered", delivered)]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::event::RelayEventKind;
    use crate::domain::message::{Message, ReadState};
    use time::OffsetDateTime;

    fn event(id: i64) -> RelayEvent {
        RelayEvent {
            kind: RelayEventKind::MessageCreated,
            message: Message {
                id,
                sender_id: Some(5),
                receiver_id: Some(2),
                case_worker_id: None,
                conversation_id: Some("2-5".into()),
                content: "hello".into(),
                read: ReadState::default(),
                parent_message_id: None,
                created_at: OffsetDateTime::UNIX_EPOCH,
            },
        }
    }

    fn hub() -> RelayHub {
        RelayHub::new(&RelayConfig { user_channel_capacity: 4, ..RelayConfig::default() })
    }

    #[tokio::test]
    async fn test_publish_reaches_every_session() {
        let hub = hub();
        let mut first = hub.subscribe(2);
        let mut second = hub.subscribe(2);
        assert_eq!(hub.channel_count(), 1);

        hub.publish(2, event(10));

        assert_eq!(first.recv().await.unwrap().message.id, 10);
        assert_eq!(second.recv().await.unwrap().message.id, 10);
    }

    #[tokio::test]
    async fn test_publish_is_scoped_to_user() {
        let hub = hub();
        let mut other = hub.subscribe(7);

        hub.publish(2, event(10));

        assert!(matches!(other.try_recv(), Err(broadcast::error::TryRecvError::Empty)));
    }

    #[test]
    fn test_publish_without_subscribers_is_dropped() {
        let hub = hub();
        hub.publish(2, event(10));
        assert_eq!(hub.channel_count(), 0);
    }

    #[test]
    fn test_gc_reclaims_only_idle_channels() {
        let hub = hub();
        let idle = hub.subscribe(1);
        let _live = hub.subscribe(2);
        drop(idle);

        assert_eq!(hub.perform_gc(), 1);
        assert_eq!(hub.channel_count(), 1);
        assert_eq!(hub.perform_gc(), 0);
    }

    #[tokio::test]
    async fn test_lagged_receiver_skips_missed_events() {
        let hub = hub();
        let mut rx = hub.subscribe(2);
        for id in 0..6 {
            hub.publish(2, event(id));
        }

        assert!(matches!(rx.recv().await, Err(broadcast::error::RecvError::Lagged(2))));
        assert_eq!(rx.recv().await.unwrap().message.id, 2);
    }
}
