use crate::services::relay::RelayHub;
use std::time::Duration;
use tokio::sync::watch;
use tracing::Instrument;

/// Periodically reclaims relay channels whose sessions have all disconnected.
#[derive(Debug)]
pub struct RelayGcWorker {
    hub: RelayHub,
    interval_secs: u64,
}

impl RelayGcWorker {
    #[must_use]
    pub const fn new(hub: RelayHub, interval_secs: u64) -> Self {
        Self { hub, interval_secs }
    }

    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs.max(1)));

        while !*shutdown.borrow() {
            tokio::select! {
                _ = interval.tick() => {
                    async {
                        self.hub.perform_gc();
                    }
                    .instrument(tracing::debug_span!("relay_gc_iteration"))
                    .await;
                }
                _ = shutdown.changed() => {}
            }
        }
        tracing::info!("Relay GC loop shutting down...");
    }
}
