//! Keeps the [`TokenHolder`] in step with an external [`TokenStore`].
//!
//! Store notifications are applied as they arrive; a bounded polling interval
//! covers stores without notifications and missed events.
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::holder::TokenHolder;
use super::store::{TokenStore, TokenStoreError};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);
const MAX_POLL_INTERVAL: Duration = Duration::from_secs(60);

pub struct TokenSync {
    store: Arc<dyn TokenStore>,
    holder: TokenHolder,
    poll_interval: Duration,
    // Last value read from the store. Only store changes are pushed, so a
    // token written to the holder by a refresh is not clobbered by a stale store.
    last_seen: Option<Option<String>>,
}

impl TokenSync {
    pub fn new(store: Arc<dyn TokenStore>, holder: TokenHolder, poll_interval: Duration) -> Self {
        Self {
            store,
            holder,
            poll_interval: poll_interval.clamp(MIN_POLL_INTERVAL, MAX_POLL_INTERVAL),
            last_seen: None,
        }
    }

    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Read the store once; returns `true` if the holder was updated.
    pub async fn sync_once(&mut self) -> Result<bool, TokenStoreError> {
        let token = self.store.load().await?;
        if self.last_seen.as_ref() == Some(&token) {
            return Ok(false);
        }
        self.last_seen = Some(token.clone());
        Ok(self.holder.set_token(token))
    }

    pub fn spawn(self, shutdown: watch::Receiver<bool>) -> JoinHandle<()> {
        tokio::spawn(self.run(shutdown))
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        let mut changes = self.store.changes();
        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        tracing::info!(
            store = self.store.store_name(),
            push = changes.is_some(),
            interval_ms = self.poll_interval.as_millis() as u64,
            "token sync started"
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let notifications_closed = tokio::select! {
                res = shutdown.changed() => {
                    if res.is_err() {
                        break;
                    }
                    continue;
                }
                res = next_change(&mut changes) => res.is_err(),
                _ = ticker.tick() => false,
            };

            if notifications_closed {
                tracing::debug!("token store notifications closed, polling only");
                changes = None;
            }

            match self.sync_once().await {
                Ok(true) => tracing::debug!("current token updated from store"),
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "token store read failed"),
            }
        }

        tracing::info!("token sync stopped");
    }
}

async fn next_change(
    changes: &mut Option<watch::Receiver<Option<String>>>,
) -> Result<(), watch::error::RecvError> {
    match changes {
        Some(rx) => rx.changed().await,
        None => std::future::pending().await,
    }
}
