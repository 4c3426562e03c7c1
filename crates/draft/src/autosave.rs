//! Debounced draft writes.
//!
//! Persistence scheduling is kept apart from the pure compose/validate
//! functions: the wizard stays trivially unit-testable, and this type owns
//! the timer. Each edit resets the quiet-period timer (never stacks it), so
//! rapid edits coalesce into one write and snapshots are persisted in order.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use fretdesk_orders::OrdreDraft;

use crate::store::{DraftKey, DraftStore};

const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(1_500);

/// Debounced writer for one draft slot.
#[derive(Debug)]
pub struct DraftAutosave {
    store: Arc<DraftStore>,
    key: DraftKey,
    quiet_period: Duration,
    pending: Option<JoinHandle<()>>,
}

impl DraftAutosave {
    pub fn new(store: Arc<DraftStore>, key: DraftKey) -> Self {
        Self::with_quiet_period(store, key, DEFAULT_QUIET_PERIOD)
    }

    pub fn with_quiet_period(
        store: Arc<DraftStore>,
        key: DraftKey,
        quiet_period: Duration,
    ) -> Self {
        Self {
            store,
            key,
            quiet_period,
            pending: None,
        }
    }

    /// Schedule a write of `snapshot` after the quiet period. A pending
    /// write is cancelled first: the timer resets, it does not stack, and
    /// the last scheduled snapshot is the one that lands.
    pub fn schedule(&mut self, snapshot: OrdreDraft) {
        self.cancel_pending();

        let store = Arc::clone(&self.store);
        let key = self.key.clone();
        let quiet = self.quiet_period;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet).await;
            if let Err(err) = store.save(&key, &snapshot).await {
                tracing::error!(slot = key.as_str(), "draft autosave failed: {err:?}");
            }
        }));
    }

    /// Write `snapshot` immediately, dropping any pending timer. For
    /// teardown paths that cannot wait out the quiet period.
    pub async fn flush(&mut self, snapshot: &OrdreDraft) -> anyhow::Result<()> {
        self.cancel_pending();
        self.store.save(&self.key, snapshot).await
    }

    /// Explicit discard: drop any pending write and clear the slot.
    pub async fn discard(&mut self) -> anyhow::Result<()> {
        self.cancel_pending();
        self.store.clear(&self.key).await
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for DraftAutosave {
    fn drop(&mut self) {
        // Navigating away mid-wizard keeps the draft; only the pending timer
        // dies with the instance.
        self.cancel_pending();
    }
}
