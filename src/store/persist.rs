//! Load/save adapter around the combined reducer.
//!
//! Snapshots are stored as JSON under `persist:<key>`. Loading happens once,
//! when the store is built. Saving happens on a background task fed through an
//! unbounded channel; snapshots queued while a write is in flight are
//! coalesced, so only the most recent one reaches storage.

use super::reducer::RootState;
use super::storage::Storage;
use super::StoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Storage namespace of the application's root store.
pub const ROOT_KEY: &str = "root";

const KEY_PREFIX: &str = "persist:";

/// Bumped whenever the shape of persisted slices changes incompatibly.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub state: RootState,
}

#[derive(Debug, Clone)]
pub struct PersistConfig {
    pub key: String,
    pub version: u32,
}

impl PersistConfig {
    pub fn root() -> Self {
        Self {
            key: ROOT_KEY.to_string(),
            version: SNAPSHOT_VERSION,
        }
    }

    pub fn storage_key(&self) -> String {
        format!("{}{}", KEY_PREFIX, self.key)
    }
}

pub fn encode(config: &PersistConfig, state: &RootState) -> Result<String, StoreError> {
    let snapshot = Snapshot {
        version: config.version,
        saved_at: Utc::now(),
        state: state.clone(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

/// Read the persisted state for `config.key`. `Ok(None)` when nothing has been
/// written yet.
pub fn rehydrate(
    storage: &dyn Storage,
    config: &PersistConfig,
) -> Result<Option<RootState>, StoreError> {
    let Some(raw) = storage.get_item(&config.storage_key())? else {
        return Ok(None);
    };
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    if snapshot.version != config.version {
        return Err(StoreError::VersionMismatch {
            found: snapshot.version,
            expected: config.version,
        });
    }
    Ok(Some(snapshot.state))
}

/// Level-one merge: inbound partitions replace defaults, but only for keys the
/// reducer already knows about.
pub fn merge_inbound(mut defaults: RootState, inbound: RootState) -> RootState {
    for (key, value) in inbound {
        if let Some(slot) = defaults.get_mut(&key) {
            *slot = value;
        } else {
            tracing::debug!(key = %key, "Dropping persisted slice with no reducer");
        }
    }
    defaults
}

/// Handle to the background save task.
pub struct PersistWriter {
    tx: mpsc::UnboundedSender<RootState>,
    handle: JoinHandle<()>,
}

impl PersistWriter {
    /// Spawn the writer on the current tokio runtime.
    pub fn spawn(storage: Arc<dyn Storage>, config: PersistConfig) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<RootState>();

        let handle = tokio::spawn(async move {
            while let Some(mut state) = rx.recv().await {
                while let Ok(newer) = rx.try_recv() {
                    state = newer;
                }

                let payload = match encode(&config, &state) {
                    Ok(payload) => payload,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to serialize state snapshot");
                        continue;
                    }
                };

                let storage = storage.clone();
                let key = config.storage_key();
                let result =
                    tokio::task::spawn_blocking(move || storage.set_item(&key, &payload)).await;
                match result {
                    Ok(Ok(())) => tracing::trace!(key = %config.key, "State snapshot written"),
                    Ok(Err(e)) => tracing::warn!(error = %e, "Failed to write state snapshot"),
                    Err(e) => tracing::warn!(error = %e, "State writer task panicked"),
                }
            }
        });

        Self { tx, handle }
    }

    /// Queue a snapshot. Never blocks; a closed writer drops the snapshot.
    pub fn submit(&self, state: RootState) {
        if self.tx.send(state).is_err() {
            tracing::warn!("State writer is gone, snapshot dropped");
        }
    }

    /// Close the queue and wait for the last snapshot to land.
    pub async fn flush(self) {
        let Self { tx, handle } = self;
        drop(tx);
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "State writer did not shut down cleanly");
        }
    }
}
