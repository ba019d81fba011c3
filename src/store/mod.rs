//! Persisted store root.
//!
//! The application state is the composition of named slices (see
//! [`reducer`]), wrapped by a persistence adapter (see [`persist`]) bound to
//! the [`persist::ROOT_KEY`] namespace of a [`Storage`].

pub mod persist;
pub mod reducer;
pub mod storage;

use crate::app::action::Action;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

pub use persist::{PersistConfig, PersistWriter};
pub use reducer::{CombinedReducer, RootState};
pub use storage::{FileStorage, MemoryStorage, Storage};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("snapshot version {found} does not match expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },
    #[error("storage lock poisoned")]
    Poisoned,
}

/// The application's root reducer. No slices are registered yet.
pub fn root_reducer() -> CombinedReducer<Action> {
    CombinedReducer::new()
}

/// Global state container: holds the current root state, runs every action
/// through the combined reducer and forwards changed states to the writer.
pub struct Store<A> {
    reducer: CombinedReducer<A>,
    state: RootState,
    writer: PersistWriter,
}

impl<A: Debug> Store<A> {
    /// Build the store, rehydrating from `storage`. Any failure to read the
    /// previous snapshot falls back to the reducer's initial state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(reducer: CombinedReducer<A>, storage: Arc<dyn Storage>, config: PersistConfig) -> Self {
        if reducer.is_empty() {
            tracing::debug!("Root reducer has no slices");
        }
        let defaults = reducer.initial_state();
        let state = match persist::rehydrate(storage.as_ref(), &config) {
            Ok(Some(inbound)) => {
                tracing::info!(key = %config.key, slices = inbound.len(), "Rehydrated store");
                persist::merge_inbound(defaults, inbound)
            }
            Ok(None) => {
                tracing::info!(key = %config.key, "No persisted state, using defaults");
                defaults
            }
            Err(e) => {
                tracing::warn!(key = %config.key, error = %e, "Rehydration failed, using defaults");
                defaults
            }
        };

        Self {
            reducer,
            state,
            writer: PersistWriter::spawn(storage, config),
        }
    }

    pub fn state(&self) -> &RootState {
        &self.state
    }

    /// Run `action` through the reducer. Returns whether the state changed;
    /// a changed state is queued for saving.
    pub fn dispatch(&mut self, action: &A) -> bool {
        let next = self.reducer.reduce(&self.state, action);
        if next == self.state {
            return false;
        }
        tracing::debug!(?action, "Store state changed");
        self.state = next;
        self.writer.submit(self.state.clone());
        true
    }

    /// Wait for pending writes. Call once, on shutdown.
    pub async fn flush(self) {
        self.writer.flush().await;
    }
}
