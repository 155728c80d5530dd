use crate::domain::AlertState;
use crate::errors::StoreError;
use crate::state::ObjectStore;
use tracing::{info, warn};

/// The alert map, stored as one JSON document under a fixed bucket and key.
pub struct AlertStateStore<S> {
    store: S,
    bucket: String,
    key: String,
}

impl<S: ObjectStore> AlertStateStore<S> {
    pub fn new(store: S, bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Previous state, or an empty one if it cannot be read or decoded.
    pub fn load(&self) -> AlertState {
        match self.try_load() {
            Ok(state) => {
                info!(entries = state.len(), "loaded previous alert state");
                state
            }
            Err(e) => {
                warn!(bucket = %self.bucket, key = %self.key, error = %e, "previous alert state unavailable, starting empty");
                AlertState::default()
            }
        }
    }

    pub fn try_load(&self) -> Result<AlertState, StoreError> {
        let bytes = self.store.get(&self.bucket, &self.key)?;
        Ok(AlertState::from_json(&bytes)?)
    }

    /// Replace the stored state in full.
    pub fn save(&self, state: &AlertState) -> Result<(), StoreError> {
        let bytes = state.to_json()?;
        self.store.put(&self.bucket, &self.key, &bytes)?;
        info!(entries = state.len(), "saved alert state");
        Ok(())
    }
}
