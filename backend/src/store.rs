use std::sync::{Arc, Mutex, MutexGuard};
use shared::VoteStore;
use tracing::error;
use crate::error::ApiError;

/// The one vote store of the process; every read and write goes through this lock.
pub type SharedStore = Arc<Mutex<VoteStore>>;

pub fn shared_store(store: VoteStore) -> SharedStore {
    Arc::new(Mutex::new(store))
}

pub fn lock(store: &SharedStore) -> Result<MutexGuard<'_, VoteStore>, ApiError> {
    store.lock().map_err(|e| {
        error!("Failed to acquire vote store lock: {}", e);
        ApiError::StoreUnavailable
    })
}
