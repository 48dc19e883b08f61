//! Periodic and end-of-process persistence.
//!
//! The vote store is only written to disk by [`Lifecycle`]: once per rotation interval
//! from a background task, and once more when the process goes away. Rocket turns SIGINT
//! and SIGTERM into a graceful shutdown, which reaches [`Persistence::on_shutdown`]; `main`
//! covers normal exit, launch failure and panics. Whichever path gets there first does the
//! final save, the rest are no-ops.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, MutexGuard, PoisonError, TryLockError};
use std::time::Duration;
use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket, Shutdown};
use shared::{StoreError, VoteStore};
use tokio::task;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};
use crate::store::SharedStore;

pub struct Lifecycle {
    store: SharedStore,
    finalized: AtomicBool,
}

impl Lifecycle {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            finalized: AtomicBool::new(false),
        }
    }

    pub fn store(&self) -> SharedStore {
        Arc::clone(&self.store)
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized.load(Ordering::SeqCst)
    }

    /// Clears the dedup ledger, draws a new salt and writes the store to disk.
    pub fn save_and_rotate(&self) -> Result<(), StoreError> {
        let mut store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        store.save_and_rotate()
    }

    /// Final save for this process. Returns `false` if another exit path already did it.
    pub fn finalize(&self, reason: &str) -> bool {
        let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
        self.finish(store, reason)
    }

    /// Same as [`finalize`](Self::finalize) but never waits on the store lock, so it is
    /// safe to call from a panic hook on a thread that may be holding it.
    pub fn try_finalize(&self, reason: &str) -> bool {
        let store = match self.store.try_lock() {
            Ok(guard) => guard,
            Err(TryLockError::Poisoned(poisoned)) => poisoned.into_inner(),
            Err(TryLockError::WouldBlock) => {
                warn!(reason, "Vote store is busy, skipping final save");
                return false;
            }
        };
        self.finish(store, reason)
    }

    fn finish(&self, mut store: MutexGuard<'_, VoteStore>, reason: &str) -> bool {
        if self.finalized.swap(true, Ordering::SeqCst) {
            debug!(reason, "Votes already saved for this process");
            return false;
        }

        info!(reason, "💾 Saving votes");
        if let Err(e) = store.save_and_rotate() {
            error!("Final save to {} failed: {}", store.path().display(), e);
        }
        true
    }
}

/// Fairing that owns the rotation timer and the save on graceful shutdown.
pub struct Persistence {
    lifecycle: Arc<Lifecycle>,
    every: Duration,
}

impl Persistence {
    pub fn new(lifecycle: Arc<Lifecycle>, every: Duration) -> Self {
        Self { lifecycle, every }
    }
}

#[rocket::async_trait]
impl Fairing for Persistence {
    fn info(&self) -> Info {
        Info {
            name: "Vote persistence",
            kind: Kind::Liftoff | Kind::Shutdown,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        tokio::spawn(run_rotation_task(
            Arc::clone(&self.lifecycle),
            self.every,
            rocket.shutdown(),
        ));
    }

    async fn on_shutdown(&self, _rocket: &Rocket<Orbit>) {
        let lifecycle = Arc::clone(&self.lifecycle);
        if let Err(e) = task::spawn_blocking(move || lifecycle.finalize("shutdown")).await {
            error!("Shutdown save task failed: {}", e);
        }
    }
}

async fn run_rotation_task(lifecycle: Arc<Lifecycle>, every: Duration, shutdown: Shutdown) {
    let mut interval = interval_at(Instant::now() + every, every);
    tokio::pin!(shutdown);
    info!("🔄 Rotation service started, every {}s", every.as_secs());

    loop {
        tokio::select! {
            biased;

            _ = &mut shutdown => {
                debug!("Rotation service stopping");
                break;
            }

            _ = interval.tick() => {
                let lifecycle = Arc::clone(&lifecycle);
                match task::spawn_blocking(move || lifecycle.save_and_rotate()).await {
                    Ok(Ok(())) => info!("Rotated voter salt and saved votes"),
                    Ok(Err(e)) => error!("Scheduled save failed: {}", e),
                    Err(e) => error!("Scheduled save task failed: {}", e),
                }
            }
        }
    }
}
