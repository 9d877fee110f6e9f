//! Draft persistence: an injected store interface plus the debounced
//! autosave worker.
//!
//! The worker receives full record snapshots via channel. A save happens
//! only after a 1000 ms quiet period; every new snapshot restarts the
//! timer, so bursts of edits coalesce into a single write.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

pub const DRAFT_FILE: &str = "vigovia-itinerary-draft.json";
pub const AUTOSAVE_DEBOUNCE_MS: u64 = 1000;
pub const DATA_DIR_ENV: &str = "ITINERARY_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "./data";

/// Where the draft JSON lives between sessions.
pub trait DraftStore: Send + Sync {
    fn save(&self, json: &str) -> io::Result<()>;
    /// `None` when no draft has been saved yet or the store is unreadable.
    fn load(&self) -> Option<String>;
}

/// File-backed store writing one JSON file under the data directory.
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(DRAFT_FILE),
        }
    }

    pub fn from_env() -> Self {
        let dir = std::env::var(DATA_DIR_ENV).unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string());
        Self::new(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DraftStore for FileDraftStore {
    fn save(&self, json: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
    }

    fn load(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Some(json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                log::warn!("Failed to read draft file {}: {}", self.path.display(), e);
                None
            }
        }
    }
}

/// Runs until the snapshot channel closes. A final save flushes whatever
/// snapshot was pending at shutdown.
pub async fn autosave_worker(mut receiver: mpsc::Receiver<String>, store: Arc<dyn DraftStore>) {
    log::info!("Draft autosave worker started");

    while let Some(snapshot) = receiver.recv().await {
        let mut latest = snapshot;
        let mut channel_open = true;

        // quiet period: restart on every newer snapshot
        loop {
            match tokio::time::timeout(
                Duration::from_millis(AUTOSAVE_DEBOUNCE_MS),
                receiver.recv(),
            )
            .await
            {
                Ok(Some(newer)) => latest = newer,
                Ok(None) => {
                    channel_open = false;
                    break;
                }
                Err(_) => break,
            }
        }

        match store.save(&latest) {
            Ok(()) => log::debug!("Draft autosaved ({} bytes)", latest.len()),
            Err(e) => log::error!("Failed to autosave draft: {}", e),
        }

        if !channel_open {
            break;
        }
    }

    log::info!("Draft autosave worker stopped");
}
