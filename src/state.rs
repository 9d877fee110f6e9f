//! Shared application state.
//!
//! The session is the single logical writer over the record: every mutation
//! runs synchronously under the lock, so derived fields are never observed
//! stale. Autosave and export run on their own async boundaries.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::document::ExportStatus;
use crate::itinerary::ItinerarySession;
use crate::persistence::DraftStore;
use crate::upload::UploadTokens;

pub struct AppState {
    pub session: RwLock<ItinerarySession>,
    pub export_status: RwLock<ExportStatus>,
    pub upload_tokens: UploadTokens,
    autosave_sender: mpsc::Sender<String>,
}

impl AppState {
    /// Build the state, restoring the saved draft if one exists. A corrupt
    /// draft is discarded in favor of the seeded default.
    pub fn new(store: &Arc<dyn DraftStore>, autosave_sender: mpsc::Sender<String>) -> Self {
        let mut session = ItinerarySession::default();
        if let Some(json) = store.load() {
            if session.load_from_json(&json) {
                log::info!("Restored saved itinerary draft");
            } else {
                log::warn!("Saved draft is malformed, starting from the seeded default");
            }
        }

        Self {
            session: RwLock::new(session),
            export_status: RwLock::new(ExportStatus::Idle),
            upload_tokens: UploadTokens::default(),
            autosave_sender,
        }
    }

    /// Queue the current record for the debounced autosave worker. Called
    /// after every mutation; never blocks the request path.
    pub fn queue_autosave(&self) {
        let snapshot = self.session.read().to_pretty_json();
        if let Err(e) = self.autosave_sender.try_send(snapshot) {
            log::debug!("Autosave queue full or closed, dropping snapshot: {}", e);
        }
    }
}
