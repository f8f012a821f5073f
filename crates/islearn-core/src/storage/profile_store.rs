use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StorageError;
use crate::progress::UserProfile;

/// Id-keyed profile document store.
///
/// `fetch_profile` returns `Ok(None)` for an unknown user; errors mean the
/// store itself could not answer.
pub trait ProfileStore {
    fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError>;

    /// Last write wins.
    fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError>;
}

/// In-process store, used by tests and offline sessions.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    documents: Mutex<HashMap<String, String>>,
    unavailable: Mutex<bool>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate an unreachable store.
    pub fn set_unavailable(&self, unavailable: bool) {
        *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) = unavailable;
    }

    fn check_available(&self) -> Result<(), StorageError> {
        if *self.unavailable.lock().unwrap_or_else(|e| e.into_inner()) {
            return Err(StorageError::Unavailable("memory store offline".into()));
        }
        Ok(())
    }
}

impl ProfileStore for MemoryProfileStore {
    fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        self.check_available()?;
        let documents = self.documents.lock().unwrap_or_else(|e| e.into_inner());
        documents
            .get(user_id)
            .map(|doc| {
                serde_json::from_str(doc).map_err(|e| StorageError::CorruptDocument {
                    user_id: user_id.to_string(),
                    message: e.to_string(),
                })
            })
            .transpose()
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.check_available()?;
        let doc = serde_json::to_string(profile)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.documents
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(profile.user_id.clone(), doc);
        Ok(())
    }
}
