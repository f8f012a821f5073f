//! SQLite-based profile storage.
//!
//! Provides persistent storage for:
//! - Learner profiles, one JSON document per user id
//! - Key-value store for application state (active user)

use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

use super::data_dir;
use super::profile_store::ProfileStore;
use crate::error::{CoreError, StorageError};
use crate::progress::UserProfile;

const ACTIVE_USER_KEY: &str = "active_user";

/// SQLite database holding profile documents.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/islearn.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("islearn.db");
        Ok(Self::open_at(&path)?)
    }

    pub fn open_at(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS profiles (
                user_id     TEXT PRIMARY KEY,
                document    TEXT NOT NULL,
                updated_at  TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    pub fn list_user_ids(&self) -> Result<Vec<String>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM profiles ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut ids = Vec::new();
        for id in rows {
            ids.push(id?);
        }
        Ok(ids)
    }

    pub fn active_user(&self) -> Result<Option<String>, StorageError> {
        self.kv_get(ACTIVE_USER_KEY)
    }

    pub fn set_active_user(&self, user_id: &str) -> Result<(), StorageError> {
        self.kv_set(ACTIVE_USER_KEY, user_id)
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}

impl ProfileStore for Database {
    fn fetch_profile(&self, user_id: &str) -> Result<Option<UserProfile>, StorageError> {
        let mut stmt = self
            .conn
            .prepare("SELECT document FROM profiles WHERE user_id = ?1")?;
        let doc = match stmt.query_row(params![user_id], |row| row.get::<_, String>(0)) {
            Ok(doc) => doc,
            Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&doc)
            .map(Some)
            .map_err(|e| StorageError::CorruptDocument {
                user_id: user_id.to_string(),
                message: e.to_string(),
            })
    }

    fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        let doc = serde_json::to_string(profile)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        self.conn.execute(
            "INSERT OR REPLACE INTO profiles (user_id, document, updated_at)
             VALUES (?1, ?2, ?3)",
            params![profile.user_id, doc, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_roundtrip() {
        let db = Database::open_memory().unwrap();
        assert!(db.fetch_profile("u1").unwrap().is_none());

        let mut profile = UserProfile::new_account("u1", "Asha", "a@example.com");
        profile.completed_signs.insert("3".into());
        db.save_profile(&profile).unwrap();

        assert_eq!(db.fetch_profile("u1").unwrap(), Some(profile.clone()));

        profile.current_level = 2;
        db.save_profile(&profile).unwrap();
        assert_eq!(db.fetch_profile("u1").unwrap().unwrap().current_level, 2);
        assert_eq!(db.list_user_ids().unwrap(), vec!["u1".to_string()]);
    }

    #[test]
    fn corrupt_document_is_reported() {
        let db = Database::open_memory().unwrap();
        db.conn
            .execute(
                "INSERT INTO profiles (user_id, document, updated_at) VALUES ('u1', '{oops', '')",
                [],
            )
            .unwrap();
        assert!(matches!(
            db.fetch_profile("u1"),
            Err(StorageError::CorruptDocument { .. })
        ));
    }

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.active_user().unwrap().is_none());
        db.set_active_user("u1").unwrap();
        assert_eq!(db.active_user().unwrap().as_deref(), Some("u1"));
    }
}
