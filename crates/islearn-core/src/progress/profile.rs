use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserPreferences {
    pub dark_mode: bool,
}

/// One learner's progress. Persisted as an id-keyed document; every field
/// falls back to its default when missing and unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    pub name: String,
    pub email: String,
    /// References a catalog `level_id`.
    pub current_level: u32,
    /// Highest level ever reached.
    pub level_unlocked: u32,
    pub completed_signs: BTreeSet<String>,
    pub rewards_earned: Vec<String>,
    pub current_score: u32,
    pub total_score: u32,
    pub is_level_completed: bool,
    pub is_game_over: bool,
    pub preferences: UserPreferences,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            user_id: String::new(),
            name: String::new(),
            email: String::new(),
            current_level: 1,
            level_unlocked: 1,
            completed_signs: BTreeSet::new(),
            rewards_earned: Vec::new(),
            current_score: 0,
            total_score: 0,
            is_level_completed: false,
            is_game_over: false,
            preferences: UserPreferences::default(),
        }
    }
}

impl UserProfile {
    /// Fresh profile for a newly registered account.
    pub fn new_account(
        user_id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    pub fn has_completed(&self, sign_id: &str) -> bool {
        self.completed_signs.contains(sign_id)
    }
}
