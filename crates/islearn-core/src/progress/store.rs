//! Learner progress state machine.
//!
//! Level progression states are the catalog level ids plus a terminal
//! game-over state:
//!
//! ```text
//! level N --(all signs of N completed, N+1 exists)--> level N+1
//! level N --(all signs of N completed, no N+1)------> GameOver
//! level N --(N not in the catalog)------------------> GameOver
//! ```
//!
//! `GameOver` is only left through [`ProgressStore::reset_progress`].
//! Every mutation returns the events it produced and dispatches them to
//! subscribers.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::profile::{UserPreferences, UserProfile};
use super::rewards::{evaluate_rewards, validate_rewards, Reward};
use crate::catalog::{Level, LevelCatalog};
use crate::error::{CatalogError, StorageError};
use crate::events::{Event, EventBus, SubscriptionId};
use crate::storage::ProfileStore;

/// Outcome of a successful profile fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileFetch {
    /// A stored profile replaced the in-memory one.
    Loaded,
    /// No profile stored for this user; in-memory state untouched.
    NotFound,
}

/// Derived per-level status for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelStatus {
    pub level_id: u32,
    pub title: String,
    pub unlocked: bool,
    pub completed: bool,
    pub is_current: bool,
    pub signs_completed: usize,
    pub signs_total: usize,
}

#[derive(Debug)]
pub struct ProgressStore {
    catalog: LevelCatalog,
    reward_definitions: Vec<Reward>,
    rewards: Vec<Reward>,
    profile: UserProfile,
    bus: EventBus,
}

impl ProgressStore {
    /// Create a store over the given catalogs with a default profile.
    pub fn new(catalog: LevelCatalog, rewards: Vec<Reward>) -> Result<Self, CatalogError> {
        let mut store = Self {
            catalog: LevelCatalog::default(),
            reward_definitions: Vec::new(),
            rewards: Vec::new(),
            profile: UserProfile::default(),
            bus: EventBus::new(),
        };
        store.initialize(catalog, rewards)?;
        Ok(store)
    }

    /// Install (or replace) the level and reward catalogs.
    ///
    /// Safe to call repeatedly: the profile is kept, the level pointer is
    /// re-checked and rewards are recomputed. Calling it again with the
    /// same catalogs changes nothing.
    pub fn initialize(
        &mut self,
        catalog: LevelCatalog,
        rewards: Vec<Reward>,
    ) -> Result<Vec<Event>, CatalogError> {
        validate_rewards(&rewards)?;
        self.catalog = catalog;
        self.reward_definitions = rewards;

        let mut events = Vec::new();
        self.check_level_consistency(&mut events);
        self.refresh_rewards(&mut events);
        Ok(self.dispatch(events))
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn levels(&self) -> &[Level] {
        self.catalog.levels()
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    /// The catalog entry for `current_level`, if it exists.
    pub fn current_level(&self) -> Option<&Level> {
        self.catalog.level(self.profile.current_level)
    }

    pub fn is_game_over(&self) -> bool {
        self.profile.is_game_over
    }

    pub fn level_statuses(&self) -> Vec<LevelStatus> {
        let reached = self.profile.level_unlocked.max(self.profile.current_level);
        let done = &self.profile.completed_signs;
        self.catalog
            .levels()
            .iter()
            .map(|level| LevelStatus {
                level_id: level.level_id,
                title: level.title.clone(),
                unlocked: level.level_id <= reached,
                completed: level.is_completed_by(done),
                is_current: level.level_id == self.profile.current_level,
                signs_completed: level.completed_count(done),
                signs_total: level.signs.len(),
            })
            .collect()
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the whole profile with `remote` if present. Last load wins.
    pub fn load_profile(&mut self, remote: Option<UserProfile>) -> Vec<Event> {
        let Some(profile) = remote else {
            return Vec::new();
        };
        let mut events = vec![Event::ProfileLoaded {
            user_id: profile.user_id.clone(),
            current_level: profile.current_level,
            at: Utc::now(),
        }];
        self.profile = profile;
        self.check_level_consistency(&mut events);
        self.refresh_rewards(&mut events);
        self.dispatch(events)
    }

    /// Fetch `user_id` from `store` and load it.
    ///
    /// A failed fetch leaves the in-memory state untouched and is returned
    /// to the caller, so "new user" and "fetch failed" stay distinguishable.
    pub fn fetch_profile(
        &mut self,
        store: &dyn ProfileStore,
        user_id: &str,
    ) -> Result<ProfileFetch, StorageError> {
        match store.fetch_profile(user_id) {
            Ok(Some(profile)) => {
                self.load_profile(Some(profile));
                Ok(ProfileFetch::Loaded)
            }
            Ok(None) => Ok(ProfileFetch::NotFound),
            Err(e) => {
                tracing::warn!(user_id, error = %e, "profile fetch failed");
                Err(e)
            }
        }
    }

    /// Persist the current profile to `store`.
    pub fn save_profile(&self, store: &dyn ProfileStore) -> Result<(), StorageError> {
        store.save_profile(&self.profile)
    }

    pub fn set_identity(&mut self, name: &str, user_id: &str) -> Vec<Event> {
        self.profile.name = name.to_string();
        self.profile.user_id = user_id.to_string();
        let mut events = vec![Event::IdentityChanged {
            user_id: user_id.to_string(),
            name: name.to_string(),
            at: Utc::now(),
        }];
        self.check_level_consistency(&mut events);
        self.dispatch(events)
    }

    pub fn set_preferences(&mut self, preferences: UserPreferences) {
        self.profile.preferences = preferences;
    }

    /// Mark a sign as completed, then recompute rewards and check whether
    /// the current level is done.
    ///
    /// Completing an already-completed sign adds nothing. Sign ids that are
    /// not in the catalog are ignored.
    pub fn complete_sign(&mut self, sign_id: &str) -> Vec<Event> {
        let Some(level_id) = self.catalog.level_of_sign(sign_id) else {
            tracing::warn!(sign_id, "ignoring completion of unknown sign");
            return Vec::new();
        };

        let mut events = Vec::new();
        if self.profile.completed_signs.insert(sign_id.to_string()) {
            events.push(Event::SignCompleted {
                sign_id: sign_id.to_string(),
                level_id,
                at: Utc::now(),
            });
        }
        self.refresh_rewards(&mut events);
        self.check_level_completion(&mut events);
        self.dispatch(events)
    }

    /// Back to level 1 with nothing completed. Identity and total score
    /// are kept.
    pub fn reset_progress(&mut self) -> Vec<Event> {
        self.profile.current_level = 1;
        self.profile.level_unlocked = 1;
        self.profile.completed_signs.clear();
        self.profile.is_level_completed = false;
        self.profile.is_game_over = false;

        let mut events = vec![Event::ProgressReset { at: Utc::now() }];
        self.check_level_consistency(&mut events);
        self.refresh_rewards(&mut events);
        self.dispatch(events)
    }

    /// Record the final score of a practice session.
    pub fn record_game_score(&mut self, score: u32) -> Vec<Event> {
        self.profile.current_score = score;
        self.profile.total_score = self.profile.total_score.saturating_add(score);
        let events = vec![Event::ScoreRecorded {
            score,
            total_score: self.profile.total_score,
            at: Utc::now(),
        }];
        self.dispatch(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn dispatch(&self, events: Vec<Event>) -> Vec<Event> {
        self.bus.emit_all(&events);
        events
    }

    /// A level pointer outside the catalog (stale or corrupt profile)
    /// ends the game.
    fn check_level_consistency(&mut self, events: &mut Vec<Event>) {
        let level_id = self.profile.current_level;
        if self.catalog.contains(level_id) || self.profile.is_game_over {
            return;
        }
        tracing::warn!(level_id, "current level not in catalog, ending game");
        self.enter_game_over(events);
    }

    /// No-op once the game is over.
    fn check_level_completion(&mut self, events: &mut Vec<Event>) {
        if self.profile.is_game_over {
            return;
        }
        let Some(level) = self.catalog.level(self.profile.current_level) else {
            return;
        };
        if level.is_completed_by(&self.profile.completed_signs) {
            self.profile.is_level_completed = true;
            self.advance_level(events);
        }
    }

    fn advance_level(&mut self, events: &mut Vec<Event>) {
        let from = self.profile.current_level;
        let next = from + 1;
        if self.catalog.contains(next) {
            self.profile.current_level = next;
            self.profile.level_unlocked = self.profile.level_unlocked.max(next);
            self.profile.is_level_completed = false;
            tracing::info!(from, to = next, "level advanced");
            events.push(Event::LevelAdvanced {
                from_level: from,
                to_level: next,
                at: Utc::now(),
            });
        } else if !self.profile.is_game_over {
            tracing::info!(level_id = from, "final level completed");
            self.enter_game_over(events);
        }
    }

    fn enter_game_over(&mut self, events: &mut Vec<Event>) {
        self.profile.is_game_over = true;
        events.push(Event::GameOver {
            level_id: self.profile.current_level,
            at: Utc::now(),
        });
    }

    fn refresh_rewards(&mut self, events: &mut Vec<Event>) {
        let mut next = evaluate_rewards(
            &self.profile.completed_signs,
            &self.catalog,
            &self.reward_definitions,
        );

        for reward in &mut next {
            let previous = self
                .rewards
                .iter()
                .find(|r| r.reward_id == reward.reward_id);
            let was_unlocked = previous.is_some_and(|r| r.unlocked);

            match (was_unlocked, reward.unlocked) {
                (false, true) => {
                    reward.awarded_on = Some(Utc::now());
                    tracing::info!(reward_id = %reward.reward_id, "reward unlocked");
                    events.push(Event::RewardUnlocked {
                        reward_id: reward.reward_id.clone(),
                        title: reward.title.clone(),
                        at: Utc::now(),
                    });
                }
                (true, true) => {
                    reward.awarded_on = previous.and_then(|r| r.awarded_on);
                }
                (true, false) => {
                    reward.awarded_on = None;
                    events.push(Event::RewardLocked {
                        reward_id: reward.reward_id.clone(),
                        at: Utc::now(),
                    });
                }
                (false, false) => {}
            }
        }

        self.profile.rewards_earned = next
            .iter()
            .filter(|r| r.unlocked)
            .map(|r| r.reward_id.clone())
            .collect();
        self.rewards = next;
    }
}
