//! Reward definitions and their unlock rules.
//!
//! A reward's `unlocked` flag is never toggled directly. It is recomputed
//! from scratch from the completed-signs set and the level catalog every
//! time progress changes, so the result does not depend on the order of
//! earlier mutations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::catalog::LevelCatalog;
use crate::error::CatalogError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RewardType {
    /// Static achievement
    #[default]
    Badge,
    /// Major milestone
    Trophy,
    Coin,
    Xp,
    /// Unlocks a level or feature
    Unlock,
}

/// Predicate deciding whether a reward is unlocked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardRule {
    /// At least `count` distinct signs completed.
    SignsCompleted { count: usize },
    /// Every sign of the given level completed. Unknown levels never unlock.
    LevelCompleted { level_id: u32 },
    /// Every sign of every level completed.
    AllLevelsCompleted,
}

impl RewardRule {
    pub fn is_satisfied(&self, completed: &BTreeSet<String>, catalog: &LevelCatalog) -> bool {
        match self {
            RewardRule::SignsCompleted { count } => completed.len() >= *count,
            RewardRule::LevelCompleted { level_id } => catalog
                .level(*level_id)
                .is_some_and(|level| level.is_completed_by(completed)),
            RewardRule::AllLevelsCompleted => {
                !catalog.is_empty()
                    && catalog
                        .levels()
                        .iter()
                        .all(|level| level.is_completed_by(completed))
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reward {
    pub reward_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub reward_type: RewardType,
    /// Coins/XP granted by this reward.
    #[serde(default)]
    pub points: u32,
    /// Without a rule the catalog value of `unlocked` is kept as-is.
    #[serde(default)]
    pub rule: Option<RewardRule>,
    #[serde(default)]
    pub unlocked: bool,
    #[serde(default)]
    pub awarded_on: Option<DateTime<Utc>>,
}

impl Reward {
    pub fn new(
        reward_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        rule: RewardRule,
    ) -> Self {
        Self {
            reward_id: reward_id.into(),
            title: title.into(),
            description: description.into(),
            icon_url: String::new(),
            reward_type: RewardType::default(),
            points: 0,
            rule: Some(rule),
            unlocked: false,
            awarded_on: None,
        }
    }

    pub fn with_type(mut self, reward_type: RewardType, points: u32) -> Self {
        self.reward_type = reward_type;
        self.points = points;
        self
    }
}

/// Rejects duplicate reward ids.
pub fn validate_rewards(rewards: &[Reward]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for reward in rewards {
        if !seen.insert(reward.reward_id.as_str()) {
            return Err(CatalogError::DuplicateReward(reward.reward_id.clone()));
        }
    }
    Ok(())
}

pub fn rewards_from_json_str(json: &str) -> Result<Vec<Reward>, CatalogError> {
    let rewards: Vec<Reward> =
        serde_json::from_str(json).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
    validate_rewards(&rewards)?;
    Ok(rewards)
}

/// Recompute every reward's `unlocked` flag from `definitions`.
///
/// Pure: identical inputs always produce identical output. `awarded_on`
/// is not touched here; stamping it is the store's job.
pub fn evaluate_rewards(
    completed: &BTreeSet<String>,
    catalog: &LevelCatalog,
    definitions: &[Reward],
) -> Vec<Reward> {
    definitions
        .iter()
        .map(|def| {
            let mut reward = def.clone();
            if let Some(rule) = &def.rule {
                reward.unlocked = rule.is_satisfied(completed, catalog);
            }
            reward
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Level, Sign};

    fn catalog() -> LevelCatalog {
        LevelCatalog::new(vec![
            Level::new(1, "One", vec![Sign::new("a", "A"), Sign::new("b", "B")]),
            Level::new(2, "Two", vec![Sign::new("c", "C")]),
        ])
        .unwrap()
    }

    fn done(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn signs_completed_threshold() {
        let rule = RewardRule::SignsCompleted { count: 1 };
        assert!(!rule.is_satisfied(&done(&[]), &catalog()));
        assert!(rule.is_satisfied(&done(&["c"]), &catalog()));
    }

    #[test]
    fn level_completed_requires_every_sign() {
        let rule = RewardRule::LevelCompleted { level_id: 1 };
        assert!(!rule.is_satisfied(&done(&["a"]), &catalog()));
        assert!(rule.is_satisfied(&done(&["a", "b"]), &catalog()));

        let missing = RewardRule::LevelCompleted { level_id: 9 };
        assert!(!missing.is_satisfied(&done(&["a", "b", "c"]), &catalog()));
    }

    #[test]
    fn all_levels_completed() {
        let rule = RewardRule::AllLevelsCompleted;
        assert!(!rule.is_satisfied(&done(&["a", "b"]), &catalog()));
        assert!(rule.is_satisfied(&done(&["a", "b", "c"]), &catalog()));
        assert!(!rule.is_satisfied(&done(&[]), &LevelCatalog::default()));
    }

    #[test]
    fn evaluation_recomputes_from_scratch() {
        let mut stale = Reward::new("1", "First", "", RewardRule::SignsCompleted { count: 1 });
        stale.unlocked = true;
        let out = evaluate_rewards(&done(&[]), &catalog(), &[stale]);
        assert!(!out[0].unlocked);
    }

    #[test]
    fn rule_less_reward_keeps_catalog_flag() {
        let mut manual = Reward::new("x", "Manual", "", RewardRule::AllLevelsCompleted);
        manual.rule = None;
        manual.unlocked = true;
        let out = evaluate_rewards(&done(&[]), &catalog(), &[manual]);
        assert!(out[0].unlocked);
    }

    #[test]
    fn duplicate_reward_ids_rejected() {
        let r = Reward::new("1", "A", "", RewardRule::AllLevelsCompleted);
        assert_eq!(
            validate_rewards(&[r.clone(), r]),
            Err(CatalogError::DuplicateReward("1".into()))
        );
    }

    #[test]
    fn parses_reward_json() {
        let json = r#"[{"rewardId": "1", "title": "First Sign!",
                        "rewardType": "TROPHY", "points": 5,
                        "rule": {"kind": "signs_completed", "count": 1}}]"#;
        let rewards = rewards_from_json_str(json).unwrap();
        assert_eq!(rewards[0].reward_type, RewardType::Trophy);
        assert_eq!(rewards[0].rule, Some(RewardRule::SignsCompleted { count: 1 }));
    }
}
