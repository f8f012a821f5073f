use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

use crate::error::CatalogError;

/// One atomic unit of sign-language content. Identity is `id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sign {
    pub id: String,
    pub symbol: String,
}

impl Sign {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignType {
    #[default]
    Letter,
    Word,
    Sentence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// A learning level.
///
/// `unlocked` and `completed` are display hints carried by the catalog
/// source. The authoritative status comes from
/// [`ProgressStore::level_statuses`](crate::progress::ProgressStore::level_statuses).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Level {
    pub level_id: u32,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub signs: Vec<Sign>,
    #[serde(default, alias = "sign_type")]
    pub sign_type: SignType,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default, alias = "isUnlocked")]
    pub unlocked: bool,
    #[serde(default, alias = "isCompleted")]
    pub completed: bool,
    /// Free-form reward label shown on the level card.
    #[serde(default)]
    pub reward: String,
}

impl Level {
    pub fn new(level_id: u32, title: impl Into<String>, signs: Vec<Sign>) -> Self {
        Self {
            level_id,
            title: title.into(),
            description: String::new(),
            signs,
            sign_type: SignType::default(),
            difficulty: Difficulty::default(),
            unlocked: false,
            completed: false,
            reward: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_sign_type(mut self, sign_type: SignType) -> Self {
        self.sign_type = sign_type;
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// True when every sign of this level is in `completed`.
    /// A level without signs is vacuously complete.
    pub fn is_completed_by(&self, completed: &BTreeSet<String>) -> bool {
        self.signs.iter().all(|s| completed.contains(&s.id))
    }

    pub fn completed_count(&self, completed: &BTreeSet<String>) -> usize {
        self.signs
            .iter()
            .filter(|s| completed.contains(&s.id))
            .count()
    }
}

/// Validated, ordered set of levels.
///
/// Level ids are positive and unique; sign ids are unique across the
/// whole catalog, since progress refers to signs by id alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct LevelCatalog {
    levels: Vec<Level>,
    #[serde(skip)]
    sign_index: HashMap<String, u32>,
}

impl LevelCatalog {
    pub fn new(mut levels: Vec<Level>) -> Result<Self, CatalogError> {
        levels.sort_by_key(|l| l.level_id);

        let mut seen_levels = HashSet::new();
        let mut sign_index: HashMap<String, u32> = HashMap::new();
        for level in &levels {
            if level.level_id == 0 {
                return Err(CatalogError::ZeroLevelId);
            }
            if !seen_levels.insert(level.level_id) {
                return Err(CatalogError::DuplicateLevel(level.level_id));
            }
            for sign in &level.signs {
                if let Some(&first) = sign_index.get(&sign.id) {
                    return Err(CatalogError::DuplicateSign {
                        sign_id: sign.id.clone(),
                        first,
                        second: level.level_id,
                    });
                }
                sign_index.insert(sign.id.clone(), level.level_id);
            }
        }

        Ok(Self { levels, sign_index })
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let levels: Vec<Level> =
            serde_json::from_str(json).map_err(|e| CatalogError::ParseFailed(e.to_string()))?;
        Self::new(levels)
    }

    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_json_str(&content)
    }

    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level(&self, level_id: u32) -> Option<&Level> {
        self.levels.iter().find(|l| l.level_id == level_id)
    }

    pub fn contains(&self, level_id: u32) -> bool {
        self.level(level_id).is_some()
    }

    pub fn level_of_sign(&self, sign_id: &str) -> Option<u32> {
        self.sign_index.get(sign_id).copied()
    }

    pub fn find_sign(&self, sign_id: &str) -> Option<&Sign> {
        let level = self.level(self.level_of_sign(sign_id)?)?;
        level.signs.iter().find(|s| s.id == sign_id)
    }

    pub fn all_signs(&self) -> impl Iterator<Item = &Sign> {
        self.levels.iter().flat_map(|l| l.signs.iter())
    }
}

impl<'de> Deserialize<'de> for LevelCatalog {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let levels = Vec::<Level>::deserialize(deserializer)?;
        LevelCatalog::new(levels).map_err(serde::de::Error::custom)
    }
}
