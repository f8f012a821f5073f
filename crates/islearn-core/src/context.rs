//! Application context.
//!
//! Built once at startup and passed by reference to whatever needs the
//! progress store, the media library or a new practice session.

use std::path::Path;

use crate::catalog::{
    builtin_levels, builtin_media_items, builtin_rewards, builtin_sign_media, LevelCatalog,
    MediaLibrary, Sign, SignMedia,
};
use crate::error::{CatalogError, CoreError};
use crate::game::{GameSession, GameSettings};
use crate::progress::{rewards::rewards_from_json_str, ProgressStore, Reward};
use crate::storage::Config;

#[derive(Debug)]
pub struct AppContext {
    config: Config,
    progress: ProgressStore,
    media: MediaLibrary,
    game_settings: GameSettings,
    selected_sign: Option<Sign>,
}

impl AppContext {
    pub fn new(
        config: Config,
        catalog: LevelCatalog,
        rewards: Vec<Reward>,
        media: MediaLibrary,
    ) -> Result<Self, CatalogError> {
        let progress = ProgressStore::new(catalog, rewards)?;
        let game_settings = GameSettings::from(&config.game);
        Ok(Self {
            config,
            progress,
            media,
            game_settings,
            selected_sign: None,
        })
    }

    /// Build from configuration, reading external catalogs when configured
    /// and falling back to the built-in content otherwise.
    pub fn from_config(config: Config) -> Result<Self, CoreError> {
        let catalog = match &config.catalog.levels_path {
            Some(path) => LevelCatalog::from_json_file(Path::new(path))?,
            None => LevelCatalog::new(builtin_levels())?,
        };
        let rewards = match &config.catalog.rewards_path {
            Some(path) => load_rewards(Path::new(path))?,
            None => builtin_rewards(),
        };
        let media = MediaLibrary::new(builtin_sign_media(), builtin_media_items());
        tracing::debug!(
            levels = catalog.len(),
            rewards = rewards.len(),
            "application context ready"
        );
        Ok(Self::new(config, catalog, rewards, media)?)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }

    pub fn progress_mut(&mut self) -> &mut ProgressStore {
        &mut self.progress
    }

    pub fn media(&self) -> &MediaLibrary {
        &self.media
    }

    pub fn game_settings(&self) -> &GameSettings {
        &self.game_settings
    }

    pub fn new_game_session(&self) -> GameSession {
        GameSession::new(self.game_settings)
    }

    /// Signs to practice: the given level, or the learner's current level.
    /// Unknown levels yield an empty list.
    pub fn practice_signs(&self, level_id: Option<u32>) -> Vec<Sign> {
        let level_id = level_id.unwrap_or(self.progress.profile().current_level);
        self.progress
            .catalog()
            .level(level_id)
            .map(|l| l.signs.clone())
            .unwrap_or_default()
    }

    /// Select a sign for open practice. Unknown ids clear the selection.
    pub fn select_sign(&mut self, sign_id: &str) -> Option<&Sign> {
        self.selected_sign = self.progress.catalog().find_sign(sign_id).cloned();
        self.selected_sign.as_ref()
    }

    pub fn selected_sign(&self) -> Option<&Sign> {
        self.selected_sign.as_ref()
    }

    pub fn selected_sign_media(&self) -> Option<&SignMedia> {
        self.selected_sign
            .as_ref()
            .and_then(|s| self.media.media_for(&s.id))
    }
}

fn load_rewards(path: &Path) -> Result<Vec<Reward>, CatalogError> {
    let content = std::fs::read_to_string(path).map_err(|e| CatalogError::ReadFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    rewards_from_json_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> AppContext {
        AppContext::from_config(Config::default()).unwrap()
    }

    #[test]
    fn builtin_context() {
        let ctx = ctx();
        assert_eq!(ctx.progress().levels().len(), 2);
        assert_eq!(ctx.progress().rewards().len(), 2);
        assert_eq!(ctx.media().media_count(), 5);
        assert_eq!(ctx.game_settings().feedback_delay_ms, 1500);
    }

    #[test]
    fn practice_signs_follow_current_level() {
        let mut ctx = ctx();
        assert_eq!(ctx.practice_signs(None).len(), 3);
        assert_eq!(ctx.practice_signs(Some(2)).len(), 2);
        assert!(ctx.practice_signs(Some(9)).is_empty());

        for id in ["1", "2", "3"] {
            ctx.progress_mut().complete_sign(id);
        }
        assert_eq!(ctx.practice_signs(None)[0].symbol, "Hello");
    }

    #[test]
    fn open_practice_selection() {
        let mut ctx = ctx();
        assert_eq!(ctx.select_sign("4").unwrap().symbol, "Hello");
        assert_eq!(ctx.selected_sign_media().unwrap().description, "Sign Hello");

        assert!(ctx.select_sign("nope").is_none());
        assert!(ctx.selected_sign_media().is_none());
    }

    #[test]
    fn session_uses_configured_settings() {
        let mut config = Config::default();
        config.game.feedback_delay_ms = 0;
        config.game.points_per_sign = 5;
        let ctx = AppContext::from_config(config).unwrap();
        let session = ctx.new_game_session();
        assert_eq!(session.settings().feedback_delay_ms, 0);
        assert_eq!(session.settings().points_per_sign, 5);
    }

    #[test]
    fn external_catalogs_are_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let levels = dir.path().join("levels.json");
        let rewards = dir.path().join("rewards.json");
        std::fs::write(
            &levels,
            r#"[{"levelId": 1, "title": "Numbers", "signs": [{"id": "n1", "symbol": "1"}]}]"#,
        )
        .unwrap();
        std::fs::write(
            &rewards,
            r#"[{"rewardId": "all", "title": "Done", "rule": {"kind": "all_levels_completed"}}]"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.catalog.levels_path = Some(levels.display().to_string());
        config.catalog.rewards_path = Some(rewards.display().to_string());
        let mut ctx = AppContext::from_config(config).unwrap();
        assert_eq!(ctx.progress().levels()[0].title, "Numbers");

        ctx.progress_mut().complete_sign("n1");
        assert!(ctx.progress().rewards()[0].unlocked);
        assert!(ctx.progress().is_game_over());
    }

    #[test]
    fn missing_catalog_file_is_reported() {
        let mut config = Config::default();
        config.catalog.levels_path = Some("/definitely/not/here.json".into());
        assert!(matches!(
            AppContext::from_config(config),
            Err(CoreError::Catalog(CatalogError::ReadFailed { .. }))
        ));
    }
}
