//! # islearn Core Library
//!
//! Core logic for islearn, a sign-language learning tool. Learners work
//! through an ordered catalog of levels, each a list of signs, and earn
//! rewards as they go. The `islearn` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Catalog**: Levels, signs and reference media, built in or loaded from JSON
//! - **Progress**: The learner profile plus the level state machine that
//!   unlocks levels and awards rewards as signs are completed
//! - **Game**: A practice session that scores each attempt and holds its
//!   feedback for a fixed delay before moving to the next sign
//! - **Storage**: SQLite profile persistence and TOML configuration
//!
//! ## Key Components
//!
//! - [`ProgressStore`]: Learner progress and level advancement
//! - [`GameSession`]: Tick-driven practice session state machine
//! - [`SessionDriver`]: Runs a session's feedback delays on tokio
//! - [`Database`]: Profile persistence
//! - [`Config`]: Application configuration management

pub mod catalog;
pub mod context;
pub mod error;
pub mod events;
pub mod game;
pub mod progress;
pub mod storage;

pub use catalog::{Level, LevelCatalog, MediaItem, MediaLibrary, MediaType, Sign, SignMedia};
pub use context::AppContext;
pub use error::{CatalogError, ConfigError, CoreError, GameError, StorageError};
pub use events::{Event, EventBus, SubscriptionId};
pub use game::{Feedback, FeedbackKind, GameSession, GameSettings, GameSnapshot, SessionDriver};
pub use progress::{
    LevelStatus, ProfileFetch, ProgressStore, Reward, RewardRule, RewardType, UserPreferences,
    UserProfile,
};
pub use storage::{Config, Database, MemoryProfileStore, ProfileStore};
