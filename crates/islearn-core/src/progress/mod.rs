mod profile;
pub mod rewards;
mod store;

pub use profile::{UserPreferences, UserProfile};
pub use rewards::{evaluate_rewards, Reward, RewardRule, RewardType};
pub use store::{LevelStatus, ProfileFetch, ProgressStore};
