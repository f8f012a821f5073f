mod builtin;
mod level;
mod media;

pub use builtin::{builtin_levels, builtin_media_items, builtin_rewards, builtin_sign_media};
pub use level::{Difficulty, Level, LevelCatalog, Sign, SignType};
pub use media::{MediaItem, MediaLibrary, MediaType, SignMedia};
