//! Built-in demo content used when no external catalog is configured.

use super::level::{Difficulty, Level, Sign, SignType};
use super::media::{MediaItem, MediaType, SignMedia};
use crate::progress::{Reward, RewardRule};

pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level::new(
            1,
            "Basic Signs",
            vec![Sign::new("1", "A"), Sign::new("2", "B"), Sign::new("3", "C")],
        )
        .with_description("Start with simple signs"),
        Level::new(
            2,
            "Daily Words",
            vec![Sign::new("4", "Hello"), Sign::new("5", "Thank You")],
        )
        .with_description("Learn common words")
        .with_sign_type(SignType::Word)
        .with_difficulty(Difficulty::Intermediate),
    ]
}

pub fn builtin_sign_media() -> Vec<SignMedia> {
    [
        ("1", "A", "Sign A"),
        ("2", "B", "Sign B"),
        ("3", "C", "Sign C"),
        ("4", "Hello", "Sign Hello"),
        ("5", "ThankYou", "Sign Thank You"),
    ]
    .into_iter()
    .map(|(id, slug, description)| SignMedia {
        sign_id: id.into(),
        image_url: format!("url_to_{slug}_image"),
        video_url: format!("url_to_{slug}_video"),
        description: description.into(),
    })
    .collect()
}

pub fn builtin_media_items() -> Vec<MediaItem> {
    let item = |id: &str, title: &str, url: &str, thumb: &str, media_type| MediaItem {
        id: id.into(),
        title: title.into(),
        media_url: url.into(),
        thumbnail_url: thumb.into(),
        media_type,
    };
    vec![
        item(
            "1",
            "Hello Sign",
            "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=400&h=400&fit=crop",
            "https://images.unsplash.com/photo-1559827260-dc66d52bef19?w=200&h=200&fit=crop",
            MediaType::Image,
        ),
        item(
            "2",
            "Thank You Sign",
            "https://images.unsplash.com/photo-1434030216411-0b793f4b4173?w=400&h=400&fit=crop",
            "https://images.unsplash.com/photo-1434030216411-0b793f4b4173?w=200&h=200&fit=crop",
            MediaType::Image,
        ),
        item(
            "3",
            "Goodbye Sign",
            "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=400&h=400&fit=crop",
            "https://images.unsplash.com/photo-1571019613454-1cb2f99b2d8b?w=200&h=200&fit=crop",
            MediaType::Image,
        ),
        item(
            "4",
            "Basic Signs Tutorial",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4",
            "https://images.unsplash.com/photo-1516321318423-f06f85e504b3?w=400&h=300&fit=crop",
            MediaType::Video,
        ),
        item(
            "5",
            "Alphabet Signs",
            "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/ElephantsDream.mp4",
            "https://images.unsplash.com/photo-1503676260728-1c00da094a0b?w=400&h=300&fit=crop",
            MediaType::Video,
        ),
    ]
}

pub fn builtin_rewards() -> Vec<Reward> {
    vec![
        Reward::new(
            "1",
            "First Sign!",
            "You completed your first sign!",
            RewardRule::SignsCompleted { count: 1 },
        ),
        Reward::new(
            "2",
            "Level 1 Champ",
            "You completed all signs in Level 1",
            RewardRule::LevelCompleted { level_id: 1 },
        ),
    ]
}
