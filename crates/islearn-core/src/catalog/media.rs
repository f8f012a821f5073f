//! Sign media and the browseable media library.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Demonstration media for one sign.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignMedia {
    pub sign_id: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MediaType {
    #[default]
    Image,
    Video,
}

impl MediaType {
    /// Case-insensitive; anything unrecognised falls back to `Image`.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "IMAGE" => MediaType::Image,
            "VIDEO" => MediaType::Video,
            other => {
                tracing::warn!(media_type = other, "unknown media type, defaulting to IMAGE");
                MediaType::Image
            }
        }
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(MediaType::parse_lenient(&raw))
    }
}

/// A library entry (tutorial image or video) shown on the library screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub media_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub media_type: MediaType,
}

/// Sign media keyed by sign id, plus the browseable library items.
#[derive(Debug, Clone, Default)]
pub struct MediaLibrary {
    by_sign: HashMap<String, SignMedia>,
    items: Vec<MediaItem>,
}

impl MediaLibrary {
    /// Later entries for the same sign id replace earlier ones.
    pub fn new(media: Vec<SignMedia>, items: Vec<MediaItem>) -> Self {
        let by_sign = media
            .into_iter()
            .map(|m| (m.sign_id.clone(), m))
            .collect();
        Self { by_sign, items }
    }

    /// `None` means "no media yet" for this sign.
    pub fn media_for(&self, sign_id: &str) -> Option<&SignMedia> {
        self.by_sign.get(sign_id)
    }

    pub fn media_count(&self) -> usize {
        self.by_sign.len()
    }

    pub fn items(&self) -> &[MediaItem] {
        &self.items
    }

    pub fn images(&self) -> Vec<&MediaItem> {
        self.items_of(MediaType::Image)
    }

    pub fn videos(&self) -> Vec<&MediaItem> {
        self.items_of(MediaType::Video)
    }

    fn items_of(&self, media_type: MediaType) -> Vec<&MediaItem> {
        self.items
            .iter()
            .filter(|i| i.media_type == media_type)
            .collect()
    }
}
