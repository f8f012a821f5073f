use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FeedbackKind {
    Success,
    Warning,
    Error,
    Info,
}

/// Transient result of one evaluation, shown until the feedback window
/// closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub message: String,
    pub kind: FeedbackKind,
    pub color_hex: String,
    pub play_sound: bool,
}

const GREEN: &str = "#4CAF50";
const AMBER: &str = "#FFC107";
const RED: &str = "#F44336";

impl Feedback {
    fn new(message: &str, kind: FeedbackKind, color_hex: &str, play_sound: bool) -> Self {
        Self {
            message: message.to_string(),
            kind,
            color_hex: color_hex.to_string(),
            play_sound,
        }
    }

    pub fn correct() -> Self {
        Self::new("Good job! ✅", FeedbackKind::Success, GREEN, true)
    }

    pub fn perfect() -> Self {
        Self::new("Perfect! 🔥", FeedbackKind::Success, GREEN, true)
    }

    pub fn almost() -> Self {
        Self::new("Almost there 👀", FeedbackKind::Info, AMBER, false)
    }

    pub fn well_tried() -> Self {
        Self::new("Well tried! ❌", FeedbackKind::Error, RED, false)
    }

    pub fn is_success(&self) -> bool {
        self.kind == FeedbackKind::Success
    }
}
