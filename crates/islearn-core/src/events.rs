use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::FeedbackKind;

/// Every state change in the system produces an Event.
/// The presentation layer subscribes to them through an [`EventBus`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A profile document replaced the in-memory profile.
    ProfileLoaded {
        user_id: String,
        current_level: u32,
        at: DateTime<Utc>,
    },
    IdentityChanged {
        user_id: String,
        name: String,
        at: DateTime<Utc>,
    },
    SignCompleted {
        sign_id: String,
        level_id: u32,
        at: DateTime<Utc>,
    },
    LevelAdvanced {
        from_level: u32,
        to_level: u32,
        at: DateTime<Utc>,
    },
    /// Terminal state: no level left, or the current level is unknown.
    GameOver {
        level_id: u32,
        at: DateTime<Utc>,
    },
    RewardUnlocked {
        reward_id: String,
        title: String,
        at: DateTime<Utc>,
    },
    /// A reward became locked again (only after a reset or a profile load).
    RewardLocked {
        reward_id: String,
        at: DateTime<Utc>,
    },
    ProgressReset {
        at: DateTime<Utc>,
    },
    ScoreRecorded {
        score: u32,
        total_score: u32,
        at: DateTime<Utc>,
    },
    GameStarted {
        sign_count: usize,
        generation: u64,
        at: DateTime<Utc>,
    },
    EvaluationRecorded {
        cursor: usize,
        sign_id: Option<String>,
        kind: FeedbackKind,
        score: u32,
        at: DateTime<Utc>,
    },
    /// Feedback window closed and the cursor moved on.
    SignAdvanced {
        cursor: usize,
        at: DateTime<Utc>,
    },
    GameFinished {
        score: u32,
        at: DateTime<Utc>,
    },
    GameReset {
        generation: u64,
        at: DateTime<Utc>,
    },
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn Fn(&Event) + Send + Sync>;

/// Observer list. Callbacks run synchronously, in subscription order.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if the id was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sid, _)| *sid != id);
        self.subscribers.len() != before
    }

    pub fn emit(&self, event: &Event) {
        for (_, callback) in &self.subscribers {
            callback(event);
        }
    }

    pub fn emit_all(&self, events: &[Event]) {
        for event in events {
            self.emit(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
