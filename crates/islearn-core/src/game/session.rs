//! Practice-session state machine.
//!
//! Like a wall-clock timer, the session has no internal thread. An
//! evaluation records feedback and score immediately and schedules the
//! cursor advance as a [`PendingAdvance`]; the caller fires it either by
//! calling `tick()` periodically or by handing the [`Ticket`] back through
//! `finish_evaluation()` once its own timer elapses (see
//! [`SessionDriver`](super::SessionDriver)).
//!
//! ## State Transitions
//!
//! ```text
//! Ready -> Evaluating -> Ready -> ... -> Over
//! ```
//!
//! While an advance is pending, further evaluations are rejected.
//!
//! Commands that change the cursor (`start_game`, `reset_game`,
//! `finish_evaluation`, `tick`) return their events. The `evaluate_*`
//! calls return the feedback instead; their `EvaluationRecorded` (or, for
//! an empty session, `GameFinished`) event reaches subscribers only.
//! `start_game` and `reset_game` start a new generation; a ticket from an
//! older generation never fires.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::feedback::Feedback;
use crate::catalog::Sign;
use crate::error::GameError;
use crate::events::{Event, EventBus, SubscriptionId};
use crate::storage::GameConfig;

/// Session tuning, usually taken from [`GameConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GameSettings {
    pub feedback_delay_ms: u64,
    pub confidence_threshold: f64,
    pub partial_threshold: f64,
    pub points_per_sign: u32,
}

impl Default for GameSettings {
    fn default() -> Self {
        (&GameConfig::default()).into()
    }
}

impl From<&GameConfig> for GameSettings {
    fn from(cfg: &GameConfig) -> Self {
        Self {
            feedback_delay_ms: cfg.feedback_delay_ms,
            confidence_threshold: cfg.confidence_threshold,
            partial_threshold: cfg.partial_threshold,
            points_per_sign: cfg.points_per_sign,
        }
    }
}

/// Identifies one scheduled advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ticket {
    pub generation: u64,
    pub sequence: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAdvance {
    pub ticket: Ticket,
    /// Epoch milliseconds at which the feedback window closes.
    pub due_at_ms: u64,
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub sign_count: usize,
    pub cursor: usize,
    pub current_sign: Option<Sign>,
    pub score: u32,
    pub is_over: bool,
    pub is_evaluating: bool,
    pub feedback: Option<Feedback>,
}

#[derive(Debug, Default)]
pub struct GameSession {
    settings: GameSettings,
    signs: Vec<Sign>,
    cursor: usize,
    score: u32,
    is_over: bool,
    feedback: Option<Feedback>,
    pending: Option<PendingAdvance>,
    generation: u64,
    sequence: u64,
    bus: EventBus,
}

impl GameSession {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn signs(&self) -> &[Sign] {
        &self.signs
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// `None` when the cursor is out of range, including an empty session.
    pub fn current_sign(&self) -> Option<&Sign> {
        self.signs.get(self.cursor)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// True while feedback is on screen and input is blocked.
    pub fn is_evaluating(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending(&self) -> Option<&PendingAdvance> {
        self.pending.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            sign_count: self.signs.len(),
            cursor: self.cursor,
            current_sign: self.current_sign().cloned(),
            score: self.score,
            is_over: self.is_over,
            is_evaluating: self.is_evaluating(),
            feedback: self.feedback.clone(),
        }
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        self.bus.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Install a new sign sequence and clear all session state. An empty
    /// sequence is accepted; the first evaluation then ends the session.
    pub fn start_game(&mut self, signs: Vec<Sign>) -> Event {
        self.signs = signs;
        self.clear();
        let event = Event::GameStarted {
            sign_count: self.signs.len(),
            generation: self.generation,
            at: Utc::now(),
        };
        self.bus.emit(&event);
        event
    }

    /// Same as `start_game` with the current sign sequence.
    pub fn reset_game(&mut self) -> Event {
        self.clear();
        let event = Event::GameReset {
            generation: self.generation,
            at: Utc::now(),
        };
        self.bus.emit(&event);
        event
    }

    /// Pass/fail evaluation of the current sign.
    ///
    /// Returns `Ok(None)` when there is no sign to evaluate; the session
    /// is then over.
    pub fn evaluate_binary(&mut self, is_correct: bool) -> Result<Option<Feedback>, GameError> {
        let feedback = if is_correct {
            Feedback::correct()
        } else {
            Feedback::well_tried()
        };
        self.evaluate(feedback, is_correct)
    }

    /// Confidence-graded evaluation using the configured threshold.
    pub fn evaluate_by_confidence(
        &mut self,
        confidence: f64,
    ) -> Result<Option<Feedback>, GameError> {
        self.evaluate_by_confidence_with(confidence, self.settings.confidence_threshold)
    }

    /// `confidence >= threshold` scores; `>= partial_threshold` is "almost";
    /// anything lower is a miss. Both bounds are inclusive, and `threshold`
    /// may not be below the configured partial threshold.
    pub fn evaluate_by_confidence_with(
        &mut self,
        confidence: f64,
        threshold: f64,
    ) -> Result<Option<Feedback>, GameError> {
        for value in [confidence, threshold] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GameError::InvalidConfidence(value));
            }
        }
        let partial = self.settings.partial_threshold;
        if threshold < partial {
            return Err(GameError::ThresholdBelowPartial { threshold, partial });
        }

        let (feedback, scored) = if confidence >= threshold {
            (Feedback::perfect(), true)
        } else if confidence >= self.settings.partial_threshold {
            (Feedback::almost(), false)
        } else {
            (Feedback::well_tried(), false)
        };
        self.evaluate(feedback, scored)
    }

    /// Close the feedback window for `ticket` and move to the next sign.
    ///
    /// Stale tickets (superseded by a reset, or already fired) are ignored
    /// and produce no events.
    pub fn finish_evaluation(&mut self, ticket: Ticket) -> Vec<Event> {
        match self.pending {
            Some(p) if p.ticket == ticket => {}
            _ => {
                tracing::debug!(?ticket, "ignoring stale evaluation ticket");
                return Vec::new();
            }
        }
        self.pending = None;
        self.feedback = None;

        let event = if self.cursor + 1 < self.signs.len() {
            self.cursor += 1;
            Event::SignAdvanced {
                cursor: self.cursor,
                at: Utc::now(),
            }
        } else {
            self.is_over = true;
            Event::GameFinished {
                score: self.score,
                at: Utc::now(),
            }
        };
        self.bus.emit(&event);
        vec![event]
    }

    /// Fire the pending advance if its window has closed by `now_ms`.
    pub fn tick_at(&mut self, now_ms: u64) -> Vec<Event> {
        match self.pending {
            Some(p) if now_ms >= p.due_at_ms => self.finish_evaluation(p.ticket),
            _ => Vec::new(),
        }
    }

    /// Call periodically.
    pub fn tick(&mut self) -> Vec<Event> {
        self.tick_at(now_ms())
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear(&mut self) {
        self.generation += 1;
        self.cursor = 0;
        self.score = 0;
        self.is_over = false;
        self.feedback = None;
        self.pending = None;
    }

    fn evaluate(
        &mut self,
        feedback: Feedback,
        scored: bool,
    ) -> Result<Option<Feedback>, GameError> {
        if self.pending.is_some() {
            return Err(GameError::EvaluationPending);
        }

        let Some(sign_id) = self.current_sign().map(|s| s.id.clone()) else {
            if !self.is_over {
                self.is_over = true;
                let event = Event::GameFinished {
                    score: self.score,
                    at: Utc::now(),
                };
                self.bus.emit(&event);
            }
            return Ok(None);
        };

        if scored {
            self.score = self.score.saturating_add(self.settings.points_per_sign);
        }
        self.feedback = Some(feedback.clone());
        self.sequence += 1;
        self.pending = Some(PendingAdvance {
            ticket: Ticket {
                generation: self.generation,
                sequence: self.sequence,
            },
            due_at_ms: now_ms().saturating_add(self.settings.feedback_delay_ms),
        });

        self.bus.emit(&Event::EvaluationRecorded {
            cursor: self.cursor,
            sign_id: Some(sign_id),
            kind: feedback.kind,
            score: self.score,
            at: Utc::now(),
        });
        Ok(Some(feedback))
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
