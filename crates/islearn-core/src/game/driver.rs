//! Async driver for [`GameSession`].
//!
//! Each accepted evaluation spawns one delayed continuation that closes
//! the feedback window. Starting or resetting the game aborts it; the
//! ticket check in `finish_evaluation` covers a continuation that was
//! already running when the abort landed.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::{JoinError, JoinHandle};

use super::feedback::Feedback;
use super::session::GameSession;
use crate::catalog::Sign;
use crate::error::GameError;
use crate::events::Event;

pub struct SessionDriver {
    session: Arc<Mutex<GameSession>>,
    pending: Option<JoinHandle<Vec<Event>>>,
}

impl SessionDriver {
    pub fn new(session: GameSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
            pending: None,
        }
    }

    /// Shared handle for observers that want to read session state.
    pub fn session(&self) -> Arc<Mutex<GameSession>> {
        Arc::clone(&self.session)
    }

    pub async fn start_game(&mut self, signs: Vec<Sign>) -> Event {
        self.cancel_pending();
        self.session.lock().await.start_game(signs)
    }

    pub async fn reset_game(&mut self) -> Event {
        self.cancel_pending();
        self.session.lock().await.reset_game()
    }

    pub async fn evaluate_binary(
        &mut self,
        is_correct: bool,
    ) -> Result<Option<Feedback>, GameError> {
        let mut session = self.session.lock().await;
        let feedback = session.evaluate_binary(is_correct)?;
        drop(session);
        self.schedule_advance().await;
        Ok(feedback)
    }

    pub async fn evaluate_by_confidence(
        &mut self,
        confidence: f64,
    ) -> Result<Option<Feedback>, GameError> {
        let mut session = self.session.lock().await;
        let feedback = session.evaluate_by_confidence(confidence)?;
        drop(session);
        self.schedule_advance().await;
        Ok(feedback)
    }

    /// Wait for the current feedback window to close. Returns the events
    /// the advance produced (empty if nothing was pending or it was
    /// cancelled).
    pub async fn settle(&mut self) -> Vec<Event> {
        match self.pending.take() {
            Some(handle) => advance_events(handle.await),
            None => Vec::new(),
        }
    }

    async fn schedule_advance(&mut self) {
        let session = self.session.lock().await;
        let Some(pending) = session.pending().copied() else {
            return;
        };
        let delay = Duration::from_millis(session.settings().feedback_delay_ms);
        drop(session);

        let shared = Arc::clone(&self.session);
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.lock().await.finish_evaluation(pending.ticket)
        }));
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

/// A continuation that panicked or was aborted produced no events.
fn advance_events(joined: Result<Vec<Event>, JoinError>) -> Vec<Event> {
    match joined {
        Ok(events) => events,
        Err(e) if e.is_panic() => {
            tracing::warn!(error = %e, "feedback continuation panicked");
            Vec::new()
        }
        Err(e) => {
            tracing::debug!(error = %e, "feedback continuation cancelled");
            Vec::new()
        }
    }
}

impl Drop for SessionDriver {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameSettings;

    fn abc() -> Vec<Sign> {
        vec![Sign::new("a", "A"), Sign::new("b", "B"), Sign::new("c", "C")]
    }

    async fn driver() -> SessionDriver {
        let mut driver = SessionDriver::new(GameSession::new(GameSettings::default()));
        driver.start_game(abc()).await;
        driver
    }

    #[tokio::test(start_paused = true)]
    async fn advance_fires_after_delay() {
        let mut driver = driver().await;
        driver.evaluate_binary(true).await.unwrap();

        let session = driver.session();
        assert!(session.lock().await.is_evaluating());

        tokio::time::sleep(Duration::from_millis(1400)).await;
        assert_eq!(session.lock().await.cursor(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        let s = session.lock().await;
        assert_eq!(s.cursor(), 1);
        assert!(s.feedback().is_none());
        assert!(!s.is_evaluating());
    }

    #[tokio::test(start_paused = true)]
    async fn overlapping_evaluation_rejected() {
        let mut driver = driver().await;
        driver.evaluate_binary(true).await.unwrap();
        assert_eq!(
            driver.evaluate_binary(true).await,
            Err(GameError::EvaluationPending)
        );
        driver.settle().await;
        assert_eq!(driver.session().lock().await.score(), 10);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_cancels_pending_advance() {
        let mut driver = driver().await;
        driver.evaluate_binary(true).await.unwrap();
        driver.reset_game().await;

        tokio::time::sleep(Duration::from_millis(3000)).await;
        let session = driver.session();
        let s = session.lock().await;
        assert_eq!(s.cursor(), 0);
        assert_eq!(s.score(), 0);
        assert!(!s.is_over());
    }

    #[tokio::test(start_paused = true)]
    async fn full_run_through_driver() {
        let mut driver = driver().await;
        for correct in [true, false, true] {
            driver.evaluate_binary(correct).await.unwrap();
            driver.settle().await;
        }
        let session = driver.session();
        let s = session.lock().await;
        assert_eq!(s.score(), 20);
        assert!(s.is_over());
    }

    #[tokio::test]
    async fn failed_continuation_yields_no_events() {
        let panicked = tokio::spawn(async {
            if true {
                panic!("continuation failed");
            }
            Vec::<Event>::new()
        })
        .await;
        assert!(advance_events(panicked).is_empty());

        let handle = tokio::spawn(async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Vec::<Event>::new()
        });
        handle.abort();
        assert!(advance_events(handle.await).is_empty());

        let ok = tokio::spawn(async { vec![Event::ProgressReset { at: chrono::Utc::now() }] }).await;
        assert_eq!(advance_events(ok).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_session_schedules_nothing() {
        let mut driver = SessionDriver::new(GameSession::new(GameSettings::default()));
        driver.start_game(vec![]).await;
        assert_eq!(driver.evaluate_by_confidence(0.9).await, Ok(None));
        assert!(driver.settle().await.is_empty());
        assert!(driver.session().lock().await.is_over());
    }
}
