//! Practice session commands.
//!
//! Attempts are given up front on the command line and replayed through
//! the session driver, so the feedback delay from the config applies
//! between signs. Session events are printed as JSON lines as they happen.

use clap::builder::BoolishValueParser;
use clap::Subcommand;
use islearn_core::{Event, GameError, SessionDriver};

use super::{print_events, CommandResult, Workspace};

#[derive(Subcommand)]
pub enum PracticeAction {
    /// Practice the signs of one level
    Run {
        /// Level to practice (defaults to the current level)
        #[arg(long)]
        level: Option<u32>,
        /// Pass/fail results per sign, e.g. "1,0,1"
        #[arg(
            long,
            value_delimiter = ',',
            value_parser = BoolishValueParser::new(),
            required_unless_present = "confidence",
            conflicts_with = "confidence"
        )]
        results: Vec<bool>,
        /// Recognizer confidence per sign, e.g. "0.9,0.6,0.2"
        #[arg(long, value_delimiter = ',')]
        confidence: Vec<f64>,
        /// Mark passed signs as completed in the learner's progress
        #[arg(long)]
        record: bool,
    },
}

enum Attempt {
    Binary(bool),
    Confidence(f64),
}

pub fn run(action: PracticeAction) -> CommandResult {
    match action {
        PracticeAction::Run {
            level,
            results,
            confidence,
            record,
        } => {
            let attempts = if results.is_empty() {
                confidence.into_iter().map(Attempt::Confidence).collect()
            } else {
                results.into_iter().map(Attempt::Binary).collect()
            };
            run_session(level, attempts, record)
        }
    }
}

fn run_session(level: Option<u32>, attempts: Vec<Attempt>, record: bool) -> CommandResult {
    let mut ws = Workspace::open()?;
    let signs = ws.ctx.practice_signs(level);
    if signs.is_empty() {
        tracing::warn!(?level, "no signs to practice");
    }

    let mut session = ws.ctx.new_game_session();
    session.subscribe(|event| {
        if let Ok(json) = serde_json::to_string(event) {
            println!("{json}");
        }
    });

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let (score, passed) = runtime.block_on(async {
        let mut driver = SessionDriver::new(session);
        driver.start_game(signs).await;

        let mut passed = Vec::new();
        for attempt in attempts {
            let shared = driver.session();
            let sign = shared.lock().await.current_sign().cloned();
            let outcome = match attempt {
                Attempt::Binary(ok) => driver.evaluate_binary(ok).await,
                Attempt::Confidence(c) => driver.evaluate_by_confidence(c).await,
            };
            let Some(feedback) = outcome? else { break };
            if feedback.is_success() {
                passed.extend(sign.map(|s| s.id));
            }
            driver.settle().await;
            if shared.lock().await.is_over() {
                break;
            }
        }

        let score = driver.session().lock().await.score();
        Ok::<_, GameError>((score, passed))
    })?;

    let progress = ws.ctx.progress_mut();
    let mut events: Vec<Event> = progress.record_game_score(score);
    if record {
        for sign_id in &passed {
            events.extend(progress.complete_sign(sign_id));
        }
    }
    print_events(&events)?;
    ws.save()?;
    Ok(())
}
