use clap::Subcommand;
use serde_json::json;

use super::{print_events, CommandResult, Workspace};

#[derive(Subcommand)]
pub enum ProgressAction {
    /// Print current level, completed signs and scores as JSON
    Status,
    /// Mark a sign as completed
    Complete {
        /// Sign id from the level catalog
        sign_id: String,
    },
    /// Start over from level 1
    Reset,
    /// List rewards with their unlock state
    Rewards,
    /// Per-level unlock and completion status
    Levels,
}

pub fn run(action: ProgressAction) -> CommandResult {
    let mut ws = Workspace::open()?;

    match action {
        ProgressAction::Status => {
            let progress = ws.ctx.progress();
            let profile = progress.profile();
            let status = json!({
                "userId": profile.user_id,
                "currentLevel": profile.current_level,
                "levelUnlocked": profile.level_unlocked,
                "completedSigns": profile.completed_signs,
                "rewardsEarned": profile.rewards_earned,
                "currentScore": profile.current_score,
                "totalScore": profile.total_score,
                "isGameOver": progress.is_game_over(),
            });
            println!("{}", serde_json::to_string_pretty(&status)?);
        }
        ProgressAction::Complete { sign_id } => {
            if ws.ctx.progress().catalog().find_sign(&sign_id).is_none() {
                return Err(format!("unknown sign: {sign_id}").into());
            }
            let events = ws.ctx.progress_mut().complete_sign(&sign_id);
            print_events(&events)?;
            ws.save()?;
        }
        ProgressAction::Reset => {
            let events = ws.ctx.progress_mut().reset_progress();
            print_events(&events)?;
            ws.save()?;
        }
        ProgressAction::Rewards => {
            let rewards = ws.ctx.progress().rewards();
            println!("{}", serde_json::to_string_pretty(rewards)?);
        }
        ProgressAction::Levels => {
            let statuses = ws.ctx.progress().level_statuses();
            println!("{}", serde_json::to_string_pretty(&statuses)?);
        }
    }
    Ok(())
}
