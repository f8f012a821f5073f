//! Learner profile commands.
//!
//! The active learner is remembered in the database; every other command
//! operates on it.

use clap::Subcommand;
use islearn_core::{ProfileFetch, UserPreferences, UserProfile};

use super::{CommandResult, Workspace};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Print the active profile as JSON
    Show,
    /// Switch to a learner, creating the profile if needed
    Login {
        /// Learner id
        user_id: String,
        /// Display name
        #[arg(long)]
        name: Option<String>,
        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },
    /// Change the display name of the active learner
    Rename {
        name: String,
    },
    /// Update preferences
    Prefs {
        /// true or false
        #[arg(long, action = clap::ArgAction::Set)]
        dark_mode: bool,
    },
}

pub fn run(action: ProfileAction) -> CommandResult {
    let mut ws = Workspace::open()?;

    match action {
        ProfileAction::Show => {}
        ProfileAction::Login {
            user_id,
            name,
            email,
        } => login(&mut ws, &user_id, name, email)?,
        ProfileAction::Rename { name } => {
            let user_id = ws.ctx.progress().profile().user_id.clone();
            ws.ctx.progress_mut().set_identity(&name, &user_id);
        }
        ProfileAction::Prefs { dark_mode } => {
            ws.ctx
                .progress_mut()
                .set_preferences(UserPreferences { dark_mode });
        }
    }

    ws.save()?;
    println!(
        "{}",
        serde_json::to_string_pretty(ws.ctx.progress().profile())?
    );
    Ok(())
}

fn login(
    ws: &mut Workspace,
    user_id: &str,
    name: Option<String>,
    email: Option<String>,
) -> CommandResult {
    let progress = ws.ctx.progress_mut();
    match progress.fetch_profile(&ws.db, user_id)? {
        ProfileFetch::NotFound => {
            let account = UserProfile::new_account(
                user_id,
                name.unwrap_or_default(),
                email.unwrap_or_default(),
            );
            tracing::info!(user_id, "creating profile");
            progress.load_profile(Some(account));
        }
        ProfileFetch::Loaded => {
            if let Some(email) = email {
                let mut profile = progress.profile().clone();
                profile.email = email;
                progress.load_profile(Some(profile));
            }
            if let Some(name) = name {
                progress.set_identity(&name, user_id);
            }
        }
    }
    Ok(())
}
