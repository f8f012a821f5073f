use clap::Subcommand;

use super::{CommandResult, Workspace};

#[derive(Subcommand)]
pub enum LibraryAction {
    /// List image items
    Images,
    /// List video items
    Videos,
    /// Reference media for one sign
    Media {
        /// Sign id from the level catalog
        sign_id: String,
    },
}

pub fn run(action: LibraryAction) -> CommandResult {
    let mut ws = Workspace::open()?;

    match action {
        LibraryAction::Images => {
            println!("{}", serde_json::to_string_pretty(&ws.ctx.media().images())?);
        }
        LibraryAction::Videos => {
            println!("{}", serde_json::to_string_pretty(&ws.ctx.media().videos())?);
        }
        LibraryAction::Media { sign_id } => {
            if ws.ctx.select_sign(&sign_id).is_none() {
                return Err(format!("unknown sign: {sign_id}").into());
            }
            // null when the sign has no media yet
            println!(
                "{}",
                serde_json::to_string_pretty(&ws.ctx.selected_sign_media())?
            );
        }
    }
    Ok(())
}
