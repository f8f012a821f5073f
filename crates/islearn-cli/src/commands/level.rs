use clap::Subcommand;

use super::{CommandResult, Workspace};

#[derive(Subcommand)]
pub enum LevelAction {
    /// List all levels in the catalog
    List,
    /// Show one level with its signs
    Show {
        /// Level id
        id: u32,
    },
}

pub fn run(action: LevelAction) -> CommandResult {
    let ws = Workspace::open()?;
    let catalog = ws.ctx.progress().catalog();

    match action {
        LevelAction::List => {
            println!("{}", serde_json::to_string_pretty(catalog.levels())?);
        }
        LevelAction::Show { id } => {
            let level = catalog
                .level(id)
                .ok_or_else(|| format!("level not found: {id}"))?;
            println!("{}", serde_json::to_string_pretty(level)?);
        }
    }
    Ok(())
}
