pub mod config;
pub mod level;
pub mod library;
pub mod practice;
pub mod profile;
pub mod progress;

use islearn_core::{AppContext, Config, Database, Event, ProfileFetch, UserProfile};

/// Profile used until someone logs in.
pub const DEFAULT_USER: &str = "local";

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Database plus application context with the active learner loaded.
pub struct Workspace {
    pub db: Database,
    pub ctx: AppContext,
}

impl Workspace {
    pub fn open() -> Result<Self, Box<dyn std::error::Error>> {
        let config = Config::load()?;
        let db = Database::open()?;
        let mut ctx = AppContext::from_config(config)?;

        let user_id = db
            .active_user()?
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        if ctx.progress_mut().fetch_profile(&db, &user_id)? == ProfileFetch::NotFound {
            ctx.progress_mut()
                .load_profile(Some(UserProfile::new_account(&user_id, "", "")));
        }
        Ok(Self { db, ctx })
    }

    /// Persist the profile and remember it as the active one.
    pub fn save(&self) -> CommandResult {
        let profile = self.ctx.progress().profile();
        self.ctx.progress().save_profile(&self.db)?;
        self.db.set_active_user(&profile.user_id)?;
        Ok(())
    }
}

/// One event per line, as JSON.
pub fn print_events(events: &[Event]) -> CommandResult {
    for event in events {
        println!("{}", serde_json::to_string(event)?);
    }
    Ok(())
}
