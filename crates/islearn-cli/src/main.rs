use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "islearn", version, about = "islearn sign-language practice CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Learner profile management
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Sign completion and level progress
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Level catalog
    Level {
        #[command(subcommand)]
        action: commands::level::LevelAction,
    },
    /// Reference images and videos
    Library {
        #[command(subcommand)]
        action: commands::library::LibraryAction,
    },
    /// Practice sessions
    Practice {
        #[command(subcommand)]
        action: commands::practice::PracticeAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so stdout stays machine-readable. `ISLEARN_LOG`
/// takes an `EnvFilter` directive; default is `warn`.
fn init_tracing() {
    let env_filter = EnvFilter::try_from_env("ISLEARN_LOG")
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Level { action } => commands::level::run(action),
        Commands::Library { action } => commands::library::run(action),
        Commands::Practice { action } => commands::practice::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
