//! Administrative seeding for trainlog.
//!
//! ```bash
//! # Install the default exercise catalog
//! cargo run --bin trainlog-seed -- exercises
//!
//! # Mint a session token for a user id handed out by the identity provider
//! cargo run --bin trainlog-seed -- session --user 2f1c...
//!
//! # Revoke it again
//! cargo run --bin trainlog-seed -- revoke <token>
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use trainlog::config::Config;
use trainlog::db;
use trainlog::migrations::run_migrations;
use trainlog::models::DEFAULT_EXERCISES;
use trainlog::repositories::{ExerciseRepository, SessionRepository};

#[derive(Parser)]
#[command(name = "trainlog-seed", about = "Seed the trainlog database")]
struct SeedArgs {
    /// Database URL override
    #[arg(long)]
    database_url: Option<String>,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Insert the default exercise catalog, skipping names that exist
    Exercises,
    /// Create a session token for a user and print it
    Session {
        /// User id the token resolves to
        #[arg(long)]
        user: String,

        /// Token lifetime in days (defaults to SESSION_TTL_DAYS)
        #[arg(long)]
        ttl_days: Option<i64>,
    },
    /// Revoke a session token
    Revoke {
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = SeedArgs::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    dotenvy::dotenv().ok();
    let mut config = Config::from_env()?;
    if let Some(url) = args.database_url {
        config.database_url = url;
    }

    let pool = db::create_pool(&config.database_url)?;
    run_migrations(&pool)?;

    match args.command {
        Command::Exercises => {
            let repo = ExerciseRepository::new(pool);
            let mut created = 0;
            for name in DEFAULT_EXERCISES {
                let (exercise, inserted) = repo.insert_if_missing(name).await?;
                if inserted {
                    info!("Exercise {} created ({})", exercise.name, exercise.id);
                    created += 1;
                }
            }
            info!(
                "Seeded {} of {} default exercises",
                created,
                DEFAULT_EXERCISES.len()
            );
        }
        Command::Session { user, ttl_days } => {
            let days = ttl_days.unwrap_or(config.session_ttl_days);
            anyhow::ensure!(days > 0, "--ttl-days must be positive");
            let repo = SessionRepository::new(pool);
            let ttl = chrono::Duration::try_days(days)
                .with_context(|| format!("--ttl-days out of range: {days}"))?;
            let token = repo.create(&user, ttl).await?;
            info!("Session for {} valid for {} days", user, days);
            println!("{token}");
        }
        Command::Revoke { token } => {
            SessionRepository::new(pool).delete(&token).await?;
            info!("Session revoked");
        }
    }

    Ok(())
}
