use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use marketplace_schema::{
    config::{self, AppConfig},
    db,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = config::load_config().context("failed to load configuration")?;
    if let Some(url) = cli.database_url {
        cfg.database_url = url;
    }
    config::init_tracing(&cfg.log_level, cfg.log_json);

    run(&cfg, cli.command).await
}

#[derive(Parser)]
#[command(name = "migration", about = "Apply or revert the marketplace schema", version)]
struct Cli {
    #[arg(long, help = "Database URL; overrides configuration and APP__DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Apply pending migrations
    Up {
        #[arg(long, help = "Apply at most this many migrations")]
        steps: Option<u32>,
    },
    /// Revert applied migrations, newest first
    Down {
        #[arg(long, help = "Revert at most this many migrations (default: all)")]
        steps: Option<u32>,
    },
    /// Revert everything and apply all migrations again
    Fresh,
    /// List applied and pending migrations
    Status,
}

async fn run(cfg: &AppConfig, command: Command) -> Result<()> {
    let pool = db::establish_connection_with_config(&cfg.into())
        .await
        .context("failed to connect to the database")?;

    match command {
        Command::Up { steps } => db::apply_migrations(&pool, steps).await?,
        Command::Down { steps } => db::rollback_migrations(&pool, steps).await?,
        Command::Fresh => db::reset_schema(&pool).await?,
        Command::Status => {
            for name in db::applied_migrations(&pool).await? {
                println!("applied  {name}");
            }
            for name in db::pending_migrations(&pool).await? {
                println!("pending  {name}");
            }
        }
    }

    info!("migration command finished");
    db::close_pool(pool).await?;
    Ok(())
}
