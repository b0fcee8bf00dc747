use clap::{Parser, Subcommand};
use sea_orm_migration::MigratorTrait;
use tracing::info;
use vendor_performance_api::{
    config,
    db::{self, DbConfig},
    migrator::Migrator,
};

#[derive(Parser, Debug)]
#[command(name = "migration", about = "Manage the vendor performance database schema")]
struct Cli {
    /// Database URL; falls back to the application configuration
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Apply pending migrations
    Up {
        /// Number of migrations to apply; all when omitted
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        /// Number of migrations to roll back
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// Show which migrations have been applied
    Status,
    /// Drop every table and reapply all migrations
    Fresh,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let database_url = match cli.database_url {
        Some(url) => url,
        None => config::load_config()?.database_url,
    };
    config::init_tracing("info", false);

    info!("Starting database migration");
    let pool = db::establish_connection_with_config(&DbConfig {
        url: database_url,
        max_connections: 1,
        ..DbConfig::default()
    })
    .await?;

    match cli.command.unwrap_or(Command::Up { num: None }) {
        Command::Up { num } => Migrator::up(&pool, num).await?,
        Command::Down { num } => Migrator::down(&pool, Some(num)).await?,
        Command::Status => Migrator::status(&pool).await?,
        Command::Fresh => Migrator::fresh(&pool).await?,
    }

    info!("Migration completed successfully");
    Ok(())
}
