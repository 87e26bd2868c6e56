use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::cli::OutputFormat;
use crate::config::AppConfig;
use crate::database::DatabaseManager;

#[derive(Subcommand)]
pub enum DbCommands {
    #[command(about = "Apply pending schema migrations to DATABASE_URL")]
    Migrate,

    #[command(about = "Check that the database accepts connections")]
    Ping,
}

pub async fn handle(cmd: DbCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = DatabaseManager::connect(&config.database)
        .await
        .context("failed to connect to database")?;

    let action = match cmd {
        DbCommands::Migrate => {
            DatabaseManager::migrate(&pool).await?;
            "migrated"
        }
        DbCommands::Ping => {
            DatabaseManager::health_check(&pool).await?;
            "ok"
        }
    };

    DatabaseManager::close(pool).await;

    match output_format {
        OutputFormat::Json => println!("{}", json!({ "database": action })),
        OutputFormat::Text => println!("database: {}", action),
    }
    Ok(())
}
