use anyhow::Context;
use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, Claims};
use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Sign a bearer token with the configured JWT secret")]
    Issue {
        #[arg(long, help = "Subject (user name) placed in the token")]
        subject: String,
        #[arg(long, help = "Lifetime in hours (defaults to JWT_EXPIRY_HOURS)")]
        hours: Option<i64>,
    },
}

pub fn handle(cmd: TokenCommands, config: &AppConfig, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        TokenCommands::Issue { subject, hours } => {
            let security = &config.security;
            let claims = match hours {
                Some(hours) => Claims::with_expiry(subject, security, hours),
                None => Claims::new(subject, security),
            }
            .context("invalid token lifetime")?;
            let token = generate_jwt(&claims, security).context("failed to sign token")?;

            match output_format {
                OutputFormat::Json => println!(
                    "{}",
                    json!({ "token": token, "subject": claims.sub, "expires_at": claims.exp })
                ),
                OutputFormat::Text => println!("{}", token),
            }
            Ok(())
        }
    }
}
