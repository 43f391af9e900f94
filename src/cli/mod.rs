pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "scheduler")]
#[command(about = "Scheduler CLI - database administration for the Project Scheduler API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Apply the embedded database migrations")]
    Migrate,

    #[command(about = "Insert the development role and user (idempotent)")]
    Seed,

    #[command(about = "Issue an access token for an existing user")]
    Token {
        #[arg(help = "Username to issue the token for")]
        username: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Migrate => commands::database::migrate(output_format).await,
        Commands::Seed => commands::database::seed(output_format).await,
        Commands::Token { username } => commands::token::issue(&username, output_format).await,
    }
}
