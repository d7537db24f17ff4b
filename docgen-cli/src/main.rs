mod cli;
mod commands;
mod serve;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; the environment may already be populated.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => serve::run_serve(&host, port).await,
        Commands::Types => {
            commands::list_types();
            Ok(())
        }
        Commands::Structure { document_type } => commands::print_structure(&document_type),
        Commands::Prompt { document_type, project, sprint, requirements, token } => {
            commands::print_prompt(&document_type, project, sprint, requirements, token).await
        }
    }
}
