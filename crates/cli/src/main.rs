//! minik CLI - admin role management from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # List admins
//! minik-cli admins list
//!
//! # Grant the admin role
//! minik-cli admins promote user@example.com
//! ```
//!
//! # Commands
//!
//! - `admins list` - Show the deduplicated admin roster
//! - `admins promote` - Grant the admin role to an email, then show the roster

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "minik-cli")]
#[command(author, version, about = "minik admin CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the admin role
    Admins {
        #[command(subcommand)]
        action: AdminsAction,
    },
}

#[derive(Subcommand)]
enum AdminsAction {
    /// List every account holding the admin role
    List,
    /// Grant the admin role to an account
    Promote {
        /// Email address of the account
        email: String,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Admins { action } => match action {
            AdminsAction::List => {
                commands::admins::list().await?;
            }
            AdminsAction::Promote { email } => commands::admins::promote(&email).await?,
        },
    }
    Ok(())
}
