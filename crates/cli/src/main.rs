//! Prime Optic CLI - Database migrations and catalog management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations (sessions, favorites)
//! po-cli migrate
//!
//! # Load products from a YAML or JSON file into Firestore
//! po-cli seed catalog.yaml
//!
//! # Grant or revoke the admin role
//! po-cli admin promote <uid>
//! po-cli admin demote <uid>
//! ```
//!
//! Configuration is read from the same environment variables as the
//! storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use prime_optic_core::UserRole;

mod commands;

#[derive(Parser)]
#[command(name = "po-cli")]
#[command(author, version, about = "Prime Optic CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Create products from a YAML or JSON file
    Seed {
        /// Path to a list of products
        file: String,

        /// Validate the file without writing anything
        #[arg(long)]
        dry_run: bool,
    },
    /// Manage user roles
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Give a user the admin role
    Promote {
        /// Firebase user id
        uid: String,
    },
    /// Return an admin to the user role
    Demote {
        /// Firebase user id
        uid: String,
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
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { file, dry_run } => commands::seed::products(&file, dry_run).await?,
        Commands::Admin { action } => match action {
            AdminAction::Promote { uid } => commands::admin::set_role(&uid, UserRole::Admin).await?,
            AdminAction::Demote { uid } => commands::admin::set_role(&uid, UserRole::User).await?,
        },
    }
    Ok(())
}
