//! CLI administration tool for linkcut.
//!
//! Provides commands for registering API keys, toggling link status, and
//! checking the database without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a new API key for an owner
//! cargo run --bin admin -- key create --owner alice@example.com
//!
//! # List an owner's keys
//! cargo run --bin admin -- key list alice@example.com
//!
//! # Revoke a key
//! cargo run --bin admin -- key revoke <raw-key>
//!
//! # Deactivate / reactivate a link (out-of-band status change)
//! cargo run --bin admin -- link deactivate abc123
//! cargo run --bin admin -- link activate abc123
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `KEY_SIGNING_SECRET` (required for key commands): HMAC secret, must
//!   match the server's

use linkcut::application::services::AuthService;
use linkcut::domain::entities::LinkStatus;
use linkcut::domain::repositories::{KeyRepository, LinkRepository};
use linkcut::infrastructure::persistence::{PgKeyRepository, PgLinkRepository};

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input};
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linkcut.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage API keys
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Change link status
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// API key subcommands.
#[derive(Subcommand)]
enum KeyAction {
    /// Register a new API key for an owner
    Create {
        /// Owner identity the key resolves to (e.g. an account email)
        #[arg(short, long)]
        owner: Option<String>,

        /// Human-readable label (e.g. "Production", "CI")
        #[arg(short, long, default_value = "default")]
        label: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List an owner's keys
    List {
        /// Owner identity to list keys for
        owner: String,
    },

    /// Revoke a key by its raw value
    Revoke {
        /// The raw API key to revoke
        key: String,
    },
}

/// Link status subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Reactivate a link
    Activate {
        /// Short code of the link
        code: String,
    },

    /// Deactivate a link (redirects return 403 until reactivated)
    Deactivate {
        /// Short code of the link
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Key { action } => handle_key_action(action, &pool).await?,
        Commands::Link { action } => handle_link_action(action, &pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn auth_service(pool: &PgPool) -> Result<AuthService> {
    let secret = std::env::var("KEY_SIGNING_SECRET").context("KEY_SIGNING_SECRET must be set")?;
    let repo = Arc::new(PgKeyRepository::new(Arc::new(pool.clone())));
    Ok(AuthService::new(repo, secret))
}

/// Dispatches key management commands.
async fn handle_key_action(action: KeyAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgKeyRepository::new(Arc::new(pool.clone())));
    let auth = auth_service(pool)?;

    match action {
        KeyAction::Create { owner, label, yes } => {
            create_key(repo, &auth, owner, label, yes).await?;
        }
        KeyAction::List { owner } => {
            list_keys(repo, &owner).await?;
        }
        KeyAction::Revoke { key } => {
            revoke_key(repo, &auth, &key).await?;
        }
    }

    Ok(())
}

/// Registers a new API key with interactive prompts.
///
/// Only the HMAC of the key is stored; the raw value is displayed once and
/// cannot be retrieved later.
async fn create_key(
    repo: Arc<PgKeyRepository>,
    auth: &AuthService,
    owner: Option<String>,
    label: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "Create API key".bright_blue().bold());
    println!();

    let owner = match owner {
        Some(o) => o,
        None => Input::new().with_prompt("Owner identity").interact_text()?,
    };

    let key_value = generate_key();

    println!("{}", "Key details:".bright_white().bold());
    println!("  Owner: {}", owner.cyan());
    println!("  Label: {}", label.cyan());
    println!("  Key:   {}", key_value.bright_yellow().bold());
    println!();
    println!(
        "{}",
        "IMPORTANT: Save this key now! You won't be able to see it again."
            .red()
            .bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Register this key?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    let key_hash = auth.hash_credential(&key_value);

    repo.register(&key_hash, &owner, &label)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to register key: {}", e))?;

    println!("{}", "Key registered!".green().bold());
    println!();
    println!("{}", "Use it in requests:".bright_white());
    println!(
        "  curl -H \"x-api-key: {}\" -d '{{\"long_url\": \"https://example.com\"}}' http://localhost:3000/urls",
        key_value.bright_yellow()
    );
    println!();

    Ok(())
}

/// Lists an owner's keys with status indicators.
async fn list_keys(repo: Arc<PgKeyRepository>, owner: &str) -> Result<()> {
    println!("{}", "API keys".bright_blue().bold());
    println!();

    let keys = repo
        .list_by_owner(owner)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list keys: {}", e))?;

    if keys.is_empty() {
        println!("{}", "  No keys found".yellow());
        return Ok(());
    }

    println!(
        "  {:<18} {:<16} {:<10}",
        "Hash".bright_white().bold(),
        "Label".bright_white().bold(),
        "Status".bright_white().bold()
    );
    println!("  {}", "-".repeat(48).bright_black());

    for key in &keys {
        let status = if key.revoked {
            "REVOKED".red()
        } else {
            "ACTIVE".green()
        };

        println!(
            "  {:<18} {:<16} {}",
            format!("{}…", &key.key_hash[..16]).bright_black(),
            key.label.cyan(),
            status
        );
    }

    Ok(())
}

/// Revokes a key by its raw value.
async fn revoke_key(repo: Arc<PgKeyRepository>, auth: &AuthService, key: &str) -> Result<()> {
    let key_hash = auth.hash_credential(key);

    if repo
        .revoke(&key_hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to revoke key: {}", e))?
    {
        println!("{}", "Key revoked".green().bold());
    } else {
        println!("{}", "No active key matches that value".yellow());
    }

    Ok(())
}

/// Dispatches link status commands.
async fn handle_link_action(action: LinkAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool.clone())));

    let (code, status) = match action {
        LinkAction::Activate { code } => (code, LinkStatus::Active),
        LinkAction::Deactivate { code } => (code, LinkStatus::Inactive),
    };

    if repo
        .set_status(&code, status)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to update link: {}", e))?
    {
        println!(
            "{} {} is now {}",
            "Link".green().bold(),
            code.cyan(),
            status.as_str().bright_yellow()
        );
    } else {
        println!("{} {}", "No link found with code".red(), code.cyan());
    }

    Ok(())
}

/// Dispatches database commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            sqlx::query("SELECT 1")
                .execute(pool)
                .await
                .context("Database check failed")?;
            println!("{}", "Database connection OK".green().bold());
        }
    }

    Ok(())
}

/// Generates a high-entropy raw API key (36 random bytes, URL-safe base64).
fn generate_key() -> String {
    let mut buffer = [0u8; 36];
    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");
    URL_SAFE_NO_PAD.encode(buffer)
}
