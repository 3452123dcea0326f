//! Shopfront CLI - Drive the storefront backend from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # List products (retries transient failures)
//! shopfront products list --limit 10 --offset 0
//!
//! # Scroll through three pages of ten
//! shopfront products page --limit 10 --pages 3
//!
//! # Read and update a product concurrently
//! shopfront products read-update p1 --title "new title"
//!
//! # Log in and show the profile
//! SHOPFRONT_PASSWORD=... shopfront auth login -e user@example.com
//!
//! # Fill a cart and watch the running total
//! shopfront cart add p1 p2 p1
//! ```
//!
//! # Environment Variables
//!
//! - `SHOPFRONT_API_URL` - Backend base URL (required)
//! - `SHOPFRONT_PASSWORD` - Password for `auth login` / `users create` when `--password` is omitted
//! - `SHOPFRONT_LOG_JSON` - Emit JSON logs when set to `1` or `true`
//! - `RUST_LOG` - Log filter (default: `shopfront=info`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use shopfront_core::Price;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "shopfront")]
#[command(author, version, about = "Shopfront storefront client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and manage catalog products
    Products {
        #[command(subcommand)]
        action: ProductAction,
    },
    /// Register and list users
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Log in and fetch the profile
    Auth {
        #[command(subcommand)]
        action: AuthAction,
    },
    /// Upload and download files
    Files {
        #[command(subcommand)]
        action: FileAction,
    },
    /// Build a shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
}

#[derive(Subcommand)]
enum ProductAction {
    /// List products, retrying transient failures
    List {
        #[arg(short, long)]
        limit: Option<std::num::NonZeroU32>,
        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// Fetch consecutive pages the way infinite scroll does
    Page {
        #[arg(short, long, default_value = "10")]
        limit: std::num::NonZeroU32,
        #[arg(short, long, default_value_t = 0)]
        offset: u32,
        /// Number of pages to fetch
        #[arg(short, long, default_value_t = 1)]
        pages: u32,
    },
    /// Show one product
    Get { id: String },
    /// Create a product
    Create {
        #[arg(short, long)]
        title: String,
        #[arg(short, long, value_parser = parse_price)]
        price: Price,
        #[arg(short, long, default_value = "")]
        description: String,
        #[arg(short, long)]
        category_id: i32,
        /// Image URL (repeatable)
        #[arg(short, long = "image")]
        images: Vec<String>,
    },
    /// Update selected fields of a product
    Update {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, value_parser = parse_price)]
        price: Option<Price>,
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a product
    Delete { id: String },
    /// Read a product and change its title
    ReadUpdate {
        id: String,
        #[arg(short, long)]
        title: String,
        /// Read first, then update, instead of running both at once
        #[arg(long)]
        sequential: bool,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Register a user
    Create {
        #[arg(short, long)]
        name: String,
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },
    /// List users
    List,
}

#[derive(Subcommand)]
enum AuthAction {
    /// Log in and print the profile
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[derive(Subcommand)]
enum FileAction {
    /// Upload a local file
    Upload {
        path: PathBuf,
        /// Media type, e.g. `image/png`
        #[arg(short, long)]
        mime: Option<String>,
    },
    /// Download a URL to a local file
    Download { url: String, destination: PathBuf },
}

#[derive(Subcommand)]
enum CartAction {
    /// Fetch products by id and add them to a cart
    Add {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

fn parse_price(s: &str) -> Result<Price, String> {
    let amount: Decimal = s.trim().parse().map_err(|e| format!("invalid price: {e}"))?;
    Price::new(amount).map_err(|e| e.to_string())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopfront=info".into());

    let json = std::env::var("SHOPFRONT_LOG_JSON")
        .is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    let api = commands::connect()?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductAction::List { limit, offset } => {
                commands::products::list(&api, limit, offset).await?;
            }
            ProductAction::Page {
                limit,
                offset,
                pages,
            } => commands::products::pages(&api, limit, offset, pages).await?,
            ProductAction::Get { id } => commands::products::get(&api, &id).await?,
            ProductAction::Create {
                title,
                price,
                description,
                category_id,
                images,
            } => {
                commands::products::create(&api, title, price, description, category_id, images)
                    .await?;
            }
            ProductAction::Update {
                id,
                title,
                price,
                description,
            } => commands::products::update(&api, &id, title, price, description).await?,
            ProductAction::Delete { id } => commands::products::delete(&api, &id).await?,
            ProductAction::ReadUpdate {
                id,
                title,
                sequential,
            } => commands::products::read_update(&api, &id, title, sequential).await?,
        },
        Commands::Users { action } => match action {
            UserAction::Create {
                name,
                email,
                password,
            } => commands::users::create(&api, name, &email, password).await?,
            UserAction::List => commands::users::list(&api).await?,
        },
        Commands::Auth { action } => match action {
            AuthAction::Login { email, password } => {
                commands::auth::login(&api, &email, password).await?;
            }
        },
        Commands::Files { action } => match action {
            FileAction::Upload { path, mime } => {
                commands::files::upload(&api, &path, mime.as_deref()).await?;
            }
            FileAction::Download { url, destination } => {
                commands::files::download(&api, &url, &destination).await?;
            }
        },
        Commands::Cart { action } => match action {
            CartAction::Add { ids } => commands::cart::add(&api, &ids).await?,
        },
    }
    Ok(())
}
