//! Premium Cart CLI - The cart drawer in a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Add, adjust and remove items
//! cart-cli add --id w1 --name Watch --price 120 --image w1.png
//! cart-cli inc w1
//! cart-cli dec w1
//! cart-cli remove w1
//!
//! # Show the cart, or keep it on screen while other processes edit it
//! cart-cli show
//! cart-cli watch
//!
//! # Browse a catalog file
//! cart-cli catalog products.json --category watches
//! ```
//!
//! # Commands
//!
//! - `add`, `inc`, `dec`, `remove`, `clear`, `checkout` - Cart gestures
//! - `show` - Render the cart once
//! - `watch` - Re-render on changes from other processes
//! - `catalog` - List products from a catalog file
//!
//! Configuration comes from the environment; see `premium_cart::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use premium_cart::{CartCommand, CartConfig, CartManager, FileStore, LogFormat};
use rust_decimal::Decimal;
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod surface;

use surface::TerminalSurface;

#[derive(Parser)]
#[command(name = "cart-cli")]
#[command(author, version, about = "Premium Cart terminal tools")]
struct Cli {
    /// Store directory (overrides `CART_STORE_DIR`)
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    /// Storage key (overrides `CART_STORAGE_KEY`)
    #[arg(long, global = true)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(short, long)]
        id: String,

        /// Catalog file to take the product from
        #[arg(short, long, conflicts_with_all = ["name", "price", "image"])]
        catalog: Option<PathBuf>,

        /// Display name (defaults to the id)
        #[arg(short, long)]
        name: Option<String>,

        /// Unit price
        #[arg(short, long, required_unless_present = "catalog")]
        price: Option<Decimal>,

        /// Image reference
        #[arg(long)]
        image: Option<String>,
    },
    /// Increase the quantity of an item
    Inc { id: String },
    /// Decrease the quantity of an item, removing it at zero
    Dec { id: String },
    /// Remove an item
    Remove { id: String },
    /// Empty the cart
    Clear,
    /// Demo checkout (clears the cart)
    Checkout,
    /// Show the cart
    Show,
    /// Show the cart and refresh it when other processes change it
    Watch,
    /// List products in a catalog file
    Catalog {
        /// Catalog file (JSON array of products)
        path: PathBuf,

        /// Only show this category
        #[arg(long)]
        category: Option<String>,
    },
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &CartConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

/// Initialize tracing to stderr, keeping stdout for the cart itself.
fn init_tracing(config: &CartConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "premium_cart=info,premium_cart_cli=info".into());

    let (pretty, json) = match config.log_format {
        LogFormat::Pretty => (
            Some(tracing_subscriber::fmt::layer().with_writer(std::io::stderr)),
            None,
        ),
        LogFormat::Json => (
            None,
            Some(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            ),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(pretty)
        .with(json)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut config = CartConfig::from_env().expect("Failed to load configuration");
    if let Some(dir) = cli.store_dir.clone() {
        config.store_dir = dir;
    }
    if let Some(key) = cli.key.clone() {
        config.storage_key = key;
    }

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = init_sentry(&config);
    init_tracing(&config);

    if let Err(e) = run(cli.command, &config).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(command: Commands, config: &CartConfig) -> Result<(), commands::CommandError> {
    if let Commands::Catalog { path, category } = &command {
        let mut out = std::io::stdout().lock();
        return commands::catalog::list(path, category.as_deref(), config.currency, &mut out);
    }

    let store = FileStore::new(&config.store_dir);
    let mut manager = CartManager::from_config(store, config);
    manager.attach(Box::new(TerminalSurface::stdout()));

    let gesture = match command {
        Commands::Add {
            id,
            catalog,
            name,
            price,
            image,
        } => CartCommand::Add(commands::cart::candidate(
            &id,
            catalog.as_deref(),
            name,
            price,
            image,
        )?),
        Commands::Inc { id } => CartCommand::Increment(id),
        Commands::Dec { id } => CartCommand::Decrement(id),
        Commands::Remove { id } => CartCommand::Remove(id),
        Commands::Clear => CartCommand::Clear,
        Commands::Checkout => CartCommand::Checkout,
        Commands::Show => {
            commands::cart::show(&mut manager);
            return Ok(());
        }
        Commands::Watch => {
            commands::watch::run(&mut manager, config.watch_interval).await;
            return Ok(());
        }
        Commands::Catalog { .. } => return Ok(()),
    };

    commands::cart::apply(&mut manager, gesture)
}
