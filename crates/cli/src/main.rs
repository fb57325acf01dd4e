//! Threadline CLI - storefront and brand portal from the terminal.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog in Spanish
//! THREADLINE_LOCALE=es tl catalog list --tag bestseller
//!
//! # Fill the cart and check out as the demo customer
//! tl cart add 3 --size M --color navy
//! tl --as customer orders checkout
//!
//! # Submit a quote request with a verified login
//! THREADLINE_PASSWORD=... tl --email brand@atelier.com inquiry submit \
//!     -d "200 embroidered hoodies" -q 200 --deadline 2026-12-01
//!
//! # Review inquiries on the brand dashboard
//! tl --as brand inquiry list --all --group pending --page 2
//! ```
//!
//! # Commands
//!
//! - `catalog` - List, show and (brand) patch products
//! - `cart` - Add, update, remove and show cart lines
//! - `orders` - Checkout and order history
//! - `inquiry` - Submit, list, filter, count and move quote inquiries
//! - `account` - Profile and notification preferences
//! - `token` - Store or forget the API bearer token
//!
//! The cart and the bearer token persist in `THREADLINE_STATE_DIR` between
//! runs. The session does not: pass `--as` or `--email` on every command that
//! needs one.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use threadline_core::{Email, Role};
use threadline_portal::Portal;
use threadline_portal::config::PortalConfig;

mod commands;

use commands::{
    AccountAction, CartAction, CatalogAction, CliError, InquiryAction, OrdersAction, TokenAction,
};

#[derive(Parser)]
#[command(name = "tl")]
#[command(author, version, about = "Threadline storefront and brand portal")]
struct Cli {
    /// Act as the demo user for a role, without credentials
    #[arg(long = "as", global = true, value_name = "ROLE", conflicts_with = "email")]
    role: Option<Role>,

    /// Log in with this email; the password is read from `THREADLINE_PASSWORD`
    #[arg(long, global = true)]
    email: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and edit the catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Checkout and order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Quote inquiries
    Inquiry {
        #[command(subcommand)]
        action: InquiryAction,
    },
    /// Profile and notification preferences
    Account {
        #[command(subcommand)]
        action: AccountAction,
    },
    /// Manage the API bearer token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },
    /// Verify credentials and print the resulting identity
    Whoami,
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &PortalConfig) -> Option<sentry::ClientInitGuard> {
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

/// Send warnings and errors to Sentry as events; keep info/debug as breadcrumbs.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match PortalConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    let _sentry_guard = init_sentry(&config);

    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "threadline_portal=info,threadline_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    if let Err(e) = run(cli, config).await {
        tracing::debug!(error = %e, "Command failed");
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: PortalConfig) -> Result<(), CliError> {
    let portal = Portal::new(config)?;
    let login = commands::Login {
        role: cli.role,
        email: cli.email,
    };

    match cli.command {
        Commands::Catalog { action } => commands::catalog::run(&portal, &login, action).await,
        Commands::Cart { action } => commands::cart::run(&portal, action).await,
        Commands::Orders { action } => commands::orders::run(&portal, &login, action).await,
        Commands::Inquiry { action } => commands::inquiry::run(&portal, &login, action).await,
        Commands::Account { action } => commands::account::run(&portal, &login, action).await,
        Commands::Token { action } => commands::token::run(&portal, action),
        Commands::Whoami => {
            let identity = login.establish(&portal).await?;
            println!(
                "{} <{}> user #{} ({})",
                identity.name,
                identity
                    .email
                    .as_ref()
                    .map_or("no email", Email::as_str),
                identity.user_id,
                identity.role
            );
            Ok(())
        }
    }
}
