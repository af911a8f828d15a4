//! Bazaar CLI - Command line front end for the storefront actions.
//!
//! Commands:
//! - `bazaar catalog` - Browse and seed the catalog
//! - `bazaar order` - Place an order from a JSON file
//! - `bazaar newsletter` - Subscribe or unsubscribe an email
//! - `bazaar contact` - Send a contact message
//! - `bazaar admin` - Log in and manage orders and messages
//! - `bazaar config` - Show or create the settings file

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{AdminArgs, CatalogArgs, ConfigArgs, ContactArgs, NewsletterArgs, OrderArgs};

/// Bazaar CLI - Run storefront actions against the configured store
#[derive(Parser)]
#[command(name = "bazaar")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and seed the catalog
    Catalog(CatalogArgs),

    /// Place orders
    Order(OrderArgs),

    /// Manage newsletter subscriptions
    Newsletter(NewsletterArgs),

    /// Send a contact message
    Contact(ContactArgs),

    /// Admin session, orders, messages and dashboard
    Admin(AdminArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output)?;

    let result = match cli.command {
        Commands::Catalog(args) => commands::catalog::run(args, &ctx).await,
        Commands::Order(args) => commands::order::run(args, &ctx).await,
        Commands::Newsletter(args) => commands::newsletter::run(args, &ctx).await,
        Commands::Contact(args) => commands::contact::run(args, &ctx).await,
        Commands::Admin(args) => commands::admin::run(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
