//! CLI command implementations.

pub mod admin;
pub mod catalog;
pub mod config;
pub mod contact;
pub mod newsletter;
pub mod order;

use clap::{Args, Subcommand};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    #[command(subcommand)]
    pub command: CatalogCommand,
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List products.
    Products {
        /// Only products in this category.
        #[arg(short, long)]
        category: Option<String>,
    },
    /// Show one product.
    Product {
        /// Product slug.
        slug: String,

        /// Look the slug up among sale products.
        #[arg(long)]
        sale: bool,
    },
    /// List products currently on sale.
    Sale,
    /// Load products from a JSON or TOML file.
    Seed {
        /// Seed file path.
        file: String,
    },
}

/// Arguments for the order command.
#[derive(Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Subcommand)]
pub enum OrderCommand {
    /// Place an order described in a JSON file.
    Place {
        /// Order file path.
        #[arg(short, long)]
        file: String,
    },
}

/// Arguments for the newsletter command.
#[derive(Args)]
pub struct NewsletterArgs {
    #[command(subcommand)]
    pub command: NewsletterCommand,
}

#[derive(Subcommand)]
pub enum NewsletterCommand {
    /// Subscribe an email address.
    Subscribe {
        /// Email address.
        email: String,
    },
    /// Unsubscribe an email address.
    Unsubscribe {
        /// Email address.
        email: String,
    },
}

/// Arguments for the contact command.
#[derive(Args)]
pub struct ContactArgs {
    #[command(subcommand)]
    pub command: ContactCommand,
}

#[derive(Subcommand)]
pub enum ContactCommand {
    /// Send a message to the shop.
    Send {
        /// Sender name.
        #[arg(short, long)]
        name: String,

        /// Sender email.
        #[arg(short, long)]
        email: String,

        /// Subject line.
        #[arg(short, long, default_value = "")]
        subject: String,

        /// Message body.
        #[arg(short, long)]
        message: String,
    },
}

/// Arguments for the admin command.
#[derive(Args)]
pub struct AdminArgs {
    #[command(subcommand)]
    pub command: AdminCommand,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Start an admin session.
    Login {
        /// Password (prompted for when omitted).
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current admin session.
    Logout,
    /// List orders, newest first.
    Orders {
        /// Show only the last N orders.
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Change an order's status.
    Status {
        /// Order document id.
        order_id: String,

        /// New status (pending, processing, shipped, delivered, cancelled).
        status: String,
    },
    /// List contact messages, or mark one.
    Messages {
        /// Message id to mark.
        #[arg(long, requires = "status")]
        mark: Option<String>,

        /// New message status (new, read, replied).
        #[arg(long)]
        status: Option<String>,
    },
    /// Show the dashboard figures.
    Dashboard,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}
