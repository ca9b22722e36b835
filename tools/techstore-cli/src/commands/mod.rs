//! CLI command implementations.

pub mod admin;
pub mod bridge;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod status;

use clap::{Args, Subcommand};

/// Arguments for the add command.
#[derive(Args)]
pub struct AddArgs {
    /// Product id.
    #[arg(value_parser = clap::value_parser!(i64).range(0..))]
    pub id: i64,

    /// Product name (looked up in the catalog when omitted).
    #[arg(short, long)]
    pub name: Option<String>,

    /// Unit price (looked up in the catalog when omitted).
    #[arg(short, long, value_parser = clap::value_parser!(i64).range(0..))]
    pub price: Option<i64>,
}

/// Arguments for the remove command.
#[derive(Args)]
pub struct RemoveArgs {
    /// Product id.
    #[arg(value_parser = clap::value_parser!(i64).range(0..))]
    pub id: i64,
}

/// Arguments for the qty command.
#[derive(Args)]
pub struct QtyArgs {
    /// Product id.
    #[arg(value_parser = clap::value_parser!(i64).range(0..))]
    pub id: i64,

    /// Amount to add to the quantity, e.g. 1 or -1.
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the status command.
#[derive(Args)]
pub struct StatusArgs {
    /// Keep refreshing at the configured status interval.
    #[arg(short, long)]
    pub watch: bool,

    /// Stop after this many refreshes (with --watch).
    #[arg(long)]
    pub count: Option<usize>,
}

/// Arguments for the qr command.
#[derive(Args)]
pub struct QrArgs {
    /// Keep polling at the configured QR interval until connected.
    #[arg(short, long)]
    pub watch: bool,

    /// Stop after this many polls (with --watch).
    #[arg(long)]
    pub count: Option<usize>,
}

/// Arguments for the send command.
#[derive(Args)]
pub struct SendArgs {
    /// Recipient phone number.
    pub phone: String,

    /// Message text.
    pub message: String,
}

/// Arguments for the send-image command.
#[derive(Args)]
pub struct SendImageArgs {
    /// Recipient phone number.
    pub phone: String,

    /// Public URL of the image.
    pub image_url: String,

    /// Caption shown under the image.
    #[arg(long)]
    pub caption: Option<String>,
}

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Only list this category.
    #[arg(long)]
    pub category: Option<String>,
}

/// Arguments for the test-ai command.
#[derive(Args)]
pub struct TestAiArgs {
    /// Customer message to answer.
    pub message: String,

    /// Phone number the conversation is attributed to.
    #[arg(long, default_value = techstore_monitor::TEST_PHONE)]
    pub phone: String,
}

/// Arguments for the admin-config command.
#[derive(Args)]
pub struct AdminConfigArgs {
    #[command(subcommand)]
    pub command: AdminConfigCommand,
}

#[derive(Subcommand)]
pub enum AdminConfigCommand {
    /// Show the backend's store settings.
    Show,
    /// Change backend store settings. The backend needs a restart afterwards.
    Set(AdminConfigSetArgs),
}

/// Settings accepted by `admin-config set`. At least one is required.
#[derive(Args)]
pub struct AdminConfigSetArgs {
    /// Gemini API key.
    #[arg(long)]
    pub gemini_api_key: Option<String>,

    /// Gemini model name.
    #[arg(long)]
    pub gemini_model: Option<String>,

    /// Store name shown to customers.
    #[arg(long)]
    pub store_name: Option<String>,

    /// Currency label.
    #[arg(long)]
    pub currency: Option<String>,

    /// Delivery fee.
    #[arg(long)]
    pub delivery_fee: Option<f64>,

    /// Order total above which delivery is free.
    #[arg(long)]
    pub free_threshold: Option<f64>,
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
    /// Get a configuration value.
    Get {
        /// Config key (e.g., "monitor.api_base").
        key: String,
    },
    /// Write a default techstore.toml.
    Init {
        /// Overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate configuration.
    Validate,
}
