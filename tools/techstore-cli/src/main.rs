//! TechStore CLI - storefront cart and admin dashboard from the terminal.
//!
//! Commands:
//! - `techstore catalog` - List configured products
//! - `techstore add` / `remove` / `qty` / `show` - Manage the cart
//! - `techstore checkout` - Place the order
//! - `techstore status` / `qr` - Backend and bridge status
//! - `techstore send` / `send-image` / `restart-bridge` - Bridge commands
//! - `techstore products` / `orders` / `sessions` - Dashboard data from the backend
//! - `techstore test-ai` / `admin-config` - AI agent test and backend store settings
//! - `techstore config` - Manage configuration

mod commands;
mod config;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    AddArgs, AdminConfigArgs, CheckoutArgs, ConfigArgs, ProductsArgs, QrArgs, QtyArgs,
    RemoveArgs, SendArgs, SendImageArgs, StatusArgs, TestAiArgs,
};
use techstore_observability::LogFormat;

/// TechStore CLI - Shop the catalog and watch the store's services
#[derive(Parser)]
#[command(name = "techstore")]
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

    /// Log line format (json or human)
    #[arg(long, global = true)]
    log_format: Option<LogFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products available to add
    Catalog,

    /// Add one unit of a product to the cart
    Add(AddArgs),

    /// Remove a product from the cart
    Remove(RemoveArgs),

    /// Change a product's quantity by a delta
    Qty(QtyArgs),

    /// Show the cart
    Show,

    /// Place the order and empty the cart
    Checkout(CheckoutArgs),

    /// Show backend and bridge status
    Status(StatusArgs),

    /// Show the bridge pairing QR code
    Qr(QrArgs),

    /// Send a text message through the bridge
    Send(SendArgs),

    /// Send an image through the bridge
    SendImage(SendImageArgs),

    /// Restart the bridge's messaging client
    RestartBridge,

    /// List products from the backend
    Products(ProductsArgs),

    /// List recent orders
    Orders,

    /// List active chat sessions
    Sessions,

    /// Ask the AI agent to answer a message
    TestAi(TestAiArgs),

    /// Show or change the backend's store settings
    AdminConfig(AdminConfigArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    // Load config
    let config_path = cli.config.as_deref();
    let ctx = context::Context::load(config_path, output, cli.log_format)?;

    // Execute command
    let result = match cli.command {
        Commands::Catalog => commands::cart::catalog(&ctx).await,
        Commands::Add(args) => commands::cart::add(args, &ctx).await,
        Commands::Remove(args) => commands::cart::remove(args, &ctx).await,
        Commands::Qty(args) => commands::cart::qty(args, &ctx).await,
        Commands::Show => commands::cart::show(&ctx).await,
        Commands::Checkout(args) => commands::checkout::run(args, &ctx).await,
        Commands::Status(args) => commands::status::run(args, &ctx).await,
        Commands::Qr(args) => commands::status::qr(args, &ctx).await,
        Commands::Send(args) => commands::bridge::send(args, &ctx).await,
        Commands::SendImage(args) => commands::bridge::send_image(args, &ctx).await,
        Commands::RestartBridge => commands::bridge::restart(&ctx).await,
        Commands::Products(args) => commands::admin::products(args, &ctx).await,
        Commands::Orders => commands::admin::orders(&ctx).await,
        Commands::Sessions => commands::admin::sessions(&ctx).await,
        Commands::TestAi(args) => commands::admin::test_ai(args, &ctx).await,
        Commands::AdminConfig(args) => commands::admin::config(args, &ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
