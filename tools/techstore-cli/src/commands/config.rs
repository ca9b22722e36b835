//! Configuration management commands.

use std::collections::HashSet;
use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Get { key } => get_config(&key, ctx).await,
        ConfigCommand::Init { force } => init_config(force, ctx).await,
        ConfigCommand::Validate => validate_config(ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output
        .kv("data_dir", &ctx.data_dir().display().to_string());
    ctx.output.kv("cart_key", &ctx.config.store.cart_key);

    ctx.output.info("");
    ctx.output.info("[monitor]");
    ctx.output.kv("api_base", &ctx.config.monitor.api_base);
    ctx.output.kv("bridge_base", &ctx.config.monitor.bridge_base);
    ctx.output.kv(
        "status_interval_secs",
        &ctx.config.monitor.status_interval_secs.to_string(),
    );
    ctx.output.kv(
        "qr_interval_secs",
        &ctx.config.monitor.qr_interval_secs.to_string(),
    );
    ctx.output
        .kv("timeout_secs", &ctx.config.monitor.timeout_secs.to_string());

    ctx.output.info("");
    ctx.output.info("[log]");
    ctx.output.kv("level", &ctx.config.get_value("log.level")?);
    ctx.output.kv("format", &ctx.config.get_value("log.format")?);

    if !ctx.config.catalog.is_empty() {
        ctx.output.info("");
        ctx.output
            .info(&format!("Catalog: {} product(s)", ctx.config.catalog.len()));
        for product in &ctx.config.catalog {
            ctx.output
                .list_item(&format!("{} {}", product.id, product.name));
        }
    }

    Ok(())
}

async fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = ctx.config.get_value(key)?;

    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

async fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("techstore.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;

    ctx.output
        .success(&format!("Created: {}", config_path.display()));

    Ok(())
}

async fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let (errors, warnings) = check_config(&ctx.config);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}

/// Return (errors, warnings) for a configuration.
fn check_config(config: &CliConfig) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.store.cart_key.trim().is_empty() {
        errors.push("store.cart_key must not be empty".to_string());
    }

    for (name, base) in [
        ("monitor.api_base", &config.monitor.api_base),
        ("monitor.bridge_base", &config.monitor.bridge_base),
    ] {
        if !base.starts_with("http://") && !base.starts_with("https://") {
            errors.push(format!("{} must be an http(s) URL", name));
        }
    }

    if config.monitor.status_interval_secs == 0 || config.monitor.qr_interval_secs == 0 {
        warnings.push("poll intervals of 0 are raised to 1 second".to_string());
    }

    let mut seen = HashSet::new();
    for (i, product) in config.catalog.iter().enumerate() {
        if !seen.insert(product.id) {
            errors.push(format!("catalog[{}]: duplicate id {}", i, product.id));
        }
        if product.price < 0 {
            errors.push(format!("catalog[{}]: price must not be negative", i));
        }
        if product.name.trim().is_empty() {
            warnings.push(format!("catalog[{}]: empty name", i));
        }
    }

    (errors, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use techstore_cart::Product;

    #[test]
    fn test_default_config_is_valid() {
        let config: CliConfig = toml::from_str(&generate_default_config()).unwrap();
        let (errors, warnings) = check_config(&config);
        assert!(errors.is_empty(), "{:?}", errors);
        assert!(warnings.is_empty(), "{:?}", warnings);
    }

    #[test]
    fn test_catalog_problems_reported() {
        let mut config = CliConfig::default();
        config.catalog = vec![
            Product::new(1, "Laptop", 9000),
            Product::new(1, "Laptop again", 9000),
            Product::new(2, "", -5),
        ];
        config.monitor.api_base = "localhost:5000".to_string();

        let (errors, warnings) = check_config(&config);
        assert_eq!(errors.len(), 3);
        assert_eq!(warnings, vec!["catalog[2]: empty name"]);
    }
}
