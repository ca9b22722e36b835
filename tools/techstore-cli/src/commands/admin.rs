//! Admin dashboard views: products, orders, sessions, AI test, store settings.
//!
//! Listing failures degrade to a warning and an empty view rather than an
//! error exit, the same way the status dashboard treats an offline backend.

use anyhow::{bail, Context as _, Result};

use techstore_cart::CURRENCY_LABEL;
use techstore_monitor::{
    AdminClient, ConfigUpdate, MonitorError, OrderRow, ProductRow, RemoteConfig, Scalar,
    SessionRow,
};

use super::{AdminConfigArgs, AdminConfigCommand, AdminConfigSetArgs, ProductsArgs, TestAiArgs};
use crate::context::Context;

fn client(ctx: &Context) -> Result<AdminClient> {
    AdminClient::new(ctx.config.endpoints()).context("Failed to create HTTP client")
}

fn amount(value: &Scalar) -> String {
    format!("{} {}", value, CURRENCY_LABEL)
}

/// Report a failed listing and carry on with nothing to show.
fn degraded(ctx: &Context, what: &str, err: &MonitorError) {
    ctx.logger
        .warn("admin view unavailable")
        .field("view", what)
        .display("error", err)
        .emit();
    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "error": format!("Failed to load {}", what) }));
    } else {
        ctx.output.warn(&format!("Failed to load {}", what));
        ctx.output.debug(&err.to_string());
    }
}

fn product_rows(products: &[ProductRow]) -> Vec<Vec<String>> {
    products
        .iter()
        .map(|p| {
            vec![
                p.name.clone(),
                p.category_label().to_string(),
                amount(&p.price),
                p.stock.map_or_else(|| "-".to_string(), |s| s.to_string()),
            ]
        })
        .collect()
}

fn order_rows(orders: &[OrderRow]) -> Vec<Vec<String>> {
    orders
        .iter()
        .map(|o| {
            vec![
                o.short_id(),
                o.customer_name.clone().unwrap_or_else(|| "-".to_string()),
                o.customer_phone.clone().unwrap_or_else(|| "-".to_string()),
                o.total_price.as_ref().map_or_else(|| "-".to_string(), amount),
                o.status_label().to_string(),
                o.created_date()
                    .map_or_else(|| "-".to_string(), |d| d.format("%Y-%m-%d").to_string()),
            ]
        })
        .collect()
}

fn session_rows(sessions: &[SessionRow]) -> Vec<Vec<String>> {
    sessions
        .iter()
        .map(|s| {
            vec![
                s.phone.clone(),
                s.state.clone(),
                s.cart_items.to_string(),
                s.customer_name.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect()
}

/// List products from the backend.
pub async fn products(args: ProductsArgs, ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    let spinner = ctx.output.spinner("Loading products...");
    let result = client.products(args.category.as_deref()).await;
    spinner.finish_and_clear();

    let products = match result {
        Ok(products) => products,
        Err(e) => {
            degraded(ctx, "products", &e);
            return Ok(());
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&products);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", products.len()));
    if products.is_empty() {
        ctx.output.info("No products found.");
        return Ok(());
    }
    ctx.output
        .table(&["NAME", "CATEGORY", "PRICE", "STOCK"], &product_rows(&products));
    Ok(())
}

/// List the latest orders.
pub async fn orders(ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    let spinner = ctx.output.spinner("Loading orders...");
    let result = client.orders().await;
    spinner.finish_and_clear();

    let orders = match result {
        Ok(orders) => orders,
        Err(e) => {
            degraded(ctx, "orders", &e);
            return Ok(());
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&orders);
        return Ok(());
    }

    ctx.output.header("Recent Orders");
    if orders.is_empty() {
        ctx.output.info("No orders yet.");
        return Ok(());
    }
    ctx.output.table(
        &["ID", "CUSTOMER", "PHONE", "TOTAL", "STATUS", "DATE"],
        &order_rows(&orders),
    );
    Ok(())
}

/// List active chat sessions.
pub async fn sessions(ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    let result = client.sessions().await;

    let sessions = match result {
        Ok(sessions) => sessions,
        Err(e) => {
            degraded(ctx, "sessions", &e);
            return Ok(());
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&sessions);
        return Ok(());
    }

    ctx.output.header(&format!("Active Sessions ({})", sessions.len()));
    if sessions.is_empty() {
        ctx.output.info("No active sessions.");
        return Ok(());
    }
    ctx.output
        .table(&["PHONE", "STATE", "CART", "CUSTOMER"], &session_rows(&sessions));
    Ok(())
}

/// Send one message to the AI agent and print its reply.
pub async fn test_ai(args: TestAiArgs, ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    let spinner = ctx.output.spinner("Waiting for the agent...");
    let result = client.test_ai(&args.phone, &args.message).await;
    spinner.finish_and_clear();
    let reply = result.context("AI test failed")?;

    if ctx.output.is_json() {
        ctx.output.json(&reply);
    } else {
        ctx.output.notice(&reply.reply);
    }
    Ok(())
}

/// Run the admin-config command.
pub async fn config(args: AdminConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        AdminConfigCommand::Show => show_config(ctx).await,
        AdminConfigCommand::Set(set) => save_config(set, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    let config = match client.config().await {
        Ok(config) => config,
        Err(e) => {
            degraded(ctx, "settings", &e);
            return Ok(());
        }
    };

    if ctx.output.is_json() {
        ctx.output.json(&config);
        return Ok(());
    }

    ctx.output.header("Store Settings");
    for (key, value) in config_lines(&config) {
        ctx.output.kv(key, &value);
    }
    Ok(())
}

fn config_lines(config: &RemoteConfig) -> Vec<(&'static str, String)> {
    let text = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
    let number = |v: &Option<Scalar>| v.as_ref().map_or_else(|| "-".to_string(), Scalar::to_string);
    vec![
        ("store_name", text(&config.store_name)),
        ("currency", text(&config.currency)),
        ("delivery_fee", number(&config.delivery_fee)),
        ("free_threshold", number(&config.free_threshold)),
        ("gemini_model", text(&config.gemini_model)),
        ("db_host", text(&config.db_host)),
        ("db_port", number(&config.db_port)),
        ("db_name", text(&config.db_name)),
    ]
}

fn update_from_args(args: AdminConfigSetArgs) -> ConfigUpdate {
    ConfigUpdate {
        gemini_api_key: args.gemini_api_key.filter(|k| !k.is_empty()),
        gemini_model: args.gemini_model,
        store_name: args.store_name,
        currency: args.currency,
        delivery_fee: args.delivery_fee,
        free_threshold: args.free_threshold,
    }
}

async fn save_config(args: AdminConfigSetArgs, ctx: &Context) -> Result<()> {
    let update = update_from_args(args);
    if update.is_empty() {
        bail!("Nothing to update; pass at least one setting");
    }

    let client = client(ctx)?;
    let message = client
        .save_config(&update)
        .await
        .context("Failed to save store settings")?;

    ctx.logger.info("store settings saved").emit();
    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "success": true, "message": message }));
    } else {
        ctx.output
            .success(message.as_deref().unwrap_or("Configuration saved."));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_rows_show_price_and_stock() {
        let products: Vec<ProductRow> = serde_json::from_str(
            r#"[{"name": "Casque", "category": null, "price": "249.00", "stock": 12},
                {"name": "Cable", "category": "Accessoires", "price": 15}]"#,
        )
        .unwrap();
        assert_eq!(
            product_rows(&products),
            vec![
                vec!["Casque", "-", "249.00 DH", "12"],
                vec!["Cable", "Accessoires", "15 DH", "-"],
            ]
        );
    }

    #[test]
    fn test_order_rows() {
        let orders: Vec<OrderRow> = serde_json::from_str(
            r#"[{"id": "abcdef0123456789", "customer_name": "Sara", "customer_phone": "+212611111111",
                 "total_price": 338.5, "status": null, "created_at": "Wed, 01 May 2024 09:30:05 GMT"}]"#,
        )
        .unwrap();
        assert_eq!(
            order_rows(&orders)[0],
            vec!["abcdef01", "Sara", "+212611111111", "338.5 DH", "pending", "2024-05-01"]
        );
    }

    #[test]
    fn test_session_rows() {
        let sessions = vec![SessionRow {
            phone: "+212622222222".to_string(),
            state: "browsing".to_string(),
            cart_items: 3,
            customer_name: None,
            last_activity: None,
        }];
        assert_eq!(
            session_rows(&sessions),
            vec![vec!["+212622222222", "browsing", "3", "-"]]
        );
    }

    #[test]
    fn test_config_lines_fill_missing_values() {
        let config: RemoteConfig =
            serde_json::from_str(r#"{"store_name": "TechStore", "delivery_fee": 30.0}"#).unwrap();
        let lines = config_lines(&config);
        assert_eq!(lines[0], ("store_name", "TechStore".to_string()));
        assert_eq!(lines[2], ("delivery_fee", "30".to_string()));
        assert_eq!(lines[4], ("gemini_model", "-".to_string()));
    }

    #[test]
    fn test_empty_api_key_is_not_sent() {
        let update = update_from_args(AdminConfigSetArgs {
            gemini_api_key: Some(String::new()),
            gemini_model: None,
            store_name: None,
            currency: None,
            delivery_fee: None,
            free_threshold: None,
        });
        assert!(update.is_empty());
    }
}
