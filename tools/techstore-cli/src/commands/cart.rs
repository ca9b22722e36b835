//! Cart commands: catalog, add, remove, qty, show.

use anyhow::{anyhow, Result};
use serde::Serialize;

use techstore_cart::{price_display, Cart, CartManager, CartView, Recorder, EMPTY_CART_TEXT};
use techstore_kv::KvStore;

use super::{AddArgs, QtyArgs, RemoveArgs};
use crate::context::Context;

/// JSON shape printed by cart commands in `--json` mode.
#[derive(Debug, Serialize)]
pub struct CartReport {
    pub notices: Vec<String>,
    pub confirmations: Vec<String>,
    pub cart: CartView,
}

impl CartReport {
    /// Drain the manager's recorded messages and render `cart`.
    pub fn collect<S: KvStore>(manager: &CartManager<S, Recorder, Recorder>, cart: &Cart) -> Self {
        Self {
            notices: manager.notifier().take(),
            confirmations: manager.confirmer().take(),
            cart: CartView::render(cart),
        }
    }
}

/// List the configured products.
pub async fn catalog(ctx: &Context) -> Result<()> {
    let catalog = ctx.config.catalog();

    if ctx.output.is_json() {
        ctx.output.json(&catalog);
        return Ok(());
    }

    ctx.output.header("Catalog");
    if catalog.is_empty() {
        ctx.output
            .info("No products configured. Run `techstore config init` to create a sample catalog.");
        return Ok(());
    }

    let rows: Vec<Vec<String>> = catalog
        .products()
        .iter()
        .map(|p| vec![p.id.to_string(), p.name.clone(), price_display(p.price)])
        .collect();
    ctx.output.table(&["ID", "NAME", "PRICE"], &rows);
    Ok(())
}

/// Add one unit of a product.
pub async fn add(args: AddArgs, ctx: &Context) -> Result<()> {
    let (name, price) = match (args.name, args.price) {
        (Some(name), Some(price)) => (name, price),
        (name, price) => {
            let catalog = ctx.config.catalog();
            let product = catalog.find(args.id).ok_or_else(|| {
                anyhow!(
                    "Product {} is not in the catalog; pass --name and --price",
                    args.id
                )
            })?;
            (
                name.unwrap_or_else(|| product.name.clone()),
                price.unwrap_or(product.price),
            )
        }
    };

    let manager = ctx.cart_manager()?;
    let cart = manager.load();
    let cart = manager.add_item(cart, args.id, &name, price);
    report(ctx, &manager, &cart);
    Ok(())
}

/// Remove a product's line.
pub async fn remove(args: RemoveArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    let cart = manager.load();
    let cart = manager.remove_item(cart, args.id);
    report(ctx, &manager, &cart);
    Ok(())
}

/// Change a product's quantity.
pub async fn qty(args: QtyArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    let cart = manager.load();
    if cart.get_item(args.id).is_none() {
        ctx.output
            .warn(&format!("Product {} is not in the cart.", args.id));
    }
    let cart = manager.update_quantity(cart, args.id, args.delta);
    report(ctx, &manager, &cart);
    Ok(())
}

/// Show the cart.
pub async fn show(ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    let cart = manager.load();
    report(ctx, &manager, &cart);
    Ok(())
}

/// Print the messages the manager emitted, then the cart.
pub fn report<S: KvStore>(ctx: &Context, manager: &CartManager<S, Recorder, Recorder>, cart: &Cart) {
    let report = CartReport::collect(manager, cart);

    if ctx.output.is_json() {
        ctx.output.json(&report);
        return;
    }

    for confirmation in &report.confirmations {
        ctx.output.notice(confirmation);
    }
    for notice in &report.notices {
        ctx.output.success(notice);
    }
    print_view(ctx, &report.cart);
}

fn print_view(ctx: &Context, view: &CartView) {
    ctx.output.header(&format!("Cart ({})", view.badge));

    if view.is_empty() {
        ctx.output.info(EMPTY_CART_TEXT);
        ctx.output.kv("Total", &price_display(0));
        return;
    }

    let rows: Vec<Vec<String>> = view
        .lines
        .iter()
        .map(|line| {
            vec![
                line.id.to_string(),
                line.name.clone(),
                line.price_line(),
                price_display(line.line_total),
            ]
        })
        .collect();
    ctx.output.table(&["ID", "NAME", "PRICE", "TOTAL"], &rows);
    ctx.output.kv("Total", &price_display(view.total_price));
}

#[cfg(test)]
mod tests {
    use super::*;
    use techstore_kv::MemoryStore;

    fn manager() -> CartManager<MemoryStore, Recorder, Recorder> {
        CartManager::new(MemoryStore::new())
            .with_notifier(Recorder::new())
            .with_confirmer(Recorder::new())
    }

    #[test]
    fn test_report_keeps_checkout_confirmation() {
        let manager = manager();
        let cart = manager.add_item(manager.load(), 1, "Laptop", 9000);
        let cart = manager.checkout(cart);

        let report = CartReport::collect(&manager, &cart);
        assert_eq!(report.confirmations.len(), 1);
        assert!(report.confirmations[0].starts_with("Thank you for your order!"));
        assert!(report.cart.is_empty());

        let value = serde_json::to_value(&report).unwrap();
        assert!(value["confirmations"][0]
            .as_str()
            .unwrap()
            .contains("Total: 9000 DH"));
        assert_eq!(value["notices"][0], "Laptop added to cart!");
    }

    #[test]
    fn test_report_drains_messages() {
        let manager = manager();
        let cart = manager.add_item(manager.load(), 2, "Mouse", 150);

        let first = CartReport::collect(&manager, &cart);
        assert_eq!(first.notices, vec!["Mouse added to cart!".to_string()]);
        assert!(first.confirmations.is_empty());

        let second = CartReport::collect(&manager, &cart);
        assert!(second.notices.is_empty());
        assert_eq!(second.cart.badge, 1);
    }
}
