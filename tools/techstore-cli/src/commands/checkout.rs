//! Checkout command.

use anyhow::{Context as _, Result};
use dialoguer::{theme::ColorfulTheme, Confirm};

use techstore_cart::price_display;

use super::cart::report;
use super::CheckoutArgs;
use crate::context::Context;

/// Place the order and empty the cart.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let manager = ctx.cart_manager()?;
    let cart = manager.load();

    if cart.is_empty() {
        ctx.output.warn("Your cart is empty. Nothing to check out.");
        report(ctx, &manager, &cart);
        return Ok(());
    }

    let totals = manager.compute_totals(&cart);
    if !args.yes && !ctx.output.is_json() {
        let proceed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!(
                "Place order for {} item(s), {}?",
                totals.total_items,
                price_display(totals.total_price)
            ))
            .default(true)
            .interact()
            .context("Failed to read confirmation")?;

        if !proceed {
            ctx.output.info("Checkout cancelled.");
            return Ok(());
        }
    }

    let cart = manager.checkout(cart);
    report(ctx, &manager, &cart);
    Ok(())
}
