//! Messaging bridge commands.

use anyhow::{Context as _, Result};

use techstore_monitor::BridgeClient;

use super::{SendArgs, SendImageArgs};
use crate::context::Context;

fn client(ctx: &Context) -> Result<BridgeClient> {
    BridgeClient::new(ctx.config.endpoints()).context("Failed to create HTTP client")
}

/// Send a text message.
pub async fn send(args: SendArgs, ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    client
        .send(&args.phone, &args.message)
        .await
        .with_context(|| format!("Failed to send message to {}", args.phone))?;

    ctx.logger
        .info("message sent")
        .field("phone", args.phone.as_str())
        .emit();
    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "success": true }));
    } else {
        ctx.output.success(&format!("Message sent to {}", args.phone));
    }
    Ok(())
}

/// Send an image by URL.
pub async fn send_image(args: SendImageArgs, ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    client
        .send_image(&args.phone, &args.image_url, args.caption.as_deref())
        .await
        .with_context(|| format!("Failed to send image to {}", args.phone))?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "success": true }));
    } else {
        ctx.output.success(&format!("Image sent to {}", args.phone));
    }
    Ok(())
}

/// Restart the messaging client behind the bridge.
pub async fn restart(ctx: &Context) -> Result<()> {
    let client = client(ctx)?;
    let spinner = ctx.output.spinner("Restarting bridge...");
    let result = client.restart().await;
    spinner.finish_and_clear();
    let message = result.context("Failed to restart bridge")?;

    ctx.logger.info("bridge restart requested").emit();
    if ctx.output.is_json() {
        ctx.output
            .json(&serde_json::json!({ "success": true, "message": message }));
    } else {
        ctx.output
            .success(message.as_deref().unwrap_or("Bridge restarting"));
    }
    Ok(())
}
