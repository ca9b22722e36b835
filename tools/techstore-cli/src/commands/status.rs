//! System status and QR commands.

use anyhow::{Context as _, Result};

use techstore_monitor::{
    collect_snapshot, watch_qr, watch_status, BridgeHealth, HttpStatusSource, QrInfo, QrState,
    StatusSnapshot, StatusSource, SystemStatus,
};

use super::{QrArgs, StatusArgs};
use crate::context::Context;
use crate::output::{badge, Tone};

fn source(ctx: &Context) -> Result<HttpStatusSource> {
    HttpStatusSource::new(ctx.config.endpoints()).context("Failed to create HTTP client")
}

/// Check the backend and bridge once, or keep refreshing.
pub async fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let source = source(ctx)?;

    if args.watch {
        let every = ctx.config.intervals().status;
        ctx.output
            .debug(&format!("Refreshing every {}s", every.as_secs()));
        watch_status(&source, every, args.count, |snapshot| {
            print_snapshot(ctx, &snapshot)
        })
        .await;
        return Ok(());
    }

    let spinner = ctx.output.spinner("Checking services...");
    let snapshot = collect_snapshot(&source).await;
    spinner.finish_and_clear();
    print_snapshot(ctx, &snapshot);
    Ok(())
}

fn print_snapshot(ctx: &Context, snapshot: &StatusSnapshot) {
    ctx.logger
        .debug("status checked")
        .field("backend_online", snapshot.backend_online)
        .display("bridge", snapshot.bridge)
        .emit();

    if ctx.output.is_json() {
        ctx.output.json(snapshot);
        return;
    }

    let system_tone = match snapshot.system {
        SystemStatus::AllOnline => Tone::Good,
        SystemStatus::WhatsAppDisconnected => Tone::Pending,
        SystemStatus::BackendOffline => Tone::Bad,
    };
    let bridge_tone = match snapshot.bridge {
        BridgeHealth::Connected => Tone::Good,
        BridgeHealth::WaitingQr => Tone::Pending,
        BridgeHealth::Offline => Tone::Bad,
    };

    ctx.output.header(&badge(snapshot.system, system_tone));
    ctx.output.kv(
        "Checked",
        &snapshot
            .checked_at
            .with_timezone(&chrono::Local)
            .format("%H:%M:%S")
            .to_string(),
    );
    ctx.output.kv(
        "Backend",
        &if snapshot.backend_online {
            badge("Online", Tone::Good)
        } else {
            badge("Offline", Tone::Bad)
        },
    );
    ctx.output
        .kv("WhatsApp", &badge(snapshot.bridge, bridge_tone));
    if let Some(count) = snapshot.product_count {
        ctx.output.kv("Products", &count.to_string());
    }
    if let Some(count) = snapshot.session_count {
        ctx.output.kv("Sessions", &count.to_string());
    }
}

/// Show the pairing QR state, optionally polling until paired.
pub async fn qr(args: QrArgs, ctx: &Context) -> Result<()> {
    let source = source(ctx)?;

    if args.watch {
        let every = ctx.config.intervals().qr;
        watch_qr(&source, every, args.count, |info| print_qr(ctx, info)).await;
        return Ok(());
    }

    let info = source.qr().await;
    print_qr(ctx, info.as_ref());
    Ok(())
}

fn print_qr(ctx: &Context, info: Option<&QrInfo>) {
    if ctx.output.is_json() {
        ctx.output.json(&info);
        return;
    }

    match info {
        None => ctx.output.warn("Bridge unreachable."),
        Some(QrInfo {
            status: QrState::Connected,
            ..
        }) => ctx.output.success("WhatsApp is connected."),
        Some(QrInfo {
            status: QrState::WaitingScan,
            qr,
        }) => {
            ctx.output.info("Scan this code with WhatsApp:");
            ctx.output.notice(qr.as_deref().unwrap_or_default());
        }
        Some(QrInfo {
            status: QrState::Initializing,
            ..
        }) => ctx.output.info("Bridge is starting; no QR code yet."),
    }
}
