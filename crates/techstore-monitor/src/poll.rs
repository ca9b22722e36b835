//! Fixed-interval status polling.

use std::time::Duration;

use tokio::time::{interval, MissedTickBehavior};

use crate::status::{collect_snapshot, QrInfo, StatusSnapshot, StatusSource};

/// How often the dashboard refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollIntervals {
    /// General status refresh.
    pub status: Duration,
    /// QR refresh while the pairing panel is open.
    pub qr: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            status: Duration::from_secs(10),
            qr: Duration::from_secs(5),
        }
    }
}

/// Collect a snapshot every `every`, handing each to `on_snapshot`.
///
/// The first snapshot is taken immediately. Stops after `limit` rounds when
/// given, otherwise runs until the future is dropped.
pub async fn watch_status<S, F>(source: &S, every: Duration, limit: Option<usize>, mut on_snapshot: F)
where
    S: StatusSource + ?Sized,
    F: FnMut(StatusSnapshot),
{
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rounds = 0usize;

    loop {
        if limit.is_some_and(|l| rounds >= l) {
            break;
        }
        ticker.tick().await;
        on_snapshot(collect_snapshot(source).await);
        rounds += 1;
    }
}

/// Poll the bridge QR endpoint every `every` until the client is connected.
///
/// Unreachable rounds are passed to `on_qr` as `None`. Returns after the
/// first `connected` answer, or after `limit` rounds when given.
pub async fn watch_qr<S, F>(source: &S, every: Duration, limit: Option<usize>, mut on_qr: F)
where
    S: StatusSource + ?Sized,
    F: FnMut(Option<&QrInfo>),
{
    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut rounds = 0usize;

    loop {
        if limit.is_some_and(|l| rounds >= l) {
            break;
        }
        ticker.tick().await;
        let info = source.qr().await;
        on_qr(info.as_ref());
        rounds += 1;
        if info.is_some_and(|i| i.status == crate::QrState::Connected) {
            break;
        }
    }
}
