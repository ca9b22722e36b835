//! Status model for the backend and the messaging bridge.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of the bridge's `GET /status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BridgeStatus {
    /// Whether the messaging client is logged in and ready.
    pub ready: bool,
    /// Pending pairing QR payload, if any.
    #[serde(default)]
    pub qr: Option<String>,
}

/// Pairing state reported by the bridge's `GET /qr`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QrState {
    /// Client is paired; no QR needed.
    Connected,
    /// A QR code is waiting to be scanned.
    WaitingScan,
    /// The client has not produced a QR code yet.
    Initializing,
}

impl QrState {
    /// Pairing state from readiness and the pending QR payload.
    pub fn derive(ready: bool, qr: Option<&str>) -> Self {
        if ready {
            Self::Connected
        } else if qr.is_some() {
            Self::WaitingScan
        } else {
            Self::Initializing
        }
    }
}

/// Body of the bridge's `GET /qr`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QrInfo {
    pub status: QrState,
    #[serde(default)]
    pub qr: Option<String>,
}

impl From<&BridgeStatus> for QrInfo {
    fn from(status: &BridgeStatus) -> Self {
        let state = QrState::derive(status.ready, status.qr.as_deref());
        Self {
            status: state,
            qr: match state {
                QrState::WaitingScan => status.qr.clone(),
                _ => None,
            },
        }
    }
}

/// Bridge health as shown on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BridgeHealth {
    Connected,
    WaitingQr,
    Offline,
}

impl BridgeHealth {
    /// Health from a `/status` response, `None` meaning unreachable.
    pub fn from_status(status: Option<&BridgeStatus>) -> Self {
        match status {
            Some(s) if s.ready => Self::Connected,
            Some(_) => Self::WaitingQr,
            None => Self::Offline,
        }
    }
}

impl fmt::Display for BridgeHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "Connected"),
            Self::WaitingQr => write!(f, "Waiting QR"),
            Self::Offline => write!(f, "Offline"),
        }
    }
}

/// Overall system state.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SystemStatus {
    AllOnline,
    WhatsAppDisconnected,
    BackendOffline,
}

impl SystemStatus {
    /// Combine backend reachability with bridge health.
    pub fn derive(backend_online: bool, bridge: BridgeHealth) -> Self {
        match (backend_online, bridge) {
            (false, _) => Self::BackendOffline,
            (true, BridgeHealth::Connected) => Self::AllOnline,
            (true, _) => Self::WhatsAppDisconnected,
        }
    }
}

impl fmt::Display for SystemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllOnline => write!(f, "All Systems Online"),
            Self::WhatsAppDisconnected => write!(f, "WhatsApp Disconnected"),
            Self::BackendOffline => write!(f, "Backend Offline"),
        }
    }
}

/// Where status information comes from.
///
/// Implementations turn every transport failure into the "unreachable"
/// value (`false` / `None`); they never error.
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Whether the backend `/health` endpoint answers with success.
    async fn backend_healthy(&self) -> bool;

    /// The bridge `/status` body, or `None` if unreachable.
    async fn bridge_status(&self) -> Option<BridgeStatus>;

    /// The bridge `/qr` body, or `None` if unreachable.
    async fn qr(&self) -> Option<QrInfo>;

    /// Number of products the backend lists.
    async fn product_count(&self) -> Option<usize>;

    /// Number of active conversation sessions on the backend.
    async fn session_count(&self) -> Option<usize>;
}

/// One round of status checks.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusSnapshot {
    pub checked_at: DateTime<Utc>,
    pub backend_online: bool,
    pub bridge: BridgeHealth,
    pub system: SystemStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_count: Option<usize>,
}

/// Run every check once.
///
/// Product and session counts are only requested when the backend is up.
pub async fn collect_snapshot<S: StatusSource + ?Sized>(source: &S) -> StatusSnapshot {
    let backend_online = source.backend_healthy().await;
    let bridge = BridgeHealth::from_status(source.bridge_status().await.as_ref());

    let (product_count, session_count) = if backend_online {
        (source.product_count().await, source.session_count().await)
    } else {
        (None, None)
    };

    StatusSnapshot {
        checked_at: Utc::now(),
        backend_online,
        bridge,
        system: SystemStatus::derive(backend_online, bridge),
        product_count,
        session_count,
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned source that counts how often it is asked about products.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub backend: bool,
        pub bridge: Option<BridgeStatus>,
        pub product_calls: AtomicUsize,
    }

    #[async_trait]
    impl StatusSource for FakeSource {
        async fn backend_healthy(&self) -> bool {
            self.backend
        }

        async fn bridge_status(&self) -> Option<BridgeStatus> {
            self.bridge.clone()
        }

        async fn qr(&self) -> Option<QrInfo> {
            self.bridge.as_ref().map(QrInfo::from)
        }

        async fn product_count(&self) -> Option<usize> {
            self.product_calls.fetch_add(1, Ordering::SeqCst);
            Some(4)
        }

        async fn session_count(&self) -> Option<usize> {
            Some(2)
        }
    }

    #[test]
    fn test_qr_state() {
        assert_eq!(QrState::derive(true, Some("abc")), QrState::Connected);
        assert_eq!(QrState::derive(false, Some("abc")), QrState::WaitingScan);
        assert_eq!(QrState::derive(false, None), QrState::Initializing);
    }

    #[test]
    fn test_qr_info_hides_code_once_connected() {
        let info = QrInfo::from(&BridgeStatus {
            ready: true,
            qr: Some("stale".to_string()),
        });
        assert_eq!(info.status, QrState::Connected);
        assert_eq!(info.qr, None);
    }

    #[test]
    fn test_qr_info_wire_format() {
        let info: QrInfo = serde_json::from_str(r#"{"status":"waiting_scan","qr":"2@xyz"}"#).unwrap();
        assert_eq!(info.status, QrState::WaitingScan);
        assert_eq!(info.qr.as_deref(), Some("2@xyz"));
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            SystemStatus::derive(true, BridgeHealth::Connected),
            SystemStatus::AllOnline
        );
        assert_eq!(
            SystemStatus::derive(true, BridgeHealth::WaitingQr),
            SystemStatus::WhatsAppDisconnected
        );
        assert_eq!(
            SystemStatus::derive(false, BridgeHealth::Connected),
            SystemStatus::BackendOffline
        );
        assert_eq!(SystemStatus::AllOnline.to_string(), "All Systems Online");
    }

    #[test]
    fn test_bridge_health() {
        let waiting = BridgeStatus {
            ready: false,
            qr: None,
        };
        assert_eq!(BridgeHealth::from_status(Some(&waiting)), BridgeHealth::WaitingQr);
        assert_eq!(BridgeHealth::from_status(None), BridgeHealth::Offline);
        assert_eq!(BridgeHealth::WaitingQr.to_string(), "Waiting QR");
    }

    #[tokio::test]
    async fn test_snapshot_all_online() {
        let source = FakeSource {
            backend: true,
            bridge: Some(BridgeStatus {
                ready: true,
                qr: None,
            }),
            ..Default::default()
        };

        let snapshot = collect_snapshot(&source).await;
        assert_eq!(snapshot.system, SystemStatus::AllOnline);
        assert_eq!(snapshot.product_count, Some(4));
        assert_eq!(snapshot.session_count, Some(2));
    }

    #[tokio::test]
    async fn test_snapshot_backend_offline_skips_counts() {
        let source = FakeSource::default();

        let snapshot = collect_snapshot(&source).await;
        assert_eq!(snapshot.system, SystemStatus::BackendOffline);
        assert_eq!(snapshot.bridge, BridgeHealth::Offline);
        assert_eq!(snapshot.product_count, None);
        assert_eq!(source.product_calls.load(Ordering::SeqCst), 0);
    }
}
