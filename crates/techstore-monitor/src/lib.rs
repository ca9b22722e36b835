//! Backend health and messaging bridge status for the TechStore admin tools.
//!
//! This crate provides:
//! - `StatusSource` - where health information comes from, with an HTTP implementation
//! - `StatusSnapshot` - one round of checks, reduced to dashboard states
//! - `BridgeClient` - send messages and restart the messaging bridge
//! - `AdminClient` - products, orders, sessions, AI test and store settings
//! - `watch_status` / `watch_qr` - fixed-interval polling

mod admin;
mod error;
mod http;
mod poll;
mod status;

pub use admin::{
    AdminClient, AiReply, ConfigUpdate, OrderRow, ProductRow, RemoteConfig, Scalar, SessionItem,
    SessionRow, TEST_PHONE,
};
pub use error::{MonitorError, MonitorResult};
pub use http::{BridgeClient, Endpoints, HttpStatusSource, DEFAULT_API_BASE, DEFAULT_BRIDGE_BASE};
pub use poll::{watch_qr, watch_status, PollIntervals};
pub use status::{
    collect_snapshot, BridgeHealth, BridgeStatus, QrInfo, QrState, StatusSnapshot, StatusSource,
    SystemStatus,
};
