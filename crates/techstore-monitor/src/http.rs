//! HTTP clients for the backend and the messaging bridge.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, MonitorResult};
use crate::status::{BridgeStatus, QrInfo, StatusSource};

/// Default backend API base URL.
pub const DEFAULT_API_BASE: &str = "http://localhost:5000";

/// Default bridge base URL.
pub const DEFAULT_BRIDGE_BASE: &str = "http://localhost:3001";

/// Base URLs and request timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub api_base: String,
    pub bridge_base: String,
    pub timeout: Duration,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            bridge_base: DEFAULT_BRIDGE_BASE.to_string(),
            timeout: Duration::from_secs(5),
        }
    }
}

impl Endpoints {
    pub(crate) fn api(&self, path: &str) -> String {
        join(&self.api_base, path)
    }

    fn bridge(&self, path: &str) -> String {
        join(&self.bridge_base, path)
    }
}

fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

pub(crate) fn build_client(timeout: Duration) -> MonitorResult<reqwest::Client> {
    Ok(reqwest::Client::builder().timeout(timeout).build()?)
}

/// Status source that talks to the real services.
#[derive(Debug, Clone)]
pub struct HttpStatusSource {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpStatusSource {
    /// Create a source for the given endpoints.
    pub fn new(endpoints: Endpoints) -> MonitorResult<Self> {
        Ok(Self {
            client: build_client(endpoints.timeout)?,
            endpoints,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: String) -> Option<T> {
        match self.client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => resp.json::<T>().await.ok(),
            _ => None,
        }
    }
}

#[async_trait]
impl StatusSource for HttpStatusSource {
    async fn backend_healthy(&self) -> bool {
        match self.client.get(self.endpoints.api("/health")).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn bridge_status(&self) -> Option<BridgeStatus> {
        self.get_json(self.endpoints.bridge("/status")).await
    }

    async fn qr(&self) -> Option<QrInfo> {
        self.get_json(self.endpoints.bridge("/qr")).await
    }

    async fn product_count(&self) -> Option<usize> {
        let products: serde_json::Value = self.get_json(self.endpoints.api("/products")).await?;
        Some(products.as_array().map_or(0, Vec::len))
    }

    async fn session_count(&self) -> Option<usize> {
        let sessions: serde_json::Value = self.get_json(self.endpoints.api("/sessions")).await?;
        Some(sessions.as_object().map_or(0, |m| m.len()))
    }
}

#[derive(Debug, Serialize)]
struct SendBody<'a> {
    phone: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendImageBody<'a> {
    phone: &'a str,
    image_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    caption: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct BridgeReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Commands sent to the messaging bridge.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl BridgeClient {
    /// Create a client for the given endpoints.
    pub fn new(endpoints: Endpoints) -> MonitorResult<Self> {
        Ok(Self {
            client: build_client(endpoints.timeout)?,
            endpoints,
        })
    }

    /// Send a text message to a phone number.
    pub async fn send(&self, phone: &str, message: &str) -> MonitorResult<()> {
        self.post("/send", &SendBody { phone, message }).await.map(|_| ())
    }

    /// Send an image by URL with an optional caption.
    pub async fn send_image(
        &self,
        phone: &str,
        image_url: &str,
        caption: Option<&str>,
    ) -> MonitorResult<()> {
        let body = SendImageBody {
            phone,
            image_url,
            caption,
        };
        self.post("/send-image", &body).await.map(|_| ())
    }

    /// Restart the messaging client. Returns the bridge's message, if any.
    pub async fn restart(&self) -> MonitorResult<Option<String>> {
        self.post("/restart", &serde_json::json!({})).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> MonitorResult<Option<String>> {
        let url = self.endpoints.bridge(path);
        let resp = self.client.post(&url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        interpret_reply(status.as_u16(), &text, &url)
    }
}

fn interpret_reply(status: u16, body: &str, url: &str) -> MonitorResult<Option<String>> {
    let reply: Option<BridgeReply> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let message = reply
            .and_then(|r| r.error)
            .unwrap_or_else(|| body.trim().to_string());
        return Err(MonitorError::Status {
            service: "bridge",
            status,
            message,
        });
    }

    match reply {
        Some(r) if r.success => Ok(r.message),
        Some(r) => Err(MonitorError::Status {
            service: "bridge",
            status,
            message: r.error.unwrap_or_else(|| "request not accepted".to_string()),
        }),
        None => Err(MonitorError::Decode(url.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join() {
        assert_eq!(join("http://h:1/", "/status"), "http://h:1/status");
        assert_eq!(join("http://h:1", "qr"), "http://h:1/qr");
    }

    #[test]
    fn test_send_image_body_field_names() {
        let body = SendImageBody {
            phone: "212600000000",
            image_url: "https://img/x.png",
            caption: None,
        };
        assert_eq!(
            serde_json::to_string(&body).unwrap(),
            r#"{"phone":"212600000000","imageUrl":"https://img/x.png"}"#
        );
    }

    #[test]
    fn test_reply_success() {
        let msg = interpret_reply(200, r#"{"success":true,"message":"Restarting..."}"#, "u").unwrap();
        assert_eq!(msg.as_deref(), Some("Restarting..."));
    }

    #[test]
    fn test_reply_not_connected() {
        let err = interpret_reply(503, r#"{"error":"WhatsApp not connected"}"#, "u").unwrap_err();
        assert_eq!(err.to_string(), "bridge returned 503: WhatsApp not connected");
    }

    #[test]
    fn test_reply_not_json() {
        assert!(matches!(
            interpret_reply(200, "<html>", "u"),
            Err(MonitorError::Decode(_))
        ));
    }
}
