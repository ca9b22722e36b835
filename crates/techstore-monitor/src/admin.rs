//! Dashboard data views served by the backend API.
//!
//! Rows are decoded leniently: the backend serializes decimal columns as
//! strings and leaves optional columns `null`, so anything the dashboard
//! only displays is optional or a [`Scalar`].

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{MonitorError, MonitorResult};
use crate::http::{build_client, Endpoints};

/// Phone number `test_ai` uses when none is given.
pub const TEST_PHONE: &str = "+212600000000";

/// A value the backend may send as a number or as a string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{}", n),
            Self::Float(x) if x.fract() == 0.0 => write!(f, "{:.0}", x),
            Self::Float(x) => write!(f, "{}", x),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One product as listed on the dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    #[serde(default)]
    pub id: Option<Scalar>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub price: Scalar,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub images: Option<Vec<String>>,
}

impl ProductRow {
    pub fn category_label(&self) -> &str {
        self.category.as_deref().filter(|c| !c.is_empty()).unwrap_or("-")
    }

    /// First image URL, if the product has one.
    pub fn thumbnail(&self) -> Option<&str> {
        self.images.as_ref()?.first().map(String::as_str)
    }
}

/// One order, newest first as the backend returns them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRow {
    pub id: Scalar,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub customer_phone: Option<String>,
    #[serde(default)]
    pub total_price: Option<Scalar>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl OrderRow {
    /// First eight characters of the id.
    pub fn short_id(&self) -> String {
        self.id.to_string().chars().take(8).collect()
    }

    pub fn status_label(&self) -> &str {
        self.status.as_deref().filter(|s| !s.is_empty()).unwrap_or("pending")
    }

    /// Calendar date of `created_at`, from RFC 3339, RFC 2822 or a bare
    /// `YYYY-MM-DD...` prefix.
    pub fn created_date(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?.trim();
        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.date_naive());
        }
        if let Ok(ts) = DateTime::parse_from_rfc2822(raw) {
            return Some(ts.date_naive());
        }
        raw.get(..10)
            .and_then(|day| NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }
}

/// A line in a chat session's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionItem {
    #[serde(default)]
    pub product_id: Option<Scalar>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Scalar>,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub color: Option<String>,
}

/// Session body as the backend sends it, keyed by phone.
#[derive(Debug, Clone, Deserialize)]
struct SessionBody {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    cart: Vec<SessionItem>,
    #[serde(default)]
    cart_items: Option<i64>,
    #[serde(default)]
    customer_name: Option<String>,
    #[serde(default)]
    last_activity: Option<String>,
}

/// One active chat session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionRow {
    pub phone: String,
    pub state: String,
    /// Units in the session's cart.
    pub cart_items: i64,
    pub customer_name: Option<String>,
    pub last_activity: Option<String>,
}

impl SessionRow {
    fn from_body(phone: String, body: SessionBody) -> Self {
        let counted: i64 = body.cart.iter().map(|item| item.quantity).sum();
        Self {
            phone,
            state: body.state.unwrap_or_else(|| "unknown".to_string()),
            cart_items: if body.cart.is_empty() {
                body.cart_items.unwrap_or(0)
            } else {
                counted
            },
            customer_name: body.customer_name.filter(|n| !n.is_empty()),
            last_activity: body.last_activity,
        }
    }
}

fn session_rows(map: BTreeMap<String, SessionBody>) -> Vec<SessionRow> {
    map.into_iter()
        .map(|(phone, body)| SessionRow::from_body(phone, body))
        .collect()
}

/// Answer from the AI test endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiReply {
    pub reply: String,
    #[serde(default)]
    pub session: Option<serde_json::Value>,
}

/// Store settings reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub gemini_model: Option<String>,
    #[serde(default)]
    pub store_name: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub delivery_fee: Option<Scalar>,
    #[serde(default)]
    pub free_threshold: Option<Scalar>,
    #[serde(default)]
    pub db_host: Option<String>,
    #[serde(default)]
    pub db_port: Option<Scalar>,
    #[serde(default)]
    pub db_name: Option<String>,
}

/// Settings to change. Unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfigUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_fee: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_threshold: Option<f64>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Serialize)]
struct TestAiBody<'a> {
    phone: &'a str,
    message: &'a str,
}

#[derive(Debug, Deserialize)]
struct SaveReply {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Read-mostly client for the dashboard endpoints of the backend.
#[derive(Debug, Clone)]
pub struct AdminClient {
    client: reqwest::Client,
    endpoints: Endpoints,
}

impl AdminClient {
    /// Create a client for the given endpoints.
    pub fn new(endpoints: Endpoints) -> MonitorResult<Self> {
        Ok(Self {
            client: build_client(endpoints.timeout)?,
            endpoints,
        })
    }

    /// Active products, optionally limited to one category.
    pub async fn products(&self, category: Option<&str>) -> MonitorResult<Vec<ProductRow>> {
        let mut request = self.client.get(self.endpoints.api("/products"));
        if let Some(category) = category {
            request = request.query(&[("category", category)]);
        }
        self.send(request, "/products").await
    }

    /// The most recent orders.
    pub async fn orders(&self) -> MonitorResult<Vec<OrderRow>> {
        let request = self.client.get(self.endpoints.api("/orders"));
        self.send(request, "/orders").await
    }

    /// Active chat sessions, ordered by phone.
    pub async fn sessions(&self) -> MonitorResult<Vec<SessionRow>> {
        let request = self.client.get(self.endpoints.api("/sessions"));
        let map: BTreeMap<String, SessionBody> = self.send(request, "/sessions").await?;
        Ok(session_rows(map))
    }

    /// Run one message through the AI agent without the bridge.
    pub async fn test_ai(&self, phone: &str, message: &str) -> MonitorResult<AiReply> {
        let request = self
            .client
            .post(self.endpoints.api("/test-ai"))
            .json(&TestAiBody { phone, message });
        self.send(request, "/test-ai").await
    }

    /// Current store settings.
    pub async fn config(&self) -> MonitorResult<RemoteConfig> {
        let request = self.client.get(self.endpoints.api("/config"));
        self.send(request, "/config").await
    }

    /// Save settings. Returns the backend's message, if any.
    pub async fn save_config(&self, update: &ConfigUpdate) -> MonitorResult<Option<String>> {
        let request = self.client.post(self.endpoints.api("/config")).json(update);
        let reply: SaveReply = self.send(request, "/config").await?;
        Ok(reply.message)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        path: &str,
    ) -> MonitorResult<T> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let body = resp.text().await?;
        decode_response(status, &body, path)
    }
}

fn decode_response<T: DeserializeOwned>(status: u16, body: &str, path: &str) -> MonitorResult<T> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map(|e| e.error)
            .unwrap_or_else(|_| body.trim().to_string());
        return Err(MonitorError::Status {
            service: "backend",
            status,
            message,
        });
    }
    serde_json::from_str(body).map_err(|_| MonitorError::Decode(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRODUCTS: &str = r#"[
        {"id": 3, "name": "Casque Bluetooth", "price": "249.00", "compare_at_price": null,
         "images": ["https://cdn/x.jpg"], "category": "Audio", "stock": 12, "colors": null},
        {"id": 4, "name": "Chargeur", "price": 89.5, "images": null, "category": null, "stock": 0}
    ]"#;

    const ORDERS: &str = r#"[
        {"id": "9b1f3c2a-77aa-4c1e-9d55-0a1b2c3d4e5f", "customer_name": "Sara",
         "customer_phone": "+212611111111", "total_price": "338.50", "status": "confirmed",
         "created_at": "Wed, 01 May 2024 09:30:05 GMT"},
        {"id": 17, "customer_name": null, "total_price": 120, "status": null,
         "created_at": "2024-04-30T18:00:00"}
    ]"#;

    const SESSIONS: &str = r#"{
        "+212622222222": {"phone": "+212622222222", "state": "collecting_info",
            "cart": [{"product_id": 3, "name": "Casque", "price": 249.0, "quantity": 2, "color": null},
                     {"product_id": 4, "name": "Chargeur", "price": 89.5, "quantity": 1, "color": "noir"}],
            "customer_name": "Youssef", "customer_address": null, "customer_city": null,
            "last_viewed_product": 3, "last_activity": "2024-05-01T10:00:00.123456"},
        "+212600000000": {"state": "browsing", "cart": [], "customer_name": null}
    }"#;

    #[test]
    fn test_decode_products() {
        let rows: Vec<ProductRow> = decode_response(200, PRODUCTS, "/products").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].price.to_string(), "249.00");
        assert_eq!(rows[0].category_label(), "Audio");
        assert_eq!(rows[0].thumbnail(), Some("https://cdn/x.jpg"));
        assert_eq!(rows[1].price, Scalar::Float(89.5));
        assert_eq!(rows[1].category_label(), "-");
        assert_eq!(rows[1].thumbnail(), None);
        assert_eq!(rows[1].stock, Some(0));
    }

    #[test]
    fn test_decode_orders() {
        let rows: Vec<OrderRow> = decode_response(200, ORDERS, "/orders").unwrap();
        assert_eq!(rows[0].short_id(), "9b1f3c2a");
        assert_eq!(rows[0].status_label(), "confirmed");
        assert_eq!(
            rows[0].created_date(),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );

        assert_eq!(rows[1].short_id(), "17");
        assert_eq!(rows[1].status_label(), "pending");
        assert_eq!(rows[1].total_price.as_ref().map(|p| p.to_string()).as_deref(), Some("120"));
        assert_eq!(
            rows[1].created_date(),
            NaiveDate::from_ymd_opt(2024, 4, 30)
        );
    }

    #[test]
    fn test_decode_sessions() {
        let map: BTreeMap<String, SessionBody> = decode_response(200, SESSIONS, "/sessions").unwrap();
        let rows = session_rows(map);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].phone, "+212600000000");
        assert_eq!(rows[0].state, "browsing");
        assert_eq!(rows[0].cart_items, 0);
        assert_eq!(rows[0].customer_name, None);

        assert_eq!(rows[1].state, "collecting_info");
        assert_eq!(rows[1].cart_items, 3);
        assert_eq!(rows[1].customer_name.as_deref(), Some("Youssef"));
    }

    #[test]
    fn test_session_item_count_fallback() {
        let map: BTreeMap<String, SessionBody> =
            serde_json::from_str(r#"{"+1": {"state": "ordering", "cart_items": 4}}"#).unwrap();
        assert_eq!(session_rows(map)[0].cart_items, 4);
    }

    #[test]
    fn test_decode_config() {
        let body = r#"{"gemini_model": "gemini-1.5-flash", "store_name": "TechStore",
            "currency": "DH", "delivery_fee": 30.0, "free_threshold": 500,
            "db_host": "localhost", "db_port": 3306, "db_name": "cod"}"#;
        let config: RemoteConfig = decode_response(200, body, "/config").unwrap();
        assert_eq!(config.store_name.as_deref(), Some("TechStore"));
        assert_eq!(config.delivery_fee.map(|f| f.to_string()).as_deref(), Some("30"));
        assert_eq!(config.db_port, Some(Scalar::Int(3306)));
    }

    #[test]
    fn test_ai_error_reported_with_backend_message() {
        let err = decode_response::<AiReply>(500, r#"{"error": "quota exceeded"}"#, "/test-ai")
            .unwrap_err();
        assert_eq!(err.to_string(), "backend returned 500: quota exceeded");
    }

    #[test]
    fn test_ai_reply() {
        let reply: AiReply =
            decode_response(200, r#"{"reply": "Salam!", "session": {"state": "browsing"}}"#, "/test-ai")
                .unwrap();
        assert_eq!(reply.reply, "Salam!");
        assert!(reply.session.is_some());
    }

    #[test]
    fn test_error_object_is_not_a_list() {
        assert!(matches!(
            decode_response::<Vec<ProductRow>>(200, r#"{"error": "db down"}"#, "/products"),
            Err(MonitorError::Decode(path)) if path == "/products"
        ));
    }

    #[test]
    fn test_config_update_sends_only_set_fields() {
        let update = ConfigUpdate {
            store_name: Some("TechStore".to_string()),
            delivery_fee: Some(25.0),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"store_name":"TechStore","delivery_fee":25.0}"#
        );
        assert!(ConfigUpdate::default().is_empty());
    }
}
