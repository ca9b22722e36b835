//! Session correlation ids.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::RngCore;

const PREFIX: &str = "ts_";

/// Correlates the log lines of one CLI invocation.
///
/// Generated ids are `ts_` followed by 16 url-safe base64 characters.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionId(Arc<str>);

impl SessionId {
    /// Fresh random id.
    pub fn generate() -> Self {
        let mut raw = [0u8; 12];
        rand::thread_rng().fill_bytes(&mut raw);
        Self::named(format!("{PREFIX}{}", URL_SAFE_NO_PAD.encode(raw)))
    }

    /// Use a fixed id, e.g. in tests.
    pub fn named(id: impl AsRef<str>) -> Self {
        Self(Arc::from(id.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SessionId").field(&&*self.0).finish()
    }
}
