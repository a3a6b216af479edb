//! The transport-neutral shape of one inbound webhook delivery.

use std::collections::BTreeMap;

/// Header carrying `sha256=<hex>` over the raw body.
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Header naming the provider event type.
pub const EVENT_HEADER: &str = "x-github-event";

/// Query parameter carrying the one-time decryption passphrase.
pub const KEY_PARAM: &str = "key";

/// Headers, body and query of a delivery.
///
/// Header names are stored lowercased so lookups are case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WebhookEnvelope {
    headers: BTreeMap<String, String>,
    pub body: Vec<u8>,
    /// The body is base64 text wrapping the real payload bytes.
    pub is_base64_encoded: bool,
    query: BTreeMap<String, String>,
}

impl WebhookEnvelope {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.insert_header(name, value);
        self
    }

    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn with_base64_body(mut self, encoded: bool) -> Self {
        self.is_base64_encoded = encoded;
        self
    }

    pub fn insert_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.insert(name.to_ascii_lowercase(), value.into());
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }
}
