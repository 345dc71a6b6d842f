//! Captured-traffic (HTTP Archive) document model.
//!
//! Every field is defaulted so a sparse or slightly off capture still
//! parses; the merge session decides per entry whether there is enough to
//! fold. Only a document that is not JSON at all fails to load.

use crate::error::Result;
use crate::rule::null_to_default;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use url::Url;

/// Top-level capture document.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureDocument {
    #[serde(default, deserialize_with = "null_to_default")]
    pub log: CaptureLog,
}

impl CaptureDocument {
    /// Load a capture document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Parse a capture document from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn entries(&self) -> &[CaptureEntry] {
        &self.log.entries
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureLog {
    #[serde(default, deserialize_with = "null_to_default")]
    pub entries: Vec<CaptureEntry>,
}

/// One request/response pair from the capture.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureEntry {
    #[serde(default)]
    pub request: Option<CaptureRequest>,
    #[serde(default)]
    pub response: Option<CaptureResponse>,
}

/// Captured request line plus its recorded query parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct CaptureRequest {
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub url: String,
    #[serde(
        default,
        rename = "queryString",
        deserialize_with = "null_to_default"
    )]
    pub query_string: Vec<QueryPair>,
}

fn default_method() -> String {
    "GET".to_string()
}

impl CaptureRequest {
    /// URL path of the captured request. An unparseable URL falls back to
    /// the raw text so the entry still groups deterministically.
    pub fn path(&self) -> String {
        match Url::parse(&self.url) {
            Ok(url) => url.path().to_string(),
            Err(_) => self.url.clone(),
        }
    }
}

/// Single query parameter as captured.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct QueryPair {
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub value: String,
}

impl QueryPair {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Captured response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureResponse {
    #[serde(default)]
    pub status: i64,
    #[serde(default, deserialize_with = "null_to_default")]
    pub headers: Vec<CaptureHeader>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub content: CaptureContent,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureHeader {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub value: String,
}

/// Captured response body with its declared content type.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CaptureContent {
    #[serde(
        default,
        rename = "mimeType",
        deserialize_with = "null_to_default"
    )]
    pub mime_type: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub text: String,
}

impl CaptureResponse {
    /// Body text ready for storage: payloads declared as JSON are
    /// re-serialized with stable indentation, anything that fails to parse
    /// despite the declared type stays raw.
    pub fn formatted_body(&self) -> String {
        let text = &self.content.text;
        if self.content.mime_type.contains("json") && !text.is_empty() {
            if let Ok(value) = serde_json::from_str::<serde_json::Value>(text) {
                if let Ok(pretty) = serde_json::to_string_pretty(&value) {
                    return pretty;
                }
            }
        }
        text.clone()
    }
}
