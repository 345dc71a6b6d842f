//! Mock environment document model.
//!
//! Mirrors the on-disk environment format the mock-serving runtime consumes.
//! Every struct carries a flattened `extra` map so fields this tool does not
//! interpret survive a merge untouched: a run is a monotone merge into the
//! document, never a destructive rewrite.

use crate::error::Result;
use crate::rule::{null_to_default, Rule, RuleSet, RulesCombinator};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use uuid::Uuid;

fn new_uuid() -> String {
    Uuid::new_v4().to_string()
}

fn default_status_code() -> u16 {
    200
}

fn default_body_type() -> String {
    "INLINE".to_string()
}

fn default_crud_key() -> String {
    "id".to_string()
}

fn default_route_kind() -> String {
    "http".to_string()
}

fn default_migration() -> u32 {
    33
}

fn default_port() -> u16 {
    3000
}

/// Header key/value pair as stored in the environment document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub value: String,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Response selection mode for a route.
///
/// This tool always produces `RULES`; the other modes can appear in
/// documents written by hand or by other tooling and must round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseMode {
    Rules,
    Random,
    Sequential,
    DisableRules,
    Fallback,
}

/// Reference from the environment's root ordering to a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RootChild {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub uuid: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RootChild {
    pub fn route(uuid: impl Into<String>) -> Self {
        Self {
            kind: "route".to_string(),
            uuid: uuid.into(),
            extra: Map::new(),
        }
    }
}

/// TLS block of the environment skeleton. Written once, never interpreted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TlsOptions {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub pfx_path: String,
    pub cert_path: String,
    pub key_path: String,
    pub ca_path: String,
    pub passphrase: String,
}

impl Default for TlsOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            kind: "CERT".to_string(),
            pfx_path: String::new(),
            cert_path: String::new(),
            key_path: String::new(),
            ca_path: String::new(),
            passphrase: String::new(),
        }
    }
}

/// One candidate response for a route, selected at match time by its rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteResponse {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub latency: u32,
    #[serde(default = "default_status_code")]
    pub status_code: u16,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default = "default_body_type")]
    pub body_type: String,
    #[serde(default)]
    pub file_path: String,
    #[serde(default, rename = "databucketID")]
    pub databucket_id: String,
    #[serde(default)]
    pub send_file_as_body: bool,
    #[serde(default, deserialize_with = "null_to_default")]
    pub rules: Vec<Rule>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub rules_operator: RulesCombinator,
    #[serde(default)]
    pub disable_templating: bool,
    #[serde(default)]
    pub fallback_to404: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default = "default_crud_key")]
    pub crud_key: String,
    #[serde(default)]
    pub callbacks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RouteResponse {
    /// Inline response built from a captured request/response pair.
    ///
    /// The default flag starts cleared; prioritization assigns it after all
    /// entries are folded in.
    pub fn captured(
        status_code: u16,
        label: String,
        body: String,
        headers: Vec<Header>,
        rules: RuleSet,
    ) -> Self {
        Self {
            uuid: new_uuid(),
            body,
            latency: 0,
            status_code,
            label,
            headers,
            body_type: default_body_type(),
            file_path: String::new(),
            databucket_id: String::new(),
            send_file_as_body: false,
            rules: rules.into_vec(),
            rules_operator: RulesCombinator::And,
            disable_templating: false,
            fallback_to404: false,
            default: false,
            crud_key: default_crud_key(),
            callbacks: Vec::new(),
            extra: Map::new(),
        }
    }
}

/// A method+path endpoint with its ordered candidate responses.
///
/// Response order is the matching precedence the serving runtime walks, so
/// it is re-derived from content whenever responses change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    #[serde(default = "default_route_kind", rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub documentation: String,
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub responses: Vec<RouteResponse>,
    #[serde(default)]
    pub response_mode: Option<ResponseMode>,
    #[serde(default)]
    pub streaming_mode: Option<Value>,
    #[serde(default)]
    pub streaming_interval: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Route {
    /// New HTTP route for a lowercase method and a request path. The stored
    /// endpoint drops the leading slash.
    pub fn new(method: impl Into<String>, path: &str, response: RouteResponse) -> Self {
        Self {
            uuid: new_uuid(),
            kind: default_route_kind(),
            documentation: String::new(),
            method: method.into(),
            endpoint: path.trim_start_matches('/').to_string(),
            responses: vec![response],
            response_mode: Some(ResponseMode::Rules),
            streaming_mode: None,
            streaming_interval: 0,
            extra: Map::new(),
        }
    }
}

/// Top-level mock environment document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    #[serde(default = "new_uuid")]
    pub uuid: String,
    #[serde(default = "default_migration")]
    pub last_migration: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub endpoint_prefix: String,
    #[serde(default)]
    pub latency: u32,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub folders: Vec<Value>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub routes: Vec<Route>,
    #[serde(default, deserialize_with = "null_to_default")]
    pub root_children: Vec<RootChild>,
    #[serde(default)]
    pub proxy_mode: bool,
    #[serde(default)]
    pub proxy_host: String,
    #[serde(default)]
    pub proxy_remove_prefix: bool,
    #[serde(default)]
    pub tls_options: TlsOptions,
    #[serde(default)]
    pub cors: bool,
    #[serde(default)]
    pub headers: Vec<Header>,
    #[serde(default)]
    pub proxy_req_headers: Vec<Header>,
    #[serde(default)]
    pub proxy_res_headers: Vec<Header>,
    #[serde(default)]
    pub data: Vec<Value>,
    #[serde(default)]
    pub callbacks: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Environment {
    /// Fresh environment skeleton used when no document exists yet.
    pub fn skeleton() -> Self {
        Self {
            uuid: new_uuid(),
            last_migration: default_migration(),
            name: "Converted HAR".to_string(),
            endpoint_prefix: String::new(),
            latency: 0,
            port: default_port(),
            hostname: String::new(),
            folders: Vec::new(),
            routes: Vec::new(),
            root_children: Vec::new(),
            proxy_mode: false,
            proxy_host: String::new(),
            proxy_remove_prefix: false,
            tls_options: TlsOptions::default(),
            cors: true,
            headers: vec![Header::new("Content-Type", "application/json")],
            proxy_req_headers: Vec::new(),
            proxy_res_headers: Vec::new(),
            data: Vec::new(),
            callbacks: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Load a previously persisted environment document.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the environment as pretty-printed JSON.
    ///
    /// The single terminal write is the run's only durable commit point; the
    /// parent directory is created if absent.
    pub fn to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_defaults() {
        let env = Environment::skeleton();
        assert_eq!(env.last_migration, 33);
        assert_eq!(env.name, "Converted HAR");
        assert_eq!(env.port, 3000);
        assert!(env.cors);
        assert!(env.routes.is_empty());
        assert!(env.root_children.is_empty());
        assert_eq!(env.headers, vec![Header::new("Content-Type", "application/json")]);
        assert_eq!(env.tls_options.kind, "CERT");
        assert!(!env.tls_options.enabled);
    }

    #[test]
    fn test_unrelated_fields_round_trip() {
        let doc = serde_json::json!({
            "uuid": "env-1",
            "routes": [],
            "rootChildren": [],
            "customTopLevel": {"nested": true},
            "anotherField": 42
        });
        let env: Environment = serde_json::from_value(doc).unwrap();
        let back = serde_json::to_value(&env).unwrap();
        assert_eq!(back["customTopLevel"], serde_json::json!({"nested": true}));
        assert_eq!(back["anotherField"], 42);
    }

    #[test]
    fn test_null_collections_deserialize_as_empty() {
        let doc = serde_json::json!({
            "routes": [{
                "method": "get",
                "endpoint": "items",
                "responses": [{
                    "body": "{}",
                    "statusCode": 200,
                    "rules": null,
                    "rulesOperator": null
                }]
            }],
            "rootChildren": []
        });
        let env: Environment = serde_json::from_value(doc).unwrap();
        assert!(env.routes[0].responses[0].rules.is_empty());
        assert_eq!(
            env.routes[0].responses[0].rules_operator,
            RulesCombinator::And
        );

        let doc = serde_json::json!({"routes": null, "rootChildren": []});
        let env: Environment = serde_json::from_value(doc).unwrap();
        assert!(env.routes.is_empty());
    }

    #[test]
    fn test_route_strips_leading_slash() {
        let response = RouteResponse::captured(
            200,
            "200 /items".to_string(),
            "{}".to_string(),
            Vec::new(),
            RuleSet::default(),
        );
        let route = Route::new("get", "/items", response);
        assert_eq!(route.endpoint, "items");
        assert_eq!(route.kind, "http");
        assert_eq!(route.response_mode, Some(ResponseMode::Rules));
    }

    #[test]
    fn test_response_serde_field_names() {
        let response = RouteResponse::captured(
            200,
            "label".to_string(),
            "body".to_string(),
            Vec::new(),
            RuleSet::default(),
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["bodyType"], "INLINE");
        assert_eq!(json["databucketID"], "");
        assert_eq!(json["rulesOperator"], "AND");
        assert_eq!(json["fallbackTo404"], false);
        assert_eq!(json["crudKey"], "id");
        assert_eq!(json["default"], false);
    }

    #[test]
    fn test_file_round_trip_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output/mockoon.json");

        let mut env = Environment::skeleton();
        env.extra
            .insert("keptField".to_string(), serde_json::json!("kept"));
        env.to_file(&path).unwrap();

        let loaded = Environment::from_file(&path).unwrap();
        assert_eq!(loaded.uuid, env.uuid);
        assert_eq!(loaded.name, "Converted HAR");
        assert_eq!(loaded.extra["keptField"], "kept");
    }

    #[test]
    fn test_response_mode_wire_names() {
        assert_eq!(
            serde_json::to_string(&ResponseMode::Rules).unwrap(),
            "\"RULES\""
        );
        assert_eq!(
            serde_json::to_string(&ResponseMode::DisableRules).unwrap(),
            "\"DISABLE_RULES\""
        );
    }
}
