//! JSON WHOIS API strategy.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{Map, Value};
use url::Url;

use crate::error::{EngineError, EngineResult};
use crate::types::{PRIVACY_PROTECTED, UNKNOWN, WhoisContact, WhoisRecord, WhoisSource};

use super::{USER_AGENT, WhoisStrategy};

/// Queries a JSON WHOIS API (`GET <api_url>?domain=<domain>`).
pub struct ApiStrategy {
    url: String,
    token: Option<String>,
    client: Client,
}

impl ApiStrategy {
    pub fn new(url: impl Into<String>, token: Option<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            url: url.into(),
            token,
            client,
        }
    }
}

#[async_trait]
impl WhoisStrategy for ApiStrategy {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn attempt(&self, domain: &str) -> EngineResult<WhoisRecord> {
        let url = Url::parse_with_params(&self.url, &[("domain", domain)])
            .map_err(|e| EngineError::ValidationError(format!("Invalid WHOIS API URL: {e}")))?;
        debug!("[WHOIS:api] GET {url}");

        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.header(reqwest::header::AUTHORIZATION, format!("Token={token}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| EngineError::from_reqwest(&e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus(status.as_u16()));
        }
        let body = response
            .text()
            .await
            .map_err(|e| EngineError::from_reqwest(&e))?;

        parse_api_response(domain, &body)
    }
}

/// Trimmed, non-empty string value. Any other JSON type counts as absent.
fn text(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// First key in `keys` holding a usable string.
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| text(map.get(*key)))
}

/// `registrar` is either a plain name or an object carrying one.
fn registrar(map: &Map<String, Value>) -> Option<String> {
    match map.get("registrar") {
        Some(Value::Object(detail)) => text(detail.get("name")),
        other => text(other),
    }
}

/// A single string or a list of strings/objects with a `name`, deduplicated.
fn string_list(value: Option<&Value>) -> Vec<String> {
    let items: Vec<Option<String>> = match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::Object(entry) => text(entry.get("name")),
                other => text(Some(other)),
            })
            .collect(),
        other => vec![text(other)],
    };
    let mut out: Vec<String> = Vec::new();
    for item in items.into_iter().flatten() {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

/// Contact block for `role`: a nested object (`registrant: {name, ...}`), or
/// flat keys (`registrant_name`, ...) when the nested field is missing.
fn contact(map: &Map<String, Value>, role: &str) -> WhoisContact {
    let nested = map.get(role).and_then(Value::as_object);
    let field = |name: &str| {
        nested
            .and_then(|n| text(n.get(name)))
            .or_else(|| text(map.get(&format!("{role}_{name}"))))
    };
    WhoisContact {
        name: field("name").unwrap_or_else(|| PRIVACY_PROTECTED.to_string()),
        organization: field("organization").unwrap_or_default(),
        country: field("country").unwrap_or_default(),
        email: field("email").unwrap_or_default(),
    }
}

/// Map an API body onto a total record.
///
/// Only a body that is not a JSON object is an error. A field that is missing
/// or carries an unexpected type takes its sentinel.
pub fn parse_api_response(domain: &str, body: &str) -> EngineResult<WhoisRecord> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| EngineError::ParseError(format!("Invalid WHOIS API response: {e}")))?;
    let Value::Object(map) = value else {
        return Err(EngineError::ParseError(
            "Invalid WHOIS API response: expected a JSON object".to_string(),
        ));
    };

    Ok(WhoisRecord {
        domain: domain.to_string(),
        registrar: registrar(&map).unwrap_or_else(|| UNKNOWN.to_string()),
        registration_date: first_text(&map, &["created_date", "created", "creation_date"])
            .unwrap_or_else(|| UNKNOWN.to_string()),
        expiration_date: first_text(&map, &["expires_date", "expires", "expiration_date"])
            .unwrap_or_else(|| UNKNOWN.to_string()),
        nameservers: string_list(map.get("nameservers")),
        status: string_list(map.get("status")),
        registrant: contact(&map, "registrant"),
        admin: contact(&map, "admin"),
        tech: contact(&map, "tech"),
        source: WhoisSource::Api,
        raw_output: body.to_string(),
    })
}
