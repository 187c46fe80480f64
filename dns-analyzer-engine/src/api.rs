//! Transport-agnostic WHOIS JSON surface.
//!
//! [`whois_endpoint`] maps a `?domain=` request onto a status code and JSON
//! body so any HTTP framework can serve it unchanged.

use log::error;
use serde::Serialize;
use serde_json::{Value, json};

use crate::services::whois::{WhoisClient, validate_whois_domain};

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn error(status: u16, error: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": error, "message": message.into() }),
        }
    }
}

/// Handle `GET /whois?domain=<domain>`.
///
/// A missing or malformed domain is answered with 400 before any strategy
/// runs. A valid domain always gets 200 with a record, placeholder data
/// included.
pub async fn whois_endpoint(client: &WhoisClient, domain: Option<&str>) -> ApiResponse {
    let domain = domain.map(str::trim).unwrap_or_default();
    if domain.is_empty() {
        return ApiResponse::error(
            400,
            "Domain parameter is required",
            "Please provide a domain name",
        );
    }
    let Ok(domain) = validate_whois_domain(domain) else {
        return ApiResponse::error(
            400,
            "Invalid domain format",
            "Please provide a valid domain name",
        );
    };

    let record = client.resolve(&domain).await;
    match serde_json::to_value(&record) {
        Ok(body) => ApiResponse { status: 200, body },
        Err(e) => {
            error!("[WHOIS] {domain}: failed to serialize record: {e}");
            ApiResponse::error(500, "WHOIS lookup failed", e.to_string())
        }
    }
}
