//! Engine configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! yields a working configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default DNS-over-HTTPS JSON endpoint.
pub const DEFAULT_DOH_ENDPOINT: &str = "https://cloudflare-dns.com/dns-query";
/// Default JSON WHOIS API.
pub const DEFAULT_WHOIS_API_URL: &str = "https://whoisjson.com/api/v1/whois";
/// Default registry WHOIS page, `{domain}` is substituted.
pub const DEFAULT_WHOIS_SCRAPE_URL: &str = "https://www.whois.com/whois/{domain}";

const DEFAULT_DOH_TIMEOUT_SECS: u64 = 5;
const DEFAULT_WHOIS_HTTP_TIMEOUT_SECS: u64 = 8;
const DEFAULT_WHOIS_COMMAND_TIMEOUT_SECS: u64 = 10;

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// DNS-over-HTTPS endpoint answering `application/dns-json` queries.
    pub doh_endpoint: String,
    /// Per-query bound for DNS-over-HTTPS calls.
    pub doh_timeout_secs: u64,
    pub whois: WhoisConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            doh_endpoint: DEFAULT_DOH_ENDPOINT.to_string(),
            doh_timeout_secs: DEFAULT_DOH_TIMEOUT_SECS,
            whois: WhoisConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn doh_timeout(&self) -> Duration {
        Duration::from_secs(self.doh_timeout_secs)
    }
}

/// A WHOIS source that can take part in the lookup chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhoisStrategyKind {
    /// JSON WHOIS API.
    Api,
    /// Registry web page, parsed from its preformatted block.
    Scrape,
    /// Local lookup command.
    Command,
}

/// WHOIS chain configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WhoisConfig {
    /// Strategies in the order they are tried.
    pub strategies: Vec<WhoisStrategyKind>,
    pub api_url: String,
    /// Sent as `Authorization: Token=<token>` when set.
    pub api_token: Option<String>,
    /// Page URL template with a `{domain}` placeholder.
    pub scrape_url: String,
    /// Lookup command, invoked as `<command> <domain>`.
    pub command: String,
    pub http_timeout_secs: u64,
    pub command_timeout_secs: u64,
}

impl Default for WhoisConfig {
    fn default() -> Self {
        Self {
            strategies: vec![
                WhoisStrategyKind::Api,
                WhoisStrategyKind::Scrape,
                WhoisStrategyKind::Command,
            ],
            api_url: DEFAULT_WHOIS_API_URL.to_string(),
            api_token: None,
            scrape_url: DEFAULT_WHOIS_SCRAPE_URL.to_string(),
            command: "whois".to_string(),
            http_timeout_secs: DEFAULT_WHOIS_HTTP_TIMEOUT_SECS,
            command_timeout_secs: DEFAULT_WHOIS_COMMAND_TIMEOUT_SECS,
        }
    }
}

impl WhoisConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.doh_endpoint, DEFAULT_DOH_ENDPOINT);
        assert_eq!(config.doh_timeout(), Duration::from_secs(5));
        assert_eq!(config.whois.strategies.len(), 3);
        assert_eq!(config.whois.strategies[0], WhoisStrategyKind::Api);
        assert_eq!(config.whois.command_timeout(), Duration::from_secs(10));
        assert!(config.whois.scrape_url.contains("{domain}"));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"doh_timeout_secs": 3, "whois": {"strategies": ["command"]}}"#,
        )
        .unwrap();
        assert_eq!(config.doh_timeout_secs, 3);
        assert_eq!(config.doh_endpoint, DEFAULT_DOH_ENDPOINT);
        assert_eq!(config.whois.strategies, vec![WhoisStrategyKind::Command]);
        assert_eq!(config.whois.command, "whois");
    }
}
