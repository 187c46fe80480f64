//! WHOIS lookup: an ordered chain of strategies with a placeholder fallback.

mod api;
mod command;
mod parse;
mod scrape;

use std::sync::LazyLock;

use async_trait::async_trait;
use log::{debug, info, warn};
use regex::Regex;

use crate::config::{WhoisConfig, WhoisStrategyKind};
use crate::error::{EngineError, EngineResult};
use crate::types::{WhoisContact, WhoisRecord, WhoisSource};

pub use api::{ApiStrategy, parse_api_response};
pub use command::CommandStrategy;
pub use parse::parse_whois_text;
pub use scrape::{ScrapeStrategy, extract_whois_block};

pub(crate) const USER_AGENT: &str = "Mozilla/5.0 (compatible; WHOIS-Lookup/1.0)";

/// One source of registration data.
///
/// An `Err` (or a record without registration data) hands the lookup to the
/// next strategy in the chain.
#[async_trait]
pub trait WhoisStrategy: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    async fn attempt(&self, domain: &str) -> EngineResult<WhoisRecord>;
}

static DOMAIN_FORMAT: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").ok());

/// Validate a WHOIS lookup domain, returning it trimmed.
pub fn validate_whois_domain(domain: &str) -> EngineResult<String> {
    let domain = domain.trim();
    if domain.is_empty() {
        return Err(EngineError::ValidationError(
            "Domain parameter is required".to_string(),
        ));
    }
    let valid = DOMAIN_FORMAT
        .as_ref()
        .is_some_and(|re| re.is_match(domain));
    if !valid {
        return Err(EngineError::ValidationError(format!(
            "Invalid domain format: {domain}"
        )));
    }
    Ok(domain.to_string())
}

/// Tries each strategy in order; the first record carrying registration data
/// wins.
pub struct WhoisClient {
    strategies: Vec<Box<dyn WhoisStrategy>>,
}

impl WhoisClient {
    pub fn new(strategies: Vec<Box<dyn WhoisStrategy>>) -> Self {
        Self { strategies }
    }

    /// Build the chain in the configured order.
    pub fn from_config(config: &WhoisConfig) -> Self {
        let strategies = config
            .strategies
            .iter()
            .map(|kind| -> Box<dyn WhoisStrategy> {
                match kind {
                    WhoisStrategyKind::Api => Box::new(ApiStrategy::new(
                        config.api_url.clone(),
                        config.api_token.clone(),
                        config.http_timeout(),
                    )),
                    WhoisStrategyKind::Scrape => Box::new(ScrapeStrategy::new(
                        config.scrape_url.clone(),
                        config.http_timeout(),
                    )),
                    WhoisStrategyKind::Command => Box::new(CommandStrategy::new(
                        config.command.clone(),
                        config.command_timeout(),
                    )),
                }
            })
            .collect();
        Self::new(strategies)
    }

    /// Strategy names in chain order.
    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Validate `domain`, then run the chain.
    ///
    /// Only validation can fail; once the domain is accepted a record is
    /// always returned.
    pub async fn lookup(&self, domain: &str) -> EngineResult<WhoisRecord> {
        let domain = validate_whois_domain(domain)?;
        Ok(self.resolve(&domain).await)
    }

    /// Run the chain for an already validated domain.
    pub async fn resolve(&self, domain: &str) -> WhoisRecord {
        for strategy in &self.strategies {
            match strategy.attempt(domain).await {
                Ok(record) if record.has_registration_data() => {
                    info!("[WHOIS] {domain}: answered by {}", strategy.name());
                    return record;
                }
                Ok(_) => {
                    debug!("[WHOIS] {domain}: {} returned no registration data", strategy.name());
                }
                Err(e) => {
                    warn!("[WHOIS] {domain}: {} failed: {e}", strategy.name());
                }
            }
        }
        warn!("[WHOIS] {domain}: all strategies failed, returning placeholder data");
        placeholder_record(domain)
    }
}

/// Clearly labelled demo record returned when every strategy fails.
pub fn placeholder_record(domain: &str) -> WhoisRecord {
    let contact = WhoisContact {
        organization: "Privacy Service".to_string(),
        country: "US".to_string(),
        email: "privacy@example.com".to_string(),
        ..WhoisContact::default()
    };
    let upper = domain.to_uppercase();
    let raw_output = format!(
        "Domain Name: {upper}\n\
         Registrar: Example Registrar Inc.\n\
         Creation Date: 2020-01-01T00:00:00Z\n\
         Registry Expiry Date: 2025-01-01T00:00:00Z\n\
         Name Server: NS1.EXAMPLE.COM\n\
         Name Server: NS2.EXAMPLE.COM\n\
         Domain Status: clientTransferProhibited\n\
         \n\
         Note: This is demo data. Real WHOIS data was unavailable."
    );

    WhoisRecord {
        domain: domain.to_string(),
        registrar: "Example Registrar Inc.".to_string(),
        registration_date: "2020-01-01T00:00:00Z".to_string(),
        expiration_date: "2025-01-01T00:00:00Z".to_string(),
        nameservers: vec!["ns1.example.com".to_string(), "ns2.example.com".to_string()],
        status: vec!["clientTransferProhibited".to_string()],
        registrant: contact.clone(),
        admin: contact.clone(),
        tech: contact,
        source: WhoisSource::Placeholder,
        raw_output,
    }
}
