//! Service façade tying the resolver, the analyzers and the WHOIS chain
//! together.

pub mod analysis;
pub mod resolver;
pub mod whois;

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::types::{AnalysisReport, WhoisRecord};

use self::resolver::{DnsResolver, DohResolver};
use self::whois::WhoisClient;

const MAX_DOMAIN_LENGTH: usize = 253;

/// Validate and normalise a domain name for analysis.
///
/// Trims surrounding whitespace and a trailing root dot, converts
/// internationalised labels to Punycode via IDNA 2008 (which also rejects
/// labels with invalid characters), and rejects empty or overlong inputs.
fn validate_domain(domain: &str) -> EngineResult<String> {
    let domain = domain.trim();
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    if domain.is_empty() {
        return Err(EngineError::ValidationError(
            "Domain name is required".to_string(),
        ));
    }
    let ascii_domain = idna::domain_to_ascii_strict(domain)
        .map_err(|_| EngineError::ValidationError(format!("Invalid domain name: {domain}")))?;
    if ascii_domain.len() > MAX_DOMAIN_LENGTH {
        return Err(EngineError::ValidationError(format!(
            "Domain name exceeds maximum length of {MAX_DOMAIN_LENGTH} characters (got {})",
            ascii_domain.len()
        )));
    }
    Ok(ascii_domain)
}

/// Entry point for domain analysis and WHOIS lookups.
///
/// ```rust,no_run
/// use dns_analyzer_engine::{DiagnosticService, EngineConfig};
/// # async fn demo() -> dns_analyzer_engine::EngineResult<()> {
/// let service = DiagnosticService::new(&EngineConfig::default())?;
/// let report = service.analyze("example.com").await?;
/// let whois = service.whois("example.com").await?;
/// # Ok(())
/// # }
/// ```
pub struct DiagnosticService {
    resolver: Arc<dyn DnsResolver>,
    whois: WhoisClient,
}

impl DiagnosticService {
    /// Build the DNS-over-HTTPS resolver and WHOIS chain from `config`.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let resolver = DohResolver::new(&config.doh_endpoint, config.doh_timeout())?;
        Ok(Self::with_parts(
            Arc::new(resolver),
            WhoisClient::from_config(&config.whois),
        ))
    }

    pub fn with_parts(resolver: Arc<dyn DnsResolver>, whois: WhoisClient) -> Self {
        Self { resolver, whois }
    }

    /// Run the five category analyzers against `domain`.
    ///
    /// Only input validation can fail; DNS failures become `error` verdicts
    /// inside the report.
    pub async fn analyze(&self, domain: &str) -> EngineResult<AnalysisReport> {
        let domain = validate_domain(domain)?;
        Ok(analysis::run_analysis(Arc::clone(&self.resolver), &domain).await)
    }

    /// Look up registration data, falling back to placeholder data when no
    /// source answers.
    pub async fn whois(&self, domain: &str) -> EngineResult<WhoisRecord> {
        self.whois.lookup(domain).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::validate_domain;
    use crate::error::EngineError;

    #[test]
    fn test_validate_domain_normal() {
        assert_eq!(validate_domain("example.com").unwrap(), "example.com");
    }

    #[test]
    fn test_validate_domain_lowercases_and_strips_root() {
        assert_eq!(validate_domain("Example.COM.").unwrap(), "example.com");
    }

    #[test]
    fn test_validate_domain_idn() {
        assert_eq!(validate_domain("münchen.de").unwrap(), "xn--mnchen-3ya.de");
        assert_eq!(validate_domain("MÜNCHEN.de").unwrap(), "xn--mnchen-3ya.de");
    }

    #[test]
    fn test_validate_domain_invalid_characters() {
        assert!(matches!(
            validate_domain("bad!!!domain.com"),
            Err(EngineError::ValidationError(_))
        ));
        assert!(matches!(
            validate_domain("not a valid domain!!!"),
            Err(EngineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_trims_whitespace() {
        assert_eq!(validate_domain("  example.com  ").unwrap(), "example.com");
    }

    #[test]
    fn test_validate_domain_empty() {
        assert!(matches!(
            validate_domain(""),
            Err(EngineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_whitespace_only() {
        assert!(matches!(
            validate_domain("   "),
            Err(EngineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_inner_whitespace() {
        assert!(matches!(
            validate_domain("not a domain"),
            Err(EngineError::ValidationError(_))
        ));
    }

    #[test]
    fn test_validate_domain_too_long() {
        let label = "a".repeat(63);
        let long = format!("{label}.{label}.{label}.{}", "b".repeat(62));
        assert_eq!(long.len(), 254);
        assert!(matches!(
            validate_domain(&long),
            Err(EngineError::ValidationError(_))
        ));
        let fits = format!("{label}.{label}.{label}.{}", "b".repeat(61));
        assert_eq!(validate_domain(&fits).unwrap().len(), 253);
    }
}
