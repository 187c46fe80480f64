//! Public types returned by analysis and WHOIS operations.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// DNS record type requested from the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RecordType {
    /// IPv4 address record.
    A,
    /// IPv6 address record.
    Aaaa,
    /// Canonical name (alias) record.
    Cname,
    /// Mail exchange record.
    Mx,
    /// Name server record.
    Ns,
    /// Start of authority record.
    Soa,
    /// Text record.
    Txt,
}

impl RecordType {
    /// Numeric RR type code (RFC 1035 / RFC 3596).
    pub const fn code(self) -> u16 {
        match self {
            Self::A => 1,
            Self::Ns => 2,
            Self::Cname => 5,
            Self::Soa => 6,
            Self::Mx => 15,
            Self::Txt => 16,
            Self::Aaaa => 28,
        }
    }

    /// Map a numeric RR type code back to a known type.
    pub const fn from_code(code: u16) -> Option<Self> {
        match code {
            1 => Some(Self::A),
            2 => Some(Self::Ns),
            5 => Some(Self::Cname),
            6 => Some(Self::Soa),
            15 => Some(Self::Mx),
            16 => Some(Self::Txt),
            28 => Some(Self::Aaaa),
            _ => None,
        }
    }

    /// Mnemonic for a numeric RR type code; unknown codes render as the number.
    pub fn mnemonic(code: u16) -> String {
        Self::from_code(code).map_or_else(|| code.to_string(), |t| t.to_string())
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::A => write!(f, "A"),
            Self::Aaaa => write!(f, "AAAA"),
            Self::Cname => write!(f, "CNAME"),
            Self::Mx => write!(f, "MX"),
            Self::Ns => write!(f, "NS"),
            Self::Soa => write!(f, "SOA"),
            Self::Txt => write!(f, "TXT"),
        }
    }
}

/// A single answer returned by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Owner name as reported by the resolver.
    pub name: String,
    /// Record type mnemonic (e.g. `"A"`, `"MX"`).
    #[serde(rename = "type")]
    pub record_type: String,
    /// Type-specific payload: an address, a hostname, `"10 mx.example.com."`,
    /// or the space-separated SOA tuple.
    pub data: String,
    /// Cache lifetime in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

impl Record {
    pub fn is_type(&self, record_type: RecordType) -> bool {
        self.record_type.eq_ignore_ascii_case(&record_type.to_string())
    }

    /// `"<data>   [TTL=<ttl>]"`, the line format used in record dumps.
    pub fn detail_line(&self) -> String {
        match self.ttl {
            Some(ttl) => format!("{}   [TTL={ttl}]", self.data),
            None => self.data.clone(),
        }
    }
}

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerdictStatus {
    Pass,
    Warn,
    Error,
    Info,
}

impl fmt::Display for VerdictStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
            Self::Info => write!(f, "info"),
        }
    }
}

/// One evaluated check within a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: VerdictStatus,
    /// Short label, e.g. `"SOA REFRESH"`.
    pub title: String,
    /// Human-readable explanation.
    pub message: String,
    /// Supporting lines (record dumps, resolution chains).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

impl Verdict {
    pub fn new(status: VerdictStatus, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            title: title.into(),
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn pass(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(VerdictStatus::Pass, title, message)
    }

    pub fn warn(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(VerdictStatus::Warn, title, message)
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(VerdictStatus::Error, title, message)
    }

    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(VerdictStatus::Info, title, message)
    }

    #[must_use]
    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }
}

/// Analysis category. Ordering follows declaration order, which is also the
/// order categories appear in a [`CategoryReport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    /// Delegation as seen from the parent zone.
    Parent,
    /// The domain's own nameserver set.
    #[serde(rename = "NS")]
    Ns,
    /// Start-of-Authority timing parameters.
    #[serde(rename = "SOA")]
    Soa,
    /// Mail exchange configuration.
    #[serde(rename = "MX")]
    Mx,
    /// `www.` subdomain resolution.
    #[serde(rename = "WWW")]
    Www,
}

impl Category {
    pub const ALL: [Self; 5] = [Self::Parent, Self::Ns, Self::Soa, Self::Mx, Self::Www];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parent => write!(f, "Parent"),
            Self::Ns => write!(f, "NS"),
            Self::Soa => write!(f, "SOA"),
            Self::Mx => write!(f, "MX"),
            Self::Www => write!(f, "WWW"),
        }
    }
}

/// Verdicts keyed by category, iterated in category declaration order.
///
/// Categories without verdicts are never stored: a missing category and an
/// empty one mean the same thing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryReport(BTreeMap<Category, Vec<Verdict>>);

impl CategoryReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the verdicts for `category`. Empty lists are dropped.
    pub fn insert(&mut self, category: Category, verdicts: Vec<Verdict>) {
        if verdicts.is_empty() {
            self.0.remove(&category);
        } else {
            self.0.insert(category, verdicts);
        }
    }

    /// Verdicts for `category`; empty when the category was omitted.
    pub fn get(&self, category: Category) -> &[Verdict] {
        self.0.get(&category).map_or(&[], Vec::as_slice)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(&category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &[Verdict])> {
        self.0.iter().map(|(c, v)| (*c, v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Result of a full domain analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    /// The analysed domain.
    pub domain: String,
    /// Per-category verdicts.
    pub categories: CategoryReport,
    /// Wall-clock time for all five categories, in milliseconds.
    pub duration_ms: u64,
    /// When the analysis finished.
    pub checked_at: DateTime<Utc>,
}

/// Where a [`WhoisRecord`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WhoisSource {
    /// Structured JSON WHOIS API.
    Api,
    /// Registry WHOIS web page.
    Scrape,
    /// Local `whois` command output.
    Command,
    /// Synthetic record used when every source failed.
    Placeholder,
}

impl fmt::Display for WhoisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => write!(f, "api"),
            Self::Scrape => write!(f, "scrape"),
            Self::Command => write!(f, "command"),
            Self::Placeholder => write!(f, "placeholder"),
        }
    }
}

/// Sentinel for unknown registrar and dates.
pub const UNKNOWN: &str = "Unknown";
/// Sentinel for a contact without a published name.
pub const PRIVACY_PROTECTED: &str = "Privacy Protected";

/// Registrant, administrative or technical contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhoisContact {
    pub name: String,
    pub organization: String,
    pub country: String,
    pub email: String,
}

impl Default for WhoisContact {
    fn default() -> Self {
        Self {
            name: PRIVACY_PROTECTED.to_string(),
            organization: String::new(),
            country: String::new(),
            email: String::new(),
        }
    }
}

/// Normalised registration data. Every field is always populated; absent
/// upstream values show up as [`UNKNOWN`], [`PRIVACY_PROTECTED`] or empty lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoisRecord {
    /// The queried domain name.
    pub domain: String,
    pub registrar: String,
    pub registration_date: String,
    pub expiration_date: String,
    /// Authoritative name servers, deduplicated, in upstream order.
    pub nameservers: Vec<String>,
    /// EPP status lines, deduplicated, in upstream order.
    pub status: Vec<String>,
    pub registrant: WhoisContact,
    pub admin: WhoisContact,
    pub tech: WhoisContact,
    pub source: WhoisSource,
    /// Upstream text or JSON the record was built from.
    pub raw_output: String,
}

impl WhoisRecord {
    /// An all-sentinel record for `domain`.
    pub fn empty(domain: &str, source: WhoisSource) -> Self {
        Self {
            domain: domain.to_string(),
            registrar: UNKNOWN.to_string(),
            registration_date: UNKNOWN.to_string(),
            expiration_date: UNKNOWN.to_string(),
            nameservers: Vec::new(),
            status: Vec::new(),
            registrant: WhoisContact::default(),
            admin: WhoisContact::default(),
            tech: WhoisContact::default(),
            source,
            raw_output: String::new(),
        }
    }

    /// Whether anything beyond sentinels was extracted.
    pub fn has_registration_data(&self) -> bool {
        self.registrar != UNKNOWN
            || self.registration_date != UNKNOWN
            || self.expiration_date != UNKNOWN
            || !self.nameservers.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // ==================== RecordType tests ====================

    #[test]
    fn test_record_type_codes() {
        for t in [
            RecordType::A,
            RecordType::Aaaa,
            RecordType::Cname,
            RecordType::Mx,
            RecordType::Ns,
            RecordType::Soa,
            RecordType::Txt,
        ] {
            assert_eq!(RecordType::from_code(t.code()), Some(t));
        }
        assert_eq!(RecordType::mnemonic(15), "MX");
        assert_eq!(RecordType::mnemonic(46), "46");
    }

    // ==================== Record tests ====================

    #[test]
    fn test_record_detail_line() {
        let record = Record {
            name: "example.com".into(),
            record_type: "NS".into(),
            data: "a.iana-servers.net.".into(),
            ttl: Some(86400),
        };
        assert_eq!(record.detail_line(), "a.iana-servers.net.   [TTL=86400]");
        assert!(record.is_type(RecordType::Ns));

        let no_ttl = Record { ttl: None, ..record };
        assert_eq!(no_ttl.detail_line(), "a.iana-servers.net.");
    }

    #[test]
    fn test_record_serializes_type_key() {
        let record = Record {
            name: "example.com".into(),
            record_type: "A".into(),
            data: "93.184.215.14".into(),
            ttl: None,
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["type"], "A");
        assert!(json.get("ttl").is_none());
    }

    // ==================== Verdict tests ====================

    #[test]
    fn test_verdict_serialization() {
        let v = Verdict::warn("SOA RETRY", "too short");
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["status"], "warn");
        assert!(json.get("details").is_none());

        let v = Verdict::info("MX Records", "found").with_details(vec!["10 mx.".into()]);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["status"], "info");
        assert_eq!(json["details"][0], "10 mx.");
    }

    // ==================== CategoryReport tests ====================

    #[test]
    fn test_category_report_orders_by_declaration() {
        let mut report = CategoryReport::new();
        report.insert(Category::Www, vec![Verdict::pass("w", "w")]);
        report.insert(Category::Parent, vec![Verdict::pass("p", "p")]);
        report.insert(Category::Mx, vec![Verdict::pass("m", "m")]);
        let order: Vec<_> = report.iter().map(|(c, _)| c).collect();
        assert_eq!(order, vec![Category::Parent, Category::Mx, Category::Www]);
    }

    #[test]
    fn test_category_report_omits_empty() {
        let mut report = CategoryReport::new();
        report.insert(Category::Soa, Vec::new());
        assert!(!report.contains(Category::Soa));
        assert!(report.get(Category::Soa).is_empty());
        assert!(report.is_empty());
    }

    #[test]
    fn test_category_report_json_keys() {
        let mut report = CategoryReport::new();
        report.insert(Category::Ns, vec![Verdict::pass("a", "b")]);
        report.insert(Category::Parent, vec![Verdict::pass("a", "b")]);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.starts_with("{\"Parent\":"));
        assert!(json.contains("\"NS\":"));
    }

    // ==================== WhoisRecord tests ====================

    #[test]
    fn test_whois_record_empty_is_total() {
        let record = WhoisRecord::empty("example.com", WhoisSource::Api);
        assert_eq!(record.registrar, UNKNOWN);
        assert_eq!(record.registration_date, UNKNOWN);
        assert_eq!(record.expiration_date, UNKNOWN);
        assert_eq!(record.registrant.name, PRIVACY_PROTECTED);
        assert_eq!(record.tech.name, PRIVACY_PROTECTED);
        assert!(!record.has_registration_data());
    }

    #[test]
    fn test_whois_record_json_shape() {
        let record = WhoisRecord::empty("example.com", WhoisSource::Placeholder);
        let json = serde_json::to_value(&record).unwrap();
        for key in [
            "domain",
            "registrar",
            "registrationDate",
            "expirationDate",
            "nameservers",
            "status",
            "registrant",
            "admin",
            "tech",
            "source",
            "rawOutput",
        ] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["source"], "placeholder");
        assert_eq!(json["admin"]["name"], PRIVACY_PROTECTED);
    }
}
