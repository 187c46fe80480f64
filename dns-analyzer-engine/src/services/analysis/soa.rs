//! Start-of-Authority timing checks.

use log::debug;

use crate::services::resolver::DnsResolver;
use crate::types::{RecordType, Verdict};

/// SOA payload split into its seven positional fields, kept as text so that
/// non-numeric values can still be reported back verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SoaFields<'a> {
    pub primary: &'a str,
    pub hostmaster: &'a str,
    pub serial: &'a str,
    pub refresh: &'a str,
    pub retry: &'a str,
    pub expire: &'a str,
    pub minimum: &'a str,
}

impl<'a> SoaFields<'a> {
    /// `None` when the payload has fewer than seven whitespace-separated fields.
    pub fn parse(data: &'a str) -> Option<Self> {
        let mut parts = data.split_whitespace();
        Some(Self {
            primary: parts.next()?,
            hostmaster: parts.next()?,
            serial: parts.next()?,
            refresh: parts.next()?,
            retry: parts.next()?,
            expire: parts.next()?,
            minimum: parts.next()?,
        })
    }

    fn details(&self) -> Vec<String> {
        vec![
            format!("Primary nameserver: {}", self.primary),
            format!("Hostmaster E-mail: {}", self.hostmaster),
            format!("Serial #: {}", self.serial),
            format!("Refresh: {}", self.refresh),
            format!("Retry: {}", self.retry),
            format!("Expire: {}", self.expire),
            format!("Default TTL: {}", self.minimum),
        ]
    }
}

/// Inclusive bounds in seconds for SOA timers.
pub const REFRESH_BOUNDS: (i64, Option<i64>) = (3600, Some(86400));
pub const RETRY_BOUNDS: (i64, Option<i64>) = (600, Some(7200));
pub const EXPIRE_BOUNDS: (i64, Option<i64>) = (604_800, None);
pub const MINIMUM_TTL_BOUNDS: (i64, Option<i64>) = (300, Some(10800));

/// Whether `raw` parses as an integer inside `[min, max]` (no upper bound when
/// `max` is `None`). Non-numeric input is never within bounds.
pub fn within_bounds(raw: &str, (min, max): (i64, Option<i64>)) -> bool {
    raw.parse::<i64>()
        .is_ok_and(|value| value >= min && max.is_none_or(|max| value <= max))
}

/// SOA category: record dump plus refresh/retry/expire/minimum checks.
///
/// A payload with fewer than seven fields produces no verdicts at all.
pub async fn analyze_soa(resolver: &dyn DnsResolver, domain: &str) -> Vec<Verdict> {
    let records = match resolver.query(domain, RecordType::Soa).await {
        Ok(records) => records,
        Err(e) => {
            return vec![Verdict::error(
                "SOA Lookup",
                format!("Failed to query SOA record: {e}"),
            )];
        }
    };

    let Some(soa) = records.first() else {
        return vec![Verdict::error(
            "SOA Record",
            "No SOA record found for this domain",
        )];
    };

    let Some(fields) = SoaFields::parse(&soa.data) else {
        debug!("[SOA] {domain}: unparseable payload {:?}", soa.data);
        return Vec::new();
    };

    let check = |title: &str, raw: &str, bounds, pass_msg: String, warn_msg: String| {
        if within_bounds(raw, bounds) {
            Verdict::pass(title, pass_msg)
        } else {
            Verdict::warn(title, warn_msg)
        }
    };

    vec![
        Verdict::info("SOA record", "Start of Authority record details")
            .with_details(fields.details()),
        check(
            "SOA REFRESH",
            fields.refresh,
            REFRESH_BOUNDS,
            format!("OK. Your SOA REFRESH interval is: {}. That is OK", fields.refresh),
            format!(
                "Warning. Your SOA REFRESH interval is: {}. Consider a value between 1-24 hours.",
                fields.refresh
            ),
        ),
        check(
            "SOA RETRY",
            fields.retry,
            RETRY_BOUNDS,
            format!("Your SOA RETRY value is: {}. Looks ok", fields.retry),
            format!(
                "Warning. Your SOA RETRY value is: {}. Consider a value between 10 minutes and 2 hours.",
                fields.retry
            ),
        ),
        check(
            "SOA EXPIRE",
            fields.expire,
            EXPIRE_BOUNDS,
            format!("Your SOA EXPIRE number is: {}. Looks ok", fields.expire),
            format!(
                "Warning. Your SOA EXPIRE value is: {}. Should be at least 1 week (604800).",
                fields.expire
            ),
        ),
        check(
            "SOA MINIMUM TTL",
            fields.minimum,
            MINIMUM_TTL_BOUNDS,
            format!(
                "Your SOA MINIMUM TTL is: {}. This value is used for negative caching. Your value is OK.",
                fields.minimum
            ),
            format!(
                "Warning. Your SOA MINIMUM TTL is: {}. RFC2308 recommends 5 minutes to 3 hours.",
                fields.minimum
            ),
        ),
    ]
}
