//! Mail exchange checks.

use crate::services::resolver::DnsResolver;
use crate::types::{RecordType, Verdict};

use super::{host_resolves, record_details};

/// MX category: record dump, presence, and target resolution.
///
/// Targets are resolved sequentially and the check stops at the first target
/// without an A record. An unresolvable target is a `warn` here, unlike the
/// `error` the parent delegation check raises for nameservers.
pub async fn analyze_mx(resolver: &dyn DnsResolver, domain: &str) -> Vec<Verdict> {
    let records = match resolver.query(domain, RecordType::Mx).await {
        Ok(records) => records,
        Err(e) => {
            return vec![Verdict::error(
                "MX Lookup",
                format!("Failed to query MX records: {e}"),
            )];
        }
    };

    if records.is_empty() {
        return vec![Verdict::error(
            "MX Records",
            "Oh well, I did not detect any MX records so you probably don't have any mail servers configured.",
        )];
    }

    let mut verdicts = vec![
        Verdict::info(
            "MX Records",
            format!("Found {} mail server(s)", records.len()),
        )
        .with_details(record_details(&records)),
        Verdict::pass(
            "Mail servers configured",
            "Good. Your domain has mail server records configured.",
        ),
    ];

    let mut all_resolve = true;
    for mx in &records {
        if !host_resolves(resolver, mx_target(&mx.data)).await {
            all_resolve = false;
            break;
        }
    }

    verdicts.push(if all_resolve {
        Verdict::pass(
            "MX hosts resolve",
            "Good. All MX records point to hosts that resolve to IP addresses.",
        )
    } else {
        Verdict::warn(
            "MX hosts resolve",
            "Warning. Some MX records may not resolve properly.",
        )
    });

    verdicts
}

/// Exchange host of an MX payload (`"<preference> <host>"`); the whole payload
/// when there is no second token.
pub(crate) fn mx_target(data: &str) -> &str {
    data.split_whitespace().nth(1).unwrap_or(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mx_target() {
        assert_eq!(mx_target("10 mail.example.com."), "mail.example.com.");
        assert_eq!(mx_target("mail.example.com."), "mail.example.com.");
        assert_eq!(mx_target("0  smtp.example.net."), "smtp.example.net.");
    }
}
