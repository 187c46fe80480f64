//! Delegation checks against the parent zone.

use crate::services::resolver::DnsResolver;
use crate::types::{RecordType, Verdict};

use super::{host_resolves, parent_domain, record_details};

/// Minimum nameserver count for redundancy (RFC 2182 section 5).
const MIN_NAMESERVERS: usize = 2;

/// Parent category: NS delegation of the registrable parent, redundancy and
/// glue-style A record presence for every listed nameserver.
///
/// The per-nameserver A lookups run sequentially and stop at the first
/// nameserver that does not resolve.
pub async fn analyze_parent(resolver: &dyn DnsResolver, domain: &str) -> Vec<Verdict> {
    let parent = parent_domain(domain);
    let records = match resolver.query(parent, RecordType::Ns).await {
        Ok(records) => records,
        Err(e) => {
            return vec![Verdict::error(
                "Parent NS Lookup",
                format!("Failed to query parent nameservers: {e}"),
            )];
        }
    };

    if records.is_empty() {
        return vec![Verdict::error(
            "Domain NS records",
            "No nameserver records found from parent servers",
        )];
    }

    let mut verdicts = vec![
        Verdict::info(
            "Domain NS records",
            "Nameserver records returned by the parent servers",
        )
        .with_details(record_details(&records)),
        Verdict::pass(
            "Your nameservers are listed",
            "Good. The parent server has your nameservers listed. This is a must if you want to be found.",
        ),
    ];

    if records.len() >= MIN_NAMESERVERS {
        verdicts.push(Verdict::pass(
            "Multiple Nameservers",
            format!(
                "Good. You have {} nameservers. According to RFC2182 section 5 you should have at least 2 nameservers.",
                records.len()
            ),
        ));
    } else {
        verdicts.push(Verdict::warn(
            "Multiple Nameservers",
            "Warning. You should have at least 2 nameservers for redundancy.",
        ));
    }

    let mut all_resolve = true;
    for ns in &records {
        if !host_resolves(resolver, &ns.data).await {
            all_resolve = false;
            break;
        }
    }

    verdicts.push(if all_resolve {
        Verdict::pass(
            "Nameservers A records",
            "Good. Every nameserver listed has A records. This is a must if you want to be found.",
        )
    } else {
        Verdict::error(
            "Nameservers A records",
            "Error. Some nameservers do not have A records.",
        )
    });

    verdicts
}
