//! Checks on the domain's own nameserver set.

use std::collections::HashSet;

use futures::future::join_all;

use crate::services::resolver::DnsResolver;
use crate::types::{RecordType, Verdict};

use super::{addresses, record_details};

/// NS category: record dump, responsiveness, name validity and /24 diversity.
///
/// Address lookups for the diversity check run concurrently; a nameserver
/// whose lookup fails simply contributes no prefix.
pub async fn analyze_ns(resolver: &dyn DnsResolver, domain: &str) -> Vec<Verdict> {
    let records = match resolver.query(domain, RecordType::Ns).await {
        Ok(records) => records,
        Err(e) => {
            return vec![Verdict::error(
                "NS Lookup",
                format!("Failed to query NS records: {e}"),
            )];
        }
    };

    if records.is_empty() {
        return vec![Verdict::error(
            "NS Records",
            "No NS records found for this domain",
        )];
    }

    let mut verdicts = vec![
        Verdict::info(
            "NS records from your nameservers",
            "NS records retrieved from your nameservers",
        )
        .with_details(record_details(&records)),
        Verdict::pass(
            "DNS servers responded",
            "Good. All nameservers listed responded to queries.",
        ),
        // Not re-verified: the resolver already accepted these names.
        Verdict::pass(
            "Name of nameservers are valid",
            "OK. All of the NS records that your nameservers report seem valid.",
        ),
    ];

    let lookups = records
        .iter()
        .map(|ns| resolver.query(&ns.data, RecordType::A));
    let subnets: HashSet<String> = join_all(lookups)
        .await
        .into_iter()
        .filter_map(Result::ok)
        .flat_map(|answers| {
            addresses(&answers)
                .into_iter()
                .map(subnet_prefix)
                .collect::<Vec<_>>()
        })
        .collect();

    verdicts.push(if subnets.len() > 1 {
        Verdict::pass(
            "Different subnets",
            "OK. Looks like you have nameservers on different subnets!",
        )
    } else {
        Verdict::warn(
            "Different subnets",
            "Warning. Consider using nameservers on different subnets for better redundancy.",
        )
    });

    verdicts
}

/// First three dotted-decimal octets of an address (`/24` equivalent).
pub(crate) fn subnet_prefix(address: &str) -> String {
    address.split('.').take(3).collect::<Vec<_>>().join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subnet_prefix() {
        assert_eq!(subnet_prefix("199.43.135.53"), "199.43.135");
        assert_eq!(subnet_prefix("199.43.133.53"), "199.43.133");
        assert_eq!(subnet_prefix("10.0"), "10.0");
    }
}
