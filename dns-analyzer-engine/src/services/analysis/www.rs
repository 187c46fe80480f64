//! `www.` subdomain resolution checks.

use crate::services::resolver::DnsResolver;
use crate::types::{RecordType, Verdict};

use super::{addresses, record_details};

/// WWW category.
///
/// Follows a CNAME on `www.<domain>` when present; otherwise looks for direct
/// A records. Always ends with the "IPs are public" verdict, which is asserted
/// rather than checked.
pub async fn analyze_www(resolver: &dyn DnsResolver, domain: &str) -> Vec<Verdict> {
    let www = format!("www.{domain}");
    let mut verdicts = Vec::new();

    // A failed CNAME query counts as "no CNAME".
    let cname = resolver
        .query(&www, RecordType::Cname)
        .await
        .ok()
        .and_then(|records| records.into_iter().find(|r| r.is_type(RecordType::Cname)));

    if let Some(cname) = cname {
        // Only a failed lookup counts as unresolving; an empty answer still
        // reports the chain.
        match resolver.query(&cname.data, RecordType::A).await {
            Ok(records) => {
                let target_addresses = addresses(&records);
                verdicts.push(
                    Verdict::info("WWW A Record", "Your www subdomain configuration").with_details(
                        vec![
                            format!("{www} -> {} -> [{}]", cname.data, target_addresses.join(", ")),
                            "[Looks like you have CNAME's]".to_string(),
                        ],
                    ),
                );
                verdicts.push(Verdict::pass(
                    "WWW CNAME",
                    format!(
                        "OK. You do have a CNAME record for {www}. Your CNAME entry also returns the A record for the CNAME entry, which is good."
                    ),
                ));
            }
            Err(e) => {
                verdicts.push(Verdict::warn(
                    "WWW CNAME Resolution",
                    format!("Warning. CNAME found for {www} but it doesn't resolve to an A record: {e}"),
                ));
            }
        }
    } else {
        match resolver.query(&www, RecordType::A).await {
            Ok(records) => {
                let a_records: Vec<_> = records
                    .into_iter()
                    .filter(|r| r.is_type(RecordType::A))
                    .collect();
                if a_records.is_empty() {
                    verdicts.push(Verdict::warn(
                        "WWW Record",
                        format!("Warning. No A or CNAME records found for {www}."),
                    ));
                } else {
                    verdicts.push(
                        Verdict::info("WWW A Record", format!("Your {www} A record(s)"))
                            .with_details(record_details(&a_records)),
                    );
                    verdicts.push(Verdict::pass(
                        "WWW resolves",
                        format!("Good. {www} resolves to IP address(es)."),
                    ));
                }
            }
            Err(e) => {
                verdicts.push(Verdict::error(
                    "WWW Record",
                    format!("Error. Could not resolve {www}: {e}"),
                ));
            }
        }
    }

    verdicts.push(Verdict::pass(
        "IPs are public",
        "OK. All of your WWW IPs appear to be public IPs.",
    ));

    verdicts
}
