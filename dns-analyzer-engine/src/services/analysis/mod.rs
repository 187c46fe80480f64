//! Domain health analysis: five category analyzers and the aggregator that
//! runs them concurrently.

mod mx;
mod ns;
mod parent;
mod soa;
mod www;

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;
use log::{info, warn};

use crate::services::resolver::DnsResolver;
use crate::types::{AnalysisReport, Category, CategoryReport, Record, RecordType, Verdict};

pub use mx::analyze_mx;
pub use ns::analyze_ns;
pub use parent::analyze_parent;
pub use soa::{
    EXPIRE_BOUNDS, MINIMUM_TTL_BOUNDS, REFRESH_BOUNDS, RETRY_BOUNDS, SoaFields, analyze_soa,
    within_bounds,
};
pub use www::analyze_www;

/// Registrable parent: the last two labels, or the input itself when it has
/// fewer than two labels.
pub fn parent_domain(domain: &str) -> &str {
    let mut dots = domain.rmatch_indices('.').map(|(i, _)| i);
    match (dots.next(), dots.next()) {
        (Some(_), Some(second)) => &domain[second + 1..],
        _ => domain,
    }
}

/// Data of the `A` answers in `records`. CNAME links that a resolver returns
/// alongside the addresses are skipped.
pub(crate) fn addresses(records: &[Record]) -> Vec<&str> {
    records
        .iter()
        .filter(|r| r.is_type(RecordType::A))
        .map(|r| r.data.as_str())
        .collect()
}

/// Whether `host` has at least one A record. Query failures count as "no".
pub(crate) async fn host_resolves(resolver: &dyn DnsResolver, host: &str) -> bool {
    match resolver.query(host, RecordType::A).await {
        Ok(records) => !addresses(&records).is_empty(),
        Err(_) => false,
    }
}

pub(crate) fn record_details(records: &[Record]) -> Vec<String> {
    records.iter().map(Record::detail_line).collect()
}

/// Run the analyzer for a single category.
pub async fn analyze_category(
    category: Category,
    resolver: &dyn DnsResolver,
    domain: &str,
) -> Vec<Verdict> {
    match category {
        Category::Parent => analyze_parent(resolver, domain).await,
        Category::Ns => analyze_ns(resolver, domain).await,
        Category::Soa => analyze_soa(resolver, domain).await,
        Category::Mx => analyze_mx(resolver, domain).await,
        Category::Www => analyze_www(resolver, domain).await,
    }
}

/// Run all five categories concurrently and collect their verdicts.
///
/// Each category runs in its own task. A task that panics is reported as a
/// single `error` verdict for its category; the other categories are
/// unaffected.
pub async fn run_analysis(resolver: Arc<dyn DnsResolver>, domain: &str) -> AnalysisReport {
    let start = Instant::now();

    let handles = Category::ALL.map(|category| {
        let resolver = Arc::clone(&resolver);
        let domain = domain.to_string();
        tokio::spawn(async move { analyze_category(category, resolver.as_ref(), &domain).await })
    });

    let results = join_all(handles).await;

    let mut categories = CategoryReport::new();
    for (category, result) in Category::ALL.into_iter().zip(results) {
        let verdicts = result.unwrap_or_else(|e| {
            warn!("[Analysis] {category} analyzer for {domain} did not complete: {e}");
            vec![Verdict::error(
                format!("{category} Analysis"),
                format!("Failed to analyze {category} records: {e}"),
            )]
        });
        categories.insert(category, verdicts);
    }

    // u128 -> u64: an analysis never runs for 584 million years
    #[allow(clippy::cast_possible_truncation)]
    let duration_ms = start.elapsed().as_millis() as u64;
    info!(
        "[Analysis] {domain}: {} categories in {duration_ms}ms",
        categories.len()
    );

    AnalysisReport {
        domain: domain.to_string(),
        categories,
        duration_ms,
        checked_at: chrono::Utc::now(),
    }
}
