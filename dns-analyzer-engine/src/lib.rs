//! DNS health analysis and WHOIS lookup engine.
//!
//! [`DiagnosticService::analyze`] runs five category analyzers (parent
//! delegation, NS, SOA, MX, WWW) concurrently over DNS-over-HTTPS and returns
//! a [`AnalysisReport`] of pass/warn/error/info verdicts.
//! [`DiagnosticService::whois`] walks an ordered chain of WHOIS sources and
//! always yields a [`WhoisRecord`] for a well-formed domain.

pub mod api;
mod config;
mod error;
mod services;
mod types;

pub use config::{
    DEFAULT_DOH_ENDPOINT, DEFAULT_WHOIS_API_URL, DEFAULT_WHOIS_SCRAPE_URL, EngineConfig,
    WhoisConfig, WhoisStrategyKind,
};
pub use error::{EngineError, EngineResult};
pub use services::DiagnosticService;
pub use services::analysis::{
    EXPIRE_BOUNDS, MINIMUM_TTL_BOUNDS, REFRESH_BOUNDS, RETRY_BOUNDS, SoaFields, analyze_category,
    analyze_mx, analyze_ns, analyze_parent, analyze_soa, analyze_www, parent_domain, run_analysis,
    within_bounds,
};
pub use services::resolver::{DnsResolver, DohResolver, parse_doh_response};
pub use services::whois::{
    ApiStrategy, CommandStrategy, ScrapeStrategy, WhoisClient, WhoisStrategy,
    extract_whois_block, parse_api_response, parse_whois_text, placeholder_record,
    validate_whois_domain,
};
pub use types::{
    AnalysisReport, Category, CategoryReport, PRIVACY_PROTECTED, Record, RecordType, UNKNOWN,
    Verdict, VerdictStatus, WhoisContact, WhoisRecord, WhoisSource,
};
