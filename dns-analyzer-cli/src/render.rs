//! Plain-text rendering of reports.

use std::fmt::Write;

use dns_analyzer_engine::{AnalysisReport, VerdictStatus, WhoisContact, WhoisRecord};

fn label(status: VerdictStatus) -> &'static str {
    match status {
        VerdictStatus::Pass => "PASS",
        VerdictStatus::Warn => "WARN",
        VerdictStatus::Error => "FAIL",
        VerdictStatus::Info => "INFO",
    }
}

pub fn analysis(report: &AnalysisReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "DNS report for {}", report.domain);
    for (category, verdicts) in report.categories.iter() {
        let _ = writeln!(out, "\n== {category} ==");
        for verdict in verdicts {
            let _ = writeln!(
                out,
                "[{}] {}: {}",
                label(verdict.status),
                verdict.title,
                verdict.message
            );
            for line in &verdict.details {
                let _ = writeln!(out, "       {line}");
            }
        }
    }
    let _ = writeln!(out, "\nCompleted in {}ms", report.duration_ms);
    out
}

fn contact(out: &mut String, role: &str, c: &WhoisContact) {
    let _ = writeln!(out, "{role}: {}", c.name);
    for value in [&c.organization, &c.country, &c.email] {
        if !value.is_empty() {
            let _ = writeln!(out, "  {value}");
        }
    }
}

pub fn whois(record: &WhoisRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Domain:      {}", record.domain);
    let _ = writeln!(out, "Registrar:   {}", record.registrar);
    let _ = writeln!(out, "Registered:  {}", record.registration_date);
    let _ = writeln!(out, "Expires:     {}", record.expiration_date);
    let _ = writeln!(out, "Nameservers: {}", record.nameservers.join(", "));
    let _ = writeln!(out, "Status:      {}", record.status.join(", "));
    contact(&mut out, "Registrant", &record.registrant);
    contact(&mut out, "Admin", &record.admin);
    contact(&mut out, "Tech", &record.tech);
    let _ = writeln!(out, "Source:      {}", record.source);
    out
}
