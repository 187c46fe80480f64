//! Free-text WHOIS parsing shared by the scrape and command strategies.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{WhoisContact, WhoisRecord, WhoisSource};

/// Compile a pattern list once. Patterns are constants, so a pattern that
/// fails to compile is dropped rather than aborting the lookup.
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

// `[ \t]*` rather than `\s*` so an empty value never swallows the next line.
static REGISTRAR: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)registrar:[ \t]*(.+)$",
        r"(?im)registrar name:[ \t]*(.+)$",
    ])
});

static CREATION_DATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)creation date:[ \t]*(.+)$",
        r"(?im)created(?: date| on)?:[ \t]*(.+)$",
        r"(?im)registration (?:date|time):[ \t]*(.+)$",
    ])
});

static EXPIRATION_DATE: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)expir(?:y|ation) date:[ \t]*(.+)$",
        r"(?im)expiration time:[ \t]*(.+)$",
        r"(?im)paid-till:[ \t]*(.+)$",
    ])
});

static NAME_SERVER: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[r"(?im)name ?server:[ \t]*(.+)$", r"(?im)nserver:[ \t]*(.+)$"])
});

static STATUS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(&[r"(?im)status:[ \t]*(.+)$"]));

/// `<role> [contact] <field>: value`, e.g. `Registrant Organization: Foo`,
/// `Admin Email: a@b`, `Technical Contact Name: X`.
static CONTACT: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    compile(&[
        r"(?im)^[ \t]*(registrant|admin(?:istrative)?|tech(?:nical)?)(?:[ \t]+contact)?[ \t]+(name|organi[sz]ation|country(?:[ \t]+code)?|e-?mail)[ \t]*:[ \t]*(.+)$",
    ])
});

/// Parse a WHOIS text block into a total record.
///
/// Single-valued fields take the first non-empty match; name servers are
/// lower-cased and status lines kept verbatim, both deduplicated by exact
/// string equality in order of appearance.
pub fn parse_whois_text(domain: &str, text: &str, source: WhoisSource) -> WhoisRecord {
    let mut record = WhoisRecord::empty(domain, source);

    if let Some(registrar) = extract_field(text, &REGISTRAR) {
        record.registrar = registrar;
    }
    if let Some(created) = extract_field(text, &CREATION_DATE) {
        record.registration_date = created;
    }
    if let Some(expires) = extract_field(text, &EXPIRATION_DATE) {
        record.expiration_date = expires;
    }
    record.nameservers = extract_all(text, &NAME_SERVER, str::to_lowercase);
    record.status = extract_all(text, &STATUS, str::to_string);
    extract_contacts(text, &mut record);
    record.raw_output = text.to_string();

    record
}

/// Try each pattern in turn and return the first non-empty capture.
fn extract_field(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|re| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .find(|value| !value.is_empty())
            .map(str::to_string)
    })
}

/// Collect every capture of every pattern, normalised and deduplicated.
fn extract_all(text: &str, patterns: &[Regex], normalise: impl Fn(&str) -> String) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for re in patterns {
        for caps in re.captures_iter(text) {
            if let Some(m) = caps.get(1) {
                let value = normalise(m.as_str().trim());
                if !value.is_empty() && !values.contains(&value) {
                    values.push(value);
                }
            }
        }
    }
    values
}

fn extract_contacts(text: &str, record: &mut WhoisRecord) {
    // Track which fields were filled so the first occurrence wins and the
    // name sentinel can still be replaced.
    let mut seen: Vec<(&'static str, &'static str)> = Vec::new();

    for re in CONTACT.iter() {
        for caps in re.captures_iter(text) {
            let (Some(role), Some(field), Some(value)) = (caps.get(1), caps.get(2), caps.get(3))
            else {
                continue;
            };
            let value = value.as_str().trim();
            if value.is_empty() {
                continue;
            }

            let role = role.as_str().to_lowercase();
            let (role_key, contact): (&'static str, &mut WhoisContact) =
                if role.starts_with("registrant") {
                    ("registrant", &mut record.registrant)
                } else if role.starts_with("admin") {
                    ("admin", &mut record.admin)
                } else {
                    ("tech", &mut record.tech)
                };

            let field = field.as_str().to_lowercase();
            let (field_key, slot) = if field == "name" {
                ("name", &mut contact.name)
            } else if field.starts_with("organi") {
                ("organization", &mut contact.organization)
            } else if field.starts_with("country") {
                ("country", &mut contact.country)
            } else {
                ("email", &mut contact.email)
            };

            if seen.contains(&(role_key, field_key)) {
                continue;
            }
            seen.push((role_key, field_key));
            *slot = value.to_string();
        }
    }
}
