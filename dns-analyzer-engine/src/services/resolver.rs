//! DNS-over-HTTPS resolver client.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::{EngineError, EngineResult};
use crate::types::{Record, RecordType};

/// `Accept` value for the JSON flavour of DNS-over-HTTPS.
const DNS_JSON_CONTENT_TYPE: &str = "application/dns-json";

/// Issues a single DNS question and returns the answer section.
///
/// An empty answer is a successful empty `Vec`, distinct from a failed query.
/// Implementations do not retry.
#[async_trait]
pub trait DnsResolver: Send + Sync {
    async fn query(&self, name: &str, record_type: RecordType) -> EngineResult<Vec<Record>>;
}

/// Resolver backed by a public DNS-over-HTTPS JSON endpoint
/// (`GET <endpoint>?name=<name>&type=<TYPE>`).
pub struct DohResolver {
    endpoint: Url,
    client: Client,
}

impl DohResolver {
    pub fn new(endpoint: &str, timeout: Duration) -> EngineResult<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| {
            EngineError::ValidationError(format!(
                "Invalid DNS-over-HTTPS endpoint {endpoint}: {e}"
            ))
        })?;
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Ok(Self { endpoint, client })
    }

    fn query_url(&self, name: &str, record_type: RecordType) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("type", &record_type.to_string());
        url
    }
}

#[async_trait]
impl DnsResolver for DohResolver {
    async fn query(&self, name: &str, record_type: RecordType) -> EngineResult<Vec<Record>> {
        let url = self.query_url(name, record_type);
        debug!("[DoH] {record_type} {name}");

        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, DNS_JSON_CONTENT_TYPE)
            .send()
            .await
            .map_err(|e| EngineError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            debug!("[DoH] {record_type} {name}: HTTP {}", status.as_u16());
            return Err(EngineError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| EngineError::from_reqwest(&e))?;

        let records = parse_doh_response(&body)?;
        debug!("[DoH] {record_type} {name}: {} answer(s)", records.len());
        Ok(records)
    }
}

/// JSON body returned by a DNS-over-HTTPS JSON endpoint.
#[derive(Deserialize)]
struct DohResponse {
    #[serde(rename = "Status")]
    status: u32,
    #[serde(rename = "Answer", default)]
    answer: Vec<DohAnswer>,
}

#[derive(Deserialize)]
struct DohAnswer {
    name: String,
    #[serde(rename = "type")]
    record_type: u16,
    data: String,
    #[serde(rename = "TTL")]
    ttl: Option<u32>,
}

/// Decode a `application/dns-json` body into records.
///
/// A non-zero `Status` (e.g. 3 = NXDOMAIN, 2 = SERVFAIL) is a failure; a
/// missing `Answer` section is an empty success.
pub fn parse_doh_response(body: &str) -> EngineResult<Vec<Record>> {
    let response: DohResponse = serde_json::from_str(body)
        .map_err(|e| EngineError::ParseError(format!("Invalid DNS JSON response: {e}")))?;

    if response.status != 0 {
        return Err(EngineError::ResolverStatus(response.status));
    }

    Ok(response
        .answer
        .into_iter()
        .map(|a| Record {
            name: a.name,
            record_type: RecordType::mnemonic(a.record_type),
            data: a.data,
            ttl: a.ttl,
        })
        .collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_doh_response_answers() {
        let body = r#"{
            "Status": 0, "TC": false, "RD": true, "RA": true,
            "Question": [{"name": "example.com", "type": 2}],
            "Answer": [
                {"name": "example.com", "type": 2, "TTL": 86400, "data": "a.iana-servers.net."},
                {"name": "example.com", "type": 2, "TTL": 86400, "data": "b.iana-servers.net."}
            ]
        }"#;
        let records = parse_doh_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].record_type, "NS");
        assert_eq!(records[0].data, "a.iana-servers.net.");
        assert_eq!(records[1].ttl, Some(86400));
    }

    #[test]
    fn test_parse_doh_response_no_answer_is_empty_success() {
        let body = r#"{"Status": 0, "Question": [{"name": "example.com", "type": 15}]}"#;
        assert!(parse_doh_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_parse_doh_response_nxdomain() {
        let body = r#"{"Status": 3, "Question": [{"name": "nope.invalid", "type": 1}]}"#;
        assert_eq!(
            parse_doh_response(body).unwrap_err(),
            EngineError::ResolverStatus(3)
        );
    }

    #[test]
    fn test_parse_doh_response_unknown_type_code() {
        let body = r#"{"Status": 0, "Answer": [{"name": "x.", "type": 46, "TTL": 1, "data": "sig"}]}"#;
        let records = parse_doh_response(body).unwrap();
        assert_eq!(records[0].record_type, "46");
    }

    #[test]
    fn test_parse_doh_response_garbage() {
        assert!(matches!(
            parse_doh_response("<html>"),
            Err(EngineError::ParseError(_))
        ));
    }

    #[test]
    fn test_query_url() {
        let resolver =
            DohResolver::new("https://cloudflare-dns.com/dns-query", Duration::from_secs(5))
                .unwrap();
        let url = resolver.query_url("www.example.com", RecordType::Cname);
        assert_eq!(
            url.as_str(),
            "https://cloudflare-dns.com/dns-query?name=www.example.com&type=CNAME"
        );
    }

    #[test]
    fn test_invalid_endpoint_rejected() {
        assert!(matches!(
            DohResolver::new("not a url", Duration::from_secs(5)),
            Err(EngineError::ValidationError(_))
        ));
    }

    #[tokio::test]
    #[ignore = "requires network access"]
    async fn test_doh_query_real() {
        let resolver =
            DohResolver::new("https://cloudflare-dns.com/dns-query", Duration::from_secs(5))
                .unwrap();
        let records = resolver.query("example.com", RecordType::Ns).await.unwrap();
        assert!(!records.is_empty());
    }
}
