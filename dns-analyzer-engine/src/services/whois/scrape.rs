//! Registry web page strategy.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use scraper::{Html, Selector};

use crate::error::{EngineError, EngineResult};
use crate::types::{WhoisRecord, WhoisSource};

use super::parse::parse_whois_text;
use super::{USER_AGENT, WhoisStrategy};

/// Fetches a registry's WHOIS display page and parses its text block.
pub struct ScrapeStrategy {
    url_template: String,
    client: Client,
}

impl ScrapeStrategy {
    /// `url_template` must contain `{domain}`.
    pub fn new(url_template: impl Into<String>, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self {
            url_template: url_template.into(),
            client,
        }
    }
}

#[async_trait]
impl WhoisStrategy for ScrapeStrategy {
    fn name(&self) -> &'static str {
        "scrape"
    }

    async fn attempt(&self, domain: &str) -> EngineResult<WhoisRecord> {
        let url = self.url_template.replace("{domain}", domain);
        debug!("[WHOIS:scrape] GET {url}");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| EngineError::from_reqwest(&e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::HttpStatus(status.as_u16()));
        }
        let html = response
            .text()
            .await
            .map_err(|e| EngineError::from_reqwest(&e))?;

        let text = extract_whois_block(&html)
            .ok_or_else(|| EngineError::NoData(format!("No WHOIS text block on {url}")))?;
        Ok(parse_whois_text(domain, &text, WhoisSource::Scrape))
    }
}

/// Text of the first non-empty `<pre>` block, or the rows of the first
/// non-empty `<table>` (cells space-joined, one row per line).
pub fn extract_whois_block(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let pre = Selector::parse("pre").ok()?;
    for element in document.select(&pre) {
        let text = element.text().collect::<String>();
        if !text.trim().is_empty() {
            return Some(text);
        }
    }

    let table = Selector::parse("table").ok()?;
    let row = Selector::parse("tr").ok()?;
    let cell = Selector::parse("th, td").ok()?;
    for element in document.select(&table) {
        let lines: Vec<String> = element
            .select(&row)
            .map(|tr| {
                tr.select(&cell)
                    .map(|c| c.text().collect::<String>().trim().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .filter(|line| !line.is_empty())
            .collect();
        if !lines.is_empty() {
            return Some(lines.join("\n"));
        }
    }

    None
}
