//! Shared test helpers: a scripted in-memory resolver and scripted WHOIS
//! strategies.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dns_analyzer_engine::{
    DnsResolver, EngineError, EngineResult, Record, RecordType, WhoisRecord, WhoisSource,
    WhoisStrategy,
};

/// Build an answer record.
pub fn record(name: &str, record_type: RecordType, data: &str) -> Record {
    Record {
        name: name.to_string(),
        record_type: record_type.to_string(),
        data: data.to_string(),
        ttl: Some(300),
    }
}

/// Resolver answering from a fixed table. Unscripted questions fail with
/// NXDOMAIN, like a name that does not exist.
#[derive(Default)]
pub struct MockResolver {
    answers: HashMap<(String, RecordType), EngineResult<Vec<Record>>>,
    panic_on: HashSet<(String, RecordType)>,
    calls: AtomicUsize,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful answer; the record data are the payloads.
    pub fn answer(mut self, name: &str, record_type: RecordType, data: &[&str]) -> Self {
        let records = data.iter().map(|d| record(name, record_type, d)).collect();
        self.answers
            .insert((name.to_string(), record_type), Ok(records));
        self
    }

    /// Script a raw answer section (e.g. a CNAME followed by its A records).
    pub fn records(mut self, name: &str, record_type: RecordType, records: Vec<Record>) -> Self {
        self.answers
            .insert((name.to_string(), record_type), Ok(records));
        self
    }

    pub fn fail(mut self, name: &str, record_type: RecordType) -> Self {
        self.answers.insert(
            (name.to_string(), record_type),
            Err(EngineError::NetworkError("connection refused".to_string())),
        );
        self
    }

    /// Panic when this question is asked.
    pub fn panic_on(mut self, name: &str, record_type: RecordType) -> Self {
        self.panic_on.insert((name.to_string(), record_type));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn into_arc(self) -> Arc<dyn DnsResolver> {
        Arc::new(self)
    }
}

#[async_trait]
impl DnsResolver for MockResolver {
    #[allow(clippy::panic)]
    async fn query(&self, name: &str, record_type: RecordType) -> EngineResult<Vec<Record>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let key = (name.to_string(), record_type);
        if self.panic_on.contains(&key) {
            panic!("scripted resolver panic for {record_type} {name}");
        }
        self.answers
            .get(&key)
            .cloned()
            .unwrap_or(Err(EngineError::ResolverStatus(3)))
    }
}

/// What a [`ScriptedStrategy`] returns.
#[derive(Clone)]
pub enum Outcome {
    Record(WhoisRecord),
    Fail(EngineError),
}

/// WHOIS strategy with a fixed outcome that records every attempt in a
/// shared log.
pub struct ScriptedStrategy {
    name: &'static str,
    outcome: Outcome,
    log: Arc<Mutex<Vec<&'static str>>>,
}

impl ScriptedStrategy {
    pub fn boxed(
        name: &'static str,
        outcome: Outcome,
        log: &Arc<Mutex<Vec<&'static str>>>,
    ) -> Box<dyn WhoisStrategy> {
        Box::new(Self {
            name,
            outcome,
            log: Arc::clone(log),
        })
    }
}

#[async_trait]
impl WhoisStrategy for ScriptedStrategy {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn attempt(&self, domain: &str) -> EngineResult<WhoisRecord> {
        if let Ok(mut log) = self.log.lock() {
            log.push(self.name);
        }
        match &self.outcome {
            Outcome::Record(record) => Ok(WhoisRecord {
                domain: domain.to_string(),
                ..record.clone()
            }),
            Outcome::Fail(e) => Err(e.clone()),
        }
    }
}

/// A record with a registrar and nameservers from `source`.
pub fn whois_record(registrar: &str, source: WhoisSource) -> WhoisRecord {
    let mut record = WhoisRecord::empty("", source);
    record.registrar = registrar.to_string();
    record.nameservers = vec!["ns1.example.net".to_string()];
    record
}
