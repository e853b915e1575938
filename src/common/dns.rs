use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex};

use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnsError {
    #[error("NXDOMAIN: name does not exist")]
    NxDomain,
    #[error("no records of the queried type")]
    NoRecords,
    #[error("SERVFAIL: server failure")]
    ServFail,
    #[error("timeout")]
    Timeout,
    #[error("DNS error: {0}")]
    Other(String),
}

impl DnsError {
    /// True for the "name has no data" class of outcomes, which callers
    /// treat as an empty record set rather than a failure.
    pub fn is_no_data(&self) -> bool {
        matches!(self, DnsError::NxDomain | DnsError::NoRecords)
    }
}

/// DNS resolver trait for abstracting DNS lookups.
pub trait DnsResolver: Clone + Send + Sync + 'static {
    /// Query TXT records. Each record's constituent character-strings are
    /// concatenated into one string per record.
    fn query_txt(&self, name: &str) -> impl Future<Output = Result<Vec<String>, DnsError>> + Send;
    /// Query MX records as (preference, exchange) pairs. The exchange has
    /// its trailing dot stripped.
    fn query_mx(&self, name: &str)
        -> impl Future<Output = Result<Vec<(u16, String)>, DnsError>> + Send;
}

/// Hickory DNS resolver implementation.
#[derive(Clone)]
pub struct HickoryResolver {
    resolver: TokioResolver,
}

impl HickoryResolver {
    pub fn new() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let resolver = TokioResolver::builder_with_config(
            ResolverConfig::default(),
            TokioConnectionProvider::default(),
        )
        .build();
        Ok(Self { resolver })
    }

    pub fn with_config(
        config: ResolverConfig,
        opts: ResolverOpts,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();
        Ok(Self { resolver })
    }

    fn classify_error(e: &hickory_resolver::ResolveError) -> DnsError {
        let msg = e.to_string().to_lowercase();
        if msg.contains("no records found") || msg.contains("no record") {
            DnsError::NoRecords
        } else if msg.contains("nxdomain") {
            DnsError::NxDomain
        } else if msg.contains("timeout") {
            DnsError::Timeout
        } else if msg.contains("servfail") {
            DnsError::ServFail
        } else {
            DnsError::Other(e.to_string())
        }
    }
}

impl DnsResolver for HickoryResolver {
    async fn query_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<String> = lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
                            .collect::<String>()
                    })
                    .collect();
                Ok(records)
            }
            Err(e) => Err(Self::classify_error(&e)),
        }
    }

    async fn query_mx(&self, name: &str) -> Result<Vec<(u16, String)>, DnsError> {
        match self.resolver.mx_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<(u16, String)> = lookup
                    .iter()
                    .map(|mx| {
                        (
                            mx.preference(),
                            mx.exchange().to_string().trim_end_matches('.').to_string(),
                        )
                    })
                    .collect();
                Ok(records)
            }
            Err(e) => Err(Self::classify_error(&e)),
        }
    }
}

/// Mock DNS resolver for testing.
#[derive(Clone, Default)]
pub struct MockResolver {
    txt_records: Arc<Mutex<HashMap<String, Vec<String>>>>,
    mx_records: Arc<Mutex<HashMap<String, Vec<(u16, String)>>>>,
    errors: Arc<Mutex<HashMap<String, DnsError>>>,
}

impl MockResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_txt(&self, name: &str, records: Vec<String>) {
        self.txt_records
            .lock()
            .unwrap()
            .insert(name.to_lowercase(), records);
    }

    pub fn add_mx(&self, name: &str, records: Vec<(u16, String)>) {
        self.mx_records
            .lock()
            .unwrap()
            .insert(name.to_lowercase(), records);
    }

    /// Make every lookup of `name` fail with `err`.
    pub fn add_err(&self, name: &str, err: DnsError) {
        self.errors.lock().unwrap().insert(name.to_lowercase(), err);
    }

    fn check_err(&self, name: &str) -> Result<(), DnsError> {
        match self.errors.lock().unwrap().get(name) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl DnsResolver for MockResolver {
    async fn query_txt(&self, name: &str) -> Result<Vec<String>, DnsError> {
        let name = name.to_lowercase();
        self.check_err(&name)?;
        match self.txt_records.lock().unwrap().get(&name) {
            Some(records) => Ok(records.clone()),
            None => Err(DnsError::NoRecords),
        }
    }

    async fn query_mx(&self, name: &str) -> Result<Vec<(u16, String)>, DnsError> {
        let name = name.to_lowercase();
        self.check_err(&name)?;
        match self.mx_records.lock().unwrap().get(&name) {
            Some(records) => Ok(records.clone()),
            None => Err(DnsError::NoRecords),
        }
    }
}
