use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::validate::VmcError;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Transport to the VMC validation API.
///
/// Returns the raw JSON body; the validator performs shape validation so a
/// malformed payload surfaces separately from a transport failure.
pub trait VmcTransport: Send + Sync {
    fn fetch_validation(
        &self,
        domain: &str,
    ) -> impl Future<Output = Result<serde_json::Value, VmcError>> + Send;
}

/// reqwest-backed transport for `GET {base_url}/validate?domain=<domain>`
/// with an API-key header.
#[derive(Debug, Clone)]
pub struct HttpVmcClient {
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl HttpVmcClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Set the timeout for each HTTP call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl VmcTransport for HttpVmcClient {
    async fn fetch_validation(&self, domain: &str) -> Result<serde_json::Value, VmcError> {
        let client = reqwest::Client::builder().timeout(self.timeout).build()?;

        let url = format!("{}/validate", self.base_url.trim_end_matches('/'));
        let response = client
            .get(&url)
            .query(&[("domain", domain)])
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(VmcError::Api {
                status: status.as_u16(),
            });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}

/// Scripted transport for testing: responses are consumed in push order,
/// and every call is counted.
#[derive(Clone, Default)]
pub struct MockVmcTransport {
    responses: Arc<Mutex<VecDeque<Result<serde_json::Value, u16>>>>,
    calls: Arc<AtomicUsize>,
}

impl MockVmcTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_json(&self, body: serde_json::Value) {
        self.responses.lock().unwrap().push_back(Ok(body));
    }

    pub fn push_api_error(&self, status: u16) {
        self.responses.lock().unwrap().push_back(Err(status));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl VmcTransport for MockVmcTransport {
    async fn fetch_validation(&self, _domain: &str) -> Result<serde_json::Value, VmcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().pop_front() {
            Some(Ok(body)) => Ok(body),
            Some(Err(status)) => Err(VmcError::Api { status }),
            // An unscripted call is a test bug; fail it loudly.
            None => Err(VmcError::Api { status: 599 }),
        }
    }
}
