use serde::Deserialize;

/// Validation status reported by the VMC API.
///
/// The upstream enum is open; unrecognized statuses deserialize to
/// `Unknown` rather than failing shape validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VmcStatus {
    Ok,
    IndeterminateRevocation,
    Failed,
    #[serde(other)]
    Unknown,
}

/// Retry hint supplied by the API alongside an indeterminate revocation
/// status.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RetrySuggestion {
    pub retry_after_seconds: u64,
    pub max_retries: u32,
}

/// Per-certificate findings, nested under the response's `vmc` key.
/// All fields are reported by the upstream service; `None` means the
/// service did not include that finding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VmcReport {
    #[serde(default)]
    pub exists: Option<bool>,
    #[serde(default)]
    pub authentic: Option<bool>,
    #[serde(default)]
    pub chain_ok: Option<bool>,
    #[serde(default)]
    pub valid_now: Option<bool>,
    #[serde(default)]
    pub revocation_ok: Option<bool>,
    #[serde(default)]
    pub retry_suggestion: Option<RetrySuggestion>,
}

/// Top-level VMC validation response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct VmcValidationResult {
    #[serde(default)]
    pub status: Option<VmcStatus>,
    #[serde(default)]
    pub vmc: Option<VmcReport>,
}

impl VmcValidationResult {
    /// True when the service could not confirm revocation either way.
    pub fn is_indeterminate_revocation(&self) -> bool {
        self.status == Some(VmcStatus::IndeterminateRevocation)
    }

    pub fn retry_suggestion(&self) -> Option<&RetrySuggestion> {
        self.vmc.as_ref()?.retry_suggestion.as_ref()
    }

    pub fn revocation_ok(&self) -> Option<bool> {
        self.vmc.as_ref()?.revocation_ok
    }
}
