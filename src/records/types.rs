use std::collections::BTreeMap;
use std::fmt;

/// DNS record kinds checked during domain verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecordKind {
    Mx,
    Spf,
    Dkim,
    Dmarc,
    Bimi,
    /// TXT ownership proof published at the bare domain.
    Ownership,
}

impl RecordKind {
    /// DNS name to query for this kind.
    ///
    /// SPF and ownership proofs live at the bare domain; DKIM, DMARC, and
    /// BIMI live at their conventional subdomains.
    pub fn query_name(&self, domain: &str, selectors: &Selectors) -> String {
        match self {
            RecordKind::Mx | RecordKind::Spf | RecordKind::Ownership => domain.to_string(),
            RecordKind::Dkim => format!("{}._domainkey.{}", selectors.dkim, domain),
            RecordKind::Dmarc => format!("_dmarc.{}", domain),
            RecordKind::Bimi => format!("{}._bimi.{}", selectors.bimi, domain),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Mx => "MX",
            RecordKind::Spf => "SPF",
            RecordKind::Dkim => "DKIM",
            RecordKind::Dmarc => "DMARC",
            RecordKind::Bimi => "BIMI",
            RecordKind::Ownership => "ownership",
        };
        write!(f, "{name}")
    }
}

/// Selectors for the record kinds that require one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selectors {
    pub dkim: String,
    pub bimi: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            dkim: "default".to_string(),
            bimi: "default".to_string(),
        }
    }
}

/// Records observed for one kind during a single verification call.
/// Never persisted across calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordObservation {
    pub kind: RecordKind,
    /// One string per observed record, in answer order. MX records are
    /// rendered as "<preference> <exchange>".
    pub raw_values: Vec<String>,
    /// False when the queried name had no records of this kind.
    pub found: bool,
}

impl RecordObservation {
    pub fn new(kind: RecordKind, raw_values: Vec<String>) -> Self {
        let found = !raw_values.is_empty();
        Self {
            kind,
            raw_values,
            found,
        }
    }

    /// Observation for a name with no records (empty answer or NXDOMAIN).
    pub fn not_found(kind: RecordKind) -> Self {
        Self {
            kind,
            raw_values: Vec::new(),
            found: false,
        }
    }
}

/// Per-kind verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordStatus {
    /// At least one observed record contains the expected value.
    Verified,
    /// Records exist but none contain the expected value.
    Unverified,
    /// The queried name has no records of this kind.
    NotFound,
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordStatus::Verified => "verified",
            RecordStatus::Unverified => "unverified",
            RecordStatus::NotFound => "not found",
        };
        write!(f, "{name}")
    }
}

/// Immutable input to one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationRequest {
    pub domain: String,
    /// Record kind → expected substring (TXT kinds) or target host (MX).
    pub expected: BTreeMap<RecordKind, String>,
    pub selectors: Selectors,
}

impl VerificationRequest {
    pub fn new(domain: impl Into<String>, expected: BTreeMap<RecordKind, String>) -> Self {
        Self {
            domain: domain.into(),
            expected,
            selectors: Selectors::default(),
        }
    }

    pub fn with_selectors(mut self, selectors: Selectors) -> Self {
        self.selectors = selectors;
        self
    }
}

/// Final verdict for one verification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationResult {
    pub statuses: BTreeMap<RecordKind, RecordStatus>,
    /// Human-readable summary with remediation guidance.
    pub analysis: String,
}
