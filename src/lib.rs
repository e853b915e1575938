//! Domain health verification for email sending domains.
//!
//! Checks a domain's MX and TXT-based records (SPF, DKIM, DMARC, BIMI,
//! ownership proof) against expected values, and polls an external VMC
//! validation service with a bounded retry loop when revocation status is
//! indeterminate.
//!
//! DNS caching is the caller's responsibility. This library provides a
//! `DnsResolver` trait; implement it with caching at the resolver layer.

pub mod common;
pub mod records;
pub mod verify;
pub mod vmc;

pub use common::dns::{DnsError, DnsResolver, HickoryResolver};
pub use records::{
    RecordKind, RecordObservation, RecordStatus, Selectors, VerificationRequest,
    VerificationResult,
};
pub use verify::{DomainVerifier, VerifyError};
pub use vmc::{
    HttpVmcClient, RetrySuggestion, VmcError, VmcStatus, VmcTransport, VmcValidationResult,
    VmcValidator,
};
