//! VMC validation via an external API, with a bounded revocation retry loop.

pub mod client;
pub mod types;
pub mod validate;

pub use client::{HttpVmcClient, VmcTransport};
pub use types::{RetrySuggestion, VmcReport, VmcStatus, VmcValidationResult};
pub use validate::{VmcError, VmcValidator};
