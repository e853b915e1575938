//! Record kinds, observations, and status classification.

pub mod classify;
pub mod types;

pub use classify::classify;
pub use types::{
    RecordKind, RecordObservation, RecordStatus, Selectors, VerificationRequest,
    VerificationResult,
};
