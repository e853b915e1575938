use super::types::{RecordObservation, RecordStatus};

/// Classify an observation against its expected value.
///
/// - No observed records → `NotFound`
/// - Any observed record contains `expected` → `Verified`
/// - Records exist, none contain `expected` → `Unverified`
///
/// Pure function of (expected, observation); verdicts never depend on state
/// outside the arguments.
pub fn classify(expected: &str, observation: &RecordObservation) -> RecordStatus {
    if !observation.found || observation.raw_values.is_empty() {
        return RecordStatus::NotFound;
    }
    if observation
        .raw_values
        .iter()
        .any(|value| value.contains(expected))
    {
        RecordStatus::Verified
    } else {
        RecordStatus::Unverified
    }
}
