// Near-duplicate suppression. A candidate is a repeat of an existing alert
// when kind, district, and street all match and the trigger times sit
// within the recency window. Severity is deliberately not part of the key.

use super::model::Alert;

/// True when `candidate` should be dropped because `existing` already holds
/// an equivalent alert inside the window. The window is caller-supplied;
/// `Settings::dedup_window_minutes` carries the canonical default.
pub fn should_suppress(candidate: &Alert, existing: &[Alert], window_minutes: i64) -> bool {
    existing.iter().any(|prior| is_repeat(candidate, prior, window_minutes))
}

fn is_repeat(candidate: &Alert, prior: &Alert, window_minutes: i64) -> bool {
    candidate.kind == prior.kind
        && candidate.location.district == prior.location.district
        && candidate.location.street == prior.location.street
        && (candidate.trigger_time - prior.trigger_time)
            .num_seconds()
            .abs()
            < window_minutes * 60
}
