use crate::{crd::ScaleConfig, presets::ReplicasPreset};

/// Resolves the replica bounds against the default preset.
///
/// - Neither bound given: both are taken from the default.
/// - Only `maxReplicas` given: `minReplicas` is the default minimum, clamped into `0..=max`.
/// - Only `minReplicas` given: `maxReplicas` is the default maximum, raised to `min` if needed.
/// - Both given: left as they are, even if they contradict each other.
pub fn resolve_scale(given: Option<&ScaleConfig>, default: ReplicasPreset) -> ScaleConfig {
    let min = given.and_then(|g| g.min_replicas);
    let max = given.and_then(|g| g.max_replicas);

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        (None, Some(max)) => (default.min.min(max).max(0), max),
        (Some(min), None) => (min, default.max.max(min)),
        (None, None) => (default.min, default.max),
    };

    tracing::trace!(min, max, "resolved scale bounds");

    ScaleConfig {
        min_replicas: Some(min),
        max_replicas: Some(max),
    }
}
