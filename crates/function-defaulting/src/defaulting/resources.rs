//! Field by field resolution of requests and limits against a candidate preset.

use crate::{
    crd::{ResourceList, ResourceRequirements},
    presets::ResourcePreset,
    quantity::AmountExt,
};

/// Resolves the request and limit of a single axis.
///
/// Explicitly given values are never changed. A missing limit is raised to the request if the
/// default limit is smaller, a missing request is lowered to the limit if the default request is
/// larger.
pub fn resolve_axis<Q>(
    request: Option<Q>,
    limit: Option<Q>,
    default_request: &Q,
    default_limit: &Q,
) -> (Q, Q)
where
    Q: AmountExt + Clone,
{
    match (request, limit) {
        (Some(request), Some(limit)) => (request, limit),
        (Some(request), None) => {
            let limit = default_limit.clone().at_least(&request);
            (request, limit)
        }
        (None, Some(limit)) => {
            let request = default_request.clone().at_most(&limit);
            (request, limit)
        }
        (None, None) => (default_request.clone(), default_limit.clone()),
    }
}

/// Resolves requests and limits of one workload, both lists are always fully populated.
pub fn resolve_resources(
    given: Option<&ResourceRequirements>,
    preset: &ResourcePreset,
) -> ResourceRequirements {
    if given.is_none_or(ResourceRequirements::is_unset) {
        return ResourceRequirements {
            requests: Some(preset.requests()),
            limits: Some(preset.limits()),
        };
    }

    let requests = given.and_then(|g| g.requests.as_ref());
    let limits = given.and_then(|g| g.limits.as_ref());

    let (request_cpu, limit_cpu) = resolve_axis(
        requests.and_then(|r| r.cpu),
        limits.and_then(|l| l.cpu),
        &preset.request_cpu,
        &preset.limit_cpu,
    );
    let (request_memory, limit_memory) = resolve_axis(
        requests.and_then(|r| r.memory),
        limits.and_then(|l| l.memory),
        &preset.request_memory,
        &preset.limit_memory,
    );

    tracing::trace!(
        %request_cpu,
        %limit_cpu,
        %request_memory,
        %limit_memory,
        "resolved resources"
    );

    ResourceRequirements {
        requests: Some(ResourceList::new(request_cpu, request_memory)),
        limits: Some(ResourceList::new(limit_cpu, limit_memory)),
    }
}
