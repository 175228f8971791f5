//! Admission handling for [`Function`] objects.
//!
//! The handler is transport agnostic, it turns an [`AdmissionRequest`] into an
//! [`AdmissionResponse`] carrying a JSON patch from the submitted object to the defaulted one.

use kube::core::admission::{AdmissionRequest, AdmissionResponse, Operation};
use snafu::{ResultExt as _, Snafu};
use tracing::instrument;

use crate::{config::DefaultingConfig, crd::Function};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
pub enum Error {
    #[snafu(display("failed to serialize Function"))]
    SerializeFunction { source: serde_json::Error },

    #[snafu(display("failed to attach patch to admission response"))]
    SerializePatch {
        source: kube::core::admission::SerializePatchError,
    },
}

/// Computes the JSON patch which applies the defaults to `function`.
///
/// The patch is empty if the Function is already fully defaulted.
pub fn patch(function: &Function, config: &DefaultingConfig) -> Result<json_patch::Patch> {
    let defaulted = function.with_defaults(config);

    let before = serde_json::to_value(function).context(SerializeFunctionSnafu)?;
    let after = serde_json::to_value(&defaulted).context(SerializeFunctionSnafu)?;

    Ok(json_patch::diff(&before, &after))
}

fn mutated_response(
    request: &AdmissionRequest<Function>,
    function: &Function,
    config: &DefaultingConfig,
) -> Result<AdmissionResponse> {
    let patch = patch(function, config)?;
    tracing::debug!(operations = patch.0.len(), "computed defaulting patch");

    AdmissionResponse::from(request)
        .with_patch(patch)
        .context(SerializePatchSnafu)
}

/// Defaults the Function contained in a create or update request.
///
/// Other operations are allowed without changes. Requests without an object and failures to build
/// the patch are answered with an invalid response, so the API server rejects the request instead
/// of persisting a Function without defaults.
#[instrument(skip_all, fields(uid = %request.uid, operation = ?request.operation, name = %request.name))]
pub fn mutate(request: &AdmissionRequest<Function>, config: &DefaultingConfig) -> AdmissionResponse {
    if !matches!(request.operation, Operation::Create | Operation::Update) {
        tracing::debug!("operation does not need defaulting, allowing it");
        return AdmissionResponse::from(request);
    }

    let Some(function) = &request.object else {
        tracing::warn!("admission request does not contain an object");
        return AdmissionResponse::invalid("admission request does not contain a Function");
    };

    match mutated_response(request, function, config) {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(
                error = &err as &dyn std::error::Error,
                "failed to default Function"
            );
            AdmissionResponse::invalid(err.to_string())
        }
    }
}
