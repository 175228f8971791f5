use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use serde_json::Value;
use stackable_function_defaulting::{
    config::SharedDefaultingConfig,
    crd::Function,
    kube::core::{
        DynamicObject,
        admission::{AdmissionRequest, AdmissionResponse, AdmissionReview},
    },
    webhook,
};

pub const MUTATE_PATH: &str = "/mutate";
pub const HEALTH_PATH: &str = "/health";

pub fn router(config: Arc<SharedDefaultingConfig>) -> Router {
    Router::new()
        .route(MUTATE_PATH, post(mutate))
        .with_state(config)
        .route(HEALTH_PATH, get(|| async { "ok" }))
}

/// Uid of the admission request in a raw review, if there is one.
fn request_uid(review: &Value) -> Option<&str> {
    review.pointer("/request/uid").and_then(Value::as_str)
}

/// Rejects a review that could not be deserialized.
///
/// The API server only accepts a response that echoes the request's uid, so the uid is taken from
/// the raw review whenever it can be found.
fn invalid_review(uid: Option<&str>, message: String) -> Json<AdmissionReview<DynamicObject>> {
    tracing::warn!(uid, %message, "rejecting admission review");

    let mut response = AdmissionResponse::invalid(message);
    if let Some(uid) = uid {
        uid.clone_into(&mut response.uid);
    }
    Json(response.into_review())
}

async fn mutate(
    State(config): State<Arc<SharedDefaultingConfig>>,
    review: Result<Json<Value>, JsonRejection>,
) -> Json<AdmissionReview<DynamicObject>> {
    let raw = match review {
        Ok(Json(raw)) => raw,
        Err(rejection) => {
            return invalid_review(None, format!("failed to read admission review: {rejection}"));
        }
    };

    // A Function with unparsable quantities is rejected here, before any defaulting happens
    let uid = request_uid(&raw).map(ToOwned::to_owned);
    let review: AdmissionReview<Function> = match serde_json::from_value(raw) {
        Ok(review) => review,
        Err(err) => {
            return invalid_review(
                uid.as_deref(),
                format!("failed to parse admission review: {err}"),
            );
        }
    };

    let request: AdmissionRequest<Function> = match review.try_into() {
        Ok(request) => request,
        Err(err) => {
            return invalid_review(
                uid.as_deref(),
                format!("failed to convert to request: {err}"),
            );
        }
    };

    let config = config.load();
    Json(webhook::mutate(&request, &config).into_review())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use http::{Request, StatusCode, header::CONTENT_TYPE};
    use serde_json::json;
    use stackable_function_defaulting::config::DefaultingConfig;
    use tower::ServiceExt as _;

    use super::*;

    fn test_router() -> Router {
        router(Arc::new(SharedDefaultingConfig::new(
            DefaultingConfig::builtin().expect("built-in presets are valid"),
        )))
    }

    fn review(object: &Value) -> Value {
        json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
            "request": {
                "uid": "6b7a4b36-2cb4-4f5c-9d38-2a4e3e0f1f4d",
                "kind": {"group": "serverless.stackable.tech", "version": "v1alpha2", "kind": "Function"},
                "resource": {"group": "serverless.stackable.tech", "version": "v1alpha2", "resource": "functions"},
                "name": "greeter",
                "namespace": "default",
                "operation": "CREATE",
                "userInfo": {"username": "admin"},
                "object": object,
            }
        })
    }

    async fn post_review(body: &Value) -> Value {
        let response = test_router()
            .oneshot(
                Request::post(MUTATE_PATH)
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("valid request"),
            )
            .await
            .expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("readable body");
        serde_json::from_slice(&bytes).expect("JSON response")
    }

    #[tokio::test]
    async fn health() {
        let response = test_router()
            .oneshot(
                Request::get(HEALTH_PATH)
                    .body(Body::empty())
                    .expect("valid request"),
            )
            .await
            .expect("router is infallible");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn mutate_returns_patch() {
        let response = post_review(&review(&json!({
            "apiVersion": "serverless.stackable.tech/v1alpha2",
            "kind": "Function",
            "metadata": {"name": "greeter", "namespace": "default"},
            "spec": {"runtime": "nodejs20"},
        })))
        .await;

        let response = &response["response"];
        assert_eq!(response["uid"], "6b7a4b36-2cb4-4f5c-9d38-2a4e3e0f1f4d");
        assert_eq!(response["allowed"], true);
        assert_eq!(response["patchType"], "JSONPatch");
    }

    #[tokio::test]
    async fn mutate_rejects_unparsable_quantity() {
        let response = post_review(&review(&json!({
            "apiVersion": "serverless.stackable.tech/v1alpha2",
            "kind": "Function",
            "metadata": {"name": "greeter", "namespace": "default"},
            "spec": {
                "resourceConfiguration": {"function": {"limits": {"cpu": "plenty"}}},
            },
        })))
        .await;

        let response = &response["response"];
        assert_eq!(response["uid"], "6b7a4b36-2cb4-4f5c-9d38-2a4e3e0f1f4d");
        assert_eq!(response["allowed"], false);
    }

    #[tokio::test]
    async fn mutate_rejects_review_without_request() {
        let response = post_review(&json!({
            "apiVersion": "admission.k8s.io/v1",
            "kind": "AdmissionReview",
        }))
        .await;

        assert_eq!(response["response"]["allowed"], false);
    }
}
