//! Route handlers and router assembly.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use mathq_workflow::{FinalOutcome, RefinementOutcome, SimilarityOutcome, ValidationOutcome};

use crate::errors::ApiError;
use crate::state::AppState;

/// A user message addressed to one session.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    /// The user's text.
    pub message: String,
    /// Session identifier; clients that don't track sessions share one.
    #[serde(default = "default_session_id")]
    pub session_id: String,
}

fn default_session_id() -> String {
    "default".to_string()
}

/// Assemble the router over shared state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/validate", post(validate))
        .route("/refine", post(refine))
        .route("/check-similarity", post(check_similarity))
        .route("/finalize", post(finalize))
        .route("/session/{session_id}", get(get_session))
        .route("/metrics", get(render_metrics))
        .layer(TraceLayer::new_for_http())
        // The original frontend is served from arbitrary origins
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

/// Health check and endpoint listing.
async fn root() -> Json<serde_json::Value> {
    Json(json!({
        "status": "online",
        "service": "mathq question refinement",
        "endpoints": ["/validate", "/refine", "/check-similarity", "/finalize"],
    }))
}

/// Phase 1: validate a submission.
async fn validate(
    State(state): State<AppState>,
    Json(input): Json<UserMessage>,
) -> Result<Json<ValidationOutcome>, ApiError> {
    let outcome = state
        .controller
        .validate(&input.session_id, &input.message)
        .await?;
    Ok(Json(outcome))
}

/// Phase 2: refine the question.
async fn refine(
    State(state): State<AppState>,
    Json(input): Json<UserMessage>,
) -> Result<Json<RefinementOutcome>, ApiError> {
    let outcome = state
        .controller
        .refine(&input.session_id, &input.message)
        .await?;
    Ok(Json(outcome))
}

/// Phase 3: duplicate check.
async fn check_similarity(
    State(state): State<AppState>,
    Json(input): Json<UserMessage>,
) -> Result<Json<SimilarityOutcome>, ApiError> {
    let outcome = state
        .controller
        .check_similarity(&input.session_id, &input.message)
        .await?;
    Ok(Json(outcome))
}

/// Commit the final question.
async fn finalize(
    State(state): State<AppState>,
    Json(input): Json<UserMessage>,
) -> Result<Json<FinalOutcome>, ApiError> {
    let outcome = state
        .controller
        .finalize(&input.session_id, &input.message)
        .await?;
    Ok(Json(outcome))
}

/// Session snapshot, or an explicit not-found result.
async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    match state.controller.get_session(&session_id).await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "session not found" })),
        )
            .into_response(),
    }
}

/// Prometheus text exposition.
async fn render_metrics(State(state): State<AppState>) -> String {
    state.prometheus.render()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    use mathq_core::CorpusQuestion;
    use mathq_embeddings::MockEmbeddingService;
    use mathq_llm::MockLanguageService;
    use mathq_workflow::{SessionStore, SimilarityClassifier, WorkflowController};

    async fn test_router() -> Router {
        let embedder = Arc::new(MockEmbeddingService::new(64));
        let corpus = vec![CorpusQuestion {
            id: 1,
            text: "What is the derivative of x^2?".into(),
            domain: "calculus".into(),
            subdomain: "differentiation".into(),
        }];
        let classifier = Arc::new(
            SimilarityClassifier::build(embedder, corpus, 5, 0.80)
                .await
                .unwrap(),
        );
        let controller = Arc::new(WorkflowController::new(
            SessionStore::new(16),
            classifier,
            Arc::new(MockLanguageService::new()),
        ));
        let prometheus = PrometheusBuilder::new().build_recorder().handle();
        build_router(AppState::new(controller, prometheus))
    }

    async fn post_json(router: &Router, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, value)
    }

    async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn root_lists_endpoints() {
        let router = test_router().await;
        let (status, body) = get_json(&router, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "online");
        assert!(body["endpoints"].as_array().unwrap().contains(&json!("/finalize")));
    }

    #[tokio::test]
    async fn validate_returns_verdict() {
        let router = test_router().await;
        let (status, body) = post_json(
            &router,
            "/validate",
            json!({"message": "What is 2 + 2?", "sessionId": "s1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["isValid"], true);
        assert_eq!(body["nextStep"], "refinement");
    }

    #[tokio::test]
    async fn session_id_defaults_when_omitted() {
        let router = test_router().await;
        let (status, _) = post_json(&router, "/validate", json!({"message": "What is 2 + 2?"})).await;
        assert_eq!(status, StatusCode::OK);
        let (status, body) = get_json(&router, "/session/default").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["phase"], "validated");
    }

    #[tokio::test]
    async fn full_workflow_round_trip() {
        let router = test_router().await;
        let msg = "What is the derivative of x^2?";

        let (status, _) = post_json(
            &router,
            "/validate",
            json!({"message": msg, "sessionId": "w1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, refined) = post_json(
            &router,
            "/refine",
            json!({"message": msg, "sessionId": "w1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(refined["originalQuestion"], msg);

        let (status, similar) = post_json(
            &router,
            "/check-similarity",
            json!({"message": msg, "sessionId": "w1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(similar["similarQuestions"].is_array());

        let (status, fin) = post_json(
            &router,
            "/finalize",
            json!({"message": msg, "sessionId": "w1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fin["status"], "success");

        let (_, session) = get_json(&router, "/session/w1").await;
        assert_eq!(session["phase"], "finalized");
    }

    #[tokio::test]
    async fn check_similarity_finds_corpus_duplicate() {
        let router = test_router().await;
        let (status, body) = post_json(
            &router,
            "/check-similarity",
            json!({"message": "What is the derivative of x^2?", "sessionId": "s1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let matches = body["similarQuestions"].as_array().unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0]["id"], 1);
        assert_eq!(
            body["message"],
            "Found 1 similar question(s) with >80% similarity."
        );
    }

    #[tokio::test]
    async fn unknown_session_is_explicit_not_found() {
        let router = test_router().await;
        let (status, body) = get_json(&router, "/session/ghost").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "session not found");
    }

    #[tokio::test]
    async fn metrics_endpoint_renders() {
        let router = test_router().await;
        let response = router
            .clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn malformed_body_is_client_error() {
        let router = test_router().await;
        let (status, _) = post_json(&router, "/validate", json!({"wrong": "shape"})).await;
        assert!(status.is_client_error());
    }
}
