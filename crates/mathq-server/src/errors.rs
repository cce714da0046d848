//! API error mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use mathq_workflow::WorkflowError;

/// Request-level error returned by route handlers.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub WorkflowError);

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            // Collaborator failures are upstream problems
            WorkflowError::Language(_) | WorkflowError::Embedding(_) => StatusCode::BAD_GATEWAY,
            WorkflowError::Index(_) | WorkflowError::Misaligned { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        error!(status = status.as_u16(), err = %self.0, "request failed");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mathq_llm::LlmError;

    #[test]
    fn collaborator_failure_maps_to_bad_gateway() {
        let err = ApiError(WorkflowError::Language(LlmError::MalformedResponse(
            "nonsense".into(),
        )));
        assert_eq!(err.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn misalignment_maps_to_internal_error() {
        let err = ApiError(WorkflowError::Misaligned {
            corpus: 3,
            index: 2,
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
