//! Shared application state.

use std::sync::Arc;

use metrics_exporter_prometheus::PrometheusHandle;

use mathq_workflow::WorkflowController;

/// State shared by all request handlers.
///
/// Everything inside is either `Arc`'d or cheaply cloneable; axum clones
/// the state per request.
#[derive(Clone)]
pub struct AppState {
    /// The workflow controller serving all sessions.
    pub controller: Arc<WorkflowController>,
    /// Handle used to render `/metrics`.
    pub prometheus: PrometheusHandle,
}

impl AppState {
    /// Bundle the controller and metrics handle.
    pub fn new(controller: Arc<WorkflowController>, prometheus: PrometheusHandle) -> Self {
        Self {
            controller,
            prometheus,
        }
    }
}
