//! # mathq-server
//!
//! HTTP surface for the mathq question refinement service.
//!
//! Thin plumbing by design: handlers unmarshal the request, call one
//! [`mathq_workflow::WorkflowController`] operation, and marshal the
//! outcome. All workflow semantics live in mathq-workflow.
//!
//! ## Routes
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /validate` | Phase 1: validate a submission |
//! | `POST /refine` | Phase 2: refine the question |
//! | `POST /check-similarity` | Phase 3: duplicate check |
//! | `POST /finalize` | Commit the final question |
//! | `GET /session/{id}` | Session snapshot |
//! | `GET /` | Health / endpoint listing |
//! | `GET /metrics` | Prometheus text format |

#![deny(unsafe_code)]

pub mod errors;
pub mod recorder;
pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
