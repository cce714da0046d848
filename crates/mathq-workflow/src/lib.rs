//! # mathq-workflow
//!
//! The phase state machine and duplicate detection core of mathq:
//!
//! - [`SessionStore`]: bounded, per-key-serialized session state
//! - [`SimilarityClassifier`]: embedding + index + threshold policy
//! - [`WorkflowController`]: validate → refine → check-similarity → finalize
//!
//! The controller owns all session mutation. Collaborator failures are
//! request-level errors and never leave a session partially written.
//!
//! ## Crate Position
//!
//! Depends on: mathq-core, mathq-embeddings, mathq-llm.
//! Depended on by: mathq-server.

#![deny(unsafe_code)]

pub mod classifier;
pub mod controller;
pub mod errors;
pub mod metric_names;
pub mod session;

pub use classifier::SimilarityClassifier;
pub use controller::{
    FinalOutcome, RefinementOutcome, SimilarityOutcome, ValidationOutcome, WorkflowController,
};
pub use errors::{Result, WorkflowError};
pub use session::SessionStore;
