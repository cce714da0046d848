//! Phase workflow controller.
//!
//! One controller instance serves all sessions. Operations that commit
//! state (`validate`, `refine`, `finalize`) call the collaborator first and
//! mutate the session only after it succeeds, so a failed request leaves
//! no partial writes behind. `check_similarity` is a pure query.
//!
//! Gating is deliberately loose: `check_similarity` and `finalize` accept
//! raw input text when no refined question exists yet, and `refine` works
//! without a validated session. Phases still only ever move forward.

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, instrument};

use mathq_core::{Phase, SessionState, SimilarityMatch, text};
use mathq_llm::{LanguageService, RefinementContext};

use crate::classifier::SimilarityClassifier;
use crate::errors::Result;
use crate::metric_names;
use crate::session::SessionStore;

/// Outcome of a validation request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    /// Whether the submission was accepted as a mathematical question.
    pub is_valid: bool,
    /// The validator's reason.
    pub feedback: String,
    /// What the client should do next: `refinement` or `revise`.
    pub next_step: String,
}

/// Outcome of a refinement request.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefinementOutcome {
    /// The question the refinement targeted.
    pub original_question: String,
    /// The refined question text.
    pub refined_question: String,
    /// Guidance for the client.
    pub message: String,
}

/// Outcome of a similarity check.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityOutcome {
    /// Near-duplicate corpus questions, descending by score.
    pub similar_questions: Vec<SimilarityMatch>,
    /// Human-readable summary.
    pub message: String,
}

/// Outcome of finalization.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalOutcome {
    /// Always `"success"` when the request completes.
    pub status: String,
    /// Completion message for the client.
    pub message: String,
    /// The finalized question text.
    pub final_question: String,
    /// Final duplicate check results.
    pub similar_questions: Vec<SimilarityMatch>,
}

/// The session-scoped phase state machine.
pub struct WorkflowController {
    sessions: SessionStore,
    classifier: Arc<SimilarityClassifier>,
    language: Arc<dyn LanguageService>,
}

impl WorkflowController {
    /// Create a controller over explicitly-injected collaborators.
    pub fn new(
        sessions: SessionStore,
        classifier: Arc<SimilarityClassifier>,
        language: Arc<dyn LanguageService>,
    ) -> Self {
        Self {
            sessions,
            classifier,
            language,
        }
    }

    /// The session store, for introspection.
    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Phase 1: judge whether `message` is a valid mathematical question.
    ///
    /// On acceptance the text is stored as the session's original question
    /// and the phase advances to at least `Validated`. Rejection mutates
    /// nothing, so validation can be re-entered freely.
    #[instrument(skip(self, message))]
    pub async fn validate(&self, session_id: &str, message: &str) -> Result<ValidationOutcome> {
        info!(preview = %text::preview(message, 50), "validating question");
        record_op("validate");

        let verdict = self
            .language
            .validate(message)
            .await
            .inspect_err(|_| record_error("validate"))?;

        if verdict.accepted {
            let handle = self.sessions.get_or_create(session_id);
            let mut session = handle.lock().await;
            session.original_question = Some(message.to_string());
            session.advance_phase(Phase::Validated);
            session.touch();
        }

        Ok(ValidationOutcome {
            is_valid: verdict.accepted,
            feedback: verdict.feedback,
            next_step: if verdict.accepted {
                "refinement".to_string()
            } else {
                "revise".to_string()
            },
        })
    }

    /// Phase 2: refine the session's question.
    ///
    /// If the session already holds a refinement and `message` differs from
    /// the original question, `message` is treated as user feedback on that
    /// refinement. Otherwise the refinement target is the stored original
    /// question, or `message` itself when the session is new.
    ///
    /// The session lock is held across the language call: concurrent
    /// refinements of the same session serialize instead of clobbering
    /// each other's read-modify-write.
    #[instrument(skip(self, message))]
    pub async fn refine(&self, session_id: &str, message: &str) -> Result<RefinementOutcome> {
        record_op("refine");
        let handle = self.sessions.get_or_create(session_id);
        let mut session = handle.lock().await;

        let original = session
            .original_question
            .clone()
            .unwrap_or_else(|| message.to_string());

        let context = session.refined_question.as_ref().and_then(|prior| {
            (message != original).then(|| RefinementContext {
                prior_refinement: prior.clone(),
                user_feedback: message.to_string(),
            })
        });

        info!(
            preview = %text::preview(&original, 50),
            iterating = context.is_some(),
            "refining question"
        );

        let refined = self
            .language
            .refine(&original, context.as_ref())
            .await
            .inspect_err(|_| record_error("refine"))?;

        session.refined_question = Some(refined.clone());
        session.advance_phase(Phase::Refined);
        session.touch();

        Ok(RefinementOutcome {
            original_question: original,
            refined_question: refined,
            message: "Question has been refined. Please review and either accept or request \
                      changes."
                .to_string(),
        })
    }

    /// Phase 3: check the candidate against the corpus for near-duplicates.
    ///
    /// Stateless: uses the session's refined question when one exists,
    /// falls back to `message`, and never mutates the session.
    #[instrument(skip(self, message))]
    pub async fn check_similarity(
        &self,
        session_id: &str,
        message: &str,
    ) -> Result<SimilarityOutcome> {
        record_op("check_similarity");
        let candidate = self
            .refined_question(session_id)
            .await
            .unwrap_or_else(|| message.to_string());

        let matches = self
            .classifier
            .find_duplicates(&candidate)
            .await
            .inspect_err(|_| record_error("check_similarity"))?;

        Ok(SimilarityOutcome {
            message: summary_message(matches.len()),
            similar_questions: matches,
        })
    }

    /// Final phase: run the duplicate check once more and commit.
    ///
    /// Stores the final question and moves the session to `Finalized`. The
    /// duplicate check runs before any write, so a failing embedder leaves
    /// the session exactly as it was.
    #[instrument(skip(self, message))]
    pub async fn finalize(&self, session_id: &str, message: &str) -> Result<FinalOutcome> {
        record_op("finalize");
        let handle = self.sessions.get_or_create(session_id);
        let mut session = handle.lock().await;

        let final_question = session
            .refined_question
            .clone()
            .unwrap_or_else(|| message.to_string());

        let matches = self
            .classifier
            .find_duplicates(&final_question)
            .await
            .inspect_err(|_| record_error("finalize"))?;

        session.final_question = Some(final_question.clone());
        session.advance_phase(Phase::Finalized);
        session.touch();

        info!(
            preview = %text::preview(&final_question, 50),
            duplicates = matches.len(),
            "question finalized"
        );

        Ok(FinalOutcome {
            status: "success".to_string(),
            message: "Your mathematical question has been successfully refined and finalized!"
                .to_string(),
            final_question,
            similar_questions: matches,
        })
    }

    /// Read a session snapshot, or `None` if the session does not exist.
    pub async fn get_session(&self, session_id: &str) -> Option<SessionState> {
        self.sessions.snapshot(session_id).await
    }

    /// The session's refined question, if the session and field exist.
    async fn refined_question(&self, session_id: &str) -> Option<String> {
        let snapshot = self.sessions.snapshot(session_id).await?;
        snapshot.refined_question
    }
}

/// Summary line matching the count: the threshold is phrased as a
/// percentage for users.
fn summary_message(count: usize) -> String {
    if count > 0 {
        format!("Found {count} similar question(s) with >80% similarity.")
    } else {
        "No highly similar questions found.".to_string()
    }
}

fn record_op(op: &'static str) {
    metrics::counter!(metric_names::WORKFLOW_OPS_TOTAL, "op" => op).increment(1);
}

fn record_error(op: &'static str) {
    metrics::counter!(metric_names::WORKFLOW_ERRORS_TOTAL, "op" => op).increment(1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
