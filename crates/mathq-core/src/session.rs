//! Per-session workflow state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// State accumulated by one refinement session.
///
/// Created lazily on first reference and mutated only by the workflow
/// controller. The similarity subsystem never touches this type.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    /// Opaque client-supplied session identifier.
    pub session_id: String,
    /// The question text as originally accepted by validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_question: Option<String>,
    /// The most recent refinement produced for this session.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refined_question: Option<String>,
    /// The finalized question text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_question: Option<String>,
    /// Current workflow phase; only ever advances.
    pub phase: Phase,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session was last touched by any operation. Drives
    /// least-recently-active eviction in the bounded store.
    pub last_active: DateTime<Utc>,
}

impl SessionState {
    /// Create a fresh unvalidated session.
    pub fn new(session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            session_id: session_id.into(),
            original_question: None,
            refined_question: None,
            final_question: None,
            phase: Phase::Unvalidated,
            created_at: now,
            last_active: now,
        }
    }

    /// Advance the phase, keeping the forward-only invariant.
    pub fn advance_phase(&mut self, target: Phase) {
        self.phase = self.phase.advanced_to(target);
    }

    /// Record that an operation touched this session.
    pub fn touch(&mut self) {
        self.last_active = Utc::now();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_unvalidated_and_empty() {
        let s = SessionState::new("s1");
        assert_eq!(s.session_id, "s1");
        assert_eq!(s.phase, Phase::Unvalidated);
        assert!(s.original_question.is_none());
        assert!(s.refined_question.is_none());
        assert!(s.final_question.is_none());
    }

    #[test]
    fn advance_phase_never_regresses() {
        let mut s = SessionState::new("s1");
        s.advance_phase(Phase::Refined);
        s.advance_phase(Phase::Validated);
        assert_eq!(s.phase, Phase::Refined);
    }

    #[test]
    fn touch_moves_last_active_forward() {
        let mut s = SessionState::new("s1");
        let before = s.last_active;
        s.touch();
        assert!(s.last_active >= before);
    }

    #[test]
    fn snapshot_omits_unset_questions() {
        let s = SessionState::new("s1");
        let json = serde_json::to_value(&s).unwrap();
        assert!(json.get("originalQuestion").is_none());
        assert_eq!(json["phase"], "unvalidated");
    }
}
