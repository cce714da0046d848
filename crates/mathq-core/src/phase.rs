//! Session workflow phases.

use serde::{Deserialize, Serialize};

/// The per-session workflow phase.
///
/// Phases only move forward: `Unvalidated → Validated → Refined →
/// Finalized`. Similarity checking is a stateless query and has no phase of
/// its own. Use [`Phase::advanced_to`] for transitions so an out-of-order
/// operation can never regress a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// No accepted question yet.
    #[default]
    Unvalidated,
    /// The original question was accepted by the validator.
    Validated,
    /// At least one refinement has been produced.
    Refined,
    /// The question was finalized. Terminal.
    Finalized,
}

impl Phase {
    /// Return the later of `self` and `target`.
    ///
    /// Operations that commit state call this instead of assigning
    /// directly, which is what makes the forward-only invariant hold even
    /// under loosely-ordered requests.
    #[must_use]
    pub fn advanced_to(self, target: Phase) -> Phase {
        self.max(target)
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Phase::Unvalidated => "unvalidated",
            Phase::Validated => "validated",
            Phase::Refined => "refined",
            Phase::Finalized => "finalized",
        };
        f.write_str(s)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
