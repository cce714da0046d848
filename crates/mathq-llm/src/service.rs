//! Language service trait and mock implementation.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::errors::{LlmError, Result};

/// The validator's decision about a submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    /// Whether the text is a well-formed mathematical question.
    pub accepted: bool,
    /// The validator's reason, shown to the user either way.
    pub feedback: String,
}

/// Context for an iterative refinement pass.
///
/// Present when the user has already seen a refinement and replied with
/// feedback; the editor is asked to incorporate it rather than start over.
#[derive(Clone, Debug)]
pub struct RefinementContext {
    /// The previous refined version.
    pub prior_refinement: String,
    /// The user's feedback on it.
    pub user_feedback: String,
}

/// Trait for the language-generation collaborator.
#[async_trait]
pub trait LanguageService: Send + Sync {
    /// Judge whether `text` is a valid mathematical question.
    async fn validate(&self, text: &str) -> Result<Verdict>;

    /// Rewrite `text` for clarity, optionally incorporating feedback on a
    /// prior refinement.
    async fn refine(&self, text: &str, context: Option<&RefinementContext>) -> Result<String>;
}

/// Mock language service for testing.
///
/// Accepts any text containing a question mark and refines by prefixing,
/// which keeps workflow tests deterministic without canned transcripts.
pub struct MockLanguageService {
    failing: Mutex<bool>,
    refinements: Mutex<u32>,
}

impl MockLanguageService {
    /// Create a new mock service.
    pub fn new() -> Self {
        Self {
            failing: Mutex::new(false),
            refinements: Mutex::new(0),
        }
    }

    /// Make every subsequent call fail, for collaborator-failure tests.
    pub fn set_failing(&self, failing: bool) {
        *self.failing.lock() = failing;
    }

    fn check_failing(&self) -> Result<()> {
        if *self.failing.lock() {
            return Err(LlmError::Api {
                status: 500,
                message: "mock failure injected".into(),
            });
        }
        Ok(())
    }
}

impl Default for MockLanguageService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LanguageService for MockLanguageService {
    async fn validate(&self, text: &str) -> Result<Verdict> {
        self.check_failing()?;
        if text.contains('?') {
            Ok(Verdict {
                accepted: true,
                feedback: "clear mathematical question".into(),
            })
        } else {
            Ok(Verdict {
                accepted: false,
                feedback: "not phrased as a question".into(),
            })
        }
    }

    async fn refine(&self, text: &str, context: Option<&RefinementContext>) -> Result<String> {
        self.check_failing()?;
        let mut count = self.refinements.lock();
        *count += 1;
        match context {
            Some(ctx) => Ok(format!(
                "{} (revised per: {})",
                ctx.prior_refinement, ctx.user_feedback
            )),
            None => Ok(format!("[refined v{}] {text}", count)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mock_accepts_questions() {
        let svc = MockLanguageService::new();
        let verdict = svc.validate("What is 2 + 2?").await.unwrap();
        assert!(verdict.accepted);
    }

    #[tokio::test]
    async fn mock_rejects_statements() {
        let svc = MockLanguageService::new();
        let verdict = svc.validate("the sky is blue").await.unwrap();
        assert!(!verdict.accepted);
        assert!(!verdict.feedback.is_empty());
    }

    #[tokio::test]
    async fn mock_refine_without_context_marks_version() {
        let svc = MockLanguageService::new();
        let first = svc.refine("What is 2 + 2?", None).await.unwrap();
        let second = svc.refine("What is 2 + 2?", None).await.unwrap();
        assert_ne!(first, second);
        assert!(first.contains("What is 2 + 2?"));
    }

    #[tokio::test]
    async fn mock_refine_with_context_incorporates_feedback() {
        let svc = MockLanguageService::new();
        let ctx = RefinementContext {
            prior_refinement: "What is 2 + 2?".into(),
            user_feedback: "use formal notation".into(),
        };
        let refined = svc.refine("ignored", Some(&ctx)).await.unwrap();
        assert!(refined.contains("use formal notation"));
    }

    #[tokio::test]
    async fn mock_failure_injection() {
        let svc = MockLanguageService::new();
        svc.set_failing(true);
        assert!(svc.validate("What?").await.is_err());
        assert!(svc.refine("What?", None).await.is_err());
    }
}
