//! System prompts and verdict parsing for the validator and editor roles.

use crate::errors::{LlmError, Result};
use crate::service::{RefinementContext, Verdict};

/// System prompt for the validation role.
///
/// The reply format is load-bearing: [`parse_verdict`] accepts nothing but
/// the two prefixes this prompt demands.
pub const VALIDATOR_SYSTEM_PROMPT: &str = "\
You are a mathematical question validator. Your task is to determine if the given text is a valid mathematical question.

A valid mathematical question should:
1. Ask about mathematical concepts, calculations, proofs, or problem-solving
2. Be clear and understandable
3. Relate to mathematics (arithmetic, algebra, calculus, geometry, topology, analysis, etc.)
4. Have a clear question or task

Respond in this exact format:
VALID: [brief reason]
or
INVALID: [specific reason why it's not valid and what needs to be fixed]";

/// System prompt for the refinement role.
pub const EDITOR_SYSTEM_PROMPT: &str = "\
You are a mathematical question editor. Your task is to refine mathematical questions for clarity, grammar, and proper formatting.

Please improve the question by:
1. Correcting any grammatical errors
2. Improving clarity and precision
3. Using proper mathematical notation and symbols
4. Ensuring the question is well-structured
5. Maintaining the original intent and difficulty level

Provide ONLY the refined question without any preamble or explanation.";

/// Build the user message for a validation call.
pub fn validation_user_message(text: &str) -> String {
    format!("Text to validate: {text}")
}

/// Build the user message for a refinement call.
///
/// When `context` is present, the prior refinement and the user's feedback
/// on it are included so the editor iterates instead of starting over.
pub fn refinement_user_message(target: &str, context: Option<&RefinementContext>) -> String {
    let refinement_context = match context {
        Some(ctx) => format!(
            "\nPrevious refined version: {}\nUser feedback: {}\n\nPlease incorporate the user's feedback to further improve the question.\n",
            ctx.prior_refinement, ctx.user_feedback
        ),
        None => String::new(),
    };
    format!("Original question: {target}\n{refinement_context}\nRefined question:")
}

/// Parse the validator's reply into a [`Verdict`].
///
/// Fails closed: a reply matching neither `VALID:` nor `INVALID:` is a
/// malformed response, never a guessed verdict.
pub fn parse_verdict(reply: &str) -> Result<Verdict> {
    let reply = reply.trim();
    if let Some(rest) = reply.strip_prefix("VALID:") {
        return Ok(Verdict {
            accepted: true,
            feedback: rest.trim().to_string(),
        });
    }
    if let Some(rest) = reply.strip_prefix("INVALID:") {
        return Ok(Verdict {
            accepted: false,
            feedback: rest.trim().to_string(),
        });
    }
    Err(LlmError::MalformedResponse(format!(
        "validation reply matches neither VALID: nor INVALID: ({})",
        reply_preview(reply)
    )))
}

/// First few words of a reply for error messages, char-boundary safe.
fn reply_preview(reply: &str) -> &str {
    let mut end = reply.len().min(80);
    while end > 0 && !reply.is_char_boundary(end) {
        end -= 1;
    }
    &reply[..end]
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_prefix_accepted() {
        let v = parse_verdict("VALID: clear calculus question").unwrap();
        assert!(v.accepted);
        assert_eq!(v.feedback, "clear calculus question");
    }

    #[test]
    fn invalid_prefix_rejected() {
        let v = parse_verdict("INVALID: not about mathematics").unwrap();
        assert!(!v.accepted);
        assert_eq!(v.feedback, "not about mathematics");
    }

    #[test]
    fn surrounding_whitespace_tolerated() {
        let v = parse_verdict("  VALID: fine \n").unwrap();
        assert!(v.accepted);
        assert_eq!(v.feedback, "fine");
    }

    #[test]
    fn missing_colon_fails_closed() {
        assert!(parse_verdict("VALID looks good").is_err());
    }

    #[test]
    fn freeform_reply_fails_closed() {
        let err = parse_verdict("Sure! That's a great question.").unwrap_err();
        assert!(matches!(err, LlmError::MalformedResponse(_)));
    }

    #[test]
    fn empty_reply_fails_closed() {
        assert!(parse_verdict("").is_err());
    }

    #[test]
    fn refinement_message_without_context() {
        let msg = refinement_user_message("What is 2+2?", None);
        assert!(msg.starts_with("Original question: What is 2+2?"));
        assert!(msg.ends_with("Refined question:"));
        assert!(!msg.contains("Previous refined version"));
    }

    #[test]
    fn refinement_message_with_context() {
        let ctx = RefinementContext {
            prior_refinement: "What is 2 + 2?".into(),
            user_feedback: "make it about 3s".into(),
        };
        let msg = refinement_user_message("what is 2+2", Some(&ctx));
        assert!(msg.contains("Previous refined version: What is 2 + 2?"));
        assert!(msg.contains("User feedback: make it about 3s"));
    }
}
