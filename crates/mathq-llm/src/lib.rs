//! # mathq-llm
//!
//! The language-generation collaborator for mathq: validates that a
//! submission is a well-formed mathematical question, and rewrites accepted
//! questions for clarity.
//!
//! - [`LanguageService`] trait with validate/refine operations
//! - [`openai::OpenAiChatService`]: Chat Completions provider
//! - [`prompts`]: the validator and editor system prompts plus the strict
//!   `VALID:`/`INVALID:` verdict parser
//! - [`MockLanguageService`] for tests
//!
//! ## Crate Position
//!
//! Standalone (no mathq crate dependencies).
//! Depended on by: mathq-workflow, mathq-server.

#![deny(unsafe_code)]

pub mod errors;
pub mod openai;
pub mod prompts;
pub mod service;

pub use errors::{LlmError, Result};
pub use openai::{OpenAiChatConfig, OpenAiChatService};
pub use prompts::parse_verdict;
pub use service::{LanguageService, MockLanguageService, RefinementContext, Verdict};
