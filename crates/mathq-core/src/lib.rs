//! # mathq-core
//!
//! Foundation types for the mathq question refinement service.
//!
//! This crate provides the shared vocabulary that all other mathq crates
//! depend on:
//!
//! - **Corpus**: [`corpus::CorpusQuestion`] reference questions and the JSON loader
//! - **Phases**: [`phase::Phase`] forward-only session lifecycle enum
//! - **Sessions**: [`session::SessionState`] per-session workflow state
//! - **Matches**: [`similarity::SimilarityMatch`] transient near-duplicate results
//! - **Text**: UTF-8–safe truncation helpers for log previews
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other mathq crates.

#![deny(unsafe_code)]

pub mod corpus;
pub mod phase;
pub mod session;
pub mod similarity;
pub mod text;

pub use corpus::{CorpusError, CorpusQuestion, load_corpus};
pub use phase::Phase;
pub use session::SessionState;
pub use similarity::SimilarityMatch;
