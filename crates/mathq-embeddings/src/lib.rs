//! # mathq-embeddings
//!
//! Text embeddings and nearest-neighbor search for mathq:
//!
//! - [`EmbeddingService`] trait with an OpenAI `/v1/embeddings` client and a
//!   deterministic SHA-256 mock for tests
//! - L2 normalization helpers (inner product == cosine on unit vectors)
//! - [`VectorIndex`]: flat, build-once, brute-force top-k inner-product index
//!
//! ## Crate Position
//!
//! Standalone (no mathq crate dependencies).
//! Depended on by: mathq-workflow, mathq-server.

#![deny(unsafe_code)]

pub mod errors;
pub mod index;
pub mod normalize;
pub mod openai;
pub mod service;

pub use errors::{EmbeddingError, IndexError, Result};
pub use index::VectorIndex;
pub use normalize::{cosine_similarity, l2_norm, l2_normalize};
pub use openai::{OpenAiEmbeddingConfig, OpenAiEmbeddingService};
pub use service::{EmbeddingService, MockEmbeddingService};
