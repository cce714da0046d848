//! # mathq-settings
//!
//! Configuration with layered sources for the mathq service.
//!
//! Settings are loaded from three layers (in priority order):
//! 1. **Compiled defaults**: [`MathqSettings::default()`]
//! 2. **Settings file**: optional JSON file (partial files allowed; missing
//!    fields fall back to defaults via serde)
//! 3. **Environment variables**: `MATHQ_*` overrides (highest priority)
//!
//! The OpenAI API key is deliberately not part of this type: it is read
//! from `OPENAI_API_KEY` at startup and never written to disk.
//!
//! There is no global singleton. Settings are loaded once in `main` and
//! passed into the components that need them.

#![deny(unsafe_code)]

pub mod errors;
pub mod loader;
pub mod types;

pub use errors::{Result, SettingsError};
pub use loader::{apply_env_overrides, load_settings, load_settings_from_path};
pub use types::{
    CorpusSettings, MathqSettings, OpenAiSettings, ServerSettings, SessionSettings,
    SimilaritySettings,
};
