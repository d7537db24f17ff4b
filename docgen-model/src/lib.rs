//! # docgen-model
//!
//! [`TextGenerator`](docgen_core::TextGenerator) implementations:
//!
//! - [`GeminiGenerator`] - Gemini `generateContent` over REST
//! - [`MockGenerator`] - Canned replies for tests and offline runs

pub mod config;
pub mod gemini;
pub mod mock;

pub use config::{DEFAULT_MODEL, GEMINI_API_BASE, GeminiConfig};
pub use gemini::GeminiGenerator;
pub use mock::MockGenerator;
