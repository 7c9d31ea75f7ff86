//! Insight generation through external services.
//!
//! This module provides a trait-based abstraction for insight providers so
//! the analysis core can ask for natural-language findings without depending
//! on any particular backend. Failures are always recoverable: see
//! [`generate_insights_lenient`].
//!
//! # Feature Flag
//!
//! The concrete HTTP providers require the `ai` feature flag. The
//! [`InsightProvider`] trait and the facade functions are always available.
//!
//! ```toml
//! # Enable HTTP providers (default)
//! tabular_quality = { version = "0.1", features = ["ai"] }
//!
//! # Without HTTP providers
//! tabular_quality = { version = "0.1", default-features = false }
//! ```
//!
//! # Providers
//!
//! - [`OpenAiProvider`] - OpenAI chat completions (requires `ai` feature)
//! - [`InsightServiceProvider`] - a remote service speaking the
//!   `{stats, metrics, sampleRows}` → `{insights}` contract (requires `ai` feature)

mod insights;
mod provider;

pub use insights::{
    InsightOutcome, generate_insights, generate_insights_lenient, split_insight_text,
};
pub use provider::{InsightProvider, InsightRequest};

#[cfg(feature = "ai")]
mod openai;
#[cfg(feature = "ai")]
mod service;
#[cfg(all(test, feature = "ai"))]
mod test_server;

#[cfg(feature = "ai")]
pub use openai::{API_KEY_ENV, OpenAiConfig, OpenAiConfigBuilder, OpenAiProvider};
#[cfg(feature = "ai")]
pub use service::{InsightServiceConfig, InsightServiceProvider, SERVICE_URL_ENV};

#[cfg(feature = "ai")]
static_assertions::assert_impl_all!(OpenAiProvider: Send, Sync);
#[cfg(feature = "ai")]
static_assertions::assert_impl_all!(InsightServiceProvider: Send, Sync);
