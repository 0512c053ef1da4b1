//! Narrative report generation: prompt construction, the completion client,
//! and tolerant normalization of whatever the model sends back.
//!
//! The provider is asked for a schema-constrained tool call, but that
//! guarantee is not absolute, so normalization keeps a layered free-text
//! recovery path behind it. Callers can tell the two apart through
//! [`AnalysisOrigin`].

pub mod client;
pub mod domain;
pub mod normalizer;
pub mod prompt;
pub(crate) mod segmenter;
pub mod service;

pub use client::{CompletionClient, ModelOutput, OpenAiClient};
pub use domain::{ActionItem, Analysis, AnalysisOrigin, NormalizedAnalysis, Swot};
pub use normalizer::normalize;
pub use prompt::{AnalysisPrompt, ANALYSIS_TOOL_NAME};
pub use service::{AnalysisFailure, AnalysisService};

/// Failure taxonomy for the generation pipeline. Retryability is a signal
/// surfaced to the caller, never an automatic retry loop: completions are
/// costly and the decision to spend again belongs to the end user.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalysisError {
    #[error("completion provider credential is not configured")]
    ServiceUnavailable,
    #[error("completion provider returned status {status}")]
    Upstream { status: u16 },
    #[error("completion response carried no tool call and no content")]
    UnexpectedFormat,
    #[error("completion request failed: {0}")]
    Network(String),
    #[error("model output could not be parsed after repair attempts")]
    Parse { sample: String },
}

impl AnalysisError {
    pub fn retryable(&self) -> bool {
        !matches!(self, Self::ServiceUnavailable)
    }

    /// Stable identifier used in diagnostics records.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::UnexpectedFormat => "UNEXPECTED_FORMAT",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Parse { .. } => "PARSE_ERROR",
        }
    }

    /// Message safe to show the end user, matching the support guidance for
    /// each failure class.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable => {
                "Analysis service is currently unavailable. Please contact support for assistance."
            }
            Self::Upstream { .. } => {
                "Analysis service temporarily unavailable. Please try again in a moment."
            }
            Self::UnexpectedFormat => {
                "Analysis service returned unexpected format. Please try again."
            }
            Self::Network(_) => {
                "Unable to connect to analysis service. Please try again in a moment."
            }
            Self::Parse { .. } => {
                "Unable to process analysis request. Please try again in a moment."
            }
        }
    }
}
