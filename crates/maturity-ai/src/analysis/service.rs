use std::sync::Arc;

use tracing::{debug, info, warn};

use super::client::CompletionClient;
use super::domain::NormalizedAnalysis;
use super::normalizer::normalize;
use super::prompt::AnalysisPrompt;
use super::AnalysisError;
use crate::assessment::{MaturityTier, RespondentProfile, Scores};
use crate::diagnostics::{DiagnosticSink, ErrorReport};

pub const ANALYSIS_GENERATION_ERROR: &str = "ANALYSIS_GENERATION_ERROR";

/// A pipeline failure paired with the diagnostic correlation id, when the
/// report was actually recorded. The id is absent if the sink itself failed;
/// the original error still propagates unchanged either way.
#[derive(Debug)]
pub struct AnalysisFailure {
    pub error: AnalysisError,
    pub error_id: Option<String>,
}

/// Owns the prompt → completion → normalize pipeline for one submission.
pub struct AnalysisService<C> {
    client: Arc<C>,
    diagnostics: Arc<dyn DiagnosticSink>,
}

impl<C> AnalysisService<C>
where
    C: CompletionClient + 'static,
{
    pub fn new(client: Arc<C>, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            client,
            diagnostics,
        }
    }

    /// Run the generation pipeline once. No automatic retry happens here;
    /// retryable failures are surfaced for the caller to act on.
    pub async fn generate(
        &self,
        profile: &RespondentProfile,
        scores: &Scores,
        tier: MaturityTier,
    ) -> Result<NormalizedAnalysis, AnalysisFailure> {
        let prompt = AnalysisPrompt::build(profile, scores, tier);
        debug!(
            tier = tier.label(),
            overall = scores.overall,
            "requesting analysis from completion provider"
        );

        let outcome = match self.client.request_analysis(&prompt).await {
            Ok(output) => normalize(output),
            Err(error) => Err(error),
        };

        match outcome {
            Ok(normalized) => {
                info!(origin = ?normalized.origin, "analysis generated");
                Ok(normalized)
            }
            Err(error) => {
                warn!(kind = error.kind(), %error, "analysis generation failed");
                let error_id = self.record_failure(&error, profile);
                Err(AnalysisFailure { error, error_id })
            }
        }
    }

    fn record_failure(&self, error: &AnalysisError, profile: &RespondentProfile) -> Option<String> {
        let mut report = ErrorReport::new(ANALYSIS_GENERATION_ERROR, error.to_string());
        report.detail = match error {
            AnalysisError::Parse { sample } => Some(sample.clone()),
            _ => None,
        };
        if !profile.company_name.trim().is_empty() {
            report.company_name = Some(profile.company_name.clone());
        }

        let id = report.id.clone();
        match self.diagnostics.record(report) {
            Ok(()) => Some(id),
            Err(sink_error) => {
                warn!(%sink_error, "failed to record diagnostic report");
                None
            }
        }
    }
}
