use serde::{Deserialize, Serialize};

pub const SUMMARY_FALLBACK: &str = "Analysis summary not available.";
pub const PEER_COMPARISON_FALLBACK: &str = "Peer comparison not available.";

/// The canonical narrative report. Immutable once produced; every field is
/// populated, with placeholder text or empty lists standing in for anything
/// the model omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub summary: String,
    pub peer_comparison: String,
    pub swot: Swot,
    pub recommendations: Vec<ActionItem>,
    pub next_steps: Vec<ActionItem>,
}

/// Strengths/Weaknesses/Opportunities/Threats lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Swot {
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
    #[serde(default)]
    pub opportunities: Vec<String>,
    #[serde(default)]
    pub threats: Vec<String>,
}

impl Swot {
    pub fn is_empty(&self) -> bool {
        self.strengths.is_empty()
            && self.weaknesses.is_empty()
            && self.opportunities.is_empty()
            && self.threats.is_empty()
    }
}

/// A titled recommendation or implementation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionItem {
    pub title: String,
    pub content: String,
}

/// How much massaging the model output needed before it became an
/// [`Analysis`]. Lets callers weigh a segmenter-recovered report differently
/// from a schema-constrained one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisOrigin {
    /// Parsed directly from the provider's tool-call arguments.
    Structured,
    /// Free text that parsed as JSON only after fence stripping, comma
    /// patching, or balanced-prefix truncation.
    Repaired,
    /// Recovered by the heuristic section segmenter.
    Segmented,
}

/// An analysis together with its recovery provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedAnalysis {
    #[serde(flatten)]
    pub analysis: Analysis,
    pub origin: AnalysisOrigin,
}
