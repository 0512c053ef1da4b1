use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;

use super::domain::{
    ActionItem, Analysis, AnalysisOrigin, NormalizedAnalysis, Swot, PEER_COMPARISON_FALLBACK,
    SUMMARY_FALLBACK,
};
use super::segmenter;
use super::{AnalysisError, ModelOutput};

const PARSE_SAMPLE_CHARS: usize = 280;

/// Turn raw model output into a canonical [`Analysis`].
///
/// Tool-call arguments are parsed leniently: every field is optional and
/// missing ones are defaulted, so a partially filled payload never fails
/// normalization. Free text (including tool-call arguments that are not valid
/// JSON, which happens) goes through staged recovery: fence stripping, comma
/// patching, balanced-prefix truncation, and finally the heuristic section
/// segmenter.
pub fn normalize(output: ModelOutput) -> Result<NormalizedAnalysis, AnalysisError> {
    match output {
        ModelOutput::ToolCall(arguments) => match parse_loose(&arguments) {
            Some(analysis) => Ok(NormalizedAnalysis {
                analysis,
                origin: AnalysisOrigin::Structured,
            }),
            None => recover_from_text(&arguments),
        },
        ModelOutput::Text(text) => recover_from_text(&text),
    }
}

fn recover_from_text(text: &str) -> Result<NormalizedAnalysis, AnalysisError> {
    let stripped = strip_code_fences(text);
    if let Some(analysis) = parse_loose(stripped) {
        return Ok(repaired(analysis));
    }

    let patched = patch_missing_commas(stripped);
    if let Some(analysis) = parse_loose(&patched) {
        return Ok(repaired(analysis));
    }

    if let Some(prefix) = balanced_prefix(&patched) {
        if let Some(analysis) = parse_loose(prefix) {
            return Ok(repaired(analysis));
        }
    }

    match segmenter::segment(text) {
        Some(analysis) => Ok(NormalizedAnalysis {
            analysis,
            origin: AnalysisOrigin::Segmented,
        }),
        None => Err(AnalysisError::Parse {
            sample: text.chars().take(PARSE_SAMPLE_CHARS).collect(),
        }),
    }
}

fn repaired(analysis: Analysis) -> NormalizedAnalysis {
    NormalizedAnalysis {
        analysis,
        origin: AnalysisOrigin::Repaired,
    }
}

fn parse_loose(raw: &str) -> Option<Analysis> {
    serde_json::from_str::<LooseAnalysis>(raw)
        .ok()
        .map(LooseAnalysis::finalize)
}

/// Drop enclosing markdown code fences (```json ... ``` or bare ```).
fn strip_code_fences(text: &str) -> &str {
    let mut trimmed = text.trim();
    if let Some(rest) = trimmed.strip_prefix("```") {
        trimmed = match rest.split_once('\n') {
            Some((_, body)) => body,
            None => rest,
        };
    }
    if let Some(rest) = trimmed.trim_end().strip_suffix("```") {
        trimmed = rest;
    }
    trimmed.trim()
}

/// Insert the comma the model dropped between a closing bracket/brace and the
/// next quoted key. Best-effort: the pattern can in principle fire inside a
/// string value, but a false positive just produces another parse failure and
/// the pipeline moves on to the next stage.
fn patch_missing_commas(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN
        .get_or_init(|| Regex::new(r#"([\]}])\s*("[^"\n]+"\s*:)"#).expect("comma pattern compiles"));
    pattern.replace_all(text, "${1}, ${2}").into_owned()
}

/// Longest prefix at which all braces and brackets balance back to depth zero,
/// string-aware. Recovers JSON the model followed with trailing prose.
fn balanced_prefix(text: &str) -> Option<&str> {
    let mut depth: i64 = 0;
    let mut opened = false;
    let mut in_string = false;
    let mut escaped = false;
    let mut last_balanced_end = None;

    for (index, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' | '[' => {
                depth += 1;
                opened = true;
            }
            '}' | ']' => {
                depth -= 1;
                if depth == 0 && opened {
                    last_balanced_end = Some(index + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    let end = last_balanced_end?;
    if end < text.trim_end().len() {
        Some(&text[..end])
    } else {
        None
    }
}

/// Deserialization shape where everything is optional; [`finalize`] applies
/// the defaulting policy.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LooseAnalysis {
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    peer_comparison: Option<String>,
    #[serde(default)]
    swot: Option<Swot>,
    #[serde(default)]
    recommendations: Option<Vec<LooseItem>>,
    #[serde(default)]
    next_steps: Option<Vec<LooseItem>>,
}

#[derive(Debug, Deserialize)]
struct LooseItem {
    #[serde(default)]
    title: String,
    #[serde(default)]
    content: String,
}

impl LooseAnalysis {
    fn finalize(self) -> Analysis {
        Analysis {
            summary: text_or(self.summary, SUMMARY_FALLBACK),
            peer_comparison: text_or(self.peer_comparison, PEER_COMPARISON_FALLBACK),
            swot: self.swot.unwrap_or_default(),
            recommendations: items(self.recommendations),
            next_steps: items(self.next_steps),
        }
    }
}

fn text_or(value: Option<String>, fallback: &str) -> String {
    match value {
        Some(text) if !text.trim().is_empty() => text,
        _ => fallback.to_string(),
    }
}

fn items(value: Option<Vec<LooseItem>>) -> Vec<ActionItem> {
    value
        .unwrap_or_default()
        .into_iter()
        .map(|item| ActionItem {
            title: item.title,
            content: item.content,
        })
        .collect()
}
