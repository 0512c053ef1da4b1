//! Last-resort recovery for fully unstructured model output.
//!
//! Scans the text line by line for numbered section headers, accumulates
//! content into the active section, and extracts list items with bullet and
//! numbered-title patterns. Best-effort by nature: the goal is maximum usable
//! structure, not fidelity.

use std::sync::OnceLock;

use regex::Regex;

use super::domain::{ActionItem, Analysis, Swot, PEER_COMPARISON_FALLBACK, SUMMARY_FALLBACK};

const MAX_LIST_ITEMS: usize = 4;
const MIN_BULLET_CHARS: usize = 10;
const MIN_SENTENCE_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Summary,
    PeerComparison,
    Swot,
    Recommendations,
    NextSteps,
    CallToAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SwotElement {
    Strengths,
    Weaknesses,
    Opportunities,
    Threats,
}

/// Extract an [`Analysis`] from sectioned prose, or `None` when no usable
/// section was found.
pub(crate) fn segment(text: &str) -> Option<Analysis> {
    let mut state = SegmenterState::default();

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(next) = detect_section(trimmed) {
            state.flush();
            state.section = next;
            state.swot_element = None;
            continue;
        }

        if state.section == Section::Swot {
            if let Some(element) = detect_swot_element(trimmed) {
                state.flush();
                state.swot_element = Some(element);
                continue;
            }
        }

        // Dividers and markdown headings are noise, not content.
        if trimmed == "---" || trimmed.starts_with("###") || trimmed.len() < 3 {
            continue;
        }

        state.buffer.push(trimmed.to_string());
    }

    state.flush();
    state.finish()
}

#[derive(Default)]
struct SegmenterState {
    summary: String,
    peer_comparison: String,
    swot: Swot,
    recommendations: Vec<ActionItem>,
    next_steps: Vec<ActionItem>,
    section: Section,
    swot_element: Option<SwotElement>,
    buffer: Vec<String>,
}

impl Default for Section {
    fn default() -> Self {
        Self::None
    }
}

impl SegmenterState {
    /// Commit the accumulated buffer to the active section.
    fn flush(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        match self.section {
            Section::Summary => self.summary = self.buffer.join(" ").trim().to_string(),
            Section::PeerComparison => {
                self.peer_comparison = self.buffer.join(" ").trim().to_string();
            }
            Section::Swot => {
                if let Some(element) = self.swot_element.take() {
                    let items = extract_list_items(&self.buffer.join("\n"));
                    if !items.is_empty() {
                        match element {
                            SwotElement::Strengths => self.swot.strengths = items,
                            SwotElement::Weaknesses => self.swot.weaknesses = items,
                            SwotElement::Opportunities => self.swot.opportunities = items,
                            SwotElement::Threats => self.swot.threats = items,
                        }
                    }
                }
            }
            Section::Recommendations => {
                let content = self.buffer.join(" ").trim().to_string();
                let parsed = parse_structured_items(&content, "Recommendation");
                self.recommendations = if parsed.is_empty() {
                    vec![ActionItem {
                        title: "Strategic Recommendations".to_string(),
                        content,
                    }]
                } else {
                    parsed
                };
            }
            Section::NextSteps => {
                let content = self.buffer.join(" ").trim().to_string();
                let parsed = parse_structured_items(&content, "Phase");
                self.next_steps = if parsed.is_empty() {
                    vec![ActionItem {
                        title: "Next Steps".to_string(),
                        content,
                    }]
                } else {
                    parsed
                };
            }
            Section::CallToAction => {
                if self.recommendations.is_empty() {
                    self.recommendations.push(ActionItem {
                        title: "Call to Action".to_string(),
                        content: self.buffer.join(" ").trim().to_string(),
                    });
                }
            }
            Section::None => {}
        }
        self.buffer.clear();
    }

    fn finish(self) -> Option<Analysis> {
        if self.summary.is_empty()
            && self.peer_comparison.is_empty()
            && self.swot.is_empty()
            && self.recommendations.is_empty()
            && self.next_steps.is_empty()
        {
            return None;
        }

        Some(Analysis {
            summary: non_empty(self.summary, SUMMARY_FALLBACK),
            peer_comparison: non_empty(self.peer_comparison, PEER_COMPARISON_FALLBACK),
            swot: self.swot,
            recommendations: self.recommendations,
            next_steps: self.next_steps,
        })
    }
}

fn non_empty(value: String, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value
    }
}

fn detect_section(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    if line.contains("1.") && lower.contains("summary") {
        Some(Section::Summary)
    } else if line.contains("2.") && (lower.contains("peer") || lower.contains("comparison")) {
        Some(Section::PeerComparison)
    } else if line.contains("3.") && lower.contains("swot") {
        Some(Section::Swot)
    } else if line.contains("4.")
        && (lower.contains("strategic") || lower.contains("recommendation"))
    {
        Some(Section::Recommendations)
    } else if line.contains("5.") && (lower.contains("next steps") || lower.contains("roadmap")) {
        Some(Section::NextSteps)
    } else if line.contains("6.") && (lower.contains("call") || lower.contains("action")) {
        Some(Section::CallToAction)
    } else {
        None
    }
}

fn detect_swot_element(line: &str) -> Option<SwotElement> {
    let lower = line.to_lowercase();
    let matches =
        |keyword: &str| lower.contains(&format!("**{keyword}**")) || lower.starts_with(keyword);
    if matches("strengths") {
        Some(SwotElement::Strengths)
    } else if matches("weaknesses") {
        Some(SwotElement::Weaknesses)
    } else if matches("opportunities") {
        Some(SwotElement::Opportunities)
    } else if matches("threats") {
        Some(SwotElement::Threats)
    } else {
        None
    }
}

/// Pull bullet or numbered items out of accumulated text; absent any, fall
/// back to the first few substantial sentences.
fn extract_list_items(text: &str) -> Vec<String> {
    static BULLET: OnceLock<Regex> = OnceLock::new();
    let bullet = BULLET.get_or_init(|| {
        Regex::new(r"(?m)^\s*(?:[-•*]|\d+\.)\s*(.+)$").expect("bullet pattern compiles")
    });

    let items: Vec<String> = bullet
        .captures_iter(text)
        .filter_map(|captures| captures.get(1))
        .map(|item| item.as_str().trim().to_string())
        .filter(|item| item.len() > MIN_BULLET_CHARS)
        .take(MAX_LIST_ITEMS)
        .collect();

    if !items.is_empty() {
        return items;
    }

    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|sentence| sentence.len() > MIN_SENTENCE_CHARS)
        .take(3)
        .map(str::to_string)
        .collect()
}

/// Parse "N. **Title**: content" items, then "Phase N (range): content"
/// phases, then bare "N. content" entries with generated titles.
fn parse_structured_items(text: &str, default_prefix: &str) -> Vec<ActionItem> {
    static TITLED: OnceLock<Regex> = OnceLock::new();
    static PHASE: OnceLock<Regex> = OnceLock::new();
    static NUMBERED: OnceLock<Regex> = OnceLock::new();

    let titled = TITLED.get_or_init(|| {
        Regex::new(r"\d+\.\s*\*\*([^*]+)\*\*:\s*").expect("titled pattern compiles")
    });
    let phase = PHASE.get_or_init(|| {
        Regex::new(r"Phase\s+(\d+)\s*\(([^)]+)\):\s*").expect("phase pattern compiles")
    });
    let numbered =
        NUMBERED.get_or_init(|| Regex::new(r"\d+\.\s+").expect("numbered pattern compiles"));

    let items = split_on_matches(text, titled, |captures| {
        captures
            .get(1)
            .map(|title| title.as_str().trim().to_string())
    });
    if !items.is_empty() {
        return items;
    }

    let items = split_on_matches(text, phase, |captures| {
        match (captures.get(1), captures.get(2)) {
            (Some(number), Some(range)) => {
                Some(format!("Phase {} ({})", number.as_str(), range.as_str()))
            }
            _ => None,
        }
    });
    if !items.is_empty() {
        return items;
    }

    split_on_matches(text, numbered, |_| None)
        .into_iter()
        .enumerate()
        .map(|(index, item)| ActionItem {
            title: format!("{} {}", default_prefix, index + 1),
            content: item.content,
        })
        .collect()
}

/// The regex crate has no lookahead, so item boundaries are recovered by
/// slicing the text between successive header matches.
fn split_on_matches(
    text: &str,
    pattern: &Regex,
    title_for: impl Fn(&regex::Captures<'_>) -> Option<String>,
) -> Vec<ActionItem> {
    let matches: Vec<(usize, usize, Option<String>)> = pattern
        .captures_iter(text)
        .filter_map(|captures| {
            let whole = captures.get(0)?;
            Some((whole.start(), whole.end(), title_for(&captures)))
        })
        .collect();

    let mut items = Vec::new();
    for (position, (_, end, title)) in matches.iter().enumerate() {
        let content_end = matches
            .get(position + 1)
            .map(|(next_start, _, _)| *next_start)
            .unwrap_or(text.len());
        let content = text[*end..content_end].trim().to_string();
        if content.is_empty() {
            continue;
        }
        items.push(ActionItem {
            title: title.clone().unwrap_or_default(),
            content,
        });
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECTIONED_REPORT: &str = "\
1. Executive Summary
The organization shows a developing data posture with clear executive interest.

2. Peer Comparison
Slightly behind similar-sized healthcare organizations.

3. SWOT Analysis
**Strengths**
- Executive sponsorship is secured and funded for the year
- Analysts already deliver self-service dashboards to operations
**Weaknesses**
- No formal data stewardship roles exist across domains
- Quality issues are found by consumers rather than monitoring

4. Strategic Recommendations
1. **Stand up a governance council**: Charter domain owners and publish decision rights.
2. **Instrument data quality**: Automate profiling on the five critical datasets.

5. Next Steps Roadmap
Phase 1 (0-3 months): Baseline quality metrics and name domain stewards.
Phase 2 (3-6 months): Consolidate reporting onto the warehouse.
";

    #[test]
    fn sectioned_report_is_fully_segmented() {
        let analysis = segment(SECTIONED_REPORT).expect("sections recovered");

        assert!(analysis.summary.contains("developing data posture"));
        assert!(analysis.peer_comparison.contains("healthcare"));
        assert_eq!(analysis.swot.strengths.len(), 2);
        assert!(analysis.swot.strengths[0].contains("Executive sponsorship"));
        assert_eq!(analysis.swot.weaknesses.len(), 2);

        assert_eq!(analysis.recommendations.len(), 2);
        assert_eq!(
            analysis.recommendations[0].title,
            "Stand up a governance council"
        );
        assert!(analysis.recommendations[0]
            .content
            .contains("decision rights"));

        assert_eq!(analysis.next_steps.len(), 2);
        assert_eq!(analysis.next_steps[0].title, "Phase 1 (0-3 months)");
        assert!(analysis.next_steps[1].content.contains("warehouse"));
    }

    #[test]
    fn swot_without_bullets_falls_back_to_sentences() {
        let text = "\
3. SWOT Analysis
**Strengths**
Leadership funds the data program generously. Teams collaborate well across functions. Tooling is current.
";
        let analysis = segment(text).expect("sentences recovered");
        assert_eq!(analysis.swot.strengths.len(), 2);
        assert!(analysis.swot.strengths[0].contains("Leadership funds"));
    }

    #[test]
    fn unparseable_section_collapses_to_a_catch_all_item() {
        let text = "\
4. Strategic Recommendations
Invest broadly in governance and metadata practices before scaling analytics.
";
        let analysis = segment(text).expect("catch-all recovered");
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(
            analysis.recommendations[0].title,
            "Strategic Recommendations"
        );
        assert!(analysis.recommendations[0].content.contains("metadata"));
    }

    #[test]
    fn call_to_action_feeds_recommendations_only_when_none_parsed() {
        let text = "\
6. Call to Action
Book a working session with your leadership team this quarter.
";
        let analysis = segment(text).expect("call to action recovered");
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(analysis.recommendations[0].title, "Call to Action");

        let combined = format!(
            "4. Strategic Recommendations\n1. **Do the work**: Start now.\n\n{}",
            text
        );
        let analysis = segment(&combined).expect("both sections recovered");
        assert_eq!(analysis.recommendations.len(), 1);
        assert_eq!(analysis.recommendations[0].title, "Do the work");
    }

    #[test]
    fn bare_numbered_items_get_generated_titles() {
        let text = "\
5. Next Steps
1. Document critical datasets and owners within the first month
2. Roll out quality dashboards to every domain team
";
        let analysis = segment(text).expect("numbered items recovered");
        assert_eq!(analysis.next_steps.len(), 2);
        assert_eq!(analysis.next_steps[0].title, "Phase 1");
        assert!(analysis.next_steps[1].content.contains("quality dashboards"));
    }

    #[test]
    fn headerless_prose_is_not_usable() {
        assert!(segment("Nothing here resembles a report section.").is_none());
        assert!(segment("").is_none());
    }
}
