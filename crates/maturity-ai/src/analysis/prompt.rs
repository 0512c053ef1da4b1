use serde_json::{json, Value};

use crate::assessment::{Dimension, MaturityTier, RespondentProfile, Scores};

pub const ANALYSIS_TOOL_NAME: &str = "provide_data_maturity_analysis";

const MAX_FIELD_CHARS: usize = 1000;

/// System/user instructions plus the tool declaration constraining the output
/// schema.
#[derive(Debug, Clone)]
pub struct AnalysisPrompt {
    pub system: String,
    pub user: String,
    pub tool: Value,
}

impl AnalysisPrompt {
    /// Build the completion request content from the sanitized profile and
    /// scores. Free-text profile fields are trimmed and truncated before they
    /// reach the prompt, which bounds both prompt size and the injection
    /// surface a hostile form submission gets.
    pub fn build(profile: &RespondentProfile, scores: &Scores, tier: MaturityTier) -> Self {
        let company_size = sanitize(&profile.company_size);
        let job_title = sanitize(&profile.job_title);
        let mut industry = sanitize(&profile.industry);
        if industry.is_empty() {
            industry = "Technology".to_string();
        }

        let system = format!(
            "You are a senior data strategy consultant specializing in DAMA frameworks and organizational data maturity assessments. Provide executive-level analysis using DAMA knowledge areas.\n\n\
## Analysis Guidelines:\n\
- Ground recommendations in DAMA frameworks (Governance, Architecture, Modeling, Storage, Security, Integration, Content, Master Data, BI, Metadata, Quality)\n\
- Consider organizational context ({company_size} company, {job_title} perspective)\n\
- Provide specific next steps with realistic timelines\n\
- Include both quick wins and strategic initiatives\n\
- Address compliance and regulatory considerations for {industry} industry\n\
- Include industry-specific insights for {industry} sector\n\
- Reference current data trends (AI/ML, cloud-native, data mesh, etc.)\n\
- Focus on practical implementation guidance\n\
- Keep content professional but accessible\n\n\
You will be asked to call a function to provide your analysis in a structured format."
        );

        let mut dimension_lines = String::new();
        for dimension in Dimension::ordered() {
            let formatted = scores
                .dimensions
                .get(&dimension)
                .map(|score| format!("{score:.1}"))
                .unwrap_or_else(|| "N/A".to_string());
            dimension_lines.push_str(&format!(
                "  • {}: {}/5.0\n",
                dimension.label(),
                formatted
            ));
        }

        let user = format!(
            "Analyze this data maturity assessment and generate a comprehensive diagnostic report:\n\n\
## Assessment Data:\n\
- Company: {company_size} employees, {industry} industry\n\
- Role: {job_title}\n\
- Maturity Level: {tier_name} ({overall:.1}/5.0)\n\
- Dimension Scores:\n{dimension_lines}\n\
## Requirements:\n\
- Ground analysis in DAMA's 11 Knowledge Areas (Governance, Architecture, Modeling, Storage, Security, Integration, Content, Master Data, BI, Metadata, Quality)\n\
- Reference {industry} industry specifics and modern trends (AI/ML, cloud-native, data mesh)\n\
- Use specific, actionable language with concrete DAMA practices\n\
- Apply agile data strategy principles (iterative, value-driven, cross-functional)\n\
- Provide 3-5 items for each SWOT category\n\
- Include 3-4 strategic recommendations with clear titles and detailed content\n\
- Provide 3 implementation phases (0-3 months, 3-6 months, 6+ months) with specific actions\n\n\
Please call the function to provide your structured analysis.",
            tier_name = tier.label(),
            overall = scores.overall,
        );

        Self {
            system,
            user,
            tool: analysis_tool(),
        }
    }
}

fn sanitize(value: &str) -> String {
    value.trim().chars().take(MAX_FIELD_CHARS).collect()
}

/// Function declaration mirroring the `Analysis` entity exactly; every
/// top-level field is required so a conforming provider cannot omit one.
fn analysis_tool() -> Value {
    json!({
        "type": "function",
        "function": {
            "name": ANALYSIS_TOOL_NAME,
            "description": "Provide comprehensive data maturity analysis with structured output",
            "parameters": {
                "type": "object",
                "properties": {
                    "summary": {
                        "type": "string",
                        "description": "Executive summary of the data maturity assessment"
                    },
                    "peerComparison": {
                        "type": "string",
                        "description": "Comparison with industry peers and benchmarks"
                    },
                    "swot": {
                        "type": "object",
                        "properties": {
                            "strengths": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "List of organizational data strengths"
                            },
                            "weaknesses": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "List of data-related weaknesses to address"
                            },
                            "opportunities": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "List of opportunities for data improvement"
                            },
                            "threats": {
                                "type": "array",
                                "items": { "type": "string" },
                                "description": "List of potential threats or risks"
                            }
                        },
                        "required": ["strengths", "weaknesses", "opportunities", "threats"]
                    },
                    "recommendations": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string", "description": "Title of the recommendation" },
                                "content": { "type": "string", "description": "Detailed content of the recommendation" }
                            },
                            "required": ["title", "content"]
                        },
                        "description": "List of strategic recommendations"
                    },
                    "nextSteps": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "title": { "type": "string", "description": "Title of the next step or phase" },
                                "content": { "type": "string", "description": "Detailed description of the next step" }
                            },
                            "required": ["title", "content"]
                        },
                        "description": "List of recommended next steps or implementation phases"
                    }
                },
                "required": ["summary", "peerComparison", "swot", "recommendations", "nextSteps"]
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assessment::{score_answers, AnswerSet, QuestionnaireBlueprint};

    fn sample_profile() -> RespondentProfile {
        RespondentProfile {
            full_name: "Jordan Reyes".to_string(),
            job_title: "  Head of Data  ".to_string(),
            company_name: "Acme Analytics".to_string(),
            company_size: "51-200".to_string(),
            industry: "Healthcare".to_string(),
        }
    }

    fn sample_scores() -> Scores {
        let blueprint = QuestionnaireBlueprint::standard();
        let answers: AnswerSet = blueprint
            .sections()
            .iter()
            .flat_map(|section| section.questions.iter())
            .map(|question| (question.id.to_string(), 3))
            .collect();
        score_answers(&answers, &blueprint)
    }

    #[test]
    fn prompt_embeds_sanitized_profile_and_scores() {
        let scores = sample_scores();
        let tier = MaturityTier::for_overall(scores.overall);
        let prompt = AnalysisPrompt::build(&sample_profile(), &scores, tier);

        assert!(prompt.system.contains("51-200 company"));
        assert!(prompt.system.contains("Head of Data perspective"));
        assert!(prompt.user.contains("Maturity Level: Developing (3.0/5.0)"));
        assert!(prompt.user.contains("• Strategy & Alignment: 3.0/5.0"));
        assert!(prompt.user.contains("• Security & Risk Management: 3.0/5.0"));
    }

    #[test]
    fn oversized_fields_are_truncated() {
        let mut profile = sample_profile();
        profile.job_title = "x".repeat(5000);
        let scores = sample_scores();
        let prompt = AnalysisPrompt::build(&profile, &scores, MaturityTier::Developing);

        assert!(!prompt.system.contains(&"x".repeat(1001)));
        assert!(prompt.system.contains(&"x".repeat(1000)));
    }

    #[test]
    fn blank_industry_falls_back_to_technology() {
        let mut profile = sample_profile();
        profile.industry = "   ".to_string();
        let scores = sample_scores();
        let prompt = AnalysisPrompt::build(&profile, &scores, MaturityTier::Developing);

        assert!(prompt.user.contains("Technology industry"));
    }

    #[test]
    fn missing_dimension_scores_render_as_not_available() {
        let mut scores = sample_scores();
        scores.dimensions.remove(&Dimension::Metadata);
        let prompt = AnalysisPrompt::build(&sample_profile(), &scores, MaturityTier::Developing);

        assert!(prompt.user.contains("• Metadata & Documentation: N/A/5.0"));
    }

    #[test]
    fn tool_declaration_requires_every_analysis_field() {
        let prompt = AnalysisPrompt::build(
            &sample_profile(),
            &sample_scores(),
            MaturityTier::Developing,
        );
        let function = &prompt.tool["function"];
        assert_eq!(function["name"], ANALYSIS_TOOL_NAME);

        let required: Vec<&str> = function["parameters"]["required"]
            .as_array()
            .expect("required list")
            .iter()
            .filter_map(|value| value.as_str())
            .collect();
        assert_eq!(
            required,
            vec!["summary", "peerComparison", "swot", "recommendations", "nextSteps"]
        );
    }
}
