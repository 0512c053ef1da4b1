use serde::{Deserialize, Serialize};

/// Organizational profile captured before the questionnaire begins. Fields
/// arrive as free text from the form and are sanitized at prompt-build time,
/// not here, so the stored record preserves what the respondent entered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondentProfile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub job_title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub company_size: String,
    #[serde(default)]
    pub industry: String,
}
