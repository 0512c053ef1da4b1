//! Questionnaire definition, respondent profile, and deterministic scoring.

pub mod profile;
pub mod questionnaire;
pub mod scoring;

pub use profile::RespondentProfile;
pub use questionnaire::{
    Dimension, DimensionSection, LikertLevel, Question, QuestionnaireBlueprint, LIKERT_SCALE,
};
pub use scoring::{score_answers, AnswerSet, MaturityTier, Scores};
