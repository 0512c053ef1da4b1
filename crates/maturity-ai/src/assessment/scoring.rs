use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::questionnaire::{Dimension, QuestionnaireBlueprint};

/// Raw ratings keyed by question id. Values outside 1-5 are clamped when
/// scored; unanswered questions score as 1.
pub type AnswerSet = HashMap<String, u8>;

/// Per-dimension means plus the flat overall mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub dimensions: BTreeMap<Dimension, f64>,
    pub overall: f64,
}

/// Score an answer set against the questionnaire.
///
/// `overall` is the mean over the flat answer set (total rating sum divided by
/// total question count), not the mean of dimension means. The two diverge as
/// soon as dimensions carry unequal question counts, and the flat mean is the
/// contract. Missing answers substitute the lowest rating instead of erroring;
/// that leniency is deliberate and load-bearing for partially completed
/// submissions.
pub fn score_answers(answers: &AnswerSet, blueprint: &QuestionnaireBlueprint) -> Scores {
    let mut dimensions = BTreeMap::new();
    let mut total: u64 = 0;
    let mut question_count: u64 = 0;

    for section in blueprint.sections() {
        let mut section_total: u64 = 0;
        for question in &section.questions {
            let rating = answers
                .get(question.id)
                .copied()
                .unwrap_or(1)
                .clamp(1, 5) as u64;
            section_total += rating;
            total += rating;
            question_count += 1;
        }
        let mean = section_total as f64 / section.questions.len() as f64;
        dimensions.insert(section.dimension, mean);
    }

    Scores {
        dimensions,
        overall: total as f64 / question_count as f64,
    }
}

/// Discrete maturity label derived from the overall score. Boundaries are
/// inclusive at each tier's lower bound; anything below 2.0 is Ad-hoc, so the
/// mapping is total over the whole score range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TierWire", try_from = "TierWire")]
pub enum MaturityTier {
    AdHoc,
    Reactive,
    Developing,
    Managed,
    Optimized,
}

impl MaturityTier {
    pub fn for_overall(score: f64) -> Self {
        if score >= 5.0 {
            Self::Optimized
        } else if score >= 4.0 {
            Self::Managed
        } else if score >= 3.0 {
            Self::Developing
        } else if score >= 2.0 {
            Self::Reactive
        } else {
            Self::AdHoc
        }
    }

    pub const fn level(self) -> u8 {
        match self {
            Self::AdHoc => 1,
            Self::Reactive => 2,
            Self::Developing => 3,
            Self::Managed => 4,
            Self::Optimized => 5,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AdHoc => "Ad-hoc",
            Self::Reactive => "Reactive",
            Self::Developing => "Developing",
            Self::Managed => "Managed",
            Self::Optimized => "Optimized",
        }
    }
}

/// Wire shape `{ "name": ..., "level": ... }`. The level is authoritative on
/// the way back in; the name is display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct TierWire {
    name: String,
    level: u8,
}

impl From<MaturityTier> for TierWire {
    fn from(tier: MaturityTier) -> Self {
        Self {
            name: tier.label().to_string(),
            level: tier.level(),
        }
    }
}

impl TryFrom<TierWire> for MaturityTier {
    type Error = String;

    fn try_from(wire: TierWire) -> Result<Self, Self::Error> {
        match wire.level {
            1 => Ok(Self::AdHoc),
            2 => Ok(Self::Reactive),
            3 => Ok(Self::Developing),
            4 => Ok(Self::Managed),
            5 => Ok(Self::Optimized),
            other => Err(format!("maturity tier level {} is out of range", other)),
        }
    }
}
