use serde::{Deserialize, Serialize};

/// One of the eight fixed capability dimensions scored independently.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Strategy,
    Governance,
    Architecture,
    Analytics,
    Team,
    Quality,
    Metadata,
    Security,
}

impl Dimension {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::Strategy,
            Self::Governance,
            Self::Architecture,
            Self::Analytics,
            Self::Team,
            Self::Quality,
            Self::Metadata,
            Self::Security,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Strategy => "Strategy & Alignment",
            Self::Governance => "Data Governance",
            Self::Architecture => "Data Architecture & Integration",
            Self::Analytics => "Analytics & Decision Enablement",
            Self::Team => "Team & Skills",
            Self::Quality => "Data Quality & Operations",
            Self::Metadata => "Metadata & Documentation",
            Self::Security => "Security & Risk Management",
        }
    }
}

/// One Likert statement inside a dimension section.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: &'static str,
    pub text: &'static str,
    pub explanation: &'static str,
}

/// A dimension's slice of the questionnaire.
#[derive(Debug, Clone)]
pub struct DimensionSection {
    pub dimension: Dimension,
    pub description: &'static str,
    pub questions: Vec<Question>,
}

impl DimensionSection {
    pub fn title(&self) -> &'static str {
        self.dimension.label()
    }
}

/// Label attached to each point on the 1-5 rating scale.
#[derive(Debug, Clone, Copy)]
pub struct LikertLevel {
    pub value: u8,
    pub label: &'static str,
}

pub const LIKERT_SCALE: [LikertLevel; 5] = [
    LikertLevel {
        value: 1,
        label: "Strongly Disagree",
    },
    LikertLevel {
        value: 2,
        label: "Disagree",
    },
    LikertLevel {
        value: 3,
        label: "Neutral",
    },
    LikertLevel {
        value: 4,
        label: "Agree",
    },
    LikertLevel {
        value: 5,
        label: "Strongly Agree",
    },
];

/// The canonical questionnaire driving both scoring and the demo CLI.
#[derive(Debug)]
pub struct QuestionnaireBlueprint {
    sections: Vec<DimensionSection>,
}

impl QuestionnaireBlueprint {
    pub fn standard() -> Self {
        Self {
            sections: standard_sections(),
        }
    }

    pub fn sections(&self) -> &[DimensionSection] {
        &self.sections
    }

    pub fn section(&self, dimension: Dimension) -> Option<&DimensionSection> {
        self.sections
            .iter()
            .find(|section| section.dimension == dimension)
    }

    pub fn question_count(&self) -> usize {
        self.sections
            .iter()
            .map(|section| section.questions.len())
            .sum()
    }
}

fn standard_sections() -> Vec<DimensionSection> {
    vec![
        DimensionSection {
            dimension: Dimension::Strategy,
            description: "How well your data initiatives align with business strategy and have executive support.",
            questions: vec![
                Question {
                    id: "strategy_1",
                    text: "Our organization has a clear, documented data strategy that aligns with business objectives.",
                    explanation: "A formal data strategy provides direction and ensures data initiatives support business goals.",
                },
                Question {
                    id: "strategy_2",
                    text: "Senior leadership actively champions and invests in data initiatives.",
                    explanation: "Executive sponsorship is critical for successful data transformation and resource allocation.",
                },
                Question {
                    id: "strategy_3",
                    text: "We regularly measure and communicate the business value of our data investments.",
                    explanation: "Demonstrating ROI helps sustain support and guides future data investment decisions.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Governance,
            description: "The policies, processes, and organizational structures that ensure data is managed as a strategic asset.",
            questions: vec![
                Question {
                    id: "governance_1",
                    text: "We have clearly defined data ownership and stewardship roles across the organization.",
                    explanation: "Clear ownership ensures accountability and proper management of data assets.",
                },
                Question {
                    id: "governance_2",
                    text: "Our organization has established data policies and standards that are actively enforced.",
                    explanation: "Consistent policies ensure data is handled uniformly and meets compliance requirements.",
                },
                Question {
                    id: "governance_3",
                    text: "We have formal processes for data access, sharing, and privacy protection.",
                    explanation: "Structured processes balance data accessibility with security and privacy requirements.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Architecture,
            description: "The technical foundation that enables data collection, storage, and integration across systems.",
            questions: vec![
                Question {
                    id: "architecture_1",
                    text: "Our data architecture supports scalable, real-time data integration from multiple sources.",
                    explanation: "Modern architecture enables timely access to comprehensive, integrated data.",
                },
                Question {
                    id: "architecture_2",
                    text: "We have a centralized data platform that provides a single source of truth.",
                    explanation: "Centralized platforms reduce data silos and ensure consistency across the organization.",
                },
                Question {
                    id: "architecture_3",
                    text: "Our systems can easily adapt to new data sources and changing business requirements.",
                    explanation: "Flexible architecture allows organizations to respond quickly to new opportunities and needs.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Analytics,
            description: "The capabilities that turn data into actionable insights for decision-making.",
            questions: vec![
                Question {
                    id: "analytics_1",
                    text: "Business users can easily access and analyze data without heavy IT involvement.",
                    explanation: "Self-service analytics empowers users and reduces bottlenecks in data access.",
                },
                Question {
                    id: "analytics_2",
                    text: "We use advanced analytics (AI/ML, predictive modeling) to drive business decisions.",
                    explanation: "Advanced analytics unlock deeper insights and enable proactive decision-making.",
                },
                Question {
                    id: "analytics_3",
                    text: "Data insights are embedded into business processes and decision workflows.",
                    explanation: "Integrated insights ensure data drives action rather than just informing discussions.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Team,
            description: "The human capabilities and organizational structure needed to execute data initiatives.",
            questions: vec![
                Question {
                    id: "team_1",
                    text: "We have dedicated data professionals (analysts, scientists, engineers) with appropriate skills.",
                    explanation: "Specialized roles ensure data initiatives are executed by qualified professionals.",
                },
                Question {
                    id: "team_2",
                    text: "Business users across the organization have strong data literacy and analytical skills.",
                    explanation: "Widespread data literacy enables self-service analytics and data-driven decision making.",
                },
                Question {
                    id: "team_3",
                    text: "We have effective collaboration between data teams and business stakeholders.",
                    explanation: "Strong collaboration ensures data initiatives address real business needs and challenges.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Quality,
            description: "The processes and systems that ensure data is accurate, complete, and reliable.",
            questions: vec![
                Question {
                    id: "quality_1",
                    text: "We have automated data quality monitoring and alerting systems in place.",
                    explanation: "Automated monitoring catches data issues early and maintains trust in data assets.",
                },
                Question {
                    id: "quality_2",
                    text: "Data quality issues are quickly identified, tracked, and resolved through defined processes.",
                    explanation: "Systematic issue resolution prevents data quality problems from impacting decisions.",
                },
                Question {
                    id: "quality_3",
                    text: "We regularly measure and report on data quality metrics across key datasets.",
                    explanation: "Ongoing measurement ensures data quality standards are maintained over time.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Metadata,
            description: "The information about data that enables discovery, understanding, and proper usage.",
            questions: vec![
                Question {
                    id: "metadata_1",
                    text: "Our data assets are well-documented with clear definitions and business context.",
                    explanation: "Good documentation ensures users understand data meaning and appropriate usage.",
                },
                Question {
                    id: "metadata_2",
                    text: "We maintain comprehensive data lineage and impact analysis capabilities.",
                    explanation: "Data lineage helps users understand data origins and assess the impact of changes.",
                },
                Question {
                    id: "metadata_3",
                    text: "Users can easily discover and understand available data through self-service tools.",
                    explanation: "Data discovery tools reduce time to insight and promote data reuse across teams.",
                },
            ],
        },
        DimensionSection {
            dimension: Dimension::Security,
            description: "The controls and processes that protect data assets and ensure regulatory compliance.",
            questions: vec![
                Question {
                    id: "security_1",
                    text: "We have comprehensive data security controls including encryption, access controls, and monitoring.",
                    explanation: "Strong security controls protect sensitive data and maintain stakeholder trust.",
                },
                Question {
                    id: "security_2",
                    text: "Our data practices comply with relevant regulations (GDPR, CCPA, industry standards).",
                    explanation: "Regulatory compliance reduces legal risk and demonstrates responsible data stewardship.",
                },
                Question {
                    id: "security_3",
                    text: "We have established data backup, recovery, and business continuity procedures.",
                    explanation: "Robust recovery procedures ensure data availability and business continuity during disruptions.",
                },
            ],
        },
    ]
}
