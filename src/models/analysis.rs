use crate::services::scoring;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    MigrationIntent,
    FinancialUnderstanding,
    AcademicCredibility,
    SpecificityResearch,
    Consistency,
    CommunicationQuality,
    RedFlags,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::MigrationIntent,
        Criterion::FinancialUnderstanding,
        Criterion::AcademicCredibility,
        Criterion::SpecificityResearch,
        Criterion::Consistency,
        Criterion::CommunicationQuality,
        Criterion::RedFlags,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Criterion::MigrationIntent => "migration_intent",
            Criterion::FinancialUnderstanding => "financial_understanding",
            Criterion::AcademicCredibility => "academic_credibility",
            Criterion::SpecificityResearch => "specificity_research",
            Criterion::Consistency => "consistency",
            Criterion::CommunicationQuality => "communication_quality",
            Criterion::RedFlags => "red_flags",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Criterion::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A present criterion score, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct CriterionScore(u8);

impl CriterionScore {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: i64) -> Result<Self, String> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(format!(
                "criterion score {} outside {}..={}",
                value,
                Self::MIN,
                Self::MAX
            ))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for CriterionScore {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<CriterionScore> for u8 {
    fn from(score: CriterionScore) -> Self {
        score.0
    }
}

/// Per-criterion scores. `None` means "not applicable" and never contributes
/// to arithmetic. The total is derived on every read and on the wire; a
/// stated `total_score` in incoming JSON is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ScoresWire", into = "ScoresWire")]
pub struct AnalysisScores {
    pub migration_intent: Option<CriterionScore>,
    pub financial_understanding: Option<CriterionScore>,
    pub academic_credibility: Option<CriterionScore>,
    pub specificity_research: Option<CriterionScore>,
    pub consistency: Option<CriterionScore>,
    pub communication_quality: Option<CriterionScore>,
    pub red_flags: Option<CriterionScore>,
}

#[derive(Serialize, Deserialize)]
struct ScoresWire {
    #[serde(default)]
    migration_intent: Option<CriterionScore>,
    #[serde(default)]
    financial_understanding: Option<CriterionScore>,
    #[serde(default)]
    academic_credibility: Option<CriterionScore>,
    #[serde(default)]
    specificity_research: Option<CriterionScore>,
    #[serde(default)]
    consistency: Option<CriterionScore>,
    #[serde(default)]
    communication_quality: Option<CriterionScore>,
    #[serde(default)]
    red_flags: Option<CriterionScore>,
    #[serde(skip_deserializing)]
    total_score: u32,
}

impl From<ScoresWire> for AnalysisScores {
    fn from(wire: ScoresWire) -> Self {
        Self {
            migration_intent: wire.migration_intent,
            financial_understanding: wire.financial_understanding,
            academic_credibility: wire.academic_credibility,
            specificity_research: wire.specificity_research,
            consistency: wire.consistency,
            communication_quality: wire.communication_quality,
            red_flags: wire.red_flags,
        }
    }
}

impl From<AnalysisScores> for ScoresWire {
    fn from(scores: AnalysisScores) -> Self {
        let total_score = scores.total_score();
        Self {
            migration_intent: scores.migration_intent,
            financial_understanding: scores.financial_understanding,
            academic_credibility: scores.academic_credibility,
            specificity_research: scores.specificity_research,
            consistency: scores.consistency,
            communication_quality: scores.communication_quality,
            red_flags: scores.red_flags,
            total_score,
        }
    }
}

impl AnalysisScores {
    pub fn get(&self, criterion: Criterion) -> Option<CriterionScore> {
        match criterion {
            Criterion::MigrationIntent => self.migration_intent,
            Criterion::FinancialUnderstanding => self.financial_understanding,
            Criterion::AcademicCredibility => self.academic_credibility,
            Criterion::SpecificityResearch => self.specificity_research,
            Criterion::Consistency => self.consistency,
            Criterion::CommunicationQuality => self.communication_quality,
            Criterion::RedFlags => self.red_flags,
        }
    }

    pub fn set(&mut self, criterion: Criterion, score: Option<CriterionScore>) {
        let slot = match criterion {
            Criterion::MigrationIntent => &mut self.migration_intent,
            Criterion::FinancialUnderstanding => &mut self.financial_understanding,
            Criterion::AcademicCredibility => &mut self.academic_credibility,
            Criterion::SpecificityResearch => &mut self.specificity_research,
            Criterion::Consistency => &mut self.consistency,
            Criterion::CommunicationQuality => &mut self.communication_quality,
            Criterion::RedFlags => &mut self.red_flags,
        };
        *slot = score;
    }

    pub fn present(&self) -> impl Iterator<Item = (Criterion, CriterionScore)> + '_ {
        Criterion::ALL
            .into_iter()
            .filter_map(|c| self.get(c).map(|s| (c, s)))
    }

    pub fn present_sum(&self) -> u32 {
        self.present().map(|(_, s)| s.value() as u32).sum()
    }

    /// Sum of the present scores.
    pub fn total_score(&self) -> u32 {
        self.present_sum()
    }

    pub fn criteria_count(&self) -> usize {
        self.present().count()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Classification {
    Excellent,
    Good,
    Average,
    Weak,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Excellent => "Excellent",
            Classification::Good => "Good",
            Classification::Average => "Average",
            Classification::Weak => "Weak",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    #[serde(default)]
    pub overall: String,
    #[serde(default)]
    pub by_criterion: BTreeMap<Criterion, String>,
    #[serde(default)]
    pub improvements: Vec<String>,
}

/// Trusted analysis of one answer. The classification is re-derived from the
/// scores whenever one is built or decoded, so a stored copy cannot carry a
/// stale tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ResultWire")]
pub struct AnalysisResult {
    pub scores: AnalysisScores,
    pub classification: Classification,
    pub feedback: Feedback,
}

#[derive(Deserialize)]
struct ResultWire {
    scores: AnalysisScores,
    #[serde(default)]
    feedback: Feedback,
}

impl From<ResultWire> for AnalysisResult {
    fn from(wire: ResultWire) -> Self {
        Self::new(wire.scores, wire.feedback)
    }
}

impl AnalysisResult {
    pub fn new(scores: AnalysisScores, feedback: Feedback) -> Self {
        let classification = scoring::classify(scores.total_score(), scores.criteria_count());
        Self {
            scores,
            classification,
            feedback,
        }
    }

    pub fn total_score(&self) -> u32 {
        self.scores.total_score()
    }

    pub fn criteria_count(&self) -> usize {
        self.scores.criteria_count()
    }
}
