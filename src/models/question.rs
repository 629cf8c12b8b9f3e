use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Purpose of Study")]
    PurposeOfStudy,
    #[serde(rename = "Academic Background")]
    AcademicBackground,
    #[serde(rename = "University Choice")]
    UniversityChoice,
    #[serde(rename = "Financial Capability")]
    FinancialCapability,
    #[serde(rename = "Post-Graduation Plans")]
    PostGraduationPlans,
    #[serde(rename = "Immigration Intent")]
    ImmigrationIntent,
}

impl Category {
    /// Interview order used whenever a tier walks every category.
    pub const ALL: [Category; 6] = [
        Category::PurposeOfStudy,
        Category::AcademicBackground,
        Category::UniversityChoice,
        Category::FinancialCapability,
        Category::PostGraduationPlans,
        Category::ImmigrationIntent,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::PurposeOfStudy => "Purpose of Study",
            Category::AcademicBackground => "Academic Background",
            Category::UniversityChoice => "University Choice",
            Category::FinancialCapability => "Financial Capability",
            Category::PostGraduationPlans => "Post-Graduation Plans",
            Category::ImmigrationIntent => "Immigration Intent",
        }
    }

    /// Identifier fragment: every non-alphanumeric character becomes `_`.
    pub fn slug(&self) -> String {
        self.as_str()
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| format!("unknown question category: {}", needle))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    pub category: Category,
    pub text: String,
    /// Reserved for branching interviews; selection never fills these.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub followup_candidates: Vec<String>,
}

impl Question {
    /// Builds a session-local question addressed by its 1-based position.
    pub fn at_position(position: usize, category: Category, text: impl Into<String>) -> Self {
        Self {
            id: format!("q{}_{}", position, category.slug()),
            category,
            text: text.into(),
            next_id: None,
            followup_candidates: Vec::new(),
        }
    }
}
