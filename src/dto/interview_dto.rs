use crate::models::analysis::AnalysisResult;
use crate::models::question::{Category, Question};
use crate::models::session::{Difficulty, Session, SessionStatus};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct StartSessionRequest {
    #[validate(length(min = 1, max = 128))]
    pub user_id: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

impl StartSessionRequest {
    pub fn difficulty(&self) -> Result<Difficulty, String> {
        self.level.as_deref().unwrap_or_default().parse()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StartSessionResponse {
    pub session_id: uuid::Uuid,
    pub level: Difficulty,
    pub status: SessionStatus,
    pub total_questions: usize,
    pub current_question: Option<Question>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<&Session> for StartSessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            session_id: session.id,
            level: session.level,
            status: session.status,
            total_questions: session.selected_questions.len(),
            current_question: session.current_question().cloned(),
            created_at: session.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SubmitAnswerRequest {
    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AnalyzeAnswerRequest {
    #[validate(length(min = 1, max = 1000))]
    pub question: String,
    #[validate(length(min = 1, max = 5000))]
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

impl AnalyzeAnswerRequest {
    /// Case-insensitive category name; blank counts as absent.
    pub fn category(&self) -> Result<Option<Category>, String> {
        match self.category.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(name) => name.parse().map(Some),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeAnswerResponse {
    pub analysis: AnalysisResult,
    pub percentage: f64,
}
