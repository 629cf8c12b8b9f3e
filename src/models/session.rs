use crate::error::{Error, Result};
use crate::models::analysis::AnalysisResult;
use crate::models::question::Question;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    #[default]
    Default,
}

impl FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            "" | "default" => Ok(Difficulty::Default),
            other => Err(format!("unknown difficulty level: {}", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::Default => "default",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Finished,
    Aborted,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub question_text: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis: Option<AnalysisResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    A,
    B,
    C,
    D,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub total_questions: usize,
    pub average_score: f64,
    pub overall_grade: Grade,
    pub strong_areas: Vec<String>,
    pub weak_areas: Vec<String>,
    pub common_red_flags: Vec<String>,
    pub recommendation: String,
    pub completed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    pub level: Difficulty,
    pub selected_questions: Vec<Question>,
    pub question_index: usize,
    pub answers: Vec<Answer>,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
}

impl Session {
    pub fn new(user_id: Option<String>, level: Difficulty, questions: Vec<Question>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            level,
            selected_questions: questions,
            question_index: 0,
            answers: Vec::new(),
            status: SessionStatus::Active,
            created_at: now,
            updated_at: now,
            summary: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn current_question(&self) -> Option<&Question> {
        if !self.is_active() {
            return None;
        }
        self.selected_questions.get(self.question_index)
    }

    /// True once every selected question has a recorded answer.
    pub fn is_complete(&self) -> bool {
        self.question_index >= self.selected_questions.len()
    }

    pub fn analyses(&self) -> impl Iterator<Item = &AnalysisResult> {
        self.answers.iter().filter_map(|a| a.analysis.as_ref())
    }

    pub fn record_answer(&mut self, answer: Answer) -> Result<()> {
        self.ensure_active()?;
        if self.is_complete() {
            return Err(Error::Conflict(
                "All questions in this session have been answered".to_string(),
            ));
        }
        self.answers.push(answer);
        self.question_index += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// `active -> finished`. The summary is attached exactly once.
    pub fn finish(&mut self, summary: SessionSummary) -> Result<()> {
        self.ensure_active()?;
        if !self.is_complete() {
            return Err(Error::Conflict(format!(
                "Session still has {} unanswered question(s)",
                self.selected_questions.len() - self.question_index
            )));
        }
        self.status = SessionStatus::Finished;
        self.summary = Some(summary);
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn abort(&mut self) -> Result<()> {
        self.ensure_active()?;
        self.status = SessionStatus::Aborted;
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn ensure_active(&self) -> Result<()> {
        match self.status {
            SessionStatus::Active => Ok(()),
            SessionStatus::Finished => Err(Error::Conflict(format!(
                "Session {} is already finished",
                self.id
            ))),
            SessionStatus::Aborted => Err(Error::Conflict(format!(
                "Session {} was aborted",
                self.id
            ))),
        }
    }
}
