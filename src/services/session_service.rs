use crate::error::{Error, Result};
use crate::models::analysis::AnalysisResult;
use crate::models::question::{Category, Question};
use crate::models::session::{Answer, Difficulty, Session, SessionStatus, SessionSummary};
use crate::services::ai_service::AnalyzerService;
use crate::services::question_bank::QuestionBank;
use crate::services::{scoring, selection_service, summary_service};
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Persistence for session state. Implementations own their own locking.
pub trait SessionStore: Send + Sync {
    fn get(&self, id: Uuid) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
}

#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for InMemorySessionStore {
    fn get(&self, id: Uuid) -> Result<Option<Session>> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| Error::Internal("session store lock poisoned".to_string()))?;
        Ok(guard.get(&id).cloned())
    }

    fn save(&self, session: &Session) -> Result<()> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| Error::Internal("session store lock poisoned".to_string()))?;
        guard.insert(session.id, session.clone());
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub session_id: Uuid,
    pub question_id: String,
    pub analysis: AnalysisResult,
    pub percentage: f64,
    pub status: SessionStatus,
    pub answered: usize,
    pub total_questions: usize,
    pub next_question: Option<Question>,
    pub summary: Option<SessionSummary>,
}

#[derive(Clone)]
pub struct InterviewService {
    bank: Arc<QuestionBank>,
    analyzer: AnalyzerService,
    store: Arc<dyn SessionStore>,
}

impl InterviewService {
    pub fn new(
        bank: Arc<QuestionBank>,
        analyzer: AnalyzerService,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            bank,
            analyzer,
            store,
        }
    }

    pub fn question_count(&self) -> usize {
        self.bank.len()
    }

    pub fn start_session(&self, user_id: Option<String>, level: Difficulty) -> Result<Session> {
        let questions = selection_service::select_questions(&self.bank, level, &mut rand::thread_rng());
        if questions.is_empty() {
            return Err(Error::Internal(
                "question bank produced no questions for this level".to_string(),
            ));
        }

        let session = Session::new(user_id, level, questions);
        self.store.save(&session)?;
        tracing::info!(
            session_id = %session.id,
            level = %level,
            questions = session.selected_questions.len(),
            "Interview session started"
        );
        Ok(session)
    }

    /// Returns the stored session as-is; a finished session keeps the
    /// summary it was given when it finished.
    pub fn get_session(&self, id: Uuid) -> Result<Session> {
        self.store
            .get(id)?
            .ok_or_else(|| Error::NotFound(format!("Session {} not found", id)))
    }

    /// Runs one turn. Nothing is stored unless the analysis succeeds.
    pub async fn submit_answer(&self, id: Uuid, answer: &str) -> Result<TurnOutcome> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(Error::BadRequest("Answer must not be empty".to_string()));
        }

        let mut session = self.get_session(id)?;
        session.ensure_active()?;
        let question = session.current_question().cloned().ok_or_else(|| {
            Error::Conflict("All questions in this session have been answered".to_string())
        })?;

        let analysis = self
            .analyzer
            .analyze_in_session(&session, Some(question.category), &question.text, answer)
            .await?;
        let percentage = scoring::score_to_percentage(analysis.total_score(), analysis.criteria_count());

        session.record_answer(Answer {
            question_id: question.id.clone(),
            question_text: question.text.clone(),
            text: answer.to_string(),
            created_at: Utc::now(),
            analysis: Some(analysis.clone()),
        })?;

        if session.is_complete() {
            let summary = summary_service::summarize(session.id, session.analyses())?;
            session.finish(summary)?;
            tracing::info!(
                session_id = %session.id,
                answers = session.answers.len(),
                "Interview session finished"
            );
        }

        self.store.save(&session)?;

        Ok(TurnOutcome {
            session_id: session.id,
            question_id: question.id,
            analysis,
            percentage,
            status: session.status,
            answered: session.question_index,
            total_questions: session.selected_questions.len(),
            next_question: session.current_question().cloned(),
            summary: session.summary.clone(),
        })
    }

    pub fn abort_session(&self, id: Uuid) -> Result<Session> {
        let mut session = self.get_session(id)?;
        session.abort()?;
        self.store.save(&session)?;
        tracing::info!(session_id = %session.id, "Interview session aborted");
        Ok(session)
    }

    pub async fn analyze_answer(
        &self,
        category: Option<Category>,
        question: &str,
        answer: &str,
    ) -> Result<AnalysisResult> {
        self.analyzer.analyze_answer(category, question, answer).await
    }
}
