use crate::models::question::Category;
use crate::models::session::{Answer, Session};
use crate::services::rubric::RUBRIC_PROMPT;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

fn exchange_text(category: Option<Category>, question: &str, answer: &str) -> String {
    match category {
        Some(category) => format!(
            "Category: {}\nQuestion: {}\nStudent's Answer: {}",
            category, question, answer
        ),
        None => format!("Question: {}\nStudent's Answer: {}", question, answer),
    }
}

/// Rubric followed by every recorded exchange. The reasoning service keeps
/// no memory between calls, so each evaluation replays the whole session.
pub fn session_history(session: &Session) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(RUBRIC_PROMPT)];
    for answer in &session.answers {
        push_exchange(&mut messages, answer);
    }
    messages
}

fn push_exchange(messages: &mut Vec<ChatMessage>, answer: &Answer) {
    messages.push(ChatMessage::user(exchange_text(
        None,
        &answer.question_text,
        &answer.text,
    )));

    if let Some(analysis) = &answer.analysis {
        match serde_json::to_string(analysis) {
            Ok(json) => messages.push(ChatMessage::assistant(json)),
            Err(e) => tracing::warn!(
                question_id = %answer.question_id,
                error = %e,
                "Skipping prior analysis in replay"
            ),
        }
    }
}

/// Messages for evaluating `answer` to `question` within `session`.
pub fn build_messages(
    session: Option<&Session>,
    category: Option<Category>,
    question: &str,
    answer: &str,
) -> Vec<ChatMessage> {
    let mut messages = match session {
        Some(session) => session_history(session),
        None => vec![ChatMessage::system(RUBRIC_PROMPT)],
    };
    messages.push(ChatMessage::user(exchange_text(category, question, answer)));
    messages
}
