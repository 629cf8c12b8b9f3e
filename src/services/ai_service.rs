use crate::config::Config;
use crate::error::{Error, Result};
use crate::models::analysis::AnalysisResult;
use crate::models::question::Category;
use crate::models::session::Session;
use crate::services::prompt_service::{self, ChatMessage};
use crate::services::response_validator;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl AnalyzerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            api_key: config.openai_api_key.clone(),
            api_url: config.openai_api_url.clone(),
            model: config.openai_model.clone(),
            temperature: config.analyzer_temperature,
            max_tokens: config.analyzer_max_tokens,
            timeout: Duration::from_secs(config.analyzer_timeout_secs),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

/// Scores interview answers through an external chat-completion service.
#[derive(Clone)]
pub struct AnalyzerService {
    client: Client,
    settings: AnalyzerSettings,
}

impl AnalyzerService {
    pub fn new(settings: AnalyzerSettings, client: Client) -> Self {
        Self { client, settings }
    }

    /// Evaluates one answer with no session context.
    pub async fn analyze_answer(
        &self,
        category: Option<Category>,
        question: &str,
        answer: &str,
    ) -> Result<AnalysisResult> {
        let messages = prompt_service::build_messages(None, category, question, answer);
        self.evaluate(&messages, category).await
    }

    /// Evaluates one answer, replaying every earlier exchange of `session`.
    pub async fn analyze_in_session(
        &self,
        session: &Session,
        category: Option<Category>,
        question: &str,
        answer: &str,
    ) -> Result<AnalysisResult> {
        let messages = prompt_service::build_messages(Some(session), category, question, answer);
        tracing::debug!(
            session_id = %session.id,
            messages = messages.len(),
            "Requesting answer analysis"
        );
        self.evaluate(&messages, category).await
    }

    async fn evaluate(
        &self,
        messages: &[ChatMessage],
        category: Option<Category>,
    ) -> Result<AnalysisResult> {
        let raw = self.chat(messages).await?;
        let validated = response_validator::validate_reply(&raw, category)?;
        if !validated.corrections.is_empty() {
            tracing::info!(
                corrections = validated.corrections.len(),
                classification = %validated.analysis.classification,
                "Analysis reconciled with rubric"
            );
        }
        Ok(validated.analysis)
    }

    /// One bounded round trip. Returns the raw text of the first choice.
    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        if self.settings.api_key.trim().is_empty() {
            return Err(Error::Config("API key not set".to_string()));
        }

        let request = ChatRequest {
            model: &self.settings.model,
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
            messages,
        };

        let res = self
            .client
            .post(&self.settings.api_url)
            .bearer_auth(&self.settings.api_key)
            .json(&request)
            .timeout(self.settings.timeout)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            tracing::error!(%status, body = %text, "Reasoning service returned an error");
            return Err(Error::Provider(format!("status {}: {}", status, text)));
        }

        let body: ChatResponse = res.json().await?;
        body.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| Error::Provider("empty response from reasoning service".to_string()))
    }
}
