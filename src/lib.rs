pub mod config;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use crate::middleware::rate_limit::{limit_requests, TurnLimiter};
use crate::services::{
    ai_service::{AnalyzerService, AnalyzerSettings},
    question_bank::QuestionBank,
    session_service::{InMemorySessionStore, InterviewService, SessionStore},
};
use axum::{
    routing::{get, post},
    Router,
};
use reqwest::Client;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub interview_service: InterviewService,
}

impl AppState {
    pub fn new(bank: Arc<QuestionBank>) -> crate::error::Result<Self> {
        let config = crate::config::get_config();
        let settings = AnalyzerSettings::from_config(config);
        let store: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        Self::with_parts(bank, settings, store)
    }

    pub fn with_parts(
        bank: Arc<QuestionBank>,
        settings: AnalyzerSettings,
        store: Arc<dyn SessionStore>,
    ) -> crate::error::Result<Self> {
        let http_client = Client::builder().timeout(settings.timeout).build()?;
        let analyzer = AnalyzerService::new(settings, http_client);

        Ok(Self {
            interview_service: InterviewService::new(bank, analyzer, store),
        })
    }
}

/// Interview API, without the outer tracing/CORS layers added by the binary.
pub fn router(state: AppState, rps: u32) -> Router {
    let interview_api = Router::new()
        .route(
            "/api/interview/sessions",
            post(routes::interview::start_session),
        )
        .route(
            "/api/interview/sessions/:id",
            get(routes::interview::get_session),
        )
        .route(
            "/api/interview/sessions/:id/answers",
            post(routes::interview::submit_answer),
        )
        .route(
            "/api/interview/sessions/:id/abort",
            post(routes::interview::abort_session),
        )
        .route(
            "/api/interview/analyze",
            post(routes::interview::analyze_answer),
        )
        .layer(axum::middleware::from_fn_with_state(
            TurnLimiter::new(rps),
            limit_requests,
        ));

    Router::new()
        .route("/health", get(routes::health::health))
        .merge(interview_api)
        .with_state(state)
}
