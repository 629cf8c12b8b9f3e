#![allow(dead_code)]

use interview_backend::services::ai_service::AnalyzerSettings;
use interview_backend::services::question_bank::QuestionBank;
use serde_json::{json, Value as JsonValue};
use std::collections::HashMap;
use std::time::Duration;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const CHAT_PATH: &str = "/v1/chat/completions";

pub fn sample_bank() -> QuestionBank {
    QuestionBank::from_json(include_str!("../../data/questions.json")).expect("sample bank")
}

/// Bank where every category holds exactly `per_category` distinct texts.
pub fn bank_with(per_category: usize) -> QuestionBank {
    let raw: HashMap<String, Vec<String>> = interview_backend::models::question::Category::ALL
        .iter()
        .map(|c| {
            let questions = (1..=per_category)
                .map(|i| format!("{} question {}", c, i))
                .collect();
            (c.to_string(), questions)
        })
        .collect();
    QuestionBank::from_map(raw).expect("bank")
}

pub fn settings_for(server: &MockServer) -> AnalyzerSettings {
    AnalyzerSettings {
        api_key: "sk-test".to_string(),
        api_url: format!("{}{}", server.uri(), CHAT_PATH),
        model: "gpt-test".to_string(),
        temperature: 0.3,
        max_tokens: 1000,
        timeout: Duration::from_secs(5),
    }
}

/// Analysis as the reasoning service would phrase it.
pub fn analysis_json(scores: JsonValue, classification: &str) -> JsonValue {
    json!({
        "scores": scores,
        "classification": classification,
        "feedback": {
            "overall": "Clear and specific answer.",
            "by_criterion": {
                "communication_quality": "Confident delivery.",
                "red_flags": "None detected."
            },
            "improvements": ["Name a specific professor."]
        }
    })
}

pub fn chat_completion(content: &str) -> JsonValue {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            { "index": 0, "message": { "role": "assistant", "content": content }, "finish_reason": "stop" }
        ]
    })
}

pub async fn mount_reply(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion(content)))
        .mount(server)
        .await;
}
