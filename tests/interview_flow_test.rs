mod common;

use std::sync::Arc;
use std::time::Duration;

use interview_backend::error::Error;
use interview_backend::models::analysis::Classification;
use interview_backend::models::session::{Difficulty, Grade, Session, SessionStatus};
use interview_backend::services::ai_service::{AnalyzerService, AnalyzerSettings};
use interview_backend::services::session_service::{
    InMemorySessionStore, InterviewService, SessionStore,
};
use mockall::mock;
use reqwest::Client;
use serde_json::{json, Value as JsonValue};
use tokio_test::{assert_err, assert_ok};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mock! {
    pub Store {}

    impl SessionStore for Store {
        fn get(&self, id: Uuid) -> interview_backend::error::Result<Option<Session>>;
        fn save(&self, session: &Session) -> interview_backend::error::Result<()>;
    }
}

/// Two criteria every category scores, so the same reply fits any question.
fn generic_reply() -> String {
    common::analysis_json(
        json!({ "communication_quality": 4, "red_flags": 5, "total_score": 9 }),
        "Excellent",
    )
    .to_string()
}

fn service(server: &MockServer, store: Arc<dyn SessionStore>) -> InterviewService {
    service_with(common::settings_for(server), store)
}

fn service_with(settings: AnalyzerSettings, store: Arc<dyn SessionStore>) -> InterviewService {
    let analyzer = AnalyzerService::new(settings, Client::new());
    InterviewService::new(Arc::new(common::sample_bank()), analyzer, store)
}

fn memory_service(server: &MockServer) -> InterviewService {
    service(server, Arc::new(InMemorySessionStore::new()))
}

async fn request_count(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .map(|r| r.len())
        .unwrap_or_default()
}

#[tokio::test]
async fn easy_session_runs_to_a_summary() {
    let server = MockServer::start().await;
    common::mount_reply(&server, &generic_reply()).await;
    let interview = memory_service(&server);

    let session = assert_ok!(interview.start_session(Some("student-7".to_string()), Difficulty::Easy));
    assert_eq!(session.selected_questions.len(), 4);
    assert_eq!(session.status, SessionStatus::Active);

    let mut last = None;
    for turn in 1..=4 {
        let outcome = interview
            .submit_answer(session.id, "  I will study data science at State University.  ")
            .await
            .expect("turn");
        assert_eq!(outcome.answered, turn);
        assert_eq!(outcome.analysis.total_score(), 9);
        assert_eq!(outcome.analysis.classification, Classification::Excellent);
        assert_eq!(outcome.percentage, 87.5);
        last = Some(outcome);
    }

    let last = last.unwrap();
    assert_eq!(last.status, SessionStatus::Finished);
    assert!(last.next_question.is_none());
    let summary = last.summary.expect("summary on final turn");
    assert_eq!(summary.total_questions, 4);
    assert_eq!(summary.average_score, 9.0);
    assert_eq!(summary.overall_grade, Grade::A);
    assert_eq!(
        summary.strong_areas,
        vec!["Communication quality".to_string(), "No red flags".to_string()]
    );

    let stored = interview.get_session(session.id).expect("stored");
    assert_eq!(stored.status, SessionStatus::Finished);
    assert_eq!(stored.answers.len(), 4);
    assert_eq!(
        stored.answers[0].text,
        "I will study data science at State University."
    );
    assert_eq!(stored.summary.as_ref(), Some(&summary));

    let again = interview.get_session(session.id).expect("stored");
    assert_eq!(again.summary, stored.summary);

    let err = assert_err!(interview.submit_answer(session.id, "One more thing").await);
    assert!(matches!(err, Error::Conflict(_)));
    assert_eq!(request_count(&server).await, 4);
}

#[tokio::test]
async fn provider_failure_leaves_the_turn_retryable() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::CHAT_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream overloaded"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    common::mount_reply(&server, &generic_reply()).await;
    let interview = memory_service(&server);
    let session = interview
        .start_session(None, Difficulty::Hard)
        .expect("session");

    let err = interview
        .submit_answer(session.id, "My parents sponsor me.")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider(_)));
    assert!(err.is_retryable());

    let unchanged = interview.get_session(session.id).expect("stored");
    assert_eq!(unchanged.question_index, 0);
    assert!(unchanged.answers.is_empty());
    assert_eq!(unchanged.status, SessionStatus::Active);

    let outcome = interview
        .submit_answer(session.id, "My parents sponsor me.")
        .await
        .expect("retry");
    assert_eq!(outcome.answered, 1);
    assert_eq!(outcome.question_id, session.selected_questions[0].id);
}

#[tokio::test]
async fn undecodable_reply_does_not_advance_the_session() {
    let server = MockServer::start().await;
    common::mount_reply(&server, "I'm sorry, I can't evaluate that answer.").await;
    let interview = memory_service(&server);
    let session = interview
        .start_session(None, Difficulty::Easy)
        .expect("session");

    let err = interview
        .submit_answer(session.id, "Because it is ranked highly.")
        .await
        .unwrap_err();

    match &err {
        Error::Decode { raw, .. } => assert!(raw.contains("can't evaluate")),
        other => panic!("expected decode error, got {:?}", other),
    }
    assert!(!err.is_retryable());
    let unchanged = interview.get_session(session.id).expect("stored");
    assert_eq!(unchanged.question_index, 0);
}

#[tokio::test]
async fn aborted_session_refuses_answers_without_calling_the_service() {
    let server = MockServer::start().await;
    common::mount_reply(&server, &generic_reply()).await;
    let interview = memory_service(&server);
    let session = interview
        .start_session(None, Difficulty::Medium)
        .expect("session");

    let aborted = interview.abort_session(session.id).expect("abort");
    assert_eq!(aborted.status, SessionStatus::Aborted);
    assert!(aborted.summary.is_none());

    let err = interview
        .submit_answer(session.id, "Anything")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(ref msg) if msg.contains("aborted")));
    assert!(matches!(
        interview.abort_session(session.id),
        Err(Error::Conflict(_))
    ));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn blank_answers_and_unknown_sessions_are_rejected() {
    let server = MockServer::start().await;
    let interview = memory_service(&server);
    let session = interview
        .start_session(None, Difficulty::Easy)
        .expect("session");

    let err = interview.submit_answer(session.id, "   ").await.unwrap_err();
    assert!(matches!(err, Error::BadRequest(_)));

    let err = interview
        .submit_answer(Uuid::new_v4(), "Hello")
        .await
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
    assert!(matches!(
        interview.get_session(Uuid::new_v4()),
        Err(Error::NotFound(_))
    ));
    assert_eq!(request_count(&server).await, 0);
}

#[tokio::test]
async fn each_turn_replays_earlier_exchanges() {
    let server = MockServer::start().await;
    common::mount_reply(&server, &generic_reply()).await;
    let interview = memory_service(&server);
    let session = interview
        .start_session(None, Difficulty::Easy)
        .expect("session");

    interview
        .submit_answer(session.id, "To specialise in machine learning.")
        .await
        .expect("first turn");
    interview
        .submit_answer(session.id, "I hold a BSc in computer science.")
        .await
        .expect("second turn");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);

    let first: JsonValue = requests[0].body_json().expect("json body");
    assert_eq!(first["messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(first["model"], "gpt-test");

    let second: JsonValue = requests[1].body_json().expect("json body");
    let messages = second["messages"].as_array().expect("messages");
    let roles: Vec<&str> = messages
        .iter()
        .map(|m| m["role"].as_str().unwrap_or_default())
        .collect();
    assert_eq!(roles, vec!["system", "user", "assistant", "user"]);

    let replayed = messages[1]["content"].as_str().unwrap_or_default();
    assert!(replayed.contains(&session.selected_questions[0].text));
    assert!(replayed.contains("To specialise in machine learning."));

    let prior: JsonValue =
        serde_json::from_str(messages[2]["content"].as_str().unwrap_or_default()).expect("analysis");
    assert_eq!(prior["scores"]["total_score"], 9);

    let current = messages[3]["content"].as_str().unwrap_or_default();
    assert!(current.starts_with("Category: Academic Background\n"));
    assert!(current.ends_with("Student's Answer: I hold a BSc in computer science."));
}

#[tokio::test]
async fn failed_turn_never_writes_to_the_store() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::CHAT_PATH))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let bank = common::sample_bank();
    let questions = interview_backend::services::selection_service::select_questions(
        &bank,
        Difficulty::Easy,
        &mut rand::thread_rng(),
    );
    let session = Session::new(None, Difficulty::Easy, questions);
    let id = session.id;

    let mut store = MockStore::new();
    store
        .expect_get()
        .withf(move |requested| *requested == id)
        .times(1)
        .returning(move |_| Ok(Some(session.clone())));
    store.expect_save().never();

    let interview = service(&server, Arc::new(store));
    let err = interview.submit_answer(id, "Scholarship covers it.").await.unwrap_err();

    assert!(err.is_retryable());
}

#[tokio::test]
async fn slow_reasoning_service_times_out_without_touching_the_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(common::CHAT_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::chat_completion(&generic_reply()))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;
    let mut settings = common::settings_for(&server);
    settings.timeout = Duration::from_millis(200);

    let bank = common::sample_bank();
    let questions = interview_backend::services::selection_service::select_questions(
        &bank,
        Difficulty::Easy,
        &mut rand::thread_rng(),
    );
    let session = Session::new(None, Difficulty::Easy, questions);
    let id = session.id;

    let mut store = MockStore::new();
    store
        .expect_get()
        .times(1)
        .returning(move |_| Ok(Some(session.clone())));
    store.expect_save().never();

    let interview = service_with(settings.clone(), Arc::new(store));
    let err = interview.submit_answer(id, "My parents will pay.").await.unwrap_err();
    match &err {
        Error::Reqwest(e) => assert!(e.is_timeout(), "{}", e),
        other => panic!("expected timeout, got {:?}", other),
    }
    assert!(err.is_retryable());

    let interview = service_with(settings, Arc::new(InMemorySessionStore::new()));
    let session = interview
        .start_session(None, Difficulty::Easy)
        .expect("session");
    let err = interview
        .submit_answer(session.id, "My parents will pay.")
        .await
        .unwrap_err();
    assert!(err.is_retryable());

    let unchanged = interview.get_session(session.id).expect("stored");
    assert_eq!(unchanged.question_index, 0);
    assert!(unchanged.answers.is_empty());
    assert_eq!(unchanged.status, SessionStatus::Active);
}

#[tokio::test]
async fn store_failures_propagate_before_the_service_is_called() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut store = MockStore::new();
    store
        .expect_get()
        .returning(|_| Err(Error::Internal("session store lock poisoned".to_string())));

    let interview = service(&server, Arc::new(store));
    let err = interview
        .submit_answer(Uuid::new_v4(), "Hello")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Internal(_)));
}

#[tokio::test]
async fn standalone_analysis_keeps_only_relevant_criteria() {
    let server = MockServer::start().await;
    let reply = common::analysis_json(
        json!({
            "financial_understanding": 5,
            "migration_intent": 1,
            "communication_quality": 4,
            "red_flags": 4,
            "total_score": 14
        }),
        "Weak",
    );
    common::mount_reply(&server, &format!("```json\n{}\n```", reply)).await;
    let interview = memory_service(&server);

    let analysis = interview
        .analyze_answer(
            Some(interview_backend::models::question::Category::FinancialCapability),
            "How will you fund your studies?",
            "My father's savings and a scholarship.",
        )
        .await
        .expect("analysis");

    assert_eq!(analysis.scores.migration_intent, None);
    assert_eq!(analysis.total_score(), 13);
    assert_eq!(analysis.classification, Classification::Excellent);
}
