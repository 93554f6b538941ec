//! End-to-end quiz flow: author a quiz, create it through the client, take
//! it, grade it, report on it and delete it.

use std::collections::BTreeSet;
use std::net::TcpListener;
use std::time::Duration;

use quizzer_client::{is_not_found, QuizClient};
use quizzer_core::{
    Outcome, OptionDraft, QuestionDraft, QuestionType, QuizDraft, QuizSession, Score,
};
use quizzer_report::{json::JsonGenerator, AttemptReport, MarkdownGenerator};
use quizzer_server::{create_router, AppState, Config, QuizStore};

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Spawns the test server and returns a client pointed at it.
async fn spawn_test_server(state: AppState) -> (QuizClient, tokio::task::JoinHandle<()>) {
    let port = find_available_port();
    let addr = format!("127.0.0.1:{port}");

    let router = create_router(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("Server failed");
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    (QuizClient::new(format!("http://{addr}")), handle)
}

fn authored_quiz() -> QuizDraft {
    let mut draft = QuizDraft::new();
    draft.set_title("Programming");
    draft.set_description("Languages and tools");

    let q = draft.add_question(QuestionType::Boolean);
    if let Some(question) = draft.question_mut(q) {
        question.question_text = "Rust has a garbage collector".to_string();
        question.correct_answer = Some(false);
    }

    let q = draft.add_question(QuestionType::Input);
    if let Some(question) = draft.question_mut(q) {
        question.question_text = "Rust's package manager".to_string();
        question.correct_text = Some("Cargo".to_string());
    }

    let q = draft.add_question(QuestionType::Checkbox);
    if let Some(question) = draft.question_mut(q) {
        question.question_text = "Compiled languages".to_string();
    }
    draft.update_option(q, 0, Some("Rust".to_string()), Some(true));
    draft.add_option(q);
    draft.update_option(q, 1, Some("Python".to_string()), Some(false));
    draft.add_option(q);
    draft.update_option(q, 2, Some("Go".to_string()), Some(true));

    let q = draft.add_question(QuestionType::Boolean);
    if let Some(question) = draft.question_mut(q) {
        question.question_text = "Cargo can run tests".to_string();
        question.correct_answer = Some(true);
    }

    draft
}

#[tokio::test]
async fn test_author_take_report_delete() {
    let store = QuizStore::in_memory().await.expect("store");
    let (client, _handle) = spawn_test_server(AppState::new(Config::default(), store)).await;

    let draft = authored_quiz();
    draft.validate().expect("draft is valid");
    let created = client
        .create_quiz(&draft.to_request())
        .await
        .expect("Failed to create quiz");

    let summaries = client.list_quizzes().await.expect("Failed to list");
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].number_of_questions, 4);

    let quiz = client.get_quiz(created.id).await.expect("Failed to fetch");
    let mut session = QuizSession::new(quiz);

    session.answer_boolean(0, false).expect("answer q1");
    session.answer_text(1, "  cargo ").expect("answer q2");
    session.toggle_option(2, 0).expect("select Rust");
    session.toggle_option(2, 2).expect("select Go");
    session.answer_boolean(3, false).expect("answer q4");

    let grade = session.submit().expect("submit");
    assert_eq!(grade.score, Score { correct: 3, total: 4 });
    assert_eq!(grade.score.fraction(), "3/4");
    assert_eq!(grade.score.percentage(), 75);
    assert_eq!(session.outcome(3), Some(Outcome::Incorrect));

    session.toggle_show_answers();
    let report = AttemptReport::from_session(&session).expect("report");
    let markdown = MarkdownGenerator::new(&report).generate();
    assert!(markdown.contains("| Score | 3/4 |"));
    assert!(markdown.contains("**Correct Answer**: Rust, Go"));

    let json = JsonGenerator::new(&report).generate().expect("json");
    assert!(json.contains(r#""percentage":75"#));

    client.delete_quiz(created.id).await.expect("Failed to delete");
    let err = client.get_quiz(created.id).await.expect_err("quiz is gone");
    assert!(is_not_found(&err));
    assert!(client.list_quizzes().await.expect("list").is_empty());
}

#[tokio::test]
async fn test_grading_is_repeatable_after_reset() {
    let store = QuizStore::in_memory().await.expect("store");
    let (client, _handle) = spawn_test_server(AppState::new(Config::default(), store)).await;

    let created = client
        .create_quiz(&authored_quiz().to_request())
        .await
        .expect("Failed to create quiz");
    let quiz = client.get_quiz(created.id).await.expect("Failed to fetch");

    let mut session = QuizSession::new(quiz);
    for option in [0, 1, 2] {
        session.toggle_option(2, option).expect("select");
    }
    let first = session.submit().expect("submit");
    assert_eq!(first.outcome(2), Some(Outcome::Incorrect));

    session.reset();
    for option in [0, 1, 2] {
        session.toggle_option(2, option).expect("select");
    }
    assert_eq!(session.submit().expect("submit"), first);
    assert_eq!(
        session.answers().get(&2),
        Some(&quizzer_core::Answer::Checkbox(BTreeSet::from([0, 1, 2])))
    );
}

#[tokio::test]
async fn test_strict_server_rejects_single_option_checkbox() {
    let config = Config {
        strict_validation: true,
        ..Default::default()
    };
    let store = QuizStore::in_memory().await.expect("store");
    let (client, _handle) = spawn_test_server(AppState::new(config, store)).await;

    let quiz = quizzer_core::NewQuiz {
        title: "Strict".to_string(),
        description: String::new(),
        questions: vec![QuestionDraft::checkbox(
            "Pick",
            vec![OptionDraft::new("only", true)],
        )],
    };

    let err = client.create_quiz(&quiz).await.expect_err("rejected");
    assert_eq!(
        err.to_string(),
        "Checkbox questions must have at least 2 options"
    );
}

#[tokio::test]
async fn test_file_database_survives_reopen() {
    let path = std::env::temp_dir().join(format!("quizzer-it-{}.db", find_available_port()));
    let url = format!("sqlite://{}", path.display());

    let id = {
        let store = QuizStore::connect(&url, 2).await.expect("open");
        let created = store
            .create_quiz(&authored_quiz().to_request())
            .await
            .expect("create");
        store.pool().close().await;
        created.id
    };

    let store = QuizStore::connect(&url, 2).await.expect("reopen");
    let quiz = store.get_quiz(id).await.expect("quiz persisted");
    assert_eq!(quiz.title, "Programming");
    assert_eq!(quiz.questions[2].options.len(), 3);
    store.pool().close().await;

    std::fs::remove_file(&path).ok();
}
