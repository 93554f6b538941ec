//! Integration tests for the quiz REST API over real HTTP.
//!
//! These tests bind the router to an ephemeral port backed by an in-memory
//! SQLite database and check status codes and JSON shapes on the wire.

use std::net::TcpListener;
use std::time::Duration;

use quizzer_server::{create_router, AppState, Config, QuizStore, RowCounts};
use reqwest::StatusCode;
use serde_json::{json, Value};

/// Helper to find an available port for testing.
fn find_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("Failed to bind to port")
        .local_addr()
        .expect("Failed to get local addr")
        .port()
}

/// Spawns the test server and returns its base URL.
async fn spawn_test_server(state: AppState) -> (String, tokio::task::JoinHandle<()>) {
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

    (format!("http://{addr}"), handle)
}

async fn spawn_in_memory() -> (String, QuizStore) {
    let store = QuizStore::in_memory().await.expect("in-memory store");
    let state = AppState::new(Config::default(), store.clone());
    let (url, _handle) = spawn_test_server(state).await;
    (url, store)
}

fn sample_quiz() -> Value {
    json!({
        "title": "Solar System",
        "description": "Planets and moons",
        "questions": [
            { "type": "BOOLEAN", "questionText": "Pluto is a planet", "correctAnswer": false },
            { "type": "INPUT", "questionText": "Largest planet?", "correctText": "Jupiter" },
            {
                "type": "CHECKBOX",
                "questionText": "Gas giants",
                "options": [
                    { "text": "Saturn", "isCorrect": true },
                    { "text": "Mars", "isCorrect": false },
                    { "text": "Jupiter", "isCorrect": true }
                ]
            },
            { "type": "INPUT", "questionText": "Closest star?", "correctText": "The Sun" }
        ]
    })
}

#[tokio::test]
async fn test_create_returns_created_summary() {
    let (url, _) = spawn_in_memory().await;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{url}/quizzes"))
        .json(&sample_quiz())
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert!(body["id"].is_i64());
    assert_eq!(body["title"], "Solar System");
    assert_eq!(body["description"], "Planets and moons");
}

#[tokio::test]
async fn test_list_and_get_shapes() {
    let (url, _) = spawn_in_memory().await;
    let client = reqwest::Client::new();

    let created: Value = client
        .post(format!("{url}/quizzes"))
        .json(&sample_quiz())
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    let id = created["id"].as_i64().expect("numeric id");

    let list: Value = client
        .get(format!("{url}/quizzes"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    assert_eq!(list[0]["id"], id);
    assert_eq!(list[0]["numberOfQuestions"], 4);
    assert!(list[0]["createdAt"].is_string());

    let quiz: Value = client
        .get(format!("{url}/quizzes/{id}"))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse body");
    let questions = quiz["questions"].as_array().expect("questions array");
    assert_eq!(questions.len(), 4);
    assert_eq!(questions[0]["type"], "BOOLEAN");
    assert_eq!(questions[0]["correctAnswer"], false);
    assert_eq!(questions[1]["correctText"], "Jupiter");
    assert_eq!(questions[2]["options"][2]["text"], "Jupiter");
    assert_eq!(questions[2]["options"][2]["isCorrect"], true);
}

#[tokio::test]
async fn test_error_responses() {
    let (url, _) = spawn_in_memory().await;
    let client = reqwest::Client::new();

    let response = client
        .get(format!("{url}/quizzes/12345"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "Quiz not found");

    let response = client
        .get(format!("{url}/quizzes/not-a-number"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{url}/quizzes"))
        .json(&json!({
            "title": "Broken",
            "questions": [{ "type": "CHECKBOX", "questionText": "Pick", "options": [] }]
        }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.expect("Failed to parse body");
    assert_eq!(body["error"], "Checkbox question must have options");
}

#[tokio::test]
async fn test_patch_is_acknowledged_without_changes() {
    let (url, store) = spawn_in_memory().await;
    let client = reqwest::Client::new();

    client
        .post(format!("{url}/quizzes"))
        .json(&sample_quiz())
        .send()
        .await
        .expect("Failed to send request");

    let response = client
        .patch(format!("{url}/quizzes/1"))
        .json(&json!({ "title": "Renamed" }))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.text().await.expect("Failed to read body"),
        "This action updates a #1 quiz"
    );

    let quiz = store.get_quiz(1).await.expect("quiz still stored");
    assert_eq!(quiz.title, "Solar System");
}

#[tokio::test]
async fn test_delete_cascades_to_questions_and_options() {
    let (url, store) = spawn_in_memory().await;
    let client = reqwest::Client::new();

    for _ in 0..2 {
        client
            .post(format!("{url}/quizzes"))
            .json(&sample_quiz())
            .send()
            .await
            .expect("Failed to send request");
    }
    assert_eq!(
        store.row_counts().await.expect("counts"),
        RowCounts {
            quizzes: 2,
            questions: 8,
            options: 6
        }
    );

    let response = client
        .delete(format!("{url}/quizzes/1"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    assert_eq!(
        store.row_counts().await.expect("counts"),
        RowCounts {
            quizzes: 1,
            questions: 4,
            options: 3
        }
    );

    let response = client
        .get(format!("{url}/quizzes/1"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let (url, _) = spawn_in_memory().await;

    let response = reqwest::Client::new()
        .get(format!("{url}/quizzes"))
        .header("Origin", "http://localhost:5173")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}
