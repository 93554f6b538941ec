//! Quizzer client
//!
//! Typed access to the quiz REST API. Failed calls surface the server's own
//! error message when it sends one.
//!
//! ```no_run
//! # async fn example() -> quizzer_client::Result<()> {
//! let client = quizzer_client::QuizClient::new("http://127.0.0.1:3000");
//! for quiz in client.list_quizzes().await? {
//!     println!("{} ({} questions)", quiz.title, quiz.number_of_questions);
//! }
//! # Ok(())
//! # }
//! ```

pub mod error;

use quizzer_core::{CreatedQuiz, NewQuiz, Quiz, QuizSummary};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

pub use error::{ClientError, Result};

/// Default server location.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000";

/// Client for the `/quizzes` resource.
#[derive(Debug, Clone)]
pub struct QuizClient {
    http: reqwest::Client,
    base_url: String,
}

impl QuizClient {
    /// Creates a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// The server this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/quizzes{path}", self.base_url)
    }

    /// `POST /quizzes`.
    pub async fn create_quiz(&self, quiz: &NewQuiz) -> Result<CreatedQuiz> {
        debug!(title = %quiz.title, "Creating quiz");
        let response = self.http.post(self.url("")).json(quiz).send().await?;
        read_json(response, "Failed to create quiz").await
    }

    /// `GET /quizzes`.
    pub async fn list_quizzes(&self) -> Result<Vec<QuizSummary>> {
        let response = self.http.get(self.url("")).send().await?;
        read_json(response, "Failed to fetch quizzes").await
    }

    /// `GET /quizzes/:id`.
    pub async fn get_quiz(&self, id: i64) -> Result<Quiz> {
        let response = self.http.get(self.url(&format!("/{id}"))).send().await?;
        read_json(response, "Failed to fetch quiz").await
    }

    /// `PATCH /quizzes/:id`. The server only acknowledges the request.
    pub async fn update_quiz(&self, id: i64, changes: &serde_json::Value) -> Result<String> {
        let response = self
            .http
            .patch(self.url(&format!("/{id}")))
            .json(changes)
            .send()
            .await?;
        let response = check_status(response, "Failed to update quiz").await?;
        Ok(response.text().await?)
    }

    /// `DELETE /quizzes/:id`.
    pub async fn delete_quiz(&self, id: i64) -> Result<()> {
        debug!(quiz_id = id, "Deleting quiz");
        let response = self.http.delete(self.url(&format!("/{id}"))).send().await?;
        check_status(response, "Failed to delete quiz").await?;
        Ok(())
    }
}

async fn check_status(response: Response, fallback: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(%status, body = %body, "Request failed");
    Err(ClientError::from_response(status, &body, fallback))
}

async fn read_json<T: DeserializeOwned>(response: Response, fallback: &str) -> Result<T> {
    let response = check_status(response, fallback).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

/// Returns `true` if `err` means the quiz does not exist.
#[must_use]
pub fn is_not_found(err: &ClientError) -> bool {
    err.status() == Some(StatusCode::NOT_FOUND)
}
