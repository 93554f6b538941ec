//! HTTP API for quizzes.
//!
//! # Endpoints
//!
//! - `POST /quizzes` - Create a quiz with its questions and options
//! - `GET /quizzes` - List quiz summaries
//! - `GET /quizzes/:id` - Fetch a full quiz, answer key included
//! - `PATCH /quizzes/:id` - Placeholder; quizzes are immutable
//! - `DELETE /quizzes/:id` - Delete a quiz and everything it owns
//!
//! # Example
//!
//! ```no_run
//! use quizzer_server::{create_router, AppState, Config};
//!
//! # async fn example() -> quizzer_server::Result<()> {
//! let state = AppState::connect(Config::default()).await?;
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, router).await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use quizzer_core::{CreatedQuiz, NewQuiz, Quiz, QuizSummary};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::{Config, QuizError, QuizService, QuizStore};

// ============================================================================
// Response Types
// ============================================================================

/// Error response body returned on failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Description of the error.
    pub error: String,
}

// ============================================================================
// Application State
// ============================================================================

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Config,
    /// Quiz operations.
    pub service: QuizService,
}

impl AppState {
    /// Creates state around an already opened store.
    #[must_use]
    pub fn new(config: Config, store: QuizStore) -> Self {
        let service = QuizService::new(store, config.strict_validation);
        Self { config, service }
    }

    /// Opens the database named in `config` and builds the state around it.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn connect(config: Config) -> crate::Result<Self> {
        let store = QuizStore::connect(&config.database_url, config.max_connections).await?;
        Ok(Self::new(config, store))
    }
}

// ============================================================================
// API Error Type
// ============================================================================

/// Internal error type for API handlers.
#[derive(Debug)]
enum ApiError {
    /// The quiz does not exist.
    NotFound(String),
    /// The request could not be accepted as sent.
    BadRequest(String),
    /// Something failed on our side.
    Internal,
}

impl From<QuizError> for ApiError {
    fn from(err: QuizError) -> Self {
        match err {
            QuizError::NotFound { .. } => Self::NotFound(err.to_string()),
            QuizError::Validation(message) => Self::BadRequest(message),
            other => {
                error!(error = %other, "Request failed");
                Self::Internal
            }
        }
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(format!("Invalid quiz id: {}", rejection.body_text()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

// ============================================================================
// Router Setup
// ============================================================================

/// Creates the HTTP router with all quiz endpoints, CORS open to any origin
/// (the browser front end is served separately) and request tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/quizzes", get(handle_list).post(handle_create))
        .route(
            "/quizzes/:id",
            get(handle_get).patch(handle_update).delete(handle_delete),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(Arc::new(state))
}

// ============================================================================
// Handlers
// ============================================================================

/// Handler for `POST /quizzes`.
async fn handle_create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewQuiz>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedQuiz>), ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected malformed quiz payload");
        ApiError::from(rejection)
    })?;

    info!(
        title = %request.title,
        questions = request.questions.len(),
        "Creating quiz"
    );

    let created = state.service.create(request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Handler for `GET /quizzes`.
async fn handle_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<QuizSummary>>, ApiError> {
    Ok(Json(state.service.list().await?))
}

/// Handler for `GET /quizzes/:id`.
async fn handle_get(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Quiz>, ApiError> {
    let Path(id) = id?;
    let quiz = state.service.get(id).await.map_err(|e| {
        if e.is_client_error() {
            warn!(quiz_id = id, "Quiz not found");
        }
        e
    })?;
    Ok(Json(quiz))
}

/// Handler for `PATCH /quizzes/:id`.
async fn handle_update(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<String, ApiError> {
    let Path(id) = id?;
    Ok(state.service.update(id))
}

/// Handler for `DELETE /quizzes/:id`.
async fn handle_delete(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, ApiError> {
    let Path(id) = id?;
    state.service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use axum::{
        body::Body,
        http::{Method, Request},
    };
    use tower::util::ServiceExt;

    use super::*;

    async fn test_state() -> AppState {
        let store = QuizStore::in_memory().await.expect("in-memory store");
        AppState::new(Config::default(), store)
    }

    fn json_request(method: Method, uri: &str, body: &serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn empty_request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    fn sample_payload() -> serde_json::Value {
        serde_json::json!({
            "title": "Science",
            "description": "Basics",
            "questions": [
                { "type": "BOOLEAN", "questionText": "Water boils at 100C?", "correctAnswer": true },
                { "type": "INPUT", "questionText": "Symbol for gold?", "correctText": "Au" },
                {
                    "type": "CHECKBOX",
                    "questionText": "Noble gases",
                    "options": [
                        { "text": "Neon", "isCorrect": true },
                        { "text": "Iron", "isCorrect": false },
                        { "text": "Argon", "isCorrect": true }
                    ]
                }
            ]
        })
    }

    // ------------------------------------------------------------------------
    // Create endpoint tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_returns_201_with_summary() {
        let router = create_router(test_state().await);

        let response = router
            .oneshot(json_request(Method::POST, "/quizzes", &sample_payload()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let created: CreatedQuiz = body_json(response).await;
        assert_eq!(created.title, "Science");
        assert_eq!(created.description, "Basics");
    }

    #[tokio::test]
    async fn test_create_checkbox_without_options_returns_400() {
        let router = create_router(test_state().await);
        let payload = serde_json::json!({
            "title": "Broken",
            "questions": [{ "type": "CHECKBOX", "questionText": "Pick" }]
        });

        let response = router
            .oneshot(json_request(Method::POST, "/quizzes", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "Checkbox question must have options");
    }

    #[tokio::test]
    async fn test_create_invalid_json_returns_400() {
        let router = create_router(test_state().await);

        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/quizzes")
                    .header("content-type", "application/json")
                    .body(Body::from("{ not json"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body_json(response).await;
        assert!(!error.error.is_empty());
    }

    #[tokio::test]
    async fn test_create_unknown_question_type_returns_400() {
        let router = create_router(test_state().await);
        let payload = serde_json::json!({
            "title": "Odd",
            "questions": [{ "type": "ESSAY", "questionText": "Discuss" }]
        });

        let response = router
            .oneshot(json_request(Method::POST, "/quizzes", &payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    // ------------------------------------------------------------------------
    // Read endpoint tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_list_and_get_after_create() {
        let router = create_router(test_state().await);

        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/quizzes", &sample_payload()))
            .await
            .unwrap();
        let created: CreatedQuiz = body_json(response).await;

        let response = router
            .clone()
            .oneshot(empty_request(Method::GET, "/quizzes"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let list: serde_json::Value = body_json(response).await;
        assert_eq!(list[0]["id"], created.id);
        assert_eq!(list[0]["numberOfQuestions"], 3);
        assert!(list[0]["createdAt"].is_string());

        let response = router
            .oneshot(empty_request(Method::GET, &format!("/quizzes/{}", created.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let quiz: Quiz = body_json(response).await;
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.questions[1].correct_text.as_deref(), Some("Au"));
        assert!(quiz.questions[2].options[0].is_correct);
    }

    #[tokio::test]
    async fn test_get_unknown_returns_404() {
        let router = create_router(test_state().await);

        let response = router
            .oneshot(empty_request(Method::GET, "/quizzes/404"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = body_json(response).await;
        assert_eq!(error.error, "Quiz not found");
    }

    #[tokio::test]
    async fn test_malformed_id_returns_400() {
        let router = create_router(test_state().await);

        let response = router
            .oneshot(empty_request(Method::GET, "/quizzes/abc"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = body_json(response).await;
        assert!(error.error.starts_with("Invalid quiz id"));
    }

    // ------------------------------------------------------------------------
    // Update and delete endpoint tests
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_returns_placeholder() {
        let router = create_router(test_state().await);

        let response = router
            .oneshot(json_request(
                Method::PATCH,
                "/quizzes/3",
                &serde_json::json!({ "title": "Renamed" }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"This action updates a #3 quiz");
    }

    #[tokio::test]
    async fn test_delete_then_get_returns_404() {
        let state = test_state().await;
        let store = state.service.store().clone();
        let router = create_router(state);

        let response = router
            .clone()
            .oneshot(json_request(Method::POST, "/quizzes", &sample_payload()))
            .await
            .unwrap();
        let created: CreatedQuiz = body_json(response).await;
        let uri = format!("/quizzes/{}", created.id);

        let response = router
            .clone()
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let counts = store.row_counts().await.unwrap();
        assert_eq!((counts.quizzes, counts.questions, counts.options), (0, 0, 0));

        let response = router
            .clone()
            .oneshot(empty_request(Method::GET, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = router
            .oneshot(empty_request(Method::DELETE, &uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
