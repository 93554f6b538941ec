//! Quizzer server
//!
//! SQLite-backed quiz store, the creation rules around it and the REST API
//! that exposes both.

pub mod api;
pub mod config;
pub mod error;
pub mod service;
pub mod store;

pub use api::{create_router, AppState, ErrorResponse};
pub use config::Config;
pub use error::{QuizError, Result};
pub use service::{QuizService, CHECKBOX_WITHOUT_OPTIONS};
pub use store::{QuizStore, RowCounts};
