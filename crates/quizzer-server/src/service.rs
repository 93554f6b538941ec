//! Quiz creation and lookup rules layered over [`QuizStore`].

use quizzer_core::{validate_quiz, CreatedQuiz, NewQuiz, QuestionType, Quiz, QuizSummary};
use tracing::{info, warn};

use crate::error::{QuizError, Result};
use crate::store::QuizStore;

/// Message returned when a CHECKBOX question arrives without options.
pub const CHECKBOX_WITHOUT_OPTIONS: &str = "Checkbox question must have options";

/// Business operations on quizzes.
#[derive(Debug, Clone)]
pub struct QuizService {
    store: QuizStore,
    strict_validation: bool,
}

impl QuizService {
    /// Creates a service over `store`.
    ///
    /// With `strict_validation`, create requests must also pass the same
    /// checks the authoring form runs before submitting.
    #[must_use]
    pub const fn new(store: QuizStore, strict_validation: bool) -> Self {
        Self {
            store,
            strict_validation,
        }
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &QuizStore {
        &self.store
    }

    /// Normalizes and persists a quiz.
    ///
    /// # Errors
    ///
    /// `QuizError::Validation` if a CHECKBOX question has no options (or, in
    /// strict mode, if the quiz fails authoring validation). Nothing is
    /// written in that case.
    pub async fn create(&self, request: NewQuiz) -> Result<CreatedQuiz> {
        let request = NewQuiz {
            questions: request
                .questions
                .into_iter()
                .map(quizzer_core::QuestionDraft::normalized)
                .collect(),
            ..request
        };

        let missing_options = request.questions.iter().position(|q| {
            q.question_type == QuestionType::Checkbox
                && q.options.as_deref().unwrap_or_default().is_empty()
        });
        if let Some(index) = missing_options {
            warn!(question = index + 1, "Rejected checkbox question without options");
            return Err(QuizError::validation(CHECKBOX_WITHOUT_OPTIONS));
        }

        if self.strict_validation {
            if let Err(e) = validate_quiz(&request) {
                warn!(error = %e, "Rejected quiz failing strict validation");
                return Err(QuizError::validation(e.to_string()));
            }
        }

        self.store.create_quiz(&request).await
    }

    /// Lists quiz summaries.
    pub async fn list(&self) -> Result<Vec<QuizSummary>> {
        self.store.list_quizzes().await
    }

    /// Loads a full quiz.
    pub async fn get(&self, id: i64) -> Result<Quiz> {
        self.store.get_quiz(id).await
    }

    /// Acknowledges an update request. Quizzes are immutable once created,
    /// so nothing is persisted.
    #[must_use]
    pub fn update(&self, id: i64) -> String {
        info!(quiz_id = id, "Update requested; quizzes are immutable");
        format!("This action updates a #{id} quiz")
    }

    /// Deletes a quiz and everything it owns.
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.store.delete_quiz(id).await
    }
}
