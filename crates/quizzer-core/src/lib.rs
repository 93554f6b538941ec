//! Quizzer core
//!
//! Quiz model, authoring validation, answer grading and the quiz-taking
//! session. Everything here is pure and free of I/O.

pub mod draft;
pub mod error;
pub mod grade;
pub mod model;
pub mod session;
pub mod validate;

pub use draft::QuizDraft;
pub use error::{InvalidQuestionType, SessionError, ValidationError};
pub use grade::{grade, grade_question, Answer, AnswerSheet, Grade, Outcome, QuestionResult, Score};
pub use model::{
    CreatedQuiz, NewQuiz, OptionDraft, Question, QuestionDraft, QuestionType, Quiz, QuizOption,
    QuizSummary,
};
pub use session::{Phase, QuizSession};
pub use validate::{validate_question, validate_quiz, MIN_CHECKBOX_OPTIONS};
