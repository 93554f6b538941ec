//! Error types for quiz authoring and quiz taking.

use crate::model::QuestionType;

/// A question type tag that is not one of `BOOLEAN`, `INPUT`, `CHECKBOX`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid question type '{0}': expected one of 'BOOLEAN', 'INPUT', 'CHECKBOX'")]
pub struct InvalidQuestionType(pub String);

/// Reason a candidate quiz was rejected before submission.
///
/// The display text is the message shown next to the authoring form. Variants
/// that concern a single question carry its zero-based index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title is empty after trimming.
    #[error("Please enter a quiz title")]
    EmptyTitle,

    /// The quiz has no questions.
    #[error("Please add at least one question")]
    NoQuestions,

    /// A question has empty text.
    #[error("All questions must have text")]
    EmptyQuestionText {
        /// Offending question.
        index: usize,
    },

    /// An INPUT question has no correct text.
    #[error("All input questions must have a correct answer")]
    MissingCorrectText {
        /// Offending question.
        index: usize,
    },

    /// A CHECKBOX question has fewer than two options.
    #[error("Checkbox questions must have at least 2 options")]
    TooFewOptions {
        /// Offending question.
        index: usize,
    },

    /// A CHECKBOX question has no option flagged correct.
    #[error("Checkbox questions must have at least one correct answer")]
    NoCorrectOption {
        /// Offending question.
        index: usize,
    },

    /// A CHECKBOX option has empty text.
    #[error("All options must have text")]
    EmptyOptionText {
        /// Offending question.
        index: usize,
        /// Offending option.
        option: usize,
    },
}

impl ValidationError {
    /// The question the error refers to, if any.
    #[must_use]
    pub const fn question_index(&self) -> Option<usize> {
        match self {
            Self::EmptyTitle | Self::NoQuestions => None,
            Self::EmptyQuestionText { index }
            | Self::MissingCorrectText { index }
            | Self::TooFewOptions { index }
            | Self::NoCorrectOption { index }
            | Self::EmptyOptionText { index, .. } => Some(*index),
        }
    }
}

/// Errors raised by the quiz-taking session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Answers are frozen once the quiz is submitted.
    #[error("Quiz already submitted: reset it to change answers")]
    Submitted,

    /// The requested phase change is not allowed from the current phase.
    #[error("Invalid state transition: cannot go from {from} to {to}")]
    InvalidTransition {
        /// Current phase.
        from: String,
        /// Requested phase.
        to: String,
    },

    /// Question index out of range. Indices are zero-based; messages number
    /// questions and options from one.
    #[error("No question {} (quiz has {total})", .index + 1)]
    NoSuchQuestion {
        /// Requested index.
        index: usize,
        /// Number of questions.
        total: usize,
    },

    /// Option index out of range for a CHECKBOX question.
    #[error("Question {} has no option {}", .question + 1, .option + 1)]
    NoSuchOption {
        /// Question index.
        question: usize,
        /// Requested option index.
        option: usize,
    },

    /// The answer kind does not fit the question type.
    #[error("Question {} is a {} question", .index + 1, .expected)]
    WrongAnswerKind {
        /// Question index.
        index: usize,
        /// The question's actual type.
        expected: QuestionType,
    },
}

impl SessionError {
    /// Creates a new `InvalidTransition` error.
    #[must_use]
    pub fn invalid_transition(from: impl std::fmt::Display, to: impl std::fmt::Display) -> Self {
        Self::InvalidTransition {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}
