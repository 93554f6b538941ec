//! Answer grading.
//!
//! Grading compares an [`AnswerSheet`] against the correctness data of a
//! persisted [`Quiz`]. It is a pure function: the same quiz and sheet always
//! produce the same [`Grade`], and neither input is modified.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::{Question, QuestionType, Quiz};

// ============================================================================
// Answers
// ============================================================================

/// A quiz taker's answer to one question.
///
/// Serialized as `{"boolean": true}`, `{"text": "Paris"}` or
/// `{"checkbox": [0, 2]}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Answer {
    /// Answer to a BOOLEAN question.
    Boolean(bool),
    /// Answer to an INPUT question.
    Text(String),
    /// Selected option indices of a CHECKBOX question.
    Checkbox(BTreeSet<usize>),
}

impl Answer {
    /// The question type this answer fits.
    #[must_use]
    pub const fn question_type(&self) -> QuestionType {
        match self {
            Self::Boolean(_) => QuestionType::Boolean,
            Self::Text(_) => QuestionType::Input,
            Self::Checkbox(_) => QuestionType::Checkbox,
        }
    }
}

/// Answers keyed by zero-based question index. Missing keys are unanswered.
pub type AnswerSheet = BTreeMap<usize, Answer>;

// ============================================================================
// Results
// ============================================================================

/// Grading outcome of one question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The answer matches the stored correct answer.
    Correct,
    /// The answer does not match.
    Incorrect,
    /// No answer was given. Counts as incorrect.
    Unanswered,
}

impl Outcome {
    /// Returns `true` only for [`Outcome::Correct`].
    #[must_use]
    pub const fn is_correct(&self) -> bool {
        matches!(self, Self::Correct)
    }

    const fn from_bool(correct: bool) -> Self {
        if correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }
}

/// Per-question grading result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    /// Zero-based question index.
    pub index: usize,
    /// Outcome.
    pub outcome: Outcome,
}

/// Aggregate score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Number of correctly answered questions.
    pub correct: usize,
    /// Number of questions in the quiz.
    pub total: usize,
}

impl Score {
    /// Score as a fraction string, e.g. `"3/4"`.
    #[must_use]
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.correct, self.total)
    }

    /// Score as a percentage rounded to the nearest integer (halves round up).
    ///
    /// An empty quiz scores 0%.
    ///
    /// ```
    /// use quizzer_core::Score;
    ///
    /// assert_eq!(Score { correct: 3, total: 4 }.percentage(), 75);
    /// assert_eq!(Score { correct: 1, total: 3 }.percentage(), 33);
    /// assert_eq!(Score { correct: 2, total: 3 }.percentage(), 67);
    /// assert_eq!(Score { correct: 0, total: 0 }.percentage(), 0);
    /// ```
    #[must_use]
    pub const fn percentage(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        (self.correct * 200 + self.total) / (self.total * 2)
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}%)", self.fraction(), self.percentage())
    }
}

/// Result of grading a whole quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    /// One result per question, in question order.
    pub results: Vec<QuestionResult>,
    /// Aggregate score.
    pub score: Score,
}

impl Grade {
    /// Outcome of the question at `index`, if the quiz has one.
    #[must_use]
    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.results.get(index).map(|r| r.outcome)
    }
}

// ============================================================================
// Grading
// ============================================================================

/// Grades every question of `quiz` against `answers`.
///
/// # Examples
///
/// ```
/// use quizzer_core::{grade, Answer, AnswerSheet};
/// # use quizzer_core::{Question, QuestionType, Quiz};
/// # let quiz = Quiz {
/// #     id: 1,
/// #     title: "T".into(),
/// #     description: String::new(),
/// #     questions: vec![Question {
/// #         id: 1,
/// #         question_type: QuestionType::Input,
/// #         question_text: "Capital of France?".into(),
/// #         correct_answer: None,
/// #         correct_text: Some("Paris".into()),
/// #         options: vec![],
/// #     }],
/// #     created_at: chrono::Utc::now(),
/// #     updated_at: chrono::Utc::now(),
/// # };
///
/// let mut answers = AnswerSheet::new();
/// answers.insert(0, Answer::Text(" paris ".into()));
///
/// let grade = grade(&quiz, &answers);
/// assert_eq!(grade.score.fraction(), "1/1");
/// ```
#[must_use]
pub fn grade(quiz: &Quiz, answers: &AnswerSheet) -> Grade {
    let results: Vec<QuestionResult> = quiz
        .questions
        .iter()
        .enumerate()
        .map(|(index, question)| QuestionResult {
            index,
            outcome: grade_question(question, answers.get(&index)),
        })
        .collect();

    let correct = results.iter().filter(|r| r.outcome.is_correct()).count();

    Grade {
        score: Score {
            correct,
            total: results.len(),
        },
        results,
    }
}

/// Grades a single question.
#[must_use]
pub fn grade_question(question: &Question, answer: Option<&Answer>) -> Outcome {
    let Some(answer) = answer else {
        return Outcome::Unanswered;
    };

    let correct = match (question.question_type, answer) {
        (QuestionType::Boolean, Answer::Boolean(given)) => question.correct_answer == Some(*given),
        (QuestionType::Input, Answer::Text(given)) => question
            .correct_text
            .as_deref()
            .is_some_and(|expected| normalize_text(given) == normalize_text(expected)),
        (QuestionType::Checkbox, Answer::Checkbox(selected)) => {
            *selected == question.correct_option_indices()
        }
        _ => false,
    };

    Outcome::from_bool(correct)
}

/// Case-folds and trims free text for comparison.
fn normalize_text(text: &str) -> String {
    text.trim().to_lowercase()
}
