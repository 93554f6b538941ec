//! Quizzer Report Generation
//!
//! Turns a graded quiz attempt into a report that can be serialized to JSON
//! for programmatic access or rendered to Markdown for people.
//!
//! # Types
//!
//! - [`AttemptReport`] - The complete report of one attempt
//! - [`ReportSummary`] - Score and whether the answer key is included
//! - [`QuestionReport`] - One question with its outcome and answers
//!
//! # Generators
//!
//! - [`json::JsonGenerator`] - Generate JSON reports with compact or pretty formatting
//! - [`MarkdownGenerator`] - Generate human-readable Markdown reports
//!
//! # Example
//!
//! ```rust
//! use chrono::Utc;
//! use quizzer_core::{grade, Answer, AnswerSheet, Question, QuestionType, Quiz};
//! use quizzer_report::{AttemptReport, MarkdownGenerator};
//!
//! let quiz = Quiz {
//!     id: 1,
//!     title: "Basics".to_string(),
//!     description: String::new(),
//!     questions: vec![Question {
//!         id: 1,
//!         question_type: QuestionType::Boolean,
//!         question_text: "Is Rust memory safe?".to_string(),
//!         correct_answer: Some(true),
//!         correct_text: None,
//!         options: vec![],
//!     }],
//!     created_at: Utc::now(),
//!     updated_at: Utc::now(),
//! };
//! let answers = AnswerSheet::from([(0, Answer::Boolean(true))]);
//! let grade = grade(&quiz, &answers);
//!
//! let report = AttemptReport::new(&quiz, &grade, &answers, true).unwrap();
//! assert_eq!(report.summary.percentage, 100);
//!
//! let markdown = MarkdownGenerator::new(&report).generate();
//! assert!(markdown.contains("# Quiz Results: Basics"));
//! ```

pub mod json;
mod markdown;

pub use markdown::MarkdownGenerator;

use chrono::{DateTime, Utc};
use quizzer_core::{Answer, AnswerSheet, Grade, Outcome, Question, QuestionType, Quiz, QuizSession};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur during report generation.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to serialize the report to JSON.
    #[error("failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Failed to read or write report files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid report data.
    #[error("invalid report data: {0}")]
    InvalidData(String),
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

// ============================================================================
// Report
// ============================================================================

/// Report of one graded attempt at a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptReport {
    /// Identifier of the quiz.
    pub quiz_id: i64,
    /// Title of the quiz.
    pub quiz_title: String,
    /// Score summary.
    pub summary: ReportSummary,
    /// Every question in quiz order.
    pub questions: Vec<QuestionReport>,
    /// When the attempt was graded.
    pub taken_at: DateTime<Utc>,
}

/// Score of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    /// Correctly answered questions.
    pub correct: usize,
    /// Questions in the quiz.
    pub total: usize,
    /// Rounded percentage.
    pub percentage: usize,
    /// Whether correct answers are included in the report.
    pub answers_revealed: bool,
}

impl ReportSummary {
    /// Score as a fraction string, e.g. `"3/4"`.
    #[must_use]
    pub fn fraction(&self) -> String {
        format!("{}/{}", self.correct, self.total)
    }
}

/// One question of an attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionReport {
    /// One-based position in the quiz.
    pub number: usize,
    /// Question type.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The question as shown to the quiz taker.
    pub question_text: String,
    /// Grading outcome.
    pub outcome: Outcome,
    /// The submitted answer, rendered as text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub your_answer: Option<String>,
    /// The correct answer, only when the answer key is revealed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<String>,
}

impl AttemptReport {
    /// Builds a report from a graded attempt.
    ///
    /// With `reveal_answers`, each question also carries its correct answer.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidData`] if `grade` does not cover exactly
    /// the questions of `quiz`.
    pub fn new(
        quiz: &Quiz,
        grade: &Grade,
        answers: &AnswerSheet,
        reveal_answers: bool,
    ) -> Result<Self> {
        if grade.results.len() != quiz.questions.len() || grade.score.total != quiz.questions.len()
        {
            return Err(ReportError::InvalidData(format!(
                "grade covers {} questions but quiz '{}' has {}",
                grade.results.len(),
                quiz.title,
                quiz.questions.len()
            )));
        }

        let questions = quiz
            .questions
            .iter()
            .zip(&grade.results)
            .enumerate()
            .map(|(index, (question, result))| QuestionReport {
                number: index + 1,
                question_type: question.question_type,
                question_text: question.question_text.clone(),
                outcome: result.outcome,
                your_answer: answers
                    .get(&index)
                    .map(|answer| describe_answer(question, answer)),
                correct_answer: reveal_answers.then(|| describe_correct_answer(question)),
            })
            .collect();

        Ok(Self {
            quiz_id: quiz.id,
            quiz_title: quiz.title.clone(),
            summary: ReportSummary {
                correct: grade.score.correct,
                total: grade.score.total,
                percentage: grade.score.percentage(),
                answers_revealed: reveal_answers,
            },
            questions,
            taken_at: Utc::now(),
        })
    }

    /// Builds a report from a submitted session, revealing answers if the
    /// session currently shows them.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::InvalidData`] if the session has not been submitted.
    pub fn from_session(session: &QuizSession) -> Result<Self> {
        let grade = session.grade().ok_or_else(|| {
            ReportError::InvalidData("quiz has not been submitted yet".to_string())
        })?;
        Self::new(session.quiz(), grade, session.answers(), session.show_answers())
    }

    /// Overrides the time the attempt was graded.
    #[must_use]
    pub fn with_taken_at(mut self, taken_at: DateTime<Utc>) -> Self {
        self.taken_at = taken_at;
        self
    }

    /// Number of questions with the given outcome.
    #[must_use]
    pub fn count(&self, outcome: Outcome) -> usize {
        self.questions.iter().filter(|q| q.outcome == outcome).count()
    }
}

// ============================================================================
// Answer rendering
// ============================================================================

fn yes_no(value: bool) -> String {
    let text = if value { "True" } else { "False" };
    text.to_string()
}

fn option_texts(question: &Question, indices: impl IntoIterator<Item = usize>) -> String {
    let texts: Vec<String> = indices
        .into_iter()
        .map(|i| {
            question
                .options
                .get(i)
                .map_or_else(|| format!("option #{}", i + 1), |o| o.text.clone())
        })
        .collect();

    if texts.is_empty() {
        "Nothing selected".to_string()
    } else {
        texts.join(", ")
    }
}

fn describe_answer(question: &Question, answer: &Answer) -> String {
    match answer {
        Answer::Boolean(value) => yes_no(*value),
        Answer::Text(text) => text.clone(),
        Answer::Checkbox(selected) => option_texts(question, selected.iter().copied()),
    }
}

fn describe_correct_answer(question: &Question) -> String {
    match question.question_type {
        QuestionType::Boolean => question
            .correct_answer
            .map_or_else(|| "Not set".to_string(), yes_no),
        QuestionType::Input => question
            .correct_text
            .clone()
            .unwrap_or_else(|| "Not set".to_string()),
        QuestionType::Checkbox => option_texts(question, question.correct_option_indices()),
    }
}
