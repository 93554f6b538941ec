//! Quiz-taking session state.
//!
//! A session moves between two phases:
//!
//! - `Answering` -> `Submitted` on [`QuizSession::submit`]
//! - `Submitted` -> `Answering` on [`QuizSession::reset`], which also clears
//!   every answer and hides the answer key
//!
//! Revealing the answer key is a separate toggle that works in either phase.

use std::collections::BTreeSet;
use std::fmt;

use crate::error::SessionError;
use crate::grade::{grade, Answer, AnswerSheet, Grade, Outcome};
use crate::model::{QuestionType, Quiz};

/// Phase of a quiz-taking session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Answers can be changed; correctness is hidden.
    Answering,
    /// Answers are frozen and graded.
    Submitted(Grade),
}

impl Phase {
    const fn name(&self) -> &'static str {
        match self {
            Self::Answering => "answering",
            Self::Submitted(_) => "submitted",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One attempt at a quiz.
#[derive(Debug, Clone)]
pub struct QuizSession {
    quiz: Quiz,
    answers: AnswerSheet,
    phase: Phase,
    show_answers: bool,
}

impl QuizSession {
    /// Starts answering `quiz`.
    #[must_use]
    pub fn new(quiz: Quiz) -> Self {
        Self {
            quiz,
            answers: AnswerSheet::new(),
            phase: Phase::Answering,
            show_answers: false,
        }
    }

    /// The quiz being taken.
    #[must_use]
    pub const fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    /// Current answers.
    #[must_use]
    pub const fn answers(&self) -> &AnswerSheet {
        &self.answers
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Whether the answer key is visible.
    #[must_use]
    pub const fn show_answers(&self) -> bool {
        self.show_answers
    }

    /// The grade, once submitted.
    #[must_use]
    pub const fn grade(&self) -> Option<&Grade> {
        match &self.phase {
            Phase::Answering => None,
            Phase::Submitted(grade) => Some(grade),
        }
    }

    /// Outcome of a question; `None` until the session is submitted.
    #[must_use]
    pub fn outcome(&self, index: usize) -> Option<Outcome> {
        self.grade().and_then(|grade| grade.outcome(index))
    }

    /// Answers a BOOLEAN question.
    pub fn answer_boolean(&mut self, index: usize, value: bool) -> Result<(), SessionError> {
        self.expect_type(index, QuestionType::Boolean)?;
        self.answers.insert(index, Answer::Boolean(value));
        Ok(())
    }

    /// Answers an INPUT question.
    pub fn answer_text(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.expect_type(index, QuestionType::Input)?;
        self.answers.insert(index, Answer::Text(value.into()));
        Ok(())
    }

    /// Selects an unselected option, or deselects a selected one.
    ///
    /// Returns whether the option is selected afterwards.
    pub fn toggle_option(&mut self, index: usize, option: usize) -> Result<bool, SessionError> {
        self.expect_type(index, QuestionType::Checkbox)?;

        let options = self.quiz.questions[index].options.len();
        if option >= options {
            return Err(SessionError::NoSuchOption {
                question: index,
                option,
            });
        }

        let entry = self
            .answers
            .entry(index)
            .or_insert_with(|| Answer::Checkbox(BTreeSet::new()));
        let Answer::Checkbox(selected) = entry else {
            // expect_type guarantees only checkbox answers are stored here
            return Err(SessionError::WrongAnswerKind {
                index,
                expected: QuestionType::Checkbox,
            });
        };

        if selected.remove(&option) {
            Ok(false)
        } else {
            selected.insert(option);
            Ok(true)
        }
    }

    /// Replaces the selection of a CHECKBOX question with `selected`.
    ///
    /// An empty set is kept as an explicit empty answer, unlike deselecting
    /// every option through [`QuizSession::toggle_option`].
    pub fn select_options(
        &mut self,
        index: usize,
        selected: BTreeSet<usize>,
    ) -> Result<(), SessionError> {
        self.expect_type(index, QuestionType::Checkbox)?;

        let options = self.quiz.questions[index].options.len();
        if let Some(&option) = selected.iter().find(|&&option| option >= options) {
            return Err(SessionError::NoSuchOption {
                question: index,
                option,
            });
        }

        self.answers.insert(index, Answer::Checkbox(selected));
        Ok(())
    }

    /// Freezes the answers and grades them.
    pub fn submit(&mut self) -> Result<Grade, SessionError> {
        if let Phase::Submitted(_) = self.phase {
            return Err(SessionError::invalid_transition(&self.phase, "submitted"));
        }

        let grade = grade(&self.quiz, &self.answers);
        self.phase = Phase::Submitted(grade.clone());
        Ok(grade)
    }

    /// Returns to answering with a blank sheet and the answer key hidden.
    pub fn reset(&mut self) {
        self.answers.clear();
        self.show_answers = false;
        self.phase = Phase::Answering;
    }

    /// Shows or hides the answer key. Returns the new visibility.
    pub fn toggle_show_answers(&mut self) -> bool {
        self.show_answers = !self.show_answers;
        self.show_answers
    }

    fn expect_type(&self, index: usize, expected: QuestionType) -> Result<(), SessionError> {
        if let Phase::Submitted(_) = self.phase {
            return Err(SessionError::Submitted);
        }

        let question = self
            .quiz
            .questions
            .get(index)
            .ok_or(SessionError::NoSuchQuestion {
                index,
                total: self.quiz.questions.len(),
            })?;

        if question.question_type == expected {
            Ok(())
        } else {
            Err(SessionError::WrongAnswerKind {
                index,
                expected: question.question_type,
            })
        }
    }
}
