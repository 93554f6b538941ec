//! Pre-submit validation of a quiz being authored.

use crate::error::ValidationError;
use crate::model::{NewQuiz, QuestionDraft, QuestionType};

/// Minimum number of options a CHECKBOX question must offer.
pub const MIN_CHECKBOX_OPTIONS: usize = 2;

/// Checks a candidate quiz and returns the first problem found.
///
/// Checks run in a fixed order and stop at the first failure:
///
/// 1. title is non-empty after trimming
/// 2. at least one question is present
/// 3. per question, in order: text is non-empty, then the type-specific rules
///    (INPUT needs a correct text; CHECKBOX needs at least two options, one of
///    them correct, all with text)
///
/// BOOLEAN questions only need text.
///
/// # Examples
///
/// ```
/// use quizzer_core::{validate_quiz, NewQuiz, QuestionDraft, ValidationError};
///
/// let mut quiz = NewQuiz {
///     title: "Geography".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(validate_quiz(&quiz), Err(ValidationError::NoQuestions));
///
/// quiz.questions.push(QuestionDraft::boolean("Is the Earth round?", true));
/// assert_eq!(validate_quiz(&quiz), Ok(()));
/// ```
pub fn validate_quiz(quiz: &NewQuiz) -> Result<(), ValidationError> {
    if quiz.title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    if quiz.questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }

    quiz.questions
        .iter()
        .enumerate()
        .try_for_each(|(index, question)| validate_question(index, question))
}

/// Checks a single question draft.
pub fn validate_question(index: usize, question: &QuestionDraft) -> Result<(), ValidationError> {
    if question.question_text.trim().is_empty() {
        return Err(ValidationError::EmptyQuestionText { index });
    }

    match question.question_type {
        QuestionType::Boolean => Ok(()),
        QuestionType::Input => {
            let has_text = question
                .correct_text
                .as_deref()
                .is_some_and(|text| !text.trim().is_empty());
            if has_text {
                Ok(())
            } else {
                Err(ValidationError::MissingCorrectText { index })
            }
        }
        QuestionType::Checkbox => {
            let options = question.options.as_deref().unwrap_or_default();

            if options.len() < MIN_CHECKBOX_OPTIONS {
                return Err(ValidationError::TooFewOptions { index });
            }

            if !options.iter().any(|opt| opt.is_correct) {
                return Err(ValidationError::NoCorrectOption { index });
            }

            if let Some(option) = options.iter().position(|opt| opt.text.trim().is_empty()) {
                return Err(ValidationError::EmptyOptionText { index, option });
            }

            Ok(())
        }
    }
}
