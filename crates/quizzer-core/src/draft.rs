//! Editable state of the quiz authoring form.

use crate::error::ValidationError;
use crate::model::{NewQuiz, OptionDraft, QuestionDraft, QuestionType};
use crate::validate::validate_quiz;

/// A quiz under construction.
///
/// Edits addressing a question or option that does not exist are ignored and
/// reported through the `bool` return value, the same way the form ignores
/// clicks on rows that were just removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizDraft {
    title: String,
    description: String,
    questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// Creates an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Current description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Questions in order.
    #[must_use]
    pub fn questions(&self) -> &[QuestionDraft] {
        &self.questions
    }

    /// Sets the title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    /// Sets the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Appends a blank question of the given type and returns its index.
    pub fn add_question(&mut self, question_type: QuestionType) -> usize {
        self.questions.push(QuestionDraft::blank(question_type));
        self.questions.len() - 1
    }

    /// Removes the question at `index`.
    pub fn remove_question(&mut self, index: usize) -> bool {
        if index < self.questions.len() {
            self.questions.remove(index);
            true
        } else {
            false
        }
    }

    /// Mutable access to a question, for editing its text or answer.
    pub fn question_mut(&mut self, index: usize) -> Option<&mut QuestionDraft> {
        self.questions.get_mut(index)
    }

    /// Appends an empty option to a CHECKBOX question.
    pub fn add_option(&mut self, question: usize) -> bool {
        let Some(options) = self.checkbox_options(question) else {
            return false;
        };
        options.push(OptionDraft::default());
        true
    }

    /// Removes an option from a CHECKBOX question.
    pub fn remove_option(&mut self, question: usize, option: usize) -> bool {
        match self.checkbox_options(question) {
            Some(options) if option < options.len() => {
                options.remove(option);
                true
            }
            _ => false,
        }
    }

    /// Updates the text and/or correctness flag of a CHECKBOX option.
    pub fn update_option(
        &mut self,
        question: usize,
        option: usize,
        text: Option<String>,
        is_correct: Option<bool>,
    ) -> bool {
        let Some(target) = self
            .checkbox_options(question)
            .and_then(|options| options.get_mut(option))
        else {
            return false;
        };

        if let Some(text) = text {
            target.text = text;
        }
        if let Some(is_correct) = is_correct {
            target.is_correct = is_correct;
        }
        true
    }

    /// Runs the authoring validator over the draft.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_quiz(&self.to_request())
    }

    /// Builds the create request for this draft.
    #[must_use]
    pub fn to_request(&self) -> NewQuiz {
        NewQuiz {
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.clone(),
        }
    }

    fn checkbox_options(&mut self, question: usize) -> Option<&mut Vec<OptionDraft>> {
        let draft = self.questions.get_mut(question)?;
        if draft.question_type != QuestionType::Checkbox {
            return None;
        }
        Some(draft.options.get_or_insert_with(Vec::new))
    }
}
