//! Quiz data model shared by the server, the client and the front end.
//!
//! These types double as the JSON wire format of the REST API, so field names
//! are serialized in camelCase and the question type tag is written as
//! `"BOOLEAN"`, `"INPUT"` or `"CHECKBOX"`.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::InvalidQuestionType;

// ============================================================================
// QuestionType
// ============================================================================

/// The kind of prompt a question presents, which decides where its
/// correctness data lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    /// True/false question; correctness is `Question::correct_answer`.
    Boolean,
    /// Free-text question; correctness is `Question::correct_text`.
    Input,
    /// Multiple choice question; correctness is the `is_correct` flag of each option.
    Checkbox,
}

impl QuestionType {
    /// All question types, in the order the authoring form offers them.
    pub const ALL: [Self; 3] = [Self::Boolean, Self::Input, Self::Checkbox];

    /// Returns the wire/storage tag for this type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Input => "INPUT",
            Self::Checkbox => "CHECKBOX",
        }
    }

    /// Returns the label shown to quiz authors and takers.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Boolean => "True/False",
            Self::Input => "Text Input",
            Self::Checkbox => "Multiple Choice",
        }
    }

    /// Parses a tag into a `QuestionType`, case-insensitively.
    fn from_str_case_insensitive(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "BOOLEAN" => Some(Self::Boolean),
            "INPUT" => Some(Self::Input),
            "CHECKBOX" => Some(Self::Checkbox),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionType {
    type Err = InvalidQuestionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_str_case_insensitive(s).ok_or_else(|| InvalidQuestionType(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for QuestionType {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

impl Serialize for QuestionType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Persisted entities
// ============================================================================

/// A selectable choice under a CHECKBOX question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOption {
    /// Store identifier.
    pub id: i64,
    /// Text shown to the quiz taker.
    pub text: String,
    /// Whether selecting this option is part of the correct answer.
    pub is_correct: bool,
}

/// A persisted question with its correctness data.
///
/// Only the correctness field matching `question_type` is populated; the
/// others are `None` (or empty, for `options`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Store identifier.
    pub id: i64,
    /// Type tag.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The prompt.
    pub question_text: String,
    /// Correct answer of a BOOLEAN question.
    #[serde(default)]
    pub correct_answer: Option<bool>,
    /// Correct answer of an INPUT question.
    #[serde(default)]
    pub correct_text: Option<String>,
    /// Options of a CHECKBOX question, in authoring order.
    #[serde(default)]
    pub options: Vec<QuizOption>,
}

impl Question {
    /// Indices of the options flagged correct.
    #[must_use]
    pub fn correct_option_indices(&self) -> BTreeSet<usize> {
        self.options
            .iter()
            .enumerate()
            .filter(|(_, opt)| opt.is_correct)
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// A quiz with all of its questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    /// Store identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Free-form description, possibly empty.
    #[serde(default)]
    pub description: String,
    /// Questions in authoring order.
    #[serde(default)]
    pub questions: Vec<Question>,
    /// When the quiz was created.
    pub created_at: DateTime<Utc>,
    /// When the quiz was last updated.
    pub updated_at: DateTime<Utc>,
}

/// One row of the quiz listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    /// Store identifier.
    pub id: i64,
    /// Title.
    pub title: String,
    /// How many questions the quiz holds.
    pub number_of_questions: u32,
    /// When the quiz was created.
    pub created_at: DateTime<Utc>,
}

/// Response to a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedQuiz {
    /// Identifier assigned by the store.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: String,
}

// ============================================================================
// Create payload
// ============================================================================

/// An option as submitted by the authoring form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDraft {
    /// Option text.
    pub text: String,
    /// Whether this option is correct.
    #[serde(default)]
    pub is_correct: bool,
}

impl OptionDraft {
    /// Creates an option draft.
    #[must_use]
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

/// A question as submitted by the authoring form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    /// Type tag.
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    /// The prompt.
    #[serde(default)]
    pub question_text: String,
    /// BOOLEAN correct answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<bool>,
    /// INPUT correct answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correct_text: Option<String>,
    /// CHECKBOX options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<OptionDraft>>,
}

impl QuestionDraft {
    /// A BOOLEAN question.
    #[must_use]
    pub fn boolean(question_text: impl Into<String>, correct_answer: bool) -> Self {
        Self {
            question_type: QuestionType::Boolean,
            question_text: question_text.into(),
            correct_answer: Some(correct_answer),
            correct_text: None,
            options: None,
        }
    }

    /// An INPUT question.
    #[must_use]
    pub fn input(question_text: impl Into<String>, correct_text: impl Into<String>) -> Self {
        Self {
            question_type: QuestionType::Input,
            question_text: question_text.into(),
            correct_answer: None,
            correct_text: Some(correct_text.into()),
            options: None,
        }
    }

    /// A CHECKBOX question.
    #[must_use]
    pub fn checkbox(question_text: impl Into<String>, options: Vec<OptionDraft>) -> Self {
        Self {
            question_type: QuestionType::Checkbox,
            question_text: question_text.into(),
            correct_answer: None,
            correct_text: None,
            options: Some(options),
        }
    }

    /// An empty question of the given type, pre-filled the way the authoring
    /// form starts it.
    #[must_use]
    pub fn blank(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Boolean => Self::boolean("", false),
            QuestionType::Input => Self::input("", ""),
            QuestionType::Checkbox => Self::checkbox("", vec![OptionDraft::default()]),
        }
    }

    /// Drops every correctness field that does not belong to the declared type.
    ///
    /// A BOOLEAN question without an answer is stored as `false`.
    #[must_use]
    pub fn normalized(self) -> Self {
        let Self {
            question_type,
            question_text,
            correct_answer,
            correct_text,
            options,
        } = self;

        match question_type {
            QuestionType::Boolean => Self {
                question_type,
                question_text,
                correct_answer: Some(correct_answer.unwrap_or(false)),
                correct_text: None,
                options: None,
            },
            QuestionType::Input => Self {
                question_type,
                question_text,
                correct_answer: None,
                correct_text,
                options: None,
            },
            QuestionType::Checkbox => Self {
                question_type,
                question_text,
                correct_answer: None,
                correct_text: None,
                options,
            },
        }
    }
}

/// Request body for creating a quiz.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuiz {
    /// Title.
    pub title: String,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Questions in order.
    #[serde(default)]
    pub questions: Vec<QuestionDraft>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_question_type_serialization() {
        assert_eq!(
            serde_json::to_string(&QuestionType::Boolean).unwrap(),
            r#""BOOLEAN""#
        );
        assert_eq!(
            serde_json::to_string(&QuestionType::Checkbox).unwrap(),
            r#""CHECKBOX""#
        );
    }

    #[test]
    fn test_question_type_case_insensitive() {
        let t: QuestionType = serde_json::from_str(r#""input""#).unwrap();
        assert_eq!(t, QuestionType::Input);

        let t: QuestionType = serde_json::from_str(r#""CheckBox""#).unwrap();
        assert_eq!(t, QuestionType::Checkbox);
    }

    #[test]
    fn test_invalid_question_type() {
        let err = serde_json::from_str::<QuestionType>(r#""RADIO""#).unwrap_err();
        assert!(err.to_string().contains("invalid question type 'RADIO'"));
    }

    #[test]
    fn test_new_quiz_deserialization() {
        let json = r#"{
            "title": "Capitals",
            "questions": [
                {"type": "BOOLEAN", "questionText": "Is Paris in France?", "correctAnswer": true},
                {"type": "INPUT", "questionText": "Capital of Italy?", "correctText": "Rome"},
                {"type": "CHECKBOX", "questionText": "Pick EU capitals", "options": [
                    {"text": "Paris", "isCorrect": true},
                    {"text": "Tokyo", "isCorrect": false}
                ]}
            ]
        }"#;

        let quiz: NewQuiz = serde_json::from_str(json).unwrap();
        assert_eq!(quiz.title, "Capitals");
        assert_eq!(quiz.description, "");
        assert_eq!(quiz.questions.len(), 3);
        assert_eq!(quiz.questions[0].correct_answer, Some(true));
        assert_eq!(quiz.questions[1].correct_text.as_deref(), Some("Rome"));
        let options = quiz.questions[2].options.as_ref().unwrap();
        assert!(options[0].is_correct);
        assert!(!options[1].is_correct);
    }

    #[test]
    fn test_normalized_keeps_only_matching_field() {
        let draft = QuestionDraft {
            question_type: QuestionType::Input,
            question_text: "Q".to_string(),
            correct_answer: Some(true),
            correct_text: Some("yes".to_string()),
            options: Some(vec![OptionDraft::new("a", true)]),
        }
        .normalized();

        assert_eq!(draft.correct_answer, None);
        assert_eq!(draft.correct_text.as_deref(), Some("yes"));
        assert_eq!(draft.options, None);
    }

    #[test]
    fn test_normalized_boolean_defaults_false() {
        let draft = QuestionDraft {
            question_type: QuestionType::Boolean,
            question_text: "Q".to_string(),
            correct_answer: None,
            correct_text: Some("ignored".to_string()),
            options: None,
        }
        .normalized();

        assert_eq!(draft.correct_answer, Some(false));
        assert_eq!(draft.correct_text, None);
    }

    #[test]
    fn test_normalized_checkbox_clears_scalar_fields() {
        let draft = QuestionDraft {
            question_type: QuestionType::Checkbox,
            question_text: "Q".to_string(),
            correct_answer: Some(false),
            correct_text: Some("x".to_string()),
            options: Some(vec![OptionDraft::new("a", true)]),
        }
        .normalized();

        assert_eq!(draft.correct_answer, None);
        assert_eq!(draft.correct_text, None);
        assert_eq!(draft.options.map(|o| o.len()), Some(1));
    }

    #[test]
    fn test_blank_questions() {
        assert_eq!(
            QuestionDraft::blank(QuestionType::Boolean).correct_answer,
            Some(false)
        );
        assert_eq!(
            QuestionDraft::blank(QuestionType::Input).correct_text.as_deref(),
            Some("")
        );
        assert_eq!(
            QuestionDraft::blank(QuestionType::Checkbox).options,
            Some(vec![OptionDraft::default()])
        );
    }

    #[test]
    fn test_correct_option_indices() {
        let question = Question {
            id: 1,
            question_type: QuestionType::Checkbox,
            question_text: "Pick".to_string(),
            correct_answer: None,
            correct_text: None,
            options: vec![
                QuizOption {
                    id: 1,
                    text: "a".to_string(),
                    is_correct: true,
                },
                QuizOption {
                    id: 2,
                    text: "b".to_string(),
                    is_correct: false,
                },
                QuizOption {
                    id: 3,
                    text: "c".to_string(),
                    is_correct: true,
                },
            ],
        };

        assert_eq!(question.correct_option_indices(), BTreeSet::from([0, 2]));
    }

    #[test]
    fn test_quiz_summary_serialization() {
        let summary = QuizSummary {
            id: 7,
            title: "Quiz".to_string(),
            number_of_questions: 4,
            created_at: DateTime::parse_from_rfc3339("2026-02-03T10:00:00Z")
                .unwrap()
                .with_timezone(&Utc),
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains(r#""numberOfQuestions":4"#));
        assert!(json.contains(r#""createdAt":"2026-02-03T10:00:00Z""#));
    }
}
