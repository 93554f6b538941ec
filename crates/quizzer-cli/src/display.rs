//! Plain-text rendering of quizzes for the terminal.

use std::fmt::Write;

use quizzer_core::{QuestionType, Quiz, QuizSummary};

/// Renders the quiz list as an aligned table.
pub fn quiz_table(quizzes: &[QuizSummary]) -> String {
    if quizzes.is_empty() {
        return "No quizzes yet. Create one with `quizzer create` or `quizzer author`.\n"
            .to_string();
    }

    let title_width = quizzes
        .iter()
        .map(|q| q.title.chars().count())
        .max()
        .unwrap_or(0)
        .max("Title".len());

    let mut output = String::new();
    let _ = writeln!(
        output,
        "{:>4}  {:<title_width$}  {:>9}  Created",
        "ID", "Title", "Questions"
    );
    for quiz in quizzes {
        let _ = writeln!(
            output,
            "{:>4}  {:<title_width$}  {:>9}  {}",
            quiz.id,
            quiz.title,
            quiz.number_of_questions,
            quiz.created_at.format("%Y-%m-%d %H:%M")
        );
    }
    output
}

/// Renders a quiz with its questions. The answer key is only included when
/// `show_answers` is set.
pub fn quiz_details(quiz: &Quiz, show_answers: bool) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "#{} {}", quiz.id, quiz.title);
    if !quiz.description.is_empty() {
        let _ = writeln!(output, "{}", quiz.description);
    }
    let _ = writeln!(output, "{} questions", quiz.questions.len());

    for (i, question) in quiz.questions.iter().enumerate() {
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "{}. [{}] {}",
            i + 1,
            question.question_type.label(),
            question.question_text
        );

        match question.question_type {
            QuestionType::Boolean if show_answers => {
                let answer = question
                    .correct_answer
                    .map_or("not set", |v| if v { "True" } else { "False" });
                let _ = writeln!(output, "   Answer: {answer}");
            }
            QuestionType::Input if show_answers => {
                let answer = question.correct_text.as_deref().unwrap_or("not set");
                let _ = writeln!(output, "   Answer: {answer}");
            }
            QuestionType::Checkbox => {
                for option in &question.options {
                    let mark = if show_answers && option.is_correct { "x" } else { " " };
                    let _ = writeln!(output, "   [{mark}] {}", option.text);
                }
            }
            QuestionType::Boolean | QuestionType::Input => {}
        }
    }
    output
}
