//! Markdown report generation for quiz attempts.
//!
//! The generated document holds a summary table with the score, then one
//! section per question with its outcome, the submitted answer and, when the
//! answer key was revealed, the correct answer.

use chrono::{DateTime, Utc};
use quizzer_core::Outcome;
use std::fmt::Write;

use crate::{AttemptReport, QuestionReport};

/// Generates Markdown reports from graded quiz attempts.
pub struct MarkdownGenerator<'a> {
    report: &'a AttemptReport,
}

impl<'a> MarkdownGenerator<'a> {
    /// Creates a new Markdown generator for the given report.
    #[must_use]
    pub const fn new(report: &'a AttemptReport) -> Self {
        Self { report }
    }

    /// Generates the complete Markdown report.
    #[must_use]
    pub fn generate(&self) -> String {
        let mut output = String::new();

        self.write_title(&mut output);
        self.write_summary(&mut output);
        self.write_questions(&mut output);
        self.write_footer(&mut output);

        output
    }

    fn write_title(&self, output: &mut String) {
        let _ = writeln!(
            output,
            "# Quiz Results: {}\n",
            escape_markdown(&self.report.quiz_title)
        );
    }

    fn write_summary(&self, output: &mut String) {
        let summary = &self.report.summary;
        let key = if summary.answers_revealed {
            "Revealed"
        } else {
            "Hidden"
        };

        let _ = writeln!(output, "## Summary\n");
        let _ = writeln!(output, "| Metric | Value |");
        let _ = writeln!(output, "|--------|-------|");
        let _ = writeln!(output, "| Score | {} |", summary.fraction());
        let _ = writeln!(output, "| Percentage | {}% |", summary.percentage);
        let _ = writeln!(
            output,
            "| Correct | {} |",
            self.report.count(Outcome::Correct)
        );
        let _ = writeln!(
            output,
            "| Incorrect | {} |",
            self.report.count(Outcome::Incorrect)
        );
        let _ = writeln!(
            output,
            "| Unanswered | {} |",
            self.report.count(Outcome::Unanswered)
        );
        let _ = writeln!(output, "| Answer Key | {key} |");
        let _ = writeln!(output);
    }

    fn write_questions(&self, output: &mut String) {
        let _ = writeln!(output, "## Questions\n");

        if self.report.questions.is_empty() {
            let _ = writeln!(output, "*This quiz has no questions.*\n");
            return;
        }

        for question in &self.report.questions {
            Self::write_question(output, question);
        }
    }

    fn write_question(output: &mut String, question: &QuestionReport) {
        let _ = writeln!(
            output,
            "### Question {}: {}\n",
            question.number,
            escape_markdown(&question.question_text)
        );
        let _ = writeln!(output, "**Type**: {}", question.question_type.label());
        let _ = writeln!(
            output,
            "**Result**: {} {}",
            outcome_icon(question.outcome),
            outcome_label(question.outcome)
        );

        let answer = question
            .your_answer
            .as_deref()
            .map_or_else(|| "*Not answered*".to_string(), escape_markdown);
        let _ = writeln!(output, "**Your Answer**: {answer}");

        if let Some(correct) = &question.correct_answer {
            let _ = writeln!(output, "**Correct Answer**: {}", escape_markdown(correct));
        }
        let _ = writeln!(output);
    }

    fn write_footer(&self, output: &mut String) {
        let _ = writeln!(output, "---");
        let timestamp = format_timestamp(&self.report.taken_at);
        let _ = writeln!(output, "*Taken at {timestamp}*");
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn format_timestamp(dt: &DateTime<Utc>) -> String {
    dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

const fn outcome_icon(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "✅",
        Outcome::Incorrect => "❌",
        Outcome::Unanswered => "⚪",
    }
}

const fn outcome_label(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Correct => "Correct",
        Outcome::Incorrect => "Incorrect",
        Outcome::Unanswered => "Unanswered",
    }
}

/// Escapes characters with special meaning in Markdown.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for ch in text.chars() {
        match ch {
            '*' | '_' | '`' | '#' | '[' | ']' | '(' | ')' | '!' | '\\' | '<' | '>' | '|' => {
                result.push('\\');
                result.push(ch);
            }
            '\n' => result.push_str("<br>"),
            _ => result.push(ch),
        }
    }

    result
}

// ============================================================================
// Tests
// ============================================================================
