//! Taking a quiz: collecting answers, submitting and showing results.

use std::io::{self, BufRead, Write};

use quizzer_core::{
    Answer, AnswerSheet, Outcome, Question, QuestionType, QuizSession, SessionError,
};
use quizzer_report::AttemptReport;

use crate::prompt::Prompter;

/// Copies a prepared answer sheet into the session.
///
/// # Errors
///
/// Fails on the first answer that does not fit its question.
pub fn apply_answers(session: &mut QuizSession, answers: &AnswerSheet) -> Result<(), SessionError> {
    for (&index, answer) in answers {
        match answer {
            Answer::Boolean(value) => session.answer_boolean(index, *value)?,
            Answer::Text(text) => session.answer_text(index, text.clone())?,
            Answer::Checkbox(selected) => session.select_options(index, selected.clone())?,
        }
    }
    Ok(())
}

/// Asks every question in turn. Empty answers leave a question unanswered.
///
/// When the session shows answers, the correct answer is printed under each
/// question before the prompt.
pub fn collect_answers<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    session: &mut QuizSession,
) -> io::Result<()> {
    let questions = session.quiz().questions.clone();

    for (index, question) in questions.iter().enumerate() {
        p.say("")?;
        p.say(format!(
            "Question {} of {} [{}]",
            index + 1,
            questions.len(),
            question.question_type.label()
        ))?;
        p.say(&question.question_text)?;
        if session.show_answers() {
            if let Some(answer) = answer_key(question) {
                p.say(format!("  (answer: {answer})"))?;
            }
        }

        let recorded = match question.question_type {
            QuestionType::Boolean => {
                match p.ask_optional_bool("True or false? [y/n, empty to skip]")? {
                    Some(value) => session.answer_boolean(index, value),
                    None => Ok(()),
                }
            }
            QuestionType::Input => {
                let text = p.ask("Your answer (empty to skip)")?;
                if text.is_empty() {
                    Ok(())
                } else {
                    session.answer_text(index, text)
                }
            }
            QuestionType::Checkbox => {
                let reveal = session.show_answers();
                for (i, option) in question.options.iter().enumerate() {
                    let mark = if reveal && option.is_correct { " *" } else { "" };
                    p.say(format!("  {}) {}{mark}", i + 1, option.text))?;
                }
                let choices = p.ask_choices(
                    "Select all that apply, e.g. 1,3 (empty to skip)",
                    question.options.len(),
                )?;
                if choices.is_empty() {
                    Ok(())
                } else {
                    session.select_options(index, choices.into_iter().collect())
                }
            }
        };

        if let Err(e) = recorded {
            p.say(format!("✗ {e}"))?;
        }
    }

    Ok(())
}

/// Correct answer of a BOOLEAN or INPUT question, for display while answering.
fn answer_key(question: &Question) -> Option<String> {
    match question.question_type {
        QuestionType::Boolean => question
            .correct_answer
            .map(|value| if value { "True" } else { "False" }.to_string()),
        QuestionType::Input => question.correct_text.clone(),
        QuestionType::Checkbox => None,
    }
}

/// Prints per-question outcomes and the score of a submitted session.
pub fn print_results<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    session: &QuizSession,
) -> io::Result<()> {
    let Ok(report) = AttemptReport::from_session(session) else {
        return p.say("Quiz has not been submitted yet.");
    };

    p.say("")?;
    p.say(format!("Results for \"{}\"", report.quiz_title))?;
    for question in &report.questions {
        let mark = match question.outcome {
            Outcome::Correct => "✓",
            Outcome::Incorrect => "✗",
            Outcome::Unanswered => "-",
        };
        p.say(format!("{mark} {}. {}", question.number, question.question_text))?;
        if let Some(correct) = &question.correct_answer {
            let yours = question.your_answer.as_deref().unwrap_or("not answered");
            p.say(format!("     your answer: {yours}; correct answer: {correct}"))?;
        }
    }

    if let Some(grade) = session.grade() {
        p.say(format!("Score: {}", grade.score))?;
    }
    Ok(())
}

/// Runs an interactive attempt: answer, submit, review and optionally retry.
pub fn run_interactive<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    session: &mut QuizSession,
    show_answers: bool,
) -> io::Result<()> {
    loop {
        if show_answers != session.show_answers() {
            session.toggle_show_answers();
        }

        collect_answers(p, session)?;
        if let Err(e) = session.submit() {
            return Err(io::Error::other(e.to_string()));
        }

        if !session.show_answers() && p.ask_bool("Show correct answers? [y/N]", false)? {
            session.toggle_show_answers();
        }
        print_results(p, session)?;

        if !p.ask_bool("Try again? [y/N]", false)? {
            return Ok(());
        }
        session.reset();
    }
}
