//! Interactive quiz authoring.

use std::io::{self, BufRead, Write};

use quizzer_core::{NewQuiz, QuestionType, QuizDraft};

use crate::prompt::Prompter;

const HELP: &str = "Commands: boolean | input | checkbox (add a question), \
list, remove <n>, title, done, cancel";

/// Walks the user through building a quiz.
///
/// Returns `None` if the user cancels. `done` only succeeds once the draft
/// passes authoring validation; otherwise the problem is shown and editing
/// continues.
pub fn author_quiz<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> io::Result<Option<NewQuiz>> {
    let mut draft = QuizDraft::new();
    draft.set_title(p.ask("Quiz title")?);
    draft.set_description(p.ask("Description (optional)")?);

    p.say(HELP)?;

    loop {
        let command = p.ask(&format!("Command ({} questions)", draft.questions().len()))?;
        let (verb, rest) = command
            .split_once(char::is_whitespace)
            .map_or((command.as_str(), ""), |(v, r)| (v, r.trim()));

        match verb.to_lowercase().as_str() {
            "" => {}
            "done" => match draft.validate() {
                Ok(()) => return Ok(Some(draft.to_request())),
                Err(e) => {
                    match e.question_index() {
                        Some(index) => p.say(format!("✗ {e} (question {})", index + 1))?,
                        None => p.say(format!("✗ {e}"))?,
                    }
                }
            },
            "cancel" => return Ok(None),
            "title" => draft.set_title(p.ask("Quiz title")?),
            "list" => list_questions(p, &draft)?,
            "remove" => match rest.parse::<usize>() {
                Ok(number) if number > 0 && draft.remove_question(number - 1) => {
                    p.say(format!("Removed question {number}"))?;
                }
                _ => p.say("Usage: remove <question number>")?,
            },
            other => match other.parse::<QuestionType>() {
                Ok(question_type) => add_question(p, &mut draft, question_type)?,
                Err(_) => p.say(HELP)?,
            },
        }
    }
}

fn add_question<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    draft: &mut QuizDraft,
    question_type: QuestionType,
) -> io::Result<()> {
    let index = draft.add_question(question_type);
    let text = p.ask("  Question text")?;

    match question_type {
        QuestionType::Boolean => {
            let correct = p.ask_bool("  Is the statement true? [y/N]", false)?;
            if let Some(question) = draft.question_mut(index) {
                question.question_text = text;
                question.correct_answer = Some(correct);
            }
        }
        QuestionType::Input => {
            let correct = p.ask("  Correct answer")?;
            if let Some(question) = draft.question_mut(index) {
                question.question_text = text;
                question.correct_text = Some(correct);
            }
        }
        QuestionType::Checkbox => {
            if let Some(question) = draft.question_mut(index) {
                question.question_text = text;
            }

            // a blank checkbox question starts with one empty option
            let mut count = 0;
            loop {
                let option = p.ask(&format!("  Option {} (empty to finish)", count + 1))?;
                if option.is_empty() {
                    break;
                }
                let correct = p.ask_bool("    Correct? [y/N]", false)?;
                if count > 0 {
                    draft.add_option(index);
                }
                draft.update_option(index, count, Some(option), Some(correct));
                count += 1;
            }
            if count == 0 {
                draft.remove_option(index, 0);
            }
        }
    }

    p.say(format!("Added {} question {}", question_type.label(), index + 1))
}

fn list_questions<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    draft: &QuizDraft,
) -> io::Result<()> {
    if draft.questions().is_empty() {
        return p.say("No questions yet.");
    }

    for (i, question) in draft.questions().iter().enumerate() {
        p.say(format!(
            "{}. [{}] {}",
            i + 1,
            question.question_type.label(),
            question.question_text
        ))?;
        for option in question.options.iter().flatten() {
            let mark = if option.is_correct { "x" } else { " " };
            p.say(format!("     [{mark}] {}", option.text))?;
        }
    }
    Ok(())
}
