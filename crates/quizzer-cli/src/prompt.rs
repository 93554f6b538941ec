//! Line-based terminal prompts.
//!
//! Generic over the reader and writer so the interactive flows can be driven
//! from scripted input in tests.

use std::fmt::Display;
use std::io::{self, BufRead, Write};

/// Reads answers from `input` after writing prompts to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    /// Creates a prompter.
    pub const fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Writes one line of output.
    pub fn say(&mut self, text: impl Display) -> io::Result<()> {
        writeln!(self.output, "{text}")
    }

    /// Prints `label` and reads one trimmed line.
    ///
    /// End of input is an `UnexpectedEof` error so a closed terminal aborts
    /// the flow instead of looping forever.
    pub fn ask(&mut self, label: &str) -> io::Result<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before the prompt was answered",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Asks a yes/no question. An empty answer yields `None`.
    pub fn ask_optional_bool(&mut self, label: &str) -> io::Result<Option<bool>> {
        loop {
            let answer = self.ask(label)?;
            if answer.is_empty() {
                return Ok(None);
            }
            if let Some(value) = parse_bool(&answer) {
                return Ok(Some(value));
            }
            self.say("Please answer y or n.")?;
        }
    }

    /// Asks a yes/no question, returning `default` on an empty answer.
    pub fn ask_bool(&mut self, label: &str, default: bool) -> io::Result<bool> {
        Ok(self.ask_optional_bool(label)?.unwrap_or(default))
    }

    /// Asks for a set of one-based choices out of `count`, such as `1,3`.
    ///
    /// Returns zero-based indices in the order given, without duplicates.
    pub fn ask_choices(&mut self, label: &str, count: usize) -> io::Result<Vec<usize>> {
        loop {
            let answer = self.ask(label)?;
            match parse_choices(&answer, count) {
                Some(choices) => return Ok(choices),
                None => self.say(format!("Enter numbers between 1 and {count}, e.g. 1,3."))?,
            }
        }
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.output
    }
}

fn parse_bool(answer: &str) -> Option<bool> {
    match answer.to_lowercase().as_str() {
        "y" | "yes" | "t" | "true" => Some(true),
        "n" | "no" | "f" | "false" => Some(false),
        _ => None,
    }
}

fn parse_choices(answer: &str, count: usize) -> Option<Vec<usize>> {
    let mut choices = Vec::new();
    for part in answer
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|p| !p.is_empty())
    {
        let number: usize = part.parse().ok()?;
        if number == 0 || number > count {
            return None;
        }
        if !choices.contains(&(number - 1)) {
            choices.push(number - 1);
        }
    }
    Some(choices)
}
