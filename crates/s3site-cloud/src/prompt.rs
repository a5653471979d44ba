//! User interaction
//!
//! Reconcilers never touch stdin/stdout directly. They print status lines and
//! ask yes/no questions through [`Interaction`], so a run can be driven from a
//! terminal or from a scripted input in tests.

use std::io::{BufRead, Write};

pub trait Interaction {
    /// Print a status line
    fn say(&mut self, line: &str);

    /// Ask a yes/no question. Only a line starting with `y` or `Y` is a yes
    fn confirm(&mut self, question: &str) -> bool;
}

/// [`Interaction`] over a line reader and a writer
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }
}

impl Console<std::io::StdinLock<'static>, std::io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(std::io::stdin().lock(), std::io::stdout())
    }
}

impl<R: BufRead, W: Write> Interaction for Console<R, W> {
    fn say(&mut self, line: &str) {
        if let Err(e) = writeln!(self.output, "{}", line) {
            tracing::warn!("Failed to write output: {}", e);
        }
    }

    fn confirm(&mut self, question: &str) -> bool {
        self.say(question);
        if let Err(e) = self.output.flush() {
            tracing::warn!("Failed to flush output: {}", e);
        }

        let mut answer = String::new();
        match self.input.read_line(&mut answer) {
            Ok(0) => {
                tracing::debug!("No answer (end of input), treating as no");
                false
            }
            Ok(_) => is_affirmative(&answer),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                false
            }
        }
    }
}

/// Passes status lines through and answers every question with no
pub struct Unattended<'a>(pub &'a mut dyn Interaction);

impl Interaction for Unattended<'_> {
    fn say(&mut self, line: &str) {
        self.0.say(line);
    }

    fn confirm(&mut self, question: &str) -> bool {
        tracing::warn!("Headless run, answering no to: {}", question);
        false
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim_start().chars().next(), Some('y' | 'Y'))
}
