use std::io::{self, BufRead, Write};

use anyhow::Result;

/// A blocking conversation with whoever is running the sync.
pub trait Prompt {
    /// Shows `question` and waits for one line. `None` means input is closed.
    fn ask(&mut self, question: &str) -> Result<Option<String>>;

    /// Operator-facing output that isn't a question.
    fn say(&mut self, line: &str);
}

/// Stdin/stdout prompt used by the binary.
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompt<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        TerminalPrompt::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        TerminalPrompt { input, output }
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        write!(self.output, "{} > ", question)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn say(&mut self, line: &str) {
        let _ = writeln!(self.output, "{}", line);
    }
}

/// Replays canned answers and records everything shown.
#[cfg(test)]
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: std::collections::VecDeque<String>,
    pub questions: Vec<String>,
    pub output: Vec<String>,
}

#[cfg(test)]
impl ScriptedPrompt {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedPrompt {
            answers: answers.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn transcript(&self) -> String {
        self.output.join("\n")
    }
}

#[cfg(test)]
impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<Option<String>> {
        self.questions.push(question.to_string());
        Ok(self.answers.pop_front().map(|a| a.trim().to_string()))
    }

    fn say(&mut self, line: &str) {
        self.output.push(line.to_string());
    }
}
