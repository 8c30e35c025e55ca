//! Interactive prompt loop
//!
//! Reads prompt overrides, a multi-line clinical note and sampling parameters
//! from a line-based input, calls the model once per run and renders the
//! result. The loop ends when the user declines another run or the input is
//! exhausted.

use std::io::{BufRead, Write};

use serde_json::Value as JsonValue;
use wrangler_core::{CallParams, CallResult, ChatBackend, call_model};

use crate::config::Config;
use crate::error::AppError;

/// Line that ends multi-line entry (matched case-insensitively, trimmed)
pub const END_MARKER: &str = "EOF";

const DELIMITER: &str = "--------------------";

enum Step {
    Continue,
    Quit,
}

/// One terminal session driving the model through `backend`
pub struct Session<'a, B: ?Sized, R, W> {
    config: &'a Config,
    backend: &'a B,
    input: R,
    output: W,
}

impl<'a, B, R, W> Session<'a, B, R, W>
where
    B: ChatBackend + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(config: &'a Config, backend: &'a B, input: R, output: W) -> Self {
        Self {
            config,
            backend,
            input,
            output,
        }
    }

    /// Run until the user opts out or input ends
    pub async fn run(&mut self) -> Result<(), AppError> {
        loop {
            match self.run_once().await {
                Ok(Step::Continue) => {}
                Ok(Step::Quit) | Err(AppError::InputClosed) => break,
                Err(e) => return Err(e),
            }
        }
        writeln!(self.output, "\nExiting Prompt Wrangler CLI.")?;
        Ok(())
    }

    async fn run_once(&mut self) -> Result<Step, AppError> {
        writeln!(self.output, "\n--- New Run ---")?;

        let config = self.config;
        let system = self.ask_optional("Enter System Prompt (press Enter for default): ")?;
        let user = self.ask_optional("Enter User Prompt (press Enter for default): ")?;
        let prompts = config.prompts.with_overrides(system, user);

        let input_text = self.read_multiline("Paste Input Text")?;

        let defaults = &config.defaults;
        let temperature = self.ask_temperature(defaults.temperature)?;
        let max_tokens = self.ask_max_tokens(defaults.max_tokens)?;
        let model = self
            .ask_optional(&format!("Enter Model Name (default: {}): ", defaults.model))?
            .unwrap_or_else(|| defaults.model.clone());

        if input_text.trim().is_empty() {
            writeln!(self.output, "Input text cannot be empty. Please try again.")?;
            return Ok(Step::Continue);
        }

        let params = CallParams {
            temperature,
            max_tokens,
            model,
        };
        writeln!(self.output, "\nSending to {}...", params.model)?;

        let result = call_model(self.backend, &prompts, &input_text, &params).await;
        render_result(&mut self.output, &result)?;

        let answer = self.ask("\nRun again? (y/n, default y): ")?;
        if is_negative(&answer) {
            Ok(Step::Quit)
        } else {
            Ok(Step::Continue)
        }
    }

    fn read_line(&mut self) -> Result<String, AppError> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(AppError::InputClosed);
        }
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, AppError> {
        write!(self.output, "{prompt}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// `None` when the answer is blank, meaning "keep the default"
    fn ask_optional(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        let answer = self.ask(prompt)?;
        Ok((!answer.trim().is_empty()).then_some(answer))
    }

    /// Collect lines until the end marker or end of input
    fn read_multiline(&mut self, prompt: &str) -> Result<String, AppError> {
        writeln!(
            self.output,
            "{prompt} (Type '{END_MARKER}' on a new line when done):"
        )?;
        self.output.flush()?;

        let mut lines = Vec::new();
        loop {
            match self.read_line() {
                Ok(line) if line.trim().eq_ignore_ascii_case(END_MARKER) => break,
                Ok(line) => lines.push(line),
                Err(AppError::InputClosed) => break,
                Err(e) => return Err(e),
            }
        }
        Ok(lines.join("\n"))
    }

    fn ask_temperature(&mut self, default: f32) -> Result<f32, AppError> {
        loop {
            let answer = self.ask(&format!("Enter Temperature (default: {default}): "))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<f32>() {
                Ok(value) if value.is_finite() && value > 0.0 => return Ok(value),
                Ok(_) => writeln!(self.output, "Please enter a positive number.")?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    fn ask_max_tokens(&mut self, default: u32) -> Result<u32, AppError> {
        loop {
            let answer = self.ask(&format!("Enter Max Tokens (default: {default}): "))?;
            let answer = answer.trim();
            if answer.is_empty() {
                return Ok(default);
            }
            match answer.parse::<i64>() {
                Ok(value) if value <= 0 => writeln!(self.output, "Please enter a positive integer.")?,
                Ok(value) => match u32::try_from(value) {
                    Ok(value) => return Ok(value),
                    Err(_) => writeln!(self.output, "Invalid input. Please enter an integer.")?,
                },
                Err(_) => writeln!(self.output, "Invalid input. Please enter an integer.")?,
            }
        }
    }
}

fn is_negative(answer: &str) -> bool {
    let answer = answer.trim();
    answer.eq_ignore_ascii_case("n") || answer.eq_ignore_ascii_case("no")
}

/// Print timing, then either the error, the pretty JSON, or the raw text
pub fn render_result<W: Write>(out: &mut W, result: &CallResult) -> Result<(), AppError> {
    writeln!(out, "\n--- Results ---")?;
    writeln!(out, "Response Time: {:.2} seconds", result.elapsed_seconds())?;

    let completion = match &result.outcome {
        Err(e) => {
            writeln!(out, "API Call Failed: {e}")?;
            return Ok(());
        }
        Ok(completion) if completion.content.trim().is_empty() => {
            writeln!(out, "No output received.")?;
            return Ok(());
        }
        Ok(completion) => completion,
    };

    let usage = completion.usage;
    writeln!(
        out,
        "Token Usage: Prompt={}, Completion={}, Total={}",
        usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
    )?;
    writeln!(out, "\nStructured Output:")?;
    render_output(out, &completion.content)
}

/// Pretty-print `text` as JSON, or frame it raw when it does not parse
pub fn render_output<W: Write>(out: &mut W, text: &str) -> Result<(), AppError> {
    match serde_json::from_str::<JsonValue>(text) {
        Ok(value) => writeln!(out, "{}", serde_json::to_string_pretty(&value)?)?,
        Err(_) => {
            writeln!(out, "{DELIMITER}")?;
            writeln!(out, "(Output was not valid JSON, showing raw response)")?;
            writeln!(out, "{text}")?;
            writeln!(out, "{DELIMITER}")?;
        }
    }
    Ok(())
}
