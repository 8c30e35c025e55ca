//! Fixture-based regression harness
//!
//! Runs every fixture through the model once with the default prompts,
//! compares the parsed output against the expected record and writes a
//! human-readable report to a fresh [`RunLog`]. Only the summary reaches the
//! console writer.

use std::io::Write;
use std::path::PathBuf;

use chrono::Local;
use serde_json::Value as JsonValue;
use uuid::Uuid;
use wrangler_core::{
    CallResult, ChatBackend, Fixture, JsonDiff, WranglerError, builtin_fixtures, call_model, diff,
};

use crate::config::Config;
use crate::error::AppError;
use crate::report::RunLog;

const CLIENT_INIT_FAILED: &str = "ERROR: Cannot run tests, OpenAI client failed to initialize.";

/// Result of checking one fixture
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    Passed { actual: JsonValue },
    CallFailed(WranglerError),
    NoOutput,
    Malformed { raw: String },
    Mismatch { actual: JsonValue, diff: JsonDiff },
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        matches!(self, Verdict::Passed { .. })
    }
}

/// Judge a call result against the fixture's expected record
pub fn evaluate(fixture: &Fixture, result: &CallResult) -> Verdict {
    let text = match &result.outcome {
        Err(e) => return Verdict::CallFailed(e.clone()),
        Ok(completion) => completion.content.as_str(),
    };

    if text.trim().is_empty() {
        return Verdict::NoOutput;
    }

    let actual: JsonValue = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            let err = WranglerError::MalformedResponse(e.to_string());
            tracing::warn!(error = %err, "Fixture output rejected");
            return Verdict::Malformed {
                raw: text.to_string(),
            };
        }
    };

    let changes = diff(&fixture.expected, &actual);
    if changes.is_empty() {
        Verdict::Passed { actual }
    } else {
        Verdict::Mismatch {
            actual,
            diff: changes,
        }
    }
}

/// Counts and log location of a completed run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub passed: usize,
    pub failed: usize,
    pub log_path: PathBuf,
}

pub struct Harness<'a> {
    config: &'a Config,
    fixtures: Vec<Fixture>,
}

impl<'a> Harness<'a> {
    /// Harness over the built-in fixture list
    pub fn new(config: &'a Config) -> Self {
        Self::with_fixtures(config, builtin_fixtures())
    }

    pub fn with_fixtures(config: &'a Config, fixtures: Vec<Fixture>) -> Self {
        Self { config, fixtures }
    }

    /// Execute the whole batch.
    ///
    /// `connect` builds the backend once, after the log is open. Every error
    /// returned here has already been reported to the log (when one exists)
    /// and to `console`, and the log file is closed on every path.
    pub async fn run<B, F, W>(&self, connect: F, console: &mut W) -> Result<RunSummary, AppError>
    where
        B: ChatBackend,
        F: FnOnce(&Config) -> Result<B, WranglerError>,
        W: Write,
    {
        let mut log = match RunLog::create(&self.config.log_dir, Local::now()) {
            Ok(log) => log,
            Err(e) => {
                let err = AppError::from(e);
                report_unexpected(None, console, &err);
                return Err(err);
            }
        };

        let outcome = self.run_logged(&mut log, connect, console).await;

        if let Err(err) = &outcome {
            if !matches!(err, AppError::Client(_)) {
                report_unexpected(Some(&mut log), console, err);
            }
        }

        let closed = log.finish();
        let summary = outcome?;
        closed?;
        Ok(summary)
    }

    async fn run_logged<B, F, W>(
        &self,
        log: &mut RunLog,
        connect: F,
        console: &mut W,
    ) -> Result<RunSummary, AppError>
    where
        B: ChatBackend,
        F: FnOnce(&Config) -> Result<B, WranglerError>,
        W: Write,
    {
        let run_id = Uuid::new_v4();
        let log_path = log.path().to_path_buf();
        let timestamp = log.timestamp().to_string();

        writeln!(log, "--- Starting Prompt Evaluation Tests ({timestamp}) ---")?;
        writeln!(log, "Run ID: {run_id}")?;
        writeln!(log, "Logging results to: {}", log_path.display())?;

        let backend = match connect(self.config) {
            Ok(backend) => backend,
            Err(e) => {
                writeln!(log, "\n{CLIENT_INIT_FAILED}\n{e}")?;
                writeln!(console, "\n{CLIENT_INIT_FAILED}\n{e}")?;
                return Err(e.into());
            }
        };

        tracing::info!(%run_id, fixtures = self.fixtures.len(), "Starting evaluation run");

        let mut passed = 0;
        let mut failed = 0;

        for (i, fixture) in self.fixtures.iter().enumerate() {
            writeln!(log, "\n--- Test Case {} ---", i + 1)?;
            writeln!(log, "Input Text: {}", fixture.input)?;

            let result = call_model(
                &backend,
                &self.config.prompts,
                &fixture.input,
                &self.config.harness,
            )
            .await;
            writeln!(log, "Response Time: {:.2}s", result.elapsed_seconds())?;

            let verdict = evaluate(fixture, &result);
            write_verdict(log, fixture, &verdict)?;
            tracing::info!(case = i + 1, passed = verdict.is_pass(), "Fixture evaluated");

            if verdict.is_pass() {
                passed += 1;
            } else {
                failed += 1;
            }
        }

        writeln!(log, "\n--- Test Summary ---")?;
        writeln!(log, "Passed: {passed}")?;
        writeln!(log, "Failed: {failed}")?;
        writeln!(log, "--------------------")?;
        writeln!(log, "Test results saved to: {}", log_path.display())?;

        writeln!(console, "\n--- Test Summary ---")?;
        writeln!(console, "Passed: {passed}")?;
        writeln!(console, "Failed: {failed}")?;
        writeln!(console, "Test results saved to: {}", log_path.display())?;
        writeln!(console, "--------------------")?;

        Ok(RunSummary {
            run_id,
            passed,
            failed,
            log_path,
        })
    }
}

fn write_verdict<W: Write>(log: &mut W, fixture: &Fixture, verdict: &Verdict) -> Result<(), AppError> {
    match verdict {
        Verdict::CallFailed(e) => writeln!(log, "FAILED: API Call Error - {e}")?,
        Verdict::NoOutput => writeln!(log, "FAILED: No output received from LLM.")?,
        Verdict::Malformed { raw } => {
            writeln!(log, "\nFAILED: Output was not valid JSON.")?;
            writeln!(log, "--- Raw Output ---")?;
            writeln!(log, "{raw}")?;
            writeln!(log, "------------------")?;
        }
        Verdict::Passed { actual } => {
            write_outputs(log, &fixture.expected, actual)?;
            writeln!(log, "\nPASSED")?;
        }
        Verdict::Mismatch {
            actual,
            diff: changes,
        } => {
            write_outputs(log, &fixture.expected, actual)?;
            writeln!(log, "\nFAILED: Output does not match expected structure.")?;
            writeln!(log, "--- Summary of Differences ---")?;
            writeln!(log, "{changes}")?;
            writeln!(log, "--- Raw Diff ---")?;
            writeln!(log, "{}", changes.to_pretty_json()?)?;
            writeln!(log, "----------------------")?;
        }
    }
    Ok(())
}

fn write_outputs<W: Write>(log: &mut W, expected: &JsonValue, actual: &JsonValue) -> Result<(), AppError> {
    writeln!(log, "\nExpected Output (JSON):")?;
    writeln!(log, "{}", serde_json::to_string_pretty(expected)?)?;
    writeln!(log, "\nActual Output (JSON):")?;
    writeln!(log, "{}", serde_json::to_string_pretty(actual)?)?;
    Ok(())
}

/// Best-effort report of an error that aborted the run
fn report_unexpected<W: Write>(log: Option<&mut RunLog>, console: &mut W, err: &AppError) {
    if let Some(log) = log {
        let _ = writeln!(log, "\n--- UNEXPECTED ERROR DURING TESTING ---");
        let _ = writeln!(log, "{err}");
        if let Some(trace) = err.trace() {
            let _ = writeln!(log, "{trace}");
        }
        let _ = writeln!(log, "--- END UNEXPECTED ERROR ---");
    }

    tracing::error!(error = %err, "Evaluation run aborted");

    let _ = writeln!(console, "\n--- UNEXPECTED ERROR DURING TESTING ---");
    let _ = writeln!(console, "{err}");
    let _ = writeln!(console, "See log file for full traceback.");
    let _ = writeln!(console, "--- END UNEXPECTED ERROR ---");
}
