//! Validator process host: builds the child command, hands the selected
//! validator over through its environment, and supervises it to exit.

use std::process::Command;

use chrono::{DateTime, Utc};
use novanet_core::{DEFAULT_CLI_PROGRAM, SELECTED_VALIDATOR_ENV, START_ARGS, ValidatorId};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {}", describe_exit(.code))]
    Exited { program: String, code: Option<i32> },
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

/// Everything needed to start the validator CLI for a selected validator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorLaunch {
    pub program: String,
    pub args: Vec<String>,
    pub validator: ValidatorId,
}

impl ValidatorLaunch {
    /// Launch plan for `program start --validator --use-gpu`.
    pub fn new(program: impl Into<String>, validator: ValidatorId) -> Self {
        Self {
            program: program.into(),
            args: START_ARGS.iter().map(|a| a.to_string()).collect(),
            validator,
        }
    }

    /// Launch plan for the default `novanet-cli` program.
    pub fn novanet_cli(validator: ValidatorId) -> Self {
        Self::new(DEFAULT_CLI_PROGRAM, validator)
    }

    /// Replace the argument list.
    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    /// Program followed by its arguments.
    pub fn argv(&self) -> Vec<String> {
        std::iter::once(self.program.clone())
            .chain(self.args.iter().cloned())
            .collect()
    }

    /// Environment entries published to the child.
    pub fn envs(&self) -> Vec<(&'static str, String)> {
        vec![(SELECTED_VALIDATOR_ENV, self.validator.to_string())]
    }

    /// Build the child command. Stdio is inherited from the launcher.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.envs());
        cmd
    }
}

/// Completed validator run.
#[derive(Debug, Clone)]
pub struct LaunchRecord {
    pub program: String,
    pub argv: Vec<String>,
    pub validator: ValidatorId,
    pub exit_code: Option<i32>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl LaunchRecord {
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Start the validator process and block until it exits.
///
/// A child that exits non-zero, or is killed by a signal, is an error.
pub fn launch(plan: &ValidatorLaunch) -> Result<LaunchRecord, LaunchError> {
    info!(
        program = %plan.program,
        args = ?plan.args,
        validator = %plan.validator,
        "starting validator process"
    );

    let started_at = Utc::now();
    let status = plan
        .command()
        .status()
        .map_err(|source| LaunchError::Spawn {
            program: plan.program.clone(),
            source,
        })?;
    let finished_at = Utc::now();

    if !status.success() {
        warn!(program = %plan.program, code = ?status.code(), "validator process failed");
        return Err(LaunchError::Exited {
            program: plan.program.clone(),
            code: status.code(),
        });
    }

    let record = LaunchRecord {
        program: plan.program.clone(),
        argv: plan.argv(),
        validator: plan.validator,
        exit_code: status.code(),
        started_at,
        finished_at,
    };
    info!(
        program = %plan.program,
        elapsed_ms = record.elapsed().num_milliseconds(),
        "validator process exited"
    );
    Ok(record)
}
