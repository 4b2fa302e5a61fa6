//! Start pipeline: select a validator with the model, then hand it to the validator CLI.

use std::path::Path;

use anyhow::Context;
use novanet_ai::{Inference, ValidatorEngine, select_validator};
use novanet_core::{Selection, ValidatorBounds, ValidatorInput};
use novanet_host::{LaunchRecord, ValidatorLaunch};

pub struct StartOptions {
    pub input: ValidatorInput,
    pub bounds: ValidatorBounds,
    pub program: String,
    pub dry_run: bool,
}

pub enum StartOutcome {
    /// Dry run: the process that would have been started.
    Planned(Selection, ValidatorLaunch),
    Finished(Selection, LaunchRecord),
}

/// Load the selection model. Nothing else runs if this fails.
pub fn load_engine(path: &Path) -> anyhow::Result<ValidatorEngine> {
    ValidatorEngine::load(path).context("loading validator selection model")
}

/// Run the model once, then start the validator CLI for the selected validator.
pub fn run_start<E: Inference + ?Sized>(
    engine: &mut E,
    opts: &StartOptions,
) -> anyhow::Result<StartOutcome> {
    let selection = select_validator(engine, &opts.input, opts.bounds)?;
    let plan = ValidatorLaunch::new(opts.program.clone(), selection.validator);

    if opts.dry_run {
        return Ok(StartOutcome::Planned(selection, plan));
    }

    let record = novanet_host::launch(&plan)?;
    Ok(StartOutcome::Finished(selection, record))
}
