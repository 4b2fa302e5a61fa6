//! Validator selection: one forward pass, then a validated decode of the output.

use anyhow::Context;
use novanet_core::{Selection, ValidatorBounds, ValidatorInput};
use tracing::info;

/// A loaded model that can score a validator input.
pub trait Inference {
    /// Run one forward pass and return the first output tensor, flattened.
    fn infer(&mut self, input: &ValidatorInput) -> anyhow::Result<Vec<f32>>;
}

/// Run the model once on `input` and decode its output into a validator selection.
pub fn select_validator<E: Inference + ?Sized>(
    engine: &mut E,
    input: &ValidatorInput,
    bounds: ValidatorBounds,
) -> anyhow::Result<Selection> {
    let output = engine
        .infer(input)
        .context("running validator selection model")?;
    let selection =
        Selection::from_output(&output, bounds).context("decoding validator selection")?;

    info!(
        validator = %selection.validator,
        raw = selection.raw,
        outputs = selection.outputs,
        "selected validator"
    );
    Ok(selection)
}
