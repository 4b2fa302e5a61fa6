//! Validator selection types.
//!
//! The selection model takes a fixed-width feature vector and emits a tensor
//! whose first element names the validator to activate. Decoding that element
//! is the only interpretation the launcher applies to model output:
//!
//! - element 0 must exist and be finite
//! - it is truncated toward zero (`3.7` → `3`, `-0.5` → `0`)
//! - the result must fit in `u32` and, when a validator count is known, be
//!   below it

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::defaults::PLACEHOLDER_INPUT;

/// Number of features the selection model expects.
pub const VALIDATOR_INPUT_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("expected {expected} input values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("input value {index} is not finite: {value}")]
    NotFinite { index: usize, value: f32 },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("model returned an empty output")]
    EmptyOutput,

    #[error("model output is not a finite number: {0}")]
    NotFinite(f32),

    #[error("model output {value} is outside the validator range [0, {max})")]
    OutOfRange { value: f32, max: u64 },
}

/// Feature vector fed to the selection model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidatorInput([f32; VALIDATOR_INPUT_LEN]);

impl ValidatorInput {
    /// Build an input from exactly [`VALIDATOR_INPUT_LEN`] finite values.
    pub fn new(values: &[f32]) -> Result<Self, InputError> {
        let arr: [f32; VALIDATOR_INPUT_LEN] =
            values.try_into().map_err(|_| InputError::WrongLength {
                expected: VALIDATOR_INPUT_LEN,
                actual: values.len(),
            })?;
        if let Some((index, &value)) = arr.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(InputError::NotFinite { index, value });
        }
        Ok(Self(arr))
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }
}

impl Default for ValidatorInput {
    fn default() -> Self {
        Self(PLACEHOLDER_INPUT)
    }
}

/// Upper bound on valid validator identifiers.
///
/// `None` accepts anything that fits in `u32`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidatorBounds {
    pub count: Option<u32>,
}

impl ValidatorBounds {
    pub fn unbounded() -> Self {
        Self { count: None }
    }

    pub fn with_count(count: u32) -> Self {
        Self { count: Some(count) }
    }

    /// Exclusive upper bound as a `u64` so the unbounded case is representable.
    pub fn max(&self) -> u64 {
        match self.count {
            Some(n) => u64::from(n),
            None => u64::from(u32::MAX) + 1,
        }
    }
}

/// Identifier of the validator selected by the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidatorId(pub u32);

impl ValidatorId {
    /// Decode the first element of a model output into a validator identifier.
    pub fn decode(output: &[f32], bounds: ValidatorBounds) -> Result<Self, DecodeError> {
        let &raw = output.first().ok_or(DecodeError::EmptyOutput)?;
        if !raw.is_finite() {
            return Err(DecodeError::NotFinite(raw));
        }

        let truncated = f64::from(raw).trunc();
        let max = bounds.max();
        if truncated < 0.0 || truncated >= max as f64 {
            return Err(DecodeError::OutOfRange { value: raw, max });
        }

        let id = Self(truncated as u32);
        debug!(raw, validator = %id, "decoded model output");
        Ok(id)
    }
}

impl fmt::Display for ValidatorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Outcome of one selection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub validator: ValidatorId,
    /// Output element the identifier was decoded from.
    pub raw: f32,
    /// Number of elements in the model output.
    pub outputs: usize,
}

impl Selection {
    /// Decode a raw model output into a selection.
    pub fn from_output(output: &[f32], bounds: ValidatorBounds) -> Result<Self, DecodeError> {
        let validator = ValidatorId::decode(output, bounds)?;
        Ok(Self {
            validator,
            raw: output[0],
            outputs: output.len(),
        })
    }
}
