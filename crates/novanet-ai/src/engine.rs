//! ONNX Runtime engine for the validator-selection model.
//!
//! The model takes a single `[1, 4]` f32 tensor and its first output holds the
//! selected validator index. Output shape is not checked here; the caller
//! decodes and validates it.
//!
//! Tests run against `models/validator/model.onnx`, an Identity graph over
//! the `[1, 4]` input, so output element 0 is input element 0.

use std::path::{Path, PathBuf};

use anyhow::Context;
use novanet_core::{VALIDATOR_INPUT_LEN, ValidatorInput};
use ort::session::Session;
use ort::value::Tensor;
use tracing::{debug, info};

use crate::selector::Inference;

/// Deserialized validator-selection model, ready to run.
pub struct ValidatorEngine {
    session: Session,
    path: PathBuf,
}

impl ValidatorEngine {
    /// Read a serialized model from `path` and build an inference session from it.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let found = path
            .try_exists()
            .with_context(|| format!("checking validator model {}", path.display()))?;
        anyhow::ensure!(found, "validator model not found at {path:?}");

        let bytes = std::fs::read(path)
            .with_context(|| format!("reading validator model {}", path.display()))?;
        let session = Session::builder()?
            .commit_from_memory(&bytes)
            .with_context(|| format!("deserializing validator model {}", path.display()))?;

        info!(
            model = %path.display(),
            bytes = bytes.len(),
            "loaded validator selection model"
        );
        Ok(Self {
            session,
            path: path.to_path_buf(),
        })
    }

    /// Path the model was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Inference for ValidatorEngine {
    fn infer(&mut self, input: &ValidatorInput) -> anyhow::Result<Vec<f32>> {
        let shape = [1i64, VALIDATOR_INPUT_LEN as i64];
        let tensor = Tensor::from_array((shape, input.as_slice().to_vec().into_boxed_slice()))?;

        let outputs = self.session.run(ort::inputs![tensor])?;
        let (output_shape, output_data) = outputs[0].try_extract_tensor::<f32>()?;
        let dims: &[i64] = output_shape;
        debug!(?dims, "validator model output");

        Ok(output_data.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::select_validator;
    use novanet_core::{ValidatorBounds, ValidatorId};

    fn model_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("models")
            .join("validator")
            .join("model.onnx")
    }

    #[test]
    fn missing_model_fails_to_load() {
        let err = ValidatorEngine::load(Path::new("/nonexistent/validator_model.trt"))
            .err()
            .expect("load should fail");
        assert!(err.to_string().contains("not found"), "got: {err}");
    }

    #[test]
    fn malformed_model_fails_to_load() {
        let path = std::env::temp_dir().join(format!(
            "novanet-malformed-{}.onnx",
            std::process::id()
        ));
        std::fs::write(&path, b"not a model").unwrap();
        let result = ValidatorEngine::load(&path);
        std::fs::remove_file(&path).unwrap();

        let err = result.err().expect("load should fail");
        assert!(format!("{err:#}").contains("deserializing"), "got: {err:#}");
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_model_path_reports_io_error() {
        // A regular file used as a directory: the lookup fails with ENOTDIR.
        let file = std::env::temp_dir().join(format!("novanet-notadir-{}", std::process::id()));
        std::fs::write(&file, b"").unwrap();
        let result = ValidatorEngine::load(&file.join("model.onnx"));
        std::fs::remove_file(&file).unwrap();

        let err = result.err().expect("load should fail");
        let msg = format!("{err:#}");
        assert!(msg.contains("checking validator model"), "got: {msg}");
        assert!(!msg.contains("not found"), "got: {msg}");
    }

    #[test]
    fn load_model() {
        let engine = ValidatorEngine::load(&model_path()).unwrap();
        assert_eq!(engine.path(), model_path().as_path());
    }

    #[test]
    fn select_from_placeholder_input() {
        let mut engine = ValidatorEngine::load(&model_path()).unwrap();
        let sel = select_validator(
            &mut engine,
            &ValidatorInput::default(),
            ValidatorBounds::unbounded(),
        )
        .unwrap();
        assert!(sel.raw.is_finite());
        assert_eq!(sel.raw, 0.8);
        assert_eq!(sel.outputs, 4);
        assert_eq!(sel.validator, ValidatorId(0));
    }

    #[test]
    fn infer_returns_first_output_tensor() {
        let mut engine = ValidatorEngine::load(&model_path()).unwrap();
        let input = ValidatorInput::new(&[3.0, 0.3, 0.6, 0.9]).unwrap();
        let output = engine.infer(&input).unwrap();
        assert_eq!(output, vec![3.0, 0.3, 0.6, 0.9]);

        let sel = select_validator(&mut engine, &input, ValidatorBounds::with_count(4)).unwrap();
        assert_eq!(sel.validator, ValidatorId(3));
    }
}
