//! Fixed values the launcher falls back to when nothing is configured.

/// Serialized validator-selection model loaded at startup.
pub const DEFAULT_MODEL_PATH: &str = "/novanet/validator_model.trt";

/// Validator CLI launched once a validator has been selected.
pub const DEFAULT_CLI_PROGRAM: &str = "novanet-cli";

/// Arguments passed to the validator CLI. Not configurable.
pub const START_ARGS: [&str; 3] = ["start", "--validator", "--use-gpu"];

/// Environment variable carrying the selected validator to the child process.
pub const SELECTED_VALIDATOR_ENV: &str = "SELECTED_VALIDATOR";

/// Placeholder model input used until real node telemetry is wired in.
pub const PLACEHOLDER_INPUT: [f32; 4] = [0.8, 0.3, 0.6, 0.9];
