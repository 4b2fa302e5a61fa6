pub mod defaults;
pub mod validator;

pub use defaults::{
    DEFAULT_CLI_PROGRAM, DEFAULT_MODEL_PATH, PLACEHOLDER_INPUT, SELECTED_VALIDATOR_ENV, START_ARGS,
};
pub use validator::{
    DecodeError, InputError, Selection, VALIDATOR_INPUT_LEN, ValidatorBounds, ValidatorId,
    ValidatorInput,
};
