use thiserror::Error;

use crate::variable::Role;

pub type FuzzyResult<T> = Result<T, FuzzyError>;

/// Everything that can go wrong while building or evaluating a model.
///
/// Build-time variants are raised by [`EngineBuilder::build`](crate::EngineBuilder::build) before
/// any request is served. `MissingInput`, `InvalidInput` and `NoRuleFired` are per-request.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FuzzyError {
    #[error("invalid membership shape: {0}")]
    InvalidShape(String),

    #[error("invalid universe [{min}, {max}] with step {step}")]
    InvalidUniverse { min: f64, max: f64, step: f64 },

    #[error("consequence weight {0} is outside (0, 1]")]
    InvalidWeight(f64),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("unknown variable `{0}`")]
    UnknownVariable(String),

    #[error("variable `{variable}` has no term `{term}`")]
    UnknownTerm { variable: String, term: String },

    #[error("variable `{0}` is defined more than once")]
    DuplicateVariable(String),

    #[error("variable `{variable}` already has a term `{term}`")]
    DuplicateTerm { variable: String, term: String },

    #[error("term `{term}` lies entirely outside the universe of `{variable}`")]
    DomainMismatch { variable: String, term: String },

    #[error("variable `{variable}` is used where an {expected} is required")]
    RoleMismatch { variable: String, expected: Role },

    #[error("no value bound for input `{0}`")]
    MissingInput(String),

    #[error("invalid value {value} for `{variable}`")]
    InvalidInput { variable: String, value: f64 },

    #[error("division by zero while computing `{0}`")]
    DivisionByZero(String),

    #[error("no rule fired for `{0}`; the aggregated output set is empty")]
    NoRuleFired(String),

    #[error("malformed model configuration: {0}")]
    Config(String),
}

impl From<serde_json::Error> for FuzzyError {
    fn from(err: serde_json::Error) -> Self {
        FuzzyError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for FuzzyError {
    fn from(err: toml::de::Error) -> Self {
        FuzzyError::Config(err.to_string())
    }
}
