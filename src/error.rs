//! Error types for graph construction.

use thiserror::Error;

use crate::{context::Context, parameter::ParameterName, signal::Arity};

/// Result type for configuration and parsing.
pub type GenResult<T> = Result<T, GenError>;

/// Errors raised while building or configuring a generator graph. Rendering
/// never fails.
#[derive(Debug, Error)]
pub enum GenError {
    /// A parameter string that names no known parameter.
    #[error("unknown parameter name: {0}")]
    UnknownParameter(String),

    /// A known parameter that this kind of generator does not expose.
    #[error("{kind} has no parameter {parameter}")]
    InvalidParameter {
        kind: &'static str,
        parameter: ParameterName,
    },

    /// A context string that names no known context.
    #[error("unknown context name: {0}")]
    UnknownContext(String),

    /// The context is not legal for the slot.
    #[error("context {context} is not valid for parameter {parameter}")]
    InvalidContext {
        parameter: ParameterName,
        context: Context,
    },

    /// The child produces the wrong kind of output for the slot.
    #[error("parameter {parameter} requires a {expected} input, found {found}")]
    InvalidArity {
        parameter: ParameterName,
        expected: Arity,
        found: Arity,
    },

    /// The slot stores a literal and cannot hold a generator.
    #[error("parameter {parameter} only accepts a literal value")]
    LiteralOnly { parameter: ParameterName },

    /// The slot holds a generator, not a literal of the supplied shape.
    #[error("parameter {parameter} does not accept this literal")]
    NotLiteral { parameter: ParameterName },

    /// The factory has no generator by this name.
    #[error("unknown generator name: {0}")]
    UnknownGenerator(String),

    /// Malformed generator text.
    #[error("parse error: {message} in '{input}'")]
    Parse { message: String, input: String },

    /// A string that should be a number or a list of numbers.
    #[error("invalid number: '{0}'")]
    InvalidNumber(String),

    /// A size (channels, frames, table depth) that cannot be used.
    #[error("invalid {what}: {value}")]
    InvalidSize { what: &'static str, value: usize },

    /// Invalid environment configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// WAV file I/O.
    #[error("wav error: {0}")]
    Wav(#[from] hound::Error),
}

impl GenError {
    pub(crate) fn parse(message: impl Into<String>, input: &str) -> Self {
        GenError::Parse {
            message: message.into(),
            input: input.to_string(),
        }
    }
}
