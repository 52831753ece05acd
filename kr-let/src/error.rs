use let_compute::{numerical::EvalError, symbolic::derivative::SymbolicDerivativeError};
use std::io;
use thiserror::Error;

/// Errors that can occur while building, checking or reporting the LET model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The same name was declared for two different quantities.
    #[error("the symbol `{0}` is declared more than once")]
    DuplicateSymbol(String),

    /// A permeability expression could not be differentiated.
    #[error("could not differentiate the model: {0}")]
    Derivative(#[from] SymbolicDerivativeError),

    /// A shape coefficient or endpoint permeability is not a finite positive number.
    #[error("the parameter `{name}` must be a finite positive number, got {value}")]
    InvalidParameter {
        /// Name of the offending quantity.
        name: &'static str,

        /// The rejected value.
        value: f64,
    },

    /// The saturation range is empty, or the saturation lies outside of it.
    #[error("the saturation {sw} must lie in [{min}, {max}], with {min} < {max}")]
    InvalidSaturationRange {
        /// The water saturation.
        sw: f64,

        /// The irreducible water saturation.
        min: f64,

        /// The maximum water saturation.
        max: f64,
    },

    /// An expression could not be evaluated numerically.
    #[error("could not evaluate the model: {0}")]
    Eval(#[from] EvalError),

    /// The report could not be written.
    #[error("could not write the report: {0}")]
    Io(#[from] io::Error),
}
