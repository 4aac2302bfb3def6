//! Error types for the solvers and model providers.

use crate::common::defs::{Continous, Discrete};
use thiserror::Error;

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, MdpError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum MdpError {
    /// Solver parameters rejected before any iteration starts.
    #[error("invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// The model, or a policy/value function handed in with it, does not have
    /// the expected shape.
    #[error("model shape error: {message}")]
    ModelShape { message: String },

    /// An iteration loop hit its cap before satisfying the tolerance.
    #[error("no convergence after {iterations} iterations (last delta {delta:e})")]
    NonConvergence { iterations: usize, delta: Continous },

    /// A serialized model or map could not be read.
    #[error("malformed model: {message}")]
    ModelFormat { message: String },
}

impl MdpError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    pub(crate) fn shape(message: impl Into<String>) -> Self {
        Self::ModelShape {
            message: message.into(),
        }
    }

    pub(crate) fn shape_at(s: Discrete, a: Discrete, message: impl std::fmt::Display) -> Self {
        Self::ModelShape {
            message: format!("(s: {s}, a: {a}) {message}"),
        }
    }

    pub(crate) fn format(message: impl Into<String>) -> Self {
        Self::ModelFormat {
            message: message.into(),
        }
    }
}
