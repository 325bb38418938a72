//! Matrix errors
//!
//! Every precondition violation is reported as a value. The message names the
//! operation and, when one was set, the display name of the offending matrix.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const SHAPE: &str = "SHAPE";
    pub const UNDEFINED: &str = "UNDEFINED";
    pub const NOT_ALLOCATED: &str = "NOT_ALLOCATED";
    pub const DIV_ZERO: &str = "DIV_ZERO";
    pub const SINGULAR: &str = "SINGULAR";
    pub const DOMAIN: &str = "DOMAIN";
    pub const BOUNDS: &str = "BOUNDS";
    pub const RAND_UNINIT: &str = "RAND_UNINIT";
    pub const PARSE: &str = "PARSE";
    pub const EOF: &str = "EOF";
    pub const NO_CONVERGENCE: &str = "NO_CONVERGENCE";
    pub const SYMBOL: &str = "SYMBOL";
}

/// Which index of a matrix was out of range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Row,
    Col,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Row => write!(f, "row"),
            Axis::Col => write!(f, "column"),
        }
    }
}

/// Errors raised by the matrix engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("{op}{}: {detail}", named(.name))]
    Shape { op: &'static str, name: String, detail: String },

    #[error("{op}{}: matrix is not defined", named(.name))]
    Undefined { op: &'static str, name: String },

    #[error("{op}{}: matrix is not allocated", named(.name))]
    NotAllocated { op: &'static str, name: String },

    #[error("{op}{}: division by zero", named(.name))]
    DivideByZero { op: &'static str, name: String },

    #[error("{op}: matrix is singular")]
    Singular { op: &'static str },

    #[error("{op}{}: all values are the same", named(.name))]
    Constant { op: &'static str, name: String },

    #[error("{op}{}: row {row} has zero length", named(.name))]
    ZeroLength { op: &'static str, name: String, row: usize },

    #[error("{op}{}: {axis} index {index} out of range 0..{limit}", named(.name))]
    Bounds { op: &'static str, name: String, axis: Axis, index: usize, limit: usize },

    #[error("{op}: random number generator is not initialized")]
    RandomUninitialized { op: &'static str },

    #[error("{op}: {detail}")]
    Domain { op: &'static str, detail: String },

    #[error("parse error on line {line}: {detail}")]
    Parse { line: usize, detail: String },

    #[error("{op}: unexpected end of input")]
    UnexpectedEof { op: &'static str },

    #[error("{op}: no convergence after {iterations} iterations")]
    NoConvergence { op: &'static str, iterations: usize },

    #[error("symbol table: {detail}")]
    Symbol { detail: String },
}

fn named(name: &str) -> String {
    if name.is_empty() {
        String::new()
    } else {
        format!(" ({})", name)
    }
}

impl MatrixError {
    // ========== Common Error Constructors ==========

    pub fn shape(op: &'static str, name: &str, detail: impl Into<String>) -> Self {
        Self::Shape { op, name: name.to_string(), detail: detail.into() }
    }

    pub fn undefined(op: &'static str, name: &str) -> Self {
        Self::Undefined { op, name: name.to_string() }
    }

    pub fn not_allocated(op: &'static str, name: &str) -> Self {
        Self::NotAllocated { op, name: name.to_string() }
    }

    pub fn div_zero(op: &'static str, name: &str) -> Self {
        Self::DivideByZero { op, name: name.to_string() }
    }

    pub fn bounds(op: &'static str, name: &str, axis: Axis, index: usize, limit: usize) -> Self {
        Self::Bounds { op, name: name.to_string(), axis, index, limit }
    }

    pub fn domain(op: &'static str, detail: impl Into<String>) -> Self {
        Self::Domain { op, detail: detail.into() }
    }

    pub fn parse(line: usize, detail: impl Into<String>) -> Self {
        Self::Parse { line, detail: detail.into() }
    }

    /// Machine-readable code, one of [`codes`]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Shape { .. } => codes::SHAPE,
            Self::Undefined { .. } => codes::UNDEFINED,
            Self::NotAllocated { .. } => codes::NOT_ALLOCATED,
            Self::DivideByZero { .. } => codes::DIV_ZERO,
            Self::Singular { .. } => codes::SINGULAR,
            Self::Constant { .. } | Self::ZeroLength { .. } | Self::Domain { .. } => codes::DOMAIN,
            Self::Bounds { .. } => codes::BOUNDS,
            Self::RandomUninitialized { .. } => codes::RAND_UNINIT,
            Self::Parse { .. } => codes::PARSE,
            Self::UnexpectedEof { .. } => codes::EOF,
            Self::NoConvergence { .. } => codes::NO_CONVERGENCE,
            Self::Symbol { .. } => codes::SYMBOL,
        }
    }

    /// True for numeric failures (zero divisors, singular systems, degenerate data)
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::DivideByZero { .. }
                | Self::Singular { .. }
                | Self::Constant { .. }
                | Self::ZeroLength { .. }
                | Self::NoConvergence { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_includes_name() {
        let err = MatrixError::shape("add", "weights", "2×3 vs 3×2");
        assert_eq!(err.to_string(), "add (weights): 2×3 vs 3×2");
    }

    #[test]
    fn test_message_without_name() {
        let err = MatrixError::undefined("sum", "");
        assert_eq!(err.to_string(), "sum: matrix is not defined");
    }

    #[test]
    fn test_bounds_message() {
        let err = MatrixError::bounds("get", "", Axis::Col, 5, 3);
        assert_eq!(err.to_string(), "get: column index 5 out of range 0..3");
        assert_eq!(err.code(), codes::BOUNDS);
    }

    #[test]
    fn test_numeric_category() {
        assert!(MatrixError::Singular { op: "inverse" }.is_numeric());
        assert!(MatrixError::div_zero("div", "").is_numeric());
        assert!(!MatrixError::RandomUninitialized { op: "shuffle" }.is_numeric());
    }
}
