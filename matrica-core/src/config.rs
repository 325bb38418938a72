//! Print configuration
//!
//! Formatting options are passed explicitly to every printing call instead of
//! living in process-wide state.

use serde::{Deserialize, Serialize};
use crate::error::MatrixError;

/// Formatting options for rendering matrices as text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Field width for real-valued cells
    pub real_width: usize,
    /// Digits after the decimal point for real-valued cells
    pub real_precision: usize,
    /// Field width for integer-valued cells
    pub int_width: usize,
    /// Emit a "(size of NAME: R X C)" header before the cells
    pub print_size: bool,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            real_width: 8,
            real_precision: 3,
            int_width: 5,
            print_size: true,
        }
    }
}

impl PrintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_real_format(mut self, width: usize, precision: usize) -> Self {
        self.real_width = width;
        self.real_precision = precision;
        self
    }

    pub fn with_int_width(mut self, width: usize) -> Self {
        self.int_width = width;
        self
    }

    pub fn with_print_size(mut self, enabled: bool) -> Self {
        self.print_size = enabled;
        self
    }

    /// Format one real cell, including the trailing separator
    pub fn real(&self, value: f64) -> String {
        format!("{:>w$.p$} ", value, w = self.real_width, p = self.real_precision)
    }

    /// Format one integral cell, including the trailing separator
    pub fn int(&self, value: f64) -> String {
        format!("{:>w$.0} ", value, w = self.int_width)
    }

    /// Parse a (possibly partial) JSON configuration
    pub fn from_json(text: &str) -> Result<Self, MatrixError> {
        serde_json::from_str(text).map_err(|e| MatrixError::parse(e.line(), e.to_string()))
    }

    pub fn to_json(&self) -> String {
        // Plain struct of numbers and bools always serializes
        serde_json::to_string(self).unwrap_or_default()
    }
}
