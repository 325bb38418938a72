//! String to integer code dictionary used by labeled I/O

use std::collections::HashMap;
use std::fmt;
use crate::error::MatrixError;

/// Default first code handed out by labeled readers
pub const DEFAULT_SYMBOL_START: i64 = 1000;

/// Bidirectional map between strings and dense integer codes
///
/// Codes are assigned in insertion order starting at `start`.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    start: i64,
    codes: HashMap<String, i64>,
    names: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::with_start(0)
    }

    pub fn with_start(start: i64) -> Self {
        Self { start, codes: HashMap::new(), names: Vec::new() }
    }

    pub fn start(&self) -> i64 {
        self.start
    }

    /// Return the code for `name`, adding it if absent
    pub fn add(&mut self, name: &str) -> i64 {
        if let Some(&code) = self.codes.get(name) {
            return code;
        }
        let code = self.start + self.names.len() as i64;
        self.codes.insert(name.to_string(), code);
        self.names.push(name.to_string());
        code
    }

    pub fn get(&self, name: &str) -> Option<i64> {
        self.codes.get(name).copied()
    }

    pub fn code_or(&self, name: &str, default: i64) -> i64 {
        self.get(name).unwrap_or(default)
    }

    pub fn name(&self, code: i64) -> Option<&str> {
        let idx = code.checked_sub(self.start)?;
        if idx < 0 {
            return None;
        }
        self.names.get(idx as usize).map(String::as_str)
    }

    pub fn name_or<'a>(&'a self, code: i64, default: &'a str) -> &'a str {
        self.name(code).unwrap_or(default)
    }

    /// Name for a code stored in a matrix cell
    pub fn name_of_value(&self, value: f64) -> Result<&str, MatrixError> {
        if value.fract() != 0.0 || !value.is_finite() {
            return Err(MatrixError::Symbol {
                detail: format!("{} is not an integral code", value),
            });
        }
        self.name(value as i64).ok_or_else(|| MatrixError::Symbol {
            detail: format!(
                "code {} out of range {}..{}",
                value,
                self.start,
                self.start + self.names.len() as i64
            ),
        })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn clear(&mut self) {
        self.codes.clear();
        self.names.clear();
    }

    /// (code, name) pairs in code order
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.names
            .iter()
            .enumerate()
            .map(move |(i, n)| (self.start + i as i64, n.as_str()))
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (code, name) in self.iter() {
            writeln!(f, "{}: {}", code, name)?;
        }
        Ok(())
    }
}
