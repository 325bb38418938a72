//! Text rendering of matrices
//!
//! Rendering is checked up front: `display_as` validates the matrix for
//! the requested style and returns a value whose `Display` cannot fail.

use std::fmt;
use matrica_core::{MatrixError, PrintConfig, Result, SymbolTable};
use crate::types::Matrix;

/// How cells are rendered
#[derive(Debug, Clone, Copy)]
pub enum Style<'a> {
    /// Fixed-width reals
    Real,
    /// Fixed-width integers; every cell must be integral
    Int,
    /// Reals, with cells smaller than epsilon in magnitude shown as 0
    NonZero(f64),
    /// Nested brace lists readable by Mathematica
    Mathematica,
    /// One character per cell: cell n picks the nth character of the code,
    /// clamped to the first and last
    Chars(&'a str),
    /// Column 0 holds symbol codes, the rest are plain numbers
    Labeled(&'a SymbolTable),
    /// Every cell holds a symbol code
    Strings(&'a SymbolTable),
}

/// A matrix ready to be written with `{}`
pub struct Rendered<'a> {
    matrix: &'a Matrix,
    config: &'a PrintConfig,
    style: Style<'a>,
    message: &'a str,
}

impl<'a> Rendered<'a> {
    /// Builder: text printed before the size header
    pub fn with_message(mut self, message: &'a str) -> Self {
        self.message = message;
        self
    }
}

impl Matrix {
    /// Render with real-valued cells
    pub fn display<'a>(&'a self, config: &'a PrintConfig) -> Result<Rendered<'a>> {
        self.display_as(config, Style::Real)
    }

    /// Render with column 0 mapped through `symbols`
    pub fn display_labeled<'a>(&'a self, config: &'a PrintConfig, symbols: &'a SymbolTable) -> Result<Rendered<'a>> {
        self.display_as(config, Style::Labeled(symbols))
    }

    pub fn display_as<'a>(&'a self, config: &'a PrintConfig, style: Style<'a>) -> Result<Rendered<'a>> {
        self.check_defined("display")?;
        match style {
            Style::Int => self.check_integral("display")?,
            Style::Chars(code) if code.is_empty() => {
                return Err(MatrixError::domain("display", "empty character code"));
            }
            Style::Labeled(symbols) => {
                if self.cols() > 0 {
                    for row in self.iter_rows() {
                        symbols.name_of_value(row[0])?;
                    }
                }
            }
            Style::Strings(symbols) => {
                for &v in self.iter_rows().flatten() {
                    symbols.name_of_value(v)?;
                }
            }
            _ => {}
        }
        Ok(Rendered { matrix: self, config, style, message: "" })
    }

    /// "(size of NAME: R X C)", preceded by `msg` when it is not empty
    pub fn size_line(&self, msg: &str) -> String {
        let mut out = String::new();
        if !msg.is_empty() {
            out.push_str(msg);
            out.push(' ');
        }
        let (r, c) = self.dims();
        if self.name.is_empty() {
            out.push_str(&format!("(size: {} X {})", r, c));
        } else {
            out.push_str(&format!("(size of {}: {} X {})", self.name, r, c));
        }
        out
    }
}

impl fmt::Display for Rendered<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.matrix;
        if let Style::Mathematica = self.style {
            if !self.message.is_empty() {
                writeln!(f, "\"{}\"", self.message)?;
            }
            writeln!(f, "{{")?;
            for (r, row) in m.iter_rows().enumerate() {
                let cells: Vec<String> = row.iter().map(|x| x.to_string()).collect();
                let sep = if r + 1 < m.rows() { "," } else { "" };
                writeln!(f, "{{{}}}{}", cells.join(","), sep)?;
            }
            return writeln!(f, "}}");
        }

        if self.config.print_size {
            writeln!(f, "{}", m.size_line(self.message))?;
        } else if !self.message.is_empty() {
            writeln!(f, "{}", self.message)?;
        }

        let cfg = self.config;
        for row in m.iter_rows() {
            for (c, &x) in row.iter().enumerate() {
                match self.style {
                    Style::Real => f.write_str(&cfg.real(x))?,
                    Style::Int => f.write_str(&cfg.int(x))?,
                    Style::NonZero(eps) if x.abs() < eps => f.write_str(&cfg.int(0.0))?,
                    Style::NonZero(_) => f.write_str(&cfg.real(x))?,
                    Style::Chars(code) => {
                        let last = code.chars().count() - 1;
                        let n = if x < 0.0 { 0 } else { (x as usize).min(last) };
                        let ch = code.chars().nth(n).unwrap_or(' ');
                        write!(f, "{}", ch)?;
                    }
                    Style::Labeled(symbols) if c == 0 => {
                        write!(f, "{} ", symbols.name_of_value(x).unwrap_or("?"))?;
                    }
                    Style::Labeled(_) => write!(f, "{} ", x)?,
                    Style::Strings(symbols) => {
                        write!(f, "{} ", symbols.name_of_value(x).unwrap_or("?"))?;
                    }
                    Style::Mathematica => {}
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl fmt::Display for Matrix {
    /// Real-valued rendering with the default configuration
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let config = PrintConfig::default();
        match self.display(&config) {
            Ok(rendered) => write!(f, "{}", rendered),
            Err(_) => writeln!(f, "{} undefined", self.size_line("")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> PrintConfig {
        PrintConfig::default().with_print_size(false)
    }

    #[test]
    fn test_real_default() {
        let m = Matrix::from_slice(1, 2, &[1.5, -2.0]).unwrap().with_name("v");
        assert_eq!(m.to_string(), "(size of v: 1 X 2)\n   1.500   -2.000 \n");
        let cfg = quiet().with_real_format(5, 1);
        assert_eq!(m.display(&cfg).unwrap().to_string(), "  1.5  -2.0 \n");
    }

    #[test]
    fn test_size_line() {
        let m = Matrix::with_size(2, 3);
        assert_eq!(m.size_line(""), "(size: 2 X 3)");
        assert_eq!(Matrix::named("a").size_line("hi"), "hi (size of a: -1 X -1)");
        assert!(m.to_string().ends_with("undefined\n"));
    }

    #[test]
    fn test_int_requires_integral() {
        let cfg = quiet();
        let ok = Matrix::from_ints(1, 2, &[3, -4]).unwrap();
        assert_eq!(ok.display_as(&cfg, Style::Int).unwrap().to_string(), "    3    -4 \n");
        let bad = Matrix::from_slice(1, 1, &[0.5]).unwrap();
        assert!(bad.display_as(&cfg, Style::Int).is_err());
    }

    #[test]
    fn test_nonzero_and_chars() {
        let cfg = quiet().with_real_format(4, 1).with_int_width(4);
        let m = Matrix::from_slice(1, 2, &[1e-9, 2.0]).unwrap();
        assert_eq!(m.display_as(&cfg, Style::NonZero(1e-6)).unwrap().to_string(), "   0  2.0 \n");
        let c = Matrix::from_ints(2, 3, &[0, 1, 2, -1, 9, 1]).unwrap();
        assert_eq!(c.display_as(&cfg, Style::Chars(".#")).unwrap().to_string(), ".##\n.##\n");
        assert!(c.display_as(&cfg, Style::Chars("")).is_err());
    }

    #[test]
    fn test_mathematica() {
        let m = Matrix::from_slice(2, 2, &[1.0, 2.5, 3.0, 4.0]).unwrap();
        let out = m.display_as(&quiet(), Style::Mathematica).unwrap().with_message("m").to_string();
        assert_eq!(out, "\"m\"\n{\n{1,2.5},\n{3,4}\n}\n");
    }

    #[test]
    fn test_labeled_and_strings() {
        let mut symbols = SymbolTable::with_start(1000);
        let a = symbols.add("cat") as f64;
        let b = symbols.add("dog") as f64;
        let m = Matrix::from_slice(2, 2, &[a, 0.5, b, 2.0]).unwrap();
        let cfg = quiet();
        assert_eq!(m.display_labeled(&cfg, &symbols).unwrap().to_string(), "cat 0.5 \ndog 2 \n");
        let s = Matrix::from_slice(1, 2, &[b, a]).unwrap();
        assert_eq!(s.display_as(&cfg, Style::Strings(&symbols)).unwrap().to_string(), "dog cat \n");
        assert!(m.display_as(&cfg, Style::Strings(&symbols)).is_err());
    }
}
