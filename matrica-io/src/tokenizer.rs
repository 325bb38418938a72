//! Whitespace tokenizer over a byte buffer
//!
//! Tracks the current line so parse errors can point at it. Raw bytes can
//! be taken directly for binary image payloads that follow a text header.

use std::io::Read;
use matrica_core::MatrixError;
use crate::error::IoError;

pub struct Tokenizer {
    bytes: Vec<u8>,
    pos: usize,
    line: usize,
}

impl Tokenizer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes, pos: 0, line: 1 }
    }

    /// Slurp the whole reader
    pub fn from_reader(mut reader: impl Read) -> Result<Self, IoError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self::new(bytes))
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn advance(&mut self) -> Option<u8> {
        let b = *self.bytes.get(self.pos)?;
        self.pos += 1;
        if b == b'\n' {
            self.line += 1;
        }
        Some(b)
    }

    /// Next whitespace-delimited word, or `UnexpectedEof`
    pub fn word(&mut self, op: &'static str) -> Result<String, MatrixError> {
        while self.bytes.get(self.pos).is_some_and(u8::is_ascii_whitespace) {
            self.advance();
        }
        let start = self.pos;
        while self.bytes.get(self.pos).is_some_and(|b| !b.is_ascii_whitespace()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(MatrixError::UnexpectedEof { op });
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    /// Next word, skipping any word that starts with '#' and the rest of its line
    pub fn word_skipping_comments(&mut self, op: &'static str) -> Result<String, MatrixError> {
        loop {
            let w = self.word(op)?;
            if !w.starts_with('#') {
                return Ok(w);
            }
            self.skip_line();
        }
    }

    pub fn skip_line(&mut self) {
        while let Some(b) = self.advance() {
            if b == b'\n' {
                break;
            }
        }
    }

    fn parse_word<T: std::str::FromStr>(&self, w: String, op: &'static str, what: &str) -> Result<T, MatrixError> {
        w.parse().map_err(|_| MatrixError::parse(self.line, format!("{}: invalid {} \"{}\"", op, what, w)))
    }

    pub fn number<T: std::str::FromStr>(&mut self, op: &'static str, what: &str) -> Result<T, MatrixError> {
        let w = self.word(op)?;
        self.parse_word(w, op, what)
    }

    /// Like `number`, for headers where comment lines may sit between fields
    pub fn number_skipping_comments<T: std::str::FromStr>(
        &mut self,
        op: &'static str,
        what: &str,
    ) -> Result<T, MatrixError> {
        let w = self.word_skipping_comments(op)?;
        self.parse_word(w, op, what)
    }

    pub fn f64(&mut self, op: &'static str) -> Result<f64, MatrixError> {
        self.number(op, "number")
    }

    pub fn usize(&mut self, op: &'static str, what: &str) -> Result<usize, MatrixError> {
        self.number(op, what)
    }

    /// Next raw byte
    pub fn byte(&mut self, op: &'static str) -> Result<u8, MatrixError> {
        self.advance().ok_or(MatrixError::UnexpectedEof { op })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_and_lines() {
        let mut t = Tokenizer::new(b"  2 3\n1.5 x\n".to_vec());
        assert_eq!(t.usize("t", "rows").unwrap(), 2);
        assert_eq!(t.word("t").unwrap(), "3");
        assert_eq!(t.f64("t").unwrap(), 1.5);
        let err = t.f64("t").unwrap_err();
        assert!(matches!(err, MatrixError::Parse { line: 2, .. }));
        assert!(matches!(t.word("t"), Err(MatrixError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_comments_and_bytes() {
        let mut t = Tokenizer::new(b"P5\n# a comment 7\n# more\n4 \x01".to_vec());
        assert_eq!(t.word("t").unwrap(), "P5");
        assert_eq!(t.word_skipping_comments("t").unwrap(), "4");
        assert_eq!(t.line(), 4);
        assert_eq!(t.byte("t").unwrap(), b' ');
        assert_eq!(t.byte("t").unwrap(), 1);
        assert!(t.byte("t").is_err());
    }

    #[test]
    fn test_numbers_between_comments() {
        let mut t = Tokenizer::new(b"3 # width\n# height next\n2\n#x\n".to_vec());
        assert_eq!(t.number_skipping_comments::<usize>("t", "width").unwrap(), 3);
        assert_eq!(t.number_skipping_comments::<usize>("t", "height").unwrap(), 2);
        assert_eq!(t.line(), 3);
        let err = t.number_skipping_comments::<usize>("t", "depth").unwrap_err();
        assert!(matches!(err, MatrixError::UnexpectedEof { .. }));

        let mut t = Tokenizer::new(b"# c\nwide".to_vec());
        let err = t.number_skipping_comments::<usize>("t", "width").unwrap_err();
        assert!(matches!(err, MatrixError::Parse { line: 2, .. }));
    }
}
