//! Netpbm raster images (8 bit PGM and PPM)
//!
//! Gray images map one pixel to one cell. Color images map each pixel to
//! three consecutive cells (R, G, B), so an image matrix has `width * 3`
//! columns. Readers accept the ASCII (P2, P3) and binary (P5, P6) variants;
//! writers always emit ASCII.

use std::io::{Read, Write};
use matrica_core::MatrixError;
use matrica_matrix::Matrix;
use crate::error::IoError;
use crate::text::assemble;
use crate::tokenizer::Tokenizer;

/// Largest channel value supported
pub const MAX_PIXEL: usize = 255;

/// Which kind of image was read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Gray,
    Color,
}

impl ImageKind {
    /// Cells per pixel
    pub fn channels(self) -> usize {
        match self {
            ImageKind::Gray => 1,
            ImageKind::Color => 3,
        }
    }
}

/// Clamp a cell to a channel value, truncating toward zero first
pub fn byte_value(x: f64) -> u8 {
    (x as i64).clamp(0, MAX_PIXEL as i64) as u8
}

/// Read any of P2, P3, P5 or P6
pub fn read_image(reader: impl Read) -> Result<(Matrix, ImageKind), IoError> {
    read_netpbm(reader, "2356", "read_image")
}

/// Read a gray image (P2 or P5)
pub fn read_pgm(reader: impl Read) -> Result<Matrix, IoError> {
    Ok(read_netpbm(reader, "25", "read_pgm")?.0)
}

/// Read a color image (P3 or P6)
pub fn read_ppm(reader: impl Read) -> Result<Matrix, IoError> {
    Ok(read_netpbm(reader, "36", "read_ppm")?.0)
}

fn read_netpbm(reader: impl Read, accepted: &str, op: &'static str) -> Result<(Matrix, ImageKind), IoError> {
    let mut tok = Tokenizer::from_reader(reader)?;

    let magic = tok.word(op)?;
    let variant = match magic.as_bytes() {
        [b'P', v] if accepted.as_bytes().contains(v) => *v,
        _ => {
            let expected = accepted.chars().map(|v| format!("P{}", v)).collect::<Vec<_>>().join(", ");
            return Err(IoError::BadMagic { expected, found: magic.clone() });
        }
    };
    let kind = if matches!(variant, b'3' | b'6') { ImageKind::Color } else { ImageKind::Gray };
    let binary = matches!(variant, b'5' | b'6');

    let width: usize = tok.number_skipping_comments(op, "image width")?;
    let height: usize = tok.number_skipping_comments(op, "image height")?;
    let max: usize = tok.number_skipping_comments(op, "maximum pixel value")?;
    if max > MAX_PIXEL {
        return Err(IoError::Depth(max));
    }

    let cols = width.checked_mul(kind.channels()).ok_or_else(|| {
        MatrixError::parse(tok.line(), format!("{}: image width {} is too large", op, width))
    })?;
    if binary {
        // exactly one whitespace byte separates the header from the payload
        tok.byte(op)?;
    }
    let mut data = Vec::new();
    for _ in 0..height {
        let mut row = Vec::new();
        for _ in 0..cols {
            let value = if binary { tok.byte(op)? as usize } else { tok.usize(op, "pixel value")? };
            row.push(value as f64);
        }
        data.push(row);
    }
    let m = assemble(data, cols)?;
    tracing::debug!(magic = %magic, width, height, ?kind, "read image");
    Ok((m, kind))
}

/// Write an ASCII gray image (P2)
pub fn write_pgm(m: &Matrix, w: impl Write, comment: Option<&str>) -> Result<(), IoError> {
    m.check_defined("write_pgm")?;
    write_netpbm(m, w, comment, ImageKind::Gray)
}

/// Write an ASCII color image (P3); the column count must be a multiple of 3
pub fn write_ppm(m: &Matrix, w: impl Write, comment: Option<&str>) -> Result<(), IoError> {
    m.check_defined("write_ppm")?;
    if m.cols() % 3 != 0 {
        return Err(MatrixError::shape(
            "write_ppm",
            m.name(),
            format!("number of columns {} is not divisible by three", m.cols()),
        )
        .into());
    }
    write_netpbm(m, w, comment, ImageKind::Color)
}

fn write_netpbm(m: &Matrix, mut w: impl Write, comment: Option<&str>, kind: ImageKind) -> Result<(), IoError> {
    let (magic, depth) = match kind {
        ImageKind::Gray => ("P2", "gray scale"),
        ImageKind::Color => ("P3", "color"),
    };
    writeln!(w, "{}", magic)?;
    if !m.name().is_empty() {
        writeln!(w, "# Name: {}", m.name())?;
    }
    if let Some(comment) = comment.filter(|c| !c.is_empty()) {
        writeln!(w, "# {}", comment)?;
    }
    writeln!(w, "# 8 bit {}", depth)?;
    // width before height
    writeln!(w, "{} {}", m.cols() / kind.channels(), m.rows())?;
    writeln!(w, "{}", MAX_PIXEL)?;
    for row in m.iter_rows() {
        let line = row.iter().map(|&x| byte_value(x).to_string()).collect::<Vec<_>>().join(" ");
        writeln!(w, "{}", line)?;
    }
    w.flush()?;
    tracing::debug!(name = m.name(), magic, "wrote image");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_value() {
        assert_eq!(byte_value(-3.0), 0);
        assert_eq!(byte_value(12.9), 12);
        assert_eq!(byte_value(255.0), 255);
        assert_eq!(byte_value(1e9), 255);
    }

    #[test]
    fn test_read_ascii_gray_with_comments() {
        let text = "P2\n# made by hand\n# second line\n3 2\n255\n0 10 20\n30 40 255\n";
        let (m, kind) = read_image(text.as_bytes()).unwrap();
        assert_eq!(kind, ImageKind::Gray);
        assert_eq!(m.to_rows(), vec![vec![0.0, 10.0, 20.0], vec![30.0, 40.0, 255.0]]);
    }

    #[test]
    fn test_comments_between_header_fields() {
        let (m, kind) = read_image("P2\n2 1\n# made by gimp\n255\n1 2\n".as_bytes()).unwrap();
        assert_eq!(kind, ImageKind::Gray);
        assert_eq!(m.to_rows(), vec![vec![1.0, 2.0]]);

        let text = "P3 # rgb\n1\n# height\n1 # depth follows\n255\n7 8 9\n";
        assert_eq!(read_ppm(text.as_bytes()).unwrap().row(0), &[7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_header_larger_than_payload() {
        let err = read_pgm("P2 4000000000 4000000000 255 1 2".as_bytes()).unwrap_err();
        assert!(matches!(err.as_matrix_error(), Some(MatrixError::UnexpectedEof { .. })));
        let err = read_ppm("P3 18446744073709551615 1 255 1".as_bytes()).unwrap_err();
        assert!(matches!(err.as_matrix_error(), Some(MatrixError::Parse { .. })));
    }

    #[test]
    fn test_read_binary_color() {
        let mut bytes = b"P6\n2 1\n255\n".to_vec();
        bytes.extend_from_slice(&[1, 2, 3, 10, 32, 255]);
        let (m, kind) = read_image(bytes.as_slice()).unwrap();
        assert_eq!(kind, ImageKind::Color);
        assert_eq!((m.rows(), m.cols()), (1, 6));
        // a payload byte that looks like whitespace is still a pixel
        assert_eq!(m.row(0), &[1.0, 2.0, 3.0, 10.0, 32.0, 255.0]);
    }

    #[test]
    fn test_read_binary_gray_truncated() {
        let bytes = b"P5 2 2 255\n\x01\x02\x03".to_vec();
        let err = read_pgm(bytes.as_slice()).unwrap_err();
        assert!(matches!(err.as_matrix_error(), Some(MatrixError::UnexpectedEof { .. })));
    }

    #[test]
    fn test_magic_and_depth() {
        assert!(matches!(read_pgm("P3 1 1 255 1 2 3".as_bytes()), Err(IoError::BadMagic { .. })));
        assert!(matches!(read_ppm("P2 1 1 255 1".as_bytes()), Err(IoError::BadMagic { .. })));
        assert!(matches!(read_image("P7 1 1 255 1".as_bytes()), Err(IoError::BadMagic { .. })));
        assert!(matches!(read_image("P2 1 1 65535 1".as_bytes()), Err(IoError::Depth(65535))));
        assert_eq!(read_ppm("P3 1 1 255 4 5 6".as_bytes()).unwrap().row(0), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_write_pgm() {
        let m = Matrix::from_slice(2, 2, &[-5.0, 12.7, 300.0, 128.0]).unwrap().with_name("pic");
        let mut out = Vec::new();
        write_pgm(&m, &mut out, Some("fade")).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text, "P2\n# Name: pic\n# fade\n# 8 bit gray scale\n2 2\n255\n0 12\n255 128\n");
        assert_eq!(read_pgm(text.as_bytes()).unwrap().to_rows(), vec![vec![0.0, 12.0], vec![255.0, 128.0]]);
    }

    #[test]
    fn test_write_ppm() {
        let m = Matrix::from_ints(1, 6, &[1, 2, 3, 4, 5, 6]).unwrap();
        let mut out = Vec::new();
        write_ppm(&m, &mut out, None).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "P3\n# 8 bit color\n2 1\n255\n1 2 3 4 5 6\n");

        let bad = Matrix::from_ints(1, 4, &[1, 2, 3, 4]).unwrap();
        let err = write_ppm(&bad, &mut Vec::new(), None).unwrap_err();
        assert!(matches!(err.as_matrix_error(), Some(MatrixError::Shape { .. })));
        assert!(write_pgm(&Matrix::with_size(1, 1), &mut Vec::new(), None).is_err());
    }
}
