//! PGM (Portable Gray Map) format support
//!
//! Reads binary (P5) and ASCII (P2) graymaps with a maximum value of at
//! most 255, and writes binary P5. Header comments (`#` to end of line)
//! are accepted anywhere whitespace is. Other PNM variants (PBM, PPM,
//! PAM) and 16-bit graymaps are rejected as unsupported.

use crate::{IoError, IoResult};
use log::debug;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use streamscale_core::GrayImage;

/// Read a PGM image from a reader positioned at the `P5`/`P2` magic.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] for other PNM variants or a
/// maximum value above 255, and [`IoError::InvalidData`] for a malformed
/// header, a truncated raster, or a sample above the declared maximum.
pub fn read_pgm<R: Read>(mut reader: R) -> IoResult<GrayImage> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data)?;
    let mut cur = Cursor::new(&data);

    let magic = cur.token()?;
    let binary = match magic {
        b"P5" => true,
        b"P2" => false,
        b"P1" | b"P3" | b"P4" | b"P6" | b"P7" => {
            return Err(IoError::UnsupportedFormat(format!(
                "PNM variant {} (only P2/P5 graymaps)",
                String::from_utf8_lossy(magic)
            )));
        }
        _ => return Err(IoError::InvalidData("not a PNM file".to_string())),
    };

    let width = cur.number("width")?;
    let height = cur.number("height")?;
    let maxval = cur.number("maxval")?;
    if maxval == 0 || maxval > 255 {
        return Err(IoError::UnsupportedFormat(format!(
            "maxval {maxval} (only 1..=255)"
        )));
    }
    debug!(
        "pgm: {}x{} maxval {} ({})",
        width,
        height,
        maxval,
        if binary { "P5" } else { "P2" }
    );

    let len = (width as usize) * (height as usize);
    let pixels = if binary {
        cur.raster(len)?.to_vec()
    } else {
        (0..len)
            .map(|_| cur.number("sample").and_then(|v| check_sample(v, maxval)))
            .collect::<IoResult<Vec<u8>>>()?
    };
    if binary {
        for &p in &pixels {
            check_sample(u32::from(p), maxval)?;
        }
    }

    Ok(GrayImage::from_vec(width, height, pixels)?)
}

fn check_sample(value: u32, maxval: u32) -> IoResult<u8> {
    if value > maxval {
        return Err(IoError::InvalidData(format!(
            "sample {value} exceeds maxval {maxval}"
        )));
    }
    Ok(value as u8)
}

/// Write an image as binary PGM (P5, maxval 255).
pub fn write_pgm<W: Write>(image: &GrayImage, writer: W) -> IoResult<()> {
    let mut writer = BufWriter::new(writer);
    write!(writer, "P5\n{} {}\n255\n", image.width(), image.height())?;
    writer.write_all(image.as_slice())?;
    writer.flush()?;
    Ok(())
}

/// Read a PGM file.
pub fn read_pgm_file<P: AsRef<Path>>(path: P) -> IoResult<GrayImage> {
    read_pgm(BufReader::new(File::open(path)?))
}

/// Write a PGM file.
pub fn write_pgm_file<P: AsRef<Path>>(image: &GrayImage, path: P) -> IoResult<()> {
    write_pgm(image, File::create(path)?)
}

/// Encode an image as a P5 byte buffer.
pub fn write_pgm_mem(image: &GrayImage) -> IoResult<Vec<u8>> {
    let mut buf = Vec::new();
    write_pgm(image, &mut buf)?;
    Ok(buf)
}

// ============================================================================
// Header tokenizer
// ============================================================================

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    fn skip_space(&mut self) {
        while let Some(&b) = self.data.get(self.pos) {
            if b == b'#' {
                while let Some(&c) = self.data.get(self.pos) {
                    self.pos += 1;
                    if c == b'\n' || c == b'\r' {
                        break;
                    }
                }
            } else if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn token(&mut self) -> IoResult<&'a [u8]> {
        self.skip_space();
        let start = self.pos;
        while let Some(&b) = self.data.get(self.pos) {
            if b.is_ascii_whitespace() || b == b'#' {
                break;
            }
            self.pos += 1;
        }
        if start == self.pos {
            return Err(IoError::InvalidData("unexpected end of header".to_string()));
        }
        Ok(&self.data[start..self.pos])
    }

    fn number(&mut self, what: &str) -> IoResult<u32> {
        let tok = self.token()?;
        std::str::from_utf8(tok)
            .ok()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| {
                IoError::InvalidData(format!(
                    "bad {what}: {}",
                    String::from_utf8_lossy(tok)
                ))
            })
    }

    /// The binary raster: one whitespace byte after the header, then `len`
    /// bytes.
    fn raster(&mut self, len: usize) -> IoResult<&'a [u8]> {
        match self.data.get(self.pos) {
            Some(b) if b.is_ascii_whitespace() => self.pos += 1,
            _ => return Err(IoError::InvalidData("missing raster separator".to_string())),
        }
        let end = self.pos + len;
        if end > self.data.len() {
            return Err(IoError::InvalidData(format!(
                "raster truncated: {} of {} bytes",
                self.data.len() - self.pos,
                len
            )));
        }
        Ok(&self.data[self.pos..end])
    }
}
