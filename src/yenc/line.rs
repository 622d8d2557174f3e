//! Per-line yEnc byte transform
//!
//! yEnc encoding: output = (input + 42) mod 256
//! yEnc decoding: output = (input - 42) mod 256
//!
//! Escape sequence: `=` followed by (output + 64) mod 256. Decoding an escaped
//! byte therefore subtracts 106.

/// Critical output values that are escaped wherever they appear
fn is_critical_byte(val: u8) -> bool {
    matches!(
        val,
        0x00 |  // NUL
        0x0A |  // LF
        0x0D |  // CR
        0x3D // '='
    )
}

/// Whether an encoded value must be escaped at `column` of a line
///
/// Besides the critical bytes, `.` is escaped at the start of a line and
/// TAB/SPACE at the start or the last column of a line.
pub fn needs_escape(val: u8, column: usize, line_length: usize) -> bool {
    if is_critical_byte(val) {
        return true;
    }
    match val {
        b'.' => column == 0,
        b'\t' | b' ' => column == 0 || column + 1 == line_length,
        _ => false,
    }
}

/// Iterator over the decoded bytes of one encoded line
///
/// A lone `=` at the end of the line is consumed without output.
#[derive(Debug, Clone)]
pub struct Decoded<'a> {
    bytes: std::slice::Iter<'a, u8>,
}

impl Iterator for Decoded<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        let byte = *self.bytes.next()?;
        if byte == b'=' {
            let escaped = *self.bytes.next()?;
            Some(escaped.wrapping_sub(106))
        } else {
            Some(byte.wrapping_sub(42))
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.bytes.len();
        (remaining / 2, Some(remaining))
    }
}

/// Decode one encoded line lazily
pub fn decoded(line: &[u8]) -> Decoded<'_> {
    Decoded { bytes: line.iter() }
}

/// Decode one encoded line, appending to `output`
pub fn decode_line(line: &[u8], output: &mut Vec<u8>) {
    output.extend(decoded(line));
}

/// Remove a trailing CRLF, LF or CR from a raw line
pub(crate) fn strip_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}

/// Encode one raw byte onto the line being built
///
/// The column is the current length of `line`; an escaped byte takes two columns.
pub fn encode_byte(byte: u8, line_length: usize, line: &mut Vec<u8>) {
    let val = byte.wrapping_add(42);
    if needs_escape(val, line.len(), line_length) {
        line.push(b'=');
        line.push(val.wrapping_add(64));
    } else {
        line.push(val);
    }
}

/// Splits a raw byte stream into encoded lines of `line_length` columns
///
/// A line is emitted once it holds at least `line_length` encoded bytes, so an
/// escape at the last column yields a line one byte longer.
#[derive(Debug, Clone)]
pub struct LineEncoder {
    line_length: usize,
    line: Vec<u8>,
}

impl LineEncoder {
    /// Create an encoder for lines of `line_length` columns
    pub fn new(line_length: usize) -> Self {
        Self {
            line_length,
            line: Vec::with_capacity(line_length + 1),
        }
    }

    /// Encode one byte, returning the line it completed, if any
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8>> {
        encode_byte(byte, self.line_length, &mut self.line);
        if self.line.len() >= self.line_length {
            let full = std::mem::replace(&mut self.line, Vec::with_capacity(self.line_length + 1));
            return Some(full);
        }
        None
    }

    /// Flush the trailing short line, if any
    pub fn finish(&mut self) -> Option<Vec<u8>> {
        if self.line.is_empty() {
            None
        } else {
            Some(std::mem::take(&mut self.line))
        }
    }
}

/// Encode a whole buffer into data lines
pub fn encode_lines(data: &[u8], line_length: usize) -> Vec<Vec<u8>> {
    let mut encoder = LineEncoder::new(line_length);
    let mut lines: Vec<Vec<u8>> = data.iter().filter_map(|&b| encoder.push(b)).collect();
    lines.extend(encoder.finish());
    lines
}
