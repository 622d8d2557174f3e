use crate::crc32::Crc32;
use crate::{CodecError, Result};
use std::io::{ErrorKind, Read};

use super::charset::Charset;
use super::line::LineEncoder;
use super::params::{format_begin, format_footer, format_part};
use super::types::YencHeader;

/// Largest line length accepted by the encoder
pub const MAX_LINE_LENGTH: usize = 997;

const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Begin,
    Part,
    Data,
    Done,
}

/// Lazy yEnc encoder producing the lines of one article
///
/// Yields, in order: the `=ybegin` line, the `=ypart` line for file parts,
/// the encoded data lines and the `=yend` line. Exactly `header.part_size`
/// bytes are read from the source; the CRC32 covers those raw bytes.
///
/// Lines carry no line terminator.
///
/// # Example
///
/// ```
/// use usenet_codec::yenc::{YencEncoder, YencHeader};
///
/// let data = b"Hello";
/// let header = YencHeader::single("hello.txt", data.len() as u64, 128);
/// let lines = YencEncoder::new(header, &data[..])?.collect::<Result<Vec<_>, _>>()?;
///
/// assert_eq!(lines.first().map(Vec::as_slice), Some(&b"=ybegin line=128 size=5 name=hello.txt"[..]));
/// assert!(lines.last().is_some_and(|l| l.starts_with(b"=yend size=5 crc32=")));
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
#[derive(Debug)]
pub struct YencEncoder<R> {
    header: YencHeader,
    charset: Charset,
    source: R,
    phase: Phase,
    lines: LineEncoder,
    chunk: Vec<u8>,
    pos: usize,
    crc: Crc32,
}

impl<R: Read> YencEncoder<R> {
    /// Create an encoder for `header` reading part data from `source`
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidYencData`] if the line length is not in `1..=997`.
    pub fn new(header: YencHeader, source: R) -> Result<Self> {
        Self::with_charset(header, source, Charset::default())
    }

    /// Create an encoder that writes header text with `charset`
    pub fn with_charset(header: YencHeader, source: R, charset: Charset) -> Result<Self> {
        if header.line_length == 0 || header.line_length > MAX_LINE_LENGTH {
            return Err(CodecError::InvalidYencData(format!(
                "Invalid line length: {} (must be 1-{})",
                header.line_length, MAX_LINE_LENGTH
            )));
        }

        Ok(Self {
            lines: LineEncoder::new(header.line_length),
            header,
            charset,
            source,
            phase: Phase::Begin,
            chunk: Vec::new(),
            pos: 0,
            crc: Crc32::new(),
        })
    }

    /// Header the article is encoded with
    pub fn header(&self) -> &YencHeader {
        &self.header
    }

    /// Pull the next raw chunk, at most up to the part size. Returns false at the end.
    fn refill(&mut self) -> Result<bool> {
        let remaining = self.header.part_size - self.crc.len();
        if remaining == 0 {
            return Ok(false);
        }

        let want = usize::try_from(remaining).map_or(READ_CHUNK, |r| r.min(READ_CHUNK));
        self.chunk.resize(want, 0);
        let read = loop {
            match self.source.read(&mut self.chunk) {
                Ok(n) => break n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            return Err(CodecError::InvalidYencData(format!(
                "Source ended after {} of {} bytes",
                self.crc.len(),
                self.header.part_size
            )));
        }

        self.chunk.truncate(read);
        self.crc.update(&self.chunk);
        self.pos = 0;
        Ok(true)
    }

    fn next_data_line(&mut self) -> Result<Option<Vec<u8>>> {
        loop {
            if self.pos == self.chunk.len() && !self.refill()? {
                return Ok(self.lines.finish());
            }

            let byte = self.chunk[self.pos];
            self.pos += 1;
            if let Some(line) = self.lines.push(byte) {
                return Ok(Some(line));
            }
        }
    }
}

impl<R: Read> Iterator for YencEncoder<R> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.phase {
            Phase::Begin => {
                self.phase = if self.header.is_file_part() {
                    Phase::Part
                } else {
                    Phase::Data
                };
                Some(Ok(self.charset.encode(&format_begin(&self.header))))
            }
            Phase::Part => {
                self.phase = Phase::Data;
                Some(Ok(format_part(&self.header).into_bytes()))
            }
            Phase::Data => match self.next_data_line() {
                Ok(Some(line)) => Some(Ok(line)),
                Ok(None) => {
                    self.phase = Phase::Done;
                    let crc32 = self.crc.value();
                    Some(Ok(format_footer(&self.header, crc32).into_bytes()))
                }
                Err(e) => {
                    self.phase = Phase::Done;
                    Some(Err(e))
                }
            },
            Phase::Done => None,
        }
    }
}

/// Encode `data` as the lines of one yEnc article
///
/// `data` must hold exactly `header.part_size` bytes.
pub fn encode(header: YencHeader, data: &[u8]) -> Result<Vec<Vec<u8>>> {
    YencEncoder::new(header, data)?.collect()
}

/// Encode `data` as one CRLF-terminated yEnc article body
pub fn encode_to_bytes(header: YencHeader, data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    for line in YencEncoder::new(header, data)? {
        output.extend_from_slice(&line?);
        output.extend_from_slice(b"\r\n");
    }
    Ok(output)
}
