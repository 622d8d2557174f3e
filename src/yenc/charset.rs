//! Character encodings for yEnc text lines
//!
//! yEnc works on raw bytes. When lines arrive as text, each character has to
//! map back to exactly one byte, which only a single-byte encoding like
//! Latin-1 guarantees. UTF-8 is offered for header text only.

/// Mapping between yEnc line bytes and text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Charset {
    /// ISO-8859-1: byte `n` is code point `U+00nn`
    #[default]
    Latin1,
    /// UTF-8, lossy on decode. Corrupts encoded data lines; use for header text only.
    Utf8,
}

impl Charset {
    /// Turn raw line bytes into text
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Charset::Latin1 => bytes.iter().map(|&b| char::from(b)).collect(),
            Charset::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
        }
    }

    /// Turn text into raw line bytes
    ///
    /// Latin-1 replaces characters above `U+00FF` with `?`.
    pub fn encode(self, text: &str) -> Vec<u8> {
        match self {
            Charset::Latin1 => text
                .chars()
                .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
                .collect(),
            Charset::Utf8 => text.as_bytes().to_vec(),
        }
    }

    /// Adapt a sequence of text lines into byte lines for the decoders
    pub fn encode_lines<I>(self, lines: I) -> impl Iterator<Item = Vec<u8>>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        lines.into_iter().map(move |line| self.encode(line.as_ref()))
    }
}
