use crate::Result;
use tracing::debug;

use super::charset::Charset;
use super::line::{decode_line, strip_line_ending};
use super::params::{is_footer, parse_footer, read_header};
use super::types::{YencFooter, YencHeader};

/// Lazily decoded yEnc article
///
/// The header is read when the stream is created; each call to `next`
/// decodes one more data line. At `=yend` the footer is parsed, the rest of
/// the input is drained and the line source is dropped. Dropping the stream
/// early drops the source as well.
///
/// Forward-only and single-pass: once exhausted the stream stays empty.
///
/// # Example
///
/// ```
/// use usenet_codec::yenc::YencStream;
///
/// let lines: [&[u8]; 4] = [
///     b"=ybegin line=128 size=2 name=a.bin",
///     b"k",
///     b"l",
///     b"=yend size=2",
/// ];
/// let mut stream = YencStream::new(lines)?;
/// assert_eq!(stream.header().file_name, "a.bin");
///
/// let data: Vec<u8> = stream.by_ref().flatten().collect();
/// assert_eq!(data, b"AB");
/// assert_eq!(stream.footer().map(|f| f.part_size), Some(2));
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
#[derive(Debug)]
pub struct YencStream<I> {
    header: YencHeader,
    footer: Option<YencFooter>,
    charset: Charset,
    source: Option<I>,
}

impl<I> YencStream<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    /// Start decoding `lines`, reading the header immediately
    ///
    /// # Errors
    ///
    /// Fails on a missing `=ybegin` or required `=ypart` line.
    pub fn new<L>(lines: L) -> Result<Self>
    where
        L: IntoIterator<IntoIter = I>,
    {
        Self::with_charset(lines, Charset::default())
    }

    /// Start decoding `lines`, reading header text with `charset`
    pub fn with_charset<L>(lines: L, charset: Charset) -> Result<Self>
    where
        L: IntoIterator<IntoIter = I>,
    {
        let mut source = lines.into_iter();
        let header = read_header(&mut source, charset)?;

        Ok(Self {
            header,
            footer: None,
            charset,
            source: Some(source),
        })
    }

    /// Parsed header information
    pub fn header(&self) -> &YencHeader {
        &self.header
    }

    /// Trailer information, available once the `=yend` line has been reached
    pub fn footer(&self) -> Option<&YencFooter> {
        self.footer.as_ref()
    }

    /// Whether the line source has been exhausted and released
    pub fn is_finished(&self) -> bool {
        self.source.is_none()
    }

    fn finish(&mut self, footer_line: Option<&[u8]>) {
        if let Some(line) = footer_line {
            self.footer = Some(parse_footer(&self.charset.decode(line)));
        }
        if let Some(source) = self.source.take() {
            let drained = source.count();
            if drained > 0 {
                debug!("Drained {} lines after =yend", drained);
            }
        }
    }
}

impl<I> Iterator for YencStream<I>
where
    I: Iterator,
    I::Item: AsRef<[u8]>,
{
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        let source = self.source.as_mut()?;

        let Some(raw) = source.next() else {
            self.finish(None);
            return None;
        };
        let line = strip_line_ending(raw.as_ref());

        if is_footer(line) {
            self.finish(Some(line));
            return None;
        }

        let mut chunk = Vec::with_capacity(line.len());
        decode_line(line, &mut chunk);
        Some(chunk)
    }
}
