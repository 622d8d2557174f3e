use crate::Result;
use tracing::{debug, warn};

use super::charset::Charset;
use super::line::{decoded, strip_line_ending};
use super::params::{is_footer, parse_footer, read_header};
use super::types::{YencFooter, YencHeader};

/// Most bytes reserved up front, whatever size the header claims
const INITIAL_RESERVE: usize = 64 * 1024;

/// A fully decoded yEnc article
///
/// Built by [`decode_article`]; immutable afterwards. Use
/// [`validate`](super::validate) to check the data against the footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YencArticle {
    header: YencHeader,
    footer: Option<YencFooter>,
    data: Vec<u8>,
}

impl YencArticle {
    /// Parsed header information
    pub fn header(&self) -> &YencHeader {
        &self.header
    }

    /// Trailer information, `None` if the article had no `=yend` line
    pub fn footer(&self) -> Option<&YencFooter> {
        self.footer.as_ref()
    }

    /// Decoded binary data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Take ownership of the decoded data
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

/// Decode a yEnc article from its body lines
///
/// Lines may carry a trailing CRLF. Header text is read as Latin-1.
///
/// # Example
///
/// ```
/// use usenet_codec::yenc::decode_article;
///
/// let lines: [&[u8]; 3] = [
///     b"=ybegin line=128 size=4 name=test.txt",
///     &[126, 143, 157, 158],
///     b"=yend size=4 crc32=784dd132",
/// ];
/// let article = decode_article(lines)?;
/// assert_eq!(article.data(), b"Test");
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
pub fn decode_article<I>(lines: I) -> Result<YencArticle>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    decode_article_with(lines, Charset::default())
}

/// Decode a yEnc article, reading header text with `charset`
///
/// Decoded data is bounded by the header's part size; any excess is dropped
/// and left for the validator to report. All lines after `=yend` are consumed.
///
/// # Errors
///
/// Fails only on structural header problems (see [`read_header`]).
pub fn decode_article_with<I>(lines: I, charset: Charset) -> Result<YencArticle>
where
    I: IntoIterator,
    I::Item: AsRef<[u8]>,
{
    let mut lines = lines.into_iter();
    let header = read_header(&mut lines, charset)?;

    let capacity = usize::try_from(header.part_size).unwrap_or(usize::MAX);
    let mut data = Vec::with_capacity(capacity.min(INITIAL_RESERVE));
    let mut footer = None;
    let mut overflow = 0usize;

    while let Some(line) = lines.next() {
        let line = strip_line_ending(line.as_ref());

        if is_footer(line) {
            footer = Some(parse_footer(&charset.decode(line)));
            let drained = lines.by_ref().count();
            if drained > 0 {
                debug!("Drained {} lines after =yend", drained);
            }
            break;
        }

        let remaining = capacity - data.len();
        let mut bytes = decoded(line);
        data.extend(bytes.by_ref().take(remaining));
        overflow += bytes.count();
    }

    if overflow > 0 {
        warn!(
            "yEnc data for {} exceeds part size {}; dropped {} bytes",
            header.file_name, header.part_size, overflow
        );
    }
    if footer.is_none() {
        debug!("yEnc article for {} has no =yend line", header.file_name);
    }

    Ok(YencArticle {
        header,
        footer,
        data,
    })
}
