//! Posting and downloading files through caller-supplied article transports
//!
//! The NNTP session itself lives outside this crate. [`ArticlePoster`] and
//! [`ArticleFetcher`] are the two seams: implement them over a connection
//! (or an in-memory store) and [`post_file`]/[`download_file`] take care of
//! segmentation, yEnc encoding/decoding, validation and reassembly.

use chrono::Utc;
use tracing::{debug, warn};

use crate::config::PostingConfig;
use crate::message_id::MessageId;
use crate::nzb::{NzbFile, plan_segments};
use crate::yenc::{self, ValidationResult};
use crate::{CodecError, Result};

/// Source of article bodies, addressed by Message-ID
pub trait ArticleFetcher {
    /// Body lines of one article, without line terminators
    type Body: IntoIterator<Item = Vec<u8>>;

    /// Retrieve the body of the article with `message_id`
    ///
    /// Implementations report transport problems as
    /// [`CodecError::Transport`](crate::CodecError::Transport).
    fn fetch_article_body(&mut self, message_id: &MessageId) -> Result<Self::Body>;
}

/// Sink for complete articles
pub trait ArticlePoster {
    /// Post one article given as header lines, an empty line and body lines
    fn post_article(&mut self, article: &[Vec<u8>]) -> Result<()>;
}

/// Build the lines of an article: header block, blank line, body
pub fn compose_article(
    config: &PostingConfig,
    subject: &str,
    message_id: &MessageId,
    body: Vec<Vec<u8>>,
) -> Vec<Vec<u8>> {
    let mut article = Vec::with_capacity(body.len() + 5);
    article.push(format!("From: {}", config.poster).into_bytes());
    article.push(format!("Newsgroups: {}", config.groups.join(",")).into_bytes());
    article.push(format!("Subject: {}", subject).into_bytes());
    article.push(format!("Message-ID: {}", message_id.to_wire()).into_bytes());
    article.push(Vec::new());
    article.extend(body);
    article
}

/// Split `data` into articles, post each one and return the NZB entry
///
/// # Errors
///
/// Fails on an invalid configuration, an empty file, or the first error
/// reported by `poster`.
pub fn post_file<P: ArticlePoster + ?Sized>(
    poster: &mut P,
    config: &PostingConfig,
    file_name: &str,
    data: &[u8],
) -> Result<NzbFile> {
    config.validate()?;

    let plan = plan_segments(
        file_name,
        data.len() as u64,
        config.part_size,
        &config.message_base,
    )?;

    for part in &plan.parts {
        let header = plan.yenc_header(part, config.line_length);
        let range = part.range();
        let body = yenc::encode(header, &data[range.start as usize..range.end as usize])?;
        let article = compose_article(config, &plan.subject, &part.message_id, body);

        poster.post_article(&article)?;
        debug!(
            "Posted part {}/{} of {} as {}",
            part.number,
            plan.total_parts(),
            file_name,
            part.message_id
        );
    }

    plan.to_nzb_file(config.poster.as_str(), Utc::now(), config.groups.iter().cloned())
}

/// Result of downloading one NZB file entry
#[derive(Debug, Clone)]
pub struct DownloadedFile {
    /// Reassembled file contents
    pub data: Vec<u8>,
    /// Validation findings per segment number
    pub results: Vec<(u32, ValidationResult)>,
}

impl DownloadedFile {
    /// Whether every segment validated cleanly
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, r)| r.is_valid())
    }
}

/// Fetch, decode and reassemble every segment of `file`
///
/// Segments are processed in order. Each decoded part is written at the
/// offset its yEnc `=ypart` line declares, or at the NZB segment offset for
/// single-part articles. Validation findings are collected, not raised.
///
/// # Errors
///
/// Fails on the first fetch error, on a structurally invalid yEnc article,
/// or when a part would land past the size the NZB entry declares.
pub fn download_file<F: ArticleFetcher + ?Sized>(
    fetcher: &mut F,
    file: &NzbFile,
) -> Result<DownloadedFile> {
    let mut data = Vec::new();
    let mut file_size = None;
    let mut results = Vec::with_capacity(file.segments().len());

    for segment in file.segments() {
        let body = fetcher.fetch_article_body(segment.message_id())?;
        let article = yenc::decode_article(body)?;

        let result = yenc::validate(&article);
        if !result.is_valid() {
            warn!(
                "Segment {} of {} failed validation: {}",
                segment.number(),
                file.file_name(),
                result
            );
        }

        let header = article.header();
        file_size.get_or_insert(header.file_size);
        let offset = if header.is_file_part() {
            header.part_offset
        } else {
            segment.offset()
        };

        let bytes = article.data();
        let (start, end) = placement(offset, bytes.len(), file.size()).ok_or_else(|| {
            CodecError::InvalidYencData(format!(
                "Segment {} of {} places {} bytes at offset {}, beyond the file size {}",
                segment.number(),
                file.file_name(),
                bytes.len(),
                offset,
                file.size()
            ))
        })?;
        if data.len() < end {
            data.resize(end, 0);
        }
        data[start..end].copy_from_slice(bytes);

        debug!(
            "Decoded segment {} of {}: {} bytes at offset {}",
            segment.number(),
            file.file_name(),
            bytes.len(),
            offset
        );
        results.push((segment.number(), result));
    }

    if let Some(size) = file_size
        && (data.len() as u64) < size
    {
        warn!(
            "{} reassembled to {} of {} bytes",
            file.file_name(),
            data.len(),
            size
        );
    }

    Ok(DownloadedFile { data, results })
}

/// Buffer range for `len` bytes at `offset`, if it stays within `limit`
fn placement(offset: u64, len: usize, limit: u64) -> Option<(usize, usize)> {
    let end = offset.checked_add(u64::try_from(len).ok()?)?;
    if end > limit {
        return None;
    }
    Some((usize::try_from(offset).ok()?, usize::try_from(end).ok()?))
}
