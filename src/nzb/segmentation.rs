//! Splitting a file into Usenet articles
//!
//! A file of `L` bytes posted with a maximum part size `P` becomes
//! `N = ceil(L / P)` articles. All of them share one random file id, which
//! is embedded in every generated Message-ID.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{NzbFile, NzbSegment};
use crate::message_id::MessageId;
use crate::yenc::YencHeader;
use crate::{CodecError, Result};

/// One planned article of a segmented file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPart {
    /// Part number (1-based)
    pub number: u32,
    /// Byte offset of the part within the file
    pub offset: u64,
    /// Size of the part in bytes
    pub size: u64,
    /// Message-ID the part will be posted under
    pub message_id: MessageId,
}

impl PlannedPart {
    /// Byte range of this part within the file
    pub fn range(&self) -> std::ops::Range<u64> {
        self.offset..self.offset + self.size
    }
}

/// How one file is split into articles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentPlan {
    /// Random identifier shared by all parts
    pub file_id: String,
    /// Name of the file being posted
    pub file_name: String,
    /// Total file size in bytes
    pub file_size: u64,
    /// Subject used for every article and for the NZB entry
    pub subject: String,
    /// Parts in ascending order
    pub parts: Vec<PlannedPart>,
}

impl SegmentPlan {
    /// Number of parts
    pub fn total_parts(&self) -> u32 {
        self.parts.len() as u32
    }

    /// yEnc header for one part of this plan
    ///
    /// A file that fits in one article gets a whole-file header.
    pub fn yenc_header(&self, part: &PlannedPart, line_length: usize) -> YencHeader {
        if self.parts.len() == 1 {
            YencHeader::single(self.file_name.clone(), self.file_size, line_length)
        } else {
            YencHeader::part(
                self.file_name.clone(),
                self.file_size,
                line_length,
                part.number,
                self.total_parts(),
                part.offset,
                part.size,
            )
        }
    }

    /// NZB entry describing the planned articles
    pub fn to_nzb_file<G>(
        &self,
        poster: impl Into<String>,
        date: DateTime<Utc>,
        groups: G,
    ) -> Result<NzbFile>
    where
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let segments = self
            .parts
            .iter()
            .map(|p| NzbSegment::new(p.number, p.size, p.message_id.clone()))
            .collect::<Result<Vec<_>>>()?;

        Ok(NzbFile::new(poster, self.subject.clone(), date, groups, segments))
    }
}

/// Split a file of `file_size` bytes into parts of at most `part_size` bytes
///
/// Message-IDs follow `part{i}of{N}.{file_id}@{message_base}`. The subject
/// always shows `(1/N)`: the total is what tells readers the post is complete.
///
/// # Example
///
/// ```
/// use usenet_codec::nzb::plan_segments;
///
/// let plan = plan_segments("data.bin", 1000, 400, "example.com")?;
/// let sizes: Vec<u64> = plan.parts.iter().map(|p| p.size).collect();
/// assert_eq!(sizes, vec![400, 400, 200]);
/// assert_eq!(plan.subject, "\"data.bin\" yEnc (1/3)");
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
///
/// # Errors
///
/// Returns [`CodecError::InvalidNzbData`] for an empty file, a zero part size
/// or more than `u32::MAX` parts.
pub fn plan_segments(
    file_name: &str,
    file_size: u64,
    part_size: u64,
    message_base: &str,
) -> Result<SegmentPlan> {
    if part_size == 0 {
        return Err(CodecError::InvalidNzbData(
            "Part size must be at least 1 byte".to_string(),
        ));
    }
    if file_size == 0 {
        return Err(CodecError::InvalidNzbData(format!(
            "Cannot segment empty file {}",
            file_name
        )));
    }

    let total = u32::try_from(file_size.div_ceil(part_size)).map_err(|_| {
        CodecError::InvalidNzbData(format!(
            "{} bytes in parts of {} exceeds the maximum part count",
            file_size, part_size
        ))
    })?;

    let file_id = Uuid::new_v4().simple().to_string();

    let parts = (1..=total)
        .map(|number| {
            let offset = u64::from(number - 1) * part_size;
            let size = part_size.min(file_size - offset);
            PlannedPart {
                number,
                offset,
                size,
                message_id: MessageId::new(format!(
                    "part{}of{}.{}@{}",
                    number, total, file_id, message_base
                )),
            }
        })
        .collect();

    Ok(SegmentPlan {
        subject: format!("\"{}\" yEnc (1/{})", file_name, total),
        file_id,
        file_name: file_name.to_string(),
        file_size,
        parts,
    })
}

/// Extract a display file name from a free-text subject
///
/// Prefers a double-quoted substring. Otherwise takes everything before the
/// last `" ("` and strips a trailing `" yEnc"` (any case) and whitespace.
/// A name that itself contains `" ("` before the counter is cut short.
pub fn file_name_from_subject(subject: &str) -> String {
    if let Some((_, rest)) = subject.split_once('"')
        && let Some((quoted, _)) = rest.split_once('"')
    {
        return quoted.to_string();
    }

    let name = subject
        .rfind(" (")
        .map_or(subject, |idx| &subject[..idx])
        .trim();

    let suffix_start = name.len().saturating_sub(5);
    let name = match name.get(suffix_start..) {
        Some(suffix) if suffix.eq_ignore_ascii_case(" yenc") => &name[..suffix_start],
        _ => name,
    };

    name.trim().to_string()
}
