use crate::message_id::MessageId;
use crate::{CodecError, Result};
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::segmentation::file_name_from_subject;

/// A segment (one article) of a file
///
/// The byte offset is derived from the other segments of the file and is
/// not stored in NZB documents; it is filled in when the segment is added
/// to an [`NzbFile`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NzbSegment {
    number: u32,
    offset: u64,
    size: u64,
    message_id: MessageId,
}

impl NzbSegment {
    /// Create a segment
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidNzbData`] if `number` is 0 or `size` is 0.
    pub fn new(number: u32, size: u64, message_id: impl Into<MessageId>) -> Result<Self> {
        if number == 0 {
            return Err(CodecError::InvalidNzbData(
                "Segment number must be at least 1".to_string(),
            ));
        }
        if size == 0 {
            return Err(CodecError::InvalidNzbData(format!(
                "Segment {} has zero size",
                number
            )));
        }

        Ok(Self {
            number,
            offset: 0,
            size,
            message_id: message_id.into(),
        })
    }

    /// Segment number (1-based)
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Byte offset of this segment within the file
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Size of this segment in bytes
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Message-ID for retrieving this segment
    pub fn message_id(&self) -> &MessageId {
        &self.message_id
    }
}

/// Sort segments by number and derive their offsets
///
/// A segment's offset is the total size of the segments with a smaller number.
fn establish_offsets(segments: &mut [NzbSegment]) {
    segments.sort_by_key(|s| s.number);

    let mut before = 0u64;
    for group in segments.chunk_by_mut(|a, b| a.number == b.number) {
        let group_size: u64 = group.iter().map(|s| s.size).sum();
        for segment in group.iter_mut() {
            segment.offset = before;
        }
        before += group_size;
    }
}

/// A single file entry in an NZB
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NzbFile {
    file_name: String,
    subject: String,
    poster: String,
    date: DateTime<Utc>,
    groups: BTreeSet<String>,
    segments: Vec<NzbSegment>,
}

impl NzbFile {
    /// Create a file entry
    ///
    /// Segments are ordered by number and their offsets derived; the file
    /// name is extracted from the subject.
    pub fn new<G>(
        poster: impl Into<String>,
        subject: impl Into<String>,
        date: DateTime<Utc>,
        groups: G,
        mut segments: Vec<NzbSegment>,
    ) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
    {
        let subject = subject.into();
        establish_offsets(&mut segments);

        Self {
            file_name: file_name_from_subject(&subject),
            subject,
            poster: poster.into(),
            date,
            groups: groups.into_iter().map(Into::into).collect(),
            segments,
        }
    }

    /// Poster name/email
    pub fn poster(&self) -> &str {
        &self.poster
    }

    /// Subject line
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// File name derived from the subject
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Posting date
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Newsgroups where this file was posted
    pub fn groups(&self) -> &BTreeSet<String> {
        &self.groups
    }

    /// Segments ordered by number
    pub fn segments(&self) -> &[NzbSegment] {
        &self.segments
    }

    /// Total size of all segments
    pub fn size(&self) -> u64 {
        self.segments.iter().map(|s| s.size).sum()
    }

    /// Validate segment numbering
    ///
    /// Returns an error if:
    /// - Segments are not sequential starting from 1
    /// - There are duplicate segment numbers
    /// - Segments are empty
    pub fn validate_segments(&self) -> Result<()> {
        if self.segments.is_empty() {
            return Err(CodecError::InvalidNzbData(
                "File has no segments".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for seg in &self.segments {
            if !seen.insert(seg.number) {
                return Err(CodecError::InvalidNzbData(format!(
                    "Duplicate segment number: {}",
                    seg.number
                )));
            }
        }

        if let Some(missing) = self.missing_segments().first() {
            return Err(CodecError::InvalidNzbData(format!(
                "Missing segment number: {}",
                missing
            )));
        }

        Ok(())
    }

    /// Get missing segment numbers (if any)
    pub fn missing_segments(&self) -> Vec<u32> {
        let seen: HashSet<u32> = self.segments.iter().map(|s| s.number).collect();
        let max_number = self.segments.last().map_or(0, |s| s.number);

        (1..=max_number).filter(|i| !seen.contains(i)).collect()
    }
}

/// NZB document: metadata plus the files it describes
///
/// Files are kept ordered by file name, so two documents with the same
/// content compare equal regardless of the order files were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NzbDocument {
    meta: BTreeMap<String, BTreeSet<String>>,
    files: Vec<NzbFile>,
}

impl NzbDocument {
    /// Create a document from metadata and files
    pub fn new(meta: BTreeMap<String, BTreeSet<String>>, mut files: Vec<NzbFile>) -> Self {
        files.sort();
        Self { meta, files }
    }

    /// Metadata from the `<head>` section (e.g. title, password, tag, category)
    pub fn meta(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.meta
    }

    /// All values recorded for one metadata key
    pub fn meta_values(&self, key: &str) -> Option<&BTreeSet<String>> {
        self.meta.get(key)
    }

    /// First value recorded for one metadata key
    pub fn meta_value(&self, key: &str) -> Option<&str> {
        self.meta
            .get(key)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Files ordered by file name
    pub fn files(&self) -> &[NzbFile] {
        &self.files
    }

    /// Total size of all files
    pub fn size(&self) -> u64 {
        self.files.iter().map(NzbFile::size).sum()
    }

    /// Validate all files in the NZB
    pub fn validate(&self) -> Result<()> {
        if self.files.is_empty() {
            return Err(CodecError::InvalidNzbData("NZB has no files".to_string()));
        }

        for file in &self.files {
            file.validate_segments().map_err(|e| {
                CodecError::InvalidNzbData(format!("File {}: {}", file.file_name, e))
            })?;
        }

        Ok(())
    }
}
