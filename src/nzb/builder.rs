//! Builders for NZB documents and file entries

use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

use super::types::{NzbDocument, NzbFile, NzbSegment};
use crate::message_id::MessageId;
use crate::{CodecError, Result};

/// Builder for a single [`NzbFile`]
///
/// # Example
///
/// ```
/// use usenet_codec::nzb::NzbFileBuilder;
///
/// let file = NzbFileBuilder::new()
///     .poster("user@example.com")
///     .subject("\"data.bin\" yEnc (1/2)")
///     .add_group("alt.binaries.test")
///     .add_segment(2, 500, "part2of2.abc@example.com")
///     .add_segment(1, 300, "part1of2.abc@example.com")
///     .build()?;
///
/// assert_eq!(file.file_name(), "data.bin");
/// assert_eq!(file.segments()[1].offset(), 300);
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct NzbFileBuilder {
    poster: Option<String>,
    subject: Option<String>,
    date: Option<DateTime<Utc>>,
    groups: BTreeSet<String>,
    segments: Vec<(u32, u64, MessageId)>,
}

impl NzbFileBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the poster (required)
    pub fn poster(mut self, poster: impl Into<String>) -> Self {
        self.poster = Some(poster.into());
        self
    }

    /// Set the subject (required)
    pub fn subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the posting date (defaults to the Unix epoch)
    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Add a newsgroup (at least one required)
    pub fn add_group(mut self, group: impl Into<String>) -> Self {
        self.groups.insert(group.into());
        self
    }

    /// Add several newsgroups
    pub fn groups(mut self, groups: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.groups.extend(groups.into_iter().map(Into::into));
        self
    }

    /// Add a segment (at least one required)
    pub fn add_segment(mut self, number: u32, size: u64, message_id: impl Into<MessageId>) -> Self {
        self.segments.push((number, size, message_id.into()));
        self
    }

    /// Build the file entry
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidNzbData`] if poster or subject is missing,
    /// if there are no groups or no segments, or if a segment is invalid.
    pub fn build(self) -> Result<NzbFile> {
        let poster = self
            .poster
            .ok_or_else(|| CodecError::InvalidNzbData("Poster is required".to_string()))?;
        let subject = self
            .subject
            .ok_or_else(|| CodecError::InvalidNzbData("Subject is required".to_string()))?;

        if self.groups.is_empty() {
            return Err(CodecError::InvalidNzbData(
                "At least one newsgroup is required".to_string(),
            ));
        }
        if self.segments.is_empty() {
            return Err(CodecError::InvalidNzbData(
                "At least one segment is required".to_string(),
            ));
        }

        let segments = self
            .segments
            .into_iter()
            .map(|(number, size, message_id)| NzbSegment::new(number, size, message_id))
            .collect::<Result<Vec<_>>>()?;

        Ok(NzbFile::new(
            poster,
            subject,
            self.date.unwrap_or_default(),
            self.groups,
            segments,
        ))
    }
}

/// Builder for an [`NzbDocument`]
#[must_use]
#[derive(Debug, Clone, Default)]
pub struct NzbBuilder {
    meta: BTreeMap<String, BTreeSet<String>>,
    files: Vec<NzbFile>,
}

impl NzbBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a metadata value; a key may carry several values
    pub fn add_meta(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.meta.entry(key.into()).or_default().insert(value.into());
        self
    }

    /// Add a file entry
    pub fn add_file(mut self, file: NzbFile) -> Self {
        self.files.push(file);
        self
    }

    /// Build the document
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidNzbData`] if no file was added.
    pub fn build(self) -> Result<NzbDocument> {
        if self.files.is_empty() {
            return Err(CodecError::InvalidNzbData(
                "At least one file is required".to_string(),
            ));
        }

        Ok(NzbDocument::new(self.meta, self.files))
    }
}
