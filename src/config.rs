//! Posting configuration

use crate::yenc::MAX_LINE_LENGTH;
use crate::{CodecError, Result};

/// Parameters used when splitting and encoding a file for posting
///
/// # Example
///
/// ```
/// use usenet_codec::PostingConfig;
///
/// let config = PostingConfig::new("user@example.com", ["alt.binaries.test"])
///     .with_part_size(750_000)
///     .with_message_base("example.com");
///
/// assert_eq!(config.line_length, 128);
/// assert!(config.validate().is_ok());
/// ```
#[must_use]
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PostingConfig {
    /// Encoded characters per yEnc line (1-997, typically 128)
    #[cfg_attr(feature = "serde", serde(default = "default_line_length"))]
    pub line_length: usize,

    /// Maximum number of file bytes per article
    #[cfg_attr(feature = "serde", serde(default = "default_part_size"))]
    pub part_size: u64,

    /// Domain part of generated Message-IDs
    #[cfg_attr(feature = "serde", serde(default = "default_message_base"))]
    pub message_base: String,

    /// `From` header and NZB poster
    pub poster: String,

    /// Newsgroups to post to
    pub groups: Vec<String>,
}

fn default_line_length() -> usize {
    128
}

fn default_part_size() -> u64 {
    384_000
}

fn default_message_base() -> String {
    "usenet-codec".to_string()
}

impl Default for PostingConfig {
    fn default() -> Self {
        Self {
            line_length: default_line_length(),
            part_size: default_part_size(),
            message_base: default_message_base(),
            poster: String::new(),
            groups: Vec::new(),
        }
    }
}

impl PostingConfig {
    /// Create a configuration with default line length, part size and
    /// message base
    pub fn new<G>(poster: impl Into<String>, groups: G) -> Self
    where
        G: IntoIterator,
        G::Item: Into<String>,
    {
        Self {
            poster: poster.into(),
            groups: groups.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the yEnc line length
    pub fn with_line_length(mut self, line_length: usize) -> Self {
        self.line_length = line_length;
        self
    }

    /// Set the maximum part size
    pub fn with_part_size(mut self, part_size: u64) -> Self {
        self.part_size = part_size;
        self
    }

    /// Set the Message-ID domain
    pub fn with_message_base(mut self, message_base: impl Into<String>) -> Self {
        self.message_base = message_base.into();
        self
    }

    /// Check the configuration can be used for posting
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidYencData`] for a line length outside
    /// `1..=997` and [`CodecError::InvalidNzbData`] for a zero part size or
    /// an empty group list.
    pub fn validate(&self) -> Result<()> {
        if !(1..=MAX_LINE_LENGTH).contains(&self.line_length) {
            return Err(CodecError::InvalidYencData(format!(
                "Line length {} outside 1..={}",
                self.line_length, MAX_LINE_LENGTH
            )));
        }
        if self.part_size == 0 {
            return Err(CodecError::InvalidNzbData(
                "Part size must be at least 1 byte".to_string(),
            ));
        }
        if self.groups.is_empty() {
            return Err(CodecError::InvalidNzbData(
                "At least one newsgroup is required".to_string(),
            ));
        }
        Ok(())
    }
}
