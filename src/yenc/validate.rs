//! Integrity checks for decoded yEnc articles
//!
//! Validation never fails: every finding is returned as data so the caller
//! can decide whether to discard, re-fetch or accept the article.

use std::fmt;

use super::decode::YencArticle;
use crate::crc32::checksum;

/// Kind of validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationCode {
    /// The footer carries no checksum for this article
    MissingChecksum,
    /// The CRC32 of the decoded data differs from the footer
    ChecksumMismatch,
    /// The decoded data length differs from the advertised size
    SizeMismatch,
    /// Header and footer disagree on the part number
    PartMismatch,
}

/// Expected and actual values behind a mismatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    /// Value advertised by the article metadata
    pub expected: u64,
    /// Value observed in the decoded data
    pub actual: u64,
}

/// One validation finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
    /// Kind of finding
    pub code: ValidationCode,
    /// Human-readable description
    pub message: String,
    /// Values compared, if the finding is a mismatch
    pub detail: Option<Mismatch>,
}

impl ValidationFailure {
    fn mismatch(code: ValidationCode, message: String, expected: u64, actual: u64) -> Self {
        Self {
            code,
            message,
            detail: Some(Mismatch { expected, actual }),
        }
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.code, self.message)
    }
}

/// Ordered list of validation findings; valid when empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    /// Whether no findings were recorded
    pub fn is_valid(&self) -> bool {
        self.failures.is_empty()
    }

    /// Findings in the order they were detected
    pub fn failures(&self) -> &[ValidationFailure] {
        &self.failures
    }

    /// Number of findings
    pub fn len(&self) -> usize {
        self.failures.len()
    }

    /// Whether no findings were recorded
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    /// Whether a finding with `code` was recorded
    pub fn contains(&self, code: ValidationCode) -> bool {
        self.failures.iter().any(|f| f.code == code)
    }

    fn push(&mut self, failure: ValidationFailure) {
        self.failures.push(failure);
    }
}

impl IntoIterator for ValidationResult {
    type Item = ValidationFailure;
    type IntoIter = std::vec::IntoIter<ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationResult {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.failures.iter()
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.failures.is_empty() {
            return f.write_str("valid");
        }
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", failure)?;
        }
        Ok(())
    }
}

/// Check a decoded article against its footer
///
/// An article without a footer has nothing to check and is valid. For a
/// whole-file article the data length is compared with the footer size and
/// the data CRC32 with `crc32=`. For a part, the header and footer part
/// numbers must agree, the data length must match both the footer and header
/// part sizes (reported as one finding), and the CRC32 is compared with
/// `pcrc32=`. A missing checksum ends the checks.
///
/// # Example
///
/// ```
/// use usenet_codec::yenc::{decode_article, encode, validate, YencHeader};
///
/// let data = b"some bytes";
/// let lines = encode(YencHeader::single("a.bin", data.len() as u64, 128), data)?;
/// let article = decode_article(&lines)?;
/// assert!(validate(&article).is_valid());
/// # Ok::<(), usenet_codec::CodecError>(())
/// ```
pub fn validate(article: &YencArticle) -> ValidationResult {
    let mut result = ValidationResult::default();

    let Some(footer) = article.footer() else {
        return result;
    };
    let header = article.header();
    let data = article.data();
    let actual_size = data.len() as u64;

    let expected_crc = if header.is_file_part() {
        if header.part_number != footer.part_number {
            result.push(ValidationFailure::mismatch(
                ValidationCode::PartMismatch,
                format!(
                    "Header part {} does not match footer part {}",
                    header.part_number, footer.part_number
                ),
                u64::from(header.part_number),
                u64::from(footer.part_number),
            ));
        }

        if actual_size != footer.part_size || actual_size != header.part_size {
            result.push(ValidationFailure::mismatch(
                ValidationCode::SizeMismatch,
                format!(
                    "Decoded {} bytes; footer size {}, header part size {}",
                    actual_size, footer.part_size, header.part_size
                ),
                footer.part_size,
                actual_size,
            ));
        }

        footer.part_crc32
    } else {
        if actual_size != footer.part_size {
            result.push(ValidationFailure::mismatch(
                ValidationCode::SizeMismatch,
                format!(
                    "Decoded {} bytes; footer size {}",
                    actual_size, footer.part_size
                ),
                footer.part_size,
                actual_size,
            ));
        }

        footer.crc32
    };

    let Some(expected_crc) = expected_crc else {
        result.push(ValidationFailure {
            code: ValidationCode::MissingChecksum,
            message: if header.is_file_part() {
                "Footer has no pcrc32".to_string()
            } else {
                "Footer has no crc32".to_string()
            },
            detail: None,
        });
        return result;
    };

    let actual_crc = checksum(data);
    if actual_crc != expected_crc {
        result.push(ValidationFailure::mismatch(
            ValidationCode::ChecksumMismatch,
            format!(
                "CRC32 {:08x} does not match expected {:08x}",
                actual_crc, expected_crc
            ),
            u64::from(expected_crc),
            u64::from(actual_crc),
        ));
    }

    result
}
