//! Codec error types

use thiserror::Error;

/// Errors raised by the yEnc codec, the NZB parser/writer and the transfer helpers
///
/// Checksum and size mismatches are not errors; they are reported by
/// [`crate::yenc::validate`] as a [`crate::yenc::ValidationResult`].
#[derive(Error, Debug)]
pub enum CodecError {
    /// Structurally invalid yEnc input (missing `=ybegin`, missing `=ypart`, ...)
    #[error("Invalid yEnc data: {0}")]
    InvalidYencData(String),

    /// Structurally invalid NZB document (missing root, bad segment attributes, ...)
    #[error("Invalid NZB data: {0}")]
    InvalidNzbData(String),

    /// XML syntax error, passed through from the XML reader
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// IO error while reading a byte source or writing output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// UTF-8 decoding error
    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// Failure reported by an article fetcher or poster
    #[error("Transport error: {0}")]
    Transport(String),
}

/// Result type alias using CodecError
pub type Result<T> = std::result::Result<T, CodecError>;
