//! Message-ID value type
//!
//! NZB files store message ids without angle brackets while NNTP commands
//! and article headers use the bracketed form. [`MessageId`] keeps the bare
//! canonical value and renders brackets only for the wire.

use std::fmt;

/// A Usenet message identifier
///
/// # Example
///
/// ```
/// use usenet_codec::MessageId;
///
/// let id = MessageId::new("<part1of3.abc@example.com>");
/// assert_eq!(id.as_str(), "part1of3.abc@example.com");
/// assert_eq!(id.to_string(), "<part1of3.abc@example.com>");
/// assert!(MessageId::new("").is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MessageId(String);

impl MessageId {
    /// Create a message id, stripping whitespace and surrounding `<`/`>`
    pub fn new(value: impl AsRef<str>) -> Self {
        let value = value.as_ref().trim();
        let value = value.strip_prefix('<').unwrap_or(value);
        let value = value.strip_suffix('>').unwrap_or(value);
        Self(value.trim().to_string())
    }

    /// Canonical value without angle brackets
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty "no id" value
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bracketed form used in NNTP commands and headers
    pub fn to_wire(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            Ok(())
        } else {
            write!(f, "<{}>", self.0)
        }
    }
}

impl From<&str> for MessageId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for MessageId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl AsRef<str> for MessageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
