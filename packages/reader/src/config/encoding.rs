//! Text encodings for buffered body content

use std::fmt;

use bytes::{BufMut, BytesMut};
use serde::{Deserialize, Serialize};

/// Encoding used when buffering JSON and textual bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    #[default]
    #[serde(rename = "utf-8", alias = "utf8")]
    Utf8,
    #[serde(rename = "utf-16le")]
    Utf16Le,
    #[serde(rename = "utf-16be", alias = "utf-16")]
    Utf16Be,
}

impl TextEncoding {
    /// Resolves a `charset` parameter value, ignoring case and quotes.
    ///
    /// A bare `utf-16` resolves to big-endian, the RFC 2781 default.
    #[must_use]
    pub fn from_charset(charset: &str) -> Option<Self> {
        let charset = charset.trim().trim_matches('"');
        if charset.eq_ignore_ascii_case("utf-8") || charset.eq_ignore_ascii_case("utf8") {
            Some(TextEncoding::Utf8)
        } else if charset.eq_ignore_ascii_case("utf-16le") {
            Some(TextEncoding::Utf16Le)
        } else if charset.eq_ignore_ascii_case("utf-16be") || charset.eq_ignore_ascii_case("utf-16")
        {
            Some(TextEncoding::Utf16Be)
        } else {
            None
        }
    }

    /// The canonical charset label.
    #[must_use]
    pub fn charset(self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Utf16Le => "utf-16le",
            TextEncoding::Utf16Be => "utf-16be",
        }
    }

    /// Number of bytes `text` occupies once encoded.
    #[must_use]
    pub fn encoded_len(self, text: &str) -> usize {
        match self {
            TextEncoding::Utf8 => text.len(),
            TextEncoding::Utf16Le | TextEncoding::Utf16Be => text.encode_utf16().count() * 2,
        }
    }

    /// Appends `text` to `out` in this encoding.
    pub fn encode_into(self, text: &str, out: &mut BytesMut) {
        out.reserve(self.encoded_len(text));
        match self {
            TextEncoding::Utf8 => out.extend_from_slice(text.as_bytes()),
            TextEncoding::Utf16Le => text.encode_utf16().for_each(|unit| out.put_u16_le(unit)),
            TextEncoding::Utf16Be => text.encode_utf16().for_each(|unit| out.put_u16(unit)),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.charset())
    }
}
