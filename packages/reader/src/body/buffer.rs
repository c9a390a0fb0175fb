//! BodyContentBuffer: one item's materialized body

use bytes::{Bytes, BytesMut};

use super::content_type;
use super::json_copy::copy_subtree;
use crate::config::{ReaderConfig, TextEncoding};
use crate::error::{self, Error, Kind, Result};
use crate::token::{NodeKind, TokenSource};

/// Sub-classification of a scalar string body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpaqueKind {
    /// `text/*` or charset-qualified content, stored in that charset
    Textual,
    /// Anything else; the string's UTF-8 bytes are stored unchanged
    Binary,
}

/// How a body value was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyKind {
    /// Object or array, stored as compact JSON text
    Json,
    /// Scalar string
    Opaque(OpaqueKind),
}

/// Captured but not yet encoded content.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Captured {
    Json(String),
    Opaque(String),
}

/// Bounded, rewindable byte buffer holding one body.
///
/// Population happens in two steps so the content type may arrive after the
/// body in the item object: [`capture`](Self::capture) records the value and
/// its classification, [`populate_cached`](Self::populate_cached) encodes it
/// once the content type is known. A buffer is populated exactly once and is
/// positioned at offset 0 afterwards.
#[derive(Debug, Clone)]
pub struct BodyContentBuffer {
    data: Bytes,
    position: usize,
    kind: Option<BodyKind>,
    charset: Option<TextEncoding>,
    pending: Option<Captured>,
    populated: bool,
    max_message_size: usize,
    default_encoding: TextEncoding,
}

impl BodyContentBuffer {
    /// Create an unpopulated buffer using the limits of `config`.
    pub fn new(config: &ReaderConfig) -> Self {
        Self {
            data: Bytes::new(),
            position: 0,
            kind: None,
            charset: None,
            pending: None,
            populated: false,
            max_message_size: config.max_message_size,
            default_encoding: config.encoding,
        }
    }

    /// A populated, empty body for items without a `body` property.
    pub fn empty(config: &ReaderConfig) -> Self {
        Self {
            populated: true,
            ..Self::new(config)
        }
    }

    /// Records the body value under the cursor and moves past it.
    ///
    /// Objects and arrays are captured as JSON, strings as opaque text.
    /// Anything else is rejected.
    pub async fn capture<T: TokenSource>(&mut self, source: &mut T) -> Result<()> {
        if self.populated || self.pending.is_some() {
            return Err(Error::new(Kind::BodyAlreadyPopulated));
        }

        let captured = match source.node_kind() {
            NodeKind::StartObject | NodeKind::StartArray => {
                let mut json = String::new();
                copy_subtree(source, &mut json).await?;
                Captured::Json(json)
            }
            NodeKind::PrimitiveValue => {
                let scalar = source
                    .scalar()
                    .ok_or_else(|| error::internal("primitive node without a value"))?;
                if scalar.as_str().is_none() {
                    return Err(Error::new(Kind::InvalidBodyContent {
                        found: scalar.type_name().to_owned(),
                    }));
                }
                Captured::Opaque(source.read_string_value("body").await?)
            }
            found => {
                return Err(Error::new(Kind::InvalidBodyContent {
                    found: found.as_str().to_owned(),
                }));
            }
        };

        self.pending = Some(captured);
        Ok(())
    }

    /// Records already-read text as an opaque body.
    pub(crate) fn capture_opaque(&mut self, text: String) {
        self.pending = Some(Captured::Opaque(text));
    }

    /// Records already-serialized JSON as a JSON body.
    pub(crate) fn capture_json(&mut self, json: String) {
        self.pending = Some(Captured::Json(json));
    }

    /// Capture and encode in one step, for callers that know the content type.
    pub async fn populate<T: TokenSource>(
        &mut self,
        source: &mut T,
        content_type: Option<&str>,
    ) -> Result<()> {
        self.capture(source).await?;
        self.populate_cached(content_type)
    }

    /// Encodes the captured value and rewinds to offset 0.
    ///
    /// JSON and textual content use the `charset` of `content_type` when it
    /// names a supported encoding, the configured encoding otherwise. Binary
    /// content keeps the string's UTF-8 bytes.
    pub fn populate_cached(&mut self, content_type: Option<&str>) -> Result<()> {
        if self.populated {
            return Err(Error::new(Kind::BodyAlreadyPopulated));
        }
        let captured = self
            .pending
            .take()
            .ok_or_else(|| error::internal("body populated before it was captured"))?;

        let encoding = content_type
            .and_then(content_type::charset)
            .and_then(TextEncoding::from_charset)
            .unwrap_or(self.default_encoding);

        let (kind, text, charset) = match captured {
            Captured::Json(text) => (BodyKind::Json, text, Some(encoding)),
            Captured::Opaque(text) if content_type.is_some_and(content_type::is_textual) => {
                (BodyKind::Opaque(OpaqueKind::Textual), text, Some(encoding))
            }
            Captured::Opaque(text) => (BodyKind::Opaque(OpaqueKind::Binary), text, None),
        };

        self.data = match charset {
            Some(encoding) => {
                let mut buf = BytesMut::with_capacity(encoding.encoded_len(&text));
                encoding.encode_into(&text, &mut buf);
                buf.freeze()
            }
            None => Bytes::from(text.into_bytes()),
        };
        self.kind = Some(kind);
        self.charset = charset;
        self.populated = true;
        self.position = 0;

        tracing::trace!(
            target: "odata_batch::body",
            kind = ?kind,
            bytes = self.data.len(),
            "body content populated"
        );
        Ok(())
    }

    /// Returns true once a value has been captured but not yet encoded.
    #[must_use]
    pub fn is_captured(&self) -> bool {
        self.pending.is_some()
    }

    #[must_use]
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Classification, or `None` for an empty or unpopulated body.
    #[must_use]
    pub fn kind(&self) -> Option<BodyKind> {
        self.kind
    }

    /// Encoding of the stored bytes; `None` for binary and empty bodies.
    #[must_use]
    pub fn charset(&self) -> Option<TextEncoding> {
        self.charset
    }

    /// Buffered length, checked against the maximum message size.
    ///
    /// # Errors
    ///
    /// Returns `MessageSizeExceeded` when the body is larger than the limit.
    pub fn content_length(&self) -> Result<usize> {
        let size = self.data.len();
        if size > self.max_message_size {
            return Err(Error::new(Kind::MessageSizeExceeded {
                size,
                max: self.max_message_size,
            }));
        }
        Ok(size)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[inline]
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// The full buffered content, independent of the read position.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.data
    }

    /// Copies exactly `count` bytes into `buf[offset..offset + count]`.
    ///
    /// # Errors
    ///
    /// Returns `ContentLengthMismatch` if fewer than `count` bytes remain;
    /// nothing is copied in that case.
    pub fn read_with_length(&mut self, buf: &mut [u8], offset: usize, count: usize) -> Result<usize> {
        let available = self.remaining();
        if count > available {
            return Err(Error::new(Kind::ContentLengthMismatch {
                requested: count,
                available,
            }));
        }
        let target = offset
            .checked_add(count)
            .and_then(|end| buf.get_mut(offset..end))
            .ok_or_else(|| error::internal("destination slice too small for requested length"))?;

        target.copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        Ok(count)
    }

    /// Copies up to `buf.len()` bytes, returning how many were copied.
    pub(super) fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let remaining = &self.data[self.position..];
        let to_copy = std::cmp::min(buf.len(), remaining.len());
        if to_copy > 0 {
            buf[..to_copy].copy_from_slice(&remaining[..to_copy]);
            self.position += to_copy;
        }
        to_copy
    }
}
