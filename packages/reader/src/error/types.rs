use std::error::Error as StdError;
use std::fmt;

use crate::config::{BatchMode, ConfigurationError};
use crate::token::NodeKind;

/// A Result alias where the Err case is [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while decoding a JSON batch payload.
pub struct Error {
    pub(crate) inner: Box<Inner>,
}

pub(crate) struct Inner {
    pub(crate) kind: Kind,
    pub(crate) source: Option<Box<dyn StdError + Send + Sync>>,
}

/// Structured description of what went wrong.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Kind {
    #[error("duplicate property '{property}' in batch item")]
    DuplicateProperty { property: String },

    #[error("unknown property '{property}' in batch item")]
    UnknownProperty { property: String },

    #[error("duplicate header '{header}' in batch item")]
    DuplicateHeader { header: String },

    #[error("required property '{property}' is missing from batch item")]
    MissingProperty { property: &'static str },

    #[error("expected {expected} while reading {context}, found {found}")]
    UnexpectedNode {
        expected: &'static str,
        found: NodeKind,
        context: &'static str,
    },

    #[error("invalid value for property '{property}': {reason}")]
    InvalidPropertyValue { property: &'static str, reason: String },

    #[error("invalid top-level property '{property}', expected 'requests' or 'responses'")]
    InvalidTopLevelProperty { property: String },

    #[error("payload is a batch of {found} but the reader was configured for {expected}")]
    BatchModeMismatch { expected: BatchMode, found: BatchMode },

    #[error("malformed JSON at byte {offset}: {message}")]
    Syntax { offset: u64, message: String },

    #[error("JSON nesting exceeds the maximum depth of {max_depth}")]
    NestingTooDeep { max_depth: usize },

    #[error("body must be a JSON object, array or string, found {found}")]
    InvalidBodyContent { found: String },

    #[error(
        "message '{message_id}' of atomicity group '{group_id}' is positioned incorrectly, group members must be contiguous"
    )]
    MessageIdPositionedIncorrectly { message_id: String, group_id: String },

    #[error(
        "dependsOn id '{depends_on_id}' of message '{message_id}' does not name a preceding message or atomicity group"
    )]
    DependsOnIdNotFound {
        depends_on_id: String,
        message_id: String,
    },

    #[error("message '{message_id}' lists itself in dependsOn")]
    SelfReferenceDependsOn { message_id: String },

    #[error("message '{message_id}' lists its own atomicity group '{group_id}' in dependsOn")]
    SelfGroupReferenceDependsOn { message_id: String, group_id: String },

    #[error(
        "dependsOn id '{depends_on_id}' of message '{message_id}' is a member of atomicity group '{group_id}', reference the group instead"
    )]
    DependsOnCrossesAtomicityGroup {
        depends_on_id: String,
        message_id: String,
        group_id: String,
    },

    #[error("body of {size} bytes exceeds the maximum message size of {max} bytes")]
    MessageSizeExceeded { size: usize, max: usize },

    #[error("batch holds more than {max} parts")]
    MaxPartsPerBatchExceeded { max: usize },

    #[error("changeset '{group_id}' holds more than {max} operations")]
    MaxOperationsPerChangesetExceeded { group_id: String, max: usize },

    #[error("I/O error while reading the batch payload ({kind:?})")]
    Io { kind: std::io::ErrorKind },

    #[error("invalid reader configuration: {0}")]
    Configuration(ConfigurationError),

    #[error("batch reader failed on an earlier error and cannot continue")]
    ReaderFailed,

    #[error("body content has already been populated")]
    BodyAlreadyPopulated,

    #[error("requested {requested} body bytes but only {available} remain")]
    ContentLengthMismatch { requested: usize, available: usize },

    #[error("in-stream error payload: {payload}")]
    InStreamError { payload: serde_json::Value },

    #[error("internal reader error: {0}")]
    Internal(&'static str),
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner { kind, source: None }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    /// The structured kind of this error.
    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Consumes the error, returning its kind and dropping any source.
    #[must_use]
    pub fn into_kind(self) -> Kind {
        self.inner.kind
    }
}

impl From<Kind> for Error {
    fn from(kind: Kind) -> Self {
        Error::new(kind)
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("odata_batch_reader::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner.kind, f)
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
