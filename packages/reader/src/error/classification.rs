use super::types::{Error, Kind};

/// Coarse grouping of error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The payload is structurally invalid: duplicate or unknown properties,
    /// missing required fields, wrong token kinds, malformed JSON.
    MalformedPayload,
    /// Atomicity groups or dependsOn references break the ordering rules.
    OrderingViolation,
    /// A configured size or count limit was crossed.
    SizeLimitExceeded,
    /// The underlying byte source failed.
    Io,
    /// Configuration was rejected before reading started.
    Configuration,
    /// The reader or a body buffer was used in a state that does not allow it.
    InvalidState,
}

impl Error {
    /// The category this error belongs to.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self.inner.kind {
            Kind::DuplicateProperty { .. }
            | Kind::UnknownProperty { .. }
            | Kind::DuplicateHeader { .. }
            | Kind::MissingProperty { .. }
            | Kind::UnexpectedNode { .. }
            | Kind::InvalidPropertyValue { .. }
            | Kind::InvalidTopLevelProperty { .. }
            | Kind::BatchModeMismatch { .. }
            | Kind::Syntax { .. }
            | Kind::NestingTooDeep { .. }
            | Kind::InvalidBodyContent { .. } => ErrorCategory::MalformedPayload,
            Kind::MessageIdPositionedIncorrectly { .. }
            | Kind::DependsOnIdNotFound { .. }
            | Kind::SelfReferenceDependsOn { .. }
            | Kind::SelfGroupReferenceDependsOn { .. }
            | Kind::DependsOnCrossesAtomicityGroup { .. } => ErrorCategory::OrderingViolation,
            Kind::MessageSizeExceeded { .. }
            | Kind::MaxPartsPerBatchExceeded { .. }
            | Kind::MaxOperationsPerChangesetExceeded { .. } => ErrorCategory::SizeLimitExceeded,
            Kind::Io { .. } => ErrorCategory::Io,
            Kind::Configuration(_) => ErrorCategory::Configuration,
            Kind::ReaderFailed
            | Kind::BodyAlreadyPopulated
            | Kind::ContentLengthMismatch { .. }
            | Kind::InStreamError { .. }
            | Kind::Internal(_) => ErrorCategory::InvalidState,
        }
    }

    /// Returns true if the payload itself is malformed.
    #[must_use]
    pub fn is_malformed_payload(&self) -> bool {
        self.category() == ErrorCategory::MalformedPayload
    }

    /// Returns true if an atomicity group or dependsOn ordering rule was broken.
    #[must_use]
    pub fn is_ordering_violation(&self) -> bool {
        self.category() == ErrorCategory::OrderingViolation
    }

    /// Returns true if a size or count limit was exceeded.
    #[must_use]
    pub fn is_size_limit_exceeded(&self) -> bool {
        self.category() == ErrorCategory::SizeLimitExceeded
    }

    /// Returns true if reading the underlying bytes failed.
    #[must_use]
    pub fn is_io(&self) -> bool {
        self.category() == ErrorCategory::Io
    }

    /// Returns true if this is the in-stream error signal raised by a token source.
    #[must_use]
    pub fn is_in_stream_error(&self) -> bool {
        matches!(self.inner.kind, Kind::InStreamError { .. })
    }
}
