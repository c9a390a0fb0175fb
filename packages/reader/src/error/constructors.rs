use std::io;

use super::types::{Error, Kind};
use crate::config::ConfigurationError;
use crate::token::NodeKind;

/// Creates an `Error` for a token of the wrong kind.
pub fn unexpected_node(expected: &'static str, found: NodeKind, context: &'static str) -> Error {
    Error::new(Kind::UnexpectedNode {
        expected,
        found,
        context,
    })
}

/// Creates an `Error` for malformed JSON at an absolute byte offset.
pub fn syntax(offset: u64, message: impl Into<String>) -> Error {
    Error::new(Kind::Syntax {
        offset,
        message: message.into(),
    })
}

pub fn duplicate_property(property: impl Into<String>) -> Error {
    Error::new(Kind::DuplicateProperty {
        property: property.into(),
    })
}

pub fn unknown_property(property: impl Into<String>) -> Error {
    Error::new(Kind::UnknownProperty {
        property: property.into(),
    })
}

pub fn duplicate_header(header: impl Into<String>) -> Error {
    Error::new(Kind::DuplicateHeader {
        header: header.into(),
    })
}

pub fn missing_property(property: &'static str) -> Error {
    Error::new(Kind::MissingProperty { property })
}

pub fn invalid_property_value(property: &'static str, reason: impl Into<String>) -> Error {
    Error::new(Kind::InvalidPropertyValue {
        property,
        reason: reason.into(),
    })
}

/// Creates an `Error` for a failed read from the byte source.
pub fn io(err: io::Error) -> Error {
    Error::new(Kind::Io { kind: err.kind() }).with(err)
}

pub fn configuration(err: ConfigurationError) -> Error {
    Error::new(Kind::Configuration(err))
}

pub fn internal(message: &'static str) -> Error {
    Error::new(Kind::Internal(message))
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        io(err)
    }
}

impl From<ConfigurationError> for Error {
    fn from(err: ConfigurationError) -> Self {
        configuration(err)
    }
}
