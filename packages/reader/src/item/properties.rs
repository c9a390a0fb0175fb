//! Batch item property names and values

use std::fmt;

use super::headers::BatchHeaders;
use crate::body::BodyContentBuffer;

/// The recognized properties of a batch item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyName {
    Id,
    AtomicityGroup,
    DependsOn,
    Method,
    Url,
    Status,
    Headers,
    Body,
}

impl PropertyName {
    pub const ALL: [PropertyName; 8] = [
        PropertyName::Id,
        PropertyName::AtomicityGroup,
        PropertyName::DependsOn,
        PropertyName::Method,
        PropertyName::Url,
        PropertyName::Status,
        PropertyName::Headers,
        PropertyName::Body,
    ];

    /// Canonical form used for lookup and duplicate detection.
    #[must_use]
    pub fn normalize(name: &str) -> String {
        name.to_uppercase()
    }

    /// Resolves an already normalized name.
    #[must_use]
    pub fn from_normalized(normalized: &str) -> Option<Self> {
        match normalized {
            "ID" => Some(PropertyName::Id),
            "ATOMICITYGROUP" => Some(PropertyName::AtomicityGroup),
            "DEPENDSON" => Some(PropertyName::DependsOn),
            "METHOD" => Some(PropertyName::Method),
            "URL" => Some(PropertyName::Url),
            "STATUS" => Some(PropertyName::Status),
            "HEADERS" => Some(PropertyName::Headers),
            "BODY" => Some(PropertyName::Body),
            _ => None,
        }
    }

    /// Resolves a property name as written in the payload, ignoring case.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        Self::from_normalized(&Self::normalize(name))
    }

    /// Wire spelling of the property.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyName::Id => "id",
            PropertyName::AtomicityGroup => "atomicityGroup",
            PropertyName::DependsOn => "dependsOn",
            PropertyName::Method => "method",
            PropertyName::Url => "url",
            PropertyName::Status => "status",
            PropertyName::Headers => "headers",
            PropertyName::Body => "body",
        }
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scanned property value.
#[derive(Debug, Clone)]
pub enum PropertyValue {
    /// `id`, `atomicityGroup`, `method` and `url`
    Text(String),
    Status(u16),
    DependsOn(Vec<String>),
    Headers(BatchHeaders),
    Body(BodyContentBuffer),
}
