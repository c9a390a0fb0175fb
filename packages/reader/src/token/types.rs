//! Token source node and value types

use std::fmt::{self, Write as _};

/// Kind of node a token source is positioned on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Nothing has been read yet
    None,
    StartObject,
    EndObject,
    StartArray,
    EndArray,
    /// Object member name; the value follows
    Property,
    /// String, number, boolean or null
    PrimitiveValue,
    EndOfInput,
}

impl NodeKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::None => "nothing",
            NodeKind::StartObject => "start of object",
            NodeKind::EndObject => "end of object",
            NodeKind::StartArray => "start of array",
            NodeKind::EndArray => "end of array",
            NodeKind::Property => "property name",
            NodeKind::PrimitiveValue => "primitive value",
            NodeKind::EndOfInput => "end of input",
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive JSON value.
///
/// Numbers keep their source text so re-serialized bodies reproduce them exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonScalar {
    Null,
    Bool(bool),
    Number(String),
    String(String),
}

impl JsonScalar {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonScalar::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_string(self) -> Option<String> {
        match self {
            JsonScalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer value of a number without fraction or exponent.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            JsonScalar::Number(raw) => raw.parse().ok(),
            _ => None,
        }
    }

    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            JsonScalar::Null => "null",
            JsonScalar::Bool(_) => "boolean",
            JsonScalar::Number(_) => "number",
            JsonScalar::String(_) => "string",
        }
    }

    /// Text form used for header values: strings as-is, other values as JSON.
    #[must_use]
    pub fn to_text(&self) -> String {
        match self {
            JsonScalar::Null => "null".to_owned(),
            JsonScalar::Bool(b) => b.to_string(),
            JsonScalar::Number(raw) => raw.clone(),
            JsonScalar::String(s) => s.clone(),
        }
    }

    /// Appends the compact JSON form of this value.
    pub fn write_json(&self, out: &mut String) {
        match self {
            JsonScalar::Null => out.push_str("null"),
            JsonScalar::Bool(true) => out.push_str("true"),
            JsonScalar::Bool(false) => out.push_str("false"),
            JsonScalar::Number(raw) => out.push_str(raw),
            JsonScalar::String(s) => write_json_string(s, out),
        }
    }

    /// Converts into a `serde_json::Value`.
    #[must_use]
    pub fn into_value(self) -> serde_json::Value {
        match self {
            JsonScalar::Null => serde_json::Value::Null,
            JsonScalar::Bool(b) => serde_json::Value::Bool(b),
            JsonScalar::Number(raw) => raw
                .parse::<serde_json::Number>()
                .map_or(serde_json::Value::String(raw), serde_json::Value::Number),
            JsonScalar::String(s) => serde_json::Value::String(s),
        }
    }
}

/// Appends `s` as a quoted, escaped JSON string.
pub fn write_json_string(s: &str, out: &mut String) {
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{08}' => out.push_str("\\b"),
            '\u{0c}' => out.push_str("\\f"),
            c if c < '\u{20}' => {
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out.push('"');
}
