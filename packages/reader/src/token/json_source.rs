//! JSON token source over a refillable byte window

use serde_json::{Map, Value};

use super::byte_source::ByteSource;
use super::lexer::{self, Lexed, Lexeme};
use super::source::TokenSource;
use super::types::{JsonScalar, NodeKind};
use super::window::TokenWindow;
use crate::config::ReaderConfig;
use crate::error::{self, Error, Kind, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ObjectState {
    /// Just after `{`
    Open,
    /// After a property name, before its value
    Name,
    /// After a member value
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ArrayState {
    Open,
    Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    Object(ObjectState),
    Array(ArrayState),
}

/// Pull tokenizer producing [`NodeKind`]s from any [`ByteSource`].
///
/// Bytes are requested from the source only when the window cannot produce a
/// complete lexeme, which is the single point where an async read suspends.
#[derive(Debug)]
pub struct JsonTokenSource<S> {
    source: S,
    window: TokenWindow,
    exhausted: bool,
    chunk_size: usize,
    max_depth: usize,
    node: NodeKind,
    name: Option<String>,
    scalar: Option<JsonScalar>,
    frames: Vec<Frame>,
    root_done: bool,
    detect_in_stream_error: bool,
}

impl<S: ByteSource> JsonTokenSource<S> {
    /// Create a token source with default chunk size and depth limit.
    pub fn new(source: S) -> Self {
        Self::with_config(source, &ReaderConfig::default())
    }

    /// Create a token source using the chunk size and nesting limit of `config`.
    pub fn with_config(source: S, config: &ReaderConfig) -> Self {
        Self {
            source,
            window: TokenWindow::with_capacity(config.read_chunk_size),
            exhausted: false,
            chunk_size: config.read_chunk_size.max(1),
            max_depth: config.max_nesting_depth,
            node: NodeKind::None,
            name: None,
            scalar: None,
            frames: Vec::new(),
            root_done: false,
            detect_in_stream_error: false,
        }
    }

    /// Current container nesting depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Absolute byte offset of the next unread byte.
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.window.offset()
    }

    /// Total bytes pulled from the byte source so far.
    #[must_use]
    pub fn total_received(&self) -> u64 {
        self.window.total_received()
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    fn syntax(&self, message: impl Into<String>) -> Error {
        error::syntax(self.window.offset(), message)
    }

    /// Pulls more bytes into the window.
    ///
    /// The request grows with the unconsumed bytes already buffered, so a
    /// lexeme spanning many chunks is re-lexed a logarithmic number of times.
    async fn refill(&mut self) -> Result<()> {
        let wanted = self.chunk_size.max(self.window.len());
        let received = self.source.fill(self.window.buffer_mut(), wanted).await?;
        self.window.record_received(received);
        if received == 0 {
            self.exhausted = true;
        }
        Ok(())
    }

    async fn next_lexeme(&mut self) -> Result<Option<Lexeme>> {
        loop {
            match lexer::lex(self.window.as_bytes(), self.exhausted) {
                Ok(Lexed::Token { lexeme, consumed }) => {
                    self.window.consume(consumed);
                    return Ok(Some(lexeme));
                }
                Ok(Lexed::End { consumed }) => {
                    self.window.consume(consumed);
                    return Ok(None);
                }
                Ok(Lexed::Incomplete) => self.refill().await?,
                Err(err) => {
                    return Err(error::syntax(
                        self.window.offset() + err.offset as u64,
                        err.message,
                    ));
                }
            }
        }
    }

    async fn required_lexeme(&mut self, expected: &str) -> Result<Lexeme> {
        match self.next_lexeme().await? {
            Some(lexeme) => Ok(lexeme),
            None => Err(self.syntax(format!("unexpected end of input, expected {expected}"))),
        }
    }

    fn set_top(&mut self, frame: Frame) {
        if let Some(top) = self.frames.last_mut() {
            *top = frame;
        }
    }

    fn push_frame(&mut self, frame: Frame) -> Result<()> {
        if self.frames.len() >= self.max_depth {
            return Err(Error::new(Kind::NestingTooDeep {
                max_depth: self.max_depth,
            }));
        }
        self.frames.push(frame);
        Ok(())
    }

    fn pop_frame(&mut self) {
        self.frames.pop();
        if self.frames.is_empty() {
            self.root_done = true;
        }
    }

    fn begin_value(&mut self, lexeme: Lexeme) -> Result<NodeKind> {
        let scalar = match lexeme {
            Lexeme::BeginObject => {
                self.push_frame(Frame::Object(ObjectState::Open))?;
                return Ok(NodeKind::StartObject);
            }
            Lexeme::BeginArray => {
                self.push_frame(Frame::Array(ArrayState::Open))?;
                return Ok(NodeKind::StartArray);
            }
            Lexeme::String(s) => JsonScalar::String(s),
            Lexeme::Number(n) => JsonScalar::Number(n),
            Lexeme::True => JsonScalar::Bool(true),
            Lexeme::False => JsonScalar::Bool(false),
            Lexeme::Null => JsonScalar::Null,
            Lexeme::EndObject | Lexeme::EndArray | Lexeme::Colon | Lexeme::Comma => {
                return Err(self.syntax("expected a value"));
            }
        };
        self.scalar = Some(scalar);
        if self.frames.is_empty() {
            self.root_done = true;
        }
        Ok(NodeKind::PrimitiveValue)
    }

    fn begin_property(&mut self, lexeme: Lexeme) -> Result<NodeKind> {
        match lexeme {
            Lexeme::String(name) => {
                self.set_top(Frame::Object(ObjectState::Name));
                self.name = Some(name);
                Ok(NodeKind::Property)
            }
            _ => Err(self.syntax("expected a property name")),
        }
    }

    async fn advance(&mut self) -> Result<NodeKind> {
        if self.node == NodeKind::EndOfInput {
            return Ok(NodeKind::EndOfInput);
        }
        self.name = None;
        self.scalar = None;

        let node = match self.frames.last().copied() {
            None if self.root_done => match self.next_lexeme().await? {
                None => NodeKind::EndOfInput,
                Some(_) => return Err(self.syntax("unexpected content after the top-level value")),
            },
            None => {
                let lexeme = self.required_lexeme("a value").await?;
                self.begin_value(lexeme)?
            }
            Some(Frame::Object(ObjectState::Open)) => {
                match self.required_lexeme("a property name or '}'").await? {
                    Lexeme::EndObject => {
                        self.pop_frame();
                        NodeKind::EndObject
                    }
                    lexeme => self.begin_property(lexeme)?,
                }
            }
            Some(Frame::Object(ObjectState::Name)) => {
                if self.required_lexeme("':'").await? != Lexeme::Colon {
                    return Err(self.syntax("expected ':' after property name"));
                }
                let lexeme = self.required_lexeme("a value").await?;
                self.set_top(Frame::Object(ObjectState::Value));
                self.begin_value(lexeme)?
            }
            Some(Frame::Object(ObjectState::Value)) => {
                match self.required_lexeme("',' or '}'").await? {
                    Lexeme::Comma => {
                        let lexeme = self.required_lexeme("a property name").await?;
                        self.begin_property(lexeme)?
                    }
                    Lexeme::EndObject => {
                        self.pop_frame();
                        NodeKind::EndObject
                    }
                    _ => return Err(self.syntax("expected ',' or '}' in object")),
                }
            }
            Some(Frame::Array(ArrayState::Open)) => {
                match self.required_lexeme("a value or ']'").await? {
                    Lexeme::EndArray => {
                        self.pop_frame();
                        NodeKind::EndArray
                    }
                    lexeme => {
                        self.set_top(Frame::Array(ArrayState::Value));
                        self.begin_value(lexeme)?
                    }
                }
            }
            Some(Frame::Array(ArrayState::Value)) => {
                match self.required_lexeme("',' or ']'").await? {
                    Lexeme::Comma => {
                        let lexeme = self.required_lexeme("a value").await?;
                        self.begin_value(lexeme)?
                    }
                    Lexeme::EndArray => {
                        self.pop_frame();
                        NodeKind::EndArray
                    }
                    _ => return Err(self.syntax("expected ',' or ']' in array")),
                }
            }
        };

        self.node = node;
        Ok(node)
    }

    /// Builds the current value into a `serde_json::Value` and moves past it.
    async fn materialize_value(&mut self) -> Result<Value> {
        enum Partial {
            Object(Map<String, Value>, Option<String>),
            Array(Vec<Value>),
        }

        let mut stack: Vec<Partial> = Vec::new();
        loop {
            let completed = match self.node {
                NodeKind::PrimitiveValue => self.scalar.take().map(JsonScalar::into_value),
                NodeKind::StartObject => {
                    stack.push(Partial::Object(Map::new(), None));
                    None
                }
                NodeKind::StartArray => {
                    stack.push(Partial::Array(Vec::new()));
                    None
                }
                NodeKind::Property => {
                    if let Some(Partial::Object(_, key)) = stack.last_mut() {
                        *key = self.name.take();
                    }
                    None
                }
                NodeKind::EndObject => match stack.pop() {
                    Some(Partial::Object(map, _)) => Some(Value::Object(map)),
                    _ => return Err(error::internal("unbalanced object in in-stream error")),
                },
                NodeKind::EndArray => match stack.pop() {
                    Some(Partial::Array(items)) => Some(Value::Array(items)),
                    _ => return Err(error::internal("unbalanced array in in-stream error")),
                },
                found => return Err(error::unexpected_node("value", found, "in-stream error")),
            };

            self.advance().await?;

            if let Some(value) = completed {
                match stack.last_mut() {
                    None => return Ok(value),
                    Some(Partial::Object(map, key)) => {
                        if let Some(key) = key.take() {
                            map.insert(key, value);
                        }
                    }
                    Some(Partial::Array(items)) => items.push(value),
                }
            }
        }
    }
}

impl<S: ByteSource> TokenSource for JsonTokenSource<S> {
    fn node_kind(&self) -> NodeKind {
        self.node
    }

    fn property_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn scalar(&self) -> Option<&JsonScalar> {
        self.scalar.as_ref()
    }

    fn set_in_stream_error_detection(&mut self, enabled: bool) {
        self.detect_in_stream_error = enabled;
    }

    async fn read(&mut self) -> Result<NodeKind> {
        let armed = std::mem::take(&mut self.detect_in_stream_error)
            && self.node == NodeKind::StartObject;
        let node = self.advance().await?;

        if armed && node == NodeKind::Property && self.name.as_deref() == Some("error") {
            self.advance().await?;
            let payload = self.materialize_value().await?;
            tracing::debug!(
                target: "odata_batch::token",
                offset = self.window.offset(),
                "in-stream error payload detected"
            );
            return Err(Error::new(Kind::InStreamError { payload }));
        }

        Ok(node)
    }
}
