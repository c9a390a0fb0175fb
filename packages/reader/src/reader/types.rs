//! Reader states, events and operation descriptors

use std::fmt;

use http::{Method, StatusCode};

use crate::body::BodyContentBuffer;
use crate::item::BatchHeaders;

/// Position of the reader within the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReaderState {
    /// Nothing read yet
    Initial,
    /// Positioned at the first item of an atomicity group
    ChangesetStart,
    /// Positioned at a request or response
    Operation,
    /// An atomicity group's run has ended
    ChangesetEnd,
    /// The whole payload was consumed
    Completed,
    /// A read failed; the reader cannot continue
    Failed,
}

impl ReaderState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ReaderState::Initial => "Initial",
            ReaderState::ChangesetStart => "ChangesetStart",
            ReaderState::Operation => "Operation",
            ReaderState::ChangesetEnd => "ChangesetEnd",
            ReaderState::Completed => "Completed",
            ReaderState::Failed => "Failed",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, ReaderState::Completed | ReaderState::Failed)
    }
}

impl fmt::Display for ReaderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One step of the reader.
#[derive(Debug, Clone)]
pub enum BatchEvent {
    ChangesetStart { group_id: String },
    Operation(BatchOperation),
    ChangesetEnd { group_id: String },
}

impl BatchEvent {
    /// The reader state this event corresponds to.
    #[must_use]
    pub fn state(&self) -> ReaderState {
        match self {
            BatchEvent::ChangesetStart { .. } => ReaderState::ChangesetStart,
            BatchEvent::Operation(_) => ReaderState::Operation,
            BatchEvent::ChangesetEnd { .. } => ReaderState::ChangesetEnd,
        }
    }

    #[must_use]
    pub fn as_operation(&self) -> Option<&BatchOperation> {
        match self {
            BatchEvent::Operation(operation) => Some(operation),
            _ => None,
        }
    }

    pub fn into_operation(self) -> Option<BatchOperation> {
        match self {
            BatchEvent::Operation(operation) => Some(operation),
            _ => None,
        }
    }
}

/// A decoded request or response.
#[derive(Debug, Clone)]
pub enum BatchOperation {
    Request(BatchRequest),
    Response(BatchResponse),
}

impl BatchOperation {
    #[must_use]
    pub fn content_id(&self) -> &str {
        match self {
            BatchOperation::Request(request) => &request.id,
            BatchOperation::Response(response) => &response.id,
        }
    }

    #[must_use]
    pub fn atomicity_group(&self) -> Option<&str> {
        match self {
            BatchOperation::Request(request) => request.atomicity_group.as_deref(),
            BatchOperation::Response(response) => response.atomicity_group.as_deref(),
        }
    }

    #[must_use]
    pub fn headers(&self) -> &BatchHeaders {
        match self {
            BatchOperation::Request(request) => &request.headers,
            BatchOperation::Response(response) => &response.headers,
        }
    }

    #[must_use]
    pub fn body(&self) -> &BodyContentBuffer {
        match self {
            BatchOperation::Request(request) => &request.body,
            BatchOperation::Response(response) => &response.body,
        }
    }

    #[must_use]
    pub fn as_request(&self) -> Option<&BatchRequest> {
        match self {
            BatchOperation::Request(request) => Some(request),
            BatchOperation::Response(_) => None,
        }
    }

    #[must_use]
    pub fn as_response(&self) -> Option<&BatchResponse> {
        match self {
            BatchOperation::Response(response) => Some(response),
            BatchOperation::Request(_) => None,
        }
    }
}

/// A request item.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub id: String,
    pub method: Method,
    pub url: String,
    /// Includes a synthetic `atomicityGroup` header for grouped requests
    pub headers: BatchHeaders,
    pub body: BodyContentBuffer,
    pub atomicity_group: Option<String>,
    /// `dependsOn` with group ids expanded into member ids
    pub depends_on: Vec<String>,
}

impl BatchRequest {
    #[must_use]
    pub fn content_id(&self) -> &str {
        &self.id
    }
}

/// A response item.
#[derive(Debug, Clone)]
pub struct BatchResponse {
    pub id: String,
    pub status: u16,
    pub headers: BatchHeaders,
    pub body: BodyContentBuffer,
    pub atomicity_group: Option<String>,
}

impl BatchResponse {
    #[must_use]
    pub fn content_id(&self) -> &str {
        &self.id
    }

    /// The status as an `http::StatusCode`, if it is a valid code.
    #[must_use]
    pub fn status_code(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.status).ok()
    }
}

/// Counters kept while reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderStats {
    /// Item objects scanned
    pub items_scanned: u64,
    /// Requests and responses emitted
    pub operations_emitted: u64,
    pub changesets_opened: u64,
    pub changesets_closed: u64,
    /// Total length of emitted bodies
    pub body_bytes: u64,
    pub state_transitions: u64,
}
