//! BatchReader: the pull state machine over a token source
//!
//! All scanning is written once as `async` code; the blocking API drives the
//! same futures to completion. The reader holds at most one scanned item
//! (`pending`) ahead of what it has emitted, which is what lets it report a
//! changeset end before the item that caused it.

use http::Method;

use super::transitions::{
    transition_to_changeset_end, transition_to_changeset_start, transition_to_completed,
    transition_to_failed, transition_to_operation,
};
use super::types::{
    BatchEvent, BatchOperation, BatchRequest, BatchResponse, ReaderState, ReaderStats,
};
use crate::atomic_group::AtomicGroupCache;
use crate::body::BodyContentBuffer;
use crate::config::{BatchMode, ReaderConfig};
use crate::dependency::DependencyValidator;
use crate::error::{self, Error, Kind, Result};
use crate::item::{PayloadItemPropertyCache, PropertyName};
use crate::token::{NodeKind, TokenSource};

/// Header name carrying the group id on grouped requests.
const ATOMICITY_GROUP_HEADER: &str = "atomicityGroup";

/// Pull-based reader over a JSON batch payload.
#[derive(Debug)]
pub struct BatchReader<S> {
    pub(super) source: S,
    pub(super) config: ReaderConfig,
    pub(super) mode: Option<BatchMode>,
    pub(super) state: ReaderState,
    pub(super) pending: Option<PayloadItemPropertyCache>,
    pub(super) groups: AtomicGroupCache,
    pub(super) dependencies: DependencyValidator,
    pub(super) current_group: Option<String>,
    pub(super) parts: usize,
    pub(super) changeset_operations: usize,
    pub(super) stats: ReaderStats,
}

impl<S: TokenSource> BatchReader<S> {
    /// Create a reader over `source`, which must be positioned before the payload.
    pub fn new(source: S, config: ReaderConfig) -> Self {
        Self {
            source,
            config,
            mode: None,
            state: ReaderState::Initial,
            pending: None,
            groups: AtomicGroupCache::new(),
            dependencies: DependencyValidator::new(),
            current_group: None,
            parts: 0,
            changeset_operations: 0,
            stats: ReaderStats::default(),
        }
    }

    #[must_use]
    pub fn state(&self) -> ReaderState {
        self.state
    }

    /// The batch mode named by the payload, once the top level has been read.
    #[must_use]
    pub fn mode(&self) -> Option<BatchMode> {
        self.mode
    }

    #[must_use]
    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    #[must_use]
    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    /// Atomicity groups seen so far.
    #[must_use]
    pub fn atomic_groups(&self) -> &AtomicGroupCache {
        &self.groups
    }

    pub fn into_inner(self) -> S {
        self.source
    }

    /// Advances one step.
    ///
    /// Returns `Ok(None)` once the payload is complete. Any error moves the
    /// reader to [`ReaderState::Failed`]; reads after that fail with
    /// `ReaderFailed`.
    pub async fn read_async(&mut self) -> Result<Option<BatchEvent>> {
        match self.state {
            ReaderState::Completed => return Ok(None),
            ReaderState::Failed => return Err(Error::new(Kind::ReaderFailed)),
            _ => {}
        }

        match self.step().await {
            Ok(event) => Ok(event),
            Err(err) => {
                tracing::error!(
                    target: "odata_batch::reader",
                    error = %err,
                    state = %self.state,
                    "batch reader failed"
                );
                transition_to_failed(self);
                Err(err)
            }
        }
    }

    async fn step(&mut self) -> Result<Option<BatchEvent>> {
        match self.state {
            ReaderState::Initial => {
                self.start().await?;
                if self.source.node_kind() == NodeKind::StartObject {
                    self.scan_pending().await?;
                    self.enter_item_boundary().map(Some)
                } else {
                    self.finish().await?;
                    Ok(None)
                }
            }
            ReaderState::ChangesetStart => {
                transition_to_operation(self);
                self.emit_operation().map(Some)
            }
            ReaderState::Operation => {
                if self.source.node_kind() == NodeKind::StartObject {
                    self.scan_pending().await?;
                    let group = self
                        .pending
                        .as_ref()
                        .and_then(PayloadItemPropertyCache::atomicity_group);
                    if self.groups.is_changeset_end(group) {
                        return Ok(Some(self.close_changeset()));
                    }
                    self.enter_item_boundary().map(Some)
                } else if self.groups.is_changeset_end(None) {
                    Ok(Some(self.close_changeset()))
                } else {
                    self.finish().await?;
                    Ok(None)
                }
            }
            ReaderState::ChangesetEnd => {
                if self.pending.is_some() {
                    self.enter_item_boundary().map(Some)
                } else {
                    self.finish().await?;
                    Ok(None)
                }
            }
            ReaderState::Completed | ReaderState::Failed => {
                Err(error::internal("step called in a terminal state"))
            }
        }
    }

    /// Reads `{"requests": [` or `{"responses": [`.
    async fn start(&mut self) -> Result<()> {
        if self.source.node_kind() == NodeKind::None {
            self.source.read().await?;
        }
        self.source.read_start_object("batch payload").await?;

        let name = self.source.read_property_name("batch payload").await?;
        let Some(detected) = BatchMode::from_property_name(&name) else {
            return Err(Error::new(Kind::InvalidTopLevelProperty { property: name }));
        };
        if !self.config.mode.accepts(detected) {
            return Err(Error::new(Kind::BatchModeMismatch {
                expected: self.config.mode,
                found: detected,
            }));
        }
        self.mode = Some(detected);
        tracing::debug!(target: "odata_batch::reader", mode = %detected, "batch mode detected");

        self.source.read_start_array("batch items").await
    }

    /// Reads `]}` and the end of input.
    async fn finish(&mut self) -> Result<()> {
        self.source.read_end_array("batch items").await?;
        if self.source.node_kind() == NodeKind::Property {
            let property = self.source.property_name().unwrap_or_default().to_owned();
            return Err(Error::new(Kind::InvalidTopLevelProperty { property }));
        }
        self.source.read_end_object("batch payload").await?;
        self.source.expect_node(NodeKind::EndOfInput, "batch payload")?;

        transition_to_completed(self);
        tracing::debug!(
            target: "odata_batch::reader",
            operations = self.stats.operations_emitted,
            changesets = self.stats.changesets_closed,
            "batch completed"
        );
        Ok(())
    }

    async fn scan_pending(&mut self) -> Result<()> {
        let mode = self
            .mode
            .ok_or_else(|| error::internal("item scanned before batch mode was detected"))?;
        let item = PayloadItemPropertyCache::scan(&mut self.source, mode, &self.config).await?;
        self.stats.items_scanned += 1;
        self.pending = Some(item);
        Ok(())
    }

    /// Decides whether the pending item opens a changeset or is emitted directly.
    fn enter_item_boundary(&mut self) -> Result<BatchEvent> {
        let item = self
            .pending
            .as_ref()
            .ok_or_else(|| error::internal("no pending item at item boundary"))?;

        if let Some(group_id) = item.atomicity_group() {
            let message_id = item.id().ok_or_else(|| error::missing_property("id"))?;
            if self.groups.add_message_id_and_group_id(message_id, group_id)? {
                let group_id = group_id.to_owned();
                self.count_part()?;
                transition_to_changeset_start(self, &group_id);
                return Ok(BatchEvent::ChangesetStart { group_id });
            }
        }

        transition_to_operation(self);
        self.emit_operation()
    }

    fn close_changeset(&mut self) -> BatchEvent {
        let group_id = transition_to_changeset_end(self);
        BatchEvent::ChangesetEnd { group_id }
    }

    fn count_part(&mut self) -> Result<()> {
        self.parts += 1;
        if self.parts > self.config.max_parts_per_batch {
            return Err(Error::new(Kind::MaxPartsPerBatchExceeded {
                max: self.config.max_parts_per_batch,
            }));
        }
        Ok(())
    }

    /// Builds the descriptor for the pending item and discards the item.
    fn emit_operation(&mut self) -> Result<BatchEvent> {
        let item = self
            .pending
            .take()
            .ok_or_else(|| error::internal("no pending item to emit"))?;

        if item.atomicity_group().is_some() {
            self.changeset_operations += 1;
            if self.changeset_operations > self.config.max_operations_per_changeset {
                return Err(Error::new(Kind::MaxOperationsPerChangesetExceeded {
                    group_id: self.current_group.clone().unwrap_or_default(),
                    max: self.config.max_operations_per_changeset,
                }));
            }
        } else {
            self.count_part()?;
        }

        let operation = match self.mode {
            Some(BatchMode::Responses) => BatchOperation::Response(self.build_response(item)?),
            _ => BatchOperation::Request(self.build_request(item)?),
        };
        self.stats.operations_emitted += 1;
        tracing::debug!(
            target: "odata_batch::reader",
            id = operation.content_id(),
            group = operation.atomicity_group(),
            "operation decoded"
        );
        Ok(BatchEvent::Operation(operation))
    }

    fn build_request(&mut self, mut item: PayloadItemPropertyCache) -> Result<BatchRequest> {
        let id = item
            .take_text(PropertyName::Id)
            .ok_or_else(|| error::missing_property("id"))?;
        let method_text = item
            .take_text(PropertyName::Method)
            .ok_or_else(|| error::missing_property("method"))?;
        let method = Method::from_bytes(method_text.to_uppercase().as_bytes()).map_err(|err| {
            error::invalid_property_value("method", format!("'{method_text}' is not an HTTP method"))
                .with(err)
        })?;
        let url = item
            .take_text(PropertyName::Url)
            .ok_or_else(|| error::missing_property("url"))?;
        let atomicity_group = item.take_text(PropertyName::AtomicityGroup);

        let depends_on = item.take_depends_on().unwrap_or_default();
        self.dependencies
            .validate(&self.groups, &id, atomicity_group.as_deref(), &depends_on)?;
        let depends_on = self.groups.flattened_message_ids(&depends_on);

        let mut headers = item.take_headers().unwrap_or_default();
        if let Some(group_id) = &atomicity_group {
            headers.insert_if_absent(ATOMICITY_GROUP_HEADER, group_id.as_str());
        }
        let body = self.take_body(&mut item)?;

        self.dependencies.record(&id);
        Ok(BatchRequest {
            id,
            method,
            url,
            headers,
            body,
            atomicity_group,
            depends_on,
        })
    }

    fn build_response(&mut self, mut item: PayloadItemPropertyCache) -> Result<BatchResponse> {
        let id = item
            .take_text(PropertyName::Id)
            .ok_or_else(|| error::missing_property("id"))?;
        let status = item
            .status()
            .ok_or_else(|| error::missing_property("status"))?;
        let atomicity_group = item.take_text(PropertyName::AtomicityGroup);
        let headers = item.take_headers().unwrap_or_default();
        let body = self.take_body(&mut item)?;

        self.dependencies.record(&id);
        Ok(BatchResponse {
            id,
            status,
            headers,
            body,
            atomicity_group,
        })
    }

    fn take_body(&mut self, item: &mut PayloadItemPropertyCache) -> Result<BodyContentBuffer> {
        let body = item
            .take_body()
            .unwrap_or_else(|| BodyContentBuffer::empty(&self.config));
        let length = body.content_length()?;
        self.stats.body_bytes += length as u64;
        Ok(body)
    }
}
