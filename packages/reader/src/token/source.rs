//! The pull-based token cursor consumed by the batch engine

use super::types::{JsonScalar, NodeKind};
use crate::error::{self, Result};

/// A single-owner JSON token cursor.
///
/// A source starts positioned on [`NodeKind::None`]; every [`read`](Self::read)
/// advances exactly one node. Reads are `async` so a source may suspend while
/// waiting for input; sources backed by complete input resolve immediately and
/// can be driven with a blocking executor.
#[allow(async_fn_in_trait)]
pub trait TokenSource {
    /// Kind of the current node.
    fn node_kind(&self) -> NodeKind;

    /// Name of the current node when it is a [`NodeKind::Property`].
    fn property_name(&self) -> Option<&str>;

    /// Value of the current node when it is a [`NodeKind::PrimitiveValue`].
    fn scalar(&self) -> Option<&JsonScalar>;

    /// Arms (or disarms) in-stream error detection for the next read.
    ///
    /// When armed while positioned on a `StartObject`, a read that lands on a
    /// first property named `error` consumes that property's value and fails
    /// with [`Kind::InStreamError`](crate::error::Kind::InStreamError),
    /// leaving the cursor inside the object. Sources without the capability
    /// ignore the call.
    fn set_in_stream_error_detection(&mut self, enabled: bool) {
        let _ = enabled;
    }

    /// Advance to the next node.
    async fn read(&mut self) -> Result<NodeKind>;

    /// Fails unless the current node is `expected`.
    fn expect_node(&self, expected: NodeKind, context: &'static str) -> Result<()> {
        let found = self.node_kind();
        if found == expected {
            Ok(())
        } else {
            Err(error::unexpected_node(expected.as_str(), found, context))
        }
    }

    async fn read_start_object(&mut self, context: &'static str) -> Result<()> {
        self.expect_node(NodeKind::StartObject, context)?;
        self.read().await?;
        Ok(())
    }

    async fn read_end_object(&mut self, context: &'static str) -> Result<()> {
        self.expect_node(NodeKind::EndObject, context)?;
        self.read().await?;
        Ok(())
    }

    async fn read_start_array(&mut self, context: &'static str) -> Result<()> {
        self.expect_node(NodeKind::StartArray, context)?;
        self.read().await?;
        Ok(())
    }

    async fn read_end_array(&mut self, context: &'static str) -> Result<()> {
        self.expect_node(NodeKind::EndArray, context)?;
        self.read().await?;
        Ok(())
    }

    /// Returns the current property name and moves to its value.
    async fn read_property_name(&mut self, context: &'static str) -> Result<String> {
        self.expect_node(NodeKind::Property, context)?;
        let name = self.property_name().unwrap_or_default().to_owned();
        self.read().await?;
        Ok(name)
    }

    /// Returns the current primitive value and moves past it.
    async fn read_primitive_value(&mut self, context: &'static str) -> Result<JsonScalar> {
        self.expect_node(NodeKind::PrimitiveValue, context)?;
        let value = self.scalar().cloned().unwrap_or(JsonScalar::Null);
        self.read().await?;
        Ok(value)
    }

    /// Returns the current string value and moves past it.
    async fn read_string_value(&mut self, context: &'static str) -> Result<String> {
        if self.scalar().and_then(JsonScalar::as_str).is_none() {
            return Err(error::unexpected_node("string value", self.node_kind(), context));
        }
        let value = self.read_primitive_value(context).await?;
        value
            .into_string()
            .ok_or_else(|| error::internal("string scalar changed while reading"))
    }

    /// Skips the current value, including any nested content.
    async fn skip_value(&mut self) -> Result<()> {
        match self.node_kind() {
            NodeKind::PrimitiveValue => {
                self.read().await?;
                return Ok(());
            }
            NodeKind::StartObject | NodeKind::StartArray => {}
            found => return Err(error::unexpected_node("value", found, "skipped value")),
        }

        let mut depth = 0usize;
        loop {
            match self.node_kind() {
                NodeKind::StartObject | NodeKind::StartArray => depth += 1,
                NodeKind::EndObject | NodeKind::EndArray => depth -= 1,
                NodeKind::EndOfInput | NodeKind::None => {
                    return Err(error::unexpected_node(
                        "end of container",
                        self.node_kind(),
                        "skipped value",
                    ));
                }
                NodeKind::Property | NodeKind::PrimitiveValue => {}
            }
            self.read().await?;
            if depth == 0 {
                return Ok(());
            }
        }
    }
}
