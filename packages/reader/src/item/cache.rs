//! PayloadItemPropertyCache: one scanned batch item

use hashbrown::HashMap;

use super::headers::BatchHeaders;
use super::properties::{PropertyName, PropertyValue};
use crate::body::{BodyContentBuffer, copy_subtree};
use crate::config::{BatchMode, ReaderConfig};
use crate::error::{self, Kind, Result};
use crate::token::{JsonScalar, NodeKind, TokenSource, write_json_string};

/// Normalized property map of a single batch item.
///
/// Scanning consumes exactly one JSON object. Property names are matched
/// without regard to case; duplicates and unknown names are errors. Whether
/// required properties are present is left to the consumer.
#[derive(Debug, Clone, Default)]
pub struct PayloadItemPropertyCache {
    properties: HashMap<PropertyName, PropertyValue>,
}

impl PayloadItemPropertyCache {
    /// Scans the item object under the cursor and moves past it.
    ///
    /// `mode` is the detected batch mode; in a batch of responses an
    /// in-stream error payload inside `body` is kept as the body text.
    pub async fn scan<T: TokenSource>(
        source: &mut T,
        mode: BatchMode,
        config: &ReaderConfig,
    ) -> Result<Self> {
        let mut cache = Self::default();
        source.read_start_object("batch item").await?;

        while source.node_kind() != NodeKind::EndObject {
            let raw = source.read_property_name("batch item").await?;
            let Some(name) = PropertyName::from_normalized(&PropertyName::normalize(&raw)) else {
                return Err(error::unknown_property(raw));
            };
            if cache.properties.contains_key(&name) {
                return Err(error::duplicate_property(raw));
            }
            tracing::trace!(target: "odata_batch::item", property = %name, "scanning item property");

            let value = match name {
                PropertyName::Id
                | PropertyName::AtomicityGroup
                | PropertyName::Method
                | PropertyName::Url => PropertyValue::Text(read_text(source, name).await?),
                PropertyName::Status => PropertyValue::Status(read_status(source).await?),
                PropertyName::DependsOn => PropertyValue::DependsOn(read_depends_on(source).await?),
                PropertyName::Headers => {
                    let headers = read_headers(source).await?;
                    if let Some(PropertyValue::Body(body)) =
                        cache.properties.get_mut(&PropertyName::Body)
                        && body.is_captured()
                    {
                        body.populate_cached(headers.content_type())?;
                    }
                    PropertyValue::Headers(headers)
                }
                PropertyName::Body => {
                    let mut body = BodyContentBuffer::new(config);
                    capture_body(source, mode, &mut body).await?;
                    if let Some(PropertyValue::Headers(headers)) =
                        cache.properties.get(&PropertyName::Headers)
                    {
                        body.populate_cached(headers.content_type())?;
                    }
                    PropertyValue::Body(body)
                }
            };
            cache.properties.insert(name, value);
        }

        source.read_end_object("batch item").await?;

        if let Some(PropertyValue::Body(body)) = cache.properties.get_mut(&PropertyName::Body)
            && body.is_captured()
        {
            body.populate_cached(None)?;
        }
        Ok(cache)
    }

    #[must_use]
    pub fn get(&self, name: PropertyName) -> Option<&PropertyValue> {
        self.properties.get(&name)
    }

    #[must_use]
    pub fn contains(&self, name: PropertyName) -> bool {
        self.properties.contains_key(&name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Removes and returns a property value.
    pub fn take(&mut self, name: PropertyName) -> Option<PropertyValue> {
        self.properties.remove(&name)
    }

    fn text(&self, name: PropertyName) -> Option<&str> {
        match self.properties.get(&name) {
            Some(PropertyValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.text(PropertyName::Id)
    }

    #[must_use]
    pub fn atomicity_group(&self) -> Option<&str> {
        self.text(PropertyName::AtomicityGroup)
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self.properties.get(&PropertyName::Status) {
            Some(PropertyValue::Status(status)) => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn headers(&self) -> Option<&BatchHeaders> {
        match self.properties.get(&PropertyName::Headers) {
            Some(PropertyValue::Headers(headers)) => Some(headers),
            _ => None,
        }
    }

    #[must_use]
    pub fn depends_on(&self) -> Option<&[String]> {
        match self.properties.get(&PropertyName::DependsOn) {
            Some(PropertyValue::DependsOn(ids)) => Some(ids),
            _ => None,
        }
    }

    #[must_use]
    pub fn body(&self) -> Option<&BodyContentBuffer> {
        match self.properties.get(&PropertyName::Body) {
            Some(PropertyValue::Body(body)) => Some(body),
            _ => None,
        }
    }

    pub fn take_text(&mut self, name: PropertyName) -> Option<String> {
        match self.properties.remove(&name) {
            Some(PropertyValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn take_depends_on(&mut self) -> Option<Vec<String>> {
        match self.properties.remove(&PropertyName::DependsOn) {
            Some(PropertyValue::DependsOn(ids)) => Some(ids),
            _ => None,
        }
    }

    pub fn take_headers(&mut self) -> Option<BatchHeaders> {
        match self.properties.remove(&PropertyName::Headers) {
            Some(PropertyValue::Headers(headers)) => Some(headers),
            _ => None,
        }
    }

    pub fn take_body(&mut self) -> Option<BodyContentBuffer> {
        match self.properties.remove(&PropertyName::Body) {
            Some(PropertyValue::Body(body)) => Some(body),
            _ => None,
        }
    }
}

fn describe<T: TokenSource>(source: &T) -> String {
    match source.scalar() {
        Some(scalar) => scalar.type_name().to_owned(),
        None => source.node_kind().as_str().to_owned(),
    }
}

async fn read_text<T: TokenSource>(source: &mut T, name: PropertyName) -> Result<String> {
    if source.scalar().and_then(JsonScalar::as_str).is_none() {
        return Err(error::invalid_property_value(
            name.as_str(),
            format!("expected a string, found {}", describe(source)),
        ));
    }
    source.read_string_value(name.as_str()).await
}

async fn read_status<T: TokenSource>(source: &mut T) -> Result<u16> {
    let status = source
        .scalar()
        .and_then(JsonScalar::as_i64)
        .and_then(|status| u16::try_from(status).ok());
    let Some(status) = status else {
        return Err(error::invalid_property_value(
            "status",
            format!("expected an integer status code, found {}", describe(source)),
        ));
    };
    source.read().await?;
    Ok(status)
}

async fn read_depends_on<T: TokenSource>(source: &mut T) -> Result<Vec<String>> {
    source.read_start_array("dependsOn").await?;
    let mut ids = Vec::new();
    while source.node_kind() != NodeKind::EndArray {
        if source.scalar().and_then(JsonScalar::as_str).is_none() {
            return Err(error::invalid_property_value(
                "dependsOn",
                format!("expected string ids, found {}", describe(source)),
            ));
        }
        ids.push(source.read_string_value("dependsOn").await?);
    }
    source.read_end_array("dependsOn").await?;
    Ok(ids)
}

async fn read_headers<T: TokenSource>(source: &mut T) -> Result<BatchHeaders> {
    source.read_start_object("headers").await?;
    let mut headers = BatchHeaders::new();
    while source.node_kind() != NodeKind::EndObject {
        let name = source.read_property_name("headers").await?;
        let value = match source.scalar() {
            Some(JsonScalar::Null) => {
                return Err(error::invalid_property_value(
                    "headers",
                    format!("header '{name}' has a null value"),
                ));
            }
            Some(scalar) => scalar.to_text(),
            None => {
                return Err(error::invalid_property_value(
                    "headers",
                    format!("header '{name}' must have a primitive value, found {}", describe(source)),
                ));
            }
        };
        source.read().await?;
        headers.try_insert(name, value)?;
    }
    source.read_end_object("headers").await?;
    Ok(headers)
}

/// Captures the body, absorbing an in-stream error payload in responses.
///
/// A response body is an in-stream error only when `error` is its first
/// member and every other member is an `@` annotation. Any other object
/// that starts with `error` is kept whole as a JSON body.
async fn capture_body<T: TokenSource>(
    source: &mut T,
    mode: BatchMode,
    body: &mut BodyContentBuffer,
) -> Result<()> {
    let detect = mode == BatchMode::Responses && source.node_kind() == NodeKind::StartObject;
    source.set_in_stream_error_detection(detect);
    let captured = body.capture(source).await;
    source.set_in_stream_error_detection(false);

    let err = match captured {
        Ok(()) => return Ok(()),
        Err(err) if detect && err.is_in_stream_error() => err,
        Err(err) => return Err(err),
    };
    let Kind::InStreamError { payload } = err.into_kind() else {
        return Err(error::internal("in-stream error without payload"));
    };

    // cursor is inside the body object, just past the `error` member
    let mut json = String::from("{\"error\":");
    json.push_str(&payload.to_string());
    let mut has_data_member = false;
    while source.node_kind() != NodeKind::EndObject {
        let name = source.read_property_name("body").await?;
        has_data_member |= !name.starts_with('@');
        json.push(',');
        write_json_string(&name, &mut json);
        json.push(':');
        copy_subtree(source, &mut json).await?;
    }
    source.read_end_object("body").await?;
    json.push('}');

    if has_data_member {
        body.capture_json(json);
        return Ok(());
    }

    tracing::warn!(
        target: "odata_batch::item",
        "in-stream error payload kept as response body"
    );
    body.capture_opaque(format!("{{\"error\":{payload}}}"));
    Ok(())
}
