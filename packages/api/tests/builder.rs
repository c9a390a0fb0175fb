//! Tests for the fluent batch reader builder

use std::io::Cursor;

use odata_batch::{
    BatchEvent, BatchMode, BatchReaderBuilder, ConfigurationError, Kind, OdataBatch, ReaderState,
    TextEncoding,
};

const REQUESTS: &str = r#"{"requests":[
    {"id":"1","atomicityGroup":"g1","method":"POST","url":"/Customers","body":{"Name":"A"}},
    {"id":"2","atomicityGroup":"g1","method":"PATCH","url":"/Customers('1')","dependsOn":["1"]},
    {"id":"3","method":"GET","url":"/Customers?$top=1","dependsOn":["g1"]}
]}"#;

const RESPONSES: &str = r#"{"responses":[
    {"id":"1","status":200,"headers":{"content-type":"text/plain"},"body":"ok"}
]}"#;

#[test]
fn test_builder_collects_configuration() {
    let builder = odata_batch::requests()
        .max_message_size(1024)
        .max_parts_per_batch(5)
        .max_operations_per_changeset(3)
        .encoding(TextEncoding::Utf16Le)
        .read_chunk_size(256)
        .max_nesting_depth(16);

    let config = builder.config();
    assert_eq!(config.mode, BatchMode::Requests);
    assert_eq!(config.max_message_size, 1024);
    assert_eq!(config.max_parts_per_batch, 5);
    assert_eq!(config.max_operations_per_changeset, 3);
    assert_eq!(config.encoding, TextEncoding::Utf16Le);
    assert_eq!(config.read_chunk_size, 256);
    assert_eq!(config.max_nesting_depth, 16);
}

#[test]
fn test_presets_keep_the_mode() {
    let builder = odata_batch::responses().strict();
    assert_eq!(builder.config().mode, BatchMode::Responses);
    assert_eq!(builder.config().max_parts_per_batch, 50);

    let builder = OdataBatch::auto().permissive();
    assert_eq!(builder.config().mode, BatchMode::Auto);
    assert_eq!(builder.config().max_parts_per_batch, 10_000);
}

#[test]
fn test_invalid_configuration_is_rejected() {
    let err = odata_batch::auto()
        .max_message_size(0)
        .slice(REQUESTS)
        .expect_err("zero size");
    assert!(matches!(
        err.kind(),
        Kind::Configuration(ConfigurationError::InvalidLimit(_))
    ));

    let err = odata_batch::auto()
        .max_nesting_depth(2)
        .collect_events(REQUESTS)
        .expect_err("too shallow");
    assert!(matches!(
        err.kind(),
        Kind::Configuration(ConfigurationError::Conflict(_))
    ));

    let err = BatchReaderBuilder::from_config_json("{").expect_err("bad document");
    assert!(matches!(
        err.kind(),
        Kind::Configuration(ConfigurationError::Parse(_))
    ));
}

#[test]
fn test_collect_operations_from_slice() {
    let operations = odata_batch::requests()
        .collect_operations(REQUESTS)
        .expect("operations");
    assert_eq!(operations.len(), 3);
    assert_eq!(operations[0].content_id(), "1");
    assert_eq!(operations[0].atomicity_group(), Some("g1"));

    let last = operations[2].as_request().expect("request");
    assert_eq!(last.method, odata_batch::Method::GET);
    assert_eq!(last.depends_on, ["1", "2"]);
}

#[test]
fn test_collect_events_reports_changesets() {
    let events = odata_batch::auto().collect_events(REQUESTS).expect("events");
    let states: Vec<ReaderState> = events.iter().map(BatchEvent::state).collect();
    assert_eq!(
        states,
        [
            ReaderState::ChangesetStart,
            ReaderState::Operation,
            ReaderState::Operation,
            ReaderState::ChangesetEnd,
            ReaderState::Operation,
        ]
    );
}

#[test]
fn test_mode_mismatch_through_builder() {
    let err = odata_batch::requests()
        .collect_events(RESPONSES)
        .expect_err("mode mismatch");
    assert!(matches!(err.kind(), Kind::BatchModeMismatch { .. }));
}

#[test]
fn test_blocking_reader_from_std_read() {
    let mut reader = odata_batch::responses()
        .read_chunk_size(3)
        .reader(Cursor::new(RESPONSES.as_bytes()))
        .expect("reader");
    let event = reader.read().expect("read").expect("event");
    let response = event
        .as_operation()
        .and_then(|op| op.as_response())
        .expect("response");
    assert_eq!(response.status_code(), Some(odata_batch::StatusCode::OK));
    assert_eq!(response.body.as_bytes(), b"ok");
    assert!(reader.read().expect("read").is_none());
}

#[tokio::test]
async fn test_async_collection() {
    let mock = tokio_test::io::Builder::new()
        .read(&REQUESTS.as_bytes()[..40])
        .read(&REQUESTS.as_bytes()[40..])
        .build();
    let operations = odata_batch::requests()
        .read_chunk_size(16)
        .collect_operations_async(mock)
        .await
        .expect("operations");
    assert_eq!(operations.len(), 3);
}

#[tokio::test]
async fn test_stream_entry_point() {
    use futures::StreamExt;

    let stream = odata_batch::auto()
        .stream(REQUESTS.as_bytes())
        .expect("stream");
    let count = stream.filter(|event| futures::future::ready(event.is_ok())).count().await;
    assert_eq!(count, 5);
}
