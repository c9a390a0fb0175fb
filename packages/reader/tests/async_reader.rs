//! Tests for the suspendable reader over tokio readers

use std::io::Cursor;

use futures::StreamExt;
use odata_batch_reader::{
    AsyncBatchReader, BatchEvent, BlockingBatchReader, Kind, ReaderConfig, ReaderState,
};
use tokio_test::io::Builder;

const PAYLOAD: &str = r#"{"requests":[
    {"id":"1","atomicityGroup":"g1","method":"POST","url":"/Customers","body":{"Name":"Ä"}},
    {"id":"2","atomicityGroup":"g1","method":"PATCH","url":"/Customers('1')","dependsOn":["1"]},
    {"id":"3","method":"GET","url":"/Customers","dependsOn":["g1"]}
]}"#;

fn expected_states() -> Vec<ReaderState> {
    vec![
        ReaderState::ChangesetStart,
        ReaderState::Operation,
        ReaderState::Operation,
        ReaderState::ChangesetEnd,
        ReaderState::Operation,
    ]
}

/// Splits `payload` into reads of `size` bytes each.
fn chunked_mock(payload: &[u8], size: usize) -> tokio_test::io::Mock {
    let mut builder = Builder::new();
    for chunk in payload.chunks(size) {
        builder.read(chunk);
    }
    builder.build()
}

#[tokio::test]
async fn test_read_async_over_chunked_input() {
    for size in [1, 3, 7, 64] {
        let mut reader =
            AsyncBatchReader::from_async_reader(chunked_mock(PAYLOAD.as_bytes(), size), ReaderConfig::default());
        let mut states = Vec::new();
        while let Some(event) = reader.read_async().await.expect("read") {
            states.push(event.state());
        }
        assert_eq!(states, expected_states(), "chunk size {size}");
        assert_eq!(reader.state(), ReaderState::Completed);
    }
}

#[tokio::test]
async fn test_stream_yields_decoded_operations() {
    let reader = AsyncBatchReader::from_async_reader(
        chunked_mock(PAYLOAD.as_bytes(), 5),
        ReaderConfig::default().with_read_chunk_size(4),
    );
    let events: Vec<BatchEvent> = reader
        .into_stream()
        .map(|event| event.expect("event"))
        .collect()
        .await;
    assert_eq!(events.len(), 5);

    let first = events[1]
        .as_operation()
        .and_then(|op| op.as_request())
        .expect("request");
    assert_eq!(first.body.as_bytes(), r#"{"Name":"Ä"}"#.as_bytes());

    let last = events[4]
        .as_operation()
        .and_then(|op| op.as_request())
        .expect("request");
    assert_eq!(last.depends_on, ["1", "2"]);
}

#[tokio::test]
async fn test_stream_ends_after_first_error() {
    let payload = r#"{"requests":[{"id":"1","method":"GET","url":"/A"},{"id":"2","bogus":1}]}"#;
    // a single read, so the mock has nothing left over when decoding stops
    let mock = Builder::new().read(payload.as_bytes()).build();
    let reader = AsyncBatchReader::from_async_reader(mock, ReaderConfig::default());
    let results: Vec<_> = reader.into_stream().collect().await;
    assert_eq!(results.len(), 2);
    assert!(results[0].is_ok());
    let err = results[1].as_ref().expect_err("unknown property");
    assert!(matches!(err.kind(), Kind::UnknownProperty { .. }));
}

#[tokio::test]
async fn test_io_errors_surface_as_io_kind() {
    let mock = Builder::new()
        .read(br#"{"requests":[{"id""#)
        .read_error(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset"))
        .build();
    let mut reader = AsyncBatchReader::from_async_reader(mock, ReaderConfig::default());
    let err = reader.read_async().await.expect_err("io failure");
    assert!(err.is_io());
    assert_eq!(
        err.kind(),
        &Kind::Io {
            kind: std::io::ErrorKind::ConnectionReset
        }
    );
    assert_eq!(reader.state(), ReaderState::Failed);
}

#[test]
fn test_blocking_reader_matches_async_reader() {
    let config = ReaderConfig::default().with_read_chunk_size(2);
    let reader = BlockingBatchReader::from_reader(Cursor::new(PAYLOAD.as_bytes()), config);
    let states: Vec<ReaderState> = reader
        .map(|event| event.expect("event").state())
        .collect();
    assert_eq!(states, expected_states());
}

#[test]
fn test_block_on_drives_the_async_reader() {
    let mut reader = AsyncBatchReader::from_async_reader(PAYLOAD.as_bytes(), ReaderConfig::default());
    let count = tokio_test::block_on(async {
        let mut count = 0;
        while reader.read_async().await.expect("read").is_some() {
            count += 1;
        }
        count
    });
    assert_eq!(count, 5);
}
