//! Tests for the bundled JSON token source

use std::io::Cursor;

use bytes::Bytes;
use futures::executor::block_on;
use odata_batch_reader::{
    BlockingRead, JsonScalar, JsonTokenSource, Kind, NodeKind, ReaderConfig, TokenSource,
};

fn nodes<S: TokenSource>(source: &mut S) -> Result<Vec<NodeKind>, Kind> {
    let mut kinds = Vec::new();
    loop {
        let node = block_on(source.read()).map_err(|e| e.into_kind())?;
        kinds.push(node);
        if node == NodeKind::EndOfInput {
            return Ok(kinds);
        }
    }
}

fn from_str(json: &'static str) -> JsonTokenSource<Bytes> {
    JsonTokenSource::new(Bytes::from_static(json.as_bytes()))
}

#[test]
fn test_node_sequence() {
    use NodeKind::*;
    let mut source = from_str(r#"{"a":[1,"x",{}],"b":null}"#);
    assert_eq!(source.node_kind(), None);
    assert_eq!(
        nodes(&mut source),
        Ok(vec![
            StartObject,
            Property,
            StartArray,
            PrimitiveValue,
            PrimitiveValue,
            StartObject,
            EndObject,
            EndArray,
            Property,
            PrimitiveValue,
            EndObject,
            EndOfInput,
        ])
    );
    // reading past the end stays at the end
    assert_eq!(block_on(source.read()).expect("read"), EndOfInput);
}

#[test]
fn test_property_names_and_scalars() {
    let mut source = from_str(r#"{"name":"value","n":-1.5e3}"#);
    block_on(async {
        source.read().await.expect("start");
        source.read_start_object("test").await.expect("object");
        assert_eq!(source.read_property_name("test").await.expect("name"), "name");
        assert_eq!(source.read_string_value("test").await.expect("value"), "value");
        assert_eq!(source.property_name(), Some("n"));
        source.read().await.expect("value");
        assert_eq!(source.scalar(), Some(&JsonScalar::Number("-1.5e3".to_owned())));
    });
}

#[test]
fn test_skip_value_moves_past_nested_content() {
    let mut source = from_str(r#"[{"a":[[1],{"b":[]}]},7]"#);
    block_on(async {
        source.read().await.expect("start");
        source.read_start_array("test").await.expect("array");
        source.skip_value().await.expect("skip");
        assert_eq!(source.scalar(), Some(&JsonScalar::Number("7".to_owned())));
    });
}

#[test]
fn test_tiny_chunks_produce_the_same_nodes() {
    let json = r#"{"unicode":"é😀","numbers":[12345,-0.25],"ok":true}"#;
    let expected = nodes(&mut from_str(json)).expect("whole payload");

    for chunk in 1..8 {
        let config = ReaderConfig::default().with_read_chunk_size(chunk);
        let mut source =
            JsonTokenSource::with_config(BlockingRead(Cursor::new(json.as_bytes())), &config);
        assert_eq!(nodes(&mut source).as_ref(), Ok(&expected), "chunk size {chunk}");
        assert_eq!(source.total_received(), json.len() as u64);
    }
}

#[test]
fn test_syntax_errors_report_offsets() {
    assert!(matches!(
        nodes(&mut from_str(r#"{"a" 1}"#)),
        Err(Kind::Syntax { .. })
    ));
    assert!(matches!(
        nodes(&mut from_str(r#"[1 2]"#)),
        Err(Kind::Syntax { .. })
    ));
    assert!(matches!(
        nodes(&mut from_str(r#"{"a":1,}"#)),
        Err(Kind::Syntax { .. })
    ));
    assert!(matches!(
        nodes(&mut from_str(r#"{"a":1"#)),
        Err(Kind::Syntax { .. })
    ));

    match nodes(&mut from_str("[1, @]")) {
        Err(Kind::Syntax { offset, .. }) => assert_eq!(offset, 4),
        other => panic!("expected syntax error, got {other:?}"),
    }
}

#[test]
fn test_nesting_limit() {
    let config = ReaderConfig::default().with_max_nesting_depth(3);
    let mut shallow = JsonTokenSource::with_config(Bytes::from_static(b"[[[]]]"), &config);
    assert!(nodes(&mut shallow).is_ok());

    let mut deep = JsonTokenSource::with_config(Bytes::from_static(b"[[[[]]]]"), &config);
    assert_eq!(nodes(&mut deep), Err(Kind::NestingTooDeep { max_depth: 3 }));
}

#[test]
fn test_in_stream_error_detection() {
    let mut source = from_str(r#"{"error":{"code":"500","details":[1,2]},"after":true}"#);
    block_on(async {
        source.read().await.expect("start");
        source.set_in_stream_error_detection(true);
        let err = source.read().await.expect_err("in-stream error");
        assert!(err.is_in_stream_error());
        match err.into_kind() {
            Kind::InStreamError { payload } => {
                assert_eq!(payload["code"], "500");
                assert_eq!(payload["details"][1], 2);
            }
            other => panic!("unexpected kind {other:?}"),
        }
        // cursor stays inside the object, past the error member
        assert_eq!(source.property_name(), Some("after"));
        assert_eq!(source.depth(), 1);
    });
}

#[test]
fn test_detection_only_applies_to_the_first_property() {
    let mut source = from_str(r#"{"other":1,"error":2}"#);
    source.set_in_stream_error_detection(true);
    block_on(async {
        // armed before the object starts: nothing to detect yet
        assert_eq!(source.read().await.expect("start"), NodeKind::StartObject);
        assert_eq!(source.read().await.expect("property"), NodeKind::Property);
        source.read().await.expect("value");
        source.set_in_stream_error_detection(true);
        assert_eq!(source.read().await.expect("second property"), NodeKind::Property);
        assert_eq!(source.property_name(), Some("error"));
    });
}
