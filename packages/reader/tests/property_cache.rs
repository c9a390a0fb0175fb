//! Tests for scanning single batch items

use bytes::Bytes;
use futures::executor::block_on;
use odata_batch_reader::{
    BatchMode, BodyKind, JsonTokenSource, Kind, NodeKind, OpaqueKind, PayloadItemPropertyCache,
    PropertyName, ReaderConfig, Result, TextEncoding, TokenSource,
};

fn scan_as(json: &'static str, mode: BatchMode) -> Result<PayloadItemPropertyCache> {
    let mut source = JsonTokenSource::new(Bytes::from_static(json.as_bytes()));
    block_on(async {
        source.read().await?;
        let cache = PayloadItemPropertyCache::scan(&mut source, mode, &ReaderConfig::default()).await?;
        assert_eq!(source.node_kind(), NodeKind::EndOfInput);
        Ok::<_, odata_batch_reader::Error>(cache)
    })
}

fn scan(json: &'static str) -> Result<PayloadItemPropertyCache> {
    scan_as(json, BatchMode::Requests)
}

#[test]
fn test_properties_are_normalized() {
    let cache = scan(
        r#"{"ID":"7","AtomicityGroup":"g","METHOD":"get","Url":"/A","DependsOn":["1","g0"]}"#,
    )
    .expect("scan");
    assert_eq!(cache.len(), 5);
    assert_eq!(cache.id(), Some("7"));
    assert_eq!(cache.atomicity_group(), Some("g"));
    assert_eq!(cache.depends_on(), Some(&["1".to_owned(), "g0".to_owned()][..]));
    assert!(cache.contains(PropertyName::Method));
    assert!(!cache.contains(PropertyName::Body));
}

#[test]
fn test_headers_keep_order_and_casing() {
    let cache = scan(
        r#"{"id":"1","headers":{"OData-Version":"4.0","If-Match":"*","Max-Forwards":10,"Prefer-Minimal":true}}"#,
    )
    .expect("scan");
    let headers = cache.headers().expect("headers");
    let pairs: Vec<(&str, &str)> = headers.iter().collect();
    assert_eq!(
        pairs,
        [
            ("OData-Version", "4.0"),
            ("If-Match", "*"),
            ("Max-Forwards", "10"),
            ("Prefer-Minimal", "true"),
        ]
    );
}

#[test]
fn test_structural_errors() {
    let err = scan(r#"{"id":"1","Headers":{},"HEADERS":{}}"#).expect_err("duplicate");
    assert_eq!(
        err.kind(),
        &Kind::DuplicateProperty {
            property: "HEADERS".to_owned()
        }
    );

    let err = scan(r#"{"id":"1","etag":"x"}"#).expect_err("unknown");
    assert!(matches!(err.kind(), Kind::UnknownProperty { .. }));

    let err = scan(r#"{"headers":{"Accept":"a","accept":"b"}}"#).expect_err("duplicate header");
    assert_eq!(
        err.kind(),
        &Kind::DuplicateHeader {
            header: "accept".to_owned()
        }
    );

    let err = scan(r#"{"headers":{"Accept":null}}"#).expect_err("null header");
    assert!(matches!(
        err.kind(),
        Kind::InvalidPropertyValue { property: "headers", .. }
    ));

    let err = scan(r#"{"id":1}"#).expect_err("numeric id");
    assert!(matches!(
        err.kind(),
        Kind::InvalidPropertyValue { property: "id", .. }
    ));

    let err = scan(r#"{"dependsOn":"1"}"#).expect_err("scalar dependsOn");
    assert!(matches!(err.kind(), Kind::UnexpectedNode { .. }));

    let err = scan(r#"{"dependsOn":[1]}"#).expect_err("numeric dependsOn");
    assert!(matches!(
        err.kind(),
        Kind::InvalidPropertyValue { property: "dependsOn", .. }
    ));
}

#[test]
fn test_status_must_be_an_integer() {
    let cache = scan_as(r#"{"id":"1","status":404}"#, BatchMode::Responses).expect("scan");
    assert_eq!(cache.status(), Some(404));

    for json in [r#"{"status":"200"}"#, r#"{"status":2.5}"#, r#"{"status":-1}"#, r#"{"status":70000}"#] {
        let err = scan_as(json, BatchMode::Responses).expect_err(json);
        assert!(matches!(
            err.kind(),
            Kind::InvalidPropertyValue { property: "status", .. }
        ));
    }
}

#[test]
fn test_body_before_headers_uses_later_content_type() {
    let cache = scan(
        r#"{"id":"1","body":"résumé","headers":{"Content-Type":"text/plain; charset=utf-16be"}}"#,
    )
    .expect("scan");
    let body = cache.body().expect("body");
    assert_eq!(body.kind(), Some(BodyKind::Opaque(OpaqueKind::Textual)));
    assert_eq!(body.charset(), Some(TextEncoding::Utf16Be));
    assert_eq!(body.len(), "résumé".encode_utf16().count() * 2);
}

#[test]
fn test_body_after_headers_and_without_headers() {
    let after = scan(r#"{"headers":{"content-type":"text/html"},"body":"<p/>"}"#).expect("scan");
    assert_eq!(
        after.body().expect("body").kind(),
        Some(BodyKind::Opaque(OpaqueKind::Textual))
    );

    let bare = scan(r#"{"body":"<p/>"}"#).expect("scan");
    let body = bare.body().expect("body");
    assert!(body.is_populated());
    assert_eq!(body.kind(), Some(BodyKind::Opaque(OpaqueKind::Binary)));

    let headers_only = scan(r#"{"body":[1],"headers":{"x":"y"}}"#).expect("scan");
    let body = headers_only.body().expect("body");
    assert!(body.is_populated());
    assert_eq!(body.as_bytes(), b"[1]");
}

#[test]
fn test_in_stream_error_only_absorbed_for_responses() {
    let json = r#"{"id":"1","body":{"error":{"code":"X"}}}"#;

    let response = scan_as(json, BatchMode::Responses).expect("scan");
    let body = response.body().expect("body");
    assert_eq!(body.as_bytes(), br#"{"error":{"code":"X"}}"#);
    assert!(matches!(body.kind(), Some(BodyKind::Opaque(_))));

    let request = scan_as(json, BatchMode::Requests).expect("scan");
    assert_eq!(request.body().expect("body").kind(), Some(BodyKind::Json));
}

#[test]
fn test_take_removes_values() {
    let mut cache = scan(r#"{"id":"1","url":"/A","dependsOn":[]}"#).expect("scan");
    assert_eq!(cache.take_text(PropertyName::Url).as_deref(), Some("/A"));
    assert_eq!(cache.take_depends_on(), Some(Vec::new()));
    assert!(cache.take_headers().is_none());
    assert_eq!(cache.len(), 1);
}
