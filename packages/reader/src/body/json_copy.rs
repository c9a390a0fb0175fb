//! Compact re-serialization of a JSON subtree read from a token source

use crate::error::{self, Result};
use crate::token::{NodeKind, TokenSource, write_json_string};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Container {
    Object,
    Array,
}

/// Copies the value under the cursor into `out` and moves past it.
///
/// Bodies are always objects or arrays; scalars are accepted for member
/// values copied one at a time.
///
/// Output is compact JSON: no whitespace, strings re-escaped, numbers in
/// their source form.
pub(crate) async fn copy_subtree<T: TokenSource>(source: &mut T, out: &mut String) -> Result<()> {
    let mut stack: Vec<Container> = Vec::new();
    let mut needs_comma = false;

    loop {
        let node = source.node_kind();
        let in_array = stack.last() == Some(&Container::Array);
        match node {
            NodeKind::StartObject | NodeKind::StartArray => {
                if needs_comma && in_array {
                    out.push(',');
                }
                if node == NodeKind::StartObject {
                    out.push('{');
                    stack.push(Container::Object);
                } else {
                    out.push('[');
                    stack.push(Container::Array);
                }
                needs_comma = false;
            }
            NodeKind::EndObject => {
                if stack.pop() != Some(Container::Object) {
                    return Err(error::internal("object end does not match open container"));
                }
                out.push('}');
                needs_comma = true;
            }
            NodeKind::EndArray => {
                if stack.pop() != Some(Container::Array) {
                    return Err(error::internal("array end does not match open container"));
                }
                out.push(']');
                needs_comma = true;
            }
            NodeKind::Property => {
                if needs_comma {
                    out.push(',');
                }
                write_json_string(source.property_name().unwrap_or_default(), out);
                out.push(':');
                needs_comma = false;
            }
            NodeKind::PrimitiveValue => {
                if needs_comma && in_array {
                    out.push(',');
                }
                if let Some(scalar) = source.scalar() {
                    scalar.write_json(out);
                }
                needs_comma = true;
            }
            NodeKind::None | NodeKind::EndOfInput => {
                return Err(error::unexpected_node("JSON body content", node, "body"));
            }
        }

        source.read().await?;
        if stack.is_empty() {
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use futures::executor::block_on;

    use super::*;
    use crate::token::JsonTokenSource;

    fn copy(json: &'static str) -> (String, NodeKind) {
        let mut source = JsonTokenSource::new(Bytes::from_static(json.as_bytes()));
        block_on(async {
            source.read().await.unwrap();
            source.read_start_array("test").await.unwrap();
            let mut out = String::new();
            copy_subtree(&mut source, &mut out).await.unwrap();
            (out, source.node_kind())
        })
    }

    #[test]
    fn copies_nested_structure_compactly() {
        let (out, next) = copy(
            r#"[ { "a" : [1, 2.50, {"b":null}], "c": {"d": "x\ty"}, "e": [] } , 3 ]"#,
        );
        assert_eq!(out, r#"{"a":[1,2.50,{"b":null}],"c":{"d":"x\ty"},"e":[]}"#);
        assert_eq!(next, NodeKind::PrimitiveValue);
    }

    #[test]
    fn copies_arrays_of_arrays() {
        let (out, next) = copy(r#"[[[true,false],[]],{}]"#);
        assert_eq!(out, "[[true,false],[]]");
        assert_eq!(next, NodeKind::StartObject);
    }
}
