//! Token sources
//!
//! The batch engine consumes JSON through the [`TokenSource`] trait. The
//! bundled [`JsonTokenSource`] tokenizes bytes pulled from a [`ByteSource`]:
//! an in-memory [`Bytes`](bytes::Bytes) payload, a blocking
//! [`std::io::Read`] or a tokio [`AsyncRead`](tokio::io::AsyncRead).

mod byte_source;
mod json_source;
mod lexer;
mod source;
mod types;
mod window;

pub use byte_source::{AsyncReadSource, BlockingRead, ByteSource};
pub use json_source::JsonTokenSource;
pub use source::TokenSource;
pub use types::{JsonScalar, NodeKind, write_json_string};
pub use window::TokenWindow;
