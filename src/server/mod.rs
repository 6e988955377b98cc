//! # Server Module
//!
//! Request and response values, body streams, and the [`Server`] that runs a
//! dispatch queue and writes the result through a [`Transmitter`].
//!
//! Requests and responses are immutable values modified through consuming
//! `with_*` methods:
//!
//! ```rust
//! use http::{Method, StatusCode};
//! use switchyard::server::{Request, Response};
//!
//! let req = Request::new(Method::GET, "/cats?page=2").with_header("Accept", "text/plain");
//! assert_eq!(req.path(), "/cats");
//! assert_eq!(req.query_param("page").as_deref(), Some("2"));
//!
//! let res = Response::text(StatusCode::OK, "meow").with_header("X-Cat", "molly");
//! assert_eq!(res.header("x-cat"), Some("molly"));
//! ```

mod headers;
mod request;
mod response;
#[allow(clippy::module_inception)]
mod server;
mod stream;
mod transmit;

pub use headers::{HeaderVec, Headers, MAX_INLINE_HEADERS};
pub use request::Request;
pub use response::Response;
pub use server::Server;
pub use stream::{FileStream, MemoryStream, NullStream, Stream, StreamMetadata};
pub use transmit::Transmitter;
