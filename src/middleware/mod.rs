//! # Middleware Module
//!
//! Two execution models plug into the pipeline:
//!
//! - [`Middleware`]: single-pass. Receives the request and a
//!   [`Delegate`](crate::dispatcher::Delegate) that runs the rest of the chain.
//! - [`DoublePass`](crate::dispatcher::DoublePass): receives the request, the
//!   response built so far and the continuation.
//!
//! The built-in normalizers [`ContentLengthHandler`] and [`HeadHandler`] are
//! double-pass units. The server runs them after its queue so every response
//! leaves with a `Content-length` when the size is known and without a body
//! when the request was `HEAD`.
//!
//! [`TracingMiddleware`] wraps the rest of the chain in a request span.

mod content_length;
mod core;
mod head;
mod tracing;

pub use self::core::Middleware;
pub use content_length::ContentLengthHandler;
pub use head::HeadHandler;
pub use self::tracing::TracingMiddleware;

#[cfg(test)]
mod tests {
    use http::{Method, StatusCode};

    use super::{ContentLengthHandler, HeadHandler};
    use crate::server::{MemoryStream, Request, Response, Stream};

    fn hello() -> Response {
        Response::text(StatusCode::OK, "hello")
    }

    #[test]
    fn test_content_length_from_body_size() {
        let req = Request::new(Method::GET, "/");
        let res = ContentLengthHandler.apply(&req, hello());
        assert_eq!(res.header("content-length"), Some("5"));
    }

    #[test]
    fn test_content_length_keeps_existing_header() {
        let req = Request::new(Method::GET, "/");
        let res = ContentLengthHandler.apply(&req, hello().with_header("CONTENT-LENGTH", "99"));
        assert_eq!(res.header("Content-length"), Some("99"));
        assert_eq!(res.headers().get_all("content-length").count(), 1);
    }

    #[test]
    fn test_content_length_skipped_when_chunked() {
        let req = Request::new(Method::GET, "/");
        let res = ContentLengthHandler
            .apply(&req, hello().with_header("Transfer-Encoding", "gzip, Chunked"));
        assert!(!res.headers().contains("Content-length"));
    }

    #[test]
    fn test_content_length_is_idempotent() {
        let req = Request::new(Method::GET, "/");
        let once = ContentLengthHandler.apply(&req, hello());
        let twice = ContentLengthHandler.apply(&req, ContentLengthHandler.apply(&req, hello()));
        let a: Vec<_> = once.headers().iter().collect();
        let b: Vec<_> = twice.headers().iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn test_head_strips_body_only_for_head() {
        let get = Request::new(Method::GET, "/");
        let head = Request::new(Method::HEAD, "/");

        let mut kept = HeadHandler.apply(&get, hello());
        assert_eq!(kept.body_mut().contents().unwrap(), b"hello");

        let res = ContentLengthHandler.apply(&head, hello());
        let stripped = HeadHandler.apply(&head, res);
        assert_eq!(stripped.body().size(), Some(0));
        assert_eq!(stripped.header("Content-length"), Some("5"));
    }

    #[test]
    fn test_head_is_idempotent() {
        let head = Request::new(Method::HEAD, "/");
        let res = HeadHandler.apply(&head, HeadHandler.apply(&head, hello()));
        assert_eq!(res.body().size(), Some(0));
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[test]
    fn test_head_leaves_empty_body_alone() {
        let head = Request::new(Method::HEAD, "/");
        let res = Response::new().with_body(MemoryStream::new());
        let res = HeadHandler.apply(&head, res);
        assert_eq!(res.body().metadata().kind, "memory");
    }
}
