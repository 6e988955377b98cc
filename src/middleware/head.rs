use http::Method;
use tracing::trace;

use crate::dispatcher::{DispatchResult, DoublePass, Next};
use crate::server::{NullStream, Request, Response};

/// Strips the body from responses to `HEAD` requests.
///
/// Headers (including `Content-length`) are left alone so the client sees
/// what a `GET` would have returned. Running it again is a no-op: the body
/// is already empty.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeadHandler;

impl HeadHandler {
    #[must_use]
    pub fn apply(&self, req: &Request, res: Response) -> Response {
        if *req.method() != Method::HEAD || res.body().size() == Some(0) {
            return res;
        }
        trace!(request_id = %req.id(), "Body stripped from HEAD response");
        res.with_body(NullStream)
    }
}

impl DoublePass for HeadHandler {
    fn invoke(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        let res = self.apply(&req, res);
        next.call(req, res)
    }
}
