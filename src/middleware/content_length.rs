use tracing::trace;

use crate::dispatcher::{DispatchResult, DoublePass, Next};
use crate::server::{Request, Response};

/// Sets `Content-length` from the body size.
///
/// Skipped when the header is already present, when the body size is
/// unknown, or when `Transfer-encoding` includes `chunked`. Idempotent.
#[derive(Debug, Default, Clone, Copy)]
pub struct ContentLengthHandler;

impl ContentLengthHandler {
    #[must_use]
    pub fn apply(&self, _req: &Request, res: Response) -> Response {
        if res.headers().contains("Content-length") || is_chunked(&res) {
            return res;
        }
        match res.body().size() {
            Some(size) => {
                trace!(size, "Content-length set");
                res.with_header("Content-length", size.to_string())
            }
            None => res,
        }
    }
}

fn is_chunked(res: &Response) -> bool {
    res.headers()
        .get_all("Transfer-encoding")
        .flat_map(|value| value.split(','))
        .any(|coding| coding.trim().eq_ignore_ascii_case("chunked"))
}

impl DoublePass for ContentLengthHandler {
    fn invoke(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        let res = self.apply(&req, res);
        next.call(req, res)
    }
}
