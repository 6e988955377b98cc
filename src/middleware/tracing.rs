use std::time::Instant;

use tracing::{info, info_span, warn};

use super::Middleware;
use crate::dispatcher::{Delegate, DispatchResult};
use crate::server::Request;

/// Wraps the rest of the pipeline in a `request` span and logs the outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingMiddleware;

impl Middleware for TracingMiddleware {
    fn process(&self, req: Request, delegate: &Delegate<'_>) -> DispatchResult {
        let span = info_span!(
            "request",
            request_id = %req.id(),
            method = %req.method(),
            path = %req.path(),
        );
        let _entered = span.enter();
        let start = Instant::now();

        let result = delegate.handle(req);
        let latency_us = start.elapsed().as_micros() as u64;
        match &result {
            Ok(res) => info!(status = res.status().as_u16(), latency_us, "Request handled"),
            Err(err) => warn!(error = %err, latency_us, "Request failed"),
        }
        result
    }
}
