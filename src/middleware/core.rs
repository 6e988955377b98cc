use crate::dispatcher::{Delegate, DispatchResult};
use crate::server::Request;

/// Single-pass middleware: sees the request and decides whether (and how)
/// to continue through the delegate.
///
/// Returning without calling [`Delegate::handle`] stops the pipeline.
pub trait Middleware: Send + Sync {
    fn process(&self, req: Request, delegate: &Delegate<'_>) -> DispatchResult;
}

impl<F> Middleware for F
where
    F: Fn(Request, &Delegate<'_>) -> DispatchResult + Send + Sync,
{
    fn process(&self, req: Request, delegate: &Delegate<'_>) -> DispatchResult {
        self(req, delegate)
    }
}
