use std::sync::Arc;

use super::core::{DispatchResult, Dispatchable, Dispatcher, DoublePass, Next};
use crate::server::{Request, Response};

/// Ordered, append-only chain of dispatchables.
///
/// Dispatching the queue runs the entries in insertion order; each entry's
/// `next` dispatches the following entry and the last entry's `next` is the
/// one supplied by the caller. An entry that returns without calling `next`
/// stops everything after it.
#[derive(Debug, Clone)]
pub struct DispatchQueue {
    entries: Vec<Dispatchable>,
    dispatcher: Arc<Dispatcher>,
}

impl DispatchQueue {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self {
            entries: Vec::new(),
            dispatcher,
        }
    }

    pub fn add(&mut self, dispatchable: Dispatchable) -> &mut Self {
        self.entries.push(dispatchable);
        self
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Run the queue. With no entries this is a direct call to `next`.
    pub fn dispatch(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        self.dispatcher.dispatch_chain(&self.entries, req, res, next)
    }
}

impl DoublePass for DispatchQueue {
    fn invoke(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        self.dispatch(req, res, next)
    }
}
