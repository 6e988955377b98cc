use std::io::Write;
use std::sync::Arc;

use tracing::{debug, error};

use super::request::Request;
use super::response::Response;
use super::transmit::Transmitter;
use crate::dispatcher::{
    DispatchError, DispatchQueue, DispatchResult, Dispatchable, Dispatcher, Next,
};
use crate::middleware::{ContentLengthHandler, HeadHandler};
use crate::runtime_config::RuntimeConfig;

/// Top-level pipeline: one request in, one normalized response out.
///
/// The queue starts from a `404 Not Found` response, so a request that no
/// router or handler claims ends up as 404. Once the queue finishes,
/// [`ContentLengthHandler`] and then [`HeadHandler`] run over the result.
#[derive(Debug)]
pub struct Server {
    queue: DispatchQueue,
    boundary: DispatchQueue,
    transmitter: Transmitter,
}

impl Server {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>, config: &RuntimeConfig) -> Self {
        let mut boundary = DispatchQueue::new(Arc::clone(&dispatcher));
        boundary
            .add(Dispatchable::from_double_pass(ContentLengthHandler))
            .add(Dispatchable::from_double_pass(HeadHandler));
        Self {
            queue: DispatchQueue::new(dispatcher),
            boundary,
            transmitter: Transmitter::from_config(config),
        }
    }

    /// Append a dispatchable to the top-level queue.
    pub fn add(&mut self, dispatchable: Dispatchable) -> &mut Self {
        self.queue.add(dispatchable);
        self
    }

    #[must_use]
    pub fn queue(&self) -> &DispatchQueue {
        &self.queue
    }

    pub fn respond(&self, req: Request) -> DispatchResult {
        let result = self
            .queue
            .dispatch(req.clone(), Response::not_found(), Next::terminal())
            .and_then(|res| self.boundary.dispatch(req.clone(), res, Next::terminal()));
        match &result {
            Ok(res) => debug!(
                request_id = %req.id(),
                method = %req.method(),
                target = %req.target(),
                status = res.status().as_u16(),
                "Request dispatched"
            ),
            Err(err) => error!(
                request_id = %req.id(),
                method = %req.method(),
                target = %req.target(),
                error = %err,
                "Dispatch failed"
            ),
        }
        result
    }

    /// Dispatch `req` and write the response to `out`.
    pub fn respond_once<W: Write>(&self, req: Request, out: &mut W) -> Result<(), DispatchError> {
        let res = self.respond(req.clone())?;
        self.transmitter.transmit(&req, res, out)?;
        Ok(())
    }
}
