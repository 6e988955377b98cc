use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, warn};

use super::error::RouteError;
use super::table::{RouteMatch, RouteTable};
use crate::dispatcher::{
    DispatchQueue, DispatchResult, Dispatchable, Dispatcher, DoublePass, Next,
};
use crate::server::{Request, Response};

/// A route table with its own middleware queue.
///
/// Used as a dispatchable, the router looks up the request target:
///
/// - **match**: captured variables are merged into the request attributes,
///   the router-local middleware runs, and its innermost `next` invokes the
///   route's method map (whose own `next` is the router's outer `next`)
/// - **no match**: the outer `next` is called with the request and response
///   unchanged; local middleware does not run
///
/// Routers are configured during setup and shared read-only afterwards.
///
/// ```rust
/// use std::sync::Arc;
/// use switchyard::dispatcher::{Dispatchable, Dispatcher, Next};
/// use switchyard::router::Router;
/// use switchyard::server::{Request, Response};
/// use http::{Method, StatusCode};
///
/// let mut router = Router::new(Arc::new(Dispatcher::new()));
/// router.register("GET", "/cats/{name}", Dispatchable::handler_fn(|req| {
///     let name = req.attribute("name").and_then(|v| v.as_str()).unwrap_or("?");
///     Ok(Response::text(StatusCode::OK, format!("hello {name}")))
/// }));
///
/// let res = router
///     .dispatch(Request::new(Method::GET, "/cats/molly"), Response::not_found(), Next::terminal())
///     .unwrap();
/// assert_eq!(res.status(), StatusCode::OK);
/// ```
#[derive(Debug)]
pub struct Router {
    table: RouteTable,
    middleware: DispatchQueue,
    dispatcher: Arc<Dispatcher>,
}

impl Router {
    #[must_use]
    pub fn new(dispatcher: Arc<Dispatcher>) -> Self {
        Self::with_table(dispatcher, RouteTable::new())
    }

    /// Router over an existing (possibly preconfigured) table.
    #[must_use]
    pub fn with_table(dispatcher: Arc<Dispatcher>, table: RouteTable) -> Self {
        Self {
            table,
            middleware: DispatchQueue::new(Arc::clone(&dispatcher)),
            dispatcher,
        }
    }

    /// Register `dispatchable` for `method` (comma-separated tokens allowed)
    /// on `target`.
    pub fn register(&mut self, method: &str, target: &str, dispatchable: Dispatchable) -> &mut Self {
        self.table.register(method, target, Some(dispatchable));
        self
    }

    /// Remove `method` from `target`'s method map.
    pub fn unregister(&mut self, method: &str, target: &str) -> &mut Self {
        self.table.register(method, target, None);
        self
    }

    /// Append router-local middleware; it only runs when a route matches.
    pub fn add_middleware(&mut self, dispatchable: Dispatchable) -> &mut Self {
        self.middleware.add(dispatchable);
        self
    }

    #[must_use]
    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Arc<Dispatcher> {
        &self.dispatcher
    }

    /// Resolve the request target without dispatching.
    pub fn route(&self, req: &Request) -> Result<Option<RouteMatch<'_>>, RouteError> {
        let match_start = Instant::now();
        let matched = self.table.get_route(req);
        let match_duration = match_start.elapsed();

        match &matched {
            Ok(Some(m)) => debug!(
                request_id = %req.id(),
                method = %req.method(),
                path = %req.path(),
                route = %m.route.target(),
                kind = %m.route.kind(),
                captures = ?m.captures,
                duration_us = match_duration.as_micros(),
                "Route matched"
            ),
            Ok(None) => debug!(
                request_id = %req.id(),
                method = %req.method(),
                path = %req.path(),
                duration_us = match_duration.as_micros(),
                "No route matched"
            ),
            Err(err) => warn!(
                request_id = %req.id(),
                path = %req.path(),
                error = %err,
                "Route compilation failed during match"
            ),
        }

        matched
    }

    pub fn dispatch(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        let Some(RouteMatch { route, captures }) = self.route(&req)? else {
            return next.call(req, res);
        };

        let req = req.with_attributes(captures);
        let methods = route.methods();
        let innermost =
            |req: Request, res: Response| methods.invoke(&self.dispatcher, req, res, next);
        self.middleware.dispatch(req, res, Next::new(&innermost))
    }
}

impl DoublePass for Router {
    fn invoke(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        self.dispatch(req, res, next)
    }
}
