use std::borrow::Cow;
use std::cell::Cell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace};

use super::error::DispatchError;
use super::locator::ServiceLocator;
use crate::middleware::Middleware;
use crate::runtime_config::RuntimeConfig;
use crate::server::{Request, Response};

/// Outcome of every dispatch step.
pub type DispatchResult = Result<Response, DispatchError>;

/// The rest of the pipeline.
///
/// A `Next` borrows the continuation for the duration of one dispatch call;
/// it cannot outlive that call. A well-behaved unit invokes it at most once.
/// Not invoking it halts propagation.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    inner: &'a (dyn Fn(Request, Response) -> DispatchResult + 'a),
}

impl<'a> Next<'a> {
    pub fn new(inner: &'a (dyn Fn(Request, Response) -> DispatchResult + 'a)) -> Self {
        Self { inner }
    }

    /// Resume the pipeline.
    pub fn call(self, req: Request, res: Response) -> DispatchResult {
        (self.inner)(req, res)
    }
}

impl Next<'static> {
    /// A continuation that returns the response unchanged.
    #[must_use]
    pub fn terminal() -> Self {
        Self { inner: &passthrough }
    }
}

impl fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Next")
    }
}

fn passthrough(_req: Request, res: Response) -> DispatchResult {
    Ok(res)
}

/// Single-pass handler: turns a request into a response.
///
/// The dispatcher passes the produced response on to `next`, so handlers
/// compose with the rest of the pipeline like any other unit.
pub trait Handler: Send + Sync {
    fn handle(&self, req: Request) -> DispatchResult;
}

impl<F> Handler for F
where
    F: Fn(Request) -> DispatchResult + Send + Sync,
{
    fn handle(&self, req: Request) -> DispatchResult {
        self(req)
    }
}

/// Double-pass unit: receives the request, the response built so far and
/// the continuation.
///
/// Routers, method maps, dispatch queues and the response normalizers are
/// all double-pass units.
pub trait DoublePass: Send + Sync {
    fn invoke(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult;
}

impl<F> DoublePass for F
where
    F: Fn(Request, Response, Next<'_>) -> DispatchResult + Send + Sync,
{
    fn invoke(&self, req: Request, res: Response, next: Next<'_>) -> DispatchResult {
        self(req, res, next)
    }
}

/// Handle given to a [`Middleware`] to continue the pipeline.
///
/// It holds the response that was live when the middleware was dispatched;
/// [`Delegate::handle`] hands that response to `next`.
pub struct Delegate<'a> {
    response: Cell<Option<Response>>,
    next: Next<'a>,
}

impl<'a> Delegate<'a> {
    pub(crate) fn new(response: Response, next: Next<'a>) -> Self {
        Self {
            response: Cell::new(Some(response)),
            next,
        }
    }

    /// Continue with the live response.
    pub fn handle(&self, req: Request) -> DispatchResult {
        let res = self.response.take().unwrap_or_default();
        self.next.call(req, res)
    }

    /// Continue with a replacement response.
    pub fn handle_with(&self, req: Request, res: Response) -> DispatchResult {
        drop(self.response.take());
        self.next.call(req, res)
    }
}

type FactoryFn = dyn Fn() -> Dispatchable + Send + Sync;

/// Anything the [`Dispatcher`] can execute.
///
/// Build values with the constructor functions; the shape is fixed at
/// registration time and only factories and service names are resolved at
/// dispatch time.
#[derive(Clone)]
pub enum Dispatchable {
    /// Single-pass handler (request → response)
    Handler(Arc<dyn Handler>),
    /// Middleware (request, delegate → response)
    Middleware(Arc<dyn Middleware>),
    /// Zero-argument factory producing another dispatchable
    Factory(Arc<FactoryFn>),
    /// Double-pass unit (request, response, next → response)
    DoublePass(Arc<dyn DoublePass>),
    /// Name resolved through the service locator or the registered types
    Service(String),
    /// Inline dispatch queue
    Queue(Vec<Dispatchable>),
}

impl Dispatchable {
    pub fn from_handler(handler: impl Handler + 'static) -> Self {
        Dispatchable::Handler(Arc::new(handler))
    }

    pub fn handler_fn<F>(f: F) -> Self
    where
        F: Fn(Request) -> DispatchResult + Send + Sync + 'static,
    {
        Dispatchable::Handler(Arc::new(f))
    }

    pub fn from_middleware(middleware: impl Middleware + 'static) -> Self {
        Dispatchable::Middleware(Arc::new(middleware))
    }

    pub fn middleware_fn<F>(f: F) -> Self
    where
        F: Fn(Request, &Delegate<'_>) -> DispatchResult + Send + Sync + 'static,
    {
        Dispatchable::Middleware(Arc::new(f))
    }

    pub fn from_factory<F>(factory: F) -> Self
    where
        F: Fn() -> Dispatchable + Send + Sync + 'static,
    {
        Dispatchable::Factory(Arc::new(factory))
    }

    pub fn from_double_pass(unit: impl DoublePass + 'static) -> Self {
        Dispatchable::DoublePass(Arc::new(unit))
    }

    pub fn double_pass<F>(f: F) -> Self
    where
        F: Fn(Request, Response, Next<'_>) -> DispatchResult + Send + Sync + 'static,
    {
        Dispatchable::DoublePass(Arc::new(f))
    }

    pub fn service(name: impl Into<String>) -> Self {
        Dispatchable::Service(name.into())
    }

    pub fn queue(entries: impl IntoIterator<Item = Dispatchable>) -> Self {
        Dispatchable::Queue(entries.into_iter().collect())
    }

    fn shape(&self) -> &'static str {
        match self {
            Dispatchable::Handler(_) => "handler",
            Dispatchable::Middleware(_) => "middleware",
            Dispatchable::Factory(_) => "factory",
            Dispatchable::DoublePass(_) => "double_pass",
            Dispatchable::Service(_) => "service",
            Dispatchable::Queue(_) => "queue",
        }
    }
}

impl fmt::Debug for Dispatchable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dispatchable::Service(name) => f.debug_tuple("Service").field(name).finish(),
            Dispatchable::Queue(entries) => f.debug_tuple("Queue").field(entries).finish(),
            other => write!(f, "Dispatchable::{}", other.shape()),
        }
    }
}

/// Resolves dispatchables into one of the execution protocols and runs them.
///
/// The dispatcher is configured once during setup (service locator and
/// constructible types) and then shared read-only through an `Arc` by every
/// router and queue that needs it.
pub struct Dispatcher {
    locator: Option<Arc<dyn ServiceLocator>>,
    constructors: HashMap<String, Arc<FactoryFn>>,
    max_depth: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.constructors.keys().collect();
        types.sort();
        f.debug_struct("Dispatcher")
            .field("has_locator", &self.locator.is_some())
            .field("types", &types)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

impl Dispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(&RuntimeConfig::default())
    }

    #[must_use]
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Dispatcher {
            locator: None,
            constructors: HashMap::new(),
            max_depth: config.max_resolution_depth,
        }
    }

    #[must_use]
    pub fn with_locator(mut self, locator: Arc<dyn ServiceLocator>) -> Self {
        self.locator = Some(locator);
        self
    }

    pub fn set_locator(&mut self, locator: Arc<dyn ServiceLocator>) {
        self.locator = Some(locator);
    }

    /// Register a constructible type under `name`.
    ///
    /// Service names the locator does not know are looked up here and the
    /// constructor is called to produce a fresh value on every dispatch.
    pub fn register_type<F>(&mut self, name: &str, constructor: F)
    where
        F: Fn() -> Dispatchable + Send + Sync + 'static,
    {
        debug!(type_name = %name, "Constructible type registered");
        self.constructors.insert(name.to_string(), Arc::new(constructor));
    }

    /// Register a `Default`-constructible handler type.
    pub fn register_handler_type<H>(&mut self, name: &str)
    where
        H: Handler + Default + 'static,
    {
        self.register_type(name, || Dispatchable::from_handler(H::default()));
    }

    /// Register a `Default`-constructible middleware type.
    pub fn register_middleware_type<M>(&mut self, name: &str)
    where
        M: Middleware + Default + 'static,
    {
        self.register_type(name, || Dispatchable::from_middleware(M::default()));
    }

    /// Whether `name` would resolve, through the locator or a registered type.
    #[must_use]
    pub fn can_resolve(&self, name: &str) -> bool {
        self.locator.as_ref().is_some_and(|l| l.has(name)) || self.constructors.contains_key(name)
    }

    fn resolve_service(&self, name: &str) -> Result<Dispatchable, DispatchError> {
        if let Some(locator) = &self.locator {
            if locator.has(name) {
                if let Some(resolved) = locator.get(name) {
                    trace!(service = %name, source = "locator", "Service resolved");
                    return Ok(resolved);
                }
            }
        }
        if let Some(constructor) = self.constructors.get(name) {
            trace!(service = %name, source = "type", "Service resolved");
            return Ok(constructor());
        }
        error!(service = %name, "No service or type registered under this name");
        Err(DispatchError::UnknownService {
            name: name.to_string(),
        })
    }

    /// Execute `dispatchable`.
    ///
    /// Resolution order:
    /// 1. service name → locator entry, else registered type (then restart)
    /// 2. factory → its product (then restart)
    /// 3. handler → `handle(req)`, then `next(req, produced response)`
    /// 4. middleware → `process(req, delegate)`, result returned as is
    /// 5. double-pass → called with the live `next`
    /// 6. queue → inline queue ending in `next`
    pub fn dispatch(
        &self,
        dispatchable: &Dispatchable,
        req: Request,
        res: Response,
        next: Next<'_>,
    ) -> DispatchResult {
        let mut current = Cow::Borrowed(dispatchable);

        for _ in 0..=self.max_depth {
            match current.as_ref() {
                Dispatchable::Service(name) => {
                    let resolved = self.resolve_service(name)?;
                    current = Cow::Owned(resolved);
                }
                Dispatchable::Factory(factory) => {
                    let produced = factory();
                    current = Cow::Owned(produced);
                }
                Dispatchable::Handler(handler) => {
                    let produced = handler.handle(req.clone())?;
                    return next.call(req, produced);
                }
                Dispatchable::Middleware(middleware) => {
                    let delegate = Delegate::new(res, next);
                    return middleware.process(req, &delegate);
                }
                Dispatchable::DoublePass(unit) => return unit.invoke(req, res, next),
                Dispatchable::Queue(entries) => return self.dispatch_chain(entries, req, res, next),
            }
        }

        error!(
            request_id = %req.id(),
            max_depth = self.max_depth,
            "Dispatchable resolution exceeded maximum depth"
        );
        Err(DispatchError::ResolutionDepth {
            depth: self.max_depth,
        })
    }

    /// Run `entries` in order: each entry's `next` dispatches the following
    /// entry, the last entry's `next` is the supplied one.
    pub(crate) fn dispatch_chain(
        &self,
        entries: &[Dispatchable],
        req: Request,
        res: Response,
        next: Next<'_>,
    ) -> DispatchResult {
        let Some((first, rest)) = entries.split_first() else {
            return next.call(req, res);
        };
        let continuation =
            |req: Request, res: Response| self.dispatch_chain(rest, req, res, next);
        self.dispatch(first, req, res, Next::new(&continuation))
    }
}
