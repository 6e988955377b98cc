//! # switchyard
//!
//! **switchyard** is a synchronous HTTP request router and middleware dispatch
//! pipeline. A request goes in, a sequence of handler and middleware units
//! runs in continuation-passing style, and a response comes out.
//!
//! ## Architecture
//!
//! - **[`router`]** - Static, prefix, regex and URI-template routes, per-route
//!   method maps, and the [`Router`] dispatchable
//! - **[`dispatcher`]** - The [`Dispatcher`], [`Dispatchable`] units, and
//!   [`DispatchQueue`] chains
//! - **[`middleware`]** - The single-pass [`Middleware`](middleware::Middleware)
//!   contract plus response normalizers
//! - **[`server`]** - Request/response values, body streams, the [`Server`]
//!   pipeline and the response transmitter
//! - **[`manifest`]** - Route tables declared in YAML or TOML
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven setup
//! - **[`cli`]** - The `switchyard` command-line tool
//!
//! ### Request Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Server
//!     participant Router
//!     participant Table as RouteTable
//!     participant Methods as MethodMap
//!     participant Handler
//!
//!     Server->>Router: invoke(req, 404, next)
//!     Router->>Table: get_route(req)
//!     Table-->>Router: route + captures
//!     Router->>Router: local middleware queue
//!     Router->>Methods: invoke(req, res, next)
//!     Methods->>Handler: handle(req)
//!     Handler-->>Methods: response
//!     Methods-->>Server: next(req, response)
//!     Server->>Server: Content-length, HEAD
//! ```
//!
//! ## Route Precedence
//!
//! 1. exact static path
//! 2. longest matching prefix (`/cats/*`)
//! 3. the first pattern route (regex or `{template}`) that matches, in
//!    registration order
//!
//! A request that no route claims falls through to the next unit; at the
//! end of the server queue it is answered with `404 Not Found`. A route that
//! matches but has no entry for the method answers `405` with an `Allow`
//! header (`200` for `OPTIONS`).
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use http::{Method, StatusCode};
//! use switchyard::{Dispatchable, Dispatcher, Request, Response, Router, RuntimeConfig, Server};
//!
//! let config = RuntimeConfig::default();
//! let dispatcher = Arc::new(Dispatcher::from_config(&config));
//!
//! let mut router = Router::new(Arc::clone(&dispatcher));
//! router.register(
//!     "GET",
//!     "/cats/{name}",
//!     Dispatchable::handler_fn(|req: Request| {
//!         let name = req.attribute("name").map(ToString::to_string).unwrap_or_default();
//!         Ok(Response::text(StatusCode::OK, format!("meow, {name}")))
//!     }),
//! );
//!
//! let mut server = Server::new(dispatcher, &config);
//! server.add(Dispatchable::from_double_pass(router));
//!
//! let res = server.respond(Request::new(Method::GET, "/cats/molly")).unwrap();
//! assert_eq!(res.status(), StatusCode::OK);
//! assert_eq!(res.header("Content-length"), Some("11"));
//!
//! let res = server.respond(Request::new(Method::GET, "/dogs")).unwrap();
//! assert_eq!(res.status(), StatusCode::NOT_FOUND);
//! ```
//!
//! ## Configuration
//!
//! See [`runtime_config`] for the `SWITCHYARD_*` environment variables that
//! control chunked transmission, the default template variable pattern and
//! the service resolution limit, and [`logging`] for log output.

pub mod cli;
pub mod dispatcher;
pub mod ids;
pub mod logging;
pub mod manifest;
pub mod middleware;
pub mod router;
pub mod runtime_config;
pub mod server;

pub use dispatcher::{
    DispatchError, DispatchQueue, DispatchResult, Dispatchable, Dispatcher, Next,
    ServiceLocator, ServiceRegistry,
};
pub use manifest::{load_manifest, RouteManifest};
pub use router::{ParamValue, RouteError, RouteKind, RouteTable, Router};
pub use runtime_config::RuntimeConfig;
pub use server::{Request, Response, Server};
