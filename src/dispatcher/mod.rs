//! # Dispatcher Module
//!
//! The dispatcher turns registered values into running code and threads the
//! `next` continuation through them.
//!
//! ## Execution models
//!
//! A [`Dispatchable`] is one of:
//!
//! - a **handler** (`request → response`); after it returns, the dispatcher
//!   calls `next(request, response)` itself
//! - a **middleware** (`request, delegate → response`); calling
//!   [`Delegate::handle`] continues the pipeline
//! - a **double-pass** unit (`request, response, next → response`)
//! - a **factory** or **service name**, resolved at dispatch time into one of
//!   the above
//! - an inline **queue** of dispatchables
//!
//! ## Composition
//!
//! [`DispatchQueue`] folds a list of dispatchables into a chain of
//! continuations:
//!
//! ```rust
//! use std::sync::Arc;
//! use switchyard::dispatcher::{Dispatchable, DispatchQueue, Dispatcher, Next};
//! use switchyard::server::{Request, Response};
//! use http::Method;
//!
//! let mut queue = DispatchQueue::new(Arc::new(Dispatcher::new()));
//! queue.add(Dispatchable::middleware_fn(|req, delegate| {
//!     let res = delegate.handle(req)?;
//!     Ok(res.with_header("X-Seen", "yes"))
//! }));
//! queue.add(Dispatchable::handler_fn(|_req| {
//!     Ok(Response::text(http::StatusCode::OK, "hello"))
//! }));
//!
//! let res = queue
//!     .dispatch(Request::new(Method::GET, "/"), Response::new(), Next::terminal())
//!     .unwrap();
//! assert_eq!(res.header("x-seen"), Some("yes"));
//! ```
//!
//! ## Continuation contract
//!
//! Dispatch is synchronous. `next` is a borrowed closure valid only during
//! the call it was passed to; a unit calls it zero or one times. Not calling
//! it halts propagation, which is how method maps answer `405` and how
//! middleware short-circuits.

mod core;
mod error;
mod locator;
mod queue;

pub use self::core::{Delegate, DispatchResult, Dispatchable, Dispatcher, DoublePass, Handler, Next};
pub use error::DispatchError;
pub use locator::{ServiceLocator, ServiceRegistry};
pub use queue::DispatchQueue;
