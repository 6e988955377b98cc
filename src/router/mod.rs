//! # Router Module
//!
//! Route matching and the [`Router`] dispatchable.
//!
//! ## Route kinds
//!
//! The kind of a route follows from the syntax of its target:
//!
//! | Target              | Kind                  | Matches                              |
//! |---------------------|-----------------------|--------------------------------------|
//! | `/cats`             | [`RouteKind::Static`] | exactly `/cats`                      |
//! | `/cats/*`           | [`RouteKind::Prefix`] | any path starting with `/cats/`      |
//! | `/cats/{id}`        | [`RouteKind::Pattern`]| URI template, captures `id`          |
//! | `#^/cats/(\d+)$#`   | [`RouteKind::Pattern`]| regex, captures `0`, `1`, names      |
//!
//! ## Precedence
//!
//! For a request target the [`RouteTable`] tries, in order:
//!
//! 1. an exact static match
//! 2. the longest matching prefix
//! 3. pattern routes in registration order; the first match wins
//!
//! ## Methods
//!
//! Each route owns a [`MethodMap`]. `HEAD` falls back to `GET`, `*` catches
//! everything else, and a request with no usable entry is answered with
//! `405` (or `200` for `OPTIONS`) and an `Allow` header.
//!
//! ## Compilation
//!
//! Regex and template routes compile on first use and cache the result. A
//! broken pattern is reported as [`RouteError`] from the first match that
//! reaches it; [`RouteTable::validate`] compiles everything up front.

mod core;
mod error;
mod method_map;
mod route;
mod table;
mod template;

pub use self::core::Router;
pub use error::RouteError;
pub use method_map::{MethodMap, ANY_METHOD};
pub use route::{ParamValue, ParamVec, Route, RouteKind, MAX_INLINE_PARAMS};
pub use table::{RouteMatch, RouteTable, DEFAULT_TEMPLATE_PATTERN};
