use std::collections::HashMap;

use tracing::{debug, info, trace};

use super::error::RouteError;
use super::route::{ParamVec, Route, RouteKind};
use crate::dispatcher::Dispatchable;
use crate::server::Request;

/// Element class used for simple `{var}` template expressions unless
/// configured otherwise.
pub const DEFAULT_TEMPLATE_PATTERN: &str = "[^/]+";

/// Result of resolving a request target against a [`RouteTable`].
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub route: &'a Route,
    /// Captured variables in template order; empty for static and prefix routes
    pub captures: ParamVec,
}

/// Route storage and lookup.
///
/// Routes live in an arena in registration order. Three indices point into
/// it: exact paths, prefixes and pattern routes. Every target string maps to
/// exactly one route, and a route sits in exactly one index according to its
/// kind.
///
/// Lookup precedence is fixed: exact path, then the longest matching prefix,
/// then the first pattern route (in registration order) that matches.
#[derive(Debug)]
pub struct RouteTable {
    routes: Vec<Route>,
    by_target: HashMap<String, usize>,
    exact: HashMap<String, usize>,
    prefixes: HashMap<String, usize>,
    patterns: Vec<usize>,
    template_pattern: String,
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteTable {
    #[must_use]
    pub fn new() -> Self {
        Self::with_template_pattern(DEFAULT_TEMPLATE_PATTERN)
    }

    /// Table whose URI templates use `pattern` for simple `{var}` expressions
    /// (e.g. `[0-9]+` to only accept numeric ids).
    #[must_use]
    pub fn with_template_pattern(pattern: &str) -> Self {
        Self {
            routes: Vec::new(),
            by_target: HashMap::new(),
            exact: HashMap::new(),
            prefixes: HashMap::new(),
            patterns: Vec::new(),
            template_pattern: pattern.to_string(),
        }
    }

    /// Register `dispatchable` for `method` on `target`.
    ///
    /// The route for `target` is created on first use and reused afterwards,
    /// so later registrations only add (or, with `None`, remove) methods.
    /// Removing a method from an unknown target is a no-op; no empty route
    /// is created to shadow prefix and pattern routes.
    pub fn register(&mut self, method: &str, target: &str, dispatchable: Option<Dispatchable>) {
        let index = match (self.by_target.get(target), &dispatchable) {
            (Some(&index), _) => index,
            (None, Some(_)) => self.insert(target),
            (None, None) => {
                trace!(method = %method, target = %target, "Removal for unknown target ignored");
                return;
            }
        };
        self.routes[index].methods_mut().register(method, dispatchable);
        debug!(
            method = %method,
            target = %target,
            kind = %self.routes[index].kind(),
            "Route method registered"
        );
    }

    fn insert(&mut self, target: &str) -> usize {
        let route = Route::new(target, &self.template_pattern);
        let index = self.routes.len();
        match route.kind() {
            RouteKind::Static => {
                self.exact.insert(route.literal().unwrap_or(target).to_string(), index);
            }
            RouteKind::Prefix => {
                let prefix = route.literal().unwrap_or(target).to_string();
                self.prefixes.entry(prefix).or_insert(index);
            }
            RouteKind::Pattern => self.patterns.push(index),
        }
        info!(
            target = %target,
            kind = %route.kind(),
            routes_count = index + 1,
            "Route added to table"
        );
        self.by_target.insert(target.to_string(), index);
        self.routes.push(route);
        index
    }

    /// Resolve the request's target (query stripped).
    pub fn get_route(&self, req: &Request) -> Result<Option<RouteMatch<'_>>, RouteError> {
        self.match_path(req.path())
    }

    /// Resolve a request target; any `?query` suffix is ignored.
    pub fn match_path(&self, target: &str) -> Result<Option<RouteMatch<'_>>, RouteError> {
        let path = match target.find('?') {
            Some(pos) => &target[..pos],
            None => target,
        };

        if let Some(&index) = self.exact.get(path) {
            return Ok(Some(RouteMatch {
                route: &self.routes[index],
                captures: ParamVec::new(),
            }));
        }

        if let Some(index) = self.longest_prefix(path) {
            return Ok(Some(RouteMatch {
                route: &self.routes[index],
                captures: ParamVec::new(),
            }));
        }

        for &index in &self.patterns {
            let route = &self.routes[index];
            if let Some(captures) = route.matches(path)? {
                return Ok(Some(RouteMatch { route, captures }));
            }
        }

        Ok(None)
    }

    fn longest_prefix(&self, path: &str) -> Option<usize> {
        if self.prefixes.is_empty() {
            return None;
        }
        (0..=path.len())
            .rev()
            .filter(|&end| path.is_char_boundary(end))
            .find_map(|end| self.prefixes.get(&path[..end]).copied())
    }

    /// Route registered for exactly `target`, if any.
    #[must_use]
    pub fn route(&self, target: &str) -> Option<&Route> {
        self.by_target.get(target).map(|&index| &self.routes[index])
    }

    /// All routes in registration order.
    pub fn routes(&self) -> impl Iterator<Item = &Route> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Compile every pattern route now; returns the first failure.
    ///
    /// Matching compiles lazily, so call this at startup to catch broken
    /// patterns before serving traffic.
    pub fn validate(&self) -> Result<(), RouteError> {
        self.patterns
            .iter()
            .try_for_each(|&index| self.routes[index].validate())
    }
}
