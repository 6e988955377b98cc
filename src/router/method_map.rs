use http::{Method, StatusCode};
use tracing::debug;

use crate::dispatcher::{DispatchResult, Dispatchable, Dispatcher, Next};
use crate::server::{Request, Response};

/// Wildcard token matching any method without its own entry.
pub const ANY_METHOD: &str = "*";

/// Per-route mapping from method token to dispatchable.
///
/// Tokens are uppercase verbs (`GET`, `POST`, ...) or [`ANY_METHOD`] and are
/// compared exactly as stored. Entries keep registration order, which is also
/// the order of the synthesized `Allow` header.
#[derive(Debug, Clone, Default)]
pub struct MethodMap {
    entries: Vec<(String, Dispatchable)>,
}

impl MethodMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dispatchable` for every comma-separated token in `spec`
    /// (`"GET, POST"`). Passing `None` removes the tokens instead.
    pub fn register(&mut self, spec: &str, dispatchable: Option<Dispatchable>) {
        for token in spec.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let existing = self.entries.iter().position(|(t, _)| t == token);
            match (existing, &dispatchable) {
                (Some(pos), Some(d)) => self.entries[pos].1 = d.clone(),
                (None, Some(d)) => self.entries.push((token.to_string(), d.clone())),
                (Some(pos), None) => {
                    self.entries.remove(pos);
                }
                (None, None) => {}
            }
        }
    }

    #[must_use]
    pub fn get(&self, token: &str) -> Option<&Dispatchable> {
        self.entries
            .iter()
            .find(|(t, _)| t == token)
            .map(|(_, d)| d)
    }

    /// Registered tokens in registration order.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pick the dispatchable for `method`: exact token, then GET for HEAD,
    /// then the wildcard.
    #[must_use]
    pub fn select(&self, method: &Method) -> Option<&Dispatchable> {
        self.get(method.as_str())
            .or_else(|| {
                if *method == Method::HEAD {
                    self.get(Method::GET.as_str())
                } else {
                    None
                }
            })
            .or_else(|| self.get(ANY_METHOD))
    }

    /// Methods advertised in `Allow`: registered tokens, `HEAD` when `GET` is
    /// registered, and `OPTIONS`.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<&str> {
        let mut allowed: Vec<&str> = Vec::with_capacity(self.entries.len() + 2);
        for token in self.tokens().filter(|t| *t != ANY_METHOD) {
            if !allowed.contains(&token) {
                allowed.push(token);
            }
        }
        if allowed.contains(&"GET") && !allowed.contains(&"HEAD") {
            allowed.push("HEAD");
        }
        if !allowed.contains(&"OPTIONS") {
            allowed.push("OPTIONS");
        }
        allowed
    }

    /// Dispatch the entry selected for the request method.
    ///
    /// Without a usable entry the map answers itself: `200` for `OPTIONS`,
    /// `405` otherwise, both with an `Allow` header. `next` is not called in
    /// that case.
    pub fn invoke(
        &self,
        dispatcher: &Dispatcher,
        req: Request,
        res: Response,
        next: Next<'_>,
    ) -> DispatchResult {
        if let Some(dispatchable) = self.select(req.method()) {
            return dispatcher.dispatch(dispatchable, req, res, next);
        }

        let allow = self.allowed_methods().join(", ");
        let status = if *req.method() == Method::OPTIONS {
            StatusCode::OK
        } else {
            StatusCode::METHOD_NOT_ALLOWED
        };
        debug!(
            request_id = %req.id(),
            method = %req.method(),
            path = %req.path(),
            status = status.as_u16(),
            allow = %allow,
            "No handler for method"
        );
        Ok(res.with_status(status).with_header("Allow", allow))
    }
}
