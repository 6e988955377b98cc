use http::StatusCode;
use serde_json::json;

use crate::dispatcher::{DispatchResult, Dispatchable, Dispatcher, ServiceRegistry};
use crate::middleware::TracingMiddleware;
use crate::runtime_config::RuntimeConfig;
use crate::server::{Request, Response};

use std::sync::Arc;

fn echo(req: Request) -> DispatchResult {
    let attributes: serde_json::Map<String, serde_json::Value> = req
        .attributes()
        .iter()
        .map(|(name, value)| (name.to_string(), json!(value)))
        .collect();
    let body = json!({
        "request_id": req.id().to_string(),
        "method": req.method().as_str(),
        "path": req.path(),
        "query": req.query(),
        "attributes": attributes,
    });
    Ok(Response::text(StatusCode::OK, body.to_string())
        .with_header("Content-type", "application/json"))
}

fn hello(req: Request) -> DispatchResult {
    let name = req
        .attribute("name")
        .map(ToString::to_string)
        .unwrap_or_else(|| "world".to_string());
    Ok(Response::text(StatusCode::OK, format!("Hello, {name}!\n")))
}

fn not_found(_req: Request) -> DispatchResult {
    Ok(Response::text(StatusCode::NOT_FOUND, "Not Found\n"))
}

/// Dispatcher with the demo services the `respond` command serves.
#[must_use]
pub fn demo_dispatcher(config: &RuntimeConfig) -> Dispatcher {
    let mut services = ServiceRegistry::new();
    services
        .register("echo", Dispatchable::handler_fn(echo))
        .register("hello", Dispatchable::handler_fn(hello))
        .register("not_found", Dispatchable::handler_fn(not_found));

    let mut dispatcher = Dispatcher::from_config(config).with_locator(Arc::new(services));
    dispatcher.register_middleware_type::<TracingMiddleware>("tracing");
    dispatcher
}
