//! End-to-end tests for the [`Server`] pipeline and response transmission.

mod common;

use std::sync::Arc;

use common::{body_string, halting_middleware, recording_middleware, text_handler, CallLog};
use http::{Method, StatusCode, Version};
use switchyard::dispatcher::{Dispatchable, Dispatcher};
use switchyard::router::Router;
use switchyard::runtime_config::RuntimeConfig;
use switchyard::server::{FileStream, Request, Response, Server, Stream};

fn server_with(router: Router) -> Server {
    let mut server = Server::new(Arc::clone(router.dispatcher()), &RuntimeConfig::default());
    server.add(Dispatchable::from_double_pass(router));
    server
}

fn cats_router(log: &CallLog) -> Router {
    let mut router = Router::new(Arc::new(Dispatcher::new()));
    router.register("GET", "/cats", text_handler(log, "cats", "meow"));
    router
}

#[test]
fn test_unhandled_request_is_404() {
    let server = Server::new(Arc::new(Dispatcher::new()), &RuntimeConfig::default());
    let res = server.respond(Request::new(Method::GET, "/anything")).unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.header("Content-length"), Some("0"));
}

#[test]
fn test_unmatched_route_is_404() {
    let log = CallLog::new();
    let server = server_with(cats_router(&log));
    let res = server.respond(Request::new(Method::GET, "/dogs")).unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert!(log.entries().is_empty());
}

#[test]
fn test_get_sets_content_length() {
    let log = CallLog::new();
    let server = server_with(cats_router(&log));
    let res = server.respond(Request::new(Method::GET, "/cats")).unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.header("Content-length"), Some("4"));
    assert_eq!(body_string(res), "meow");
}

#[test]
fn test_head_strips_body_and_keeps_length() {
    let log = CallLog::new();
    let server = server_with(cats_router(&log));
    let res = server.respond(Request::new(Method::HEAD, "/cats")).unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.header("Content-length"), Some("4"));
    assert_eq!(res.body().size(), Some(0));
    assert_eq!(log.entries(), vec!["cats"]);
}

#[test]
fn test_405_response_is_normalized() {
    let log = CallLog::new();
    let server = server_with(cats_router(&log));
    let res = server.respond(Request::new(Method::POST, "/cats")).unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.header("Allow"), Some("GET, HEAD, OPTIONS"));
    assert_eq!(res.header("Content-length"), Some("0"));
}

#[test]
fn test_halting_top_level_middleware_still_normalized() {
    let log = CallLog::new();
    let mut server = Server::new(Arc::new(Dispatcher::new()), &RuntimeConfig::default());
    server
        .add(halting_middleware(&log, "gate", StatusCode::UNAUTHORIZED))
        .add(Dispatchable::from_double_pass(cats_router(&log)));

    let res = server.respond(Request::new(Method::GET, "/cats")).unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.header("Content-length"), Some("4"));
    assert_eq!(log.entries(), vec!["gate"]);
}

#[test]
fn test_routers_fall_through_in_order() {
    let log = CallLog::new();
    let dispatcher = Arc::new(Dispatcher::new());

    let mut cats = Router::new(Arc::clone(&dispatcher));
    cats.add_middleware(recording_middleware(&log, "cats-mw"))
        .register("GET", "/cats", text_handler(&log, "cats", "meow"));
    let mut dogs = Router::new(Arc::clone(&dispatcher));
    dogs.add_middleware(recording_middleware(&log, "dogs-mw"))
        .register("GET", "/dogs", text_handler(&log, "dogs", "woof"));

    let mut server = Server::new(dispatcher, &RuntimeConfig::default());
    server
        .add(Dispatchable::from_double_pass(cats))
        .add(Dispatchable::from_double_pass(dogs));

    let res = server.respond(Request::new(Method::GET, "/dogs")).unwrap();
    assert_eq!(body_string(res), "woof");
    assert_eq!(log.entries(), vec!["dogs-mw", "dogs"]);
}

#[test]
fn test_respond_once_writes_http_message() {
    let log = CallLog::new();
    let server = server_with(cats_router(&log));

    let mut out = Vec::new();
    server
        .respond_once(Request::new(Method::GET, "/cats"), &mut out)
        .unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "HTTP/1.1 200 OK\r\nContent-type: text/plain; charset=utf-8\r\nContent-length: 4\r\n\r\nmeow"
    );
}

#[test]
fn test_respond_once_head_has_no_body() {
    let log = CallLog::new();
    let server = server_with(cats_router(&log));

    let mut out = Vec::new();
    let req = Request::new(Method::HEAD, "/cats").with_version(Version::HTTP_10);
    server.respond_once(req, &mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(text.ends_with("Content-length: 4\r\n\r\n"));
}

#[test]
fn test_file_body_is_transmitted_in_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("body.txt");
    std::fs::write(&path, "a".repeat(100)).unwrap();

    let mut router = Router::new(Arc::new(Dispatcher::new()));
    let file_path = path.clone();
    router.register(
        "GET",
        "/file",
        Dispatchable::handler_fn(move |_req| {
            let stream = FileStream::open(&file_path)?;
            Ok(Response::new().with_body(stream))
        }),
    );
    let config = RuntimeConfig {
        chunk_size: 7,
        ..RuntimeConfig::default()
    };
    let mut server = Server::new(Arc::clone(router.dispatcher()), &config);
    server.add(Dispatchable::from_double_pass(router));

    let mut out = Vec::new();
    server
        .respond_once(Request::new(Method::GET, "/file"), &mut out)
        .unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("Content-length: 100\r\n"));
    assert!(text.ends_with(&format!("\r\n\r\n{}", "a".repeat(100))));
}
