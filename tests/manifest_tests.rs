//! Route manifest loading and router construction.

mod common;

use std::sync::Arc;

use common::body_string;
use common::temp_files::create_temp_manifest;
use http::{Method, StatusCode};
use switchyard::dispatcher::{Dispatchable, Dispatcher, ServiceRegistry};
use switchyard::manifest::load_manifest;
use switchyard::router::RouteKind;
use switchyard::runtime_config::RuntimeConfig;
use switchyard::server::{Request, Response, Server};

const YAML: &str = r#"
routes:
  - method: GET,POST
    target: /cats/{id}
    service: cat
  - method: GET
    target: /static/*
    service: files
middleware: [stamp]
"#;

const TOML: &str = r#"
middleware = ["stamp"]

[[routes]]
method = "GET,POST"
target = "/cats/{id}"
service = "cat"

[[routes]]
method = "GET"
target = "/static/*"
service = "files"
"#;

fn dispatcher() -> Arc<Dispatcher> {
    let mut services = ServiceRegistry::new();
    services
        .register(
            "cat",
            Dispatchable::handler_fn(|req: Request| {
                let id = req.attribute("id").map(ToString::to_string).unwrap_or_default();
                Ok(Response::text(StatusCode::OK, format!("cat {id}")))
            }),
        )
        .register(
            "files",
            Dispatchable::handler_fn(|_| Ok(Response::text(StatusCode::OK, "file"))),
        )
        .register(
            "stamp",
            Dispatchable::middleware_fn(|req, delegate| {
                delegate.handle(req).map(|res| res.with_header("X-Stamp", "1"))
            }),
        );
    Arc::new(Dispatcher::new().with_locator(Arc::new(services)))
}

#[test]
fn test_yaml_and_toml_agree() {
    let yaml = create_temp_manifest(YAML, "yaml");
    let toml = create_temp_manifest(TOML, "toml");
    assert_eq!(load_manifest(yaml.path()).unwrap(), load_manifest(toml.path()).unwrap());
}

#[test]
fn test_build_router_registers_routes() {
    let file = create_temp_manifest(YAML, "yml");
    let manifest = load_manifest(file.path()).unwrap();
    let router = manifest.build_router(dispatcher());

    let kinds: Vec<_> = router.table().routes().map(|r| r.kind()).collect();
    assert_eq!(kinds, vec![RouteKind::Pattern, RouteKind::Prefix]);
    assert!(router.table().validate().is_ok());
    assert!(manifest.unresolved_services(router.dispatcher()).is_empty());
}

#[test]
fn test_manifest_router_serves_requests() {
    let file = create_temp_manifest(YAML, "yaml");
    let router = load_manifest(file.path()).unwrap().build_router(dispatcher());
    let mut server = Server::new(Arc::clone(router.dispatcher()), &RuntimeConfig::default());
    server.add(Dispatchable::from_double_pass(router));

    let res = server.respond(Request::new(Method::POST, "/cats/7")).unwrap();
    assert_eq!(res.header("X-Stamp"), Some("1"));
    assert_eq!(body_string(res), "cat 7");

    let res = server.respond(Request::new(Method::GET, "/static/app.css")).unwrap();
    assert_eq!(body_string(res), "file");

    let res = server.respond(Request::new(Method::DELETE, "/cats/7")).unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.yaml");
    let err = load_manifest(&path).unwrap_err();
    assert!(format!("{err:#}").contains("absent.yaml"));
}

#[test]
fn test_malformed_manifest_is_rejected() {
    let file = create_temp_manifest("routes: [ {target: /x} ]", "yaml");
    assert!(load_manifest(file.path()).is_err());
}
