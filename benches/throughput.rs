#![allow(clippy::unwrap_used)]

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use http::{Method, StatusCode};
use switchyard::dispatcher::{Dispatchable, Dispatcher};
use switchyard::router::{RouteTable, Router};
use switchyard::runtime_config::RuntimeConfig;
use switchyard::server::{Request, Response, Server};

const ROUTES: &[(&str, &str)] = &[
    ("GET", "/"),
    ("GET,POST", "/zoo/animals"),
    ("GET,PUT,PATCH,DELETE", "/zoo/animals/{id}"),
    ("GET", "/zoo/animals/{id}/toys/{toy_id}"),
    ("GET", "/zoo/{category}/animals/{id}/habitats/{habitat_id}/sections/{section_id}"),
    ("POST", "/inventory/{warehouse_id}/feeds/{feed_id}/items/{item_id}/batches/{batch_id}"),
    ("GET", "/complex/{a}/{b}/{c}/{d}/{e}/{f}/{g}/{h}/{i}"),
    ("GET", "/static/*"),
    ("GET", "/static/img/*"),
    ("GET", r"#^/legacy/(\d+)/(?P<slug>[a-z-]+)$#i"),
    ("HEAD,OPTIONS", "/zoo/health"),
];

const PATHS: &[&str] = &[
    "/zoo/animals/123",
    "/zoo/animals/123/toys/456",
    "/zoo/cats/animals/123/habitats/88/sections/5",
    "/inventory/1/feeds/2/items/3/batches/4",
    "/complex/1/2/3/4/5/6/7/8/9",
    "/static/img/logo.png",
    "/legacy/42/Old-Page",
    "/zoo/health",
];

fn table() -> RouteTable {
    let mut table = RouteTable::new();
    for (method, target) in ROUTES {
        table.register(
            method,
            target,
            Some(Dispatchable::handler_fn(|_| Ok(Response::text(StatusCode::OK, "ok")))),
        );
    }
    table.validate().unwrap();
    table
}

fn bench_route_throughput(c: &mut Criterion) {
    let table = table();
    c.bench_function("route_match", |b| {
        b.iter(|| {
            for path in PATHS {
                let res = table.match_path(path);
                black_box(&res);
            }
        })
    });
}

fn bench_pipeline_throughput(c: &mut Criterion) {
    let dispatcher = Arc::new(Dispatcher::new());
    let router = Router::with_table(Arc::clone(&dispatcher), table());
    let mut server = Server::new(dispatcher, &RuntimeConfig::default());
    server.add(Dispatchable::from_double_pass(router));

    c.bench_function("respond", |b| {
        b.iter(|| {
            for path in PATHS {
                let res = server.respond(Request::new(Method::GET, *path));
                black_box(&res);
            }
        })
    });
}

criterion_group!(benches, bench_route_throughput, bench_pipeline_throughput);
criterion_main!(benches);
