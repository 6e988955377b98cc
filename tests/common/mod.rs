//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use http::StatusCode;
use switchyard::dispatcher::Dispatchable;
use switchyard::server::Response;

/// Ordered record of which units ran.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, entry: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == entry).count()
    }
}

/// Middleware that records `name` and continues.
pub fn recording_middleware(log: &CallLog, name: &str) -> Dispatchable {
    let log = log.clone();
    let name = name.to_string();
    Dispatchable::middleware_fn(move |req, delegate| {
        log.push(name.clone());
        delegate.handle(req)
    })
}

/// Middleware that records `name` and answers without continuing.
pub fn halting_middleware(log: &CallLog, name: &str, status: StatusCode) -> Dispatchable {
    let log = log.clone();
    let name = name.to_string();
    Dispatchable::middleware_fn(move |_req, _delegate| {
        log.push(name.clone());
        Ok(Response::text(status, name.clone()))
    })
}

/// Handler that records `name` and returns `body` as text.
pub fn text_handler(log: &CallLog, name: &str, body: &str) -> Dispatchable {
    let log = log.clone();
    let name = name.to_string();
    let body = body.to_string();
    Dispatchable::handler_fn(move |_req| {
        log.push(name.clone());
        Ok(Response::text(StatusCode::OK, body.clone()))
    })
}

pub fn body_string(mut res: Response) -> String {
    let body = res.body_mut();
    if body.is_seekable() {
        body.rewind().unwrap();
    }
    String::from_utf8(body.contents().unwrap()).unwrap()
}

pub mod temp_files {
    use std::io::Write;

    use tempfile::NamedTempFile;

    /// Temporary file with the given extension; removed on drop.
    pub fn create_temp_manifest(content: &str, ext: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new()
            .prefix("switchyard_test_")
            .suffix(&format!(".{ext}"))
            .tempfile()
            .unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }
}
