use http::StatusCode;

use super::headers::Headers;
use super::stream::{MemoryStream, Stream};

/// An outgoing HTTP response.
///
/// Like [`Request`](super::Request), responses are modified through consuming
/// `with_*` operations. The body is a boxed [`Stream`], so responses are not
/// `Clone`; middleware that needs a different body swaps it with
/// [`Response::with_body`].
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    reason: Option<String>,
    headers: Headers,
    body: Box<dyn Stream>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// `200 OK` with no headers and an empty in-memory body.
    #[must_use]
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            reason: None,
            headers: Headers::new(),
            body: Box::new(MemoryStream::new()),
        }
    }

    /// `404 Not Found` with an empty body.
    #[must_use]
    pub fn not_found() -> Self {
        Self::new().with_status(StatusCode::NOT_FOUND)
    }

    /// Plain-text response with `Content-type: text/plain`.
    #[must_use]
    pub fn text(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new()
            .with_status(status)
            .with_header("Content-type", "text/plain; charset=utf-8")
            .with_body(MemoryStream::from_bytes(body.into()))
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Custom reason phrase if one was set, otherwise the canonical phrase
    /// for the status code (empty for unknown codes).
    #[must_use]
    pub fn reason_phrase(&self) -> &str {
        match &self.reason {
            Some(reason) => reason,
            None => self.status.canonical_reason().unwrap_or(""),
        }
    }

    #[must_use]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    #[must_use]
    pub fn body(&self) -> &dyn Stream {
        self.body.as_ref()
    }

    pub fn body_mut(&mut self) -> &mut dyn Stream {
        self.body.as_mut()
    }

    #[must_use]
    pub fn into_body(self) -> Box<dyn Stream> {
        self.body
    }

    /// Change the status; a previously set custom reason phrase is dropped.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self.reason = None;
        self
    }

    #[must_use]
    pub fn with_status_reason(mut self, status: StatusCode, reason: impl Into<String>) -> Self {
        self.status = status;
        self.reason = Some(reason.into());
        self
    }

    /// Replace all values of a header.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Append a value, keeping existing values of the same header.
    #[must_use]
    pub fn with_added_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Stream + 'static) -> Self {
        self.body = Box::new(body);
        self
    }

    #[must_use]
    pub fn with_boxed_body(mut self, body: Box<dyn Stream>) -> Self {
        self.body = body;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_phrase() {
        assert_eq!(Response::new().reason_phrase(), "OK");
        assert_eq!(Response::not_found().reason_phrase(), "Not Found");
        let custom = Response::new().with_status_reason(StatusCode::IM_A_TEAPOT, "Short and stout");
        assert_eq!(custom.reason_phrase(), "Short and stout");
        assert_eq!(
            custom.with_status(StatusCode::OK).reason_phrase(),
            "OK",
            "changing status drops the custom reason"
        );
    }

    #[test]
    fn test_text_body() {
        let mut res = Response::text(StatusCode::CREATED, "made it");
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(res.header("content-type"), Some("text/plain; charset=utf-8"));
        assert_eq!(res.body().size(), Some(7));
        assert_eq!(res.body_mut().contents().unwrap(), b"made it");
    }

    #[test]
    fn test_added_header_appends() {
        let res = Response::new()
            .with_added_header("Set-Cookie", "a=1")
            .with_added_header("Set-Cookie", "b=2");
        assert_eq!(res.headers().get_all("set-cookie").count(), 2);
        let res = res.with_header("Set-Cookie", "c=3");
        assert_eq!(res.headers().get_all("set-cookie").collect::<Vec<_>>(), vec!["c=3"]);
    }
}
