use http::{Method, Version};
use std::sync::Arc;

use super::headers::Headers;
use crate::ids::RequestId;
use crate::router::{ParamValue, ParamVec};

/// An incoming HTTP request.
///
/// Requests are values: every `with_*` operation consumes the request and
/// returns a modified copy. Cloning is cheap enough to do once per handler
/// call (the body is shared through an `Arc`).
///
/// Path variables captured by a matched route are carried as ordered
/// attributes (see [`Request::attribute`]).
#[derive(Debug, Clone)]
pub struct Request {
    id: RequestId,
    method: Method,
    target: String,
    version: Version,
    headers: Headers,
    body: Arc<[u8]>,
    attributes: ParamVec,
}

impl Request {
    /// Create a request for `method` and `target` (path plus optional query).
    #[must_use]
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            id: RequestId::new(),
            method,
            target: target.into(),
            version: Version::HTTP_11,
            headers: Headers::new(),
            body: Arc::from(Vec::new()),
            attributes: ParamVec::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> RequestId {
        self.id
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request target including any query string.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Request target with the query component stripped.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.target.find('?') {
            Some(pos) => &self.target[..pos],
            None => &self.target,
        }
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.target.find('?').map(|pos| &self.target[pos + 1..])
    }

    /// Decoded query parameter; the last occurrence wins.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        self.query()?
            .split('&')
            .filter_map(|pair| {
                let mut parts = pair.splitn(2, '=');
                let key = decode_form(parts.next()?);
                let value = decode_form(parts.next().unwrap_or(""));
                Some((key, value))
            })
            .filter(|(key, _)| key == name)
            .last()
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn version(&self) -> Version {
        self.version
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
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// All attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &ParamVec {
        &self.attributes
    }

    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&ParamValue> {
        self.attributes
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v)
    }

    #[must_use]
    pub fn with_id(mut self, id: RequestId) -> Self {
        self.id = id;
        self
    }

    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    #[must_use]
    pub fn with_version(mut self, version: Version) -> Self {
        self.version = version;
        self
    }

    /// Replace all values of a header. A valid `X-Request-Id` also becomes
    /// the request id.
    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        if let Some(id) = RequestId::from_header(name, &value) {
            self.id = id;
        }
        self.headers.set(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Arc::from(body.into());
        self
    }

    /// Set an attribute. An existing attribute of the same name keeps its
    /// position and takes the new value.
    #[must_use]
    pub fn with_attribute(mut self, name: &str, value: impl Into<ParamValue>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| k.as_ref() == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((Arc::from(name), value)),
        }
        self
    }

    /// Merge a set of attributes in order, overwriting same-named entries.
    #[must_use]
    pub fn with_attributes<I>(mut self, attributes: I) -> Self
    where
        I: IntoIterator<Item = (Arc<str>, ParamValue)>,
    {
        for (name, value) in attributes {
            match self.attributes.iter_mut().find(|(k, _)| *k == name) {
                Some(slot) => slot.1 = value,
                None => self.attributes.push((name, value)),
            }
        }
        self
    }

    #[must_use]
    pub fn without_attribute(mut self, name: &str) -> Self {
        self.attributes.retain(|(k, _)| k.as_ref() != name);
        self
    }
}

fn decode_form(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|s| s.into_owned())
        .unwrap_or(spaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_strips_query() {
        let req = Request::new(Method::GET, "/cats?limit=10&name=molly+cat");
        assert_eq!(req.path(), "/cats");
        assert_eq!(req.query(), Some("limit=10&name=molly+cat"));
        assert_eq!(req.query_param("limit").as_deref(), Some("10"));
        assert_eq!(req.query_param("name").as_deref(), Some("molly cat"));
        assert_eq!(req.query_param("missing"), None);
    }

    #[test]
    fn test_with_attribute_overwrites_in_place() {
        let req = Request::new(Method::GET, "/")
            .with_attribute("a", "1")
            .with_attribute("b", "2")
            .with_attribute("a", "3");
        let names: Vec<_> = req.attributes().iter().map(|(k, _)| k.as_ref()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(req.attribute("a").and_then(ParamValue::as_str), Some("3"));
    }

    #[test]
    fn test_with_operations_leave_original_untouched() {
        let original = Request::new(Method::GET, "/a");
        let changed = original.clone().with_target("/b").with_method(Method::POST);
        assert_eq!(original.target(), "/a");
        assert_eq!(original.method(), Method::GET);
        assert_eq!(changed.target(), "/b");
        assert_eq!(changed.id(), original.id());
    }

    #[test]
    fn test_request_id_header_is_adopted() {
        let id = RequestId::new();
        let req = Request::new(Method::GET, "/").with_header("x-request-id", id.to_string());
        assert_eq!(req.id(), id);

        let fallback = Request::new(Method::GET, "/");
        let kept = fallback.clone().with_header("X-Request-Id", "not-a-ulid");
        assert_eq!(kept.id(), fallback.id());
    }
}
