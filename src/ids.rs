use std::fmt;
use std::str::FromStr;

use ulid::Ulid;

/// Header a client can use to supply its own request id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Per-request identifier, a ULID.
///
/// Every [`Request`](crate::server::Request) carries one so log lines emitted
/// along a single dispatch can be correlated. Ids sort by creation time.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub struct RequestId(Ulid);

impl RequestId {
    #[must_use]
    pub fn new() -> Self {
        Self(Ulid::new())
    }

    /// Id carried by a `name: value` header pair.
    ///
    /// `None` unless `name` is [`REQUEST_ID_HEADER`] (any case) and `value`
    /// is a well-formed ULID.
    #[must_use]
    pub fn from_header(name: &str, value: &str) -> Option<Self> {
        if !name.eq_ignore_ascii_case(REQUEST_ID_HEADER) {
            return None;
        }
        value.trim().parse().ok()
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RequestId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ulid::from_string(s).map(Self)
    }
}
