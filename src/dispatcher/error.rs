use std::fmt;
use std::io;

use crate::router::RouteError;

/// A dispatch could not be carried out.
///
/// These are programming or configuration errors and fail the whole dispatch
/// call. "No route matched" and "method not allowed" are not errors: they
/// produce regular responses.
#[derive(Debug)]
pub enum DispatchError {
    /// A service name is neither known to the locator nor registered as a
    /// constructible type
    UnknownService {
        /// The name that failed to resolve
        name: String,
    },
    /// Factory/service resolution did not reach an executable value within
    /// the configured depth (e.g. a factory that returns itself)
    ResolutionDepth {
        /// Configured maximum depth
        depth: usize,
    },
    /// A pattern route failed to compile while being matched
    Route(RouteError),
    /// Reading or writing a body stream failed
    Stream(io::Error),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::UnknownService { name } => {
                write!(f, "cannot dispatch: no service or type named '{}'", name)
            }
            DispatchError::ResolutionDepth { depth } => write!(
                f,
                "cannot dispatch: resolution did not settle within {} steps",
                depth
            ),
            DispatchError::Route(err) => write!(f, "cannot dispatch: {}", err),
            DispatchError::Stream(err) => write!(f, "stream error: {}", err),
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Route(err) => Some(err),
            DispatchError::Stream(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RouteError> for DispatchError {
    fn from(err: RouteError) -> Self {
        DispatchError::Route(err)
    }
}

impl From<io::Error> for DispatchError {
    fn from(err: io::Error) -> Self {
        DispatchError::Stream(err)
    }
}
