use std::fmt;

/// Route configuration error
///
/// Pattern routes compile lazily, so this surfaces the first time a route is
/// matched (or when [`RouteTable::validate`](super::RouteTable::validate)
/// forces compilation at startup). It indicates a bug in the route setup,
/// not a per-request condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The regex (or the regex generated from a URI template) does not compile
    InvalidPattern {
        /// The route target as registered
        pattern: String,
        /// Compiler diagnostic
        message: String,
    },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern { pattern, message } => {
                write!(f, "invalid route pattern '{}': {}", pattern, message)
            }
        }
    }
}

impl std::error::Error for RouteError {}
