use once_cell::sync::OnceCell;
use regex::Regex;
use serde::Serialize;
use smallvec::SmallVec;
use std::fmt;
use std::sync::Arc;

use super::error::RouteError;
use super::method_map::MethodMap;
use super::template::{self, CompiledTemplate};

/// Maximum number of captured parameters before heap allocation.
/// Most routes capture ≤4 variables (e.g. `/users/{id}/posts/{post_id}`).
pub const MAX_INLINE_PARAMS: usize = 8;

/// Ordered parameter storage: captures of a route match and request
/// attributes. Insertion order is template order.
pub type ParamVec = SmallVec<[(Arc<str>, ParamValue); MAX_INLINE_PARAMS]>;

/// Value of a captured variable or request attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    Scalar(String),
    /// Exploded template variable (`{/path*}`), split on its delimiter
    List(Vec<String>),
}

impl ParamValue {
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Scalar(s) => Some(s),
            ParamValue::List(_) => None,
        }
    }

    #[must_use]
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            ParamValue::List(items) => Some(items),
            ParamValue::Scalar(_) => None,
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Scalar(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Scalar(value)
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(value: Vec<String>) -> Self {
        ParamValue::List(value)
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Scalar(s) => f.write_str(s),
            ParamValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// How a route target is matched. Fixed when the route is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    /// Exact path equality
    Static,
    /// Path starts with a literal prefix (registered as `/prefix/*`)
    Prefix,
    /// Regex or URI template
    Pattern,
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteKind::Static => "static",
            RouteKind::Prefix => "prefix",
            RouteKind::Pattern => "pattern",
        };
        f.pad(name)
    }
}

/// Regex route. Leading/trailing delimiters (`#^/cat/(\d+)$#i`) are
/// stripped and trailing flags become an inline flag group.
#[derive(Debug)]
pub(crate) struct RegexMatcher {
    source: String,
    compiled: OnceCell<Result<Regex, RouteError>>,
}

const REGEX_DELIMITERS: [char; 8] = ['#', '~', '@', '!', '%', ';', ',', '`'];

impl RegexMatcher {
    fn new(source: &str) -> Self {
        Self {
            source: source.to_string(),
            compiled: OnceCell::new(),
        }
    }

    fn compile(&self) -> Result<Regex, RouteError> {
        let pattern = strip_delimiters(&self.source)?;
        Regex::new(&pattern).map_err(|e| RouteError::InvalidPattern {
            pattern: self.source.clone(),
            message: e.to_string(),
        })
    }

    fn regex(&self) -> Result<&Regex, RouteError> {
        self.compiled
            .get_or_init(|| self.compile())
            .as_ref()
            .map_err(Clone::clone)
    }

    /// Captures keyed by group index (`"0"` is the whole match) and, for
    /// named groups, additionally by name.
    fn captures(&self, path: &str) -> Result<Option<ParamVec>, RouteError> {
        let regex = self.regex()?;
        let Some(caps) = regex.captures(path) else {
            return Ok(None);
        };
        let mut params = ParamVec::new();
        for (index, name) in regex.capture_names().enumerate() {
            let Some(m) = caps.get(index) else {
                continue;
            };
            params.push((Arc::from(index.to_string()), ParamValue::from(m.as_str())));
            if let Some(name) = name {
                params.push((Arc::from(name), ParamValue::from(m.as_str())));
            }
        }
        Ok(Some(params))
    }
}

fn strip_delimiters(source: &str) -> Result<String, RouteError> {
    let Some(open) = source.chars().next() else {
        return Ok(String::new());
    };
    if !REGEX_DELIMITERS.contains(&open) {
        return Ok(source.to_string());
    }
    let Some(close) = source.rfind(open).filter(|&pos| pos > 0) else {
        return Ok(source.to_string());
    };
    let body = &source[open.len_utf8()..close];
    let mut inline = String::new();
    for flag in source[close + open.len_utf8()..].chars() {
        match flag {
            'i' | 'm' | 's' | 'x' | 'U' => inline.push(flag),
            // unicode is always on; D has no equivalent
            'u' | 'D' => {}
            other => {
                return Err(RouteError::InvalidPattern {
                    pattern: source.to_string(),
                    message: format!("unsupported regex modifier '{}'", other),
                })
            }
        }
    }
    if inline.is_empty() {
        Ok(body.to_string())
    } else {
        Ok(format!("(?{}){}", inline, body))
    }
}

/// URI template route; compiled on first use.
#[derive(Debug)]
pub(crate) struct TemplateMatcher {
    template: String,
    literal_prefix: String,
    default_pattern: String,
    compiled: OnceCell<Result<CompiledTemplate, RouteError>>,
}

impl TemplateMatcher {
    fn new(template: &str, default_pattern: &str) -> Self {
        Self {
            template: template.to_string(),
            literal_prefix: template::literal_prefix(template).to_string(),
            default_pattern: default_pattern.to_string(),
            compiled: OnceCell::new(),
        }
    }

    fn compiled(&self) -> Result<&CompiledTemplate, RouteError> {
        self.compiled
            .get_or_init(|| template::compile(&self.template, &self.default_pattern))
            .as_ref()
            .map_err(Clone::clone)
    }

    fn captures(&self, path: &str) -> Result<Option<ParamVec>, RouteError> {
        if !path.starts_with(&self.literal_prefix) {
            return Ok(None);
        }
        Ok(self.compiled()?.captures(path))
    }
}

#[derive(Debug)]
pub(crate) enum PatternMatcher {
    Regex(RegexMatcher),
    Template(TemplateMatcher),
}

#[derive(Debug)]
enum Matcher {
    /// Static path or prefix literal
    Literal(String),
    Pattern(PatternMatcher),
}

/// A registered route: a target, its kind and the per-method dispatchables.
#[derive(Debug)]
pub struct Route {
    target: String,
    kind: RouteKind,
    matcher: Matcher,
    methods: MethodMap,
}

impl Route {
    /// Create a route, deriving its kind from the target syntax:
    ///
    /// - `/path/*` → [`RouteKind::Prefix`] (the `*` is stripped)
    /// - `/path/{var}` → [`RouteKind::Pattern`] (URI template)
    /// - `/path` → [`RouteKind::Static`]
    /// - anything else → [`RouteKind::Pattern`] (regex)
    ///
    /// `template_pattern` is the element class for simple `{var}` expressions.
    #[must_use]
    pub fn new(target: &str, template_pattern: &str) -> Self {
        let (kind, matcher) = if target.starts_with('/') {
            if let Some(prefix) = target.strip_suffix('*') {
                (RouteKind::Prefix, Matcher::Literal(prefix.to_string()))
            } else if target.contains('{') {
                (
                    RouteKind::Pattern,
                    Matcher::Pattern(PatternMatcher::Template(TemplateMatcher::new(
                        target,
                        template_pattern,
                    ))),
                )
            } else {
                (RouteKind::Static, Matcher::Literal(target.to_string()))
            }
        } else {
            (
                RouteKind::Pattern,
                Matcher::Pattern(PatternMatcher::Regex(RegexMatcher::new(target))),
            )
        };

        Self {
            target: target.to_string(),
            kind,
            matcher,
            methods: MethodMap::new(),
        }
    }

    /// The target exactly as registered.
    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Static path or prefix literal; `None` for pattern routes.
    #[must_use]
    pub fn literal(&self) -> Option<&str> {
        match &self.matcher {
            Matcher::Literal(literal) => Some(literal),
            Matcher::Pattern(_) => None,
        }
    }

    #[must_use]
    pub fn methods(&self) -> &MethodMap {
        &self.methods
    }

    pub fn methods_mut(&mut self) -> &mut MethodMap {
        &mut self.methods
    }

    /// Match `path` (query already stripped) against this route.
    ///
    /// Captures are returned by value and never stored on the route, so
    /// nothing carries over from one request to the next. Static and prefix
    /// routes capture nothing.
    pub fn matches(&self, path: &str) -> Result<Option<ParamVec>, RouteError> {
        match &self.matcher {
            Matcher::Literal(literal) => {
                let hit = match self.kind {
                    RouteKind::Prefix => path.starts_with(literal.as_str()),
                    _ => path == literal,
                };
                Ok(hit.then(ParamVec::new))
            }
            Matcher::Pattern(PatternMatcher::Regex(re)) => re.captures(path),
            Matcher::Pattern(PatternMatcher::Template(tpl)) => tpl.captures(path),
        }
    }

    /// Force compilation of a pattern route.
    pub fn validate(&self) -> Result<(), RouteError> {
        match &self.matcher {
            Matcher::Literal(_) => Ok(()),
            Matcher::Pattern(PatternMatcher::Regex(re)) => re.regex().map(|_| ()),
            Matcher::Pattern(PatternMatcher::Template(tpl)) => tpl.compiled().map(|_| ()),
        }
    }
}
