//! URI template compiler.
//!
//! Compiles a restricted subset of RFC 6570 into an anchored regex:
//!
//! | Expression  | Prefix | Element class            | Explode delimiter |
//! |-------------|--------|--------------------------|-------------------|
//! | `{name}`    |        | default variable pattern | `,`               |
//! | `{+name}`   |        | `.+`                     | `,`               |
//! | `{.name}`   | `.`    | `[^/.]+`                 | `.`               |
//! | `{/name}`   | `/`    | `[^/]+`                  | `/`               |
//!
//! A trailing `*` (`{/path*}`) explodes the variable: it matches one or more
//! elements separated by the delimiter and yields them as a list.
//!
//! Templates with an illegal expression compile to [`CompiledTemplate::Never`]
//! so route registration stays total; such a route simply never matches.

use regex::Regex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::warn;

use super::error::RouteError;
use super::route::{ParamValue, ParamVec};

struct Operator {
    prefix: &'static str,
    /// `None` selects the configured default variable pattern
    class: Option<&'static str>,
    delimiter: &'static str,
    split: char,
}

const SIMPLE: Operator = Operator {
    prefix: "",
    class: None,
    delimiter: ",",
    split: ',',
};

const RESERVED: Operator = Operator {
    prefix: "",
    class: Some(".+"),
    delimiter: ",",
    split: ',',
};

const LABEL: Operator = Operator {
    prefix: r"\.",
    class: Some("[^/.]+"),
    delimiter: r"\.",
    split: '.',
};

const PATH_SEGMENT: Operator = Operator {
    prefix: "/",
    class: Some("[^/]+"),
    delimiter: "/",
    split: '/',
};

fn operator(op: Option<char>) -> Option<&'static Operator> {
    match op {
        None => Some(&SIMPLE),
        Some('+') => Some(&RESERVED),
        Some('.') => Some(&LABEL),
        Some('/') => Some(&PATH_SEGMENT),
        Some(_) => None,
    }
}

/// A variable of a compiled template, in template order.
#[derive(Debug, Clone)]
pub(crate) struct TemplateVar {
    pub(crate) name: Arc<str>,
    /// Delimiter to split on when the variable is exploded
    pub(crate) explode: Option<char>,
}

#[derive(Debug)]
pub(crate) enum CompiledTemplate {
    Regex { regex: Regex, vars: Vec<TemplateVar> },
    Never,
}

/// Literal text before the first expression; used as a cheap pre-check.
pub(crate) fn literal_prefix(template: &str) -> &str {
    match template.find('{') {
        Some(pos) => &template[..pos],
        None => template,
    }
}

/// `[A-Za-z][A-Za-z0-9_]*`
pub(crate) fn is_valid_var_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

enum Piece<'a> {
    Literal(&'a str),
    Expression {
        op: &'static Operator,
        name: &'a str,
        explode: bool,
    },
}

fn parse(template: &str) -> Result<Vec<Piece<'_>>, String> {
    let mut pieces = Vec::new();
    let mut rest = template;
    let mut seen = HashSet::new();

    while !rest.is_empty() {
        let open = rest.find('{');
        let close = rest.find('}');
        match (open, close) {
            (None, None) => {
                pieces.push(Piece::Literal(rest));
                break;
            }
            (None, Some(_)) => return Err("unmatched '}'".to_string()),
            (Some(o), Some(c)) if c < o => return Err("unmatched '}'".to_string()),
            (Some(_), None) => return Err("unterminated expression".to_string()),
            (Some(o), Some(c)) => {
                if o > 0 {
                    pieces.push(Piece::Literal(&rest[..o]));
                }
                let body = &rest[o + 1..c];
                if body.contains('{') {
                    return Err(format!("nested expression '{{{}}}'", body));
                }
                let (op_char, name) = match body.chars().next() {
                    Some(ch) if !ch.is_ascii_alphanumeric() && ch != '_' => {
                        (Some(ch), &body[ch.len_utf8()..])
                    }
                    _ => (None, body),
                };
                let op = operator(op_char)
                    .ok_or_else(|| format!("unsupported operator in '{{{}}}'", body))?;
                let (name, explode) = match name.strip_suffix('*') {
                    Some(stripped) => (stripped, true),
                    None => (name, false),
                };
                if !is_valid_var_name(name) {
                    return Err(format!("illegal variable name in '{{{}}}'", body));
                }
                if !seen.insert(name) {
                    return Err(format!("duplicate variable '{}'", name));
                }
                pieces.push(Piece::Expression { op, name, explode });
                rest = &rest[c + 1..];
            }
        }
    }

    Ok(pieces)
}

/// Compile `template` into an anchored regex.
///
/// `default_pattern` is the element class for simple `{name}` expressions.
/// Syntax problems yield [`CompiledTemplate::Never`]; only a regex that fails
/// to compile (e.g. a broken default pattern) is an error.
pub(crate) fn compile(template: &str, default_pattern: &str) -> Result<CompiledTemplate, RouteError> {
    let pieces = match parse(template) {
        Ok(pieces) => pieces,
        Err(reason) => {
            warn!(
                template = %template,
                reason = %reason,
                "URI template is not valid; route will never match"
            );
            return Ok(CompiledTemplate::Never);
        }
    };

    let mut pattern = String::with_capacity(template.len() * 2);
    pattern.push('^');
    let mut vars = Vec::new();

    for piece in pieces {
        match piece {
            Piece::Literal(text) => pattern.push_str(&regex::escape(text)),
            Piece::Expression { op, name, explode } => {
                let class = op.class.unwrap_or(default_pattern);
                pattern.push_str(op.prefix);
                if explode {
                    pattern.push_str(&format!(
                        "(?P<{name}>(?:{class})(?:{delim}(?:{class}))*)",
                        delim = op.delimiter
                    ));
                } else {
                    pattern.push_str(&format!("(?P<{name}>{class})"));
                }
                vars.push(TemplateVar {
                    name: Arc::from(name),
                    explode: explode.then_some(op.split),
                });
            }
        }
    }
    pattern.push('$');

    let regex = Regex::new(&pattern).map_err(|e| RouteError::InvalidPattern {
        pattern: template.to_string(),
        message: e.to_string(),
    })?;

    Ok(CompiledTemplate::Regex { regex, vars })
}

impl CompiledTemplate {
    /// Match `path`, returning the variables in template order.
    pub(crate) fn captures(&self, path: &str) -> Option<ParamVec> {
        let CompiledTemplate::Regex { regex, vars } = self else {
            return None;
        };
        let caps = regex.captures(path)?;
        let mut params = ParamVec::with_capacity(vars.len());
        for var in vars {
            let Some(raw) = caps.name(&var.name) else {
                continue;
            };
            let value = match var.explode {
                Some(delim) => ParamValue::List(raw.as_str().split(delim).map(decode).collect()),
                None => ParamValue::Scalar(decode(raw.as_str())),
            };
            params.push((Arc::clone(&var.name), value));
        }
        Some(params)
    }
}

fn decode(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| raw.to_string())
}
