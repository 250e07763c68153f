//! Host-to-runtime script calls
//!
//! Calls are rendered as `RE.<method>(<args>)`. String arguments are
//! single-quoted and escaped so that no argument can terminate its literal
//! early or inject script of its own.

use std::fmt;

use crate::SCRIPT_NAMESPACE;

/// A single argument of a script call
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptArg {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl From<&str> for ScriptArg {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for ScriptArg {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for ScriptArg {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for ScriptArg {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for ScriptArg {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl ScriptArg {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for ScriptArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "'{}'", escape_js_string(s)),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) if n.is_finite() => write!(f, "{n}"),
            Self::Float(_) => write!(f, "0"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

/// A call into the editing script's namespace
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptCall {
    pub method: String,
    pub args: Vec<ScriptArg>,
}

impl ScriptCall {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<ScriptArg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Parse a rendered call back into method and arguments
    ///
    /// Only the forms produced by [`ScriptCall`]'s `Display` are accepted.
    pub fn parse(script: &str) -> Option<Self> {
        let rest = script.trim().strip_prefix(SCRIPT_NAMESPACE)?.strip_prefix('.')?;
        let open = rest.find('(')?;
        let method = &rest[..open];
        if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return None;
        }
        let body = rest[open + 1..].trim_end().strip_suffix(')')?;
        let args = parse_args(body)?;
        Some(Self {
            method: method.to_string(),
            args,
        })
    }
}

impl fmt::Display for ScriptCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCRIPT_NAMESPACE}.{}(", self.method)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{arg}")?;
        }
        write!(f, ")")
    }
}

/// Escape a string for interpolation inside a single-quoted script literal
pub fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 || c == '\u{7f}' => {
                out.push_str(&format!("\\u{:04x}", c as u32));
            }
            c => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_js_string`]; `None` on a dangling or unknown escape
pub fn unescape_js_string(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '\\' => out.push('\\'),
            '\'' => out.push('\''),
            '"' => out.push('"'),
            'n' => out.push('\n'),
            'r' => out.push('\r'),
            't' => out.push('\t'),
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                if hex.len() != 4 {
                    return None;
                }
                let code = u32::from_str_radix(&hex, 16).ok()?;
                out.push(char::from_u32(code)?);
            }
            _ => return None,
        }
    }
    Some(out)
}

fn parse_args(body: &str) -> Option<Vec<ScriptArg>> {
    let mut args = Vec::new();
    let mut rest = body.trim_start();
    while !rest.is_empty() {
        let (arg, remaining) = if let Some(quoted) = rest.strip_prefix('\'') {
            let end = closing_quote(quoted)?;
            let arg = ScriptArg::Str(unescape_js_string(&quoted[..end])?);
            (arg, &quoted[end + 1..])
        } else {
            let end = rest.find(',').unwrap_or(rest.len());
            (parse_literal(rest[..end].trim())?, &rest[end..])
        };
        args.push(arg);

        rest = remaining.trim_start();
        if let Some(next) = rest.strip_prefix(',') {
            rest = next.trim_start();
            if rest.is_empty() {
                return None;
            }
        } else if !rest.is_empty() {
            return None;
        }
    }
    Some(args)
}

/// Index of the unescaped closing quote
fn closing_quote(s: &str) -> Option<usize> {
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' => escaped = true,
            '\'' => return Some(i),
            _ => {}
        }
    }
    None
}

fn parse_literal(token: &str) -> Option<ScriptArg> {
    match token {
        "true" => Some(ScriptArg::Bool(true)),
        "false" => Some(ScriptArg::Bool(false)),
        _ => token
            .parse::<i64>()
            .map(ScriptArg::Int)
            .or_else(|_| token.parse::<f64>().map(ScriptArg::Float))
            .ok(),
    }
}
