//! Splitting of URI strings into raw components.

use indexmap::IndexMap;
use regex::{Captures, Regex};
use std::sync::OnceLock;

/// The raw components of a URI string, not yet percent-decoded.
///
/// An absent component and an empty one are both the empty string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RawParts<'a> {
    /// Scheme, without the trailing `':'`.
    pub scheme: &'a str,
    /// Host, without the leading `"//"`.
    pub host: &'a str,
    /// Port, without the leading `':'`.
    pub port: &'a str,
    /// Path.
    pub path: &'a str,
    /// Query, without the leading `'?'`.
    pub query: &'a str,
    /// Fragment, without the leading `'#'`.
    pub fragment: &'a str,
}

impl RawParts<'_> {
    /// Checks whether every component is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == RawParts::default()
    }
}

const GENERIC: &str = r"(?s)^(?:(?P<scheme>[A-Za-z][A-Za-z0-9+.\-]*):)?(?://(?P<host>[^/?#:]*)(?::(?P<port>[0-9]*))?)?(?P<path>[^?#]*)(?:\?(?P<query>[^#]*))?(?:#(?P<fragment>.*))?$";

fn generic() -> &'static Grammar {
    static GRAMMAR: OnceLock<Grammar> = OnceLock::new();
    GRAMMAR.get_or_init(|| Grammar::new(GENERIC).expect("generic pattern should compile"))
}

/// A pattern splitting URI strings into components.
///
/// The pattern may use the named capture groups `scheme`, `host`, `port`,
/// `path`, `query` and `fragment`; a group that is missing or does not
/// participate in a match yields an empty component.
///
/// # Examples
///
/// A grammar for a scheme whose host may contain colons and that never has a port:
///
/// ```
/// use uri_kit::parser::{Grammar, Parser};
///
/// let grammar = Grammar::new(r"^(?:(?P<scheme>urn):)?(?P<host>[^/?#]*)(?P<path>[^?#]*)$").unwrap();
/// let parser = Parser::new().with_grammar("urn", grammar);
///
/// let raw = parser.parse("urn:isbn:0451450523", None);
/// assert_eq!(raw.scheme, "urn");
/// assert_eq!(raw.host, "isbn:0451450523");
/// ```
#[derive(Clone, Debug)]
pub struct Grammar {
    re: Regex,
}

impl Grammar {
    /// Compiles a grammar from a regular expression.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the pattern is not a valid regular expression.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(|re| Self { re })
    }

    fn captures<'a>(&self, s: &'a str) -> Option<RawParts<'a>> {
        let caps = self.re.captures(s)?;
        let group = |caps: &Captures<'a>, name: &str| caps.name(name).map_or("", |m| m.as_str());
        Some(RawParts {
            scheme: group(&caps, "scheme"),
            host: group(&caps, "host"),
            port: group(&caps, "port"),
            path: group(&caps, "path"),
            query: group(&caps, "query"),
            fragment: group(&caps, "fragment"),
        })
    }
}

/// Splits URI strings into [`RawParts`].
///
/// A generic pattern handles every string: an optional `scheme:`, an
/// optional `//host` with an optional `:port`, a path up to `'?'` or `'#'`,
/// an optional `?query` and an optional `#fragment`. Grammars registered for
/// a scheme with [`with_grammar`](Self::with_grammar) take precedence for
/// strings of that scheme.
#[derive(Clone, Debug, Default)]
pub struct Parser {
    overrides: IndexMap<String, Grammar>,
}

impl Parser {
    /// Creates a parser with no scheme-specific grammars.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a grammar for a scheme, replacing any previous one.
    #[must_use]
    pub fn with_grammar(mut self, scheme: &str, grammar: Grammar) -> Self {
        self.overrides.insert(scheme.to_ascii_lowercase(), grammar);
        self
    }

    /// Splits a URI string into raw components. This never fails.
    ///
    /// If the string has no scheme of its own, the grammar of `base_scheme`
    /// is tried before the generic pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::parser::Parser;
    ///
    /// let raw = Parser::new().parse("https://example.com:8080/my/page?pg=3#frag", None);
    /// assert_eq!(raw.scheme, "https");
    /// assert_eq!(raw.host, "example.com");
    /// assert_eq!(raw.port, "8080");
    /// assert_eq!(raw.path, "/my/page");
    /// assert_eq!(raw.query, "pg=3");
    /// assert_eq!(raw.fragment, "frag");
    /// ```
    #[must_use]
    pub fn parse<'a>(&self, s: &'a str, base_scheme: Option<&str>) -> RawParts<'a> {
        let generic = generic().captures(s).unwrap_or_default();

        let scheme = if generic.scheme.is_empty() {
            base_scheme.map(str::to_ascii_lowercase)
        } else {
            Some(generic.scheme.to_ascii_lowercase())
        };

        scheme
            .and_then(|scheme| self.overrides.get(&scheme))
            .and_then(|grammar| grammar.captures(s))
            .unwrap_or(generic)
    }
}

/// Splits a URI string into raw components with the generic pattern.
#[must_use]
pub fn parse(s: &str) -> RawParts<'_> {
    generic().captures(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn check(s: &str, expected: [&str; 6]) {
        let raw = parse(s);
        assert_eq!(
            [raw.scheme, raw.host, raw.port, raw.path, raw.query, raw.fragment],
            expected,
            "{s:?}"
        );
    }

    #[test]
    fn generic_pattern() {
        check("", ["", "", "", "", "", ""]);
        check("http://a:80/b?c#d", ["http", "a", "80", "/b", "c", "d"]);
        check("//a/b", ["", "a", "", "/b", "", ""]);
        check("//a:/b", ["", "a", "", "/b", "", ""]);
        check("ftp:", ["ftp", "", "", "", "", ""]);
        check("file:///", ["file", "", "", "/", "", ""]);
        check("../a/b", ["", "", "", "../a/b", "", ""]);
        check("?x=1", ["", "", "", "", "x=1", ""]);
        check("#f?g#h", ["", "", "", "", "", "f?g#h"]);
        check("a?b?c", ["", "", "", "a", "b?c", ""]);
        check("1a:b", ["", "", "", "1a:b", "", ""]);
        check("#line\nbreak", ["", "", "", "", "", "line\nbreak"]);
    }

    #[test]
    fn base_scheme_grammar() {
        let grammar = Grammar::new(r"^(?P<path>[^#]*)(?:#(?P<fragment>.*))?$").unwrap();
        let parser = Parser::new().with_grammar("x-raw", grammar);

        let raw = parser.parse("a?b#c", Some("X-Raw"));
        assert_eq!(raw.path, "a?b");
        assert_eq!(raw.query, "");
        assert_eq!(raw.fragment, "c");

        // A scheme of its own overrides the base scheme.
        let raw = parser.parse("http:a?b", Some("x-raw"));
        assert_eq!(raw.path, "a");
        assert_eq!(raw.query, "b");

        // A grammar that does not match falls back to the generic pattern.
        let grammar = Grammar::new(r"^never$").unwrap();
        let parser = Parser::new().with_grammar("http", grammar);
        assert_eq!(parser.parse("http://a/", None).host, "a");
    }
}
