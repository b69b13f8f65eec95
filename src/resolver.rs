//! Construction of URIs from raw components, with or without a base.

use crate::{
    component::{Explicit, Port},
    error::{Error, ErrorKind},
    log,
    parser::{self, Parser, RawParts},
    pct_enc::decode,
    query::Query,
    registry::{Registry, RegistryRef},
    Uri,
};

/// A configurable URI resolver.
///
/// Without a base, a string must describe a complete URI: every component
/// that is left out has to be implied by the [registry]. With a base, a
/// string is a reference whose missing components are taken from the base.
///
/// [registry]: crate::registry
///
/// # Examples
///
/// ```
/// use uri_kit::{Resolver, Uri};
///
/// let base = Uri::parse("http://example.com/foo/bar")?;
/// let resolver = Resolver::new().with_base(&base);
///
/// assert_eq!(resolver.resolve("baz")?.to_string(), "http://example.com/foo/bar/baz");
/// assert_eq!(resolver.resolve("../baz")?.to_string(), "http://example.com/foo/baz");
/// assert_eq!(resolver.resolve("?baz=1")?.to_string(), "http://example.com/foo/bar?baz=1");
/// # Ok::<_, uri_kit::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
#[must_use]
pub struct Resolver<'a> {
    registry: RegistryRef<'a>,
    parser: Option<&'a Parser>,
    base: Option<&'a Uri>,
}

impl<'a> Resolver<'a> {
    /// Creates a new `Resolver` using the process-wide registry and no base.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given registry instead of the process-wide one.
    pub fn with_registry(mut self, registry: &'a Registry) -> Self {
        self.registry = RegistryRef::Borrowed(registry);
        self
    }

    /// Uses the given parser, with its scheme-specific grammars,
    /// instead of the generic pattern.
    pub fn with_parser(mut self, parser: &'a Parser) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Resolves strings as references against the given base.
    pub fn with_base(mut self, base: &'a Uri) -> Self {
        self.base = Some(base);
        self
    }

    /// Parses and resolves a URI string.
    ///
    /// # Errors
    ///
    /// Without a base, returns `Err` if the scheme, port or host is neither
    /// given nor implied ([`MissingScheme`], [`MissingPort`], [`MissingHost`]).
    ///
    /// With a base, returns `Err` if the reference changes the scheme to one
    /// with no well-known port and gives no port ([`UnknownSchemeNoPort`]).
    ///
    /// In both cases, returns `Err` if the path rises above the root
    /// ([`PathEscapesRoot`]), if the port does not fit in 16 bits
    /// ([`InvalidPort`]) or if the query is malformed ([`InvalidQuerySyntax`]).
    ///
    /// [`MissingScheme`]: ErrorKind::MissingScheme
    /// [`MissingPort`]: ErrorKind::MissingPort
    /// [`MissingHost`]: ErrorKind::MissingHost
    /// [`UnknownSchemeNoPort`]: ErrorKind::UnknownSchemeNoPort
    /// [`PathEscapesRoot`]: ErrorKind::PathEscapesRoot
    /// [`InvalidPort`]: ErrorKind::InvalidPort
    /// [`InvalidQuerySyntax`]: ErrorKind::InvalidQuerySyntax
    pub fn resolve(&self, s: &str) -> Result<Uri, Error> {
        let raw = match self.parser {
            Some(parser) => parser.parse(s, self.base.and_then(Uri::scheme)),
            None => parser::parse(s),
        };
        let res = self.resolve_parts(&raw);
        if let Err(_e) = &res {
            log::trace!("failed to resolve {s:?}: {_e}");
        }
        res
    }

    /// Resolves raw components that have already been split.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`resolve`](Self::resolve).
    pub fn resolve_parts(&self, raw: &RawParts<'_>) -> Result<Uri, Error> {
        self.registry.with(|registry| match self.base {
            Some(base) => merge(registry, base, raw),
            None => construct(registry, raw),
        })
    }
}

fn parse_port(raw: &str) -> Result<Option<u16>, Error> {
    if raw.is_empty() {
        return Ok(None);
    }
    raw.parse()
        .map(Some)
        .map_err(|_| Error::new(ErrorKind::InvalidPort))
}

/// Builds a URI with no base, filling in omitted components from the registry.
fn construct(registry: &Registry, raw: &RawParts<'_>) -> Result<Uri, Error> {
    if raw.is_empty() {
        return Ok(Uri::default());
    }

    let mut explicit = Explicit::default();
    let port_lit = parse_port(raw.port)?;

    let scheme = if raw.scheme.is_empty() {
        port_lit
            .and_then(|n| registry.scheme_for_port(n))
            .ok_or(Error::new(ErrorKind::MissingScheme))?
            .to_string()
    } else {
        explicit.scheme = true;
        raw.scheme.to_ascii_lowercase()
    };

    let port = match port_lit {
        Some(n) => {
            explicit.port = true;
            Port::Number(n)
        }
        None => registry
            .port_for_scheme(&scheme)
            .ok_or(Error::new(ErrorKind::MissingPort))?,
    };

    let host = if raw.host.is_empty() {
        registry
            .default_host(&scheme)
            .ok_or(Error::new(ErrorKind::MissingHost))?
            .to_string()
    } else {
        explicit.host = true;
        decode(raw.host).into_owned()
    };

    let path = if raw.path.is_empty() {
        String::from("/")
    } else {
        resolve_path(&decode(raw.path), "/")?
    };

    Ok(Uri {
        scheme: Some(scheme),
        host: Some(host),
        port: Some(port),
        path,
        query: Query::decode(raw.query)?,
        fragment: decode(raw.fragment).into_owned(),
        explicit,
    })
}

/// Resolves a reference against a base.
fn merge(registry: &Registry, base: &Uri, raw: &RawParts<'_>) -> Result<Uri, Error> {
    let port_lit = parse_port(raw.port)?;

    let (scheme, inherited_port) = if raw.scheme.is_empty() {
        let port = if port_lit.is_none() { base.port } else { None };
        (base.scheme.clone(), port)
    } else {
        let scheme = raw.scheme.to_ascii_lowercase();
        let port = match port_lit {
            Some(_) => None,
            None => Some(
                registry
                    .port_for_scheme(&scheme)
                    .ok_or(Error::new(ErrorKind::UnknownSchemeNoPort))?,
            ),
        };
        (Some(scheme), port)
    };

    // The base may be the empty reference, in which case nothing is inherited.
    let scheme = scheme.ok_or(Error::new(ErrorKind::MissingScheme))?;
    let port = match port_lit.map(Port::Number).or(inherited_port) {
        Some(port) => port,
        None => registry
            .port_for_scheme(&scheme)
            .ok_or(Error::new(ErrorKind::MissingPort))?,
    };

    let (host, path, query, fragment);
    if !raw.host.is_empty() {
        host = Some(decode(raw.host).into_owned());
        path = if raw.path.is_empty() {
            String::from("/")
        } else {
            resolve_path(&decode(raw.path), &base.path)?
        };
        query = Query::decode(raw.query)?;
        fragment = decode(raw.fragment).into_owned();
    } else if !raw.path.is_empty() {
        host = base.host.clone();
        path = resolve_path(&decode(raw.path), &base.path)?;
        query = Query::decode(raw.query)?;
        fragment = decode(raw.fragment).into_owned();
    } else {
        host = base.host.clone();
        path = base.path.clone();
        query = if raw.query.is_empty() {
            base.query.clone()
        } else {
            Query::decode(raw.query)?
        };
        fragment = if raw.fragment.is_empty() {
            base.fragment.clone()
        } else {
            decode(raw.fragment).into_owned()
        };
    }

    let host = match host {
        Some(host) => host,
        None => registry
            .default_host(&scheme)
            .ok_or(Error::new(ErrorKind::MissingHost))?
            .to_string(),
    };

    let explicit = Explicit {
        scheme: true,
        host: !registry.is_default_host(&scheme, &host),
        port: !registry.is_well_known(&scheme, port),
    };

    Ok(Uri {
        scheme: Some(scheme),
        host: Some(host),
        port: Some(port),
        path,
        query,
        fragment,
        explicit,
    })
}

/// Removes dot segments from a decoded path.
///
/// A path starting with `'/'` is resolved on its own; any other path is
/// appended to every segment of `base`. Empty and `.` segments are dropped
/// and a `..` segment drops the segment before it. A trailing `'/'`, `.` or
/// `..` in `path` leaves a trailing `'/'` on the output unless it is the root.
///
/// The output always starts with `'/'`.
pub(crate) fn resolve_path(path: &str, base: &str) -> Result<String, Error> {
    let mut stack: Vec<&str> = Vec::new();
    if !path.starts_with('/') {
        stack.extend(base.split('/').filter(|seg| !seg.is_empty()));
    }

    for seg in path.split('/') {
        match seg {
            "" | "." => {}
            ".." => {
                if stack.pop().is_none() {
                    return Err(Error::new(ErrorKind::PathEscapesRoot));
                }
            }
            _ => stack.push(seg),
        }
    }

    let trailing_slash = matches!(path.rsplit('/').next(), Some("" | "." | ".."));

    let mut buf = String::with_capacity(path.len() + base.len() + 1);
    for seg in &stack {
        buf.push('/');
        buf.push_str(seg);
    }
    if buf.is_empty() || trailing_slash {
        buf.push('/');
    }
    Ok(buf)
}
