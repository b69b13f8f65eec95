mod mutable;

use crate::{
    component::{Explicit, Port},
    error::Error,
    pct_enc::{encoder, EString},
    query::Query,
    render::{Parts, Renderer},
    resolver::Resolver,
};
use core::str::FromStr;

/// A URI with every component decoded and defaulted.
///
/// A `Uri` is built by resolving a string, either on its own with
/// [`parse`](Self::parse) or against a base with
/// [`parse_relative`](Self::parse_relative). Components left out of the
/// string are filled in from the [registry] or the base, so that a parsed
/// `Uri` always has a scheme, a host and a port. Components are stored
/// percent-decoded and are encoded again when rendered.
///
/// The only `Uri` without a scheme, host or port is the empty reference,
/// which is what the empty string parses to and what [`Default`] returns.
/// Its path is `/`.
///
/// [registry]: crate::registry
///
/// # Examples
///
/// ```
/// use uri_kit::{component::Port, Uri};
///
/// let uri = Uri::parse("https://example.com:8080/my/page?pg=3#frag")?;
/// assert_eq!(uri.scheme(), Some("https"));
/// assert_eq!(uri.host(), Some("example.com"));
/// assert_eq!(uri.port(), Some(Port::Number(8080)));
/// assert_eq!(uri.path(), "/my/page");
/// assert_eq!(uri.query()["pg"], "3");
/// assert_eq!(uri.fragment(), "frag");
///
/// let uri = Uri::parse("//example.com:443/")?;
/// assert_eq!(uri.scheme(), Some("https"));
/// assert_eq!(uri.to_string(), "//example.com:443/");
/// # Ok::<_, uri_kit::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Uri {
    pub(crate) scheme: Option<String>,
    pub(crate) host: Option<String>,
    pub(crate) port: Option<Port>,
    // Decoded, always starts with '/'.
    pub(crate) path: String,
    pub(crate) query: Query,
    pub(crate) fragment: String,
    pub(crate) explicit: Explicit,
}

impl Default for Uri {
    fn default() -> Self {
        Self {
            scheme: None,
            host: None,
            port: None,
            path: String::from("/"),
            query: Query::new(),
            fragment: String::new(),
            explicit: Explicit::default(),
        }
    }
}

impl Uri {
    /// Parses a complete URI, using the process-wide registry for
    /// components that are left out.
    ///
    /// See [`Resolver::resolve`] for the possible errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{component::Port, ErrorKind, Uri};
    ///
    /// let uri = Uri::parse("file:///")?;
    /// assert_eq!(uri.host(), Some("localhost"));
    /// assert_eq!(uri.port(), Some(Port::Unused));
    ///
    /// let e = Uri::parse("example.com/a").unwrap_err();
    /// assert_eq!(e.kind(), ErrorKind::MissingScheme);
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn parse(s: &str) -> Result<Uri, Error> {
        Resolver::new().resolve(s)
    }

    /// Parses a reference and resolves it against `base`.
    ///
    /// See [`Resolver::resolve`] for the possible errors.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let base = Uri::parse("https://example.com:8080/my/page?pg=3#frag")?;
    ///
    /// let uri = Uri::parse_relative("?x=1", &base)?;
    /// assert_eq!(uri.to_string(), "https://example.com:8080/my/page?x=1#frag");
    ///
    /// let uri = Uri::parse_relative("ftp:", &base)?;
    /// assert_eq!(uri.to_string(), "ftp://example.com/my/page?pg=3#frag");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn parse_relative(s: &str, base: &Uri) -> Result<Uri, Error> {
        Resolver::new().with_base(base).resolve(s)
    }

    /// Returns the scheme, in lowercase.
    #[must_use]
    pub fn scheme(&self) -> Option<&str> {
        self.scheme.as_deref()
    }

    /// Returns the decoded host.
    #[must_use]
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref()
    }

    /// Returns the port.
    #[must_use]
    pub fn port(&self) -> Option<Port> {
        self.port
    }

    /// Returns the decoded path, which always starts with `'/'`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the query mapping.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the query as a percent-encoded string, without the leading `'?'`.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let uri = Uri::parse("http://a/?q=a+b&r[s]=t")?;
    /// assert_eq!(uri.query_string(), "q=a%20b&r%5Bs%5D=t");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    #[must_use]
    pub fn query_string(&self) -> EString<encoder::Query> {
        self.query.encode()
    }

    /// Returns the decoded fragment, which is empty if there is none.
    #[must_use]
    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    /// Returns which of scheme, host and port were given explicitly.
    #[must_use]
    pub fn explicit(&self) -> Explicit {
        self.explicit
    }

    /// Renders the selected components with the process-wide registry.
    ///
    /// See [`Renderer::render`] for details.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`PortWithoutHost`] if the port is to be rendered
    /// without a host.
    ///
    /// [`PortWithoutHost`]: crate::ErrorKind::PortWithoutHost
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{Parts, Uri};
    ///
    /// let uri = Uri::parse("http://example.com:8080/a?b=c#d")?;
    /// assert_eq!(uri.render(Parts::PATH | Parts::QUERY)?, "/a?b=c");
    /// assert_eq!(uri.render(Parts::SCHEME | Parts::HOST)?, "http://example.com");
    /// assert!(uri.render(Parts::PORT).is_err());
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn render(&self, parts: Parts) -> Result<String, Error> {
        Renderer::new().render(self, parts)
    }

    /// Renders the shortest reference that resolves against `base` to this URI.
    ///
    /// See [`Renderer::render_relative`] for details.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`render`](Self::render).
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let base = Uri::parse("http://example.com/a/b?c=d#e")?;
    ///
    /// let uri = Uri::parse("http://example.com/a/b?c=d#f")?;
    /// assert_eq!(uri.render_relative(&base)?, "#f");
    ///
    /// let uri = Uri::parse("http://example.com/x")?;
    /// assert_eq!(uri.render_relative(&base)?, "/x");
    ///
    /// assert_eq!(base.render_relative(&base)?, "");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn render_relative(&self, base: &Uri) -> Result<String, Error> {
        Renderer::new().render_relative(self, base)
    }
}

impl FromStr for Uri {
    type Err = Error;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uri::parse(s)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::Uri;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Uri {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            // The empty reference renders as "/", which only parses with a base.
            if *self == Uri::default() {
                return serializer.serialize_str("");
            }
            serializer.serialize_str(&self.to_string())
        }
    }

    impl<'de> Deserialize<'de> for Uri {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let s = String::deserialize(deserializer)?;
            Uri::parse(&s).map_err(de::Error::custom)
        }
    }
}
