//! Error types.

/// Detailed cause of an [`Error`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// No scheme was given and none could be inferred from the port.
    MissingScheme,
    /// No port was given and the scheme has no well-known port.
    MissingPort,
    /// No host was given and the scheme has no default host.
    MissingHost,
    /// A reference changed the scheme of its base, but provided no port
    /// and the new scheme has no well-known port.
    UnknownSchemeNoPort,
    /// A `..` segment would rise above the root of the path.
    PathEscapesRoot,
    /// A query key does not match `name([sub])*`.
    InvalidQuerySyntax,
    /// A port was to be rendered without a host.
    PortWithoutHost,
    /// A literal port does not fit in 16 bits.
    InvalidPort,
    /// A scheme is not a valid scheme name.
    InvalidScheme,
}

/// An error occurred when constructing or rendering a [`Uri`].
///
/// [`Uri`]: crate::Uri
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Error {
    pub(crate) kind: ErrorKind,
}

impl Error {
    pub(crate) const fn new(kind: ErrorKind) -> Self {
        Self { kind }
    }

    /// Returns the detailed cause of the error.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }
}

impl From<ErrorKind> for Error {
    #[inline]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

impl PartialEq<ErrorKind> for Error {
    #[inline]
    fn eq(&self, other: &ErrorKind) -> bool {
        self.kind == *other
    }
}

#[cfg(feature = "impl-error")]
impl std::error::Error for Error {}
