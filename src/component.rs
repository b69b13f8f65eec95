//! URI components that are more than plain strings.

use crate::pct_enc::table;
use core::fmt;

/// A port component.
///
/// # Examples
///
/// ```
/// use uri_kit::{component::Port, Uri};
///
/// let uri = Uri::parse("http://example.com:8080/")?;
/// assert_eq!(uri.port(), Some(Port::Number(8080)));
///
/// // The `file` scheme is registered as having no port at all,
/// // which is distinct from having no port component.
/// let uri = Uri::parse("file:///etc/hosts")?;
/// assert_eq!(uri.port(), Some(Port::Unused));
/// # Ok::<_, uri_kit::Error>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Port {
    /// A port number.
    Number(u16),
    /// Explicitly no port.
    ///
    /// This is never rendered and never coerced to the number zero.
    Unused,
}

impl Port {
    /// Returns the port number, or `None` for [`Port::Unused`].
    #[inline]
    #[must_use]
    pub fn as_u16(self) -> Option<u16> {
        match self {
            Port::Number(n) => Some(n),
            Port::Unused => None,
        }
    }
}

impl From<u16> for Port {
    #[inline]
    fn from(n: u16) -> Self {
        Port::Number(n)
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Port::Number(n) => fmt::Display::fmt(n, f),
            Port::Unused => Ok(()),
        }
    }
}

/// Records which of scheme, host and port were given explicitly
/// rather than defaulted from the [registry].
///
/// A component that is not explicit is omitted on rendering when it
/// equals its default.
///
/// [registry]: crate::registry
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Explicit {
    /// Whether the scheme was given explicitly.
    pub scheme: bool,
    /// Whether the host was given explicitly.
    pub host: bool,
    /// Whether the port was given explicitly.
    pub port: bool,
}

/// Checks whether the string is a valid scheme name according to
/// [Section 3.1 of RFC 3986][scheme].
///
/// [scheme]: https://datatracker.ietf.org/doc/html/rfc3986#section-3.1
pub(crate) fn is_valid_scheme(s: &str) -> bool {
    matches!(s.as_bytes(), [first, rem @ ..]
        if first.is_ascii_alphabetic() && rem.iter().all(|&x| table::SCHEME.allows(x as char)))
}
