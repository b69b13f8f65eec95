//! Serialization of URIs.

use crate::{
    component::Port,
    error::{Error, ErrorKind},
    pct_enc::{
        encoder::{Fragment, Path, RegName},
        EString,
    },
    registry::{Registry, RegistryRef},
    Uri,
};
use core::ops::{BitOr, BitOrAssign};

/// A selection of URI components to render.
///
/// Components are always rendered in the order scheme, host, port, path,
/// query, fragment, whatever the order of selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Parts(u8);

impl Parts {
    /// No component.
    pub const NONE: Parts = Parts(0);
    /// The scheme component.
    pub const SCHEME: Parts = Parts(1);
    /// The host component.
    pub const HOST: Parts = Parts(1 << 1);
    /// The port component.
    pub const PORT: Parts = Parts(1 << 2);
    /// The path component.
    pub const PATH: Parts = Parts(1 << 3);
    /// The query component.
    pub const QUERY: Parts = Parts(1 << 4);
    /// The fragment component.
    pub const FRAGMENT: Parts = Parts(1 << 5);
    /// Every component.
    pub const ALL: Parts = Parts((1 << 6) - 1);

    /// Selects the given component and every component after it.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Parts;
    ///
    /// assert_eq!(Parts::from_part(Parts::QUERY), Parts::QUERY | Parts::FRAGMENT);
    /// assert_eq!(Parts::from_part(Parts::SCHEME), Parts::ALL);
    /// ```
    #[must_use]
    pub const fn from_part(part: Parts) -> Parts {
        // Every bit at or above the lowest bit of `part`.
        let lowest = part.0 & part.0.wrapping_neg();
        Parts(Parts::ALL.0 & !lowest.wrapping_sub(1))
    }

    /// Checks whether every component in `other` is selected.
    #[must_use]
    pub const fn contains(self, other: Parts) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Parts {
    type Output = Parts;

    fn bitor(self, rhs: Parts) -> Parts {
        Parts(self.0 | rhs.0)
    }
}

impl BitOrAssign for Parts {
    fn bitor_assign(&mut self, rhs: Parts) {
        self.0 |= rhs.0;
    }
}

/// A configurable URI renderer.
///
/// Scheme, host and port are omitted where they would be implied when the
/// output is parsed again, unless they were given explicitly.
///
/// An omitted default host still leaves its empty authority `//` behind,
/// so the default `file` URI renders as `file:///` rather than `file:/`.
/// Both forms parse to the same value.
///
/// ```
/// use uri_kit::Uri;
///
/// let uri = Uri::parse("file:/etc/hosts")?;
/// assert_eq!(uri.to_string(), "file:///etc/hosts");
/// assert_eq!(Uri::parse("file:///etc/hosts")?, uri);
/// # Ok::<_, uri_kit::Error>(())
/// ```
#[derive(Clone, Copy, Debug, Default)]
#[must_use]
pub struct Renderer<'a> {
    registry: RegistryRef<'a>,
}

impl<'a> Renderer<'a> {
    /// Creates a new `Renderer` using the process-wide registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses the given registry instead of the process-wide one.
    pub fn with_registry(mut self, registry: &'a Registry) -> Self {
        self.registry = RegistryRef::Borrowed(registry);
        self
    }

    /// Renders the selected components of a URI.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::PortWithoutHost`] if the port is to
    /// be rendered but the URI has no host or the host is not selected.
    pub fn render(&self, uri: &Uri, parts: Parts) -> Result<String, Error> {
        self.registry.with(|registry| render(registry, uri, parts))
    }

    /// Renders the shortest reference that resolves against `base` to `uri`.
    ///
    /// Components are compared in the order scheme, host, path, query,
    /// fragment. Rendering starts at the first one that differs; a
    /// difference in scheme or port renders the whole URI. The output is
    /// empty if nothing differs.
    ///
    /// # Errors
    ///
    /// Returns `Err` on the same conditions as [`render`](Self::render).
    pub fn render_relative(&self, uri: &Uri, base: &Uri) -> Result<String, Error> {
        let Some(first) = first_difference(uri, base) else {
            return Ok(String::new());
        };
        self.render(uri, Parts::from_part(first))
    }
}

/// Finds the first component to render for a reference from `base` to `uri`.
fn first_difference(uri: &Uri, base: &Uri) -> Option<Parts> {
    if uri.scheme != base.scheme || uri.port != base.port {
        Some(Parts::SCHEME)
    } else if uri.host != base.host {
        Some(Parts::HOST)
    } else if uri.path != base.path {
        Some(Parts::PATH)
    } else if uri.query != base.query {
        // An empty query or fragment in a reference means "inherit",
        // so clearing either takes a path to reset both.
        if uri.query.is_empty() || (uri.fragment.is_empty() && !base.fragment.is_empty()) {
            Some(Parts::PATH)
        } else {
            Some(Parts::QUERY)
        }
    } else if uri.fragment != base.fragment {
        if uri.fragment.is_empty() {
            Some(Parts::PATH)
        } else {
            Some(Parts::FRAGMENT)
        }
    } else {
        None
    }
}

fn render(registry: &Registry, uri: &Uri, parts: Parts) -> Result<String, Error> {
    let scheme = uri.scheme.as_deref();

    let show_port = parts.contains(Parts::PORT)
        && match (uri.port, scheme) {
            (Some(Port::Number(_)), None) => true,
            (Some(port @ Port::Number(_)), Some(scheme)) => {
                uri.explicit.port || !registry.is_well_known(scheme, port)
            }
            (Some(Port::Unused) | None, _) => false,
        };

    // A scheme implied by an explicit port is left for the port to imply.
    let show_scheme = parts.contains(Parts::SCHEME)
        && match scheme {
            Some(scheme) => {
                uri.explicit.scheme
                    || !show_port
                    || uri
                        .port
                        .and_then(Port::as_u16)
                        .and_then(|n| registry.scheme_for_port(n))
                        != Some(scheme)
            }
            None => false,
        };

    if show_port && (uri.host.is_none() || !parts.contains(Parts::HOST)) {
        return Err(Error::new(ErrorKind::PortWithoutHost));
    }

    // A default host is left out only when the scheme is there to imply it.
    let show_host = parts.contains(Parts::HOST)
        && match (&uri.host, scheme) {
            (Some(host), Some(scheme)) => {
                uri.explicit.host
                    || show_port
                    || !show_scheme
                    || !registry.is_default_host(scheme, host)
            }
            (Some(_), None) => true,
            (None, _) => false,
        };

    let mut buf = String::new();

    if show_scheme {
        if let Some(scheme) = scheme {
            buf.push_str(scheme);
            buf.push(':');
        }
    }

    if show_host {
        if let Some(host) = &uri.host {
            let mut enc = EString::<RegName>::new();
            enc.encode_str::<RegName>(host);
            buf.push_str("//");
            buf.push_str(enc.as_str());
        }
    } else if show_scheme && parts.contains(Parts::HOST) && uri.host.is_some() {
        // Keep the empty authority so that the output reads `file:///`.
        buf.push_str("//");
    }

    if show_port {
        if let Some(Port::Number(n)) = uri.port {
            buf.push(':');
            buf.push_str(&n.to_string());
        }
    }

    if parts.contains(Parts::PATH) {
        let mut enc = EString::<Path>::new();
        enc.encode_str::<Path>(&uri.path);
        buf.push_str(enc.as_str());
    }

    if parts.contains(Parts::QUERY) {
        let query = uri.query.encode();
        if !query.is_empty() {
            buf.push('?');
            buf.push_str(query.as_str());
        }
    }

    if parts.contains(Parts::FRAGMENT) && !uri.fragment.is_empty() {
        let mut enc = EString::<Fragment>::new();
        enc.encode_str::<Fragment>(&uri.fragment);
        buf.push('#');
        buf.push_str(enc.as_str());
    }

    Ok(buf)
}
