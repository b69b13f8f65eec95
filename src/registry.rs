//! Well-known ports and default hosts of schemes.
//!
//! A [`Registry`] maps schemes to their well-known [`Port`] and to the host
//! implied when a URI omits it. It is consulted when resolving a URI with
//! missing components and when deciding which components to render.
//!
//! There is one process-wide registry, used by [`Uri::parse`] and the
//! `Display` implementation of [`Uri`]. It starts out with the built-in
//! contents of [`Registry::new`] and is only ever extended, through
//! [`set_well_known_port`] and [`set_default_host`]. Independent registries
//! may be created and passed to a [`Resolver`] or [`Renderer`] instead.
//!
//! [`Uri`]: crate::Uri
//! [`Uri::parse`]: crate::Uri::parse
//! [`Resolver`]: crate::Resolver
//! [`Renderer`]: crate::Renderer

use crate::{component::Port, log};
use indexmap::IndexMap;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

const BUILTIN_PORTS: &[(&str, Port)] = &[
    ("ftp", Port::Number(21)),
    ("ssh", Port::Number(22)),
    ("telnet", Port::Number(23)),
    ("time", Port::Number(37)),
    ("dns", Port::Number(53)),
    ("http", Port::Number(80)),
    ("pop3", Port::Number(110)),
    ("ldap", Port::Number(389)),
    ("https", Port::Number(443)),
    ("dhcp", Port::Number(547)),
    ("file", Port::Unused),
];

const BUILTIN_HOSTS: &[(&str, &str)] = &[("file", "localhost")];

/// A table of well-known ports and default hosts, keyed by lowercase scheme.
///
/// # Examples
///
/// ```
/// use uri_kit::{component::Port, registry::Registry};
///
/// let mut registry = Registry::new();
/// assert_eq!(registry.port_for_scheme("https"), Some(Port::Number(443)));
/// assert_eq!(registry.scheme_for_port(21), Some("ftp"));
///
/// registry.set_well_known_port("gopher", Port::Number(70));
/// assert_eq!(registry.port_for_scheme("GOPHER"), Some(Port::Number(70)));
/// ```
#[derive(Clone, Debug)]
pub struct Registry {
    ports: IndexMap<String, Port>,
    hosts: IndexMap<String, String>,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Creates a registry with the built-in contents.
    ///
    /// | Scheme | Port | Host |
    /// |---|---|---|
    /// | `ftp` | 21 | |
    /// | `ssh` | 22 | |
    /// | `telnet` | 23 | |
    /// | `time` | 37 | |
    /// | `dns` | 53 | |
    /// | `http` | 80 | |
    /// | `pop3` | 110 | |
    /// | `ldap` | 389 | |
    /// | `https` | 443 | |
    /// | `dhcp` | 547 | |
    /// | `file` | [`Port::Unused`] | `localhost` |
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for &(scheme, port) in BUILTIN_PORTS {
            registry.ports.insert(scheme.to_string(), port);
        }
        for &(scheme, host) in BUILTIN_HOSTS {
            registry.hosts.insert(scheme.to_string(), host.to_string());
        }
        registry
    }

    /// Creates an empty registry.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            ports: IndexMap::new(),
            hosts: IndexMap::new(),
        }
    }

    /// Returns the well-known port of the scheme.
    #[must_use]
    pub fn port_for_scheme(&self, scheme: &str) -> Option<Port> {
        self.ports.get(&*scheme.to_ascii_lowercase()).copied()
    }

    /// Returns the scheme whose well-known port is the given number.
    ///
    /// When several schemes share a port, the one registered first wins.
    #[must_use]
    pub fn scheme_for_port(&self, port: u16) -> Option<&str> {
        self.ports
            .iter()
            .find(|&(_, &p)| p == Port::Number(port))
            .map(|(scheme, _)| scheme.as_str())
    }

    /// Sets the well-known port of the scheme, replacing any previous one.
    pub fn set_well_known_port(&mut self, scheme: &str, port: Port) {
        log::debug!("well-known port of {scheme:?} set to {port:?}");
        self.ports.insert(scheme.to_ascii_lowercase(), port);
    }

    /// Returns the host implied by the scheme when a URI omits it.
    #[must_use]
    pub fn default_host(&self, scheme: &str) -> Option<&str> {
        self.hosts
            .get(&*scheme.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Sets the host implied by the scheme, replacing any previous one.
    pub fn set_default_host(&mut self, scheme: &str, host: &str) {
        log::debug!("default host of {scheme:?} set to {host:?}");
        self.hosts
            .insert(scheme.to_ascii_lowercase(), host.to_string());
    }

    /// Checks whether `port` is the well-known port of `scheme`.
    pub(crate) fn is_well_known(&self, scheme: &str, port: Port) -> bool {
        self.port_for_scheme(scheme) == Some(port)
    }

    /// Checks whether `host` is the default host of `scheme`.
    pub(crate) fn is_default_host(&self, scheme: &str, host: &str) -> bool {
        self.default_host(scheme) == Some(host)
    }
}

/// Either the process-wide registry or a borrowed one.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) enum RegistryRef<'a> {
    #[default]
    Global,
    Borrowed(&'a Registry),
}

impl RegistryRef<'_> {
    /// Calls `f` with the registry, holding the read lock of the
    /// process-wide one for the duration of the call.
    pub(crate) fn with<R>(self, f: impl FnOnce(&Registry) -> R) -> R {
        match self {
            RegistryRef::Global => f(&global()),
            RegistryRef::Borrowed(registry) => f(registry),
        }
    }
}

static GLOBAL: OnceLock<RwLock<Registry>> = OnceLock::new();

fn global_lock() -> &'static RwLock<Registry> {
    GLOBAL.get_or_init(|| RwLock::new(Registry::new()))
}

/// Locks the process-wide registry for reading.
///
/// The setters block until every guard is dropped, so a guard must never
/// be held across a call that may update the registry.
fn global() -> RwLockReadGuard<'static, Registry> {
    // The tables are always left consistent, so a poisoned lock is still usable.
    global_lock()
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}

fn global_mut() -> RwLockWriteGuard<'static, Registry> {
    global_lock()
        .write()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Returns the well-known port of the scheme in the process-wide registry.
#[must_use]
pub fn port_for_scheme(scheme: &str) -> Option<Port> {
    global().port_for_scheme(scheme)
}

/// Returns the scheme whose well-known port is the given number
/// in the process-wide registry.
#[must_use]
pub fn scheme_for_port(port: u16) -> Option<String> {
    global().scheme_for_port(port).map(String::from)
}

/// Sets the well-known port of the scheme in the process-wide registry.
///
/// # Examples
///
/// ```
/// use uri_kit::{component::Port, registry, Uri};
///
/// registry::set_well_known_port("gopher", Port::Number(70));
///
/// let uri = Uri::parse("gopher://example.com/")?;
/// assert_eq!(uri.port(), Some(Port::Number(70)));
/// assert_eq!(uri.to_string(), "gopher://example.com/");
/// # Ok::<_, uri_kit::Error>(())
/// ```
pub fn set_well_known_port(scheme: &str, port: Port) {
    global_mut().set_well_known_port(scheme, port);
}

/// Returns the default host of the scheme in the process-wide registry.
#[must_use]
pub fn default_host(scheme: &str) -> Option<String> {
    global().default_host(scheme).map(String::from)
}

/// Sets the default host of the scheme in the process-wide registry.
pub fn set_default_host(scheme: &str, host: &str) {
    global_mut().set_default_host(scheme, host);
}
