use crate::{
    error::{Error, ErrorKind},
    render::{Parts, Renderer},
    Uri,
};
use core::fmt;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self.kind {
            ErrorKind::MissingScheme => "no scheme given and none implied by the port",
            ErrorKind::MissingPort => "no port given and the scheme has no well-known port",
            ErrorKind::MissingHost => "no host given and the scheme has no default host",
            ErrorKind::UnknownSchemeNoPort => {
                "scheme changed to one with no well-known port and no port given"
            }
            ErrorKind::PathEscapesRoot => "path rises above the root",
            ErrorKind::InvalidQuerySyntax => "malformed query key",
            ErrorKind::PortWithoutHost => "port rendered without a host",
            ErrorKind::InvalidPort => "port out of range",
            ErrorKind::InvalidScheme => "invalid scheme name",
        };
        f.write_str(msg)
    }
}

impl fmt::Debug for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Uri")
            .field("scheme", &self.scheme)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("fragment", &self.fragment)
            .field("explicit", &self.explicit)
            .finish()
    }
}

/// Renders every component with the process-wide registry.
///
/// A port that cannot be rendered for lack of a host is left out;
/// use [`Uri::render`] to get an error instead.
impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let renderer = Renderer::new();
        let s = match renderer.render(self, Parts::ALL) {
            Ok(s) => s,
            Err(e) if e.kind() == ErrorKind::PortWithoutHost => {
                let parts = Parts::SCHEME | Parts::HOST | Parts::PATH | Parts::QUERY | Parts::FRAGMENT;
                renderer.render(self, parts).map_err(|_| fmt::Error)?
            }
            Err(_) => return Err(fmt::Error),
        };
        f.write_str(&s)
    }
}
