use uri_kit::{component::Port, ErrorKind, Uri};

#[track_caller]
fn fail(s: &str, expected: ErrorKind) {
    assert_eq!(Uri::parse(s).unwrap_err().kind(), expected, "{s:?}");
}

#[test]
fn parse_absolute() {
    let u = Uri::parse("https://example.com:8080/my/page?pg=3#frag").unwrap();
    assert_eq!(u.scheme(), Some("https"));
    assert_eq!(u.host(), Some("example.com"));
    assert_eq!(u.port(), Some(Port::Number(8080)));
    assert_eq!(u.path(), "/my/page");
    assert_eq!(u.query()["pg"], "3");
    assert_eq!(u.fragment(), "frag");
    let e = u.explicit();
    assert!(e.scheme && e.host && e.port);

    let u = Uri::parse("http://example.com").unwrap();
    assert_eq!(u.port(), Some(Port::Number(80)));
    assert_eq!(u.path(), "/");
    assert!(u.query().is_empty());
    assert_eq!(u.fragment(), "");
    let e = u.explicit();
    assert!(e.scheme && e.host && !e.port);

    let u = Uri::parse("HTTP://Example.com/A").unwrap();
    assert_eq!(u.scheme(), Some("http"));
    assert_eq!(u.host(), Some("Example.com"));
    assert_eq!(u.path(), "/A");
}

#[test]
fn parse_infers_scheme_from_port() {
    let u = Uri::parse("//example.com:21/pub").unwrap();
    assert_eq!(u.scheme(), Some("ftp"));
    assert_eq!(u.port(), Some(Port::Number(21)));
    let e = u.explicit();
    assert!(!e.scheme && e.host && e.port);

    let u = Uri::parse("//example.com:443").unwrap();
    assert_eq!(u.scheme(), Some("https"));
    assert_eq!(u.path(), "/");
}

#[test]
fn parse_default_host() {
    let u = Uri::parse("file:///").unwrap();
    assert_eq!(u.scheme(), Some("file"));
    assert_eq!(u.host(), Some("localhost"));
    assert_eq!(u.port(), Some(Port::Unused));
    assert_eq!(u.path(), "/");
    let e = u.explicit();
    assert!(e.scheme && !e.host && !e.port);

    let u = Uri::parse("file://server/share/a.txt").unwrap();
    assert_eq!(u.host(), Some("server"));
    assert!(u.explicit().host);
}

#[test]
fn parse_empty() {
    let u = Uri::parse("").unwrap();
    assert_eq!(u, Uri::default());
    assert_eq!(u.scheme(), None);
    assert_eq!(u.host(), None);
    assert_eq!(u.port(), None);
    assert_eq!(u.path(), "/");
    assert_eq!(u.to_string(), "/");
}

#[test]
fn parse_dot_segments() {
    let u = Uri::parse("http://a/b/./c/../d/").unwrap();
    assert_eq!(u.path(), "/b/d/");

    let u = Uri::parse("http://a//b///c").unwrap();
    assert_eq!(u.path(), "/b/c");

    let u = Uri::parse("http://a/b/..").unwrap();
    assert_eq!(u.path(), "/");
}

#[test]
fn parse_decodes_components() {
    let u = Uri::parse(
        "https://example.com/this/path%20is/a%20%2Bcomplex%2B%20%26%20very%20special/path\
         ?%2Bq=a%20very%20%2Bspecial%2B%20query#%2Bspecial%2B%20fragment",
    )
    .unwrap();
    assert_eq!(u.path(), "/this/path is/a +complex+ & very special/path");
    assert_eq!(u.query()["+q"], "a very +special+ query");
    assert_eq!(u.fragment(), "+special+ fragment");

    // '+' means a space only in the query.
    let u = Uri::parse("http://a/b+c?d+e=f+g#h+i").unwrap();
    assert_eq!(u.path(), "/b+c");
    assert_eq!(u.query()["d e"], "f g");
    assert_eq!(u.fragment(), "h+i");

    let u = Uri::parse("http://ex%61mple.com/").unwrap();
    assert_eq!(u.host(), Some("example.com"));
}

#[test]
fn parse_lenient_decoding() {
    let u = Uri::parse("http://a/100%/%zz/%4").unwrap();
    assert_eq!(u.path(), "/100%/%zz/%4");
}

#[test]
fn parse_error() {
    fail("example.com/a", ErrorKind::MissingScheme);
    fail("//example.com:12345/", ErrorKind::MissingScheme);
    fail("/a/b", ErrorKind::MissingScheme);
    fail("?a=b", ErrorKind::MissingScheme);

    fail("x-unregistered://example.com/", ErrorKind::MissingPort);

    fail("http:/a", ErrorKind::MissingHost);
    fail("https://:8080/my/page", ErrorKind::MissingHost);

    fail("http://a:65536/", ErrorKind::InvalidPort);
    fail("http://a:99999999999999999999/", ErrorKind::InvalidPort);

    fail("http://a/..", ErrorKind::PathEscapesRoot);
    fail("http://a/b/../../c", ErrorKind::PathEscapesRoot);

    fail("http://a/?b[=1", ErrorKind::InvalidQuerySyntax);
    fail("http://a/?[b]=1", ErrorKind::InvalidQuerySyntax);
    fail("http://a/?b[]=1", ErrorKind::InvalidQuerySyntax);
}

#[test]
fn parse_explicit_port_zero() {
    let u = Uri::parse("http://a:0/").unwrap();
    assert_eq!(u.port(), Some(Port::Number(0)));
    assert_eq!(u.to_string(), "http://a:0/");
}

#[test]
fn from_str() {
    let u: Uri = "http://example.com/a".parse().unwrap();
    assert_eq!(u, Uri::parse("http://example.com/a").unwrap());

    let e = "/a".parse::<Uri>().unwrap_err();
    assert_eq!(e, ErrorKind::MissingScheme);
}

#[test]
fn setters() {
    let mut u = Uri::parse("http://example.com/a/b?x=1#f").unwrap();

    u.set_scheme("HTTPS").unwrap();
    assert_eq!(u.scheme(), Some("https"));
    assert_eq!(u.set_scheme("1http").unwrap_err(), ErrorKind::InvalidScheme);
    assert_eq!(u.scheme(), Some("https"));

    u.set_host("other.org");
    assert_eq!(u.host(), Some("other.org"));

    u.set_port(8443);
    assert_eq!(u.port(), Some(Port::Number(8443)));
    assert!(u.explicit().port);

    u.set_path("c/./d").unwrap();
    assert_eq!(u.path(), "/a/b/c/d");
    u.set_path("/e/").unwrap();
    assert_eq!(u.path(), "/e/");
    assert_eq!(u.set_path("../..").unwrap_err(), ErrorKind::PathEscapesRoot);
    assert_eq!(u.path(), "/e/");

    u.set_query_str("?y=2&z[w]=3").unwrap();
    assert_eq!(u.query_string(), "y=2&z%5Bw%5D=3");
    assert_eq!(
        u.set_query_str("a]=1").unwrap_err(),
        ErrorKind::InvalidQuerySyntax
    );
    assert_eq!(u.query_string(), "y=2&z%5Bw%5D=3");

    u.set_fragment("##newFragment#");
    assert_eq!(u.fragment(), "newFragment");

    assert_eq!(u.to_string(), "https://other.org:8443/e/?y=2&z%5Bw%5D=3#newFragment");
}
