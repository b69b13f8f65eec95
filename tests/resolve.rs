use uri_kit::{
    component::Port,
    parser::{Grammar, Parser},
    registry::Registry,
    ErrorKind, Resolver, Uri,
};

trait Test {
    fn pass(&self, r: &str, res: &str);
    fn fail(&self, r: &str, err: ErrorKind);
}

impl Test for Uri {
    #[track_caller]
    fn pass(&self, r: &str, expected: &str) {
        let uri = Uri::parse_relative(r, self).unwrap();
        assert_eq!(uri.to_string(), expected, "{r:?}");
        // The result is a fixed point: rendering and parsing it again gives the same URI.
        assert_eq!(Uri::parse(&uri.to_string()).unwrap(), uri, "{r:?}");
    }

    #[track_caller]
    fn fail(&self, r: &str, expected: ErrorKind) {
        assert_eq!(Uri::parse_relative(r, self).unwrap_err(), expected, "{r:?}");
    }
}

#[test]
fn resolve() {
    let base = Uri::parse("https://example.com:8080/my/page?pg=3#frag").unwrap();

    base.pass("", "https://example.com:8080/my/page?pg=3#frag");
    base.pass("?x=1", "https://example.com:8080/my/page?x=1#frag");
    base.pass("#top", "https://example.com:8080/my/page?pg=3#top");
    base.pass("?x=1#top", "https://example.com:8080/my/page?x=1#top");
    base.pass("other", "https://example.com:8080/my/page/other");
    base.pass("other?a=b", "https://example.com:8080/my/page/other?a=b");
    base.pass("./", "https://example.com:8080/my/page/");
    base.pass("..", "https://example.com:8080/my/");
    base.pass("../", "https://example.com:8080/my/");
    base.pass("../../", "https://example.com:8080/");
    base.pass("/abs/./path/../x", "https://example.com:8080/abs/x");
    base.pass("//other.org", "https://other.org:8080/");
    base.pass("//other.org/x?y=z", "https://other.org:8080/x?y=z");
    base.pass("//other.org:9000/x", "https://other.org:9000/x");
    base.pass("ftp:", "ftp://example.com/my/page?pg=3#frag");
    base.pass("http:", "http://example.com/my/page?pg=3#frag");
    base.pass("http://a.b/c", "http://a.b/c");
    base.pass("x-unregistered://h:99/", "x-unregistered://h:99/");

    base.fail("../../../", ErrorKind::PathEscapesRoot);
    base.fail("/..", ErrorKind::PathEscapesRoot);
    base.fail("x-unregistered:", ErrorKind::UnknownSchemeNoPort);
    base.fail("x-unregistered://h/", ErrorKind::UnknownSchemeNoPort);
    base.fail("//h:70000/", ErrorKind::InvalidPort);
    base.fail("?a[=1", ErrorKind::InvalidQuerySyntax);
}

#[test]
fn resolve_seeds_with_whole_base_path() {
    let base = Uri::parse("http://h/a/b/c").unwrap();

    base.pass("d", "http://h/a/b/c/d");
    base.pass("../d", "http://h/a/b/d");
    base.pass("../../d", "http://h/a/d");
    base.pass(".", "http://h/a/b/c/");
    base.pass("./d/.", "http://h/a/b/c/d/");
    base.pass("d//e", "http://h/a/b/c/d/e");
    base.pass("/x/../y", "http://h/y");

    base.fail("../../../..", ErrorKind::PathEscapesRoot);
}

#[test]
fn resolve_explicit_flags() {
    let base = Uri::parse("http://example.com/a").unwrap();

    // Flags are recomputed against the registry rather than inherited.
    let u = Uri::parse_relative("//example.com:80/b", &base).unwrap();
    assert!(u.explicit().scheme);
    assert!(u.explicit().host);
    assert!(!u.explicit().port);
    assert_eq!(u.to_string(), "http://example.com/b");

    let base = Uri::parse("file:///etc").unwrap();
    let u = Uri::parse_relative("hosts", &base).unwrap();
    assert_eq!(u.host(), Some("localhost"));
    assert!(!u.explicit().host);
    assert_eq!(u.port(), Some(Port::Unused));
    assert_eq!(u.to_string(), "file:///etc/hosts");
}

#[test]
fn resolve_against_empty_reference() {
    let base = Uri::default();
    base.fail("/a", ErrorKind::MissingScheme);
    base.fail("?a=b", ErrorKind::MissingScheme);

    let u = Uri::parse_relative("http://h/a", &base).unwrap();
    assert_eq!(u.to_string(), "http://h/a");
}

#[test]
fn resolve_with_registry() {
    let mut registry = Registry::empty();
    registry.set_well_known_port("web", Port::Number(80));

    let resolver = Resolver::new().with_registry(&registry);
    let u = resolver.resolve("web://h/").unwrap();
    assert_eq!(u.port(), Some(Port::Number(80)));

    let u = resolver.resolve("//h:80/").unwrap();
    assert_eq!(u.scheme(), Some("web"));

    assert_eq!(
        resolver.resolve("http://h/").unwrap_err(),
        ErrorKind::MissingPort
    );
    assert_eq!(
        resolver.resolve("file:///").unwrap_err(),
        ErrorKind::MissingPort
    );

    let base = resolver.resolve("web://h/a").unwrap();
    let resolver = resolver.with_base(&base);
    assert_eq!(resolver.resolve("b").unwrap().path(), "/a/b");
    assert_eq!(
        resolver.resolve("http:").unwrap_err(),
        ErrorKind::UnknownSchemeNoPort
    );
}

#[test]
fn resolve_with_grammar() {
    // A scheme whose paths may contain '?' and '#' literally.
    let grammar = Grammar::new(
        r"^(?:(?P<scheme>x-raw):)?(?://(?P<host>[^/]*))?(?P<path>.*)$",
    )
    .unwrap();
    let parser = Parser::new().with_grammar("x-raw", grammar);

    let mut registry = Registry::new();
    registry.set_well_known_port("x-raw", Port::Number(1));

    let resolver = Resolver::new().with_registry(&registry).with_parser(&parser);
    let base = resolver.resolve("x-raw://h/a?b#c").unwrap();
    assert_eq!(base.path(), "/a?b#c");
    assert!(base.query().is_empty());
    assert_eq!(base.fragment(), "");

    // References without a scheme use the grammar of the base.
    let u = resolver.with_base(&base).resolve("d?e").unwrap();
    assert_eq!(u.path(), "/a?b#c/d?e");
    assert!(u.query().is_empty());
}
