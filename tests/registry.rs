use uri_kit::{
    component::Port,
    registry::{self, Registry},
    ErrorKind, Uri,
};

#[test]
fn builtin() {
    let expected = [
        ("ftp", 21),
        ("ssh", 22),
        ("telnet", 23),
        ("time", 37),
        ("dns", 53),
        ("http", 80),
        ("pop3", 110),
        ("ldap", 389),
        ("https", 443),
        ("dhcp", 547),
    ];
    for (scheme, port) in expected {
        assert_eq!(registry::port_for_scheme(scheme), Some(Port::Number(port)), "{scheme}");
        assert_eq!(registry::scheme_for_port(port).as_deref(), Some(scheme), "{port}");
    }

    assert_eq!(registry::port_for_scheme("file"), Some(Port::Unused));
    assert_eq!(registry::port_for_scheme("HTTPS"), Some(Port::Number(443)));
    assert_eq!(registry::port_for_scheme("x-none"), None);
    assert_eq!(registry::scheme_for_port(1), None);

    assert_eq!(registry::default_host("file").as_deref(), Some("localhost"));
    assert_eq!(registry::default_host("http"), None);
}

#[test]
fn instance() {
    let mut r = Registry::new();
    assert_eq!(r.port_for_scheme("ssh"), Some(Port::Number(22)));

    r.set_well_known_port("SSH", Port::Number(2222));
    assert_eq!(r.port_for_scheme("ssh"), Some(Port::Number(2222)));
    assert_eq!(r.scheme_for_port(2222), Some("ssh"));
    assert_eq!(r.scheme_for_port(22), None);

    // The first scheme registered for a port wins the reverse lookup.
    r.set_well_known_port("web", Port::Number(80));
    assert_eq!(r.scheme_for_port(80), Some("http"));

    r.set_default_host("web", "intranet");
    assert_eq!(r.default_host("WEB"), Some("intranet"));

    // Instances are independent of the process-wide registry.
    assert_eq!(registry::port_for_scheme("ssh"), Some(Port::Number(22)));
    assert_eq!(registry::default_host("web"), None);

    let r = Registry::empty();
    assert_eq!(r.port_for_scheme("http"), None);
    assert_eq!(r.default_host("file"), None);
}

#[test]
fn set_well_known_port() {
    assert_eq!(
        Uri::parse("x-reg-port://h/").unwrap_err(),
        ErrorKind::MissingPort
    );
    assert_eq!(registry::scheme_for_port(6543), None);

    registry::set_well_known_port("x-reg-port", Port::Number(6543));

    let u = Uri::parse("x-reg-port://h/").unwrap();
    assert_eq!(u.port(), Some(Port::Number(6543)));
    assert_eq!(u.to_string(), "x-reg-port://h/");

    let u = Uri::parse("//h:6543/").unwrap();
    assert_eq!(u.scheme(), Some("x-reg-port"));
    assert_eq!(u.to_string(), "//h:6543/");

    let base = Uri::parse("http://h/a").unwrap();
    let u = Uri::parse_relative("x-reg-port:", &base).unwrap();
    assert_eq!(u.port(), Some(Port::Number(6543)));
}

#[test]
fn set_default_host() {
    registry::set_well_known_port("x-reg-host", Port::Unused);
    assert_eq!(
        Uri::parse("x-reg-host:/a").unwrap_err(),
        ErrorKind::MissingHost
    );

    registry::set_default_host("x-reg-host", "box");
    assert_eq!(registry::default_host("x-reg-host").as_deref(), Some("box"));

    let u = Uri::parse("x-reg-host:/a").unwrap();
    assert_eq!(u.host(), Some("box"));
    assert_eq!(u.port(), Some(Port::Unused));
    assert_eq!(u.to_string(), "x-reg-host:///a");

    let u = Uri::parse("x-reg-host://other/a").unwrap();
    assert_eq!(u.to_string(), "x-reg-host://other/a");
}

#[test]
fn concurrent_access() {
    let handles: Vec<_> = (0..8u16)
        .map(|i| {
            std::thread::spawn(move || {
                let scheme = format!("x-reg-thread{i}");
                registry::set_well_known_port(&scheme, Port::Number(7000 + i));
                for _ in 0..100 {
                    let u = Uri::parse(&format!("{scheme}://h/")).unwrap();
                    assert_eq!(u.port(), Some(Port::Number(7000 + i)));
                    assert_eq!(Uri::parse("http://h/").unwrap().to_string(), "http://h/");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
}
