//! Tables of the characters a component may carry unencoded.
//!
//! The character classes are those of [Section 2 of RFC 3986][rfc], named
//! after their ABNF rules.
//!
//! [rfc]: https://datatracker.ietf.org/doc/html/rfc3986#section-2

/// A set of ASCII characters allowed unencoded, and whether
/// percent-encoded octets are allowed alongside them.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Table {
    ascii: u128,
    pct_encoded: bool,
}

impl Table {
    /// Creates a table allowing exactly the given bytes.
    ///
    /// # Panics
    ///
    /// Panics if a byte is `b'%'` or not ASCII.
    #[must_use]
    pub const fn new(bytes: &[u8]) -> Self {
        let mut ascii = 0;
        let mut i = 0;
        while i < bytes.len() {
            let x = bytes[i];
            assert!(x < 128 && x != b'%', "only ASCII bytes other than % may be allowed");
            ascii |= 1 << x;
            i += 1;
        }
        Self {
            ascii,
            pct_encoded: false,
        }
    }

    /// Returns the union of two tables.
    #[must_use]
    pub const fn or(self, other: Self) -> Self {
        Self {
            ascii: self.ascii | other.ascii,
            pct_encoded: self.pct_encoded || other.pct_encoded,
        }
    }

    /// Returns this table with percent-encoded octets allowed.
    #[must_use]
    pub const fn or_pct_encoded(self) -> Self {
        Self {
            ascii: self.ascii,
            pct_encoded: true,
        }
    }

    /// Checks whether everything this table allows is allowed by `other`.
    #[must_use]
    pub const fn is_subset(self, other: Self) -> bool {
        self.ascii & !other.ascii == 0 && (!self.pct_encoded || other.pct_encoded)
    }

    /// Checks whether the character is allowed unencoded.
    ///
    /// Non-ASCII characters and `'%'` never are.
    #[inline]
    #[must_use]
    pub const fn allows(self, ch: char) -> bool {
        let x = ch as u32;
        x < 128 && self.ascii & (1 << x) != 0
    }

    /// Checks whether percent-encoded octets are allowed.
    #[inline]
    #[must_use]
    pub const fn allows_pct_encoded(self) -> bool {
        self.pct_encoded
    }

    /// Checks whether every byte of `s` is allowed, either unencoded or
    /// as part of a percent-encoded octet.
    pub(crate) const fn validate(self, s: &[u8]) -> bool {
        let mut i = 0;
        while i < s.len() {
            if s[i] == b'%' {
                if !self.pct_encoded
                    || i + 2 >= s.len()
                    || !s[i + 1].is_ascii_hexdigit()
                    || !s[i + 2].is_ascii_hexdigit()
                {
                    return false;
                }
                i += 3;
            } else {
                if !self.allows(s[i] as char) {
                    return false;
                }
                i += 1;
            }
        }
        true
    }
}

/// `ALPHA = %x41-5A / %x61-7A`
pub const ALPHA: Table = Table::new(b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz");

/// `DIGIT = %x30-39`
pub const DIGIT: Table = Table::new(b"0123456789");

/// `scheme = ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`, without the first-letter rule.
pub const SCHEME: Table = ALPHA.or(DIGIT).or(Table::new(b"+-."));

/// `unreserved = ALPHA / DIGIT / "-" / "." / "_" / "~"`
pub const UNRESERVED: Table = ALPHA.or(DIGIT).or(Table::new(b"-._~"));

/// `gen-delims = ":" / "/" / "?" / "#" / "[" / "]" / "@"`
pub const GEN_DELIMS: Table = Table::new(b":/?#[]@");

/// `sub-delims = "!" / "$" / "&" / "'" / "(" / ")" / "*" / "+" / "," / ";" / "="`
pub const SUB_DELIMS: Table = Table::new(b"!$&'()*+,;=");

/// `reserved = gen-delims / sub-delims`
pub const RESERVED: Table = GEN_DELIMS.or(SUB_DELIMS);

/// `reg-name = *( unreserved / pct-encoded / sub-delims )`
pub const REG_NAME: Table = UNRESERVED.or(SUB_DELIMS).or_pct_encoded();

/// `pchar = unreserved / pct-encoded / sub-delims / ":" / "@"`
pub const PCHAR: Table = UNRESERVED.or(SUB_DELIMS).or(Table::new(b":@")).or_pct_encoded();

/// `path = *( pchar / "/" )`
pub const PATH: Table = PCHAR.or(Table::new(b"/"));

/// `query = *( pchar / "/" / "?" )`, plus the brackets of nested keys.
pub const QUERY: Table = PCHAR.or(Table::new(b"/?[]"));

/// `fragment = *( pchar / "/" / "?" )`
pub const FRAGMENT: Table = PCHAR.or(Table::new(b"/?"));

/// `unreserved / pct-encoded`, for data inside a query key or value.
pub const DATA: Table = UNRESERVED.or_pct_encoded();
