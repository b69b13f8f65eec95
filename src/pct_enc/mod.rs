//! Percent-encoding and decoding of URI components.
//!
//! A [`Uri`] stores its components decoded. They are encoded again on
//! rendering, each with the [`Table`] of characters its component may carry
//! unencoded; the [`encoder`] module names one [`Encoder`] per component.
//!
//! Decoding is lenient: a `'%'` that does not start a valid octet is kept
//! as is, and invalid UTF-8 is replaced with `U+FFFD`.
//!
//! [`Uri`]: crate::Uri

pub mod encoder;
mod estring;
pub mod table;

pub use estring::EString;
pub use table::Table;

use std::borrow::Cow;
use core::{fmt, iter::FusedIterator, marker::PhantomData};
use ref_cast::{ref_cast_custom, RefCastCustom};

/// A component kind, given by the table of characters it leaves unencoded.
///
/// An encoder `Sub` can encode data into an [`EString<E>`] only if
/// `Sub::TABLE` is a [subset](Table::is_subset) of `E::TABLE`. This is
/// checked at compile time.
pub trait Encoder: 'static {
    /// The characters left unencoded.
    const TABLE: Table;
}

/// A string slice that is properly percent-encoded for `E`.
///
/// # Examples
///
/// ```
/// use uri_kit::pct_enc::{encoder::Fragment, EStr};
///
/// let s = EStr::<Fragment>::new("caf%C3%A9?x").unwrap();
/// assert_eq!(s.decode().to_string_lossy(), "café?x");
///
/// assert!(EStr::<Fragment>::new("a#b").is_none());
/// assert!(EStr::<Fragment>::new("100%").is_none());
/// ```
#[derive(RefCastCustom)]
#[repr(transparent)]
pub struct EStr<E: Encoder> {
    encoder: PhantomData<E>,
    inner: str,
}

struct Assert<L: Encoder, R: Encoder> {
    _marker: PhantomData<(L, R)>,
}

impl<L: Encoder, R: Encoder> Assert<L, R> {
    const L_IS_SUB_ENCODER_OF_R: () = assert!(L::TABLE.is_subset(R::TABLE), "not a sub-encoder");
}

impl<E: Encoder> EStr<E> {
    #[ref_cast_custom]
    pub(crate) const fn new_validated(s: &str) -> &Self;

    /// Converts a string slice to an `EStr` slice, or returns `None`
    /// if it is not properly encoded for `E`.
    #[must_use]
    pub const fn new(s: &str) -> Option<&Self> {
        if E::TABLE.validate(s.as_bytes()) {
            Some(Self::new_validated(s))
        } else {
            None
        }
    }

    /// Yields the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Returns the length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Checks whether the slice is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator decoding the slice.
    pub fn decode(&self) -> Decode<'_> {
        Decode::new(&self.inner, false)
    }
}

impl<E: Encoder> AsRef<str> for EStr<E> {
    fn as_ref(&self) -> &str {
        &self.inner
    }
}

impl<E: Encoder> PartialEq for EStr<E> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<E: Encoder> PartialEq<str> for EStr<E> {
    fn eq(&self, other: &str) -> bool {
        &self.inner == other
    }
}

impl<E: Encoder> Eq for EStr<E> {}

impl<E: Encoder> fmt::Debug for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl<E: Encoder> fmt::Display for EStr<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

/// Decodes a percent-encoded string leniently.
///
/// # Examples
///
/// ```
/// use uri_kit::pct_enc::decode;
///
/// assert_eq!(decode("a%20%2Bb%zz"), "a +b%zz");
/// assert_eq!(decode("a+b"), "a+b");
/// ```
#[must_use]
pub fn decode(s: &str) -> Cow<'_, str> {
    Decode::new(s, false).to_string_lossy()
}

/// Decodes a form-encoded string leniently, that is, like [`decode`]
/// but with `'+'` decoded as a space.
///
/// # Examples
///
/// ```
/// use uri_kit::pct_enc::decode_form;
///
/// assert_eq!(decode_form("one+%26+another%2B"), "one & another+");
/// ```
#[must_use]
pub fn decode_form(s: &str) -> Cow<'_, str> {
    Decode::new(s, true).to_string_lossy()
}

const HEX_DIGITS: &[u8; 16] = b"0123456789ABCDEF";

const fn hex_value(x: u8) -> Option<u8> {
    match x {
        b'0'..=b'9' => Some(x - b'0'),
        b'A'..=b'F' => Some(x - b'A' + 10),
        b'a'..=b'f' => Some(x - b'a' + 10),
        _ => None,
    }
}

/// An iterator decoding a percent-encoded string chunk by chunk.
///
/// This struct is created by [`EStr::decode`].
#[derive(Clone, Debug)]
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct Decode<'a> {
    source: &'a str,
    form: bool,
}

/// An item returned by the [`Decode`] iterator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodedChunk<'a> {
    /// A run of characters that needed no decoding.
    Unencoded(&'a str),
    /// A decoded octet, such as `0x20` from `"%20"`.
    PctDecoded(u8),
}

impl<'a> Decode<'a> {
    fn new(source: &'a str, form: bool) -> Self {
        Self { source, form }
    }

    /// Returns the octet encoded at byte `i` and the length of its encoding.
    fn octet_at(&self, i: usize) -> Option<(u8, usize)> {
        match self.source.as_bytes()[i..] {
            [b'+', ..] if self.form => Some((b' ', 1)),
            [b'%', hi, lo, ..] => Some(((hex_value(hi)? << 4) | hex_value(lo)?, 3)),
            _ => None,
        }
    }

    /// Decodes the whole string, replacing invalid UTF-8 with `U+FFFD`.
    ///
    /// Nothing is allocated if no octet is encoded.
    #[must_use]
    pub fn to_string_lossy(mut self) -> Cow<'a, str> {
        let first = match self.next() {
            None => return Cow::Borrowed(""),
            Some(DecodedChunk::Unencoded(s)) if self.source.is_empty() => return Cow::Borrowed(s),
            Some(chunk) => chunk,
        };

        let mut buf = Vec::new();
        for chunk in core::iter::once(first).chain(self) {
            match chunk {
                DecodedChunk::Unencoded(s) => buf.extend_from_slice(s.as_bytes()),
                DecodedChunk::PctDecoded(x) => buf.push(x),
            }
        }

        match String::from_utf8(buf) {
            Ok(s) => Cow::Owned(s),
            Err(e) => Cow::Owned(String::from_utf8_lossy(e.as_bytes()).into_owned()),
        }
    }
}

impl<'a> Iterator for Decode<'a> {
    type Item = DecodedChunk<'a>;

    fn next(&mut self) -> Option<DecodedChunk<'a>> {
        if self.source.is_empty() {
            return None;
        }
        if let Some((x, len)) = self.octet_at(0) {
            self.source = &self.source[len..];
            return Some(DecodedChunk::PctDecoded(x));
        }

        // Octets start with an ASCII byte, so this is a char boundary.
        let end = (1..self.source.len())
            .find(|&i| self.octet_at(i).is_some())
            .unwrap_or(self.source.len());
        let s;
        (s, self.source) = self.source.split_at(end);
        Some(DecodedChunk::Unencoded(s))
    }
}

impl FusedIterator for Decode<'_> {}

/// Appends `s` to `buf`, percent-encoding the characters `table` does not allow.
pub(crate) fn encode_to(table: Table, s: &str, buf: &mut String) {
    for ch in s.chars() {
        if table.allows(ch) {
            buf.push(ch);
        } else {
            let mut utf8 = [0; 4];
            for &x in ch.encode_utf8(&mut utf8).as_bytes() {
                buf.push('%');
                buf.push(HEX_DIGITS[usize::from(x >> 4)] as char);
                buf.push(HEX_DIGITS[usize::from(x & 0xf)] as char);
            }
        }
    }
}
