use super::{encode_to, Assert, EStr, Encoder};
use core::{fmt, marker::PhantomData, ops::Deref};

/// An owned string that is properly percent-encoded for `E`.
///
/// Dereferences to [`EStr`].
///
/// # Examples
///
/// ```
/// use uri_kit::pct_enc::{
///     encoder::{Data, Query},
///     EString,
/// };
///
/// let mut buf = EString::<Query>::new();
/// for (k, v) in [("name", "张三"), ("speech", "¡Olé!")] {
///     if !buf.is_empty() {
///         buf.push('&');
///     }
///     buf.encode_str::<Data>(k);
///     buf.push('=');
///     buf.encode_str::<Data>(v);
/// }
///
/// assert_eq!(buf, "name=%E5%BC%A0%E4%B8%89&speech=%C2%A1Ol%C3%A9%21");
/// ```
pub struct EString<E: Encoder> {
    buf: String,
    encoder: PhantomData<E>,
}

impl<E: Encoder> EString<E> {
    /// Creates an empty `EString`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            encoder: PhantomData,
        }
    }

    /// Encodes `s` with the sub-encoder `SubE` and appends the result.
    ///
    /// Spaces are encoded as `%20`, never as `'+'`.
    ///
    /// # Panics
    ///
    /// Fails to compile if `SubE` is not a [sub-encoder](Encoder) of `E`.
    pub fn encode_str<SubE: Encoder>(&mut self, s: &str) {
        () = Assert::<SubE, E>::L_IS_SUB_ENCODER_OF_R;
        encode_to(SubE::TABLE, s, &mut self.buf);
    }

    /// Appends a character unencoded.
    ///
    /// # Panics
    ///
    /// Panics if `E::TABLE` does not allow the character.
    pub fn push(&mut self, ch: char) {
        assert!(E::TABLE.allows(ch), "character not allowed unencoded");
        self.buf.push(ch);
    }

    /// Consumes the `EString` and yields the underlying `String`.
    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

impl<E: Encoder> Deref for EString<E> {
    type Target = EStr<E>;

    fn deref(&self) -> &EStr<E> {
        EStr::new_validated(&self.buf)
    }
}

impl<E: Encoder> Clone for EString<E> {
    fn clone(&self) -> Self {
        Self {
            buf: self.buf.clone(),
            encoder: PhantomData,
        }
    }
}

impl<E: Encoder> Default for EString<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Encoder> AsRef<str> for EString<E> {
    fn as_ref(&self) -> &str {
        &self.buf
    }
}

impl<E: Encoder> PartialEq for EString<E> {
    fn eq(&self, other: &Self) -> bool {
        self.buf == other.buf
    }
}

impl<E: Encoder> PartialEq<str> for EString<E> {
    fn eq(&self, other: &str) -> bool {
        self.buf == other
    }
}

impl<E: Encoder> PartialEq<&str> for EString<E> {
    fn eq(&self, other: &&str) -> bool {
        self.buf == *other
    }
}

impl<E: Encoder> Eq for EString<E> {}

impl<E: Encoder> fmt::Debug for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.buf, f)
    }
}

impl<E: Encoder> fmt::Display for EString<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.buf, f)
    }
}
