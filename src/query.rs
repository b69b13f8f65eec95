//! Nested query strings.
//!
//! A query string such as `a=1&b[c]=2&b[d][e]=3` is represented as a
//! [`Query`], an ordered mapping from keys to [`QueryValue`]s where each
//! bracketed key segment opens a nested mapping:
//!
//! ```text
//! a => "1"
//! b => c => "2"
//!      d => e => "3"
//! ```

use crate::{
    error::{Error, ErrorKind},
    pct_enc::{
        decode_form,
        encoder::{Data, Query as QueryE},
        EString,
    },
};
use indexmap::{map, IndexMap};
use regex::Regex;
use std::sync::OnceLock;

/// A value in a [`Query`]: either a string or a nested mapping.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(untagged)
)]
pub enum QueryValue {
    /// A string value.
    Leaf(String),
    /// A nested mapping, reached through a bracketed key segment.
    Node(Query),
}

impl QueryValue {
    /// Returns the string value, or `None` for a nested mapping.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::Leaf(s) => Some(s),
            QueryValue::Node(_) => None,
        }
    }

    /// Returns the nested mapping, or `None` for a string value.
    #[must_use]
    pub fn as_query(&self) -> Option<&Query> {
        match self {
            QueryValue::Leaf(_) => None,
            QueryValue::Node(q) => Some(q),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(s: &str) -> Self {
        QueryValue::Leaf(s.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(s: String) -> Self {
        QueryValue::Leaf(s)
    }
}

impl From<Query> for QueryValue {
    fn from(q: Query) -> Self {
        QueryValue::Node(q)
    }
}

impl PartialEq<str> for QueryValue {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for QueryValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

/// An ordered mapping of query keys to values.
///
/// Every key is non-empty and free of brackets, and no value is an empty
/// nested mapping. Each way of building or modifying a `Query` keeps to
/// this, so that [`Query::decode`] reads back what [`Query::encode`] writes.
///
/// # Examples
///
/// ```
/// use uri_kit::query::{Query, QueryValue};
///
/// let query = Query::decode("pg=3&two%5Bc%5D%5Bi%5D=ay")?;
/// assert_eq!(query["pg"], "3");
/// assert_eq!(query.get_path(["two", "c", "i"]).unwrap(), "ay");
/// assert_eq!(query.encode(), "pg=3&two%5Bc%5D%5Bi%5D=ay");
/// # Ok::<_, uri_kit::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Query {
    map: IndexMap<String, QueryValue>,
}

fn key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([^\[\]]+)((?:\[[^\[\]]+\])*)$").expect("key pattern should compile")
    })
}

fn sub_key_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\[\]]+)\]").expect("sub-key pattern should compile"))
}

/// Checks that a key names a single segment: non-empty and free of brackets.
fn check_key(key: &str) -> Result<(), Error> {
    if key.is_empty() || key.contains(['[', ']']) {
        Err(Error::new(ErrorKind::InvalidQuerySyntax))
    } else {
        Ok(())
    }
}

/// Splits a decoded key like `a[b][c]` into its segments.
fn parse_key(key: &str) -> Result<Vec<&str>, Error> {
    let caps = key_regex()
        .captures(key)
        .ok_or(Error::new(ErrorKind::InvalidQuerySyntax))?;

    let mut path = Vec::new();
    if let Some(name) = caps.get(1) {
        path.push(name.as_str());
    }
    if let Some(subs) = caps.get(2) {
        path.extend(
            sub_key_regex()
                .captures_iter(subs.as_str())
                .filter_map(|c| c.get(1))
                .map(|m| m.as_str()),
        );
    }
    Ok(path)
}

impl Query {
    /// Creates an empty `Query`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a query string, i.e., the part of a URI after `'?'`.
    ///
    /// The string is split on `'&'` and each pair on its first `'='`.
    /// Keys and values are percent-decoded, with `'+'` decoded as a space.
    /// Empty pairs are skipped and a pair without `'='` has an empty value.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidQuerySyntax`] if a decoded key
    /// is not of the form `name[sub]...` with non-empty segments free of brackets.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{query::Query, ErrorKind};
    ///
    /// let query = Query::decode("a[b]=1&&a[c]=2&flag")?;
    /// assert_eq!(query.get_path(["a", "b"]).unwrap(), "1");
    /// assert_eq!(query.get_path(["a", "c"]).unwrap(), "2");
    /// assert_eq!(query["flag"], "");
    ///
    /// assert_eq!(Query::decode("a[=1").unwrap_err().kind(), ErrorKind::InvalidQuerySyntax);
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn decode(s: &str) -> Result<Self, Error> {
        let mut query = Self::new();
        for pair in s.split('&').filter(|pair| !pair.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            let key = decode_form(k);
            let path = parse_key(&key)?;
            query.insert_path(&path, decode_form(v).into_owned());
        }
        Ok(query)
    }

    fn insert_path(&mut self, path: &[&str], value: String) {
        match path {
            [] => {}
            [key] => {
                self.map.insert(key.to_string(), QueryValue::Leaf(value));
            }
            [key, rest @ ..] => {
                let entry = self
                    .map
                    .entry(key.to_string())
                    .or_insert_with(|| QueryValue::Node(Query::new()));
                if let QueryValue::Leaf(_) = entry {
                    *entry = QueryValue::Node(Query::new());
                }
                if let QueryValue::Node(q) = entry {
                    q.insert_path(rest, value);
                }
            }
        }
    }

    /// Encodes the query to a query string.
    ///
    /// Nested keys are written as `outer[inner]`, with the whole key
    /// percent-encoded. Spaces are encoded as `%20`, never as `'+'`,
    /// so that [`Query::decode`] gives back an equal `Query`.
    #[must_use]
    pub fn encode(&self) -> EString<QueryE> {
        let mut buf = EString::new();
        self.encode_to(&mut buf, None);
        buf
    }

    fn encode_to(&self, buf: &mut EString<QueryE>, prefix: Option<&str>) {
        for (k, v) in &self.map {
            let key = match prefix {
                Some(prefix) => format!("{prefix}[{k}]"),
                None => k.clone(),
            };
            match v {
                QueryValue::Leaf(value) => {
                    if !buf.is_empty() {
                        buf.push('&');
                    }
                    buf.encode_str::<Data>(&key);
                    buf.push('=');
                    buf.encode_str::<Data>(value);
                }
                QueryValue::Node(q) => q.encode_to(buf, Some(&key)),
            }
        }
    }

    /// Merges a patch into the query.
    ///
    /// Nested mappings are merged recursively. [`PatchValue::Remove`] deletes
    /// the key, and a mapping left empty by a removal is deleted as well.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidQuerySyntax`] if the patch sets
    /// or merges into a key that is empty or contains a bracket.
    /// The query is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::query::{Query, QueryPatch};
    ///
    /// let mut query = Query::decode("a[b]=x&a[c]=y")?;
    /// query.merge(&QueryPatch::new().node("a", QueryPatch::new().remove("b")))?;
    /// assert_eq!(query, Query::decode("a[c]=y")?);
    ///
    /// query.merge(&QueryPatch::new().node("a", QueryPatch::new().remove("c")))?;
    /// assert!(query.is_empty());
    ///
    /// assert!(query.merge(&QueryPatch::new().set("a[b]", "x")).is_err());
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn merge(&mut self, patch: &QueryPatch) -> Result<(), Error> {
        patch.check_keys()?;
        self.apply(patch);
        Ok(())
    }

    fn apply(&mut self, patch: &QueryPatch) {
        for (k, pv) in &patch.map {
            match pv {
                PatchValue::Remove => {
                    self.map.shift_remove(k);
                }
                PatchValue::Set(v) => {
                    self.map.insert(k.clone(), QueryValue::Leaf(v.clone()));
                }
                PatchValue::Node(sub) => {
                    let entry = self
                        .map
                        .entry(k.clone())
                        .or_insert_with(|| QueryValue::Node(Query::new()));
                    if let QueryValue::Leaf(_) = entry {
                        *entry = QueryValue::Node(Query::new());
                    }
                    let now_empty = match entry {
                        QueryValue::Node(q) => {
                            q.apply(sub);
                            q.is_empty()
                        }
                        QueryValue::Leaf(_) => false,
                    };
                    if now_empty {
                        self.map.shift_remove(k);
                    }
                }
            }
        }
    }

    /// Removes every key present in `shape` from the query.
    ///
    /// This is [`merge`](Self::merge) with every value of `shape` replaced
    /// by [`PatchValue::Remove`]; the values themselves are ignored.
    pub fn remove(&mut self, shape: &Query) {
        self.apply(&QueryPatch::removal(shape));
    }

    /// Returns the value of a top-level key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&QueryValue> {
        self.map.get(key)
    }

    /// Follows a path of keys through nested mappings.
    #[must_use]
    pub fn get_path<'k, I>(&self, path: I) -> Option<&QueryValue>
    where
        I: IntoIterator<Item = &'k str>,
    {
        let mut path = path.into_iter();
        let mut value = self.map.get(path.next()?)?;
        for key in path {
            value = value.as_query()?.map.get(key)?;
        }
        Some(value)
    }

    /// Inserts a value, returning the previous value of the key.
    ///
    /// An existing key keeps its position. An empty nested mapping stands
    /// for no value, so inserting one removes the key.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidQuerySyntax`] if the key is
    /// empty or contains a bracket.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{query::Query, ErrorKind};
    ///
    /// let mut query = Query::new();
    /// query.insert("a", "1")?;
    /// assert_eq!(query.insert("a", Query::new())?.unwrap(), "1");
    /// assert!(query.is_empty());
    ///
    /// assert_eq!(query.insert("", "1").unwrap_err().kind(), ErrorKind::InvalidQuerySyntax);
    /// assert_eq!(query.insert("a[b]", "1").unwrap_err().kind(), ErrorKind::InvalidQuerySyntax);
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<QueryValue>,
    ) -> Result<Option<QueryValue>, Error> {
        let key = key.into();
        check_key(&key)?;
        Ok(match value.into() {
            QueryValue::Node(q) if q.is_empty() => self.map.shift_remove(&key),
            value => self.map.insert(key, value),
        })
    }

    /// Builds a query from key-value pairs, as if by [`insert`](Self::insert)
    /// in order.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidQuerySyntax`] if a key is
    /// empty or contains a bracket.
    pub fn try_from_iter<K, V, I>(iter: I) -> Result<Self, Error>
    where
        K: Into<String>,
        V: Into<QueryValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        let mut query = Self::new();
        for (k, v) in iter {
            query.insert(k, v)?;
        }
        Ok(query)
    }

    /// Returns the number of top-level keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Checks whether the query has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Returns an iterator over the top-level entries in insertion order.
    pub fn iter(&self) -> map::Iter<'_, String, QueryValue> {
        self.map.iter()
    }
}

impl core::ops::Index<&str> for Query {
    type Output = QueryValue;

    /// # Panics
    ///
    /// Panics if the key is not present.
    fn index(&self, key: &str) -> &QueryValue {
        match self.map.get(key) {
            Some(v) => v,
            None => panic!("key {key:?} not in query"),
        }
    }
}

impl<'a> IntoIterator for &'a Query {
    type Item = (&'a String, &'a QueryValue);
    type IntoIter = map::Iter<'a, String, QueryValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.map.iter()
    }
}

impl<K: Into<String>, V: Into<QueryValue>, const N: usize> TryFrom<[(K, V); N]> for Query {
    type Error = Error;

    fn try_from(entries: [(K, V); N]) -> Result<Self, Error> {
        Self::try_from_iter(entries)
    }
}

#[cfg(feature = "serde")]
mod serde_impl {
    use super::{Query, QueryValue};
    use indexmap::IndexMap;
    use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

    impl Serialize for Query {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            self.map.serialize(serializer)
        }
    }

    impl<'de> Deserialize<'de> for Query {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            let map = IndexMap::<String, QueryValue>::deserialize(deserializer)?;
            Query::try_from_iter(map).map_err(de::Error::custom)
        }
    }
}

/// A change to one key of a [`Query`], see [`Query::merge`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PatchValue {
    /// Sets the key to a string value.
    Set(String),
    /// Deletes the key.
    Remove,
    /// Merges into the nested mapping at the key.
    Node(QueryPatch),
}

/// A set of changes to apply to a [`Query`], see [`Query::merge`].
///
/// # Examples
///
/// ```
/// use uri_kit::query::{Query, QueryPatch};
///
/// let mut query = Query::decode("encval=x&one=1&two[b]=bee&two[c][i]=ay")?;
/// query.merge(
///     &QueryPatch::new()
///         .set("encval", "some new value")
///         .set("one", "2")
///         .node("two", QueryPatch::new().set("b", "BEE").remove("c")),
/// )?;
/// assert_eq!(query, Query::decode("encval=some+new+value&one=2&two[b]=BEE")?);
/// # Ok::<_, uri_kit::Error>(())
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryPatch {
    map: IndexMap<String, PatchValue>,
}

impl QueryPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a patch that removes every key present in `shape`.
    #[must_use]
    pub fn removal(shape: &Query) -> Self {
        let map = shape
            .iter()
            .map(|(k, v)| {
                let pv = match v {
                    QueryValue::Leaf(_) => PatchValue::Remove,
                    QueryValue::Node(q) => PatchValue::Node(Self::removal(q)),
                };
                (k.clone(), pv)
            })
            .collect();
        Self { map }
    }

    /// Adds a change that sets the key to a string value.
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.map.insert(key.into(), PatchValue::Set(value.into()));
        self
    }

    /// Adds a change that deletes the key.
    #[must_use]
    pub fn remove(mut self, key: impl Into<String>) -> Self {
        self.map.insert(key.into(), PatchValue::Remove);
        self
    }

    /// Adds a change that merges into the nested mapping at the key.
    #[must_use]
    pub fn node(mut self, key: impl Into<String>, patch: QueryPatch) -> Self {
        self.map.insert(key.into(), PatchValue::Node(patch));
        self
    }

    /// Checks whether the patch has no changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn check_keys(&self) -> Result<(), Error> {
        for (k, pv) in &self.map {
            match pv {
                PatchValue::Remove => {}
                PatchValue::Set(_) => check_key(k)?,
                PatchValue::Node(sub) => {
                    check_key(k)?;
                    sub.check_keys()?;
                }
            }
        }
        Ok(())
    }
}

impl From<Query> for QueryPatch {
    /// Converts a query into a patch that sets every value in it.
    fn from(query: Query) -> Self {
        let map = query
            .map
            .into_iter()
            .map(|(k, v)| {
                let pv = match v {
                    QueryValue::Leaf(s) => PatchValue::Set(s),
                    QueryValue::Node(q) => PatchValue::Node(q.into()),
                };
                (k, pv)
            })
            .collect();
        Self { map }
    }
}
