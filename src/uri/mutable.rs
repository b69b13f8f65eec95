use super::Uri;
use crate::{
    component::{is_valid_scheme, Port},
    error::{Error, ErrorKind},
    query::{Query, QueryPatch},
    resolver::resolve_path,
};

impl Uri {
    /// Sets the scheme, which is lowercased and marked as explicit.
    ///
    /// The port and host are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidScheme`] if `scheme` is not a
    /// letter followed by letters, digits, `'+'`, `'-'` or `'.'`.
    pub fn set_scheme(&mut self, scheme: &str) -> Result<(), Error> {
        if !is_valid_scheme(scheme) {
            return Err(Error::new(ErrorKind::InvalidScheme));
        }
        self.scheme = Some(scheme.to_ascii_lowercase());
        self.explicit.scheme = true;
        Ok(())
    }

    /// Sets the decoded host and marks it as explicit.
    pub fn set_host(&mut self, host: &str) {
        self.host = Some(host.to_string());
        self.explicit.host = true;
    }

    /// Sets the port and marks it as explicit.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let mut uri = Uri::parse("http://example.com/")?;
    /// uri.set_port(80);
    /// assert_eq!(uri.to_string(), "http://example.com:80/");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn set_port(&mut self, port: impl Into<Port>) {
        self.port = Some(port.into());
        self.explicit.port = true;
    }

    /// Sets the decoded path, resolving it against the current one.
    ///
    /// A path starting with `'/'` replaces the current path, and any other
    /// path is appended to it. Dot segments are removed in both cases.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::PathEscapesRoot`] if a `..` segment
    /// would rise above the root. The path is unchanged in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let mut uri = Uri::parse("http://example.com/a/b")?;
    /// uri.set_path("../c")?;
    /// assert_eq!(uri.path(), "/a/c");
    /// uri.set_path("/x/./y")?;
    /// assert_eq!(uri.path(), "/x/y");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn set_path(&mut self, path: &str) -> Result<(), Error> {
        self.path = resolve_path(path, &self.path)?;
        Ok(())
    }

    /// Replaces the query mapping.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{query::Query, Uri};
    ///
    /// let mut uri = Uri::parse("http://example.com/?a=1")?;
    /// uri.set_query(Query::try_from([("b", "2")])?);
    /// assert_eq!(uri.to_string(), "http://example.com/?b=2");
    ///
    /// uri.set_query(Query::new());
    /// assert_eq!(uri.to_string(), "http://example.com/");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn set_query(&mut self, query: Query) {
        self.query = query;
    }

    /// Replaces the query with one parsed from a query string.
    ///
    /// A leading `'?'` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidQuerySyntax`] if a key is
    /// malformed. The query is unchanged in that case.
    pub fn set_query_str(&mut self, s: &str) -> Result<(), Error> {
        self.query = Query::decode(s.strip_prefix('?').unwrap_or(s))?;
        Ok(())
    }

    /// Sets the decoded fragment, with any leading or trailing `'#'` trimmed.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::Uri;
    ///
    /// let mut uri = Uri::parse("http://example.com/")?;
    /// uri.set_fragment("#top#");
    /// assert_eq!(uri.fragment(), "top");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn set_fragment(&mut self, fragment: &str) {
        self.fragment = String::from(fragment.trim_matches('#'));
    }

    /// Merges a patch into the query. See [`Query::merge`].
    ///
    /// # Errors
    ///
    /// Returns `Err` with [`ErrorKind::InvalidQuerySyntax`] if the patch sets
    /// a key that is empty or contains a bracket. The query is unchanged in
    /// that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use uri_kit::{query::QueryPatch, Uri};
    ///
    /// let mut uri = Uri::parse("http://example.com/?a=1&b[c]=2&b[d]=3")?;
    /// uri.update_query_values(
    ///     &QueryPatch::new()
    ///         .set("a", "one")
    ///         .node("b", QueryPatch::new().remove("c")),
    /// )?;
    /// assert_eq!(uri.query_string(), "a=one&b%5Bd%5D=3");
    /// # Ok::<_, uri_kit::Error>(())
    /// ```
    pub fn update_query_values(&mut self, patch: &QueryPatch) -> Result<(), Error> {
        self.query.merge(patch)
    }

    /// Removes every key present in `shape` from the query. See [`Query::remove`].
    pub fn remove_from_query(&mut self, shape: &Query) {
        self.query.remove(shape);
    }
}
