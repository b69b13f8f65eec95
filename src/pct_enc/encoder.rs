//! Percent-encoders for URI components.

use super::{table, Encoder, Table};

/// An encoder for the data inside a query key or value.
///
/// Only unreserved characters are left unencoded, so that neither the
/// pair delimiters `&` and `=` nor the key brackets can leak out of the data.
#[derive(Clone, Copy, Debug)]
pub struct Data(());

/// An encoder for the host component.
#[derive(Clone, Copy, Debug)]
pub struct RegName(());

/// An encoder for the path component.
#[derive(Clone, Copy, Debug)]
pub struct Path(());

/// An encoder for the query component.
#[derive(Clone, Copy, Debug)]
pub struct Query(());

/// An encoder for the fragment component.
#[derive(Clone, Copy, Debug)]
pub struct Fragment(());

impl Encoder for Data {
    const TABLE: Table = table::DATA;
}

impl Encoder for RegName {
    const TABLE: Table = table::REG_NAME;
}

impl Encoder for Path {
    const TABLE: Table = table::PATH;
}

impl Encoder for Query {
    const TABLE: Table = table::QUERY;
}

impl Encoder for Fragment {
    const TABLE: Table = table::FRAGMENT;
}
