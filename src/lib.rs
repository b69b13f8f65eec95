#![warn(missing_debug_implementations, missing_docs, rust_2018_idioms)]

//! A URI type with scheme-aware defaulting, reference resolution and
//! minimal rendering.
//!
//! A [`Uri`] is parsed from a string by splitting it into raw components
//! with a [`Parser`](parser::Parser), then resolving them with a
//! [`Resolver`]: components that are left out are filled in from a
//! [registry] of well-known ports and default hosts, or inherited from a
//! base URI. Paths are cleaned of dot segments and queries are decoded into
//! a nested [`Query`](query::Query) mapping.
//!
//! A [`Renderer`] turns a `Uri` back into a string, leaving out whatever
//! the registry would imply, or into the shortest reference from a base.
//!
//! ```
//! use uri_kit::Uri;
//!
//! let base = Uri::parse("https://example.com/docs/guide/intro?lang=en")?;
//! let uri = Uri::parse_relative("../../api/", &base)?;
//! assert_eq!(uri.to_string(), "https://example.com/docs/api/");
//! assert_eq!(uri.render_relative(&base)?, "/docs/api/");
//! # Ok::<_, uri_kit::Error>(())
//! ```
//!
//! # Feature flags
//!
//! - `impl-error` (default): Implements [`Error`] for the error type.
//!
//! - `log`: Logs registry updates at debug level and failed resolutions
//!   at trace level with the [`log`](https://docs.rs/log) crate.
//!
//! - `serde`: Implements `Serialize` and `Deserialize` for [`Uri`], which
//!   goes through its string form, and for [`Query`](query::Query), which
//!   goes through nested maps.
//!
//! [registry]: registry
//! [`Error`]: std::error::Error

pub mod component;
mod error;
mod fmt;
mod log;
pub mod parser;
pub mod pct_enc;
pub mod query;
pub mod registry;
mod render;
mod resolver;
mod uri;

pub use error::{Error, ErrorKind};
pub use render::{Parts, Renderer};
pub use resolver::Resolver;
pub use uri::Uri;
