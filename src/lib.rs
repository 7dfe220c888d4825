//! Resolve cloud image ids and agent tools from simplestreams catalogs.
//!
//! A lookup walks every configured base URL: it reads the index, picks the
//! products document for the wanted data type and extracts the items that
//! match a [`Constraint`]. Documents can be required to carry a detached
//! Ed25519 signature.

pub mod cloud;
pub mod constraint;
pub mod error;
pub mod fetch;
pub mod matcher;
pub mod repositories;
pub mod resolver;
pub mod series;
pub mod signing;
pub mod simplestreams;

pub use cloud::{CloudSpec, ImageMetadata, LookupParams, ResultRecord, ToolsMetadata};
pub use constraint::{Constraint, ToolsVersion};
pub use error::{ErrorKind, Result, SourceFailure, SourceFailures, StreamsError};
pub use fetch::{DataSource, FileDataSource, HttpDataSource, MemoryDataSource, SchemeRouter};
pub use signing::{Keyring, SignatureEnvelope};
pub use simplestreams::{DEFAULT_BASE_URL, DEFAULT_INDEX_PATH, Simplestreams};
