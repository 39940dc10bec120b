//! Command-line client for an Apache Polaris catalog server.
//!
//! The management API (catalogs, principals, roles and grants) lives in
//! [`management`]; the Iceberg REST catalog API (namespaces and tables) in
//! [`catalog`]. [`cli`] turns parsed arguments into calls against either.

pub mod catalog;
pub mod cli;
pub mod error;
pub mod logging;
pub mod management;

pub use error::ApiError;
