pub mod api;
pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::CatalogApi;
pub use client::{encode_namespace, IcebergClient};
pub use types::*;
