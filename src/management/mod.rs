pub mod api;
pub mod client;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use api::ManagementApi;
pub use client::ManagementClient;
pub use types::*;
