use async_trait::async_trait;

use super::types::*;
use crate::error::ApiError;

/// Iceberg REST catalog operations against a single warehouse.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// List namespaces, optionally only the children of `parent`.
    async fn list_namespaces(&self, parent: Option<&[String]>)
        -> Result<Vec<Vec<String>>, ApiError>;
    async fn create_namespace(
        &self,
        request: CreateNamespaceRequest,
    ) -> Result<NamespaceResponse, ApiError>;
    async fn load_namespace(&self, namespace: &[String]) -> Result<NamespaceResponse, ApiError>;
    async fn drop_namespace(&self, namespace: &[String]) -> Result<(), ApiError>;
    async fn update_namespace_properties(
        &self,
        namespace: &[String],
        request: UpdateNamespacePropertiesRequest,
    ) -> Result<UpdateNamespacePropertiesResponse, ApiError>;

    async fn list_tables(&self, namespace: &[String]) -> Result<Vec<TableIdentifier>, ApiError>;
    async fn load_table(&self, namespace: &[String], table: &str)
        -> Result<LoadTableResult, ApiError>;
    async fn drop_table(&self, namespace: &[String], table: &str, purge: bool)
        -> Result<(), ApiError>;
}
