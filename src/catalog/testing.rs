//! Recording [`CatalogApi`] used by command tests.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::api::CatalogApi;
use super::types::*;
use crate::error::ApiError;
use crate::management::Properties;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub namespace: Vec<String>,
    pub args: Vec<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct RecordingCatalog {
    calls: Mutex<Vec<Call>>,
    table: Option<LoadTableResult>,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: LoadTableResult) -> Self {
        Self {
            table: Some(table),
            ..Self::default()
        }
    }

    pub fn only_call(&self) -> Call {
        let calls = self.calls.lock().unwrap().clone();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {:?}", calls);
        calls.into_iter().next().unwrap()
    }

    fn record(&self, method: &'static str, namespace: &[String], args: &[&str], body: Option<Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            namespace: namespace.to_vec(),
            args: args.iter().map(|a| a.to_string()).collect(),
            body,
        });
    }
}

#[async_trait]
impl CatalogApi for RecordingCatalog {
    async fn list_namespaces(
        &self,
        parent: Option<&[String]>,
    ) -> Result<Vec<Vec<String>>, ApiError> {
        let parent = parent.unwrap_or(&[]);
        self.record("list_namespaces", parent, &[], None);
        let mut child = parent.to_vec();
        child.push("child".to_string());
        Ok(vec![child])
    }

    async fn create_namespace(
        &self,
        request: CreateNamespaceRequest,
    ) -> Result<NamespaceResponse, ApiError> {
        self.record(
            "create_namespace",
            &request.namespace,
            &[],
            Some(serde_json::to_value(&request).unwrap()),
        );
        Ok(NamespaceResponse {
            namespace: request.namespace,
            properties: Some(request.properties),
        })
    }

    async fn load_namespace(&self, namespace: &[String]) -> Result<NamespaceResponse, ApiError> {
        self.record("load_namespace", namespace, &[], None);
        Ok(NamespaceResponse {
            namespace: namespace.to_vec(),
            properties: Some(Properties::from([(
                "location".to_string(),
                "s3://bucket/ns".to_string(),
            )])),
        })
    }

    async fn drop_namespace(&self, namespace: &[String]) -> Result<(), ApiError> {
        self.record("drop_namespace", namespace, &[], None);
        Ok(())
    }

    async fn update_namespace_properties(
        &self,
        namespace: &[String],
        request: UpdateNamespacePropertiesRequest,
    ) -> Result<UpdateNamespacePropertiesResponse, ApiError> {
        self.record(
            "update_namespace_properties",
            namespace,
            &[],
            Some(serde_json::to_value(&request).unwrap()),
        );
        Ok(UpdateNamespacePropertiesResponse {
            updated: request.updates.keys().cloned().collect(),
            removed: request.removals,
            missing: None,
        })
    }

    async fn list_tables(&self, namespace: &[String]) -> Result<Vec<TableIdentifier>, ApiError> {
        self.record("list_tables", namespace, &[], None);
        Ok(vec![
            TableIdentifier {
                namespace: namespace.to_vec(),
                name: "orders".to_string(),
            },
            TableIdentifier {
                namespace: namespace.to_vec(),
                name: "customers".to_string(),
            },
        ])
    }

    async fn load_table(
        &self,
        namespace: &[String],
        table: &str,
    ) -> Result<LoadTableResult, ApiError> {
        self.record("load_table", namespace, &[table], None);
        Ok(self.table.clone().unwrap_or_else(|| LoadTableResult {
            metadata_location: Some("s3://bucket/metadata/v1.json".to_string()),
            metadata: TableMetadata::default(),
            config: None,
        }))
    }

    async fn drop_table(
        &self,
        namespace: &[String],
        table: &str,
        purge: bool,
    ) -> Result<(), ApiError> {
        let purge = purge.to_string();
        self.record("drop_table", namespace, &[table, &purge], None);
        Ok(())
    }
}
