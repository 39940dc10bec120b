use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::api::CatalogApi;
use super::types::*;
use crate::error::{error_from_response, ApiError};

const CATALOG_PATH: &str = "/api/catalog/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("polaris-cli/", env!("CARGO_PKG_VERSION"));
/// Separator for multi-level namespaces in URL paths
const NAMESPACE_SEPARATOR: &str = "\u{1f}";
const NO_BODY: Option<&()> = None;

/// Iceberg REST Catalog client bound to one warehouse
pub struct IcebergClient {
    client: Client,
    base_url: String,
    token: String,
    warehouse: String,
    /// Warehouse prefix obtained from config endpoint
    prefix: Option<String>,
}

/// The token for the following page, or `None` when paging is done.
/// A repeated token also ends paging.
fn next_page_token(current: Option<&str>, next: Option<String>) -> Option<String> {
    match next {
        Some(token) if token.is_empty() => None,
        Some(token) if current == Some(token.as_str()) => {
            warn!(token = %token, "server repeated page token; stopping pagination");
            None
        }
        next => next,
    }
}

/// Encode a namespace as a single path segment
pub fn encode_namespace(namespace: &[String]) -> String {
    urlencoding::encode(&namespace.join(NAMESPACE_SEPARATOR)).into_owned()
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

impl IcebergClient {
    /// Create a new Iceberg REST catalog client for `warehouse` (the catalog name)
    pub fn new(base_url: &str, token: String, warehouse: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", base_url.trim_end_matches('/'), CATALOG_PATH),
            token,
            warehouse,
            prefix: None,
        })
    }

    /// Create a client and resolve its warehouse prefix.
    pub async fn connect(base_url: &str, token: String, warehouse: String) -> Result<Self, ApiError> {
        let mut client = Self::new(base_url, token, warehouse)?;
        client.fetch_config().await?;
        Ok(client)
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Fetch the catalog config to get the warehouse prefix.
    /// This must be called before any namespace or table operation.
    pub async fn fetch_config(&mut self) -> Result<(), ApiError> {
        let url = format!("{}/config", self.base_url);
        debug!(url = %url, warehouse = %self.warehouse, "fetching catalog config");

        let response = self
            .client
            .get(&url)
            .query(&[("warehouse", self.warehouse.as_str())])
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!(status = %response.status(), warehouse = %self.warehouse, "catalog config request failed");
            return Err(error_from_response(response).await);
        }

        let config: CatalogConfig = decode(response).await?;

        // Servers that do not override the prefix address catalogs by warehouse name
        self.prefix = Some(
            config
                .prefix()
                .map(str::to_string)
                .unwrap_or_else(|| urlencoding::encode(&self.warehouse).into_owned()),
        );

        Ok(())
    }

    /// Build a URL below the warehouse prefix; segments must already be encoded
    fn catalog_url(&self, segments: &[&str]) -> Result<String, ApiError> {
        let prefix = self.prefix.as_ref().ok_or_else(|| {
            ApiError::Config("Catalog prefix not set. Call fetch_config() first.".to_string())
        })?;

        let mut url = format!("{}/{}", self.base_url, prefix);
        for segment in segments {
            url.push('/');
            url.push_str(segment);
        }
        Ok(url)
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        debug!(method = %method, url = %url, "catalog request");

        let mut request = self
            .client
            .request(method.clone(), url)
            .bearer_auth(&self.token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            warn!(method = %method, url = %url, status = %response.status(), "catalog request failed");
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl CatalogApi for IcebergClient {
    async fn list_namespaces(
        &self,
        parent: Option<&[String]>,
    ) -> Result<Vec<Vec<String>>, ApiError> {
        let url = self.catalog_url(&["namespaces"])?;
        let mut namespaces = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut query = Vec::new();
            if let Some(parent) = parent {
                query.push(("parent", parent.join(NAMESPACE_SEPARATOR)));
            }
            if let Some(token) = &page_token {
                query.push(("pageToken", token.clone()));
            }

            let page: ListNamespacesResponse =
                decode(self.send(Method::GET, &url, &query, NO_BODY).await?).await?;
            namespaces.extend(page.namespaces);

            match next_page_token(page_token.as_deref(), page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(namespaces)
    }

    async fn create_namespace(
        &self,
        request: CreateNamespaceRequest,
    ) -> Result<NamespaceResponse, ApiError> {
        let url = self.catalog_url(&["namespaces"])?;
        decode(self.send(Method::POST, &url, &[], Some(&request)).await?).await
    }

    async fn load_namespace(&self, namespace: &[String]) -> Result<NamespaceResponse, ApiError> {
        let url = self.catalog_url(&["namespaces", &encode_namespace(namespace)])?;
        decode(self.send(Method::GET, &url, &[], NO_BODY).await?).await
    }

    async fn drop_namespace(&self, namespace: &[String]) -> Result<(), ApiError> {
        let url = self.catalog_url(&["namespaces", &encode_namespace(namespace)])?;
        self.send(Method::DELETE, &url, &[], NO_BODY).await?;
        Ok(())
    }

    async fn update_namespace_properties(
        &self,
        namespace: &[String],
        request: UpdateNamespacePropertiesRequest,
    ) -> Result<UpdateNamespacePropertiesResponse, ApiError> {
        let url = self.catalog_url(&["namespaces", &encode_namespace(namespace), "properties"])?;
        decode(self.send(Method::POST, &url, &[], Some(&request)).await?).await
    }

    async fn list_tables(&self, namespace: &[String]) -> Result<Vec<TableIdentifier>, ApiError> {
        let url = self.catalog_url(&["namespaces", &encode_namespace(namespace), "tables"])?;
        let mut identifiers = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let query: Vec<(&str, String)> = page_token
                .iter()
                .map(|token| ("pageToken", token.clone()))
                .collect();

            let page: ListTablesResponse =
                decode(self.send(Method::GET, &url, &query, NO_BODY).await?).await?;
            identifiers.extend(page.identifiers);

            match next_page_token(page_token.as_deref(), page.next_page_token) {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(identifiers)
    }

    async fn load_table(
        &self,
        namespace: &[String],
        table: &str,
    ) -> Result<LoadTableResult, ApiError> {
        let url = self.catalog_url(&[
            "namespaces",
            &encode_namespace(namespace),
            "tables",
            &urlencoding::encode(table),
        ])?;
        decode(self.send(Method::GET, &url, &[], NO_BODY).await?).await
    }

    async fn drop_table(
        &self,
        namespace: &[String],
        table: &str,
        purge: bool,
    ) -> Result<(), ApiError> {
        let url = self.catalog_url(&[
            "namespaces",
            &encode_namespace(namespace),
            "tables",
            &urlencoding::encode(table),
        ])?;
        self.send(
            Method::DELETE,
            &url,
            &[("purgeRequested", purge.to_string())],
            NO_BODY,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_namespace_uses_unit_separator() {
        let ns = vec!["db".to_string(), "sales".to_string()];
        assert_eq!(encode_namespace(&ns), "db%1Fsales");
        assert_eq!(encode_namespace(&["single".to_string()]), "single");
    }

    #[test]
    fn test_next_page_token() {
        assert_eq!(next_page_token(None, Some("a".into())), Some("a".into()));
        assert_eq!(next_page_token(Some("a"), Some("b".into())), Some("b".into()));
        assert_eq!(next_page_token(Some("a"), Some("a".into())), None);
        assert_eq!(next_page_token(Some("a"), Some(String::new())), None);
        assert_eq!(next_page_token(Some("a"), None), None);
    }

    #[test]
    fn test_catalog_url_requires_prefix() {
        let client =
            IcebergClient::new("http://localhost:8181", "t".into(), "quickstart".into()).unwrap();
        let err = client.catalog_url(&["namespaces"]).unwrap_err();
        assert!(err.to_string().contains("fetch_config"));
    }
}
