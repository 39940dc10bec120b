use async_trait::async_trait;
use reqwest::{Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use super::api::ManagementApi;
use super::types::*;
use crate::error::{error_from_response, ApiError};

const MANAGEMENT_PATH: &str = "/api/management/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("polaris-cli/", env!("CARGO_PKG_VERSION"));
const NO_BODY: Option<&()> = None;

/// Polaris management API client
pub struct ManagementClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Join path segments, percent-encoding each one.
fn path(segments: &[&str]) -> String {
    segments
        .iter()
        .map(|s| format!("/{}", urlencoding::encode(s)))
        .collect()
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let body = response.text().await?;
    Ok(serde_json::from_str(&body)?)
}

impl ManagementClient {
    /// Create a client for the server at `base_url` (e.g. `http://localhost:8181`).
    pub fn new(base_url: &str, token: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: format!("{}{}", base_url.trim_end_matches('/'), MANAGEMENT_PATH),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(method = %method, url = %url, "management request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(&self.token);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            warn!(method = %method, url = %url, status = %response.status(), "management request failed");
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        decode(self.send(Method::GET, path, &[], NO_BODY).await?).await
    }

    /// POST/PUT whose response body is ignored
    async fn submit<B: Serialize>(&self, method: Method, path: &str, body: &B) -> Result<(), ApiError> {
        self.send(method, path, &[], Some(body)).await?;
        Ok(())
    }

    async fn submit_for<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        decode(self.send(method, path, &[], Some(body)).await?).await
    }

    async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, &[], NO_BODY).await?;
        Ok(())
    }
}

#[async_trait]
impl ManagementApi for ManagementClient {
    async fn list_catalogs(&self) -> Result<Catalogs, ApiError> {
        self.get(&path(&["catalogs"])).await
    }

    async fn create_catalog(&self, request: CreateCatalogRequest) -> Result<(), ApiError> {
        self.submit(Method::POST, &path(&["catalogs"]), &request)
            .await
    }

    async fn get_catalog(&self, catalog: &str) -> Result<Catalog, ApiError> {
        self.get(&path(&["catalogs", catalog])).await
    }

    async fn update_catalog(
        &self,
        catalog: &str,
        request: UpdateCatalogRequest,
    ) -> Result<Catalog, ApiError> {
        self.submit_for(Method::PUT, &path(&["catalogs", catalog]), &request)
            .await
    }

    async fn delete_catalog(&self, catalog: &str) -> Result<(), ApiError> {
        self.delete(&path(&["catalogs", catalog])).await
    }

    async fn list_principals(&self) -> Result<Principals, ApiError> {
        self.get(&path(&["principals"])).await
    }

    async fn create_principal(
        &self,
        request: CreatePrincipalRequest,
    ) -> Result<PrincipalWithCredentials, ApiError> {
        self.submit_for(Method::POST, &path(&["principals"]), &request)
            .await
    }

    async fn get_principal(&self, principal: &str) -> Result<Principal, ApiError> {
        self.get(&path(&["principals", principal])).await
    }

    async fn update_principal(
        &self,
        principal: &str,
        request: UpdatePrincipalRequest,
    ) -> Result<Principal, ApiError> {
        self.submit_for(Method::PUT, &path(&["principals", principal]), &request)
            .await
    }

    async fn delete_principal(&self, principal: &str) -> Result<(), ApiError> {
        self.delete(&path(&["principals", principal])).await
    }

    async fn rotate_credentials(
        &self,
        principal: &str,
    ) -> Result<PrincipalWithCredentials, ApiError> {
        let response = self
            .send(
                Method::POST,
                &path(&["principals", principal, "rotate"]),
                &[],
                NO_BODY,
            )
            .await?;
        decode(response).await
    }

    async fn list_principal_roles_assigned(
        &self,
        principal: &str,
    ) -> Result<PrincipalRoles, ApiError> {
        self.get(&path(&["principals", principal, "principal-roles"]))
            .await
    }

    async fn assign_principal_role(
        &self,
        principal: &str,
        request: GrantPrincipalRoleRequest,
    ) -> Result<(), ApiError> {
        self.submit(
            Method::PUT,
            &path(&["principals", principal, "principal-roles"]),
            &request,
        )
        .await
    }

    async fn revoke_principal_role(
        &self,
        principal: &str,
        principal_role: &str,
    ) -> Result<(), ApiError> {
        self.delete(&path(&[
            "principals",
            principal,
            "principal-roles",
            principal_role,
        ]))
        .await
    }

    async fn list_principal_roles(&self) -> Result<PrincipalRoles, ApiError> {
        self.get(&path(&["principal-roles"])).await
    }

    async fn create_principal_role(
        &self,
        request: CreatePrincipalRoleRequest,
    ) -> Result<(), ApiError> {
        self.submit(Method::POST, &path(&["principal-roles"]), &request)
            .await
    }

    async fn get_principal_role(&self, principal_role: &str) -> Result<PrincipalRole, ApiError> {
        self.get(&path(&["principal-roles", principal_role])).await
    }

    async fn update_principal_role(
        &self,
        principal_role: &str,
        request: UpdatePrincipalRoleRequest,
    ) -> Result<PrincipalRole, ApiError> {
        self.submit_for(
            Method::PUT,
            &path(&["principal-roles", principal_role]),
            &request,
        )
        .await
    }

    async fn delete_principal_role(&self, principal_role: &str) -> Result<(), ApiError> {
        self.delete(&path(&["principal-roles", principal_role]))
            .await
    }

    async fn list_assignee_principals_for_principal_role(
        &self,
        principal_role: &str,
    ) -> Result<Principals, ApiError> {
        self.get(&path(&["principal-roles", principal_role, "principals"]))
            .await
    }

    async fn list_catalog_roles_for_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
    ) -> Result<CatalogRoles, ApiError> {
        self.get(&path(&[
            "principal-roles",
            principal_role,
            "catalog-roles",
            catalog,
        ]))
        .await
    }

    async fn assign_catalog_role_to_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
        request: GrantCatalogRoleRequest,
    ) -> Result<(), ApiError> {
        self.submit(
            Method::PUT,
            &path(&["principal-roles", principal_role, "catalog-roles", catalog]),
            &request,
        )
        .await
    }

    async fn revoke_catalog_role_from_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<(), ApiError> {
        self.delete(&path(&[
            "principal-roles",
            principal_role,
            "catalog-roles",
            catalog,
            catalog_role,
        ]))
        .await
    }

    async fn list_catalog_roles(&self, catalog: &str) -> Result<CatalogRoles, ApiError> {
        self.get(&path(&["catalogs", catalog, "catalog-roles"]))
            .await
    }

    async fn create_catalog_role(
        &self,
        catalog: &str,
        request: CreateCatalogRoleRequest,
    ) -> Result<(), ApiError> {
        self.submit(
            Method::POST,
            &path(&["catalogs", catalog, "catalog-roles"]),
            &request,
        )
        .await
    }

    async fn get_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<CatalogRole, ApiError> {
        self.get(&path(&["catalogs", catalog, "catalog-roles", catalog_role]))
            .await
    }

    async fn update_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        request: UpdateCatalogRoleRequest,
    ) -> Result<CatalogRole, ApiError> {
        self.submit_for(
            Method::PUT,
            &path(&["catalogs", catalog, "catalog-roles", catalog_role]),
            &request,
        )
        .await
    }

    async fn delete_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<(), ApiError> {
        self.delete(&path(&["catalogs", catalog, "catalog-roles", catalog_role]))
            .await
    }

    async fn list_assignee_principal_roles_for_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<PrincipalRoles, ApiError> {
        self.get(&path(&[
            "catalogs",
            catalog,
            "catalog-roles",
            catalog_role,
            "principal-roles",
        ]))
        .await
    }

    async fn list_grants_for_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<GrantResources, ApiError> {
        self.get(&path(&[
            "catalogs",
            catalog,
            "catalog-roles",
            catalog_role,
            "grants",
        ]))
        .await
    }

    async fn add_grant_to_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        request: AddGrantRequest,
    ) -> Result<(), ApiError> {
        self.submit(
            Method::PUT,
            &path(&["catalogs", catalog, "catalog-roles", catalog_role, "grants"]),
            &request,
        )
        .await
    }

    async fn revoke_grant_from_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        cascade: bool,
        request: RevokeGrantRequest,
    ) -> Result<(), ApiError> {
        self.send(
            Method::POST,
            &path(&["catalogs", catalog, "catalog-roles", catalog_role, "grants"]),
            &[("cascade", cascade.to_string())],
            Some(&request),
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_encodes_segments() {
        assert_eq!(
            path(&["principal-roles", "data engineers"]),
            "/principal-roles/data%20engineers"
        );
        assert_eq!(path(&["catalogs", "a/b"]), "/catalogs/a%2Fb");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = ManagementClient::new("http://localhost:8181/", "t".into()).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8181/api/management/v1");
    }
}
