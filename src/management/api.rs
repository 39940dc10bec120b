use async_trait::async_trait;

use super::types::*;
use crate::error::ApiError;

/// Operations exposed by the Polaris management API.
///
/// Implemented over HTTP by [`super::ManagementClient`]; commands only depend on
/// this trait so they can be exercised without a server.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    // Catalogs
    async fn list_catalogs(&self) -> Result<Catalogs, ApiError>;
    async fn create_catalog(&self, request: CreateCatalogRequest) -> Result<(), ApiError>;
    async fn get_catalog(&self, catalog: &str) -> Result<Catalog, ApiError>;
    async fn update_catalog(
        &self,
        catalog: &str,
        request: UpdateCatalogRequest,
    ) -> Result<Catalog, ApiError>;
    async fn delete_catalog(&self, catalog: &str) -> Result<(), ApiError>;

    // Principals
    async fn list_principals(&self) -> Result<Principals, ApiError>;
    async fn create_principal(
        &self,
        request: CreatePrincipalRequest,
    ) -> Result<PrincipalWithCredentials, ApiError>;
    async fn get_principal(&self, principal: &str) -> Result<Principal, ApiError>;
    async fn update_principal(
        &self,
        principal: &str,
        request: UpdatePrincipalRequest,
    ) -> Result<Principal, ApiError>;
    async fn delete_principal(&self, principal: &str) -> Result<(), ApiError>;
    async fn rotate_credentials(&self, principal: &str)
        -> Result<PrincipalWithCredentials, ApiError>;
    async fn list_principal_roles_assigned(
        &self,
        principal: &str,
    ) -> Result<PrincipalRoles, ApiError>;
    async fn assign_principal_role(
        &self,
        principal: &str,
        request: GrantPrincipalRoleRequest,
    ) -> Result<(), ApiError>;
    async fn revoke_principal_role(
        &self,
        principal: &str,
        principal_role: &str,
    ) -> Result<(), ApiError>;

    // Principal roles
    async fn list_principal_roles(&self) -> Result<PrincipalRoles, ApiError>;
    async fn create_principal_role(
        &self,
        request: CreatePrincipalRoleRequest,
    ) -> Result<(), ApiError>;
    async fn get_principal_role(&self, principal_role: &str) -> Result<PrincipalRole, ApiError>;
    async fn update_principal_role(
        &self,
        principal_role: &str,
        request: UpdatePrincipalRoleRequest,
    ) -> Result<PrincipalRole, ApiError>;
    async fn delete_principal_role(&self, principal_role: &str) -> Result<(), ApiError>;
    async fn list_assignee_principals_for_principal_role(
        &self,
        principal_role: &str,
    ) -> Result<Principals, ApiError>;
    async fn list_catalog_roles_for_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
    ) -> Result<CatalogRoles, ApiError>;
    async fn assign_catalog_role_to_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
        request: GrantCatalogRoleRequest,
    ) -> Result<(), ApiError>;
    async fn revoke_catalog_role_from_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<(), ApiError>;

    // Catalog roles
    async fn list_catalog_roles(&self, catalog: &str) -> Result<CatalogRoles, ApiError>;
    async fn create_catalog_role(
        &self,
        catalog: &str,
        request: CreateCatalogRoleRequest,
    ) -> Result<(), ApiError>;
    async fn get_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<CatalogRole, ApiError>;
    async fn update_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        request: UpdateCatalogRoleRequest,
    ) -> Result<CatalogRole, ApiError>;
    async fn delete_catalog_role(&self, catalog: &str, catalog_role: &str)
        -> Result<(), ApiError>;
    async fn list_assignee_principal_roles_for_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<PrincipalRoles, ApiError>;

    // Grants
    async fn list_grants_for_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<GrantResources, ApiError>;
    async fn add_grant_to_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        request: AddGrantRequest,
    ) -> Result<(), ApiError>;
    async fn revoke_grant_from_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        cascade: bool,
        request: RevokeGrantRequest,
    ) -> Result<(), ApiError>;
}
