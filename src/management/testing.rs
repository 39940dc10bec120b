//! Recording [`ManagementApi`] used by command tests.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::sync::Mutex;

use super::api::ManagementApi;
use super::types::*;
use crate::error::ApiError;

pub const ENTITY_VERSION: i32 = 7;

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub args: Vec<String>,
    pub body: Option<Value>,
}

#[derive(Default)]
pub struct RecordingApi {
    calls: Mutex<Vec<Call>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// The single call made, panicking if there was not exactly one.
    pub fn only_call(&self) -> Call {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one call, got {:?}", calls);
        calls.into_iter().next().unwrap()
    }

    pub fn methods(&self) -> Vec<&'static str> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    fn record(&self, method: &'static str, args: &[&str]) {
        self.push(method, args, None);
    }

    fn record_body<B: Serialize>(&self, method: &'static str, args: &[&str], body: &B) {
        self.push(method, args, Some(serde_json::to_value(body).unwrap()));
    }

    fn push(&self, method: &'static str, args: &[&str], body: Option<Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            args: args.iter().map(|a| a.to_string()).collect(),
            body,
        });
    }
}

pub fn sample_catalog(name: &str) -> Catalog {
    Catalog {
        catalog_type: CatalogType::Internal,
        name: name.to_string(),
        properties: CatalogProperties {
            default_base_location: format!("file:///tmp/{}", name),
            additional: Properties::from([("owner".to_string(), "ops".to_string())]),
        },
        remote_url: None,
        create_timestamp: Some(1),
        last_update_timestamp: Some(1),
        entity_version: Some(ENTITY_VERSION),
        storage_config_info: StorageConfigInfo::File(FileStorageConfigInfo {
            allowed_locations: vec!["file:///tmp".to_string()],
        }),
    }
}

pub fn sample_principal(name: &str) -> Principal {
    Principal {
        name: name.to_string(),
        client_id: Some(format!("{}-id", name)),
        entity_version: Some(ENTITY_VERSION),
        ..Default::default()
    }
}

fn with_credentials(name: &str) -> PrincipalWithCredentials {
    PrincipalWithCredentials {
        principal: sample_principal(name),
        credentials: PrincipalCredentials {
            client_id: format!("{}-id", name),
            client_secret: format!("{}-secret", name),
        },
    }
}

fn principal_role(name: &str) -> PrincipalRole {
    PrincipalRole {
        entity_version: Some(ENTITY_VERSION),
        ..PrincipalRole::named(name)
    }
}

fn catalog_role(name: &str) -> CatalogRole {
    CatalogRole {
        entity_version: Some(ENTITY_VERSION),
        ..CatalogRole::named(name)
    }
}

#[async_trait]
impl ManagementApi for RecordingApi {
    async fn list_catalogs(&self) -> Result<Catalogs, ApiError> {
        self.record("list_catalogs", &[]);
        Ok(Catalogs {
            catalogs: vec![sample_catalog("first"), sample_catalog("second")],
        })
    }

    async fn create_catalog(&self, request: CreateCatalogRequest) -> Result<(), ApiError> {
        self.record_body("create_catalog", &[], &request);
        Ok(())
    }

    async fn get_catalog(&self, catalog: &str) -> Result<Catalog, ApiError> {
        self.record("get_catalog", &[catalog]);
        Ok(sample_catalog(catalog))
    }

    async fn update_catalog(
        &self,
        catalog: &str,
        request: UpdateCatalogRequest,
    ) -> Result<Catalog, ApiError> {
        self.record_body("update_catalog", &[catalog], &request);
        Ok(sample_catalog(catalog))
    }

    async fn delete_catalog(&self, catalog: &str) -> Result<(), ApiError> {
        self.record("delete_catalog", &[catalog]);
        Ok(())
    }

    async fn list_principals(&self) -> Result<Principals, ApiError> {
        self.record("list_principals", &[]);
        Ok(Principals {
            principals: vec![sample_principal("alice"), sample_principal("bob")],
        })
    }

    async fn create_principal(
        &self,
        request: CreatePrincipalRequest,
    ) -> Result<PrincipalWithCredentials, ApiError> {
        self.record_body("create_principal", &[], &request);
        Ok(with_credentials(&request.principal.name))
    }

    async fn get_principal(&self, principal: &str) -> Result<Principal, ApiError> {
        self.record("get_principal", &[principal]);
        Ok(sample_principal(principal))
    }

    async fn update_principal(
        &self,
        principal: &str,
        request: UpdatePrincipalRequest,
    ) -> Result<Principal, ApiError> {
        self.record_body("update_principal", &[principal], &request);
        Ok(sample_principal(principal))
    }

    async fn delete_principal(&self, principal: &str) -> Result<(), ApiError> {
        self.record("delete_principal", &[principal]);
        Ok(())
    }

    async fn rotate_credentials(
        &self,
        principal: &str,
    ) -> Result<PrincipalWithCredentials, ApiError> {
        self.record("rotate_credentials", &[principal]);
        Ok(with_credentials(principal))
    }

    async fn list_principal_roles_assigned(
        &self,
        principal: &str,
    ) -> Result<PrincipalRoles, ApiError> {
        self.record("list_principal_roles_assigned", &[principal]);
        Ok(PrincipalRoles {
            roles: vec![principal_role("assigned")],
        })
    }

    async fn assign_principal_role(
        &self,
        principal: &str,
        request: GrantPrincipalRoleRequest,
    ) -> Result<(), ApiError> {
        self.record_body("assign_principal_role", &[principal], &request);
        Ok(())
    }

    async fn revoke_principal_role(
        &self,
        principal: &str,
        principal_role: &str,
    ) -> Result<(), ApiError> {
        self.record("revoke_principal_role", &[principal, principal_role]);
        Ok(())
    }

    async fn list_principal_roles(&self) -> Result<PrincipalRoles, ApiError> {
        self.record("list_principal_roles", &[]);
        Ok(PrincipalRoles {
            roles: vec![principal_role("service_admin"), principal_role("reader")],
        })
    }

    async fn create_principal_role(
        &self,
        request: CreatePrincipalRoleRequest,
    ) -> Result<(), ApiError> {
        self.record_body("create_principal_role", &[], &request);
        Ok(())
    }

    async fn get_principal_role(&self, principal_role_name: &str) -> Result<PrincipalRole, ApiError> {
        self.record("get_principal_role", &[principal_role_name]);
        Ok(principal_role(principal_role_name))
    }

    async fn update_principal_role(
        &self,
        principal_role_name: &str,
        request: UpdatePrincipalRoleRequest,
    ) -> Result<PrincipalRole, ApiError> {
        self.record_body("update_principal_role", &[principal_role_name], &request);
        Ok(principal_role(principal_role_name))
    }

    async fn delete_principal_role(&self, principal_role: &str) -> Result<(), ApiError> {
        self.record("delete_principal_role", &[principal_role]);
        Ok(())
    }

    async fn list_assignee_principals_for_principal_role(
        &self,
        principal_role: &str,
    ) -> Result<Principals, ApiError> {
        self.record("list_assignee_principals_for_principal_role", &[principal_role]);
        Ok(Principals {
            principals: vec![sample_principal("carol")],
        })
    }

    async fn list_catalog_roles_for_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
    ) -> Result<CatalogRoles, ApiError> {
        self.record(
            "list_catalog_roles_for_principal_role",
            &[principal_role, catalog],
        );
        Ok(CatalogRoles {
            roles: vec![catalog_role("granted")],
        })
    }

    async fn assign_catalog_role_to_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
        request: GrantCatalogRoleRequest,
    ) -> Result<(), ApiError> {
        self.record_body(
            "assign_catalog_role_to_principal_role",
            &[principal_role, catalog],
            &request,
        );
        Ok(())
    }

    async fn revoke_catalog_role_from_principal_role(
        &self,
        principal_role: &str,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<(), ApiError> {
        self.record(
            "revoke_catalog_role_from_principal_role",
            &[principal_role, catalog, catalog_role],
        );
        Ok(())
    }

    async fn list_catalog_roles(&self, catalog: &str) -> Result<CatalogRoles, ApiError> {
        self.record("list_catalog_roles", &[catalog]);
        Ok(CatalogRoles {
            roles: vec![catalog_role("catalog_admin"), catalog_role("viewer")],
        })
    }

    async fn create_catalog_role(
        &self,
        catalog: &str,
        request: CreateCatalogRoleRequest,
    ) -> Result<(), ApiError> {
        self.record_body("create_catalog_role", &[catalog], &request);
        Ok(())
    }

    async fn get_catalog_role(
        &self,
        catalog: &str,
        catalog_role_name: &str,
    ) -> Result<CatalogRole, ApiError> {
        self.record("get_catalog_role", &[catalog, catalog_role_name]);
        Ok(catalog_role(catalog_role_name))
    }

    async fn update_catalog_role(
        &self,
        catalog: &str,
        catalog_role_name: &str,
        request: UpdateCatalogRoleRequest,
    ) -> Result<CatalogRole, ApiError> {
        self.record_body("update_catalog_role", &[catalog, catalog_role_name], &request);
        Ok(catalog_role(catalog_role_name))
    }

    async fn delete_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<(), ApiError> {
        self.record("delete_catalog_role", &[catalog, catalog_role]);
        Ok(())
    }

    async fn list_assignee_principal_roles_for_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<PrincipalRoles, ApiError> {
        self.record(
            "list_assignee_principal_roles_for_catalog_role",
            &[catalog, catalog_role],
        );
        Ok(PrincipalRoles {
            roles: vec![principal_role("holder")],
        })
    }

    async fn list_grants_for_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
    ) -> Result<GrantResources, ApiError> {
        self.record("list_grants_for_catalog_role", &[catalog, catalog_role]);
        Ok(GrantResources {
            grants: vec![
                GrantResource::Catalog {
                    privilege: Privilege::CatalogManageContent,
                },
                GrantResource::Namespace {
                    namespace: vec!["db".to_string()],
                    privilege: Privilege::TableList,
                },
            ],
        })
    }

    async fn add_grant_to_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        request: AddGrantRequest,
    ) -> Result<(), ApiError> {
        self.record_body("add_grant_to_catalog_role", &[catalog, catalog_role], &request);
        Ok(())
    }

    async fn revoke_grant_from_catalog_role(
        &self,
        catalog: &str,
        catalog_role: &str,
        cascade: bool,
        request: RevokeGrantRequest,
    ) -> Result<(), ApiError> {
        let cascade = cascade.to_string();
        self.record_body(
            "revoke_grant_from_catalog_role",
            &[catalog, catalog_role, &cascade],
            &request,
        );
        Ok(())
    }
}
