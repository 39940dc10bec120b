//! Polaris management API records.
//!
//! Field names follow the management API's camelCase JSON. Optional fields are
//! omitted on the wire when absent so printed records only show what the server
//! returned.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

pub type Properties = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CatalogType {
    Internal,
    External,
}

impl FromStr for CatalogType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INTERNAL" => Ok(CatalogType::Internal),
            "EXTERNAL" => Ok(CatalogType::External),
            other => Err(format!(
                "unknown catalog type '{}' (expected INTERNAL or EXTERNAL)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogProperties {
    #[serde(rename = "default-base-location")]
    pub default_base_location: String,
    #[serde(flatten)]
    pub additional: Properties,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageType {
    S3,
    Gcs,
    Azure,
    File,
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StorageType::S3 => "S3",
            StorageType::Gcs => "GCS",
            StorageType::Azure => "AZURE",
            StorageType::File => "FILE",
        };
        f.write_str(name)
    }
}

impl FromStr for StorageType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "S3" => Ok(StorageType::S3),
            "GCS" => Ok(StorageType::Gcs),
            "AZURE" => Ok(StorageType::Azure),
            "FILE" => Ok(StorageType::File),
            other => Err(format!(
                "unknown storage type '{}' (expected S3, GCS, AZURE or FILE)",
                other
            )),
        }
    }
}

/// Storage configuration, tagged by `storageType`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "storageType", rename_all = "UPPERCASE")]
pub enum StorageConfigInfo {
    S3(AwsStorageConfigInfo),
    Gcs(GcpStorageConfigInfo),
    Azure(AzureStorageConfigInfo),
    File(FileStorageConfigInfo),
}

impl StorageConfigInfo {
    pub fn storage_type(&self) -> StorageType {
        match self {
            StorageConfigInfo::S3(_) => StorageType::S3,
            StorageConfigInfo::Gcs(_) => StorageType::Gcs,
            StorageConfigInfo::Azure(_) => StorageType::Azure,
            StorageConfigInfo::File(_) => StorageType::File,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwsStorageConfigInfo {
    #[serde(default)]
    pub allowed_locations: Vec<String>,
    pub role_arn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_arn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GcpStorageConfigInfo {
    #[serde(default)]
    pub allowed_locations: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gcs_service_account: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzureStorageConfigInfo {
    #[serde(default)]
    pub allowed_locations: Vec<String>,
    pub tenant_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_tenant_app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStorageConfigInfo {
    #[serde(default)]
    pub allowed_locations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Catalog {
    #[serde(rename = "type")]
    pub catalog_type: CatalogType,
    pub name: String,
    pub properties: CatalogProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remote_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i32>,
    pub storage_config_info: StorageConfigInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Principal {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Returned by principal creation and credential rotation; the secret is only
/// ever shown here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrincipalWithCredentials {
    pub principal: Principal,
    pub credentials: PrincipalCredentials,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrincipalRole {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i32>,
}

impl PrincipalRole {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRole {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_timestamp: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_version: Option<i32>,
}

impl CatalogRole {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

// List envelopes

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalogs {
    #[serde(default)]
    pub catalogs: Vec<Catalog>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Principals {
    #[serde(default)]
    pub principals: Vec<Principal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrincipalRoles {
    #[serde(default)]
    pub roles: Vec<PrincipalRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRoles {
    #[serde(default)]
    pub roles: Vec<CatalogRole>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GrantResources {
    #[serde(default)]
    pub grants: Vec<GrantResource>,
}

// Requests

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateCatalogRequest {
    pub catalog: Catalog,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogRequest {
    pub current_entity_version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_config_info: Option<StorageConfigInfo>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrincipalRequest {
    pub principal: Principal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_rotation_required: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrincipalRequest {
    pub current_entity_version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrincipalRoleRequest {
    pub principal_role: PrincipalRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrincipalRoleRequest {
    pub current_entity_version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCatalogRoleRequest {
    pub catalog_role: CatalogRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCatalogRoleRequest {
    pub current_entity_version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantPrincipalRoleRequest {
    pub principal_role: PrincipalRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantCatalogRoleRequest {
    pub catalog_role: CatalogRole,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddGrantRequest {
    pub grant: GrantResource,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevokeGrantRequest {
    pub grant: GrantResource,
}

// Grants

/// The kind of securable a grant is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrantLevel {
    Catalog,
    Namespace,
    Table,
    View,
}

impl fmt::Display for GrantLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GrantLevel::Catalog => "catalog",
            GrantLevel::Namespace => "namespace",
            GrantLevel::Table => "table",
            GrantLevel::View => "view",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GrantResource {
    Catalog {
        privilege: Privilege,
    },
    Namespace {
        namespace: Vec<String>,
        privilege: Privilege,
    },
    Table {
        namespace: Vec<String>,
        #[serde(rename = "tableName")]
        table_name: String,
        privilege: Privilege,
    },
    View {
        namespace: Vec<String>,
        #[serde(rename = "viewName")]
        view_name: String,
        privilege: Privilege,
    },
}

impl GrantResource {
    pub fn level(&self) -> GrantLevel {
        match self {
            GrantResource::Catalog { .. } => GrantLevel::Catalog,
            GrantResource::Namespace { .. } => GrantLevel::Namespace,
            GrantResource::Table { .. } => GrantLevel::Table,
            GrantResource::View { .. } => GrantLevel::View,
        }
    }

    pub fn privilege(&self) -> Privilege {
        match self {
            GrantResource::Catalog { privilege }
            | GrantResource::Namespace { privilege, .. }
            | GrantResource::Table { privilege, .. }
            | GrantResource::View { privilege, .. } => *privilege,
        }
    }
}

macro_rules! privileges {
    ($($variant:ident => $name:literal),+ $(,)?) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Privilege {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Privilege {
            pub const ALL: &'static [Privilege] = &[$(Privilege::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Privilege::$variant => $name,)+
                }
            }
        }
    };
}

privileges! {
    CatalogManageAccess => "CATALOG_MANAGE_ACCESS",
    CatalogManageContent => "CATALOG_MANAGE_CONTENT",
    CatalogManageMetadata => "CATALOG_MANAGE_METADATA",
    CatalogReadProperties => "CATALOG_READ_PROPERTIES",
    CatalogWriteProperties => "CATALOG_WRITE_PROPERTIES",
    NamespaceCreate => "NAMESPACE_CREATE",
    NamespaceDrop => "NAMESPACE_DROP",
    NamespaceList => "NAMESPACE_LIST",
    NamespaceReadProperties => "NAMESPACE_READ_PROPERTIES",
    NamespaceWriteProperties => "NAMESPACE_WRITE_PROPERTIES",
    NamespaceFullMetadata => "NAMESPACE_FULL_METADATA",
    TableCreate => "TABLE_CREATE",
    TableDrop => "TABLE_DROP",
    TableList => "TABLE_LIST",
    TableReadProperties => "TABLE_READ_PROPERTIES",
    TableWriteProperties => "TABLE_WRITE_PROPERTIES",
    TableReadData => "TABLE_READ_DATA",
    TableWriteData => "TABLE_WRITE_DATA",
    TableFullMetadata => "TABLE_FULL_METADATA",
    ViewCreate => "VIEW_CREATE",
    ViewDrop => "VIEW_DROP",
    ViewList => "VIEW_LIST",
    ViewReadProperties => "VIEW_READ_PROPERTIES",
    ViewWriteProperties => "VIEW_WRITE_PROPERTIES",
    ViewFullMetadata => "VIEW_FULL_METADATA",
}

impl Privilege {
    /// Whether this privilege may be granted on a securable of the given level.
    /// Anything grantable on a child may also be granted on its parents.
    pub fn applies_to(&self, level: GrantLevel) -> bool {
        use Privilege::*;
        match level {
            GrantLevel::Catalog => true,
            GrantLevel::Namespace => !matches!(
                self,
                CatalogManageAccess
                    | CatalogManageContent
                    | CatalogManageMetadata
                    | CatalogReadProperties
                    | CatalogWriteProperties
            ),
            GrantLevel::Table => matches!(
                self,
                TableDrop
                    | TableList
                    | TableReadProperties
                    | TableWriteProperties
                    | TableReadData
                    | TableWriteData
                    | TableFullMetadata
            ),
            GrantLevel::View => matches!(
                self,
                ViewDrop | ViewList | ViewReadProperties | ViewWriteProperties | ViewFullMetadata
            ),
        }
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Privilege {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.replace('-', "_");
        Privilege::ALL
            .iter()
            .copied()
            .find(|p| p.as_str().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("unknown privilege '{}'", s))
    }
}
