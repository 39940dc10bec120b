use anyhow::Result;
use std::io::Write;

use super::{print_json, properties_from, require, Action, CommandError};
use crate::cli::{CatalogsCommands, StorageArgs};
use crate::management::{
    AwsStorageConfigInfo, AzureStorageConfigInfo, Catalog, CatalogProperties, CatalogType,
    CreateCatalogRequest, FileStorageConfigInfo, GcpStorageConfigInfo, ManagementApi, Properties,
    StorageConfigInfo, StorageType, UpdateCatalogRequest,
};

/// `polaris catalogs ...`
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogsCommand {
    pub action: Action,
    pub catalog_name: Option<String>,
    pub catalog_type: CatalogType,
    pub storage: StorageArgs,
    pub default_base_location: Option<String>,
    pub remote_url: Option<String>,
    pub properties: Option<Properties>,
}

impl CatalogsCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            catalog_name: None,
            catalog_type: CatalogType::Internal,
            storage: StorageArgs::default(),
            default_base_location: None,
            remote_url: None,
            properties: None,
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        match self.action {
            Action::List => Ok(()),
            Action::Create => {
                require(&self.catalog_name, self.action, "catalog")?;
                let storage_type = self.storage.storage_type.ok_or_else(|| {
                    CommandError::invalid("Missing required argument for create: --storage-type")
                })?;
                require(
                    &self.default_base_location,
                    self.action,
                    "--default-base-location",
                )?;
                validate_storage_flags(storage_type, &self.storage)?;
                match self.catalog_type {
                    CatalogType::External if self.remote_url.is_none() => Err(
                        CommandError::invalid("Missing required argument for create: --remote-url"),
                    ),
                    CatalogType::Internal if self.remote_url.is_some() => Err(
                        CommandError::invalid("--remote-url is only valid for EXTERNAL catalogs"),
                    ),
                    _ => Ok(()),
                }
            }
            Action::Delete | Action::Get | Action::Update => {
                require(&self.catalog_name, self.action, "catalog").map(|_| ())
            }
            Action::Grant | Action::Revoke | Action::RotateCredentials => {
                Err(CommandError::Unsupported {
                    resource: "catalogs",
                    action: self.action,
                })
            }
        }
    }

    pub async fn execute(&self, api: &dyn ManagementApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        match action {
            Action::Create => {
                let name = require(&self.catalog_name, action, "catalog")?;
                let request = CreateCatalogRequest {
                    catalog: self.build_catalog(name)?,
                };
                api.create_catalog(request).await?;
            }
            Action::Delete => {
                let name = require(&self.catalog_name, action, "catalog")?;
                api.delete_catalog(name).await?;
            }
            Action::Get => {
                let name = require(&self.catalog_name, action, "catalog")?;
                print_json(out, &api.get_catalog(name).await?)?;
            }
            Action::List => {
                for catalog in &api.list_catalogs().await?.catalogs {
                    print_json(out, catalog)?;
                }
            }
            Action::Update => {
                let name = require(&self.catalog_name, action, "catalog")?;
                let current = api.get_catalog(name).await?;

                let mut properties = current.properties.additional;
                properties.insert(
                    "default-base-location".to_string(),
                    self.default_base_location
                        .clone()
                        .unwrap_or(current.properties.default_base_location),
                );
                if let Some(updates) = &self.properties {
                    properties.extend(updates.clone());
                }

                let request = UpdateCatalogRequest {
                    current_entity_version: current.entity_version,
                    properties: Some(properties),
                    storage_config_info: None,
                };
                api.update_catalog(name, request).await?;
            }
            Action::Grant | Action::Revoke | Action::RotateCredentials => {
                return Err(CommandError::Unsupported {
                    resource: "catalogs",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }

    fn build_catalog(&self, name: &str) -> Result<Catalog, CommandError> {
        let base_location = require(
            &self.default_base_location,
            self.action,
            "--default-base-location",
        )?;
        let storage_type = self.storage.storage_type.ok_or_else(|| {
            CommandError::invalid("Missing required argument for create: --storage-type")
        })?;

        let mut allowed_locations = vec![base_location.to_string()];
        for location in &self.storage.allowed_locations {
            if !allowed_locations.contains(location) {
                allowed_locations.push(location.clone());
            }
        }

        let storage = &self.storage;
        let storage_config_info = match storage_type {
            StorageType::S3 => StorageConfigInfo::S3(AwsStorageConfigInfo {
                allowed_locations,
                role_arn: require(&storage.role_arn, self.action, "--role-arn")?.to_string(),
                external_id: storage.external_id.clone(),
                user_arn: storage.user_arn.clone(),
            }),
            StorageType::Gcs => StorageConfigInfo::Gcs(GcpStorageConfigInfo {
                allowed_locations,
                gcs_service_account: storage.service_account.clone(),
            }),
            StorageType::Azure => StorageConfigInfo::Azure(AzureStorageConfigInfo {
                allowed_locations,
                tenant_id: require(&storage.tenant_id, self.action, "--tenant-id")?.to_string(),
                multi_tenant_app_name: storage.multi_tenant_app_name.clone(),
                consent_url: storage.consent_url.clone(),
            }),
            StorageType::File => StorageConfigInfo::File(FileStorageConfigInfo { allowed_locations }),
        };

        Ok(Catalog {
            catalog_type: self.catalog_type,
            name: name.to_string(),
            properties: CatalogProperties {
                default_base_location: base_location.to_string(),
                additional: self.properties.clone().unwrap_or_default(),
            },
            remote_url: self.remote_url.clone(),
            create_timestamp: None,
            last_update_timestamp: None,
            entity_version: None,
            storage_config_info,
        })
    }
}

/// Reject flags that belong to a different storage type and require the
/// ones the chosen type cannot do without.
fn validate_storage_flags(storage_type: StorageType, storage: &StorageArgs) -> Result<(), CommandError> {
    let flags: [(&str, bool, StorageType); 7] = [
        ("--role-arn", storage.role_arn.is_some(), StorageType::S3),
        ("--external-id", storage.external_id.is_some(), StorageType::S3),
        ("--user-arn", storage.user_arn.is_some(), StorageType::S3),
        ("--tenant-id", storage.tenant_id.is_some(), StorageType::Azure),
        (
            "--multi-tenant-app-name",
            storage.multi_tenant_app_name.is_some(),
            StorageType::Azure,
        ),
        ("--consent-url", storage.consent_url.is_some(), StorageType::Azure),
        ("--service-account", storage.service_account.is_some(), StorageType::Gcs),
    ];
    for (flag, given, owner) in flags {
        if given && owner != storage_type {
            return Err(CommandError::invalid(format!(
                "Storage type '{}' does not support {}",
                storage_type, flag
            )));
        }
    }

    match storage_type {
        StorageType::S3 if storage.role_arn.is_none() => Err(CommandError::invalid(
            "Missing required argument for storage type 'S3': --role-arn",
        )),
        StorageType::Azure if storage.tenant_id.is_none() => Err(CommandError::invalid(
            "Missing required argument for storage type 'AZURE': --tenant-id",
        )),
        _ => Ok(()),
    }
}

impl From<CatalogsCommands> for CatalogsCommand {
    fn from(command: CatalogsCommands) -> Self {
        match command {
            CatalogsCommands::Create(args) => Self {
                catalog_name: Some(args.catalog),
                catalog_type: args.catalog_type,
                storage: args.storage,
                default_base_location: args.default_base_location,
                remote_url: args.remote_url,
                properties: properties_from(args.properties),
                ..Self::new(Action::Create)
            },
            CatalogsCommands::Delete { catalog } => Self {
                catalog_name: Some(catalog),
                ..Self::new(Action::Delete)
            },
            CatalogsCommands::Get { catalog } => Self {
                catalog_name: Some(catalog),
                ..Self::new(Action::Get)
            },
            CatalogsCommands::List => Self::new(Action::List),
            CatalogsCommands::Update(args) => Self {
                catalog_name: Some(args.catalog),
                default_base_location: args.default_base_location,
                properties: properties_from(args.properties),
                ..Self::new(Action::Update)
            },
        }
    }
}
