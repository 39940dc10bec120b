use anyhow::Result;
use std::io::Write;

use super::{print_json, properties_from, require, Action, CommandError};
use crate::cli::CatalogRolesCommands;
use crate::management::{
    CatalogRole, CreateCatalogRoleRequest, GrantCatalogRoleRequest, ManagementApi, Properties,
    UpdateCatalogRoleRequest,
};

/// `polaris catalog-roles ...`
///
/// Every action is scoped to a catalog; grant and revoke attach the catalog
/// role to a principal role.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRolesCommand {
    pub action: Action,
    pub catalog_name: Option<String>,
    pub catalog_role_name: Option<String>,
    pub principal_role_name: Option<String>,
    pub properties: Option<Properties>,
}

impl CatalogRolesCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            catalog_name: None,
            catalog_role_name: None,
            principal_role_name: None,
            properties: None,
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        require(&self.catalog_name, self.action, "--catalog")?;
        match self.action {
            Action::Grant | Action::Revoke => {
                require(&self.principal_role_name, self.action, "--principal-role")?;
                require(&self.catalog_role_name, self.action, "catalog_role")?;
            }
            Action::Create | Action::Delete | Action::Get | Action::Update => {
                require(&self.catalog_role_name, self.action, "catalog_role")?;
            }
            Action::List => {}
            Action::RotateCredentials => {
                return Err(CommandError::Unsupported {
                    resource: "catalog-roles",
                    action: self.action,
                })
            }
        }
        Ok(())
    }

    pub async fn execute(&self, api: &dyn ManagementApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        let catalog = require(&self.catalog_name, action, "--catalog")?;
        match action {
            Action::Create => {
                let name = require(&self.catalog_role_name, action, "catalog_role")?;
                let request = CreateCatalogRoleRequest {
                    catalog_role: CatalogRole {
                        properties: self.properties.clone(),
                        ..CatalogRole::named(name)
                    },
                };
                api.create_catalog_role(catalog, request).await?;
            }
            Action::Delete => {
                let name = require(&self.catalog_role_name, action, "catalog_role")?;
                api.delete_catalog_role(catalog, name).await?;
            }
            Action::Get => {
                let name = require(&self.catalog_role_name, action, "catalog_role")?;
                print_json(out, &api.get_catalog_role(catalog, name).await?)?;
            }
            Action::List => {
                let roles = match &self.principal_role_name {
                    Some(principal_role) => {
                        api.list_catalog_roles_for_principal_role(principal_role, catalog)
                            .await?
                    }
                    None => api.list_catalog_roles(catalog).await?,
                };
                for role in &roles.roles {
                    print_json(out, role)?;
                }
            }
            Action::Update => {
                let name = require(&self.catalog_role_name, action, "catalog_role")?;
                let current = api.get_catalog_role(catalog, name).await?;
                let request = UpdateCatalogRoleRequest {
                    current_entity_version: current.entity_version,
                    properties: self.properties.clone(),
                };
                api.update_catalog_role(catalog, name, request).await?;
            }
            Action::Grant => {
                let principal_role = require(&self.principal_role_name, action, "--principal-role")?;
                let name = require(&self.catalog_role_name, action, "catalog_role")?;
                let request = GrantCatalogRoleRequest {
                    catalog_role: CatalogRole::named(name),
                };
                api.assign_catalog_role_to_principal_role(principal_role, catalog, request)
                    .await?;
            }
            Action::Revoke => {
                let principal_role = require(&self.principal_role_name, action, "--principal-role")?;
                let name = require(&self.catalog_role_name, action, "catalog_role")?;
                api.revoke_catalog_role_from_principal_role(principal_role, catalog, name)
                    .await?;
            }
            Action::RotateCredentials => {
                return Err(CommandError::Unsupported {
                    resource: "catalog-roles",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }
}

impl From<CatalogRolesCommands> for CatalogRolesCommand {
    fn from(command: CatalogRolesCommands) -> Self {
        match command {
            CatalogRolesCommands::Create {
                catalog_role,
                catalog,
                properties,
            } => Self {
                catalog_name: catalog,
                catalog_role_name: Some(catalog_role),
                properties: properties_from(properties),
                ..Self::new(Action::Create)
            },
            CatalogRolesCommands::Delete {
                catalog_role,
                catalog,
            } => Self {
                catalog_name: catalog,
                catalog_role_name: Some(catalog_role),
                ..Self::new(Action::Delete)
            },
            CatalogRolesCommands::Get {
                catalog_role,
                catalog,
            } => Self {
                catalog_name: catalog,
                catalog_role_name: Some(catalog_role),
                ..Self::new(Action::Get)
            },
            CatalogRolesCommands::List {
                catalog,
                principal_role,
            } => Self {
                catalog_name: catalog,
                principal_role_name: principal_role,
                ..Self::new(Action::List)
            },
            CatalogRolesCommands::Update {
                catalog_role,
                catalog,
                properties,
            } => Self {
                catalog_name: catalog,
                catalog_role_name: Some(catalog_role),
                properties: properties_from(properties),
                ..Self::new(Action::Update)
            },
            CatalogRolesCommands::Grant {
                catalog_role,
                catalog,
                principal_role,
            } => Self {
                catalog_name: catalog,
                catalog_role_name: Some(catalog_role),
                principal_role_name: principal_role,
                ..Self::new(Action::Grant)
            },
            CatalogRolesCommands::Revoke {
                catalog_role,
                catalog,
                principal_role,
            } => Self {
                catalog_name: catalog,
                catalog_role_name: Some(catalog_role),
                principal_role_name: principal_role,
                ..Self::new(Action::Revoke)
            },
        }
    }
}
