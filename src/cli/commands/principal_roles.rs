use anyhow::Result;
use std::io::Write;

use super::{print_json, properties_from, require, Action, CommandError};
use crate::cli::PrincipalRolesCommands;
use crate::management::{
    CreatePrincipalRoleRequest, GrantPrincipalRoleRequest, ManagementApi, PrincipalRole,
    Properties, UpdatePrincipalRoleRequest,
};

/// `polaris principal-roles ...`
///
/// Examples:
///   polaris principal-roles create user_role
///   polaris principal-roles list --principal user
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalRolesCommand {
    pub action: Action,
    pub principal_role_name: Option<String>,
    pub principal_name: Option<String>,
    pub catalog_name: Option<String>,
    pub catalog_role_name: Option<String>,
    pub properties: Option<Properties>,
}

impl PrincipalRolesCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            principal_role_name: None,
            principal_name: None,
            catalog_name: None,
            catalog_role_name: None,
            properties: None,
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        match self.action {
            Action::List => {
                if self.principal_name.is_some() && self.catalog_role_name.is_some() {
                    return Err(CommandError::invalid(
                        "You may provide either --principal or --catalog-role, but not both",
                    ));
                }
                if self.catalog_role_name.is_some() {
                    require(&self.catalog_name, self.action, "--catalog")?;
                }
            }
            Action::Grant | Action::Revoke => {
                require(&self.principal_name, self.action, "--principal")?;
                require(&self.principal_role_name, self.action, "principal_role")?;
            }
            Action::Create | Action::Delete | Action::Get | Action::Update => {
                require(&self.principal_role_name, self.action, "principal_role")?;
            }
            Action::RotateCredentials => {
                return Err(CommandError::Unsupported {
                    resource: "principal-roles",
                    action: self.action,
                })
            }
        }
        Ok(())
    }

    pub async fn execute(&self, api: &dyn ManagementApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        match action {
            Action::Create => {
                let name = require(&self.principal_role_name, action, "principal_role")?;
                let request = CreatePrincipalRoleRequest {
                    principal_role: PrincipalRole {
                        properties: self.properties.clone(),
                        ..PrincipalRole::named(name)
                    },
                };
                api.create_principal_role(request).await?;
            }
            Action::Delete => {
                let name = require(&self.principal_role_name, action, "principal_role")?;
                api.delete_principal_role(name).await?;
            }
            Action::Get => {
                let name = require(&self.principal_role_name, action, "principal_role")?;
                print_json(out, &api.get_principal_role(name).await?)?;
            }
            Action::List => {
                let roles = if let Some(catalog_role) = &self.catalog_role_name {
                    let catalog = require(&self.catalog_name, action, "--catalog")?;
                    api.list_assignee_principal_roles_for_catalog_role(catalog, catalog_role)
                        .await?
                } else if let Some(principal) = &self.principal_name {
                    api.list_principal_roles_assigned(principal).await?
                } else {
                    api.list_principal_roles().await?
                };
                for role in &roles.roles {
                    print_json(out, role)?;
                }
            }
            Action::Update => {
                let name = require(&self.principal_role_name, action, "principal_role")?;
                let current = api.get_principal_role(name).await?;
                let request = UpdatePrincipalRoleRequest {
                    current_entity_version: current.entity_version,
                    properties: self.properties.clone(),
                };
                api.update_principal_role(name, request).await?;
            }
            Action::Grant => {
                let principal = require(&self.principal_name, action, "--principal")?;
                let name = require(&self.principal_role_name, action, "principal_role")?;
                let request = GrantPrincipalRoleRequest {
                    principal_role: PrincipalRole::named(name),
                };
                api.assign_principal_role(principal, request).await?;
            }
            Action::Revoke => {
                let principal = require(&self.principal_name, action, "--principal")?;
                let name = require(&self.principal_role_name, action, "principal_role")?;
                api.revoke_principal_role(principal, name).await?;
            }
            Action::RotateCredentials => {
                return Err(CommandError::Unsupported {
                    resource: "principal-roles",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }
}

impl From<PrincipalRolesCommands> for PrincipalRolesCommand {
    fn from(command: PrincipalRolesCommands) -> Self {
        match command {
            PrincipalRolesCommands::Create {
                principal_role,
                properties,
            } => Self {
                principal_role_name: Some(principal_role),
                properties: properties_from(properties),
                ..Self::new(Action::Create)
            },
            PrincipalRolesCommands::Delete { principal_role } => Self {
                principal_role_name: Some(principal_role),
                ..Self::new(Action::Delete)
            },
            PrincipalRolesCommands::Get { principal_role } => Self {
                principal_role_name: Some(principal_role),
                ..Self::new(Action::Get)
            },
            PrincipalRolesCommands::List {
                principal,
                catalog,
                catalog_role,
            } => Self {
                principal_name: principal,
                catalog_name: catalog,
                catalog_role_name: catalog_role,
                ..Self::new(Action::List)
            },
            PrincipalRolesCommands::Update {
                principal_role,
                properties,
            } => Self {
                principal_role_name: Some(principal_role),
                properties: properties_from(properties),
                ..Self::new(Action::Update)
            },
            PrincipalRolesCommands::Grant {
                principal_role,
                principal,
            } => Self {
                principal_role_name: Some(principal_role),
                principal_name: principal,
                ..Self::new(Action::Grant)
            },
            PrincipalRolesCommands::Revoke {
                principal_role,
                principal,
            } => Self {
                principal_role_name: Some(principal_role),
                principal_name: principal,
                ..Self::new(Action::Revoke)
            },
        }
    }
}
