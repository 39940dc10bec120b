use anyhow::Result;
use std::io::Write;

use super::{print_json, require, Action, CommandError};
use crate::cli::{GrantAction, GrantArgs, GrantTargetArgs, PrivilegesCommands};
use crate::management::{
    AddGrantRequest, GrantLevel, GrantResource, ManagementApi, Privilege, RevokeGrantRequest,
};

/// `polaris privileges ...`
///
/// `list` shows the grants a catalog role holds; `grant`/`revoke` carry a
/// level (catalog, namespace, table or view) that decides which securable
/// the privilege is attached to.
#[derive(Debug, Clone, PartialEq)]
pub struct PrivilegesCommand {
    pub action: Action,
    pub level: Option<GrantLevel>,
    pub catalog_name: Option<String>,
    pub catalog_role_name: Option<String>,
    pub namespace: Option<Vec<String>>,
    pub table_name: Option<String>,
    pub view_name: Option<String>,
    pub privilege: Option<Privilege>,
    pub cascade: bool,
}

impl PrivilegesCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            level: None,
            catalog_name: None,
            catalog_role_name: None,
            namespace: None,
            table_name: None,
            view_name: None,
            privilege: None,
            cascade: false,
        }
    }

    fn from_target(level: GrantLevel, action: GrantAction) -> Self {
        let (action, target) = match action {
            GrantAction::Grant(target) => (Action::Grant, target),
            GrantAction::Revoke(target) => (Action::Revoke, target),
        };
        let GrantTargetArgs {
            privilege,
            catalog,
            catalog_role,
            namespace,
            table,
            view,
            cascade,
        } = target;
        Self {
            level: Some(level),
            catalog_name: catalog,
            catalog_role_name: catalog_role,
            namespace: namespace.map(|ns| ns.0),
            table_name: table,
            view_name: view,
            privilege,
            cascade,
            ..Self::new(action)
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        let action = self.action;
        require(&self.catalog_name, action, "--catalog")?;
        require(&self.catalog_role_name, action, "--catalog-role")?;

        match action {
            Action::List => {
                if self.cascade {
                    return Err(CommandError::invalid("--cascade is only valid for revoke"));
                }
                Ok(())
            }
            Action::Grant | Action::Revoke => {
                if self.cascade && action != Action::Revoke {
                    return Err(CommandError::invalid("--cascade is only valid for revoke"));
                }
                let level = self.level.ok_or_else(|| {
                    CommandError::invalid(format!("Missing privilege level for {}", action))
                })?;
                let privilege = self.privilege.ok_or_else(|| {
                    CommandError::invalid(format!(
                        "Missing required argument for {}: privilege",
                        action
                    ))
                })?;
                if !privilege.applies_to(level) {
                    return Err(CommandError::invalid(format!(
                        "Privilege {} cannot be granted on a {}",
                        privilege, level
                    )));
                }
                self.validate_securable(level)
            }
            _ => Err(CommandError::Unsupported {
                resource: "privileges",
                action,
            }),
        }
    }

    fn validate_securable(&self, level: GrantLevel) -> Result<(), CommandError> {
        let action = self.action;
        let forbid = |given: bool, flag: &str| {
            if given {
                Err(CommandError::invalid(format!(
                    "{} is not valid for {} privileges",
                    flag, level
                )))
            } else {
                Ok(())
            }
        };
        let need = |given: bool, flag: &str| {
            if given {
                Ok(())
            } else {
                Err(CommandError::invalid(format!(
                    "Missing required argument for {}: {}",
                    action, flag
                )))
            }
        };

        let namespace = self.namespace.is_some();
        let table = self.table_name.is_some();
        let view = self.view_name.is_some();
        match level {
            GrantLevel::Catalog => {
                forbid(namespace, "--namespace")?;
                forbid(table, "--table")?;
                forbid(view, "--view")
            }
            GrantLevel::Namespace => {
                need(namespace, "--namespace")?;
                forbid(table, "--table")?;
                forbid(view, "--view")
            }
            GrantLevel::Table => {
                need(namespace, "--namespace")?;
                need(table, "--table")?;
                forbid(view, "--view")
            }
            GrantLevel::View => {
                need(namespace, "--namespace")?;
                need(view, "--view")?;
                forbid(table, "--table")
            }
        }
    }

    fn grant_resource(&self) -> Result<GrantResource, CommandError> {
        let action = self.action;
        let privilege = self.privilege.ok_or_else(|| {
            CommandError::invalid(format!("Missing required argument for {}: privilege", action))
        })?;
        let namespace = || {
            self.namespace.clone().ok_or_else(|| {
                CommandError::invalid(format!(
                    "Missing required argument for {}: --namespace",
                    action
                ))
            })
        };
        let resource = match self.level {
            Some(GrantLevel::Catalog) => GrantResource::Catalog { privilege },
            Some(GrantLevel::Namespace) => GrantResource::Namespace {
                namespace: namespace()?,
                privilege,
            },
            Some(GrantLevel::Table) => GrantResource::Table {
                namespace: namespace()?,
                table_name: require(&self.table_name, action, "--table")?.to_string(),
                privilege,
            },
            Some(GrantLevel::View) => GrantResource::View {
                namespace: namespace()?,
                view_name: require(&self.view_name, action, "--view")?.to_string(),
                privilege,
            },
            None => {
                return Err(CommandError::invalid(format!(
                    "Missing privilege level for {}",
                    action
                )))
            }
        };
        Ok(resource)
    }

    pub async fn execute(&self, api: &dyn ManagementApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        let catalog = require(&self.catalog_name, action, "--catalog")?;
        let catalog_role = require(&self.catalog_role_name, action, "--catalog-role")?;
        match action {
            Action::List => {
                let grants = api.list_grants_for_catalog_role(catalog, catalog_role).await?;
                for grant in &grants.grants {
                    print_json(out, grant)?;
                }
            }
            Action::Grant => {
                let request = AddGrantRequest {
                    grant: self.grant_resource()?,
                };
                api.add_grant_to_catalog_role(catalog, catalog_role, request)
                    .await?;
            }
            Action::Revoke => {
                let request = RevokeGrantRequest {
                    grant: self.grant_resource()?,
                };
                api.revoke_grant_from_catalog_role(catalog, catalog_role, self.cascade, request)
                    .await?;
            }
            _ => {
                return Err(CommandError::Unsupported {
                    resource: "privileges",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }
}

impl From<PrivilegesCommands> for PrivilegesCommand {
    fn from(command: PrivilegesCommands) -> Self {
        match command {
            PrivilegesCommands::List(args) => Self {
                catalog_name: args.catalog,
                catalog_role_name: args.catalog_role,
                ..Self::new(Action::List)
            },
            PrivilegesCommands::Catalog(GrantArgs { action }) => {
                Self::from_target(GrantLevel::Catalog, action)
            }
            PrivilegesCommands::Namespace(GrantArgs { action }) => {
                Self::from_target(GrantLevel::Namespace, action)
            }
            PrivilegesCommands::Table(GrantArgs { action }) => {
                Self::from_target(GrantLevel::Table, action)
            }
            PrivilegesCommands::View(GrantArgs { action }) => {
                Self::from_target(GrantLevel::View, action)
            }
        }
    }
}
