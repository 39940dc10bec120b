use anyhow::Result;
use std::io::Write;

use super::{print_json, properties_from, require, Action, CommandError};
use crate::cli::PrincipalsCommands;
use crate::management::{
    CreatePrincipalRequest, ManagementApi, Principal, Properties, UpdatePrincipalRequest,
};

/// `polaris principals ...`
///
/// `create` and `rotate-credentials` print the returned credentials; the
/// client secret is not retrievable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct PrincipalsCommand {
    pub action: Action,
    pub principal_name: Option<String>,
    pub principal_role_name: Option<String>,
    pub properties: Option<Properties>,
}

impl PrincipalsCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            principal_name: None,
            principal_role_name: None,
            properties: None,
        }
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        match self.action {
            Action::List => Ok(()),
            Action::Grant | Action::Revoke => Err(CommandError::Unsupported {
                resource: "principals",
                action: self.action,
            }),
            _ => require(&self.principal_name, self.action, "principal").map(|_| ()),
        }
    }

    pub async fn execute(&self, api: &dyn ManagementApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        match action {
            Action::Create => {
                let name = require(&self.principal_name, action, "principal")?;
                let request = CreatePrincipalRequest {
                    principal: Principal {
                        name: name.to_string(),
                        properties: self.properties.clone(),
                        ..Default::default()
                    },
                    credential_rotation_required: None,
                };
                print_json(out, &api.create_principal(request).await?)?;
            }
            Action::Delete => {
                let name = require(&self.principal_name, action, "principal")?;
                api.delete_principal(name).await?;
            }
            Action::Get => {
                let name = require(&self.principal_name, action, "principal")?;
                print_json(out, &api.get_principal(name).await?)?;
            }
            Action::List => {
                let principals = match &self.principal_role_name {
                    Some(role) => api.list_assignee_principals_for_principal_role(role).await?,
                    None => api.list_principals().await?,
                };
                for principal in &principals.principals {
                    print_json(out, principal)?;
                }
            }
            Action::Update => {
                let name = require(&self.principal_name, action, "principal")?;
                let current = api.get_principal(name).await?;
                let request = UpdatePrincipalRequest {
                    current_entity_version: current.entity_version,
                    properties: self.properties.clone(),
                };
                api.update_principal(name, request).await?;
            }
            Action::RotateCredentials => {
                let name = require(&self.principal_name, action, "principal")?;
                print_json(out, &api.rotate_credentials(name).await?)?;
            }
            Action::Grant | Action::Revoke => {
                return Err(CommandError::Unsupported {
                    resource: "principals",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }
}

impl From<PrincipalsCommands> for PrincipalsCommand {
    fn from(command: PrincipalsCommands) -> Self {
        match command {
            PrincipalsCommands::Create {
                principal,
                properties,
            } => Self {
                principal_name: Some(principal),
                properties: properties_from(properties),
                ..Self::new(Action::Create)
            },
            PrincipalsCommands::Delete { principal } => Self {
                principal_name: Some(principal),
                ..Self::new(Action::Delete)
            },
            PrincipalsCommands::Get { principal } => Self {
                principal_name: Some(principal),
                ..Self::new(Action::Get)
            },
            PrincipalsCommands::List { principal_role } => Self {
                principal_role_name: principal_role,
                ..Self::new(Action::List)
            },
            PrincipalsCommands::Update {
                principal,
                properties,
            } => Self {
                principal_name: Some(principal),
                properties: properties_from(properties),
                ..Self::new(Action::Update)
            },
            PrincipalsCommands::RotateCredentials { principal } => Self {
                principal_name: Some(principal),
                ..Self::new(Action::RotateCredentials)
            },
        }
    }
}
