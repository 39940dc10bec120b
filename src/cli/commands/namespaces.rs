use anyhow::Result;
use std::io::Write;

use super::{print_json, properties_from, require, Action, CommandError};
use crate::catalog::{CatalogApi, CreateNamespaceRequest, UpdateNamespacePropertiesRequest};
use crate::cli::NamespacesCommands;
use crate::management::Properties;

/// `polaris namespaces ...`, served by the Iceberg REST catalog
#[derive(Debug, Clone, PartialEq)]
pub struct NamespacesCommand {
    pub action: Action,
    pub catalog_name: Option<String>,
    pub namespace: Option<Vec<String>>,
    pub parent: Option<Vec<String>>,
    pub location: Option<String>,
    pub properties: Option<Properties>,
    pub removals: Vec<String>,
}

impl NamespacesCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            catalog_name: None,
            namespace: None,
            parent: None,
            location: None,
            properties: None,
            removals: Vec::new(),
        }
    }

    fn namespace(&self) -> Result<&[String], CommandError> {
        self.namespace.as_deref().ok_or_else(|| {
            CommandError::invalid(format!(
                "Missing required argument for {}: namespace",
                self.action
            ))
        })
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        let action = self.action;
        require(&self.catalog_name, action, "--catalog")?;
        match action {
            Action::List => Ok(()),
            Action::Create | Action::Delete | Action::Get => self.namespace().map(|_| ()),
            Action::Update => {
                self.namespace()?;
                if self.properties.is_none() && self.removals.is_empty() {
                    return Err(CommandError::invalid(
                        "Provide at least one --property or --remove-property for update",
                    ));
                }
                Ok(())
            }
            Action::Grant | Action::Revoke | Action::RotateCredentials => {
                Err(CommandError::Unsupported {
                    resource: "namespaces",
                    action,
                })
            }
        }
    }

    pub async fn execute(&self, api: &dyn CatalogApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        match action {
            Action::Create => {
                let mut properties = self.properties.clone().unwrap_or_default();
                if let Some(location) = &self.location {
                    properties.insert("location".to_string(), location.clone());
                }
                let request = CreateNamespaceRequest {
                    namespace: self.namespace()?.to_vec(),
                    properties,
                };
                api.create_namespace(request).await?;
            }
            Action::Delete => {
                api.drop_namespace(self.namespace()?).await?;
            }
            Action::Get => {
                print_json(out, &api.load_namespace(self.namespace()?).await?)?;
            }
            Action::List => {
                for namespace in api.list_namespaces(self.parent.as_deref()).await? {
                    print_json(out, &serde_json::json!({ "namespace": namespace }))?;
                }
            }
            Action::Update => {
                let request = UpdateNamespacePropertiesRequest {
                    removals: self.removals.clone(),
                    updates: self.properties.clone().unwrap_or_default(),
                };
                let response = api
                    .update_namespace_properties(self.namespace()?, request)
                    .await?;
                if let Some(missing) = response.missing.filter(|m| !m.is_empty()) {
                    tracing::warn!(keys = ?missing, "properties to remove were not present");
                }
            }
            Action::Grant | Action::Revoke | Action::RotateCredentials => {
                return Err(CommandError::Unsupported {
                    resource: "namespaces",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }
}

impl From<NamespacesCommands> for NamespacesCommand {
    fn from(command: NamespacesCommands) -> Self {
        match command {
            NamespacesCommands::Create {
                namespace,
                catalog,
                location,
                properties,
            } => Self {
                catalog_name: catalog,
                namespace: Some(namespace.0),
                location,
                properties: properties_from(properties),
                ..Self::new(Action::Create)
            },
            NamespacesCommands::Delete { namespace, catalog } => Self {
                catalog_name: catalog,
                namespace: Some(namespace.0),
                ..Self::new(Action::Delete)
            },
            NamespacesCommands::Get { namespace, catalog } => Self {
                catalog_name: catalog,
                namespace: Some(namespace.0),
                ..Self::new(Action::Get)
            },
            NamespacesCommands::List { catalog, parent } => Self {
                catalog_name: catalog,
                parent: parent.map(|p| p.0),
                ..Self::new(Action::List)
            },
            NamespacesCommands::Update {
                namespace,
                catalog,
                properties,
                removals,
            } => Self {
                catalog_name: catalog,
                namespace: Some(namespace.0),
                properties: properties_from(properties),
                removals,
                ..Self::new(Action::Update)
            },
        }
    }
}
