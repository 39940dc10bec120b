mod catalog_roles;
mod catalogs;
mod init;
mod namespaces;
mod principal_roles;
mod principals;
mod privileges;
mod tables;

pub use catalog_roles::CatalogRolesCommand;
pub use catalogs::CatalogsCommand;
pub use init::execute_init;
pub use namespaces::NamespacesCommand;
pub use principal_roles::PrincipalRolesCommand;
pub use principals::PrincipalsCommand;
pub use privileges::PrivilegesCommand;
pub use tables::TablesCommand;

use anyhow::{Context, Result};
use serde::Serialize;
use std::fmt;
use std::io::Write;
use tracing::debug;

use crate::catalog::IcebergClient;
use crate::cli::auth;
use crate::cli::config::Connection;
use crate::cli::Commands;
use crate::management::{ManagementClient, Properties};

/// Subcommand verbs shared by every resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Create,
    Delete,
    Get,
    List,
    Update,
    Grant,
    Revoke,
    RotateCredentials,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Delete => "delete",
            Action::Get => "get",
            Action::List => "list",
            Action::Update => "update",
            Action::Grant => "grant",
            Action::Revoke => "revoke",
            Action::RotateCredentials => "rotate-credentials",
        };
        f.write_str(name)
    }
}

/// Local failures raised before any request is sent
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    Invalid(String),
    #[error("{action} is not supported in the CLI for {resource}")]
    Unsupported {
        resource: &'static str,
        action: Action,
    },
}

impl CommandError {
    pub fn invalid(msg: impl Into<String>) -> Self {
        CommandError::Invalid(msg.into())
    }
}

/// Return the value of a required argument or a "Missing required argument" error
pub(crate) fn require<'a>(
    value: &'a Option<String>,
    action: Action,
    arg: &str,
) -> Result<&'a str, CommandError> {
    value.as_deref().ok_or_else(|| {
        CommandError::invalid(format!("Missing required argument for {}: {}", action, arg))
    })
}

/// Collect repeated `--property` pairs; `None` when no property was given
pub(crate) fn properties_from(pairs: Vec<(String, String)>) -> Option<Properties> {
    if pairs.is_empty() {
        None
    } else {
        Some(pairs.into_iter().collect())
    }
}

/// Print one record as a single line of compact JSON
pub(crate) fn print_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> Result<()> {
    let line = serde_json::to_string(value)?;
    writeln!(out, "{}", line)?;
    Ok(())
}

/// A parsed command, ready to validate and run
pub enum PolarisCommand {
    Catalogs(CatalogsCommand),
    Principals(PrincipalsCommand),
    PrincipalRoles(PrincipalRolesCommand),
    CatalogRoles(CatalogRolesCommand),
    Privileges(PrivilegesCommand),
    Namespaces(NamespacesCommand),
    Tables(TablesCommand),
}

impl PolarisCommand {
    /// Convert parsed arguments; `None` for `init`, which needs no server
    pub fn from_cli(command: Commands) -> Option<Self> {
        let command = match command {
            Commands::Init(_) => return None,
            Commands::Catalogs(args) => PolarisCommand::Catalogs(args.command.into()),
            Commands::Principals(args) => PolarisCommand::Principals(args.command.into()),
            Commands::PrincipalRoles(args) => PolarisCommand::PrincipalRoles(args.command.into()),
            Commands::CatalogRoles(args) => PolarisCommand::CatalogRoles(args.command.into()),
            Commands::Privileges(args) => PolarisCommand::Privileges(args.command.into()),
            Commands::Namespaces(args) => PolarisCommand::Namespaces(args.command.into()),
            Commands::Tables(args) => PolarisCommand::Tables(args.command.into()),
        };
        Some(command)
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        match self {
            PolarisCommand::Catalogs(cmd) => cmd.validate(),
            PolarisCommand::Principals(cmd) => cmd.validate(),
            PolarisCommand::PrincipalRoles(cmd) => cmd.validate(),
            PolarisCommand::CatalogRoles(cmd) => cmd.validate(),
            PolarisCommand::Privileges(cmd) => cmd.validate(),
            PolarisCommand::Namespaces(cmd) => cmd.validate(),
            PolarisCommand::Tables(cmd) => cmd.validate(),
        }
    }

    /// Validate, authenticate, then execute against the server
    pub async fn run(&self, connection: &Connection, out: &mut dyn Write) -> Result<()> {
        self.validate()?;

        let token = auth::resolve_token(connection).await?;
        debug!(base_url = %connection.base_url, "authenticated");

        match self {
            PolarisCommand::Namespaces(cmd) => {
                let catalog = catalog_client(connection, token, &cmd.catalog_name).await?;
                cmd.execute(&catalog, out).await
            }
            PolarisCommand::Tables(cmd) => {
                let catalog = catalog_client(connection, token, &cmd.catalog_name).await?;
                cmd.execute(&catalog, out).await
            }
            PolarisCommand::Catalogs(cmd) => {
                cmd.execute(&management_client(connection, token)?, out)
                    .await
            }
            PolarisCommand::Principals(cmd) => {
                cmd.execute(&management_client(connection, token)?, out)
                    .await
            }
            PolarisCommand::PrincipalRoles(cmd) => {
                cmd.execute(&management_client(connection, token)?, out)
                    .await
            }
            PolarisCommand::CatalogRoles(cmd) => {
                cmd.execute(&management_client(connection, token)?, out)
                    .await
            }
            PolarisCommand::Privileges(cmd) => {
                cmd.execute(&management_client(connection, token)?, out)
                    .await
            }
        }
    }
}

fn management_client(connection: &Connection, token: String) -> Result<ManagementClient> {
    ManagementClient::new(&connection.base_url, token).context("Failed to create HTTP client")
}

async fn catalog_client(
    connection: &Connection,
    token: String,
    catalog: &Option<String>,
) -> Result<IcebergClient> {
    let catalog = catalog
        .as_deref()
        .context("Missing required argument: --catalog")?;
    IcebergClient::connect(&connection.base_url, token, catalog.to_string())
        .await
        .with_context(|| format!("Failed to load config for catalog '{}'", catalog))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_display() {
        assert_eq!(Action::RotateCredentials.to_string(), "rotate-credentials");
        assert_eq!(Action::Grant.to_string(), "grant");
    }

    #[test]
    fn test_require_reports_argument() {
        let err = require(&None, Action::Grant, "--principal").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Missing required argument for grant: --principal"
        );
        assert_eq!(require(&Some("x".into()), Action::Grant, "--principal"), Ok("x"));
    }

    #[test]
    fn test_unsupported_message() {
        let err = CommandError::Unsupported {
            resource: "catalogs",
            action: Action::Grant,
        };
        assert_eq!(err.to_string(), "grant is not supported in the CLI for catalogs");
    }

    #[test]
    fn test_properties_from() {
        assert_eq!(properties_from(vec![]), None);
        let props = properties_from(vec![("a".into(), "1".into()), ("b".into(), "2".into())]).unwrap();
        assert_eq!(props.get("b").map(String::as_str), Some("2"));
    }

    #[test]
    fn test_print_json_writes_one_line() {
        let mut out = Vec::new();
        print_json(&mut out, &serde_json::json!({"name": "reader"})).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "{\"name\":\"reader\"}\n");
    }
}
