pub mod auth;
pub mod commands;
pub mod config;

use clap::{Parser, Subcommand};
use std::fmt;
use std::str::FromStr;

use crate::management::{CatalogType, Privilege, StorageType};

#[derive(Parser)]
#[command(name = "polaris")]
#[command(about = "Manage principals, roles, catalogs and grants on a Polaris catalog server")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags, accepted before or after the subcommand
#[derive(clap::Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Server base URL, e.g. https://polaris.example.com (instead of --host/--port)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Server host (default: localhost)
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Server port (default: 8181)
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// OAuth client ID (falls back to $CLIENT_ID when no --access-token is given)
    #[arg(long, global = true)]
    pub client_id: Option<String>,

    /// OAuth client secret (falls back to $CLIENT_SECRET when no --access-token is given)
    #[arg(long, global = true)]
    pub client_secret: Option<String>,

    /// Bearer token to use instead of client credentials
    #[arg(long, global = true)]
    pub access_token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write connection settings to .polaris.toml
    Init(InitArgs),
    /// Manage catalogs
    Catalogs(CatalogsArgs),
    /// Manage principals
    Principals(PrincipalsArgs),
    /// Manage principal roles
    PrincipalRoles(PrincipalRolesArgs),
    /// Manage catalog roles
    CatalogRoles(CatalogRolesArgs),
    /// Manage privileges granted to catalog roles
    Privileges(PrivilegesArgs),
    /// Manage namespaces in a catalog
    Namespaces(NamespacesArgs),
    /// Inspect tables in a catalog
    Tables(TablesArgs),
}

/// Parse a `key=value` property
pub fn parse_property(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Property must be in the form key=value, got '{}'", s)),
    }
}

/// Dot-separated namespace path, e.g. `db.sales`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespacePath(pub Vec<String>);

impl FromStr for NamespacePath {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<String> = s.split('.').map(str::to_string).collect();
        if parts.iter().any(|p| p.is_empty()) {
            return Err(format!("Invalid namespace '{}'", s));
        }
        Ok(NamespacePath(parts))
    }
}

impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

#[derive(clap::Args)]
pub struct InitArgs {
    /// Overwrite an existing config file
    #[arg(long)]
    pub force: bool,
}

// catalogs

#[derive(clap::Args)]
pub struct CatalogsArgs {
    #[command(subcommand)]
    pub command: CatalogsCommands,
}

#[derive(Subcommand)]
pub enum CatalogsCommands {
    /// Create a catalog
    Create(CatalogCreateArgs),
    /// Delete a catalog
    Delete { catalog: String },
    /// Show a catalog
    Get { catalog: String },
    /// List catalogs
    List,
    /// Update catalog properties
    Update(CatalogUpdateArgs),
}

#[derive(clap::Args)]
pub struct CatalogCreateArgs {
    /// Catalog name
    pub catalog: String,

    /// Catalog type: INTERNAL or EXTERNAL
    #[arg(long = "type", default_value = "INTERNAL")]
    pub catalog_type: CatalogType,

    /// Base location for new namespaces and tables
    #[arg(long)]
    pub default_base_location: Option<String>,

    /// Remote catalog URL (EXTERNAL catalogs)
    #[arg(long)]
    pub remote_url: Option<String>,

    #[command(flatten)]
    pub storage: StorageArgs,

    /// Catalog property as key=value (repeatable)
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

#[derive(clap::Args, Debug, Clone, Default, PartialEq)]
pub struct StorageArgs {
    /// Storage type: S3, GCS, AZURE or FILE
    #[arg(long)]
    pub storage_type: Option<StorageType>,

    /// Additional allowed location (repeatable)
    #[arg(long = "allowed-location")]
    pub allowed_locations: Vec<String>,

    /// IAM role to assume (S3)
    #[arg(long)]
    pub role_arn: Option<String>,

    /// External ID for the role trust policy (S3)
    #[arg(long)]
    pub external_id: Option<String>,

    /// IAM user ARN (S3)
    #[arg(long)]
    pub user_arn: Option<String>,

    /// Tenant ID (AZURE)
    #[arg(long)]
    pub tenant_id: Option<String>,

    /// Multi-tenant application name (AZURE)
    #[arg(long)]
    pub multi_tenant_app_name: Option<String>,

    /// Consent URL (AZURE)
    #[arg(long)]
    pub consent_url: Option<String>,

    /// Service account (GCS)
    #[arg(long)]
    pub service_account: Option<String>,
}

#[derive(clap::Args)]
pub struct CatalogUpdateArgs {
    /// Catalog name
    pub catalog: String,

    /// New default base location
    #[arg(long)]
    pub default_base_location: Option<String>,

    /// Catalog property as key=value (repeatable)
    #[arg(long = "property", value_parser = parse_property)]
    pub properties: Vec<(String, String)>,
}

// principals

#[derive(clap::Args)]
pub struct PrincipalsArgs {
    #[command(subcommand)]
    pub command: PrincipalsCommands,
}

#[derive(Subcommand)]
pub enum PrincipalsCommands {
    /// Create a principal and print its credentials
    Create {
        principal: String,
        /// Principal property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Delete a principal
    Delete { principal: String },
    /// Show a principal
    Get { principal: String },
    /// List principals, optionally only those holding a principal role
    List {
        #[arg(long)]
        principal_role: Option<String>,
    },
    /// Update principal properties
    Update {
        principal: String,
        /// Principal property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Issue new credentials for a principal
    RotateCredentials { principal: String },
}

// principal-roles

#[derive(clap::Args)]
pub struct PrincipalRolesArgs {
    #[command(subcommand)]
    pub command: PrincipalRolesCommands,
}

#[derive(Subcommand)]
pub enum PrincipalRolesCommands {
    /// Create a principal role
    Create {
        principal_role: String,
        /// Role property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Delete a principal role
    Delete { principal_role: String },
    /// Show a principal role
    Get { principal_role: String },
    /// List principal roles, optionally those of a principal or holding a catalog role
    List {
        #[arg(long)]
        principal: Option<String>,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        catalog_role: Option<String>,
    },
    /// Update principal role properties
    Update {
        principal_role: String,
        /// Role property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Grant a principal role to a principal
    Grant {
        principal_role: String,
        #[arg(long)]
        principal: Option<String>,
    },
    /// Revoke a principal role from a principal
    Revoke {
        principal_role: String,
        #[arg(long)]
        principal: Option<String>,
    },
}

// catalog-roles

#[derive(clap::Args)]
pub struct CatalogRolesArgs {
    #[command(subcommand)]
    pub command: CatalogRolesCommands,
}

#[derive(Subcommand)]
pub enum CatalogRolesCommands {
    /// Create a catalog role
    Create {
        catalog_role: String,
        #[arg(long)]
        catalog: Option<String>,
        /// Role property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Delete a catalog role
    Delete {
        catalog_role: String,
        #[arg(long)]
        catalog: Option<String>,
    },
    /// Show a catalog role
    Get {
        catalog_role: String,
        #[arg(long)]
        catalog: Option<String>,
    },
    /// List catalog roles, optionally only those granted to a principal role
    List {
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        principal_role: Option<String>,
    },
    /// Update catalog role properties
    Update {
        catalog_role: String,
        #[arg(long)]
        catalog: Option<String>,
        /// Role property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Grant a catalog role to a principal role
    Grant {
        catalog_role: String,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        principal_role: Option<String>,
    },
    /// Revoke a catalog role from a principal role
    Revoke {
        catalog_role: String,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        principal_role: Option<String>,
    },
}

// privileges

#[derive(clap::Args)]
pub struct PrivilegesArgs {
    #[command(subcommand)]
    pub command: PrivilegesCommands,
}

#[derive(Subcommand)]
pub enum PrivilegesCommands {
    /// List grants held by a catalog role
    List(PrivilegeListArgs),
    /// Catalog-level privileges
    Catalog(GrantArgs),
    /// Namespace-level privileges
    Namespace(GrantArgs),
    /// Table-level privileges
    Table(GrantArgs),
    /// View-level privileges
    View(GrantArgs),
}

#[derive(clap::Args)]
pub struct PrivilegeListArgs {
    #[arg(long)]
    pub catalog: Option<String>,
    #[arg(long)]
    pub catalog_role: Option<String>,
}

#[derive(clap::Args)]
pub struct GrantArgs {
    #[command(subcommand)]
    pub action: GrantAction,
}

#[derive(Subcommand)]
pub enum GrantAction {
    /// Grant a privilege to the catalog role
    Grant(GrantTargetArgs),
    /// Revoke a privilege from the catalog role
    Revoke(GrantTargetArgs),
}

#[derive(clap::Args, Debug, Clone, Default)]
pub struct GrantTargetArgs {
    /// Privilege name, e.g. TABLE_READ_DATA
    pub privilege: Option<Privilege>,
    #[arg(long)]
    pub catalog: Option<String>,
    #[arg(long)]
    pub catalog_role: Option<String>,
    /// Dot-separated namespace
    #[arg(long)]
    pub namespace: Option<NamespacePath>,
    #[arg(long)]
    pub table: Option<String>,
    #[arg(long)]
    pub view: Option<String>,
    /// Also revoke privileges that depend on this one
    #[arg(long)]
    pub cascade: bool,
}

// namespaces

#[derive(clap::Args)]
pub struct NamespacesArgs {
    #[command(subcommand)]
    pub command: NamespacesCommands,
}

#[derive(Subcommand)]
pub enum NamespacesCommands {
    /// Create a namespace
    Create {
        namespace: NamespacePath,
        #[arg(long)]
        catalog: Option<String>,
        /// Namespace location
        #[arg(long)]
        location: Option<String>,
        /// Namespace property as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
    },
    /// Delete an empty namespace
    Delete {
        namespace: NamespacePath,
        #[arg(long)]
        catalog: Option<String>,
    },
    /// Show a namespace and its properties
    Get {
        namespace: NamespacePath,
        #[arg(long)]
        catalog: Option<String>,
    },
    /// List namespaces
    List {
        #[arg(long)]
        catalog: Option<String>,
        /// Only list children of this namespace
        #[arg(long)]
        parent: Option<NamespacePath>,
    },
    /// Set or remove namespace properties
    Update {
        namespace: NamespacePath,
        #[arg(long)]
        catalog: Option<String>,
        /// Property to set as key=value (repeatable)
        #[arg(long = "property", value_parser = parse_property)]
        properties: Vec<(String, String)>,
        /// Property key to remove (repeatable)
        #[arg(long = "remove-property")]
        removals: Vec<String>,
    },
}

// tables

#[derive(clap::Args)]
pub struct TablesArgs {
    #[command(subcommand)]
    pub command: TablesCommands,
}

#[derive(Subcommand)]
pub enum TablesCommands {
    /// List tables in a namespace
    List {
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        namespace: Option<NamespacePath>,
    },
    /// Show table metadata
    Get {
        table: String,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        namespace: Option<NamespacePath>,
        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        summary: bool,
    },
    /// Drop a table
    Delete {
        table: String,
        #[arg(long)]
        catalog: Option<String>,
        #[arg(long)]
        namespace: Option<NamespacePath>,
        /// Also delete data and metadata files
        #[arg(long)]
        purge: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_property() {
        assert_eq!(
            parse_property("owner=data-eng").unwrap(),
            ("owner".to_string(), "data-eng".to_string())
        );
        assert_eq!(
            parse_property("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
        assert_eq!(
            parse_property("empty=").unwrap(),
            ("empty".to_string(), String::new())
        );
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=value").is_err());
    }

    #[test]
    fn test_namespace_path() {
        let ns: NamespacePath = "db.sales".parse().unwrap();
        assert_eq!(ns.0, vec!["db", "sales"]);
        assert_eq!(ns.to_string(), "db.sales");
        assert!("db..sales".parse::<NamespacePath>().is_err());
        assert!("".parse::<NamespacePath>().is_err());
    }

    #[test]
    fn test_parse_principal_roles_list() {
        let cli = Cli::try_parse_from([
            "polaris",
            "principal-roles",
            "list",
            "--principal",
            "alice",
        ])
        .unwrap();
        match cli.command {
            Commands::PrincipalRoles(args) => match args.command {
                PrincipalRolesCommands::List { principal, .. } => {
                    assert_eq!(principal.as_deref(), Some("alice"))
                }
                _ => panic!("expected list"),
            },
            _ => panic!("expected principal-roles"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "polaris",
            "catalogs",
            "list",
            "--host",
            "polaris.internal",
            "--port",
            "8282",
        ])
        .unwrap();
        assert_eq!(cli.connection.host.as_deref(), Some("polaris.internal"));
        assert_eq!(cli.connection.port, Some(8282));
    }

    #[test]
    fn test_privilege_parsed_from_cli() {
        let cli = Cli::try_parse_from([
            "polaris",
            "privileges",
            "table",
            "grant",
            "TABLE_READ_DATA",
            "--catalog",
            "quickstart",
            "--catalog-role",
            "reader",
            "--namespace",
            "db.sales",
            "--table",
            "orders",
        ])
        .unwrap();
        let Commands::Privileges(args) = cli.command else {
            panic!("expected privileges");
        };
        let PrivilegesCommands::Table(GrantArgs {
            action: GrantAction::Grant(target),
        }) = args.command
        else {
            panic!("expected table grant");
        };
        assert_eq!(target.privilege, Some(Privilege::TableReadData));
        assert_eq!(
            target.namespace,
            Some(NamespacePath(vec!["db".into(), "sales".into()]))
        );
    }

    #[test]
    fn test_malformed_property_rejected() {
        let result = Cli::try_parse_from([
            "polaris",
            "principal-roles",
            "create",
            "reader",
            "--property",
            "oops",
        ]);
        assert!(result.is_err());
    }
}
