use anyhow::Result;
use std::io::Write;

use super::{print_json, require, Action, CommandError};
use crate::catalog::{CatalogApi, LoadTableResult};
use crate::cli::TablesCommands;

const FIELDS_SHOWN: usize = 4;

/// `polaris tables ...`, served by the Iceberg REST catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TablesCommand {
    pub action: Action,
    pub catalog_name: Option<String>,
    pub namespace: Option<Vec<String>>,
    pub table_name: Option<String>,
    pub summary: bool,
    pub purge: bool,
}

impl TablesCommand {
    fn new(action: Action) -> Self {
        Self {
            action,
            catalog_name: None,
            namespace: None,
            table_name: None,
            summary: false,
            purge: false,
        }
    }

    fn namespace(&self) -> Result<&[String], CommandError> {
        self.namespace.as_deref().ok_or_else(|| {
            CommandError::invalid(format!(
                "Missing required argument for {}: --namespace",
                self.action
            ))
        })
    }

    pub fn validate(&self) -> Result<(), CommandError> {
        let action = self.action;
        require(&self.catalog_name, action, "--catalog")?;
        match action {
            Action::List => self.namespace().map(|_| ()),
            Action::Get | Action::Delete => {
                self.namespace()?;
                require(&self.table_name, action, "table").map(|_| ())
            }
            _ => Err(CommandError::Unsupported {
                resource: "tables",
                action,
            }),
        }
    }

    pub async fn execute(&self, api: &dyn CatalogApi, out: &mut dyn Write) -> Result<()> {
        let action = self.action;
        let namespace = self.namespace()?;
        match action {
            Action::List => {
                for table in api.list_tables(namespace).await? {
                    print_json(out, &table)?;
                }
            }
            Action::Get => {
                let table = require(&self.table_name, action, "table")?;
                let loaded = api.load_table(namespace, table).await?;
                if self.summary {
                    write_summary(out, &namespace.join("."), table, &loaded)?;
                } else {
                    print_json(out, &loaded)?;
                }
            }
            Action::Delete => {
                let table = require(&self.table_name, action, "table")?;
                api.drop_table(namespace, table, self.purge).await?;
            }
            _ => {
                return Err(CommandError::Unsupported {
                    resource: "tables",
                    action,
                }
                .into())
            }
        }
        Ok(())
    }
}

fn write_summary(
    out: &mut dyn Write,
    namespace: &str,
    table: &str,
    loaded: &LoadTableResult,
) -> Result<()> {
    let metadata = &loaded.metadata;
    writeln!(out, "Table: {}.{}", namespace, table)?;

    if let Some(uuid) = &metadata.table_uuid {
        writeln!(out, "  UUID: {}", uuid)?;
    }
    if let Some(location) = &metadata.location {
        writeln!(out, "  Location: {}", location)?;
    }
    if let Some(metadata_location) = &loaded.metadata_location {
        writeln!(out, "  Metadata: {}", metadata_location)?;
    }
    if let Some(version) = metadata.format_version {
        writeln!(out, "  Format version: {}", version)?;
    }
    if let Some(schema_id) = metadata.current_schema_id {
        writeln!(out, "  Current schema ID: {}", schema_id)?;
    }

    let fields = metadata.field_names_preview(FIELDS_SHOWN);
    if !fields.is_empty() {
        writeln!(out, "  Fields: {}", fields)?;
    }

    let specs = metadata.format_partition_specs();
    if !specs.is_empty() {
        writeln!(out, "  Partition specs:")?;
        for spec in specs {
            writeln!(out, "    {}", spec)?;
        }
    }

    let orders = metadata.format_sort_orders();
    if !orders.is_empty() {
        writeln!(out, "  Sort orders:")?;
        for order in orders {
            writeln!(out, "    {}", order)?;
        }
    }

    writeln!(out, "  Current snapshot: {}", metadata.format_current_snapshot())?;
    writeln!(out, "  Snapshots: {}", metadata.snapshots.len())?;
    writeln!(out, "  Last updated: {}", metadata.format_last_updated())?;
    Ok(())
}

impl From<TablesCommands> for TablesCommand {
    fn from(command: TablesCommands) -> Self {
        match command {
            TablesCommands::List { catalog, namespace } => Self {
                catalog_name: catalog,
                namespace: namespace.map(|ns| ns.0),
                ..Self::new(Action::List)
            },
            TablesCommands::Get {
                table,
                catalog,
                namespace,
                summary,
            } => Self {
                catalog_name: catalog,
                namespace: namespace.map(|ns| ns.0),
                table_name: Some(table),
                summary,
                ..Self::new(Action::Get)
            },
            TablesCommands::Delete {
                table,
                catalog,
                namespace,
                purge,
            } => Self {
                catalog_name: catalog,
                namespace: namespace.map(|ns| ns.0),
                table_name: Some(table),
                purge,
                ..Self::new(Action::Delete)
            },
        }
    }
}
