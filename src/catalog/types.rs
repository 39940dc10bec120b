//! Iceberg REST Catalog API types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::management::Properties;

/// Response from the Iceberg catalog config endpoint
#[derive(Debug, Default, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub defaults: BTreeMap<String, String>,
    #[serde(default)]
    pub overrides: BTreeMap<String, String>,
}

impl CatalogConfig {
    /// Warehouse prefix the server wants in every catalog path
    pub fn prefix(&self) -> Option<&str> {
        self.overrides
            .get("prefix")
            .or_else(|| self.defaults.get("prefix"))
            .map(String::as_str)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListNamespacesResponse {
    #[serde(default)]
    pub namespaces: Vec<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateNamespaceRequest {
    pub namespace: Vec<String>,
    #[serde(skip_serializing_if = "Properties::is_empty", default)]
    pub properties: Properties,
}

/// Returned by create and load namespace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamespaceResponse {
    pub namespace: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNamespacePropertiesRequest {
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub removals: Vec<String>,
    #[serde(skip_serializing_if = "Properties::is_empty", default)]
    pub updates: Properties,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNamespacePropertiesResponse {
    #[serde(default)]
    pub updated: Vec<String>,
    #[serde(default)]
    pub removed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableIdentifier {
    pub namespace: Vec<String>,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ListTablesResponse {
    #[serde(default)]
    pub identifiers: Vec<TableIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Table metadata from Iceberg REST API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct LoadTableResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata_location: Option<String>,
    pub metadata: TableMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_version: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_ms: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, String>,
    #[serde(default)]
    pub schemas: Vec<Schema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_schema_id: Option<i32>,
    #[serde(default)]
    pub partition_specs: Vec<PartitionSpec>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_spec_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_partition_id: Option<i32>,
    #[serde(default)]
    pub sort_orders: Vec<SortOrder>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort_order_id: Option<i32>,
    #[serde(default)]
    pub snapshots: Vec<Snapshot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_snapshot_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Schema {
    pub schema_id: i32,
    #[serde(default)]
    pub fields: Vec<SchemaField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaField {
    pub id: i32,
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: serde_json::Value,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartitionSpec {
    pub spec_id: i32,
    #[serde(default)]
    pub fields: Vec<PartitionField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PartitionField {
    pub source_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_id: Option<i32>,
    pub name: String,
    pub transform: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SortOrder {
    pub order_id: i32,
    #[serde(default)]
    pub fields: Vec<SortField>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SortField {
    pub source_id: i32,
    pub transform: String,
    pub direction: String,
    pub null_order: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Snapshot {
    pub snapshot_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_snapshot_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sequence_number: Option<i64>,
    pub timestamp_ms: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_list: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub summary: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema_id: Option<i32>,
}

impl TableMetadata {
    /// Get the current schema
    fn current_schema(&self) -> Option<&Schema> {
        let current_id = self.current_schema_id.unwrap_or(0);
        self.schemas.iter().find(|s| s.schema_id == current_id)
    }

    fn current_snapshot(&self) -> Option<&Snapshot> {
        let current_id = self.current_snapshot_id?;
        self.snapshots.iter().find(|s| s.snapshot_id == current_id)
    }

    /// Get field names as comma-separated preview
    pub fn field_names_preview(&self, max_shown: usize) -> String {
        let Some(schema) = self.current_schema() else {
            return String::new();
        };

        let total = schema.fields.len();
        let names: Vec<&str> = schema
            .fields
            .iter()
            .take(max_shown)
            .map(|f| f.name.as_str())
            .collect();

        if total > max_shown {
            format!("{}, ... ({} total)", names.join(", "), total)
        } else {
            names.join(", ")
        }
    }

    /// Resolve a source field id to its name in the current schema
    fn field_name(&self, source_id: i32) -> String {
        self.current_schema()
            .and_then(|schema| schema.fields.iter().find(|f| f.id == source_id))
            .map(|f| f.name.clone())
            .unwrap_or_else(|| format!("#{}", source_id))
    }

    /// Format partition specs for display
    pub fn format_partition_specs(&self) -> Vec<String> {
        let default_id = self.default_spec_id.unwrap_or(0);

        self.partition_specs
            .iter()
            .map(|spec| {
                let default_marker = if spec.spec_id == default_id {
                    " (default)"
                } else {
                    ""
                };

                if spec.fields.is_empty() {
                    format!(
                        "spec-id: {}{} - unpartitioned",
                        spec.spec_id, default_marker
                    )
                } else {
                    let transforms: Vec<String> = spec
                        .fields
                        .iter()
                        .map(|f| format!("{}({})", f.transform, f.name))
                        .collect();
                    format!(
                        "spec-id: {}{} - {}",
                        spec.spec_id,
                        default_marker,
                        transforms.join(", ")
                    )
                }
            })
            .collect()
    }

    /// Format sort orders for display
    pub fn format_sort_orders(&self) -> Vec<String> {
        let default_id = self.default_sort_order_id.unwrap_or(0);

        self.sort_orders
            .iter()
            .map(|order| {
                let default_marker = if order.order_id == default_id {
                    " (default)"
                } else {
                    ""
                };

                if order.fields.is_empty() {
                    format!("order-id: {}{} - unsorted", order.order_id, default_marker)
                } else {
                    let fields: Vec<String> = order
                        .fields
                        .iter()
                        .map(|f| {
                            let column = self.field_name(f.source_id);
                            let expr = if f.transform == "identity" {
                                column
                            } else {
                                format!("{}({})", f.transform, column)
                            };
                            format!("{} {} {}", expr, f.direction, f.null_order)
                        })
                        .collect();
                    format!(
                        "order-id: {}{} - {}",
                        order.order_id,
                        default_marker,
                        fields.join(", ")
                    )
                }
            })
            .collect()
    }

    /// Describe the current snapshot as `<id> (<operation>)`
    pub fn format_current_snapshot(&self) -> String {
        match self.current_snapshot() {
            Some(snapshot) => match snapshot.summary.get("operation") {
                Some(op) => format!("{} ({})", snapshot.snapshot_id, op),
                None => snapshot.snapshot_id.to_string(),
            },
            None => "none".to_string(),
        }
    }

    /// Format last updated time
    pub fn format_last_updated(&self) -> String {
        match self.last_updated_ms {
            Some(ms) => {
                let secs = ms.div_euclid(1000);
                let nanos = (ms.rem_euclid(1000) * 1_000_000) as u32;
                chrono::DateTime::from_timestamp(secs, nanos)
                    .map(|dt| dt.format("%Y-%m-%dT%H:%M:%SZ").to_string())
                    .unwrap_or_else(|| "unknown".to_string())
            }
            None => "unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> TableMetadata {
        serde_json::from_value(json!({
            "format-version": 2,
            "table-uuid": "5b2f0f1e-3a5c-4f9e-9d41-0c8e8f1b2a77",
            "location": "s3://warehouse/db/orders",
            "last-updated-ms": 1_700_000_000_123i64,
            "current-schema-id": 1,
            "schemas": [
                {"schema-id": 0, "fields": []},
                {"schema-id": 1, "fields": [
                    {"id": 1, "name": "order_id", "type": "long", "required": true},
                    {"id": 2, "name": "customer", "type": "string", "required": false},
                    {"id": 3, "name": "placed_at", "type": "timestamptz", "required": false},
                    {"id": 4, "name": "total", "type": "decimal(10,2)", "required": false},
                    {"id": 5, "name": "status", "type": "string", "required": false}
                ]}
            ],
            "default-spec-id": 1,
            "partition-specs": [
                {"spec-id": 0, "fields": []},
                {"spec-id": 1, "fields": [
                    {"source-id": 3, "field-id": 1000, "name": "placed_at_day", "transform": "day"}
                ]}
            ],
            "default-sort-order-id": 1,
            "sort-orders": [
                {"order-id": 1, "fields": [
                    {"source-id": 1, "transform": "identity", "direction": "asc", "null-order": "nulls-first"},
                    {"source-id": 3, "transform": "day", "direction": "desc", "null-order": "nulls-last"}
                ]}
            ],
            "current-snapshot-id": 42,
            "snapshots": [
                {"snapshot-id": 42, "timestamp-ms": 1_700_000_000_000i64, "summary": {"operation": "append"}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_field_names_preview_truncates() {
        assert_eq!(
            metadata().field_names_preview(3),
            "order_id, customer, placed_at, ... (5 total)"
        );
        assert_eq!(
            metadata().field_names_preview(10),
            "order_id, customer, placed_at, total, status"
        );
    }

    #[test]
    fn test_format_partition_specs_marks_default() {
        assert_eq!(
            metadata().format_partition_specs(),
            vec![
                "spec-id: 0 - unpartitioned".to_string(),
                "spec-id: 1 (default) - day(placed_at_day)".to_string(),
            ]
        );
    }

    #[test]
    fn test_format_sort_orders_resolves_columns() {
        assert_eq!(
            metadata().format_sort_orders(),
            vec!["order-id: 1 (default) - order_id asc nulls-first, day(placed_at) desc nulls-last"
                .to_string()]
        );
    }

    #[test]
    fn test_format_current_snapshot() {
        assert_eq!(metadata().format_current_snapshot(), "42 (append)");
        assert_eq!(TableMetadata::default().format_current_snapshot(), "none");
    }

    #[test]
    fn test_format_last_updated() {
        assert_eq!(metadata().format_last_updated(), "2023-11-14T22:13:20Z");
        assert_eq!(TableMetadata::default().format_last_updated(), "unknown");
    }

    #[test]
    fn test_config_prefix_prefers_overrides() {
        let config: CatalogConfig = serde_json::from_value(json!({
            "defaults": {"prefix": "fallback"},
            "overrides": {"prefix": "quickstart"}
        }))
        .unwrap();
        assert_eq!(config.prefix(), Some("quickstart"));
        assert_eq!(CatalogConfig::default().prefix(), None);
    }

    #[test]
    fn test_create_namespace_request_skips_empty_properties() {
        let request = CreateNamespaceRequest {
            namespace: vec!["db".into(), "sales".into()],
            properties: Properties::new(),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"namespace": ["db", "sales"]})
        );
    }
}
