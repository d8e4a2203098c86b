//! Output formatting utilities for the CLI
//!
//! Builds the plain-text tables printed by list commands. Tables stay
//! uncolored so their layout survives scripts and pagers; status
//! messages get the colored treatment instead.

use colored::*;
use gantry_core::api::{Plan, ServiceCatalogEntry, ServiceInstance};
use gantry_core::table::{self, Table};
use std::collections::HashMap;

/// Longest key material shown by `key list` before truncation kicks in
pub const KEY_CONTENT_LIMIT: usize = 60;

/// Format the service catalog as a Service/Instances table
///
/// An empty catalog produces no output at all.
pub fn format_catalog(entries: &[ServiceCatalogEntry]) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut table = Table::new(["Service", "Instances"]);
    for entry in entries {
        table.add_row(vec![entry.service.clone(), entry.instances.join(", ")]);
    }

    table.render()
}

/// Format service instances with one column per metadata key
///
/// The columns after Instances and Apps are the union of the metadata
/// keys across all instances, in sorted order; instances that lack a
/// key show an empty cell.
pub fn format_instances(instances: &[ServiceInstance]) -> String {
    let columns = table::dynamic_columns(instances.iter().map(|i| &i.info));

    let mut headers = vec!["Instances".to_string(), "Apps".to_string()];
    headers.extend(columns.iter().cloned());

    let mut table = Table::new(headers);
    for instance in instances {
        let core = vec![instance.name.clone(), instance.apps.join(", ")];
        table.add_row(table::build_row(core, &instance.info, &columns));
    }

    table.render()
}

/// Format service plans as a Name/Description table
pub fn format_plans(plans: &[Plan]) -> String {
    let mut table = Table::new(["Name", "Description"]);
    for plan in plans {
        table.add_row(vec![plan.name.clone(), plan.description.clone()]);
    }

    table.render()
}

/// Format registered keys as a Name/Content table, sorted by name
///
/// Key material longer than [`KEY_CONTENT_LIMIT`] characters is cut
/// and marked with `...` unless `no_truncate` is set.
pub fn format_keys(keys: &HashMap<String, String>, no_truncate: bool) -> String {
    let mut table = Table::new(["Name", "Content"]);
    for (name, content) in keys {
        let content = table::truncate(content, KEY_CONTENT_LIMIT, no_truncate);
        table.add_row(vec![name.clone(), content]);
    }
    table.sort_by_column(0);

    table.render()
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
