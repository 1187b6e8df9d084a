//! Inventory printer
//!
//! One table row per host or group record, one column per requested
//! attribute. Missing attributes leave the cell empty. With no columns
//! requested, every attribute found in the inventory gets a column.

use std::io::{self, Write};

use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute as CellAttribute, Cell, Table};
use serde_json::Value;
use taskview_core::Inventory;
use taskview_core::config::default_columns;

/// Which attributes become table columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryOptions {
    /// Requested columns; empty selects `name` plus every attribute
    pub columns: Vec<String>,
}

impl Default for InventoryOptions {
    fn default() -> Self {
        Self {
            columns: default_columns(),
        }
    }
}

impl InventoryOptions {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }

    /// Show every attribute of every record
    pub fn all() -> Self {
        Self {
            columns: Vec::new(),
        }
    }
}

/// Cell text for an attribute value
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(cell_text)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

/// Renders inventory records as a table
#[derive(Debug, Clone)]
pub struct InventoryPrinter {
    options: InventoryOptions,
    colors: bool,
}

impl InventoryPrinter {
    pub fn new(options: InventoryOptions) -> Self {
        Self {
            options,
            colors: false,
        }
    }

    pub fn with_colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Columns of the table for `inventory`
    ///
    /// The requested columns, or `name` followed by the attribute keys of
    /// all records in first-seen order when none were requested.
    pub fn columns(&self, inventory: &Inventory) -> Vec<String> {
        if !self.options.columns.is_empty() {
            return self.options.columns.clone();
        }

        let mut columns = vec!["name".to_string()];
        for (_, record) in inventory.records() {
            for key in record.attributes.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
        columns
    }

    /// Cell texts, one row per record in column order
    pub fn rows(&self, inventory: &Inventory) -> Vec<Vec<String>> {
        let columns = self.columns(inventory);
        inventory
            .records()
            .map(|(_, record)| {
                columns
                    .iter()
                    .map(|column| record.get(column).as_ref().map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect()
    }

    pub fn table(&self, inventory: &Inventory) -> Table {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL_CONDENSED);
        if self.colors {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }

        table.set_header(
            self.columns(inventory)
                .iter()
                .map(|column| Cell::new(column).add_attribute(CellAttribute::Bold)),
        );
        for row in self.rows(inventory) {
            table.add_row(row);
        }
        table
    }

    /// Rendered table, empty when there is nothing to show
    pub fn render(&self, inventory: &Inventory) -> String {
        if inventory.is_empty() {
            return String::new();
        }
        format!("{}\n", self.table(inventory))
    }

    pub fn print<W: Write>(&self, out: &mut W, inventory: &Inventory) -> io::Result<()> {
        let rendered = self.render(inventory);
        if rendered.is_empty() {
            return Ok(());
        }
        out.write_all(rendered.as_bytes())?;
        out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use taskview_core::InventoryRecord;

    fn inventory() -> Inventory {
        Inventory::new()
            .with_host(
                InventoryRecord::new("sw1")
                    .with_attribute("platform", "eos")
                    .with_attribute("groups", json!(["core", "edge"])),
            )
            .with_host(
                InventoryRecord::new("sw2")
                    .with_attribute("platform", "junos")
                    .with_attribute("site", "ams1")
                    .with_attribute("port", 830),
            )
            .with_group(InventoryRecord::new("core").with_attribute("site", "fra1"))
    }

    #[test]
    fn test_missing_attribute_renders_empty_cell() {
        let printer = InventoryPrinter::new(InventoryOptions::new(["site", "platform"]));
        let rows = printer.rows(&inventory());
        assert_eq!(rows[0], vec!["".to_string(), "eos".to_string()]);
        assert_eq!(rows[1], vec!["ams1".to_string(), "junos".to_string()]);
    }

    #[test]
    fn test_one_row_per_record_one_column_per_attribute() {
        let columns = ["name", "port", "groups", "site", "nonexistent"];
        let printer = InventoryPrinter::new(InventoryOptions::new(columns));
        let rows = printer.rows(&inventory());
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|row| row.len() == columns.len()));
        assert_eq!(rows[0], vec!["sw1", "", "core, edge", "", ""]);
        assert_eq!(rows[1], vec!["sw2", "830", "", "ams1", ""]);
        assert_eq!(rows[2], vec!["core", "", "", "fra1", ""]);
    }

    #[test]
    fn test_column_order_follows_request() {
        let printer = InventoryPrinter::new(InventoryOptions::new(["platform", "name"]));
        let rendered = printer.render(&inventory());
        let header = rendered.lines().nth(1).unwrap();
        assert!(header.find("platform").unwrap() < header.find("name").unwrap());
        assert!(rendered.contains("sw1"));
        assert!(rendered.contains("junos"));
    }

    #[test]
    fn test_no_columns_shows_every_attribute() {
        let printer = InventoryPrinter::new(InventoryOptions::all());
        let inventory = inventory();
        assert_eq!(
            printer.columns(&inventory),
            vec!["name", "groups", "platform", "port", "site"]
        );
        let rows = printer.rows(&inventory);
        assert_eq!(rows[0], vec!["sw1", "core, edge", "eos", "", ""]);
        assert_eq!(rows[1], vec!["sw2", "", "junos", "830", "ams1"]);
        assert_eq!(rows[2], vec!["core", "", "", "", "fra1"]);

        let rendered = printer.render(&inventory);
        assert!(rendered.contains("port"));
        assert!(rendered.contains("fra1"));
    }

    #[test]
    fn test_all_columns_keep_first_seen_order() {
        let inventory = Inventory::new()
            .with_host(InventoryRecord::new("a").with_attribute("zone", "z1"))
            .with_host(
                InventoryRecord::new("b")
                    .with_attribute("asn", 65000)
                    .with_attribute("zone", "z2"),
            );
        let printer = InventoryPrinter::new(InventoryOptions::all());
        assert_eq!(printer.columns(&inventory), vec!["name", "zone", "asn"]);
    }

    #[test]
    fn test_empty_inventory_renders_nothing() {
        let printer = InventoryPrinter::new(InventoryOptions::default());
        assert_eq!(printer.render(&Inventory::new()), "");
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!("x")), "x");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!(["a", 1])), "a, 1");
        assert_eq!(cell_text(&json!({"k": "v"})), r#"{"k":"v"}"#);
    }
}
