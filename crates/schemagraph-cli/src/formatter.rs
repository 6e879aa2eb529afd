//! Output formatters for reports and diffs.

use crate::report::TableReport;
use clap::ValueEnum;
use comfy_table::{Cell, Table};
use schemagraph_core::diff::{
    CatalogDiff, ColumnChange, IndexChange, RelationshipChange, TableChange,
};

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

/// Trait for formatting output.
pub trait Formatter: Send + Sync {
    /// Format a catalog report.
    fn format_report(&self, report: &[TableReport]) -> String;

    /// Format a catalog diff.
    fn format_diff(&self, diff: &CatalogDiff) -> String;

    /// Format a weak association name.
    fn format_name(&self, name: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_report(&self, report: &[TableReport]) -> String {
        if report.is_empty() {
            return "No tables".to_string();
        }

        report
            .iter()
            .map(format_table_report)
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn format_diff(&self, diff: &CatalogDiff) -> String {
        if diff.is_empty() {
            return "No changes".to_string();
        }

        let mut table = Table::new();
        table.set_header(vec!["Table", "Object", "Change", "Detail"]);

        for change in &diff.table_changes {
            match change {
                TableChange::Added(name) => {
                    table.add_row(vec![name.as_str(), "table", "added", ""]);
                }
                TableChange::Removed(name) => {
                    table.add_row(vec![name.as_str(), "table", "removed", ""]);
                }
                TableChange::Modified {
                    table_name,
                    column_changes,
                    index_changes,
                    foreign_key_changes,
                    weak_association_changes,
                } => {
                    for c in column_changes {
                        let (change, detail) = describe_column_change(c);
                        table.add_row(vec![table_name.clone(), "column".into(), change, detail]);
                    }
                    for c in index_changes {
                        let (change, detail) = describe_index_change(c);
                        table.add_row(vec![table_name.clone(), "index".into(), change, detail]);
                    }
                    for c in foreign_key_changes {
                        let (change, detail) = describe_relationship_change(c);
                        table.add_row(vec![
                            table_name.clone(),
                            "foreign key".into(),
                            change,
                            detail,
                        ]);
                    }
                    for c in weak_association_changes {
                        let (change, detail) = describe_relationship_change(c);
                        table.add_row(vec![
                            table_name.clone(),
                            "weak association".into(),
                            change,
                            detail,
                        ]);
                    }
                }
            }
        }

        format!("{}\n{} change(s)", table, diff.change_count())
    }

    fn format_name(&self, name: &str) -> String {
        name.to_string()
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_report(&self, report: &[TableReport]) -> String {
        serde_json::to_string_pretty(report).unwrap_or_else(|_| "[]".to_string())
    }

    fn format_diff(&self, diff: &CatalogDiff) -> String {
        serde_json::to_string_pretty(diff).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_name(&self, name: &str) -> String {
        serde_json::json!({ "name": name }).to_string()
    }
}

/// Format one table report as a stack of tables.
fn format_table_report(report: &TableReport) -> String {
    let title = if report.partial {
        format!("{} (partial)", report.name)
    } else {
        report.name.clone()
    };
    let mut sections = vec![title];

    let mut columns = Table::new();
    columns.set_header(vec!["Column", "Type", "Nullable", "Generated"]);
    for c in &report.columns {
        columns.add_row(vec![
            Cell::new(&c.name),
            Cell::new(&c.type_name),
            Cell::new(yes_no(c.nullable)),
            Cell::new(yes_no(c.generated)),
        ]);
    }
    sections.push(columns.to_string());

    if !report.indexes.is_empty() {
        let mut indexes = Table::new();
        indexes.set_header(vec!["Index", "Columns", "Unique", "Generated"]);
        for i in &report.indexes {
            indexes.add_row(vec![
                Cell::new(&i.name),
                Cell::new(&i.columns),
                Cell::new(yes_no(i.unique)),
                Cell::new(yes_no(i.generated)),
            ]);
        }
        sections.push(indexes.to_string());
    }

    let relationships: Vec<_> = report
        .foreign_keys
        .iter()
        .map(|r| ("foreign key", r))
        .chain(report.weak_associations.iter().map(|r| ("weak", r)))
        .collect();
    if !relationships.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["Relationship", "Kind", "Columns", "References", "Cardinality"]);
        for (kind, r) in relationships {
            table.add_row(vec![
                Cell::new(&r.name),
                Cell::new(kind),
                Cell::new(&r.columns),
                Cell::new(format!("{} ({})", r.referenced_table, r.referenced_columns)),
                Cell::new(&r.cardinality),
            ]);
        }
        sections.push(table.to_string());
    }

    sections.join("\n")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn describe_column_change(change: &ColumnChange) -> (String, String) {
    match change {
        ColumnChange::Added(name) => ("added".into(), name.clone()),
        ColumnChange::Removed(name) => ("removed".into(), name.clone()),
        ColumnChange::TypeChanged {
            column_name,
            from_type,
            to_type,
        } => (
            "type changed".into(),
            format!("{}: {} -> {}", column_name, from_type, to_type),
        ),
        ColumnChange::NullableChanged {
            column_name,
            from_nullable,
            to_nullable,
        } => (
            "nullability changed".into(),
            format!("{}: {} -> {}", column_name, from_nullable, to_nullable),
        ),
    }
}

fn describe_index_change(change: &IndexChange) -> (String, String) {
    match change {
        IndexChange::Added(name) => ("added".into(), name.clone()),
        IndexChange::Removed(name) => ("removed".into(), name.clone()),
        IndexChange::Modified {
            index_name,
            from_columns,
            to_columns,
            from_unique,
            to_unique,
        } => (
            "modified".into(),
            format!(
                "{}: ({}) unique={} -> ({}) unique={}",
                index_name,
                from_columns.join(", "),
                from_unique,
                to_columns.join(", "),
                to_unique
            ),
        ),
    }
}

fn describe_relationship_change(change: &RelationshipChange) -> (String, String) {
    let (verb, name, pair) = match change {
        RelationshipChange::Added { name, column_pair } => ("added", name, column_pair),
        RelationshipChange::Removed { name, column_pair } => ("removed", name, column_pair),
    };
    let detail = match pair {
        Some(pair) => format!(
            "{}: {} -> {}",
            name, pair.foreign_key_column, pair.primary_key_column
        ),
        None => name.clone(),
    };
    (verb.to_string(), detail)
}
