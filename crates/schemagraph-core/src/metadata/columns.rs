//! Column name extraction and column list formatting.

use crate::catalog::{AsColumn, Catalog, ForeignKey, Index, Table, TableConstraint};
use crate::identifiers::Identifiers;

/// Full names of an index's columns, in index order.
pub fn column_names(index: Option<&Index>) -> Vec<String> {
    index
        .map(|index| index.iter_columns().map(|c| c.full_name()).collect())
        .unwrap_or_default()
}

/// Full names of a foreign key's referencing columns, in key order.
pub fn foreign_key_column_names(foreign_key: Option<&ForeignKey>) -> Vec<String> {
    foreign_key
        .map(|fk| {
            fk.column_references()
                .iter()
                .map(|r| r.foreign_key_column.full_name())
                .collect()
        })
        .unwrap_or_default()
}

/// Check if any column of an index is generated.
pub fn contains_generated_columns(index: Option<&Index>) -> bool {
    index.is_some_and(|index| index.iter_columns().any(|c| c.generated))
}

/// Join quoted column names with `", "`, preserving input order.
///
/// With `omit_large_objects`, columns typed as large objects or generic
/// objects are skipped. Nothing is sorted or deduplicated: composite key
/// order is meaningful.
pub fn join_columns<'a, C, I>(
    columns: I,
    omit_large_objects: bool,
    identifiers: &Identifiers,
) -> String
where
    C: AsColumn + 'a,
    I: IntoIterator<Item = &'a C>,
{
    columns
        .into_iter()
        .map(AsColumn::as_column)
        .filter(|c| !(omit_large_objects && c.data_type.group.is_large_object()))
        .map(|c| identifiers.quote_name(c.name()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Comma-separated list of a table's columns.
pub fn table_columns_list(table: &Table, identifiers: &Identifiers) -> String {
    join_columns(table.columns(), false, identifiers)
}

/// Comma-separated list of an index's columns.
pub fn index_columns_list(index: &Index, identifiers: &Identifiers) -> String {
    join_columns(index.columns(), false, identifiers)
}

/// Comma-separated list of a table constraint's columns.
pub fn constraint_columns_list(constraint: &TableConstraint, identifiers: &Identifiers) -> String {
    join_columns(constraint.columns(), false, identifiers)
}

/// Comma-separated list of a foreign key's referencing columns.
///
/// Columns that do not resolve in the catalog are skipped.
pub fn foreign_key_columns_list(
    catalog: &Catalog,
    foreign_key: &ForeignKey,
    identifiers: &Identifiers,
) -> String {
    let columns: Vec<_> = foreign_key
        .column_references()
        .iter()
        .filter_map(|r| catalog.column(&r.foreign_key_column))
        .collect();
    join_columns(columns, false, identifiers)
}

/// Comma-separated list of a foreign key's referenced (primary key) columns.
pub fn primary_key_columns_list(
    catalog: &Catalog,
    foreign_key: &ForeignKey,
    identifiers: &Identifiers,
) -> String {
    let columns: Vec<_> = foreign_key
        .column_references()
        .iter()
        .filter_map(|r| catalog.column(&r.primary_key_column))
        .collect();
    join_columns(columns, false, identifiers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Column, ColumnDataType, ColumnRef, TableConstraintType, TableName};
    use crate::identifiers::IdentifierQuotingStrategy;

    fn documents() -> Table {
        let mut table = Table::new(TableName::new("DOCS", "DOCUMENTS"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("TITLE", ColumnDataType::new("VARCHAR"))
            .with_column("BODY", ColumnDataType::new("BLOB"))
            .with_column("ORDER", ColumnDataType::new("INTEGER"))
            .with_generated_column("TITLE_UPPER", ColumnDataType::new("VARCHAR"));
        table.add_index("IDX_TITLE", false, &["TITLE", "ID"]).unwrap();
        table.add_index("IDX_UPPER", false, &["TITLE_UPPER"]).unwrap();
        table
            .add_constraint("PK_DOCUMENTS", TableConstraintType::PrimaryKey, &["ID"])
            .unwrap();
        table
    }

    #[test]
    fn test_join_columns_omits_large_objects() {
        let table = documents();
        let ids = Identifiers::new(IdentifierQuotingStrategy::QuoteNone, "");
        let columns = &table.columns()[..3];

        assert_eq!(join_columns(columns, true, &ids), "ID, TITLE");
        assert_eq!(join_columns(columns, false, &ids), "ID, TITLE, BODY");
    }

    #[test]
    fn test_join_columns_preserves_order() {
        let table = TableName::new("S", "T");
        let b = Column::new(&table, "B", ColumnDataType::new("VARCHAR"));
        let a = Column::new(&table, "A", ColumnDataType::new("VARCHAR"));
        let ids = Identifiers::default();

        assert_eq!(join_columns([&b, &a, &b], false, &ids), "B, A, B");
    }

    #[test]
    fn test_join_columns_empty() {
        let ids = Identifiers::default();
        let none: Vec<Column> = Vec::new();

        assert_eq!(join_columns(&none, true, &ids), "");
        assert_eq!(join_columns(&none, false, &ids), "");
    }

    #[test]
    fn test_lists_quote_names() {
        let table = documents();
        let ids = Identifiers::default();

        assert_eq!(
            table_columns_list(&table, &ids),
            "ID, TITLE, BODY, \"ORDER\", TITLE_UPPER"
        );
        assert_eq!(
            index_columns_list(table.index("IDX_TITLE").unwrap(), &ids),
            "TITLE, ID"
        );
        assert_eq!(
            constraint_columns_list(table.primary_key().unwrap(), &ids),
            "ID"
        );
    }

    #[test]
    fn test_index_column_names() {
        let table = documents();

        assert_eq!(
            column_names(table.index("IDX_TITLE")),
            vec!["DOCS.DOCUMENTS.TITLE", "DOCS.DOCUMENTS.ID"]
        );
        assert!(column_names(None).is_empty());
        assert!(column_names(table.index("NOPE")).is_empty());
    }

    #[test]
    fn test_contains_generated_columns() {
        let table = documents();

        assert!(contains_generated_columns(table.index("IDX_UPPER")));
        assert!(!contains_generated_columns(table.index("IDX_TITLE")));
        assert!(!contains_generated_columns(None));
    }

    #[test]
    fn test_foreign_key_lists() {
        let authors = Table::new(TableName::new("DOCS", "AUTHORS"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("DOC_ID", ColumnDataType::new("INTEGER"));
        let mut catalog = Catalog::from_tables([documents(), authors]).unwrap();
        let fk = ForeignKey::new("FK_AUTHOR_DOC").with_reference(
            ColumnRef::new(TableName::new("DOCS", "DOCUMENTS"), "ID"),
            ColumnRef::new(TableName::new("DOCS", "AUTHORS"), "DOC_ID"),
        );
        catalog.add_foreign_key(fk.clone()).unwrap();
        let ids = Identifiers::default();

        assert_eq!(foreign_key_columns_list(&catalog, &fk, &ids), "DOC_ID");
        assert_eq!(primary_key_columns_list(&catalog, &fk, &ids), "ID");
        assert_eq!(
            foreign_key_column_names(Some(&fk)),
            vec!["DOCS.AUTHORS.DOC_ID"]
        );
        assert!(foreign_key_column_names(None).is_empty());
    }
}
