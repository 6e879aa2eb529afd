//! The catalog: an arena of tables keyed by qualified name.

use super::column::{Column, ColumnRef};
use super::relation::ForeignKey;
use super::state::PartialObject;
use super::table::{Table, TableName};
use crate::error::Error;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tracing::debug;

/// In-memory model of one crawl.
///
/// Tables are stored once, keyed by [`TableName`]; every other object refers
/// to its table through that name. Iteration is in qualified-name order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    tables: BTreeMap<TableName, Table>,
    /// Label of the crawled database.
    pub database: Option<String>,
    /// When the crawl ran.
    pub crawled_at: Option<DateTime<Utc>>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from crawled tables.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if two full tables share a name.
    pub fn from_tables(tables: impl IntoIterator<Item = Table>) -> Result<Self, Error> {
        let mut catalog = Self::new();
        for table in tables {
            catalog.add_table(table)?;
        }
        Ok(catalog)
    }

    /// Set the database label.
    pub fn with_database(mut self, database: impl Into<String>) -> Self {
        self.database = Some(database.into());
        self
    }

    /// Add a table.
    ///
    /// A full table replaces a placeholder of the same name and inherits the
    /// relationships already recorded on it. Adding a placeholder never
    /// replaces an existing table.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidArgument`] if a full table of that name already exists,
    /// or if the placeholder's relationships use a column the new table lacks.
    /// The catalog is unchanged on error.
    pub fn add_table(&mut self, mut table: Table) -> Result<(), Error> {
        let Some(existing) = self.tables.get(table.name()) else {
            self.tables.insert(table.name().clone(), table);
            return Ok(());
        };

        if table.is_partial() {
            return Ok(());
        }
        if !existing.is_partial() {
            return Err(Error::InvalidArgument(format!(
                "duplicate table {}",
                table.name()
            )));
        }
        if let Some(missing) = missing_relationship_column(existing, &table) {
            return Err(Error::InvalidArgument(format!(
                "table {} has no column {} used by its relationships",
                table.name(),
                missing
            )));
        }

        if let Some(placeholder) = self.tables.remove(table.name()) {
            table.absorb_relationships(placeholder);
        }
        self.tables.insert(table.name().clone(), table);
        Ok(())
    }

    /// Get a table by name.
    pub fn table(&self, name: &TableName) -> Option<&Table> {
        self.tables.get(name)
    }

    /// Get a table by its dotted full name.
    pub fn table_by_full_name(&self, full_name: &str) -> Option<&Table> {
        TableName::parse(full_name).and_then(|name| self.tables.get(&name))
    }

    pub(crate) fn table_mut(&mut self, name: &TableName) -> Option<&mut Table> {
        self.tables.get_mut(name)
    }

    /// All tables, full and partial, in name order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values()
    }

    /// Tables that were actually retrieved.
    pub fn full_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values().filter(|t| !t.is_partial())
    }

    /// Placeholders for out-of-scope tables.
    pub fn partial_tables(&self) -> impl Iterator<Item = &Table> {
        self.tables.values().filter(|t| t.is_partial())
    }

    /// Number of tables, including placeholders.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Check if the catalog has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Resolve a column handle.
    pub fn column(&self, column: &ColumnRef) -> Option<&Column> {
        self.tables
            .get(&column.table)
            .and_then(|t| t.column(&column.column))
    }

    /// Get the table that owns a column.
    pub fn table_of(&self, column: &Column) -> Option<&Table> {
        self.tables.get(column.table())
    }

    /// Look up a table, creating a placeholder if it is not in the catalog.
    pub fn lookup_or_create_partial_table(&mut self, name: &TableName) -> &mut Table {
        self.tables.entry(name.clone()).or_insert_with(|| {
            debug!(table = %name, "Creating partial table");
            Table::partial(name.clone())
        })
    }

    /// Register a declared foreign key on both participating tables.
    ///
    /// Tables missing from the catalog become placeholders, and columns
    /// missing from placeholders are created. A column missing from a full
    /// table is an error.
    pub fn add_foreign_key(&mut self, foreign_key: ForeignKey) -> Result<(), Error> {
        let (pk_table, fk_table) = match (
            foreign_key.primary_key_table(),
            foreign_key.foreign_key_table(),
        ) {
            (Some(pk), Some(fk)) => (pk.clone(), fk.clone()),
            _ => {
                return Err(Error::InvalidArgument(format!(
                    "foreign key {} has no column references",
                    foreign_key.name()
                )))
            }
        };

        let references = foreign_key.column_references();
        Self::check_single_table(&foreign_key, references.iter().map(|r| &r.primary_key_column))?;
        Self::check_single_table(&foreign_key, references.iter().map(|r| &r.foreign_key_column))?;

        for reference in foreign_key.column_references() {
            self.check_resolvable(&reference.primary_key_column)?;
            self.check_resolvable(&reference.foreign_key_column)?;
        }
        for reference in foreign_key.column_references() {
            self.resolve_or_placeholder(&reference.primary_key_column);
            self.resolve_or_placeholder(&reference.foreign_key_column);
        }

        if let Some(table) = self.tables.get_mut(&fk_table) {
            table.add_foreign_key(foreign_key.clone());
        }
        if pk_table != fk_table {
            if let Some(table) = self.tables.get_mut(&pk_table) {
                table.add_foreign_key(foreign_key);
            }
        }
        Ok(())
    }

    /// Every declared foreign key once, in referencing-table order.
    pub fn foreign_keys(&self) -> Vec<&ForeignKey> {
        // The referencing table always exists, if only as a placeholder.
        self.tables
            .values()
            .flat_map(|t| t.imported_foreign_keys())
            .collect()
    }

    /// Every weak association once, in referencing-table order.
    pub fn weak_associations(&self) -> Vec<&ForeignKey> {
        self.tables
            .values()
            .flat_map(|t| t.imported_weak_associations())
            .collect()
    }

    fn check_single_table<'a>(
        foreign_key: &ForeignKey,
        columns: impl Iterator<Item = &'a ColumnRef>,
    ) -> Result<(), Error> {
        let mut tables: Vec<&TableName> = columns.map(|c| &c.table).collect();
        tables.dedup();
        if tables.len() > 1 {
            return Err(Error::InvalidArgument(format!(
                "foreign key {} spans tables {} and {}",
                foreign_key.name(),
                tables[0],
                tables[1]
            )));
        }
        Ok(())
    }

    fn check_resolvable(&self, column: &ColumnRef) -> Result<(), Error> {
        match self.tables.get(&column.table) {
            Some(table) if !table.is_partial() && table.column(&column.column).is_none() => {
                Err(Error::InvalidArgument(format!(
                    "no column {} in table {}",
                    column.column, column.table
                )))
            }
            _ => Ok(()),
        }
    }

    fn resolve_or_placeholder(&mut self, column: &ColumnRef) {
        self.lookup_or_create_partial_table(&column.table)
            .column_or_placeholder(&column.column);
    }
}

/// First column of `table` referenced by a relationship recorded on
/// `placeholder` that `table` does not define.
fn missing_relationship_column(placeholder: &Table, table: &Table) -> Option<String> {
    placeholder
        .foreign_keys()
        .iter()
        .chain(placeholder.weak_associations())
        .flat_map(|fk| fk.column_references())
        .flat_map(|r| [&r.primary_key_column, &r.foreign_key_column])
        .find(|c| &c.table == table.name() && table.column(&c.column).is_none())
        .map(|c| c.full_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ColumnDataType;

    fn sales() -> Catalog {
        let customers = Table::new(TableName::new("SALES", "CUSTOMERS"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("NAME", ColumnDataType::new("VARCHAR"));
        let orders = Table::new(TableName::new("SALES", "ORDERS"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("CUST_ID", ColumnDataType::new("INTEGER"));

        Catalog::from_tables([customers, orders])
            .unwrap()
            .with_database("sales")
    }

    fn col(schema: &str, table: &str, column: &str) -> ColumnRef {
        ColumnRef::new(TableName::new(schema, table), column)
    }

    #[test]
    fn test_lookup_tables_and_columns() {
        let catalog = sales();

        assert_eq!(catalog.len(), 2);
        assert!(catalog.table_by_full_name("SALES.ORDERS").is_some());
        assert!(catalog.table_by_full_name("SALES.NOPE").is_none());

        let column = catalog.column(&col("SALES", "ORDERS", "CUST_ID")).unwrap();
        assert_eq!(column.full_name(), "SALES.ORDERS.CUST_ID");
        assert_eq!(catalog.table_of(column).unwrap().full_name(), "SALES.ORDERS");
        assert!(catalog.column(&col("SALES", "ORDERS", "NOPE")).is_none());
    }

    #[test]
    fn test_tables_iterate_in_name_order() {
        let catalog = sales();
        let names: Vec<_> = catalog.tables().map(|t| t.full_name()).collect();
        assert_eq!(names, vec!["SALES.CUSTOMERS", "SALES.ORDERS"]);
    }

    #[test]
    fn test_foreign_key_registered_on_both_tables() {
        let mut catalog = sales();
        let fk = ForeignKey::new("FK_ORDERS_CUSTOMERS")
            .with_reference(col("SALES", "CUSTOMERS", "ID"), col("SALES", "ORDERS", "CUST_ID"));
        catalog.add_foreign_key(fk).unwrap();

        let orders = catalog.table_by_full_name("SALES.ORDERS").unwrap();
        let customers = catalog.table_by_full_name("SALES.CUSTOMERS").unwrap();
        assert_eq!(orders.imported_foreign_keys().count(), 1);
        assert_eq!(customers.exported_foreign_keys().count(), 1);
        assert_eq!(catalog.foreign_keys().len(), 1);
    }

    #[test]
    fn test_foreign_key_to_out_of_scope_table_creates_placeholder() {
        let mut catalog = sales();
        let fk = ForeignKey::new("FK_ORDERS_REGION")
            .with_reference(col("GEO", "REGIONS", "ID"), col("SALES", "ORDERS", "ID"));
        catalog.add_foreign_key(fk).unwrap();

        let regions = catalog.table_by_full_name("GEO.REGIONS").unwrap();
        assert!(regions.is_partial());
        assert!(regions.column("ID").unwrap().is_partial());
        assert_eq!(regions.exported_foreign_keys().count(), 1);
        assert_eq!(catalog.partial_tables().count(), 1);
        assert_eq!(catalog.full_tables().count(), 2);
    }

    #[test]
    fn test_foreign_key_with_unknown_full_column_fails() {
        let mut catalog = sales();
        let fk = ForeignKey::new("FK_BAD")
            .with_reference(col("SALES", "CUSTOMERS", "ID"), col("SALES", "ORDERS", "NOPE"));

        assert!(matches!(
            catalog.add_foreign_key(fk),
            Err(Error::InvalidArgument(_))
        ));
        assert_eq!(catalog.len(), 2);
        assert!(catalog.add_foreign_key(ForeignKey::new("FK_EMPTY")).is_err());
    }

    #[test]
    fn test_full_table_replaces_placeholder() {
        let mut catalog = sales();
        let fk = ForeignKey::new("FK_ORDERS_REGION")
            .with_reference(col("GEO", "REGIONS", "ID"), col("SALES", "ORDERS", "ID"));
        catalog.add_foreign_key(fk).unwrap();

        catalog
            .add_table(
                Table::new(TableName::new("GEO", "REGIONS"))
                    .with_column("ID", ColumnDataType::new("INTEGER")),
            )
            .unwrap();

        let regions = catalog.table_by_full_name("GEO.REGIONS").unwrap();
        assert!(!regions.is_partial());
        assert_eq!(regions.exported_foreign_keys().count(), 1);

        catalog
            .add_table(Table::partial(TableName::new("GEO", "REGIONS")))
            .unwrap();
        assert!(!catalog.table_by_full_name("GEO.REGIONS").unwrap().is_partial());
    }

    #[test]
    fn test_self_referencing_foreign_key_recorded_once() {
        let mut catalog = Catalog::from_tables([Table::new(TableName::new("HR", "EMP"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("MANAGER_ID", ColumnDataType::new("INTEGER"))])
        .unwrap();
        let fk = ForeignKey::new("FK_EMP_MANAGER")
            .with_reference(col("HR", "EMP", "ID"), col("HR", "EMP", "MANAGER_ID"));
        catalog.add_foreign_key(fk).unwrap();

        let emp = catalog.table_by_full_name("HR.EMP").unwrap();
        assert_eq!(emp.foreign_keys().len(), 1);
        assert_eq!(catalog.foreign_keys().len(), 1);
    }

    #[test]
    fn test_placeholder_replacement_requires_referenced_columns() {
        let mut catalog = sales();
        let fk = ForeignKey::new("FK_ORDERS_REGION")
            .with_reference(col("GEO", "REGIONS", "ID"), col("SALES", "ORDERS", "ID"));
        catalog.add_foreign_key(fk).unwrap();

        let regions = Table::new(TableName::new("GEO", "REGIONS"))
            .with_column("CODE", ColumnDataType::new("VARCHAR"));
        assert!(matches!(
            catalog.add_table(regions),
            Err(Error::InvalidArgument(_))
        ));

        let placeholder = catalog.table_by_full_name("GEO.REGIONS").unwrap();
        assert!(placeholder.is_partial());
        assert_eq!(placeholder.exported_foreign_keys().count(), 1);

        let reloaded = catalog.to_snapshot().into_catalog().unwrap();
        assert!(reloaded.column(&col("GEO", "REGIONS", "ID")).is_some());
    }

    #[test]
    fn test_duplicate_full_table_rejected() {
        let mut catalog = sales();
        let again = Table::new(TableName::new("SALES", "ORDERS"))
            .with_column("NOTE", ColumnDataType::new("VARCHAR"));

        assert!(matches!(
            catalog.add_table(again),
            Err(Error::InvalidArgument(_))
        ));
        let orders = catalog.table_by_full_name("SALES.ORDERS").unwrap();
        assert!(orders.column("CUST_ID").is_some());
        assert!(orders.column("NOTE").is_none());
    }

    #[test]
    fn test_foreign_key_spanning_tables_rejected() {
        let mut catalog = sales();
        let fk = ForeignKey::new("FK_MIXED")
            .with_reference(col("SALES", "CUSTOMERS", "ID"), col("SALES", "ORDERS", "ID"))
            .with_reference(col("SALES", "CUSTOMERS", "NAME"), col("SALES", "CUSTOMERS", "ID"));

        assert!(matches!(
            catalog.add_foreign_key(fk),
            Err(Error::InvalidArgument(_))
        ));
        assert!(catalog.foreign_keys().is_empty());

        let fk = ForeignKey::new("FK_MIXED_PK")
            .with_reference(col("SALES", "CUSTOMERS", "ID"), col("SALES", "ORDERS", "ID"))
            .with_reference(col("SALES", "ORDERS", "ID"), col("SALES", "ORDERS", "CUST_ID"));
        assert!(catalog.add_foreign_key(fk).is_err());
        assert_eq!(catalog.len(), 2);
    }
}
