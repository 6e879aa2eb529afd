//! Report rows built from a catalog.
//!
//! Formatters render these rows; building them is where quoting, large-object
//! omission and cardinality are applied.

use schemagraph_core::catalog::{Catalog, ForeignKey, PartialObject, Table};
use schemagraph_core::metadata::{
    contains_generated_columns, find_foreign_key_cardinality, foreign_key_columns_list,
    join_columns, primary_key_columns_list,
};
use schemagraph_core::ReportOptions;
use serde::Serialize;

/// One table in a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableReport {
    pub name: String,
    pub partial: bool,
    pub columns: Vec<ColumnReport>,
    pub indexes: Vec<IndexReport>,
    pub foreign_keys: Vec<RelationshipReport>,
    pub weak_associations: Vec<RelationshipReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnReport {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
    pub nullable: bool,
    pub generated: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexReport {
    pub name: String,
    pub unique: bool,
    /// Quoted column list.
    pub columns: String,
    /// Whether any indexed column is generated.
    pub generated: bool,
}

/// A foreign key or weak association, seen from the referencing table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RelationshipReport {
    pub name: String,
    pub columns: String,
    pub referenced_table: String,
    pub referenced_columns: String,
    /// Cardinality display string, empty when unknown.
    pub cardinality: String,
}

/// Build report rows for the tables of a catalog, in name order.
pub fn build_report(catalog: &Catalog, options: &ReportOptions) -> Vec<TableReport> {
    catalog
        .tables()
        .filter(|t| options.show_partial_tables || !t.is_partial())
        .map(|t| table_report(catalog, t, options))
        .collect()
}

fn table_report(catalog: &Catalog, table: &Table, options: &ReportOptions) -> TableReport {
    let identifiers = &options.identifiers;

    TableReport {
        name: table.full_name(),
        partial: table.is_partial(),
        columns: table
            .columns()
            .iter()
            .map(|c| ColumnReport {
                name: identifiers.quote_name(c.name()),
                type_name: c.data_type.name.clone(),
                nullable: c.nullable,
                generated: c.generated,
            })
            .collect(),
        indexes: table
            .indexes()
            .iter()
            .map(|i| IndexReport {
                name: i.name().to_string(),
                unique: i.unique,
                columns: join_columns(i.columns(), options.omit_large_objects, identifiers),
                generated: contains_generated_columns(Some(i)),
            })
            .collect(),
        foreign_keys: table
            .imported_foreign_keys()
            .map(|fk| relationship_report(catalog, fk, options))
            .collect(),
        weak_associations: table
            .imported_weak_associations()
            .map(|wa| relationship_report(catalog, wa, options))
            .collect(),
    }
}

fn relationship_report(
    catalog: &Catalog,
    foreign_key: &ForeignKey,
    options: &ReportOptions,
) -> RelationshipReport {
    let identifiers = &options.identifiers;

    RelationshipReport {
        name: foreign_key.name().to_string(),
        columns: foreign_key_columns_list(catalog, foreign_key, identifiers),
        referenced_table: foreign_key
            .primary_key_table()
            .map(|t| t.full_name())
            .unwrap_or_default(),
        referenced_columns: primary_key_columns_list(catalog, foreign_key, identifiers),
        cardinality: find_foreign_key_cardinality(catalog, Some(foreign_key)).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemagraph_core::catalog::{ColumnDataType, ColumnRef, TableName};
    use schemagraph_core::metadata::create_weak_association;

    fn catalog() -> Catalog {
        let mut customers = Table::new(TableName::new("SALES", "CUSTOMERS"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("PHOTO", ColumnDataType::new("BLOB"));
        customers.add_index("IDX_PHOTO", false, &["ID", "PHOTO"]).unwrap();
        let mut orders = Table::new(TableName::new("SALES", "ORDERS"))
            .with_column("ID", ColumnDataType::new("INTEGER"))
            .with_column("CUST_ID", ColumnDataType::new("INTEGER"))
            .with_column("ORDER", ColumnDataType::new("INTEGER"));
        orders.add_index("UQ_CUST", true, &["CUST_ID"]).unwrap();
        let mut catalog = Catalog::from_tables([customers, orders]).unwrap();

        let pk = ColumnRef::new(TableName::new("SALES", "CUSTOMERS"), "ID");
        let fk = ColumnRef::new(TableName::new("SALES", "ORDERS"), "CUST_ID");
        let declared = ForeignKey::new("FK_ORDERS_CUSTOMERS");
        catalog
            .add_foreign_key(declared.with_reference(pk.clone(), fk.clone()))
            .unwrap();
        create_weak_association(&mut catalog, &pk, &fk).unwrap();
        catalog.lookup_or_create_partial_table(&TableName::new("GEO", "REGIONS"));
        catalog
    }

    #[test]
    fn test_report_skips_partial_tables() {
        let catalog = catalog();
        let report = build_report(&catalog, &ReportOptions::default());
        let names: Vec<_> = report.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["SALES.CUSTOMERS", "SALES.ORDERS"]);

        let options = ReportOptions::default().with_show_partial_tables(true);
        assert_eq!(build_report(&catalog, &options).len(), 3);
    }

    #[test]
    fn test_relationships_and_cardinality() {
        let report = build_report(&catalog(), &ReportOptions::default());
        let orders = &report[1];

        assert_eq!(orders.columns[2].name, "\"ORDER\"");
        assert_eq!(orders.foreign_keys.len(), 1);
        assert_eq!(orders.foreign_keys[0].cardinality, "(0..1)");
        assert_eq!(orders.foreign_keys[0].referenced_table, "SALES.CUSTOMERS");
        assert_eq!(orders.weak_associations[0].name, "SC_8EB9F9B3_83BC0A27");
        assert_eq!(orders.weak_associations[0].columns, "CUST_ID");
        assert_eq!(orders.weak_associations[0].referenced_columns, "ID");
    }

    #[test]
    fn test_index_columns_omit_large_objects() {
        let catalog = catalog();

        let report = build_report(&catalog, &ReportOptions::default());
        assert_eq!(report[0].indexes[0].columns, "ID, PHOTO");

        let options = ReportOptions::default().with_omit_large_objects(true);
        let report = build_report(&catalog, &options);
        assert_eq!(report[0].indexes[0].columns, "ID");
    }
}
