//! Column data type classification.

use serde::{Deserialize, Serialize};

/// Broad grouping of SQL data types.
///
/// Renderers only care about the group, not the vendor type name. Large
/// objects and generic objects are dropped from display column lists on
/// request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlTypeGroup {
    /// Fixed and variable length binary.
    Binary,
    /// Bit and boolean.
    Bit,
    /// Character strings.
    Character,
    /// Row identifiers.
    Id,
    /// Exact integral numbers.
    Integer,
    /// BLOB, CLOB and friends.
    LargeObject,
    /// Opaque or vendor object types.
    Object,
    /// Approximate and decimal numbers.
    Real,
    /// Reference and array types.
    Reference,
    /// Dates, times and intervals.
    Temporal,
    /// Datalink.
    Url,
    /// XML documents.
    Xml,
    /// Anything not classified.
    #[default]
    Unknown,
}

impl SqlTypeGroup {
    /// Classify a database type name.
    ///
    /// Parameters such as `VARCHAR(20)` are ignored; unknown names map to
    /// [`SqlTypeGroup::Unknown`].
    pub fn from_type_name(type_name: &str) -> Self {
        let base = type_name
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();

        match base.as_str() {
            "BINARY" | "VARBINARY" | "LONGVARBINARY" | "RAW" | "LONG RAW" => SqlTypeGroup::Binary,
            "BIT" | "BOOLEAN" | "BOOL" => SqlTypeGroup::Bit,
            "CHAR" | "CHARACTER" | "VARCHAR" | "CHARACTER VARYING" | "NCHAR" | "NVARCHAR"
            | "VARCHAR2" | "NVARCHAR2" | "LONGVARCHAR" | "LONGNVARCHAR" | "STRING" => {
                SqlTypeGroup::Character
            }
            "ROWID" | "UROWID" => SqlTypeGroup::Id,
            "TINYINT" | "SMALLINT" | "INT" | "INTEGER" | "BIGINT" | "SERIAL" | "BIGSERIAL"
            | "MEDIUMINT" => SqlTypeGroup::Integer,
            "BLOB" | "CLOB" | "NCLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "TINYTEXT"
            | "MEDIUMTEXT" | "LONGTEXT" | "TEXT" | "NTEXT" | "IMAGE" | "BYTEA" => {
                SqlTypeGroup::LargeObject
            }
            "OBJECT" | "JAVA_OBJECT" | "STRUCT" | "DISTINCT" | "OTHER" | "SQL_VARIANT" => {
                SqlTypeGroup::Object
            }
            "REAL" | "FLOAT" | "DOUBLE" | "DOUBLE PRECISION" | "DECIMAL" | "NUMERIC"
            | "NUMBER" | "MONEY" => SqlTypeGroup::Real,
            "REF" | "ARRAY" | "REF_CURSOR" => SqlTypeGroup::Reference,
            "DATE" | "TIME" | "TIMESTAMP" | "DATETIME" | "INTERVAL" | "TIMESTAMPTZ"
            | "TIME WITH TIME ZONE" | "TIMESTAMP WITH TIME ZONE" | "YEAR" => {
                SqlTypeGroup::Temporal
            }
            "DATALINK" => SqlTypeGroup::Url,
            "XML" | "SQLXML" | "XMLTYPE" => SqlTypeGroup::Xml,
            _ => SqlTypeGroup::Unknown,
        }
    }

    /// Check if columns of this group are left out of display lists when
    /// large objects are omitted.
    pub fn is_large_object(&self) -> bool {
        matches!(self, SqlTypeGroup::LargeObject | SqlTypeGroup::Object)
    }
}

/// A column's data type: the vendor name plus its group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDataType {
    /// Database-specific type name.
    pub name: String,
    /// Classification used by formatters.
    pub group: SqlTypeGroup,
}

impl ColumnDataType {
    /// Create a data type, classifying it from its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let group = SqlTypeGroup::from_type_name(&name);
        Self { name, group }
    }

    /// Create a data type with an explicit group.
    pub fn with_group(name: impl Into<String>, group: SqlTypeGroup) -> Self {
        Self {
            name: name.into(),
            group,
        }
    }

    /// Placeholder type for columns of partial tables.
    pub fn unknown() -> Self {
        Self {
            name: String::new(),
            group: SqlTypeGroup::Unknown,
        }
    }
}

impl Default for ColumnDataType {
    fn default() -> Self {
        Self::unknown()
    }
}
