//! Identifier quoting for generated text.
//!
//! Renderers never emit a raw table or column name; they pass it through
//! [`Identifiers::quote_name`], which applies the configured quoting strategy
//! and delimiters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// SQL:2003 reserved words, sorted for binary search.
const SQL_RESERVED_WORDS: &[&str] = &[
    "ABS", "ALL", "ALLOCATE", "ALTER", "AND", "ANY", "ARE", "ARRAY", "AS", "ASENSITIVE",
    "ASYMMETRIC", "AT", "ATOMIC", "AUTHORIZATION", "AVG", "BEGIN", "BETWEEN", "BIGINT", "BINARY",
    "BLOB", "BOOLEAN", "BOTH", "BY", "CALL", "CALLED", "CARDINALITY", "CASCADED", "CASE", "CAST",
    "CEIL", "CEILING", "CHAR", "CHARACTER", "CHARACTER_LENGTH", "CHAR_LENGTH", "CHECK", "CLOB",
    "CLOSE", "COALESCE", "COLLATE", "COLLECT", "COLUMN", "COMMIT", "CONDITION", "CONNECT",
    "CONSTRAINT", "CONVERT", "CORR", "CORRESPONDING", "COUNT", "COVAR_POP", "COVAR_SAMP",
    "CREATE", "CROSS", "CUBE", "CUME_DIST", "CURRENT", "CURRENT_DATE",
    "CURRENT_DEFAULT_TRANSFORM_GROUP", "CURRENT_PATH", "CURRENT_ROLE", "CURRENT_TIME",
    "CURRENT_TIMESTAMP", "CURRENT_TRANSFORM_GROUP_FOR_TYPE", "CURRENT_USER", "CURSOR", "CYCLE",
    "DATE", "DAY", "DEALLOCATE", "DEC", "DECIMAL", "DECLARE", "DEFAULT", "DELETE", "DENSE_RANK",
    "DEREF", "DESCRIBE", "DETERMINISTIC", "DISCONNECT", "DISTINCT", "DOUBLE", "DROP", "DYNAMIC",
    "EACH", "ELEMENT", "ELSE", "END", "END-EXEC", "ESCAPE", "EVERY", "EXCEPT", "EXEC", "EXECUTE",
    "EXISTS", "EXP", "EXTERNAL", "EXTRACT", "FALSE", "FETCH", "FILTER", "FLOAT", "FLOOR", "FOR",
    "FOREIGN", "FREE", "FROM", "FULL", "FUNCTION", "FUSION", "GET", "GLOBAL", "GRANT", "GROUP",
    "GROUPING", "HAVING", "HOLD", "HOUR", "IDENTITY", "IN", "INDICATOR", "INNER", "INOUT",
    "INSENSITIVE", "INSERT", "INT", "INTEGER", "INTERSECT", "INTERSECTION", "INTERVAL", "INTO",
    "IS", "JOIN", "LANGUAGE", "LARGE", "LATERAL", "LEADING", "LEFT", "LIKE", "LN", "LOCAL",
    "LOCALTIME", "LOCALTIMESTAMP", "LOWER", "MATCH", "MAX", "MEMBER", "MERGE", "METHOD", "MIN",
    "MINUTE", "MOD", "MODIFIES", "MODULE", "MONTH", "MULTISET", "NATIONAL", "NATURAL", "NCHAR",
    "NCLOB", "NEW", "NO", "NONE", "NORMALIZE", "NOT", "NULL", "NULLIF", "NUMERIC", "OCTET_LENGTH",
    "OF", "OLD", "ON", "ONLY", "OPEN", "OR", "ORDER", "OUT", "OUTER", "OVER", "OVERLAPS",
    "OVERLAY", "PARAMETER", "PARTITION", "PERCENTILE_CONT", "PERCENTILE_DISC", "PERCENT_RANK",
    "POSITION", "POWER", "PRECISION", "PREPARE", "PRIMARY", "PROCEDURE", "RANGE", "RANK", "READS",
    "REAL", "RECURSIVE", "REF", "REFERENCES", "REFERENCING", "REGR_AVGX", "REGR_AVGY",
    "REGR_COUNT", "REGR_INTERCEPT", "REGR_R2", "REGR_SLOPE", "REGR_SXX", "REGR_SXY", "REGR_SYY",
    "RELEASE", "RESULT", "RETURN", "RETURNS", "REVOKE", "RIGHT", "ROLLBACK", "ROLLUP", "ROW",
    "ROWS", "ROW_NUMBER", "SAVEPOINT", "SCOPE", "SCROLL", "SEARCH", "SECOND", "SELECT",
    "SENSITIVE", "SESSION_USER", "SET", "SIMILAR", "SMALLINT", "SOME", "SPECIFIC", "SPECIFICTYPE",
    "SQL", "SQLEXCEPTION", "SQLSTATE", "SQLWARNING", "SQRT", "START", "STATIC", "STDDEV_POP",
    "STDDEV_SAMP", "SUBMULTISET", "SUBSTRING", "SUM", "SYMMETRIC", "SYSTEM", "SYSTEM_USER",
    "TABLE", "TABLESAMPLE", "THEN", "TIME", "TIMESTAMP", "TIMEZONE_HOUR", "TIMEZONE_MINUTE", "TO",
    "TRAILING", "TRANSLATE", "TRANSLATION", "TREAT", "TRIGGER", "TRIM", "TRUE", "UESCAPE",
    "UNION", "UNIQUE", "UNKNOWN", "UNNEST", "UPDATE", "UPPER", "USER", "USING", "VALUE", "VALUES",
    "VARCHAR", "VARYING", "VAR_POP", "VAR_SAMP", "WHEN", "WHENEVER", "WHERE", "WIDTH_BUCKET",
    "WINDOW", "WITH", "WITHIN", "WITHOUT", "YEAR",
];

/// When to wrap an identifier in quote delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IdentifierQuotingStrategy {
    /// Never quote.
    QuoteNone,
    /// Quote names with special characters, and reserved words.
    #[default]
    QuoteIfSpecial,
    /// Always quote.
    QuoteAll,
}

impl IdentifierQuotingStrategy {
    /// Parse a strategy name. Unrecognized names fall back to
    /// [`IdentifierQuotingStrategy::QuoteNone`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "quote_if_special"
            | "quote_if_special_characters"
            | "quote_if_special_characters_and_reserved_words" => {
                IdentifierQuotingStrategy::QuoteIfSpecial
            }
            "quote_all" | "quote_always" => IdentifierQuotingStrategy::QuoteAll,
            _ => IdentifierQuotingStrategy::QuoteNone,
        }
    }

    /// Canonical strategy name.
    pub fn as_str(&self) -> &'static str {
        match self {
            IdentifierQuotingStrategy::QuoteNone => "quote_none",
            IdentifierQuotingStrategy::QuoteIfSpecial => "quote_if_special",
            IdentifierQuotingStrategy::QuoteAll => "quote_all",
        }
    }
}

impl fmt::Display for IdentifierQuotingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for IdentifierQuotingStrategy {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for IdentifierQuotingStrategy {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<IdentifierQuotingStrategy> for String {
    fn from(strategy: IdentifierQuotingStrategy) -> Self {
        strategy.as_str().to_string()
    }
}

/// Quoting configuration: strategy, delimiters and extra reserved words.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identifiers {
    /// When to quote.
    pub quoting_strategy: IdentifierQuotingStrategy,
    /// Delimiter string. Two distinct characters (such as `[]`) are an
    /// open/close pair; anything else is used on both sides.
    pub quote_string: String,
    /// Reserved words beyond the SQL standard list, matched case-insensitively.
    pub reserved_words: BTreeSet<String>,
}

impl Default for Identifiers {
    fn default() -> Self {
        Self {
            quoting_strategy: IdentifierQuotingStrategy::QuoteIfSpecial,
            quote_string: "\"".to_string(),
            reserved_words: BTreeSet::new(),
        }
    }
}

impl Identifiers {
    /// Create a configuration with the given strategy and quote string.
    pub fn new(
        quoting_strategy: IdentifierQuotingStrategy,
        quote_string: impl Into<String>,
    ) -> Self {
        Self {
            quoting_strategy,
            quote_string: quote_string.into(),
            reserved_words: BTreeSet::new(),
        }
    }

    /// Set the quoting strategy.
    pub fn with_quoting_strategy(mut self, quoting_strategy: IdentifierQuotingStrategy) -> Self {
        self.quoting_strategy = quoting_strategy;
        self
    }

    /// Set the quote string.
    pub fn with_quote_string(mut self, quote_string: impl Into<String>) -> Self {
        self.quote_string = quote_string.into();
        self
    }

    /// Add database-specific reserved words.
    pub fn with_reserved_words(
        mut self,
        words: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.reserved_words
            .extend(words.into_iter().map(|w| w.into().to_ascii_uppercase()));
        self
    }

    /// Quote a name according to the configured strategy.
    pub fn quote_name(&self, name: &str) -> String {
        let quote = match self.quoting_strategy {
            IdentifierQuotingStrategy::QuoteNone => false,
            IdentifierQuotingStrategy::QuoteIfSpecial => self.is_to_be_quoted(name),
            IdentifierQuotingStrategy::QuoteAll => true,
        };

        if quote {
            let (open, close) = self.delimiters();
            format!("{}{}{}", open, name, close)
        } else {
            name.to_string()
        }
    }

    /// Check if a name needs quoting: it is empty, has characters outside
    /// the unquoted set, or is a reserved word.
    pub fn is_to_be_quoted(&self, name: &str) -> bool {
        !is_plain_identifier(name) || self.is_reserved_word(name)
    }

    /// Check if a name is a reserved word, ignoring case.
    pub fn is_reserved_word(&self, name: &str) -> bool {
        let upper = name.to_ascii_uppercase();
        SQL_RESERVED_WORDS.binary_search(&upper.as_str()).is_ok()
            || self.reserved_words.contains(&upper)
    }

    fn delimiters(&self) -> (&str, &str) {
        let mut chars = self.quote_string.char_indices();
        match (chars.next(), chars.next(), chars.next()) {
            (Some((_, open)), Some((split, close)), None) if open != close => {
                (&self.quote_string[..split], &self.quote_string[split..])
            }
            _ => (&self.quote_string, &self.quote_string),
        }
    }
}

fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_words_sorted() {
        assert!(SQL_RESERVED_WORDS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_quote_none() {
        let ids = Identifiers::new(IdentifierQuotingStrategy::QuoteNone, "\"");
        assert_eq!(ids.quote_name("ORDER"), "ORDER");
        assert_eq!(ids.quote_name("my column"), "my column");
    }

    #[test]
    fn test_quote_all() {
        let ids = Identifiers::new(IdentifierQuotingStrategy::QuoteAll, "`");
        assert_eq!(ids.quote_name("ID"), "`ID`");
    }

    #[test]
    fn test_quote_if_special() {
        let ids = Identifiers::default();

        assert_eq!(ids.quote_name("CUST_ID"), "CUST_ID");
        assert_eq!(ids.quote_name("_hidden"), "_hidden");
        assert_eq!(ids.quote_name("my column"), "\"my column\"");
        assert_eq!(ids.quote_name("1ST"), "\"1ST\"");
        assert_eq!(ids.quote_name("order"), "\"order\"");
        assert_eq!(ids.quote_name("SELECT"), "\"SELECT\"");
        assert_eq!(ids.quote_name(""), "\"\"");
    }

    #[test]
    fn test_extra_reserved_words() {
        let ids = Identifiers::default().with_reserved_words(["limit"]);
        assert_eq!(ids.quote_name("LIMIT"), "\"LIMIT\"");
        assert_eq!(ids.quote_name("OFFSET"), "OFFSET");
    }

    #[test]
    fn test_bracket_delimiters() {
        let ids = Identifiers::new(IdentifierQuotingStrategy::QuoteAll, "[]");
        assert_eq!(ids.quote_name("Order Details"), "[Order Details]");

        let doubled = Identifiers::new(IdentifierQuotingStrategy::QuoteAll, "''");
        assert_eq!(doubled.quote_name("A"), "''A''");
    }

    #[test]
    fn test_strategy_names() {
        assert_eq!(
            IdentifierQuotingStrategy::from_name("quote_all"),
            IdentifierQuotingStrategy::QuoteAll
        );
        assert_eq!(
            IdentifierQuotingStrategy::from_name("QUOTE_IF_SPECIAL_CHARACTERS"),
            IdentifierQuotingStrategy::QuoteIfSpecial
        );
        assert_eq!(
            IdentifierQuotingStrategy::from_name("quote_sometimes"),
            IdentifierQuotingStrategy::QuoteNone
        );
    }

    #[test]
    fn test_identifiers_from_json() {
        let ids: Identifiers =
            serde_json::from_str(r#"{"quoting_strategy": "bogus", "quote_string": "`"}"#).unwrap();
        assert_eq!(ids.quoting_strategy, IdentifierQuotingStrategy::QuoteNone);
        assert_eq!(ids.quote_string, "`");

        let defaults: Identifiers = serde_json::from_str("{}").unwrap();
        assert_eq!(defaults, Identifiers::default());
    }
}
