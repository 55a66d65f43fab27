//! SQL dialect of a connection.
//!
//! Statements built by [`Query`](crate::Query) are dialect neutral apart
//! from their placeholders. Generated identifiers and the administrative
//! statements in [`crate::schema`] are rendered per dialect.

use crate::error::{DbError, DbResult};
use crate::params::PlaceholderStyle;

/// Dialect spoken by a [`Connection`](crate::Connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// MySQL / MariaDB: backtick identifiers, `?` placeholders.
    MySql,
    /// PostgreSQL: double-quoted identifiers, `$n` placeholders.
    Postgres,
}

impl Dialect {
    pub fn placeholder_style(self) -> PlaceholderStyle {
        match self {
            Dialect::MySql => PlaceholderStyle::Question,
            Dialect::Postgres => PlaceholderStyle::Dollar,
        }
    }

    /// Quote an identifier, doubling any embedded quote character.
    ///
    /// Empty names and names containing NUL are rejected.
    pub fn quote_ident(self, name: &str) -> DbResult<String> {
        if name.trim().is_empty() {
            return Err(DbError::config("identifier cannot be empty"));
        }
        if name.contains('\0') {
            return Err(DbError::config("identifier cannot contain NUL character"));
        }
        Ok(match self {
            Dialect::MySql => format!("`{}`", name.replace('`', "``")),
            Dialect::Postgres => format!("\"{}\"", name.replace('"', "\"\"")),
        })
    }

    /// Quote a string literal for statements that cannot take parameters.
    pub fn quote_literal(self, value: &str) -> String {
        match self {
            Dialect::MySql => format!("'{}'", value.replace('\\', "\\\\").replace('\'', "''")),
            Dialect::Postgres => format!("'{}'", value.replace('\'', "''")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_per_dialect() {
        assert_eq!(Dialect::MySql.quote_ident("we`ird").unwrap(), "`we``ird`");
        assert_eq!(Dialect::Postgres.quote_ident("say \"hi\"").unwrap(), "\"say \"\"hi\"\"\"");
        assert!(Dialect::Postgres.quote_ident(" ").unwrap_err().is_config());
        assert!(Dialect::MySql.quote_ident("a\0b").unwrap_err().is_config());
    }

    #[test]
    fn literals_per_dialect() {
        assert_eq!(Dialect::MySql.quote_literal(r"it's a\b"), r"'it''s a\\b'");
        assert_eq!(Dialect::Postgres.quote_literal(r"it's a\b"), r"'it''s a\b'");
    }

    #[test]
    fn placeholder_styles() {
        assert_eq!(Dialect::MySql.placeholder_style(), PlaceholderStyle::Question);
        assert_eq!(Dialect::Postgres.placeholder_style(), PlaceholderStyle::Dollar);
    }
}
