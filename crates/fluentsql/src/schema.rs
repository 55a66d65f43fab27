//! Administrative helpers: databases, tables, columns and users.
//!
//! Each helper has a pure renderer taking the [`Dialect`] so the text can be
//! inspected without a connection, and a matching method on [`Db`] that
//! renders for the connection's dialect and executes it. MySQL output is
//! the reference form (backticks, `ENGINE=InnoDB`, `mysql.user`);
//! PostgreSQL gets the equivalent statements against its own catalogs.
//!
//! Column types are given by the portable names accepted by
//! [`ColumnType::from_type_name`]:
//!
//! | name       | MySQL           | PostgreSQL      |
//! |------------|-----------------|-----------------|
//! | `string`   | `varchar(100)`  | `varchar(100)`  |
//! | `int32`    | `int(11)`       | `integer`       |
//! | `int64`    | `bigint(11)`    | `bigint`        |
//! | `decimal`  | `decimal(11,5)` | `decimal(11,5)` |
//! | `boolean`  | `bit(1)`        | `boolean`       |
//! | `datetime` | `datetime`      | `timestamp`     |

use crate::client::Connector;
use crate::db::Db;
use crate::dialect::Dialect;
use crate::entity::FromRecord;
use crate::error::{DbError, DbResult};
use crate::params::Params;
use crate::record::Record;

/// Portable column type of a header field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    String,
    Int32,
    Int64,
    Decimal,
    Boolean,
    DateTime,
}

impl ColumnType {
    /// Look up a portable type name (case-insensitive).
    pub fn from_type_name(name: &str) -> DbResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "string" => Ok(Self::String),
            "int32" => Ok(Self::Int32),
            "int64" => Ok(Self::Int64),
            "decimal" => Ok(Self::Decimal),
            "boolean" => Ok(Self::Boolean),
            "datetime" => Ok(Self::DateTime),
            other => Err(DbError::config(format!("unknown column type '{other}'"))),
        }
    }

    /// SQL column type in `dialect`.
    pub fn sql_type(self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (Self::String, _) => "varchar(100)",
            (Self::Decimal, _) => "decimal(11,5)",
            (Self::Int32, Dialect::MySql) => "int(11)",
            (Self::Int32, Dialect::Postgres) => "integer",
            (Self::Int64, Dialect::MySql) => "bigint(11)",
            (Self::Int64, Dialect::Postgres) => "bigint",
            (Self::Boolean, Dialect::MySql) => "bit(1)",
            (Self::Boolean, Dialect::Postgres) => "boolean",
            (Self::DateTime, Dialect::MySql) => "datetime",
            (Self::DateTime, Dialect::Postgres) => "timestamp",
        }
    }
}

/// A column to create: name plus portable type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }

    /// Parse a `name?type` header token.
    pub fn parse(token: &str) -> DbResult<Self> {
        let (name, type_name) = token
            .split_once('?')
            .ok_or_else(|| DbError::config(format!("header field '{token}' is not 'name?type'")))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DbError::config(format!("header field '{token}' has no name")));
        }
        Ok(Self::new(name, ColumnType::from_type_name(type_name)?))
    }

    /// Column definition, e.g. `` `age` int(11) DEFAULT NULL ``.
    pub fn definition(&self, dialect: Dialect) -> DbResult<String> {
        Ok(format!(
            "{} {} DEFAULT NULL",
            dialect.quote_ident(&self.name)?,
            self.column_type.sql_type(dialect)
        ))
    }
}

/// One row of `information_schema.COLUMNS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub column_name: String,
    pub ordinal_position: i64,
    pub data_type: String,
    pub column_type: String,
}

impl FromRecord for ColumnDefinition {
    fn from_record(record: &Record) -> DbResult<Self> {
        Ok(Self {
            column_name: record.try_get("column_name")?,
            ordinal_position: record.try_get("ordinal_position")?,
            data_type: record.try_get("data_type")?,
            column_type: record.try_get("column_type")?,
        })
    }
}

/// Current layout of a table, columns in ordinal order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableStructure {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

impl TableStructure {
    pub fn column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns.iter().find(|c| c.column_name == name)
    }
}

// ==================== Renderers ====================

pub fn create_database_sql(dialect: Dialect, name: &str) -> DbResult<String> {
    let name = dialect.quote_ident(name)?;
    Ok(match dialect {
        Dialect::MySql => format!("CREATE DATABASE {name} DEFAULT CHARACTER SET latin1"),
        Dialect::Postgres => format!("CREATE DATABASE {name}"),
    })
}

pub fn drop_table_sql(dialect: Dialect, table: &str) -> DbResult<String> {
    Ok(format!("DROP TABLE {}", dialect.quote_ident(table)?))
}

/// `ALTER TABLE .. ADD COLUMN`, optionally positioned after `after`.
///
/// PostgreSQL cannot position columns, so `after` is a
/// [`DbError::Config`] there.
pub fn add_column_sql(
    dialect: Dialect,
    column: &ColumnSpec,
    after: Option<&str>,
    table: &str,
) -> DbResult<String> {
    let mut sql = format!(
        "ALTER TABLE {} ADD COLUMN {}",
        dialect.quote_ident(table)?,
        column.definition(dialect)?
    );
    if let Some(after) = after.filter(|a| !a.trim().is_empty()) {
        if dialect == Dialect::Postgres {
            return Err(DbError::config(format!(
                "cannot place column '{}' after '{after}': PostgreSQL appends new columns",
                column.name
            )));
        }
        sql.push_str(" AFTER ");
        sql.push_str(&dialect.quote_ident(after)?);
    }
    Ok(sql)
}

pub fn drop_column_sql(dialect: Dialect, table: &str, column: &str) -> DbResult<String> {
    Ok(format!(
        "ALTER TABLE {} DROP COLUMN {}",
        dialect.quote_ident(table)?,
        dialect.quote_ident(column)?
    ))
}

/// Render `CREATE TABLE` from a header of comma-separated `name?type`
/// tokens.
///
/// `key` is empty (no primary key), a single column, or a comma-separated
/// composite key. Every key column must appear in the header.
pub fn create_table_sql(dialect: Dialect, table: &str, header: &str, key: &str) -> DbResult<String> {
    let columns = header
        .split(',')
        .filter(|t| !t.trim().is_empty())
        .map(ColumnSpec::parse)
        .collect::<DbResult<Vec<_>>>()?;
    if columns.is_empty() {
        return Err(DbError::config(format!("no columns given for table '{table}'")));
    }

    let mut parts = columns
        .iter()
        .map(|c| c.definition(dialect))
        .collect::<DbResult<Vec<_>>>()?;

    let key_columns: Vec<&str> = key
        .split(',')
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .collect();
    if !key_columns.is_empty() {
        let quoted = key_columns
            .iter()
            .map(|k| {
                if columns.iter().any(|c| c.name == *k) {
                    dialect.quote_ident(k)
                } else {
                    Err(DbError::config(format!("key column '{k}' is not in the header")))
                }
            })
            .collect::<DbResult<Vec<_>>>()?;
        parts.push(format!("PRIMARY KEY ({})", quoted.join(",")));
    }

    let table = dialect.quote_ident(table)?;
    let parts = parts.join(", ");
    Ok(match dialect {
        Dialect::MySql => {
            format!("CREATE TABLE {table} ({parts}) ENGINE=InnoDB DEFAULT CHARSET=latin1")
        }
        Dialect::Postgres => format!("CREATE TABLE {table} ({parts})"),
    })
}

pub fn create_user_sql(dialect: Dialect, user: &str, password: &str) -> DbResult<String> {
    if user.trim().is_empty() {
        return Err(DbError::config("user name cannot be empty"));
    }
    Ok(match dialect {
        Dialect::MySql => format!(
            "CREATE USER {}@'%' IDENTIFIED BY {}",
            dialect.quote_literal(user),
            dialect.quote_literal(password)
        ),
        Dialect::Postgres => format!(
            "CREATE ROLE {} LOGIN PASSWORD {}",
            dialect.quote_ident(user)?,
            dialect.quote_literal(password)
        ),
    })
}

pub fn grant_privileges_sql(dialect: Dialect, database: &str, user: &str) -> DbResult<String> {
    if user.trim().is_empty() {
        return Err(DbError::config("user name cannot be empty"));
    }
    let database = dialect.quote_ident(database)?;
    Ok(match dialect {
        Dialect::MySql => format!(
            "GRANT ALL PRIVILEGES ON {database}.* TO {}@'%' WITH GRANT OPTION",
            dialect.quote_literal(user)
        ),
        Dialect::Postgres => format!(
            "GRANT ALL PRIVILEGES ON DATABASE {database} TO {} WITH GRANT OPTION",
            dialect.quote_ident(user)?
        ),
    })
}

fn list_databases_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => "SHOW DATABASES",
        Dialect::Postgres => {
            "SELECT datname::text AS datname FROM pg_database WHERE NOT datistemplate ORDER BY datname"
        }
    }
}

fn list_tables_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => {
            "SELECT TABLE_NAME AS table_name FROM information_schema.TABLES WHERE TABLE_SCHEMA = :schema"
        }
        Dialect::Postgres => {
            "SELECT table_name::text AS table_name FROM information_schema.tables \
             WHERE table_catalog::text = :schema \
             AND table_schema NOT IN ('pg_catalog', 'information_schema') ORDER BY table_name"
        }
    }
}

fn table_structure_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => {
            "SELECT COLUMN_NAME AS column_name, ORDINAL_POSITION AS ordinal_position, \
             DATA_TYPE AS data_type, COLUMN_TYPE AS column_type FROM information_schema.COLUMNS \
             WHERE TABLE_SCHEMA = :schema AND TABLE_NAME = :table ORDER BY ORDINAL_POSITION"
        }
        Dialect::Postgres => {
            "SELECT column_name::text AS column_name, ordinal_position::bigint AS ordinal_position, \
             data_type::text AS data_type, udt_name::text AS column_type FROM information_schema.columns \
             WHERE table_catalog::text = :schema AND table_name::text = :table \
             AND table_schema NOT IN ('pg_catalog', 'information_schema') ORDER BY ordinal_position"
        }
    }
}

fn user_exists_sql(dialect: Dialect) -> &'static str {
    match dialect {
        Dialect::MySql => "SELECT User FROM mysql.user WHERE User = :user LIMIT 1",
        Dialect::Postgres => "SELECT rolname::text FROM pg_roles WHERE rolname = :user LIMIT 1",
    }
}

// ==================== Execution ====================

impl<K: Connector> Db<K> {
    pub async fn create_database(&self, name: &str) -> DbResult<()> {
        let sql = create_database_sql(self.dialect().await?, name)?;
        self.execute(&sql, &Params::new()).await.map(drop)
    }

    /// Names of every database visible to the connection.
    pub async fn list_databases(&self) -> DbResult<Vec<String>> {
        let sql = list_databases_sql(self.dialect().await?);
        self.first_column(sql, &Params::new()).await
    }

    pub async fn database_exists(&self, name: &str) -> DbResult<bool> {
        Ok(self.list_databases().await?.iter().any(|d| d == name))
    }

    /// Names of the tables in `database`.
    pub async fn list_tables(&self, database: &str) -> DbResult<Vec<String>> {
        let sql = list_tables_sql(self.dialect().await?);
        self.first_column(sql, &Params::new().with("schema", database))
            .await
    }

    pub async fn table_exists(&self, database: &str, table: &str) -> DbResult<bool> {
        Ok(self.list_tables(database).await?.iter().any(|t| t == table))
    }

    /// Column layout of `database.table`.
    ///
    /// A missing table yields a structure with no columns.
    pub async fn table_structure(&self, database: &str, table: &str) -> DbResult<TableStructure> {
        let sql = table_structure_sql(self.dialect().await?);
        let params = Params::new()
            .with("schema", database)
            .with("table", table);
        let columns = self
            .fetch_records(sql, &params)
            .await?
            .records
            .iter()
            .map(ColumnDefinition::from_record)
            .collect::<DbResult<Vec<_>>>()?;

        Ok(TableStructure {
            name: table.to_string(),
            columns,
        })
    }

    pub async fn drop_table(&self, table: &str) -> DbResult<()> {
        let sql = drop_table_sql(self.dialect().await?, table)?;
        self.execute(&sql, &Params::new()).await.map(drop)
    }

    pub async fn add_column(
        &self,
        column: &ColumnSpec,
        after: Option<&str>,
        table: &str,
    ) -> DbResult<()> {
        let sql = add_column_sql(self.dialect().await?, column, after, table)?;
        self.execute(&sql, &Params::new()).await.map(drop)
    }

    pub async fn drop_column(&self, table: &str, column: &str) -> DbResult<()> {
        let sql = drop_column_sql(self.dialect().await?, table, column)?;
        self.execute(&sql, &Params::new()).await.map(drop)
    }

    /// Create `table` from a `name?type,...` header; see [`create_table_sql`].
    pub async fn create_table_from_header(
        &self,
        table: &str,
        header: &str,
        key: &str,
    ) -> DbResult<()> {
        let sql = create_table_sql(self.dialect().await?, table, header, key)?;
        self.execute(&sql, &Params::new()).await.map(drop)
    }

    pub async fn user_exists(&self, user: &str) -> DbResult<bool> {
        let sql = user_exists_sql(self.dialect().await?);
        let rows = self
            .fetch_tuples(sql, &Params::new().with("user", user))
            .await?;
        Ok(!rows.is_empty())
    }

    /// Create `user` unless it already exists. Returns whether it was created.
    pub async fn create_user(&self, user: &str, password: &str) -> DbResult<bool> {
        if self.user_exists(user).await? {
            return Ok(false);
        }
        let sql = create_user_sql(self.dialect().await?, user, password)?;
        self.execute(&sql, &Params::new()).await?;
        Ok(true)
    }

    /// Grant every privilege on `database` to `user`.
    pub async fn grant_privileges(&self, database: &str, user: &str) -> DbResult<()> {
        let sql = grant_privileges_sql(self.dialect().await?, database, user)?;
        self.execute(&sql, &Params::new()).await.map(drop)
    }

    async fn first_column(&self, sql: &str, params: &Params) -> DbResult<Vec<String>> {
        let records = self.fetch_records(sql, params).await?;
        let Some(column) = records.columns.first() else {
            return Ok(Vec::new());
        };
        records
            .records
            .iter()
            .map(|record| record.try_get::<String>(column))
            .collect()
    }
}
