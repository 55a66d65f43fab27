//! Statement builder.
//!
//! A [`Query`] is a plain value describing one statement. It is configured
//! with chained calls and handed to a terminal operation on
//! [`Db`](crate::Db), which consumes it; nothing carries over to the next
//! statement.
//!
//! ```ignore
//! use fluentsql::{params, Query};
//!
//! let q = Query::table("users")
//!     .filter("`id` = :id", params! { "id" => 5 })
//!     .sort(["name", "age"])
//!     .limit(10);
//! let user: User = db.fetch_one(q).await?;
//! ```

use crate::params::{FieldMap, Params};

/// WHERE fragment and the named parameters it refers to.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    pub clause: String,
    pub params: Params,
}

/// Pending field map of a write statement.
#[derive(Clone, Debug, PartialEq)]
pub enum Mutation {
    Insert(FieldMap),
    Update(FieldMap),
}

/// Kind of statement a [`Query`] renders to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatementKind {
    Select,
    Insert,
    Update,
    /// Nothing configured; renders to an empty string.
    Empty,
}

/// Configuration of a single SELECT, INSERT or UPDATE statement.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Query {
    table: String,
    select: Option<String>,
    filter: Option<Filter>,
    sort: Vec<String>,
    limit: Option<u64>,
    mutation: Option<Mutation>,
    allow_unfiltered_update: bool,
}

impl Query {
    /// Create an empty query (no table).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a query against `table`.
    pub fn table(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Set the selected-columns expression, e.g. `"*"` or `"id, name"`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        let columns = columns.into();
        self.select = (!columns.is_empty()).then_some(columns);
        self
    }

    /// Set the WHERE fragment (inserted verbatim) and its named parameters.
    pub fn filter(mut self, clause: impl Into<String>, params: Params) -> Self {
        self.filter = Some(Filter {
            clause: clause.into(),
            params,
        });
        self
    }

    /// Set the ORDER BY columns; order is preserved.
    pub fn sort<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set LIMIT. `0` clears it.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = (n > 0).then_some(n);
        self
    }

    /// Stage an INSERT of `fields`.
    pub fn values(mut self, fields: FieldMap) -> Self {
        self.mutation = Some(Mutation::Insert(fields));
        self
    }

    /// Stage an UPDATE setting `fields`.
    pub fn set(mut self, fields: FieldMap) -> Self {
        self.mutation = Some(Mutation::Update(fields));
        self
    }

    /// Allow an UPDATE of this query to run without a WHERE clause.
    pub fn disable_safety(mut self) -> Self {
        self.allow_unfiltered_update = true;
        self
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn selected(&self) -> Option<&str> {
        self.select.as_deref()
    }

    /// The WHERE fragment, if one is set and non-blank.
    pub fn filter_clause(&self) -> Option<&str> {
        self.filter
            .as_ref()
            .map(|f| f.clause.as_str())
            .filter(|c| !c.trim().is_empty())
    }

    pub fn filter_params(&self) -> Option<&Params> {
        self.filter.as_ref().map(|f| &f.params)
    }

    pub fn sort_columns(&self) -> &[String] {
        &self.sort
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn mutation(&self) -> Option<&Mutation> {
        self.mutation.as_ref()
    }

    pub fn safety_disabled(&self) -> bool {
        self.allow_unfiltered_update
    }

    fn insert_fields(&self) -> Option<&FieldMap> {
        match &self.mutation {
            Some(Mutation::Insert(f)) if !f.is_empty() => Some(f),
            _ => None,
        }
    }

    fn update_fields(&self) -> Option<&FieldMap> {
        match &self.mutation {
            Some(Mutation::Update(f)) if !f.is_empty() => Some(f),
            _ => None,
        }
    }

    /// Which statement [`Query::to_sql`] renders: a select wins, then
    /// pending insert fields, then pending update fields.
    pub fn kind(&self) -> StatementKind {
        if self.select.is_some() {
            StatementKind::Select
        } else if self.insert_fields().is_some() {
            StatementKind::Insert
        } else if self.update_fields().is_some() {
            StatementKind::Update
        } else {
            StatementKind::Empty
        }
    }

    /// Render the statement; empty when nothing is configured.
    pub fn to_sql(&self) -> String {
        match self.kind() {
            StatementKind::Select => self.build_select(),
            StatementKind::Insert => self.build_insert(),
            StatementKind::Update => self.build_update(),
            StatementKind::Empty => String::new(),
        }
    }

    /// Named parameters the rendered statement is executed with.
    ///
    /// For UPDATE the filter parameters are merged over the SET fields.
    pub fn bind_params(&self) -> Params {
        let filter = self.filter_params();
        match self.kind() {
            StatementKind::Select => filter.cloned().unwrap_or_default(),
            StatementKind::Insert => self.insert_fields().cloned().unwrap_or_default(),
            StatementKind::Update => {
                let mut params = self.update_fields().cloned().unwrap_or_default();
                if let Some(filter) = filter {
                    params.merge(filter);
                }
                params
            }
            StatementKind::Empty => Params::new(),
        }
    }

    /// Prepare for a fetch: the statement is always a SELECT, defaulting
    /// the column list to `*`.
    pub(crate) fn for_fetch(mut self) -> Self {
        if self.select.is_none() {
            self.select = Some("*".to_string());
        }
        self.mutation = None;
        self
    }

    /// Prepare for a write: the mutation replaces any select.
    pub(crate) fn for_mutation(mut self, mutation: Mutation) -> Self {
        self.select = None;
        self.mutation = Some(mutation);
        self
    }

    fn build_select(&self) -> String {
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.select.as_deref().unwrap_or("*"),
            self.table
        );

        if let Some(clause) = self.filter_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }

        if !self.sort.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&self.sort.join(","));
        }

        if let Some(n) = self.limit {
            sql.push_str(&format!(" LIMIT {n}"));
        }

        sql
    }

    fn build_insert(&self) -> String {
        let Some(fields) = self.insert_fields() else {
            return String::new();
        };
        let cols: Vec<&str> = fields.keys().collect();
        let placeholders: Vec<String> = cols.iter().map(|c| format!(":{c}")).collect();

        format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            cols.join(","),
            placeholders.join(",")
        )
    }

    fn build_update(&self) -> String {
        let Some(fields) = self.update_fields() else {
            return String::new();
        };
        let sets: Vec<String> = fields.keys().map(|c| format!("{c}=:{c}")).collect();

        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        if let Some(clause) = self.filter_clause() {
            sql.push_str(" WHERE ");
            sql.push_str(clause);
        }
        sql
    }
}

#[cfg(test)]
mod tests;
