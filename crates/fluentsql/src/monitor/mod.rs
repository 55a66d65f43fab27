//! Hooks into statement execution.
//!
//! Every statement [`Db`](crate::Db) sends goes through the configured
//! [`QueryHook`]: `before_query` may abort it, `after_query` observes the
//! outcome and timing.
//!
//! ```rust,ignore
//! use fluentsql::monitor::{HookAction, QueryContext, QueryHook, QueryType};
//!
//! struct ReadOnly;
//!
//! impl QueryHook for ReadOnly {
//!     fn before_query(&self, ctx: &QueryContext) -> HookAction {
//!         if ctx.query_type == QueryType::Select {
//!             HookAction::Continue
//!         } else {
//!             HookAction::Abort("read-only session".into())
//!         }
//!     }
//! }
//!
//! let db = Db::new(dsn).with_hook(ReadOnly);
//! ```

#[cfg(feature = "tracing")]
mod tracing_hook;

#[cfg(feature = "tracing")]
pub use tracing_hook::TracingSqlHook;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// The type of SQL operation being performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    /// SELECT / SHOW query
    Select,
    /// INSERT statement
    Insert,
    /// UPDATE statement
    Update,
    /// Other SQL (DDL, DCL, custom)
    Other,
}

impl QueryType {
    /// Detect query type from the leading keyword of a SQL string.
    pub fn from_sql(sql: &str) -> Self {
        let keyword = sql
            .trim_start_matches(|c: char| c.is_whitespace() || c == '(')
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or_default();

        if keyword.eq_ignore_ascii_case("SELECT") || keyword.eq_ignore_ascii_case("SHOW") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else {
            QueryType::Other
        }
    }
}

/// Context information about the statement being executed.
#[derive(Debug, Clone)]
pub struct QueryContext {
    /// SQL with `:name` placeholders, as rendered by the builder.
    pub canonical_sql: String,
    /// SQL actually sent to the driver (positional placeholders).
    pub exec_sql: String,
    /// Number of positional parameters bound.
    pub param_count: usize,
    /// Detected query type.
    pub query_type: QueryType,
    /// Optional label from [`DbConfig::tag`](crate::DbConfig::tag).
    pub tag: Option<String>,
}

impl QueryContext {
    /// Create a new query context.
    pub fn new(canonical_sql: &str, exec_sql: &str, param_count: usize) -> Self {
        Self {
            canonical_sql: canonical_sql.to_string(),
            exec_sql: exec_sql.to_string(),
            param_count,
            query_type: QueryType::from_sql(canonical_sql),
            tag: None,
        }
    }

    /// Attach a label.
    pub fn with_tag(mut self, tag: Option<String>) -> Self {
        self.tag = tag;
        self
    }
}

/// Maximum length for error messages in `QueryResult::Error`.
const MAX_ERROR_LEN: usize = 512;

/// Outcome of a statement, for hooks.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryResult {
    /// Query returned rows.
    Rows(usize),
    /// Statement affected rows.
    Affected(u64),
    /// INSERT generated this identifier.
    Inserted(i64),
    /// Rows are delivered lazily through a stream.
    Streaming,
    /// Statement failed (message truncated to 512 bytes).
    Error(String),
}

impl QueryResult {
    /// Create an error result, truncating the message.
    pub fn error(msg: String) -> Self {
        if msg.len() > MAX_ERROR_LEN {
            Self::Error(format!("{}...", truncate_sql_bytes(&msg, MAX_ERROR_LEN)))
        } else {
            Self::Error(msg)
        }
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Rows(n) => write!(f, "{n} rows"),
            QueryResult::Affected(n) => write!(f, "{n} affected"),
            QueryResult::Inserted(id) => write!(f, "inserted id {id}"),
            QueryResult::Streaming => f.write_str("streaming"),
            QueryResult::Error(e) => write!(f, "error: {e}"),
        }
    }
}

/// Action to take after a hook inspects a statement.
#[derive(Debug, Clone, PartialEq)]
pub enum HookAction {
    /// Execute the statement.
    Continue,
    /// Do not execute; the operation fails with [`DbError::Aborted`](crate::DbError::Aborted).
    Abort(String),
}

/// Trait for hooking into the execution lifecycle.
pub trait QueryHook: Send + Sync {
    /// Called before a statement is sent.
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let _ = ctx;
        HookAction::Continue
    }

    /// Called after a statement completes or fails.
    fn after_query(&self, _ctx: &QueryContext, _duration: Duration, _result: &QueryResult) {}
}

/// Runs several hooks in order; the first abort wins.
#[derive(Clone, Default)]
pub struct CompositeHook {
    hooks: Vec<Arc<dyn QueryHook>>,
}

impl CompositeHook {
    /// Create an empty composite hook.
    pub fn new() -> Self {
        Self { hooks: Vec::new() }
    }

    /// Add a hook.
    #[allow(clippy::should_implement_trait)]
    pub fn add<H: QueryHook + 'static>(mut self, hook: H) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Add an Arc-wrapped hook.
    pub fn add_arc(mut self, hook: Arc<dyn QueryHook>) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }
}

impl QueryHook for CompositeHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        for hook in &self.hooks {
            if let action @ HookAction::Abort(_) = hook.before_query(ctx) {
                return action;
            }
        }
        HookAction::Continue
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        for hook in &self.hooks {
            hook.after_query(ctx, duration, result);
        }
    }
}

pub(crate) fn truncate_sql_bytes(sql: &str, max_bytes: usize) -> &str {
    if sql.len() <= max_bytes {
        return sql;
    }
    let mut end = max_bytes;
    while end > 0 && !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}
