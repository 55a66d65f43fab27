use super::truncate_sql_bytes;
use super::{HookAction, QueryContext, QueryHook, QueryResult};
use std::time::Duration;
use tracing::Level;

/// A `tracing`-based hook that emits each statement before it is sent and
/// its outcome afterwards.
///
/// Events use target `fluentsql.sql`. Enable via the crate feature
/// `fluentsql = { features = ["tracing"] }` (on by default).
#[derive(Debug, Clone)]
pub struct TracingSqlHook {
    /// Tracing event level to emit at.
    pub level: Level,
    /// Truncate long SQL strings (in bytes). `None` means no truncation.
    pub max_sql_length: Option<usize>,
}

impl Default for TracingSqlHook {
    fn default() -> Self {
        Self {
            level: Level::DEBUG,
            max_sql_length: Some(200),
        }
    }
}

impl TracingSqlHook {
    /// Create a new hook with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the tracing event level.
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Set maximum SQL length to display.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Disable SQL truncation.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    fn truncate_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }
}

/// Dispatch a tracing event at a runtime-determined level.
macro_rules! emit_at_level {
    ($level:expr, $($field:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($field)*),
            Level::WARN  => tracing::warn!($($field)*),
            Level::INFO  => tracing::info!($($field)*),
            Level::DEBUG => tracing::debug!($($field)*),
            Level::TRACE => tracing::trace!($($field)*),
        }
    };
}

impl QueryHook for TracingSqlHook {
    fn before_query(&self, ctx: &QueryContext) -> HookAction {
        let sql = self.truncate_sql(&ctx.canonical_sql);
        let tag = ctx.tag.as_deref().unwrap_or("-");
        emit_at_level!(
            self.level,
            target: "fluentsql.sql",
            query_type = ?ctx.query_type,
            tag,
            param_count = ctx.param_count,
            sql = %sql,
        );
        HookAction::Continue
    }

    fn after_query(&self, ctx: &QueryContext, duration: Duration, result: &QueryResult) {
        let tag = ctx.tag.as_deref().unwrap_or("-");
        match result {
            QueryResult::Error(error) => tracing::warn!(
                target: "fluentsql.sql",
                query_type = ?ctx.query_type,
                tag,
                elapsed_ms = duration.as_millis() as u64,
                error = %error,
                "statement failed",
            ),
            _ => emit_at_level!(
                self.level,
                target: "fluentsql.sql",
                query_type = ?ctx.query_type,
                tag,
                elapsed_ms = duration.as_millis() as u64,
                result = %result,
            ),
        }
    }
}
