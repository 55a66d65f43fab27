//! Driver seam.
//!
//! [`Connector`] opens a connection from a DSN; [`Connection`] runs positional
//! SQL on it. Everything above this layer (rendering, named parameters,
//! mapping) is driver independent. The bundled tokio-postgres implementation
//! lives in [`crate::pg`].

use crate::dialect::Dialect;
use crate::error::DbResult;
use crate::record::{Record, Records};
use crate::value::Value;
use futures_core::Stream;
use std::future::{Future, poll_fn};
use std::pin::Pin;
use std::task::{Context, Poll};

/// A single open database connection.
///
/// All SQL handed to these methods already uses the placeholder style of the
/// connection's [`Dialect`], with `params` in placeholder order.
pub trait Connection: Send + Sync {
    /// Dialect this connection speaks.
    fn dialect(&self) -> Dialect;

    /// Execute a query and materialize every row.
    fn query(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<Records>> + Send;

    /// Execute a query and return the rows as a lazily consumed stream.
    fn query_stream(
        &self,
        sql: &str,
        params: &[Value],
    ) -> impl Future<Output = DbResult<RecordStream>> + Send;

    /// Execute a statement and return the number of affected rows.
    fn execute(&self, sql: &str, params: &[Value])
    -> impl Future<Output = DbResult<u64>> + Send;

    /// Execute an INSERT and return the identifier it generated (0 if none).
    ///
    /// `id_column` names the identity column of the target table, for drivers
    /// that read the generated value back from the inserted row.
    fn insert(
        &self,
        sql: &str,
        params: &[Value],
        id_column: &str,
    ) -> impl Future<Output = DbResult<i64>> + Send;

    /// Check the connection is still alive.
    fn ping(&self) -> impl Future<Output = DbResult<()>> + Send;
}

/// Opens [`Connection`]s from a connection string.
pub trait Connector: Send + Sync {
    type Conn: Connection;

    /// Open a connection. Called at most once per successful [`Db`](crate::Db) open.
    fn connect(&self, dsn: &str) -> impl Future<Output = DbResult<Self::Conn>> + Send;
}

/// A stream of result records.
///
/// This is a type-erased wrapper around a `Stream<Item = DbResult<Record>>` so
/// that different connections can return a uniform streaming type.
#[must_use]
pub struct RecordStream {
    inner: Pin<Box<dyn Stream<Item = DbResult<Record>> + Send>>,
}

impl RecordStream {
    /// Create a new `RecordStream` from any compatible stream.
    pub fn new<S>(stream: S) -> Self
    where
        S: Stream<Item = DbResult<Record>> + Send + 'static,
    {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// A stream over rows that are already in memory.
    pub fn from_records(records: Records) -> Self {
        Self::new(IterStream {
            inner: records.records.into_iter(),
        })
    }

    /// Next record, without pulling any further rows.
    pub async fn next_record(&mut self) -> Option<DbResult<Record>> {
        poll_fn(|cx| self.inner.as_mut().poll_next(cx)).await
    }
}

impl Stream for RecordStream {
    type Item = DbResult<Record>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for RecordStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStream").finish_non_exhaustive()
    }
}

struct IterStream {
    inner: std::vec::IntoIter<Record>,
}

impl Stream for IterStream {
    type Item = DbResult<Record>;

    fn poll_next(mut self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Poll::Ready(self.inner.next().map(Ok))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
