//! Convenient imports for typical `fluentsql` usage.
//!
//! ```ignore
//! use fluentsql::prelude::*;
//! ```

pub use crate::{
    Db, DbConfig, DbError, DbResult, Entity, FieldMap, FromRecord, Params, Query, Record,
    Records, Value, params,
};
