//! Binding between caller-defined structs and columns.
//!
//! Both traits are normally derived:
//!
//! ```ignore
//! use fluentsql::{Entity, FromRecord};
//!
//! #[derive(Entity, FromRecord)]
//! struct User {
//!     #[orm(column = "id")]
//!     id: i64,
//!     #[orm(column = "name")]
//!     name: String,
//!     #[orm(column = "age")]
//!     age: Option<i32>,
//! }
//! ```
//!
//! The column tag `"id"` (or the `#[orm(id)]` flag) marks the identity
//! column: it is bound when reading rows but never written by INSERT/UPDATE.

use crate::error::DbResult;
use crate::params::FieldMap;
use crate::record::Record;

/// Column tag reserved for the auto-generated identity column.
pub const ID_TAG: &str = "id";

/// Trait for converting a result row into a Rust struct.
///
/// This trait should typically be derived using `#[derive(FromRecord)]`.
pub trait FromRecord: Sized {
    /// Bind `record` onto a new `Self`, matching columns by tag.
    fn from_record(record: &Record) -> DbResult<Self>;
}

impl FromRecord for Record {
    fn from_record(record: &Record) -> DbResult<Self> {
        Ok(record.clone())
    }
}

/// Declarative column mapping of a struct used for INSERT/UPDATE.
pub trait Entity {
    /// Tagged column names written by [`Entity::field_values`], identity excluded.
    fn field_names() -> &'static [&'static str];

    /// Current field values keyed by column tag, identity excluded.
    fn field_values(&self) -> FieldMap;

    /// Identity column, if the struct declares one.
    fn id_column() -> Option<&'static str> {
        None
    }
}

/// Anything that can supply the pending field map of an INSERT or UPDATE.
pub trait IntoFieldMap {
    /// Identity column the generated id is read from; [`ID_TAG`] when `None`.
    fn id_column(&self) -> Option<&'static str> {
        None
    }

    fn into_field_map(self) -> FieldMap;
}

impl IntoFieldMap for FieldMap {
    fn into_field_map(self) -> FieldMap {
        self
    }
}

impl IntoFieldMap for Record {
    fn into_field_map(self) -> FieldMap {
        let columns = self.columns().to_vec();
        columns.into_iter().zip(self.into_values()).collect()
    }
}

impl<E: Entity> IntoFieldMap for &E {
    fn id_column(&self) -> Option<&'static str> {
        E::id_column()
    }

    fn into_field_map(self) -> FieldMap {
        self.field_values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    struct Account {
        id: i64,
        owner: String,
        balance: i64,
    }

    impl Entity for Account {
        fn field_names() -> &'static [&'static str] {
            &["owner", "balance"]
        }

        fn field_values(&self) -> FieldMap {
            crate::params! { "owner" => self.owner.as_str(), "balance" => self.balance }
        }

        fn id_column() -> Option<&'static str> {
            Some(ID_TAG)
        }
    }

    impl FromRecord for Account {
        fn from_record(record: &Record) -> DbResult<Self> {
            Ok(Self {
                id: record.try_get("id")?,
                owner: record.try_get("owner")?,
                balance: record.try_get("balance")?,
            })
        }
    }

    #[test]
    fn entity_excludes_identity() {
        let acct = Account {
            id: 9,
            owner: "ann".into(),
            balance: 10,
        };
        let fields = (&acct).into_field_map();
        assert!(!fields.contains_key("id"));
        assert_eq!(fields.keys().collect::<Vec<_>>(), Account::field_names());
        assert_eq!(acct.id, 9);
        assert_eq!((&acct).id_column(), Some(ID_TAG));
        assert_eq!(FieldMap::new().id_column(), None);
    }

    #[test]
    fn from_record_binds_by_column() {
        let rec = Record::from_pairs([
            ("balance", Value::Int(10)),
            ("id", Value::Int(9)),
            ("owner", Value::Text("ann".into())),
        ]);
        let acct = Account::from_record(&rec).unwrap();
        assert_eq!((acct.id, acct.owner.as_str(), acct.balance), (9, "ann", 10));
    }

    #[test]
    fn record_becomes_field_map() {
        let rec = Record::from_pairs([("name", "Ann"), ("city", "Oslo")]);
        let fields = rec.into_field_map();
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["name", "city"]);
    }
}
