//! Derive macros for fluentsql
//!
//! Provides `#[derive(Entity)]` and `#[derive(FromRecord)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod attrs;
mod entity;
mod from_record;

/// Derive `FromRecord` trait for a struct.
///
/// # Example
///
/// ```ignore
/// use fluentsql::FromRecord;
///
/// #[derive(FromRecord)]
/// struct User {
///     id: i64,
///     #[orm(column = "user_name")]
///     name: String,
///     email: Option<String>,
/// }
/// ```
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Bind the field from a different column
/// - `#[orm(skip)]` - Leave the field at `Default::default()`
#[proc_macro_derive(FromRecord, attributes(orm))]
pub fn derive_from_record(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    from_record::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

/// Derive `Entity` for a struct.
///
/// Only fields carrying a column tag are written. The identity column
/// (tag `"id"` or the `id` flag) is never written.
///
/// # Example
///
/// ```ignore
/// use fluentsql::Entity;
///
/// #[derive(Entity)]
/// struct User {
///     #[orm(column = "id")]
///     id: i64,
///     #[orm(column = "name")]
///     name: String,
///     // untagged: not written
///     cached_score: f64,
/// }
/// ```
///
/// # Generated
///
/// - `fn field_names() -> &'static [&'static str]`
/// - `fn field_values(&self) -> FieldMap` (fields must be `Clone + Into<Value>`)
/// - `fn id_column() -> Option<&'static str>`
///
/// # Attributes
///
/// - `#[orm(column = "name")]` - Column tag
/// - `#[orm(id)]` - Mark field as identity
/// - `#[orm(skip)]` - Never written
#[proc_macro_derive(Entity, attributes(orm))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    entity::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
