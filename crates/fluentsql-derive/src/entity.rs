//! Entity derive macro implementation

use crate::attrs::{get_field_attrs, named_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = named_fields(&input, "Entity")?;

    let mut columns: Vec<String> = Vec::new();
    let mut field_idents: Vec<&syn::Ident> = Vec::new();
    let mut id_column: Option<String> = None;

    for field in fields {
        let Some(field_ident) = field.ident.as_ref() else {
            continue;
        };
        let attrs = get_field_attrs(field)?;

        if attrs.is_identity() {
            if id_column.is_some() {
                return Err(syn::Error::new_spanned(
                    field,
                    "Entity supports a single identity field",
                ));
            }
            id_column = Some(
                attrs
                    .column
                    .clone()
                    .unwrap_or_else(|| field_ident.to_string()),
            );
            continue;
        }

        // Untagged fields are not part of the column mapping.
        let (false, Some(column)) = (attrs.skip, attrs.column) else {
            continue;
        };
        if columns.contains(&column) {
            return Err(syn::Error::new_spanned(
                field,
                format!("duplicate column tag `{column}`"),
            ));
        }
        columns.push(column);
        field_idents.push(field_ident);
    }

    let id_column = match id_column {
        Some(col) => quote! { ::core::option::Option::Some(#col) },
        None => quote! { ::core::option::Option::None },
    };

    Ok(quote! {
        impl #impl_generics fluentsql::Entity for #name #ty_generics #where_clause {
            fn field_names() -> &'static [&'static str] {
                &[#(#columns),*]
            }

            #[allow(unused_mut)]
            fn field_values(&self) -> fluentsql::FieldMap {
                let mut fields = fluentsql::FieldMap::new();
                #(
                    fields.insert(#columns, ::core::clone::Clone::clone(&self.#field_idents));
                )*
                fields
            }

            fn id_column() -> ::core::option::Option<&'static str> {
                #id_column
            }
        }
    })
}
