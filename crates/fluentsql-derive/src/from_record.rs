//! FromRecord derive macro implementation

use crate::attrs::{get_field_attrs, named_fields};
use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let generics = &input.generics;
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let fields = named_fields(&input, "FromRecord")?;

    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            continue;
        };
        let attrs = get_field_attrs(field)?;

        field_extracts.push(if attrs.skip {
            quote! { #field_name: ::core::default::Default::default() }
        } else {
            let column_name = attrs.column.unwrap_or_else(|| field_name.to_string());
            quote! { #field_name: record.try_get(#column_name)? }
        });
    }

    Ok(quote! {
        impl #impl_generics fluentsql::FromRecord for #name #ty_generics #where_clause {
            fn from_record(record: &fluentsql::Record) -> fluentsql::DbResult<Self> {
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
