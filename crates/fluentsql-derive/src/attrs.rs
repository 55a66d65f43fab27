//! `#[orm(...)]` field attribute parsing.

use syn::{Data, DeriveInput, Fields, Result};

/// Column tag reserved for the identity column.
pub(crate) const ID_TAG: &str = "id";

#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub is_id: bool,
    pub skip: bool,
    pub column: Option<String>,
}

impl FieldAttrs {
    pub fn is_identity(&self) -> bool {
        self.is_id || self.column.as_deref() == Some(ID_TAG)
    }
}

impl syn::parse::Parse for FieldAttrs {
    fn parse(input: syn::parse::ParseStream) -> Result<Self> {
        let mut attrs = FieldAttrs::default();

        loop {
            if input.is_empty() {
                break;
            }

            let ident: syn::Ident = input.parse()?;
            match ident.to_string().as_str() {
                "id" => attrs.is_id = true,
                "skip" => attrs.skip = true,
                "column" => {
                    let _: syn::Token![=] = input.parse()?;
                    let value: syn::LitStr = input.parse()?;
                    if value.value().is_empty() {
                        return Err(syn::Error::new_spanned(value, "column tag cannot be empty"));
                    }
                    attrs.column = Some(value.value());
                }
                other => {
                    return Err(syn::Error::new_spanned(
                        &ident,
                        format!("unknown orm attribute `{other}`"),
                    ));
                }
            }

            if input.peek(syn::Token![,]) {
                let _: syn::Token![,] = input.parse()?;
            } else {
                break;
            }
        }

        Ok(attrs)
    }
}

pub(crate) fn get_field_attrs(field: &syn::Field) -> Result<FieldAttrs> {
    let mut merged = FieldAttrs::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        let parsed: FieldAttrs = attr.parse_args()?;
        merged.is_id |= parsed.is_id;
        merged.skip |= parsed.skip;
        if parsed.column.is_some() {
            merged.column = parsed.column;
        }
    }
    Ok(merged)
}

pub(crate) fn named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a syn::punctuated::Punctuated<syn::Field, syn::Token![,]>> {
    match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => Ok(&fields.named),
            _ => Err(syn::Error::new_spanned(
                input,
                format!("{derive} can only be derived for structs with named fields"),
            )),
        },
        _ => Err(syn::Error::new_spanned(
            input,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
