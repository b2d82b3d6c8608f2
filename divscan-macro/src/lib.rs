extern crate proc_macro;

use convert_case::{Case, Casing};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, DeriveInput, LitStr};

/// Collect the `rename` / `rename_all` value of a `#[serde(...)]` attribute list, if present.
fn serde_attr(attrs: &[Attribute], name: &str) -> syn::Result<Option<String>> {
    let mut value = None;
    for attr in attrs.iter().filter(|attr| attr.path().is_ident("serde")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident(name) {
                let lit: LitStr = meta.value()?.parse()?;
                value = Some(lit.value());
            } else if meta.input.peek(syn::Token![=]) {
                let _: syn::Expr = meta.value()?.parse()?;
            }
            Ok(())
        })?;
    }
    Ok(value)
}

fn rename_all_case(rule: &str) -> Option<Case> {
    match rule {
        "snake_case" => Some(Case::Snake),
        "camelCase" => Some(Case::Camel),
        "PascalCase" => Some(Case::Pascal),
        "kebab-case" => Some(Case::Kebab),
        "SCREAMING_SNAKE_CASE" => Some(Case::ScreamingSnake),
        _ => None,
    }
}

/// Implement an in-scope `AsUrlParams` trait, rendering the struct as `key=value&...`.
///
/// Keys follow field declaration order and honour serde `rename` / `rename_all`, so the
/// struct must also derive `Serialize`. `null` values (eg/ `None`) are skipped. Values are
/// form-urlencoded, so the deriving crate needs `serde_json` and `url` in scope.
#[proc_macro_derive(AsUrlParams)]
pub fn derive_as_url_params(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let name = &input.ident;
    let data = match &input.data {
        syn::Data::Struct(data) => data,
        _ => {
            return syn::Error::new_spanned(name, "AsUrlParams can only be derived for structs")
                .to_compile_error()
                .into()
        }
    };

    let rename_all = match serde_attr(&input.attrs, "rename_all") {
        Ok(Some(rule)) => match rename_all_case(&rule) {
            Some(case) => Some(case),
            None => {
                return syn::Error::new_spanned(name, format!("unsupported rename_all rule: {rule}"))
                    .to_compile_error()
                    .into()
            }
        },
        Ok(None) => None,
        Err(error) => return error.to_compile_error().into(),
    };

    let mut keys = Vec::new();
    for field in data.fields.iter() {
        let Some(ident) = field.ident.as_ref() else { continue };
        let key = match serde_attr(&field.attrs, "rename") {
            Ok(Some(key)) => key,
            Ok(None) => match rename_all {
                Some(case) => ident.to_string().to_case(case),
                None => ident.to_string(),
            },
            Err(error) => return error.to_compile_error().into(),
        };
        keys.push(key);
    }

    let expanded = quote! {
        impl AsUrlParams for #name {
            fn to_url_params(&self) -> String {
                let mut params = Vec::new();

                let json_value = serde_json::json!(self);
                if let serde_json::Value::Object(map) = json_value {
                    let ordered_keys: &[&str] = &[#(#keys),*];
                    for key in ordered_keys {
                        if let Some(value) = map.get(*key) {
                            if !value.is_null() {
                                let value_str = match value {
                                    serde_json::Value::String(s) => s.to_string(),
                                    _ => value.to_string(),
                                };
                                let encoded: String =
                                    ::url::form_urlencoded::byte_serialize(value_str.as_bytes()).collect();
                                params.push(format!("{}={}", key, encoded));
                            }
                        }
                    }
                }

                params.join("&")
            }
        }
    };

    TokenStream::from(expanded)
}
