use proc_macro::TokenStream;
use proc_macro2::Span;
use quote::quote;
use syn::{DeriveInput, Ident, LitStr, meta, parse_macro_input};

/// Implementation of `#[register_builder(category = "...", name = "...")]`.
///
/// Leaves the decorated type unchanged and appends a
/// `#[::ingot_core::linkme::distributed_slice]` static that wires
/// `builder_factory::<Type>` into the builder registry in `ingot-core`.
pub fn register_builder(attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut category: Option<LitStr> = None;
    let mut name: Option<LitStr> = None;
    let parser = meta::parser(|meta| {
        if meta.path.is_ident("category") {
            category = Some(meta.value()?.parse()?);
            Ok(())
        } else if meta.path.is_ident("name") {
            name = Some(meta.value()?.parse()?);
            Ok(())
        } else {
            Err(meta.error("unknown register_builder argument, expected `category` or `name`"))
        }
    });
    parse_macro_input!(attr with parser);

    let item_tokens = proc_macro2::TokenStream::from(item.clone());
    let input = parse_macro_input!(item as DeriveInput);

    let (Some(category), Some(name)) = (category, name) else {
        return syn::Error::new(
            input.ident.span(),
            "#[register_builder] requires `category = \"…\"` and `name = \"…\"`",
        )
        .into_compile_error()
        .into();
    };

    let ident = &input.ident;
    let static_name = Ident::new(
        &format!(
            "_INGOT_BUILDER_{}_{}",
            sanitize(&category.value()),
            sanitize(&name.value())
        ),
        Span::call_site(),
    );

    quote! {
        #item_tokens

        #[::ingot_core::linkme::distributed_slice(::ingot_core::BUILDER_REGISTRY)]
        #[linkme(crate = ::ingot_core::linkme)]
        static #static_name: ::ingot_core::BuilderRegistration =
            ::ingot_core::BuilderRegistration {
                category: #category,
                type_name: #name,
                create: ::ingot_core::builder_factory::<#ident>,
            };
    }
    .into()
}

/// `"dokodemo-door"` → `DOKODEMO_DOOR`.
fn sanitize(value: &str) -> String {
    value
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect()
}
