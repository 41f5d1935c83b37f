use proc_macro2::{Span, TokenStream};
use quote::quote;
use syn::{DeriveInput, Ident, LitStr, spanned::Spanned};

pub fn derive_message(input: &DeriveInput) -> syn::Result<TokenStream> {
    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Message cannot be derived for generic types",
        ));
    }

    let name = parse_name(input)?;
    let ident = &input.ident;
    let static_name = Ident::new(
        &format!("__INGOT_MESSAGE_CODEC_{}", ident.to_string().to_uppercase()),
        Span::call_site(),
    );

    Ok(quote! {
        impl ::ingot_core::Message for #ident {
            const TYPE_NAME: &'static str = #name;
        }

        #[::ingot_core::linkme::distributed_slice(::ingot_core::MESSAGE_CODECS)]
        #[linkme(crate = ::ingot_core::linkme)]
        static #static_name: ::ingot_core::MessageCodec =
            ::ingot_core::MessageCodec::of::<#ident>();
    })
}

fn parse_name(input: &DeriveInput) -> syn::Result<LitStr> {
    let mut name: Option<LitStr> = None;
    for attr in &input.attrs {
        if attr.path().is_ident("message") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown message attribute, expected `name`"))
                }
            })?;
        }
    }

    let name = name.ok_or_else(|| {
        syn::Error::new(
            input.ident.span(),
            "#[derive(Message)] requires `#[message(name = \"…\")]`",
        )
    })?;
    if name.value().is_empty() {
        return Err(syn::Error::new(name.span(), "message name must not be empty"));
    }
    Ok(name)
}
