use proc_macro2::{Ident, TokenStream};
use quote::quote;
use syn::spanned::Spanned;
use syn::{Error, ItemTrait, Result};

#[cfg(feature = "threadsafe")]
fn interface_type(ident: &Ident) -> TokenStream {
    quote!(dyn #ident + Send + Sync)
}

#[cfg(not(feature = "threadsafe"))]
fn interface_type(ident: &Ident) -> TokenStream {
    quote!(dyn #ident)
}

pub fn expand_injectable(item: &ItemTrait) -> Result<TokenStream> {
    if !item.generics.params.is_empty() {
        return Err(Error::new(
            item.generics.span(),
            "Generic traits cannot be used as injectable interfaces!",
        ));
    }

    let ident = &item.ident;
    let interface = interface_type(ident);

    Ok(quote! {
        #item

        #[automatically_derived]
        impl<__Value: #ident + scoped_inject::instance::Instance> scoped_inject::registry::Expose<__Value> for #interface {
            type Exposed = scoped_inject::instance::InstancePtr<#interface>;

            #[inline]
            fn expose(value: __Value) -> scoped_inject::instance::InstancePtr<#interface> {
                scoped_inject::instance::InstancePtr::new(value)
            }
        }

        #[automatically_derived]
        impl<__Value: #ident + scoped_inject::instance::Instance> scoped_inject::registry::Expose<scoped_inject::instance::InstancePtr<__Value>> for #interface {
            type Exposed = scoped_inject::instance::InstancePtr<#interface>;

            #[inline]
            fn expose(
                value: scoped_inject::instance::InstancePtr<__Value>,
            ) -> scoped_inject::instance::InstancePtr<#interface> {
                value
            }
        }
    })
}
