use crate::injectable::expand_injectable;
use proc_macro::TokenStream;
use syn::{parse_macro_input, Error, ItemTrait};

mod injectable;

/// Marks a trait as an interface, which makes `dyn Trait` usable as a type tag when registering
/// values. Such values are exposed as `InstancePtr<dyn Trait>` (`InstancePtr<dyn Trait + Send +
/// Sync>` with the `threadsafe` feature), regardless if they are registered as plain values or
/// pointers.
#[proc_macro_attribute]
pub fn injectable(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return Error::new(
            proc_macro2::Span::call_site(),
            "#[injectable] does not accept any arguments!",
        )
        .into_compile_error()
        .into();
    }

    let item = parse_macro_input!(item as ItemTrait);
    expand_injectable(&item)
        .unwrap_or_else(Error::into_compile_error)
        .into()
}
