use proc_macro::{self, TokenStream};
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

use super::utils::get_member_symbol;

pub(super) fn derive(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);
    let (impl_generics, ty_generics, where_clause) = ast.generics.split_for_impl();
    let name = &ast.ident;
    let fields = match ast.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(syn::FieldsNamed { ref named, .. }), ..
        }) => named,
        _ => {
            return syn::Error::new_spanned(name, "`Signal` can only be derived for structs with named fields")
                .to_compile_error()
                .into()
        }
    };

    // fields for `transl`.
    let transl_fields = fields.iter().map(|f| {
        let name = &f.ident;
        quote! { .chain(Signal::transl(&self.#name)) }
    });

    // fields for `port_decls`.
    let port_decls_fields = fields.iter().map(|f| {
        let name = f.ident.as_ref().unwrap();
        let symbol = get_member_symbol(&f.attrs, name);

        match symbol {
            None => quote! { (None, Signal::port_decls(&self.#name)) },
            Some(symbol) => quote! { (Some(#symbol.to_string()), Signal::port_decls(&self.#name)) },
        }
    });

    let expanded = quote! {
        impl #impl_generics Signal for #name #ty_generics #where_clause {
            fn port_decls(&self) -> lir::PortDecls {
                lir::PortDecls::Struct(vec![
                    #(#port_decls_fields,)*
                ])
            }
            fn transl(&self) -> Vec<bool> {
                ::std::iter::empty::<bool>()#(#transl_fields)*.collect::<Vec<bool>>()
            }
        }
    };

    expanded.into()
}
