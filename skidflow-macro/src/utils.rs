use syn::{Attribute, Ident, Lit};

/// Returns the port name of a struct member.
///
/// Defaults to the field name. `#[member(name = "...")]` renames it, and an empty name flattens the member's ports
/// into the parent (`None`).
pub(super) fn get_member_symbol(attrs: &[Attribute], name: &Ident) -> Option<Lit> {
    let default = Some(Lit::new(proc_macro2::Literal::string(&format!("{}", name))));

    for attr in attrs.iter().filter(|attr| attr.path.is_ident("member")) {
        let symbol = match attr.parse_meta() {
            Ok(syn::Meta::List(nvs)) => nvs.nested.iter().find_map(|nv| match nv {
                syn::NestedMeta::Meta(syn::Meta::NameValue(nv)) if nv.path.is_ident("name") => Some(nv.lit.clone()),
                _ => None,
            }),
            _ => continue,
        };

        return match symbol {
            None => default,
            Some(Lit::Str(ref s)) if s.value().is_empty() => None,
            Some(lit @ Lit::Str(_)) => Some(lit),
            Some(lit) => panic!("expected string, found {:?}", lit),
        };
    }

    default
}
