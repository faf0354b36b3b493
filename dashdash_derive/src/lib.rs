//! See dashdash for a description of this crate.

#![recursion_limit = "128"]

extern crate proc_macro;
#[macro_use]
extern crate quote;
extern crate syn;

use proc_macro2::TokenStream;
use quote::ToTokens;
use syn::{parse_macro_input, DeriveInput};

////////////////////////////////////// #[derive(CommandLine)] //////////////////////////////////////

#[proc_macro_derive(CommandLine, attributes(dashdash))]
pub fn derive_command_line(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    // `ty_name` holds the type's identifier.
    let ty_name = input.ident;
    // Break out for templating purposes.
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match input.data {
        syn::Data::Struct(syn::DataStruct {
            fields: syn::Fields::Named(ref fields),
            ..
        }) => fields,
        syn::Data::Struct(_) => {
            panic!("only structs with named fields are supported");
        }
        syn::Data::Enum(_) => {
            panic!("enums are not supported");
        }
        syn::Data::Union(_) => {
            panic!("unions are not supported");
        }
    };

    let (declare, extract) = visit_named_fields(fields);

    let gen = quote! {
        impl #impl_generics ::dashdash::CommandLine for #ty_name #ty_generics #where_clause {
            fn declare(registry: &mut ::dashdash::Registry) {
                #declare
            }

            fn extract(&mut self, registry: &::dashdash::Registry) {
                #extract
            }
        }
    };
    gen.into()
}

/////////////////////////////////////////// field visitor //////////////////////////////////////////

fn type_is_option(ty: &syn::Type) -> bool {
    if let syn::Type::Path(ty) = ty {
        if ty.into_token_stream().to_string().starts_with("Option <") {
            return true;
        }
    }
    false
}

fn visit_named_fields(fields: &syn::FieldsNamed) -> (TokenStream, TokenStream) {
    let mut declare = TokenStream::default();
    let mut extract = TokenStream::default();
    'iterating_fields:
    for field in fields.named.iter() {
        if let Some(field_ident) = &field.ident {
            let field_arg = field_ident.to_string().replace('_', "-");
            let field_meta = match parse_meta(&field.attrs) {
                Some(field_meta) => field_meta,
                None => {
                    continue 'iterating_fields;
                }
            };
            let help_string = field_meta.help_string;
            let choices = match field_meta.field_type {
                FieldType::Flag => vec![],
                FieldType::Value => vec![String::new()],
                FieldType::Choice => field_meta.choices,
            };

            // Declare the option.
            declare = quote! {
                #declare
                registry.declare(#field_arg, #help_string, &[#(#choices),*]);
            };

            // Retrieve the value from the registry.
            match field_meta.field_type {
                FieldType::Flag => {
                    extract = quote! {
                        #extract
                        self.#field_ident = registry.has(#field_arg);
                    };
                }
                FieldType::Value | FieldType::Choice => {
                    if type_is_option(&field.ty) {
                        extract = quote! {
                            #extract
                            if registry.has(#field_arg) {
                                self.#field_ident = Some(registry.get(#field_arg).to_string());
                            }
                        };
                    } else {
                        extract = quote! {
                            #extract
                            if registry.has(#field_arg) {
                                self.#field_ident = registry.get(#field_arg).to_string();
                            }
                        };
                    }
                }
            }
        }
    }
    (declare, extract)
}

//////////////////////////////////////////// attributes ////////////////////////////////////////////

const USAGE: &str = "must provide attributes of the form `dashdash(flag, \"help\")`, `dashdash(value, \"help\")`, or `dashdash(choice, \"help\", \"a\", \"b\", ...)`";
const META_PATH: &str = "dashdash";

#[derive(Debug, Eq, PartialEq)]
enum FieldType {
    Flag,
    Value,
    Choice,
}

struct FlagMeta {
    field_type: FieldType,
    help_string: String,
    choices: Vec<String>,
}

fn string_literal(nested: &syn::NestedMeta) -> String {
    match nested {
        syn::NestedMeta::Lit(syn::Lit::Str(s)) => s.value(),
        _ => {
            panic!("expected a string literal: {}", USAGE);
        }
    }
}

fn parse_meta_one(attr: &syn::Attribute) -> Option<FlagMeta> {
    if attr.path.clone().into_token_stream().to_string() != META_PATH {
        return None;
    }
    let meta = match attr.parse_meta() {
        Ok(meta) => meta,
        Err(err) => {
            panic!("could not parse attribute: {}: {}", err, USAGE);
        }
    };
    let meta_list = match meta {
        syn::Meta::Path(_) => {
            panic!("meta path: {}", USAGE);
        }
        syn::Meta::List(ref ml) => ml,
        syn::Meta::NameValue(_) => {
            panic!("meta name value: {}", USAGE);
        }
    };
    if meta_list.nested.is_empty() {
        panic!("meta list length: {}", USAGE);
    }
    let field_type = match &meta_list.nested[0] {
        syn::NestedMeta::Meta(field_type) => field_type.into_token_stream().to_string(),
        syn::NestedMeta::Lit(_) => {
            panic!("{}", USAGE);
        }
    };
    let field_type: &str = &field_type;
    let field_type = match field_type {
        "flag" => FieldType::Flag,
        "value" => FieldType::Value,
        "choice" => FieldType::Choice,
        _ => {
            panic!("Unknown field_type {:?}", field_type)
        }
    };
    let help_string = if meta_list.nested.len() > 1 {
        string_literal(&meta_list.nested[1])
    } else {
        String::new()
    };
    let choices: Vec<String> = meta_list.nested.iter().skip(2).map(string_literal).collect();
    match field_type {
        FieldType::Flag | FieldType::Value if !choices.is_empty() => {
            panic!("only choice takes values: {}", USAGE);
        }
        FieldType::Choice if choices.len() < 2 => {
            panic!("choice needs at least two values: {}", USAGE);
        }
        _ => {}
    }
    Some(FlagMeta {
        field_type,
        help_string,
        choices,
    })
}

fn parse_meta(attrs: &[syn::Attribute]) -> Option<FlagMeta> {
    for attr in attrs.iter() {
        if let Some(field_meta) = parse_meta_one(attr) {
            return Some(field_meta);
        }
    }
    None
}
