use proc_macro::TokenStream;
use quote::quote;
use syn::{
    braced, parse::Parse, parse_macro_input, punctuated::Punctuated, token, LitStr, Token,
    Visibility,
};

struct PdfEnumVariant {
    attrs: Vec<syn::Attribute>,
    name: syn::Ident,
    #[allow(dead_code)]
    tok_eq: Token![=],
    value: LitStr,
}

impl Parse for PdfEnumVariant {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        Ok(PdfEnumVariant {
            attrs: input.call(syn::Attribute::parse_outer)?,
            name: input.parse()?,
            tok_eq: input.parse()?,
            value: input.parse()?,
        })
    }
}

struct PdfEnum {
    attrs: Vec<syn::Attribute>,
    vis: Visibility,
    #[allow(dead_code)]
    kw_enum: Token![enum],
    name: syn::Ident,
    #[allow(dead_code)]
    tok_brace: token::Brace,
    variants: Punctuated<PdfEnumVariant, Token![,]>,
}

impl Parse for PdfEnum {
    fn parse(input: syn::parse::ParseStream) -> syn::Result<Self> {
        let content;
        Ok(PdfEnum {
            attrs: input.call(syn::Attribute::parse_outer)?,
            vis: input.parse()?,
            kw_enum: input.parse()?,
            name: input.parse()?,
            tok_brace: braced!(content in input),
            variants: content.parse_terminated(PdfEnumVariant::parse, Token![,])?,
        })
    }
}

/// Expands a fieldless enum whose variants are each assigned a string literal
/// into the enum itself plus a name table.
///
/// Variants keep their declaration order, so `Self::ALL[v as usize] == v` for
/// every variant `v`. Lookup from a name is not generated; callers
/// that need it classify bytes themselves.
pub fn pdf_enum_inner(attr: TokenStream, item: TokenStream) -> TokenStream {
    if !attr.is_empty() {
        return syn::Error::new(
            proc_macro2::Span::call_site(),
            "`pdf_enum` does not take arguments",
        )
        .to_compile_error()
        .into();
    }

    let item = parse_macro_input!(item as PdfEnum);

    let PdfEnum {
        vis,
        name,
        variants,
        attrs,
        ..
    } = item;

    let field_attrs = variants.iter().map(|v| &v.attrs).collect::<Vec<_>>();
    let field_names = variants.iter().map(|v| &v.name).collect::<Vec<_>>();
    let field_values = variants.iter().map(|v| &v.value).collect::<Vec<_>>();
    let count = field_names.len();

    quote!(
        #(#attrs)*
        #[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
        #vis enum #name {
            #(
                #(#field_attrs)*
                #field_names,
            )*
        }

        impl #name {
            /// Number of variants
            pub const COUNT: usize = #count;

            /// Every variant, in declaration order
            pub const ALL: [Self; #count] = [#(Self::#field_names),*];

            pub const fn as_str(self) -> &'static str {
                match self {
                    #(Self::#field_names => #field_values),*
                }
            }
        }

        impl ::std::fmt::Display for #name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    )
    .into()
}
