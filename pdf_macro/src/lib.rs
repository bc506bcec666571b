mod pdf_enum;

use pdf_enum::pdf_enum_inner;
use proc_macro::TokenStream;

/// Declares a fieldless enum whose variants map to fixed names, e.g. PostScript
/// operator names
#[proc_macro_attribute]
pub fn pdf_enum(attr: TokenStream, item: TokenStream) -> TokenStream {
    pdf_enum_inner(attr, item)
}
