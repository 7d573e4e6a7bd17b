use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{FnArg, ItemFn, Pat, ReturnType, Type, parse_macro_input};

/// Logs the arguments and the result of a syscall handler at `debug` level.
///
/// Reference arguments (the process manager, the calling process, saved user
/// registers) are skipped. `usize` arguments are user addresses and are
/// printed in hex.
#[proc_macro_attribute]
pub fn syscall_trace(_attr: TokenStream, item: TokenStream) -> TokenStream {
    let mut function = parse_macro_input!(item as ItemFn);
    let fn_name = function.sig.ident.to_string();
    let ret_ty = match &function.sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => {
            return syn::Error::new_spanned(&function.sig, "a traced syscall must return a result")
                .to_compile_error()
                .into();
        }
    };

    let mut arg_formats = Vec::new();
    let mut arg_values: Vec<TokenStream2> = Vec::new();
    for arg in &function.sig.inputs {
        // only plain named arguments, no `self` or destructuring
        let FnArg::Typed(pat_type) = arg else {
            continue;
        };
        let Pat::Ident(pat_ident) = &*pat_type.pat else {
            continue;
        };
        let arg_name = &pat_ident.ident;
        match &*pat_type.ty {
            Type::Reference(_) => continue,
            Type::Path(type_path) if type_path.path.is_ident("usize") => {
                arg_formats.push(format!("{} = {{:#x}}", arg_name));
            }
            _ => arg_formats.push(format!("{} = {{}}", arg_name)),
        }
        arg_values.push(quote! { #arg_name });
    }

    let arg_list = arg_formats.join(", ");
    let format_pattern_in = format!("[syscall] <= {}({})", fn_name, arg_list);
    let format_pattern_out = format!("[syscall] => {}({}) = {{:?}}", fn_name, arg_list);

    let fn_body = &function.block;
    function.block = Box::new(syn::parse_quote! {{
        debug!(#format_pattern_in #(, #arg_values)*);
        let __result = (|| -> #ret_ty #fn_body)();
        debug!(#format_pattern_out #(, #arg_values)*, __result);
        __result
    }});
    quote! {
        #function
    }
    .into()
}
