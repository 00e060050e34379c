use proc_macro::TokenStream;
use quote::{format_ident, quote};
use syn::{parse_macro_input, FnArg};

/// Marks a function as a test whose arguments are injected.
///
/// The first argument is the application and is created with
/// `<Ty>::default()`. Every further argument is created in order with
/// `<Ty>::generate(&mut app)`, so fixtures such as funded accounts are
/// registered in the application before the test body runs.
///
/// ```ignore
/// #[sims_test_helpers::test]
/// fn test_transfer(app: MockApp, alice: AccountWithNumSeq, bob: AccountWithNumSeq) {
///     // ...
/// }
/// ```
#[proc_macro_attribute]
pub fn test(_attr: TokenStream, input: TokenStream) -> TokenStream {
    let item_fn = parse_macro_input!(input as syn::ItemFn);
    let attrs = &item_fn.attrs;
    let sig = &item_fn.sig;
    let fn_name = &sig.ident;
    let fn_return_type = &sig.output;
    let fn_block = &item_fn.block;
    let fn_args = &sig.inputs;

    let arg_binding_and_ty = match fn_args
        .into_iter()
        .map(|arg| {
            let FnArg::Typed(arg) = arg else {
                return Err(syn::Error::new_spanned(
                    arg,
                    "unexpected receiver argument in test signature",
                ));
            };
            Ok((&arg.pat, &arg.ty))
        })
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(res) => res,
        Err(err) => return err.to_compile_error().into(),
    };

    let Some((_, app_ty)) = arg_binding_and_ty.first() else {
        return syn::Error::new_spanned(
            &sig.ident,
            "at least one argument (the application) is required",
        )
        .to_compile_error()
        .into();
    };

    let arg_defs = arg_binding_and_ty.iter().map(|(arg_binding, arg_ty)| {
        quote! {
            #arg_binding: #arg_ty
        }
    });

    // Fixtures are generated before the application moves into the test.
    let fixture_idents: Vec<_> = (1..arg_binding_and_ty.len())
        .map(|i| format_ident!("__sims_arg_{}", i))
        .collect();
    let fixture_inits = arg_binding_and_ty
        .iter()
        .skip(1)
        .zip(&fixture_idents)
        .map(|((_binding, arg_ty), ident)| {
            quote! { let #ident = <#arg_ty>::generate(&mut app); }
        });

    quote! {
        #( #attrs )*
        #[test]
        fn #fn_name() #fn_return_type {
            #[allow(unused_mut)]
            let mut app = <#app_ty>::default();
            #( #fixture_inits )*
            let test = | #( #arg_defs ),* | #fn_block;
            test(app #( , #fixture_idents )* )
        }
    }
    .into()
}
