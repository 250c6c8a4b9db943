//! The `#[test]` attribute re-exported by `mirror-testhelpers`.

use unsynn::*;

keyword! {
    KFn = "fn";
}

unsynn! {
    /// Attributes, visibility and qualifiers in front of `fn`
    struct Prelude {
        items: Any<Cons<Except<KFn>, TokenTree>>,
    }

    /// Everything between the name and the body: generics, parameters, where-clauses
    struct Signature {
        items: Any<Cons<Except<BraceGroup>, TokenTree>>,
    }

    struct Body {
        items: BraceGroup,
    }

    struct TestFn {
        prelude: Prelude, _fn: KFn, name: Ident,
        signature: Signature, body: Body
    }
}

impl quote::ToTokens for Prelude {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Signature {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        self.items.to_tokens(tokens)
    }
}

impl quote::ToTokens for Body {
    fn to_tokens(&self, tokens: &mut unsynn::TokenStream) {
        tokens.extend(self.items.0.stream())
    }
}

/// Marks a test whose body may use `?`.
///
/// The body is wrapped into a function returning
/// `mirror_testhelpers::eyre::Result<()>`, and `mirror_testhelpers::setup()`
/// runs before it.
#[proc_macro_attribute]
pub fn test(
    _attr: proc_macro::TokenStream,
    item: proc_macro::TokenStream,
) -> proc_macro::TokenStream {
    let item = TokenStream::from(item);
    let mut tokens = item.to_token_iter();
    let Ok(TestFn {
        prelude,
        _fn,
        name,
        signature,
        body,
    }) = tokens.parse::<TestFn>()
    else {
        return quote::quote! {
            ::core::compile_error!("`#[mirror_testhelpers::test]` can only be put on a function");
        }
        .into();
    };

    quote::quote! {
        #[::core::prelude::rust_2024::test]
        #prelude fn #name #signature -> ::mirror_testhelpers::eyre::Result<()> {
            ::mirror_testhelpers::setup();

            #body

            Ok(())
        }
    }
    .into()
}
