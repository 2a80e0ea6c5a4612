use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{FnArg, ItemFn, Pat, ReturnType};

mod attributes;

use attributes::parse_attributes;

/// Path of the runtime items generated code refers to.
///
/// Users depend on `memora` only, so expansions go through its hidden
/// `internal` module instead of naming `memora_core`.
pub(crate) fn runtime_path() -> TokenStream2 {
    quote! { ::memora::internal }
}

/// Generate the cache key expression from the receiver and argument names
fn generate_key_expr(has_self: bool, arg_idents: &[&syn::Ident]) -> TokenStream2 {
    let rt = runtime_path();
    let receiver = if has_self {
        quote! { #rt::ToValue::to_value(&self), }
    } else {
        quote! {}
    };
    quote! {
        ::std::vec![
            #receiver
            #( #rt::ToValue::to_value(&#arg_idents), )*
        ]
    }
}

/// A procedural macro that memoizes functions and methods.
///
/// Each annotated function gets its own cache, created lazily per thread.
/// Arguments (and `self` for methods) are converted to cache keys with
/// `ToValue`; calls whose keys match a stored key return the stored result
/// without running the body.
///
/// # Requirements
///
/// - **Arguments**: must implement `ToValue` and be bound to plain identifiers
/// - **Return type**: must implement `Clone` and be `'static`
/// - **Function purity**: side effects run only on cache misses
///
/// # Macro Parameters
///
/// - `hash` (optional): `true` to request the hash-based cache, which is also
///   the default.
/// - `equality` (optional): compare keys instead of hashing them. One of
///   `"strict"`, `"shallow"` or `"deep"`. Without `size`, only the most recent
///   call is remembered.
/// - `depth` (optional): recursion bound for `equality = "deep"`.
/// - `size` (optional): with `equality`, keep up to this many entries and
///   evict the least recently used.
/// - `name` (optional): identifier in the statistics registry. Default: the
///   function name.
///
/// `hash` and `equality` are mutually exclusive; `size` and `depth` without
/// `equality` are rejected at compile time.
///
/// # Examples
///
/// ## Recursive Function
///
/// ```ignore
/// use memora::memoize;
///
/// #[memoize]
/// fn fibonacci(n: u32) -> u64 {
///     if n <= 1 {
///         return n as u64;
///     }
///     fibonacci(n - 1) + fibonacci(n - 2)
/// }
/// ```
///
/// ## Deep Equality With LRU Eviction
///
/// ```ignore
/// use memora::{memoize, Value};
///
/// #[memoize(equality = "deep", depth = 2, size = 32)]
/// fn render(params: Value) -> String {
///     format!("{}", serde_json::to_string(&params).unwrap())
/// }
/// ```
///
/// ## Method Caching
///
/// ```ignore
/// use memora::{memoize, ToValue, Value};
///
/// struct Grid {
///     width: u32,
/// }
///
/// impl ToValue for Grid {
///     fn to_value(&self) -> Value {
///         Value::object([("width", self.width.to_value())])
///     }
/// }
///
/// impl Grid {
///     #[memoize(name = "grid_cells")]
///     fn cells(&self, rows: u32) -> u64 {
///         u64::from(self.width) * u64::from(rows)
///     }
/// }
/// ```
///
/// # Panics
///
/// The generated function panics if a key cannot be serialized for hashing.
#[proc_macro_attribute]
pub fn memoize(attr: TokenStream, item: TokenStream) -> TokenStream {
    TokenStream::from(expand(attr.into(), item.into()))
}

fn expand(attr: TokenStream2, item: TokenStream2) -> TokenStream2 {
    let attrs = match parse_attributes(attr) {
        Ok(attrs) => attrs,
        Err(err) => return err,
    };
    let strategy = match attrs.strategy_expr() {
        Ok(strategy) => strategy,
        Err(err) => return err,
    };

    let input = match syn::parse2::<ItemFn>(item) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };
    let attrs_outer = &input.attrs;
    let vis = &input.vis;
    let sig = &input.sig;
    let ident = &sig.ident;
    let block = &input.block;

    if sig.asyncness.is_some() {
        return quote! { compile_error!("#[memoize] does not support async functions"); };
    }

    let ret_type = match &sig.output {
        ReturnType::Type(_, ty) => quote! { #ty },
        ReturnType::Default => quote! { () },
    };

    // Collect argument names and detect self
    let mut arg_idents = Vec::new();
    let mut has_self = false;
    for arg in sig.inputs.iter() {
        match arg {
            FnArg::Receiver(_) => has_self = true,
            FnArg::Typed(pat_type) => match pat_type.pat.as_ref() {
                Pat::Ident(pat_ident) => arg_idents.push(&pat_ident.ident),
                _ => {
                    return quote! {
                        compile_error!("#[memoize] arguments must be plain identifiers");
                    }
                }
            },
        }
    }

    let rt = runtime_path();
    let cache_ident = format_ident!("MEMORA_CACHE_{}", ident.to_string().to_uppercase());
    let key_expr = generate_key_expr(has_self, &arg_idents);
    let fn_name_str = attrs.custom_name.unwrap_or_else(|| ident.to_string());

    quote! {
        #(#attrs_outer)*
        #vis #sig {
            thread_local! {
                static #cache_ident: #rt::FnCache<#ret_type> =
                    #rt::FnCache::new(#fn_name_str, #strategy);
            }

            let __key: #rt::CacheKey = #key_expr;
            #cache_ident.with(|__cache| __cache.call(__key, || #block))
        }
    }
}
