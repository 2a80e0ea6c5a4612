//! Parsing of `#[memoize(...)]` arguments.

use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{punctuated::Punctuated, Expr, Lit, MetaNameValue, Token};

/// Parsed attribute arguments.
#[derive(Default)]
pub struct MemoizeAttributes {
    pub hash: bool,
    pub equality: Option<String>,
    pub depth: Option<usize>,
    pub size: Option<usize>,
    pub custom_name: Option<String>,
}

impl MemoizeAttributes {
    /// Expression building the `CacheStrategy` for these attributes.
    pub fn strategy_expr(&self) -> Result<TokenStream2, TokenStream2> {
        let rt = crate::runtime_path();
        let options = match (self.hash, self.equality.as_deref()) {
            (true, Some(_)) => {
                return Err(
                    quote! { compile_error!("`hash` and `equality` can't be combined, choose one") },
                )
            }
            (_, None) => {
                if self.size.is_some() || self.depth.is_some() {
                    return Err(
                        quote! { compile_error!("`size` and `depth` require `equality = \"...\"`") },
                    );
                }
                return Ok(quote! { #rt::CacheStrategy::Hash });
            }
            (false, Some("strict")) => quote! { #rt::EqualityOptions::strict() },
            (false, Some("shallow")) => quote! { #rt::EqualityOptions::shallow() },
            (false, Some("deep")) => match self.depth {
                Some(depth) => quote! { #rt::EqualityOptions::deep_with_depth(#depth) },
                None => quote! { #rt::EqualityOptions::deep() },
            },
            (false, Some(_)) => {
                return Err(
                    quote! { compile_error!("Invalid equality: expected \"strict\", \"shallow\", or \"deep\"") },
                )
            }
        };

        if self.depth.is_some() && self.equality.as_deref() != Some("deep") {
            return Err(quote! { compile_error!("`depth` only applies to `equality = \"deep\"`") });
        }

        let options = match self.size {
            Some(size) => quote! { #options.with_size(#size) },
            None => options,
        };
        Ok(quote! { #rt::CacheStrategy::Equality(#options) })
    }
}

fn parse_usize(nv: &MetaNameValue, what: &str) -> Result<usize, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Int(lit_int) => lit_int.base10_parse::<usize>().map_err(|_| {
                let msg = format!("`{}` must be a non-negative integer", what);
                quote! { compile_error!(#msg) }
            }),
            _ => {
                let msg = format!("Invalid literal for `{}`: expected integer", what);
                Err(quote! { compile_error!(#msg) })
            }
        },
        _ => {
            let msg = format!("Invalid syntax for `{}`: expected `{} = <integer>`", what, what);
            Err(quote! { compile_error!(#msg) })
        }
    }
}

fn parse_string(nv: &MetaNameValue, what: &str) -> Result<String, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Str(s) => Ok(s.value()),
            _ => {
                let msg = format!("Invalid literal for `{}`: expected string", what);
                Err(quote! { compile_error!(#msg) })
            }
        },
        _ => {
            let msg = format!("Invalid syntax for `{}`: expected `{} = \"...\"`", what, what);
            Err(quote! { compile_error!(#msg) })
        }
    }
}

fn parse_bool(nv: &MetaNameValue, what: &str) -> Result<bool, TokenStream2> {
    match &nv.value {
        Expr::Lit(expr_lit) => match &expr_lit.lit {
            Lit::Bool(b) => Ok(b.value),
            _ => {
                let msg = format!("Invalid literal for `{}`: expected `true` or `false`", what);
                Err(quote! { compile_error!(#msg) })
            }
        },
        _ => {
            let msg = format!("Invalid syntax for `{}`: expected `{} = true`", what, what);
            Err(quote! { compile_error!(#msg) })
        }
    }
}

/// Parses the attribute token stream.
pub fn parse_attributes(attr: TokenStream2) -> Result<MemoizeAttributes, TokenStream2> {
    use syn::parse::Parser;

    let parser = Punctuated::<MetaNameValue, Token![,]>::parse_terminated;
    let parsed_args = parser.parse2(attr).map_err(|e| {
        let msg = format!("Failed to parse attributes: {}", e);
        quote! { compile_error!(#msg) }
    })?;

    let mut attrs = MemoizeAttributes::default();

    for nv in parsed_args {
        if nv.path.is_ident("hash") {
            attrs.hash = parse_bool(&nv, "hash")?;
        } else if nv.path.is_ident("equality") {
            attrs.equality = Some(parse_string(&nv, "equality")?);
        } else if nv.path.is_ident("depth") {
            attrs.depth = Some(parse_usize(&nv, "depth")?);
        } else if nv.path.is_ident("size") {
            attrs.size = Some(parse_usize(&nv, "size")?);
        } else if nv.path.is_ident("name") {
            attrs.custom_name = Some(parse_string(&nv, "name")?);
        } else {
            return Err(
                quote! { compile_error!("Unknown attribute: expected `hash`, `equality`, `depth`, `size`, or `name`") },
            );
        }
    }

    Ok(attrs)
}
