//! Procedural macros for the aoc-solver library

use proc_macro::TokenStream;
use quote::quote;
use syn::{DeriveInput, Lit, parse_macro_input};

/// Derive macro implementing `Solver` by dispatching to `PartSolver<N>` impls
///
/// # Attributes
///
/// - `max_parts`: Required. Number of parts; each of `1..=max_parts` must have
///   a matching `PartSolver<N>` implementation.
///
/// # Example
///
/// ```ignore
/// use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError};
///
/// #[derive(AocSolver)]
/// #[aoc_solver(max_parts = 2)]
/// struct Day1;
///
/// impl AocParser for Day1 { /* ... */ }
/// impl PartSolver<1> for Day1 { /* ... */ }
/// impl PartSolver<2> for Day1 { /* ... */ }
/// ```
#[proc_macro_derive(AocSolver, attributes(aoc_solver))]
pub fn derive_aoc_solver(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_aoc_solver(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_aoc_solver(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let attr = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("aoc_solver"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "AocSolver derive macro requires #[aoc_solver(max_parts = N)] attribute",
            )
        })?;

    let mut max_parts: Option<u8> = None;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("max_parts") {
            let value: Lit = meta.value()?.parse()?;
            match value {
                Lit::Int(lit_int) => max_parts = Some(lit_int.base10_parse()?),
                other => return Err(syn::Error::new_spanned(other, "max_parts must be an integer")),
            }
            Ok(())
        } else {
            Err(meta.error("unsupported aoc_solver attribute"))
        }
    })?;

    let max_parts = max_parts.ok_or_else(|| syn::Error::new_spanned(attr, "Missing required 'max_parts'"))?;
    if max_parts == 0 {
        return Err(syn::Error::new_spanned(attr, "max_parts must be at least 1"));
    }

    let arms = (1..=max_parts).map(|part| {
        quote! {
            #part => <Self as ::aoc_solver::PartSolver<#part>>::solve(shared),
        }
    });

    Ok(quote! {
        impl #impl_generics ::aoc_solver::Solver for #name #ty_generics #where_clause {
            const PARTS: u8 = #max_parts;

            fn solve_part(
                shared: &mut <Self as ::aoc_solver::AocParser>::SharedData<'_>,
                part: u8,
            ) -> ::core::result::Result<::std::string::String, ::aoc_solver::SolveError> {
                match part {
                    #(#arms)*
                    _ => ::core::result::Result::Err(::aoc_solver::SolveError::PartNotImplemented(part)),
                }
            }
        }
    })
}

/// Derive macro for automatically registering solvers with the plugin system
///
/// This macro generates the necessary code to register a solver with the inventory
/// system, allowing it to be discovered and registered automatically.
///
/// # Attributes
///
/// - `year`: Required. The Advent of Code year (e.g., 2022)
/// - `day`: Required. The day number (1-25)
/// - `tags`: Optional. Array of string literals for filtering (e.g., ["2022", "grid"])
///
/// # Requirements
///
/// The type must implement the `Solver` trait and be a unit struct. If the
/// trait is not implemented you get a trait-bound error on the type.
///
/// # Example
///
/// ```ignore
/// #[derive(AocSolver, AutoRegisterSolver)]
/// #[aoc_solver(max_parts = 2)]
/// #[aoc(year = 2022, day = 1, tags = ["2022", "parsing"])]
/// struct Solver;
/// ```
#[proc_macro_derive(AutoRegisterSolver, attributes(aoc))]
pub fn derive_auto_register_solver(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_auto_register(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_auto_register(input: &DeriveInput) -> syn::Result<proc_macro2::TokenStream> {
    let name = &input.ident;

    let aoc_attr = input
        .attrs
        .iter()
        .find(|attr| attr.path().is_ident("aoc"))
        .ok_or_else(|| {
            syn::Error::new_spanned(
                name,
                "AutoRegisterSolver derive macro requires #[aoc(...)] attribute",
            )
        })?;

    let mut year: Option<u16> = None;
    let mut day: Option<u8> = None;
    let mut tags: Vec<String> = Vec::new();

    aoc_attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("year") {
            let value: Lit = meta.value()?.parse()?;
            if let Lit::Int(lit_int) = value {
                year = Some(lit_int.base10_parse()?);
            }
        } else if meta.path.is_ident("day") {
            let value: Lit = meta.value()?.parse()?;
            if let Lit::Int(lit_int) = value {
                day = Some(lit_int.base10_parse()?);
            }
        } else if meta.path.is_ident("tags") {
            // tags = ["a", "b"]
            let content;
            let _ = meta.value()?;
            syn::bracketed!(content in meta.input);
            while !content.is_empty() {
                let lit: Lit = content.parse()?;
                if let Lit::Str(lit_str) = lit {
                    tags.push(lit_str.value());
                }
                if content.peek(syn::Token![,]) {
                    let _: syn::Token![,] = content.parse()?;
                }
            }
        } else {
            return Err(meta.error("unsupported aoc attribute"));
        }
        Ok(())
    })?;

    let year = year.ok_or_else(|| syn::Error::new_spanned(aoc_attr, "Missing required 'year'"))?;
    let day = day.ok_or_else(|| syn::Error::new_spanned(aoc_attr, "Missing required 'day'"))?;
    if !(1..=25).contains(&day) {
        return Err(syn::Error::new_spanned(aoc_attr, "day must be within 1..=25"));
    }

    let tag_strs = tags.iter().map(|s| s.as_str());

    Ok(quote! {
        const _: () = {
            trait MustImplementSolver: ::aoc_solver::Solver {}
            impl MustImplementSolver for #name {}
        };

        ::aoc_solver::inventory::submit! {
            ::aoc_solver::SolverPlugin {
                year: #year,
                day: #day,
                solver: &#name,
                tags: &[#(#tag_strs),*],
            }
        }
    })
}
