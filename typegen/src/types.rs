//! Canonical display strings for `syn` types.
//!
//! `quote` token output spaces every token apart (`Vec < String >`), which is
//! unreadable in generated code, so the common type forms are printed by hand
//! and only exotic ones fall back to the token text.

use quote::ToTokens;
use syn::punctuated::Punctuated;
use syn::{
    BareFnArg, GenericArgument, Path, PathArguments, PathSegment, QSelf, ReturnType, Type,
    TypeBareFn, TypeParamBound, TraitBoundModifier,
};

/// Render a type the way it would be written in source.
pub fn display(ty: &Type) -> String {
    let mut out = String::new();
    write_type(&mut out, ty);
    out
}

/// Whether the type is one level of indirection over another type.
pub fn is_pointer(ty: &Type) -> bool {
    match ty {
        Type::Reference(_) | Type::Ptr(_) => true,
        Type::Paren(inner) => is_pointer(&inner.elem),
        Type::Group(inner) => is_pointer(&inner.elem),
        _ => false,
    }
}

fn tokens<T: ToTokens>(node: &T) -> String {
    node.to_token_stream().to_string()
}

fn write_type(out: &mut String, ty: &Type) {
    match ty {
        Type::Path(p) => match p.qself {
            Some(ref qself) => write_qualified_path(out, qself, &p.path),
            None => write_path(out, &p.path),
        },
        Type::Reference(r) => {
            out.push('&');
            if let Some(ref lifetime) = r.lifetime {
                out.push_str(&lifetime.to_string());
                out.push(' ');
            }
            if r.mutability.is_some() {
                out.push_str("mut ");
            }
            write_type(out, &r.elem);
        }
        Type::Ptr(p) => {
            out.push_str(if p.mutability.is_some() {
                "*mut "
            } else {
                "*const "
            });
            write_type(out, &p.elem);
        }
        Type::Slice(s) => {
            out.push('[');
            write_type(out, &s.elem);
            out.push(']');
        }
        Type::Array(a) => {
            out.push('[');
            write_type(out, &a.elem);
            out.push_str("; ");
            out.push_str(&tokens(&a.len));
            out.push(']');
        }
        Type::Tuple(t) => {
            out.push('(');
            write_joined(out, &t.elems, ", ", write_type);
            if t.elems.len() == 1 {
                out.push(',');
            }
            out.push(')');
        }
        Type::Paren(p) => {
            out.push('(');
            write_type(out, &p.elem);
            out.push(')');
        }
        Type::Group(g) => write_type(out, &g.elem),
        Type::Never(_) => out.push('!'),
        Type::Infer(_) => out.push('_'),
        Type::TraitObject(t) => {
            out.push_str("dyn ");
            write_joined(out, &t.bounds, " + ", write_bound);
        }
        Type::ImplTrait(t) => {
            out.push_str("impl ");
            write_joined(out, &t.bounds, " + ", write_bound);
        }
        Type::BareFn(f) if f.variadic.is_none() => write_bare_fn(out, f),
        other => out.push_str(&tokens(other)),
    }
}

fn write_path(out: &mut String, path: &Path) {
    if path.leading_colon.is_some() {
        out.push_str("::");
    }
    write_segments(out, path.segments.iter());
}

/// `<T as Trait>::Assoc` and `<T>::Assoc`. The first `qself.position`
/// segments of `path` belong to the trait.
fn write_qualified_path(out: &mut String, qself: &QSelf, path: &Path) {
    out.push('<');
    write_type(out, &qself.ty);
    if qself.position > 0 {
        out.push_str(" as ");
        if path.leading_colon.is_some() {
            out.push_str("::");
        }
        write_segments(out, path.segments.iter().take(qself.position));
    }
    out.push_str(">::");
    write_segments(out, path.segments.iter().skip(qself.position));
}

fn write_segments<'a>(out: &mut String, segments: impl Iterator<Item = &'a PathSegment>) {
    for (i, segment) in segments.enumerate() {
        if i > 0 {
            out.push_str("::");
        }
        out.push_str(&segment.ident.to_string());
        match &segment.arguments {
            PathArguments::None => {}
            PathArguments::AngleBracketed(args) => {
                if args.colon2_token.is_some() {
                    out.push_str("::");
                }
                out.push('<');
                write_joined(out, &args.args, ", ", write_generic_argument);
                out.push('>');
            }
            PathArguments::Parenthesized(args) => {
                out.push('(');
                write_joined(out, &args.inputs, ", ", write_type);
                out.push(')');
                write_return(out, &args.output);
            }
        }
    }
}

fn write_generic_argument(out: &mut String, arg: &GenericArgument) {
    match arg {
        GenericArgument::Lifetime(lifetime) => out.push_str(&lifetime.to_string()),
        GenericArgument::Type(ty) => write_type(out, ty),
        GenericArgument::AssocType(assoc) => {
            out.push_str(&assoc.ident.to_string());
            if let Some(ref generics) = assoc.generics {
                out.push_str(&tokens(generics));
            }
            out.push_str(" = ");
            write_type(out, &assoc.ty);
        }
        GenericArgument::Constraint(constraint) => {
            out.push_str(&constraint.ident.to_string());
            out.push_str(": ");
            write_joined(out, &constraint.bounds, " + ", write_bound);
        }
        other => out.push_str(&tokens(other)),
    }
}

fn write_bound(out: &mut String, bound: &TypeParamBound) {
    match bound {
        TypeParamBound::Trait(trait_bound) => {
            if let Some(ref lifetimes) = trait_bound.lifetimes {
                out.push_str(&tokens(lifetimes));
                out.push(' ');
            }
            if let TraitBoundModifier::Maybe(_) = trait_bound.modifier {
                out.push('?');
            }
            write_path(out, &trait_bound.path);
        }
        TypeParamBound::Lifetime(lifetime) => out.push_str(&lifetime.to_string()),
        other => out.push_str(&tokens(other)),
    }
}

fn write_bare_fn(out: &mut String, f: &TypeBareFn) {
    if let Some(ref lifetimes) = f.lifetimes {
        out.push_str(&tokens(lifetimes));
        out.push(' ');
    }
    if f.unsafety.is_some() {
        out.push_str("unsafe ");
    }
    if let Some(ref abi) = f.abi {
        out.push_str(&tokens(abi));
        out.push(' ');
    }
    out.push_str("fn(");
    write_joined(out, &f.inputs, ", ", |out, arg: &BareFnArg| {
        if let Some((ref name, _)) = arg.name {
            out.push_str(&name.to_string());
            out.push_str(": ");
        }
        write_type(out, &arg.ty);
    });
    out.push(')');
    write_return(out, &f.output);
}

fn write_return(out: &mut String, output: &ReturnType) {
    if let ReturnType::Type(_, ty) = output {
        out.push_str(" -> ");
        write_type(out, ty);
    }
}

fn write_joined<T, P>(
    out: &mut String,
    items: &Punctuated<T, P>,
    sep: &str,
    write: impl Fn(&mut String, &T),
) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write(out, item);
    }
}
