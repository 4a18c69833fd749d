//! Descriptor extraction: walk a resolved trait or struct into a [`Description`].
//!
//! Extraction is pure. Declaration order is preserved for methods,
//! parameters and fields, and a single malformed annotation fails the
//! whole extraction.

use crate::model::{Description, Field, Method, Receiver, Shape, TypeRef, Var};
use crate::resolve::{Declaration, Resolved};
use crate::types;
use indexmap::IndexMap;
use syn::{
    Attribute, Expr, ExprLit, FnArg, Fields, ItemTrait, Lit, LitStr, Meta, Pat, ReturnType,
    Signature, TraitItem, Type,
};
use thiserror::Error;
use typegen_syntax::AnnotationError;

/// Attribute name carrying field annotations unless configured otherwise.
pub const DEFAULT_ANNOTATION_KEY: &str = "typegen";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("field `{field}` has a malformed annotation")]
    Annotation {
        field: String,
        #[source]
        source: AnnotationError,
    },
    #[error("field `{field}`: {message}")]
    InvalidAttribute { field: String, message: String },
}

/// Build the description of a resolved declaration.
///
/// Traits yield methods, structs yield fields, anything else yields a
/// description with neither.
pub fn describe(
    name: &str,
    resolved: &Resolved,
    annotation_key: &str,
) -> Result<Description, ExtractError> {
    let shape = match &resolved.declaration {
        Declaration::Trait(item) => Shape::Interface {
            methods: extract_methods(item),
        },
        Declaration::Struct(item) => Shape::Struct {
            fields: extract_fields(&item.fields, annotation_key)?,
        },
        Declaration::Other { .. } => Shape::Other,
    };
    Ok(Description::new(name, shape)
        .with_package(resolved.package.clone(), resolved.imports.clone()))
}

/// Methods declared in the trait body. Supertraits, associated types and
/// constants are not methods of the trait itself and are skipped.
pub fn extract_methods(item: &ItemTrait) -> Vec<Method> {
    item.items
        .iter()
        .filter_map(|item| match item {
            TraitItem::Fn(f) => Some(extract_method(&f.sig)),
            _ => None,
        })
        .collect()
}

fn extract_method(sig: &Signature) -> Method {
    let mut receiver = Receiver::None;
    let mut params = Vec::new();
    for input in &sig.inputs {
        match input {
            FnArg::Receiver(r) => {
                receiver = match (r.reference.is_some(), r.mutability.is_some()) {
                    (true, true) => Receiver::RefMut,
                    (true, false) => Receiver::Ref,
                    (false, _) => Receiver::Value,
                };
            }
            FnArg::Typed(arg) => params.push(Var {
                name: pattern_name(&arg.pat),
                ty: type_ref(&arg.ty),
            }),
        }
    }

    Method {
        name: sig.ident.to_string(),
        receiver,
        params,
        results: extract_results(&sig.output),
    }
}

fn pattern_name(pat: &Pat) -> String {
    match pat {
        Pat::Ident(p) => p.ident.to_string(),
        _ => String::new(),
    }
}

fn extract_results(output: &ReturnType) -> Vec<Var> {
    match output {
        ReturnType::Default => Vec::new(),
        ReturnType::Type(_, ty) if matches!(&**ty, Type::Tuple(t) if t.elems.is_empty()) => {
            Vec::new()
        }
        ReturnType::Type(_, ty) => vec![Var {
            name: String::new(),
            ty: type_ref(ty),
        }],
    }
}

/// Fields in declaration order with their parsed annotations.
pub fn extract_fields(fields: &Fields, annotation_key: &str) -> Result<Vec<Field>, ExtractError> {
    fields
        .iter()
        .enumerate()
        .map(|(i, field)| -> Result<Field, ExtractError> {
            let name = field
                .ident
                .as_ref()
                .map(|ident| ident.to_string())
                .unwrap_or_else(|| i.to_string());

            let raw = raw_annotation(&field.attrs, annotation_key).map_err(|message| {
                ExtractError::InvalidAttribute {
                    field: name.clone(),
                    message,
                }
            })?;
            let tags = match raw {
                Some(raw) => typegen_syntax::parse_flat(&raw).map_err(|source| {
                    ExtractError::Annotation {
                        field: name.clone(),
                        source,
                    }
                })?,
                None => IndexMap::new(),
            };

            Ok(Field {
                name,
                ty: type_ref(&field.ty),
                tags,
            })
        })
        .collect()
}

/// The annotation string of the first attribute named `key`, if any.
/// Accepts `#[key("...")]` and `#[key = "..."]`.
fn raw_annotation(attrs: &[Attribute], key: &str) -> Result<Option<String>, String> {
    let expected = || format!(r#"expected `#[{key}("...")]` or `#[{key} = "..."]`"#);

    let Some(attr) = attrs.iter().find(|attr| attr.path().is_ident(key)) else {
        return Ok(None);
    };
    match &attr.meta {
        Meta::NameValue(meta) => match &meta.value {
            Expr::Lit(ExprLit {
                lit: Lit::Str(value),
                ..
            }) => Ok(Some(value.value())),
            _ => Err(expected()),
        },
        Meta::List(list) => list
            .parse_args::<LitStr>()
            .map(|value| Some(value.value()))
            .map_err(|_| expected()),
        Meta::Path(_) => Err(expected()),
    }
}

/// Resolved reference for a type: display string and indirection flag.
pub fn type_ref(ty: &Type) -> TypeRef {
    TypeRef {
        name: types::display(ty),
        is_pointer: types::is_pointer(ty),
    }
}
