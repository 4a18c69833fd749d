//! Data model for a described declaration, independent of any template.
//!
//! The serialized form of [`Description`] is exactly what templates see.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Complete description of one declaration. Fed to the template engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Description {
    /// Identifier of the described declaration.
    pub name: String,
    /// Owning module. `None` when no source was resolved.
    pub package: Option<Package>,
    /// Bindings introduced by `use` items in the declaration's scope.
    pub imports: Vec<Package>,
    #[serde(flatten)]
    shape: Shape,
    is_interface: bool,
    is_struct: bool,
}

impl Description {
    pub fn new(name: impl Into<String>, shape: Shape) -> Self {
        Description {
            name: name.into(),
            package: None,
            imports: Vec::new(),
            is_interface: shape.is_interface(),
            is_struct: shape.is_struct(),
            shape,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn with_package(mut self, package: Package, imports: Vec<Package>) -> Self {
        self.package = Some(package);
        self.imports = imports;
        self
    }
}

/// What the declaration looks like: a trait, a struct, or anything else.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    Interface {
        methods: Vec<Method>,
    },
    Struct {
        fields: Vec<Field>,
    },
    #[default]
    Other,
}

impl Shape {
    pub fn is_interface(&self) -> bool {
        matches!(self, Shape::Interface { .. })
    }

    pub fn is_struct(&self) -> bool {
        matches!(self, Shape::Struct { .. })
    }

    pub fn methods(&self) -> &[Method] {
        match self {
            Shape::Interface { methods } => methods,
            _ => &[],
        }
    }

    pub fn fields(&self) -> &[Field] {
        match self {
            Shape::Struct { fields } => fields,
            _ => &[],
        }
    }
}

/// A module, either the one owning the declaration or an imported binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Package {
    pub name: String,
    pub path: String,
}

impl Package {
    pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
        Package {
            name: name.into(),
            path: path.into(),
        }
    }
}

/// A method declared directly in a trait body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Method {
    pub name: String,
    pub receiver: Receiver,
    pub params: Vec<Var>,
    /// Empty for `()`, otherwise a single unnamed entry.
    pub results: Vec<Var>,
}

/// How a method takes `self`. Serialized as the receiver's source text, which
/// is empty for associated functions, so `{% if m.receiver %}` tells them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    None,
    Ref,
    RefMut,
    Value,
}

impl Receiver {
    pub fn as_str(&self) -> &'static str {
        match self {
            Receiver::None => "",
            Receiver::Ref => "&self",
            Receiver::RefMut => "&mut self",
            Receiver::Value => "self",
        }
    }
}

impl Serialize for Receiver {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A parameter or result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Var {
    /// Empty for `_` patterns and results.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// A struct field with its parsed annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Index (`"0"`, `"1"`, ...) for tuple struct fields.
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
    pub tags: IndexMap<String, String>,
}

/// Resolved type reference: display string plus indirection flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeRef {
    pub name: String,
    /// True for references and raw pointers.
    pub is_pointer: bool,
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn bare_description_serializes_as_other() {
        let desc = Description::new("Mock", Shape::Other);
        let value = serde_json::to_value(&desc).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "Mock",
                "package": null,
                "imports": [],
                "kind": "other",
                "is_interface": false,
                "is_struct": false,
            })
        );
    }

    #[test]
    fn interface_serializes_methods() {
        let shape = Shape::Interface {
            methods: vec![Method {
                name: "init".to_string(),
                receiver: Receiver::Ref,
                params: vec![Var {
                    name: "ctx".to_string(),
                    ty: TypeRef {
                        name: "Context".to_string(),
                        is_pointer: false,
                    },
                }],
                results: Vec::new(),
            }],
        };
        let desc = Description::new("Example", shape)
            .with_package(Package::new("noop", "noop"), Vec::new());
        let value = serde_json::to_value(&desc).unwrap();
        assert_eq!(value["kind"], "interface");
        assert_eq!(value["is_interface"], true);
        assert_eq!(value["package"]["name"], "noop");
        assert_eq!(value["methods"][0]["receiver"], "&self");
        assert_eq!(value["methods"][0]["params"][0]["type"]["name"], "Context");
        assert!(value.get("fields").is_none());
    }

    #[test]
    fn associated_function_has_empty_receiver() {
        let method = Method {
            name: "new".to_string(),
            receiver: Receiver::None,
            params: Vec::new(),
            results: Vec::new(),
        };
        let value = serde_json::to_value(&method).unwrap();
        assert_eq!(value["receiver"], "");
        assert_eq!(serde_json::to_value(Receiver::Value).unwrap(), "self");
    }

    #[test]
    fn shape_accessors() {
        let shape = Shape::Struct { fields: Vec::new() };
        assert!(shape.is_struct());
        assert!(!shape.is_interface());
        assert!(shape.methods().is_empty());
        assert!(Shape::Other.fields().is_empty());
    }

    #[test]
    fn type_ref_displays_name() {
        let ty = TypeRef {
            name: "*const String".to_string(),
            is_pointer: true,
        };
        assert_eq!(ty.to_string(), "*const String");
    }
}
