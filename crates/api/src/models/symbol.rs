use serde::{Deserialize, Serialize};
use std::fmt;

use super::types::{OBJECT_FQN, TypeParameter, TypeRef};

/// Kind of a declared type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
    Enum,
    Annotation,
    /// Anonymous or local class; its single base type is its only direct supertype.
    Anonymous,
}

/// Information about a declared type (class, interface, enum, ...)
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    /// Fully qualified name, e.g., "java.util.List"
    pub fqn: String,
    /// Kind of type
    pub kind: TypeKind,
    /// Modifiers like public, abstract, final
    #[serde(default)]
    pub modifiers: Vec<String>,
    /// Generic type parameters, e.g., `<T, U extends Comparable<T>>`
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
}

impl TypeInfo {
    pub fn is_interface(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Annotation)
    }

    pub fn is_annotation(&self) -> bool {
        self.kind == TypeKind::Annotation
    }

    pub fn is_top_type(&self) -> bool {
        self.fqn == OBJECT_FQN
    }
}

/// Stable identity of a declared method: its declaring type plus declaration index.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodId {
    pub declaring_type: String,
    pub index: u32,
}

impl MethodId {
    pub fn new(declaring_type: impl Into<String>, index: u32) -> Self {
        Self {
            declaring_type: declaring_type.into(),
            index,
        }
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.declaring_type, self.index)
    }
}

/// Kind of member
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Constructor,
}

/// Information about a method parameter
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ParameterInfo {
    /// Parameter name (may be synthetic like "arg0")
    pub name: String,
    /// Parameter type
    pub type_ref: TypeRef,
    /// True when this parameter is declared with `...` varargs syntax.
    #[serde(default)]
    pub is_varargs: bool,
}

/// Information about a declared method or constructor
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub id: MethodId,
    /// Simple name, e.g., "get" or "size"
    pub name: String,
    pub kind: MemberKind,
    /// The type that declares this method
    pub declaring_type: String,
    pub return_type: TypeRef,
    pub parameters: Vec<ParameterInfo>,
    /// Method-level generic parameters, e.g. `<T>` in `<T> T[] toArray(T[] a)`
    pub type_parameters: Vec<TypeParameter>,
    /// Modifiers like public, static, default
    pub modifiers: Vec<String>,
    /// False for synthetic or copied declarations that do not live in a source file.
    pub is_physical: bool,
    /// False once the declaration has been removed from the program model.
    pub is_valid: bool,
}

impl MethodInfo {
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers.iter().any(|m| m == modifier)
    }

    pub fn is_static(&self) -> bool {
        self.has_modifier("static")
    }

    pub fn is_private(&self) -> bool {
        self.has_modifier("private")
    }

    pub fn is_default(&self) -> bool {
        self.has_modifier("default")
    }

    pub fn is_abstract(&self) -> bool {
        self.has_modifier("abstract")
    }

    pub fn is_constructor(&self) -> bool {
        self.kind == MemberKind::Constructor
    }

    pub fn parameter_types(&self) -> impl Iterator<Item = &TypeRef> {
        self.parameters.iter().map(|p| &p.type_ref)
    }
}

impl fmt::Display for MethodInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}(", self.declaring_type, self.name)?;
        for (i, param) in self.parameters.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", param.type_ref)?;
        }
        f.write_str(")")
    }
}
