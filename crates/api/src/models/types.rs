use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use super::symbol::MethodId;

/// Fully qualified name of the universal top type.
pub const OBJECT_FQN: &str = "java.lang.Object";

const PRIMITIVES: &[&str] = &[
    "boolean", "byte", "short", "char", "int", "long", "float", "double", "void",
];

/// Who declares a type parameter.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
#[serde(tag = "kind", content = "data")]
pub enum TypeVarOwner {
    /// Declared on a class or interface (FQN).
    Type(String),
    /// Declared on a generic method.
    Method(MethodId),
}

/// A use of a declared type parameter.
///
/// The erasure of the leftmost bound is carried along so that erasing a
/// variable never needs to consult the declaring entity again. Identity is
/// the name and the owner only.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TypeVar {
    pub name: String,
    pub owner: TypeVarOwner,
    /// FQN of the erased leftmost bound, `None` for `java.lang.Object`.
    #[serde(default)]
    pub erasure: Option<String>,
}

impl PartialEq for TypeVar {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.owner == other.owner
    }
}

impl Eq for TypeVar {}

impl Hash for TypeVar {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.owner.hash(state);
    }
}

impl TypeVar {
    pub fn new(name: impl Into<String>, owner: TypeVarOwner) -> Self {
        Self {
            name: name.into(),
            owner,
            erasure: None,
        }
    }

    pub fn with_erasure(mut self, erasure: Option<String>) -> Self {
        self.erasure = erasure;
        self
    }

    /// The erased form of this variable as a type.
    pub fn erasure_type(&self) -> TypeRef {
        TypeRef::Id(
            self.erasure
                .clone()
                .unwrap_or_else(|| OBJECT_FQN.to_string()),
        )
    }
}

/// A fresh variable produced by capture conversion of a wildcard argument.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct CapturedVar {
    pub index: u32,
    pub upper: Box<TypeRef>,
    pub lower: Option<Box<TypeRef>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
#[serde(tag = "kind", content = "data")]
pub enum TypeRef {
    /// Primitive or unresolved type name (e.g., "int", "void")
    Raw(String),

    /// Reference to a declared class or interface (FQN)
    Id(String),

    /// Generic instantiation (e.g., List<String>)
    Generic {
        base: Box<TypeRef>,
        args: Vec<TypeRef>,
    },

    /// Array type (e.g., String[])
    Array {
        element: Box<TypeRef>,
        dimensions: usize,
    },

    /// Wildcard type (e.g., ? extends Number)
    Wildcard {
        bound: Option<Box<TypeRef>>,
        is_upper_bound: bool, // true: extends, false: super
    },

    /// Use of a declared type parameter
    Var(TypeVar),

    /// Captured wildcard
    Captured(CapturedVar),

    #[default]
    Unknown,
}

impl TypeRef {
    /// Helper to create a Raw type
    pub fn raw(s: impl Into<String>) -> Self {
        TypeRef::Raw(s.into())
    }

    /// Helper to create an Id type
    pub fn id(s: impl Into<String>) -> Self {
        TypeRef::Id(s.into())
    }

    pub fn void() -> Self {
        TypeRef::Raw("void".to_string())
    }

    pub fn object() -> Self {
        TypeRef::Id(OBJECT_FQN.to_string())
    }

    pub fn generic(base: impl Into<String>, args: Vec<TypeRef>) -> Self {
        TypeRef::Generic {
            base: Box::new(TypeRef::Id(base.into())),
            args,
        }
    }

    pub fn array(element: TypeRef, dimensions: usize) -> Self {
        match element {
            TypeRef::Array {
                element,
                dimensions: inner,
            } => TypeRef::Array {
                element,
                dimensions: inner + dimensions,
            },
            other => TypeRef::Array {
                element: Box::new(other),
                dimensions,
            },
        }
    }

    pub fn wildcard() -> Self {
        TypeRef::Wildcard {
            bound: None,
            is_upper_bound: true,
        }
    }

    pub fn extends(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            is_upper_bound: true,
        }
    }

    pub fn super_of(bound: TypeRef) -> Self {
        TypeRef::Wildcard {
            bound: Some(Box::new(bound)),
            is_upper_bound: false,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, TypeRef::Raw(s) if s == "void")
    }

    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeRef::Raw(s) if PRIMITIVES.contains(&s.as_str()))
    }

    /// FQN of the class this type refers to, for plain and generic references.
    pub fn class_fqn(&self) -> Option<&str> {
        match self {
            TypeRef::Id(fqn) => Some(fqn),
            TypeRef::Generic { base, .. } => base.class_fqn(),
            _ => None,
        }
    }

    /// Type arguments of a generic instantiation, empty otherwise.
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Generic { args, .. } => args,
            _ => &[],
        }
    }

    /// Erasure (JLS 4.6): drop type arguments and replace variables by their bounds.
    pub fn erasure(&self) -> TypeRef {
        match self {
            TypeRef::Raw(_) | TypeRef::Id(_) | TypeRef::Unknown => self.clone(),
            TypeRef::Generic { base, .. } => base.erasure(),
            TypeRef::Array {
                element,
                dimensions,
            } => TypeRef::array(element.erasure(), *dimensions),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound: true,
            } => bound.erasure(),
            TypeRef::Wildcard { .. } => TypeRef::object(),
            TypeRef::Var(var) => var.erasure_type(),
            TypeRef::Captured(cap) => cap.upper.erasure(),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Raw(name) | TypeRef::Id(name) => f.write_str(name),
            TypeRef::Generic { base, args } => {
                write!(f, "{}<", base)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(">")
            }
            TypeRef::Array {
                element,
                dimensions,
            } => {
                write!(f, "{}", element)?;
                for _ in 0..*dimensions {
                    f.write_str("[]")?;
                }
                Ok(())
            }
            TypeRef::Wildcard { bound: None, .. } => f.write_str("?"),
            TypeRef::Wildcard {
                bound: Some(bound),
                is_upper_bound,
            } => {
                let keyword = if *is_upper_bound { "extends" } else { "super" };
                write!(f, "? {} {}", keyword, bound)
            }
            TypeRef::Var(var) => f.write_str(&var.name),
            TypeRef::Captured(cap) => write!(f, "CAP#{}", cap.index),
            TypeRef::Unknown => f.write_str("<unknown>"),
        }
    }
}

/// A generic type parameter declaration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct TypeParameter {
    /// Parameter name, e.g., "T"
    pub name: String,
    /// Upper bounds, e.g., `Comparable<T>` and `Serializable` for `T extends Comparable<T> & Serializable`
    #[serde(default)]
    pub bounds: Vec<TypeRef>,
}

impl TypeParameter {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        Self {
            name: name.into(),
            bounds,
        }
    }

    /// A use of this parameter, erasing to its leftmost bound.
    pub fn as_var(&self, owner: TypeVarOwner) -> TypeVar {
        let erasure = self.bounds.first().and_then(|bound| match bound {
            TypeRef::Var(var) => var.erasure.clone(),
            other => other.class_fqn().map(str::to_string),
        });
        TypeVar::new(self.name.clone(), owner).with_erasure(erasure)
    }
}
