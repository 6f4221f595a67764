//! Subtyping rules implementation.
//!
//! Determines if one type is a subtype of another.
//! Supports:
//! - Identity
//! - Primitives (widening)
//! - Classes and interfaces, through the supertype walker
//! - Generic instantiations (invariant arguments, wildcard containment)
//! - Unchecked conversion from raw types
//! - Arrays (covariant for references)
//! - Type variables and captured variables, through their bounds

use hierscope_api::models::{OBJECT_FQN, TypeRef};

use super::walker::SupertypeWalker;

const CLONEABLE_FQN: &str = "java.lang.Cloneable";
const SERIALIZABLE_FQN: &str = "java.io.Serializable";

/// Check if `sub` is a subtype of `sup`.
pub fn is_subtype(walker: &SupertypeWalker<'_>, sub: &TypeRef, sup: &TypeRef) -> bool {
    // 1. Reflexivity
    if sub == sup {
        return true;
    }

    match (sub, sup) {
        (TypeRef::Unknown, _) | (_, TypeRef::Unknown) => false,
        (TypeRef::Wildcard { .. }, _) | (_, TypeRef::Wildcard { .. }) => false,

        // Primitive widening; primitives and references never mix
        (TypeRef::Raw(s1), TypeRef::Raw(s2)) => is_primitive_subtype(s1, s2),
        (TypeRef::Raw(_), _) | (_, TypeRef::Raw(_)) => false,

        // 2. java.lang.Object is a supertype of all reference types
        (_, TypeRef::Id(top)) if top == OBJECT_FQN => true,

        (TypeRef::Captured(cap), _) => is_subtype(walker, &cap.upper, sup),
        (_, TypeRef::Captured(cap)) => cap
            .lower
            .as_ref()
            .is_some_and(|lower| is_subtype(walker, sub, lower)),

        (TypeRef::Var(var), _) => is_subtype(walker, &var.erasure_type(), sup),
        (_, TypeRef::Var(_)) => false,

        (
            TypeRef::Array {
                element: e1,
                dimensions: d1,
            },
            TypeRef::Array {
                element: e2,
                dimensions: d2,
            },
        ) => {
            if d1 == d2 {
                if e1.is_primitive() || e2.is_primitive() {
                    return e1 == e2;
                }
                is_subtype(walker, e1, e2)
            } else if d1 > d2 {
                // The excess dimensions make the sub element a reference array.
                matches!(e2.as_ref(), TypeRef::Id(fqn) if is_array_supertype(fqn))
            } else {
                false
            }
        }
        (TypeRef::Array { .. }, TypeRef::Id(fqn)) => is_array_supertype(fqn),
        (TypeRef::Array { .. }, _) | (_, TypeRef::Array { .. }) => false,

        // Class/Interface hierarchy
        _ => is_class_subtype(walker, sub, sup),
    }
}

fn is_primitive_subtype(sub: &str, sup: &str) -> bool {
    match sub {
        "byte" => matches!(sup, "short" | "int" | "long" | "float" | "double"),
        "short" => matches!(sup, "int" | "long" | "float" | "double"),
        "char" => matches!(sup, "int" | "long" | "float" | "double"),
        "int" => matches!(sup, "long" | "float" | "double"),
        "long" => matches!(sup, "float" | "double"),
        "float" => matches!(sup, "double"),
        _ => false,
    }
}

fn is_array_supertype(fqn: &str) -> bool {
    fqn == OBJECT_FQN || fqn == CLONEABLE_FQN || fqn == SERIALIZABLE_FQN
}

fn is_class_subtype(walker: &SupertypeWalker<'_>, sub: &TypeRef, sup: &TypeRef) -> bool {
    let Some(super_fqn) = sup.class_fqn() else {
        return false;
    };
    let Some(view) = walker.as_supertype(sub, super_fqn) else {
        return false;
    };

    let super_args = sup.type_args();
    let view_args = view.type_args();
    // A raw target accepts every instantiation; a raw view converts unchecked.
    if super_args.is_empty() || view_args.is_empty() {
        return true;
    }
    view_args.len() == super_args.len()
        && view_args
            .iter()
            .zip(super_args)
            .all(|(arg, formal)| contains(walker, arg, formal))
}

/// Type argument containment (JLS 4.5.1).
fn contains(walker: &SupertypeWalker<'_>, arg: &TypeRef, formal: &TypeRef) -> bool {
    match formal {
        TypeRef::Wildcard { bound: None, .. } => true,
        TypeRef::Wildcard {
            bound: Some(bound),
            is_upper_bound: true,
        } => match arg {
            TypeRef::Wildcard {
                bound: Some(arg_bound),
                is_upper_bound: true,
            } => is_subtype(walker, arg_bound, bound),
            TypeRef::Wildcard { .. } => matches!(bound.as_ref(), TypeRef::Id(fqn) if fqn == OBJECT_FQN),
            _ => is_subtype(walker, arg, bound),
        },
        TypeRef::Wildcard {
            bound: Some(bound),
            is_upper_bound: false,
        } => match arg {
            TypeRef::Wildcard {
                bound: Some(arg_bound),
                is_upper_bound: false,
            } => is_subtype(walker, bound, arg_bound),
            TypeRef::Wildcard { .. } => false,
            _ => is_subtype(walker, bound, arg),
        },
        _ => arg == formal,
    }
}
