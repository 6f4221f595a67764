//! Override eligibility and return-type ordering between two signatures.

use hierscope_api::models::TypeInfo;

use super::signature::{MethodSignature, is_subsignature, method_renaming};
use super::subtyping::is_subtype;
use super::walker::SupertypeWalker;

/// Whether `sup` may be recorded as a super-signature of `sub` when both
/// are visible in `owner`.
pub fn is_super_method(
    walker: &SupertypeWalker<'_>,
    owner: &TypeInfo,
    sub: &MethodSignature,
    sup: &MethodSignature,
) -> bool {
    let sub_method = &sub.method;
    let super_method = &sup.method;
    if super_method.is_constructor()
        || owner.fqn == super_method.declaring_type
        || !is_subsignature(sup, sub)
    {
        return false;
    }
    let Some(super_type) = walker.resolve(&super_method.declaring_type) else {
        return false;
    };

    if super_type.is_interface() || super_type.is_top_type() {
        // Static interface methods are not inherited and never override.
        if super_method.is_static() || sub_method.is_static() {
            return false;
        }
        if super_method.id == sub_method.id {
            return true;
        }
        return match (sub_method.is_default(), super_method.is_default()) {
            (true, true) => walker.is_inheritor(
                &sub_method.declaring_type,
                &super_method.declaring_type,
                true,
            ),
            (true, false) | (false, true) => !walker
                .is_inheritor_or_self(&super_method.declaring_type, &sub_method.declaring_type),
            (false, false) => true,
        };
    }

    let sub_in_interface = walker
        .resolve(&sub_method.declaring_type)
        .is_some_and(|t| t.is_interface());
    if sub_in_interface {
        return false;
    }
    !owner.is_interface()
        && !walker.is_inheritor_or_self(&super_method.declaring_type, &sub_method.declaring_type)
}

/// Whether `this` returns a strictly more specific type than `that`.
///
/// When `that` is a sub-signature of `this`, `that`'s method type
/// parameters are renamed onto `this`'s first.
pub fn return_more_specific(
    walker: &SupertypeWalker<'_>,
    this: &MethodSignature,
    that: &MethodSignature,
) -> bool {
    let this_ret = this.return_type();
    let mut that_ret = that.return_type();
    if is_subsignature(this, that) {
        if let Some(renaming) = method_renaming(that, this) {
            that_ret = renaming.substitute(&that_ret);
        }
    }
    this_ret != that_ret && is_subtype(walker, &this_ret, &that_ret)
}

/// Whether `this` should take the place of `that` in a slot: a strictly
/// more specific return type, or, between two interface methods, an equal
/// one declared in a sub-interface.
pub fn is_more_specific(
    walker: &SupertypeWalker<'_>,
    this: &MethodSignature,
    that: &MethodSignature,
) -> bool {
    if return_more_specific(walker, this, that) {
        return true;
    }
    let in_interface = |sig: &MethodSignature| {
        walker
            .resolve(sig.declaring_type())
            .is_some_and(|t| t.is_interface())
    };
    this.return_type() == that.return_type()
        && in_interface(this)
        && in_interface(that)
        && walker.is_inheritor(this.declaring_type(), that.declaring_type(), true)
}

/// Whether either return type can stand in for the other.
pub fn returns_compatible(
    walker: &SupertypeWalker<'_>,
    a: &MethodSignature,
    b: &MethodSignature,
) -> bool {
    let (ra, rb) = (a.return_type(), b.return_type());
    ra == rb || is_subtype(walker, &ra, &rb) || is_subtype(walker, &rb, &ra)
}
