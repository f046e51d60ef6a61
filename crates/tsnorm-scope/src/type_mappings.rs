//! Mapped types and inherited members.
//!
//! [`evaluate_keys`] reduces the key source of a mapped type (`[K in S]`) to
//! a finite list of property names when that is possible. [`all_members_for`]
//! collects the members of a referenced interface or class together with the
//! ones it inherits.

use crate::loop_detector::LoopDetector;
use crate::scope::Scope;
use tracing::trace;
use tsnorm_tree::{Decl, Ident, Indexing, Member, Tree, Type, TypeRef};

/// The literal keys `tpe` stands for, in first-seen order, or `None` when the
/// key set is not finite or cannot be resolved.
pub fn evaluate_keys(scope: &Scope, tpe: &Type, ld: &LoopDetector) -> Option<Vec<Ident>> {
    if matches!(tpe, Type::This) {
        return None;
    }
    match scope.cache() {
        Some(cache) => {
            let key = (scope.id(), tpe.node_id());
            cache.type_mappings(key, &Tree::Type(tpe.clone()), ld, || {
                evaluate_uncached(scope, tpe, ld)
            })
        }
        None => evaluate_uncached(scope, tpe, ld),
    }
}

fn evaluate_uncached(scope: &Scope, tpe: &Type, ld: &LoopDetector) -> Option<Vec<Ident>> {
    let keys = match tpe {
        Type::Literal(lit) => Some(vec![lit.as_key()?]),
        Type::Union(union) => {
            let mut keys: Vec<Ident> = Vec::new();
            for member in &union.types {
                for key in evaluate_keys(scope, member, ld)? {
                    if !keys.contains(&key) {
                        keys.push(key);
                    }
                }
            }
            Some(keys)
        }
        Type::KeyOf(target) => keys_of(scope, target, ld),
        Type::Ref(r) if r.targs.is_empty() && !scope.is_abstract(&r.name) => scope
            .lookup_type(&r.name, ld)
            .into_iter()
            .find_map(|(decl, owner)| match &decl {
                Decl::TypeAlias(alias) if alias.tparams.is_empty() => {
                    let ld = ld.including_node(&owner, decl.node_id())?;
                    let inner = owner.enter(decl.clone());
                    evaluate_keys(&inner, &alias.alias, &ld)
                }
                _ => None,
            }),
        _ => None,
    };
    trace!(tpe = ?tpe, keys = ?keys, "evaluated mapped type keys");
    keys
}

/// `keyof target`: the names of its members. Index signatures make the key set
/// open, so they yield `None`.
fn keys_of(scope: &Scope, target: &Type, ld: &LoopDetector) -> Option<Vec<Ident>> {
    let members = match target {
        Type::Object(obj) if !Member::is_type_mapping(&obj.members) => obj.members.clone(),
        Type::Ref(r) if !scope.is_abstract(&r.name) => all_members_for(scope, r, ld)?,
        _ => return None,
    };
    let mut keys: Vec<Ident> = Vec::new();
    for member in &members {
        match member {
            Member::Index(idx) if matches!(idx.indexing, Indexing::Dict { .. }) => return None,
            Member::Mapped(_) => return None,
            _ => {}
        }
        if member.is_static() || member.is_class_ctor() {
            continue;
        }
        if let Some(name) = member.name()
            && !keys.contains(name)
        {
            keys.push(name.clone());
        }
    }
    Some(keys)
}

/// Members of the interface, class or object alias `tref` refers to, own
/// members first, followed by inherited members not overridden by name.
///
/// Type arguments are not substituted into inherited members. Returns `None`
/// when `tref` does not resolve to a member-bearing declaration.
pub fn all_members_for(scope: &Scope, tref: &TypeRef, ld: &LoopDetector) -> Option<Vec<Member>> {
    if tref.name.is_primitive() || scope.is_abstract(&tref.name) {
        return None;
    }
    let mut resolved = false;
    let mut own: Vec<Member> = Vec::new();
    let mut inherited: Vec<Member> = Vec::new();

    for (decl, owner) in scope.lookup_type(&tref.name, ld) {
        // Guards `interface A extends B` / `interface B extends A`.
        let Some(ld) = ld.including_node(&owner, decl.node_id()) else {
            continue;
        };
        let inner = owner.enter(decl.clone());
        match &decl {
            Decl::Interface(iface) => {
                resolved = true;
                own.extend(iface.members.iter().cloned());
                for parent in &iface.inheritance {
                    inherited.extend(members_of_type(&inner, parent, &ld));
                }
            }
            Decl::Class(class) => {
                resolved = true;
                own.extend(class.members.iter().cloned());
                for parent in class.parent.iter().chain(&class.implements) {
                    inherited.extend(members_of_type(&inner, parent, &ld));
                }
            }
            Decl::TypeAlias(alias) => {
                if let Some(members) = members_of_alias(&inner, &alias.alias, &ld) {
                    resolved = true;
                    own.extend(members);
                }
            }
            _ => {}
        }
    }

    if !resolved {
        return None;
    }
    for member in inherited {
        let overridden = member
            .name()
            .is_some_and(|name| own.iter().any(|m| m.name() == Some(name)));
        if !overridden {
            own.push(member);
        }
    }
    Some(own)
}

fn members_of_type(scope: &Scope, tpe: &Type, ld: &LoopDetector) -> Vec<Member> {
    match tpe {
        Type::Ref(r) => all_members_for(scope, r, ld).unwrap_or_default(),
        Type::Object(obj) => obj.members.clone(),
        _ => Vec::new(),
    }
}

fn members_of_alias(scope: &Scope, alias: &Type, ld: &LoopDetector) -> Option<Vec<Member>> {
    match alias {
        Type::Object(obj) if !Member::is_type_mapping(&obj.members) => Some(obj.members.clone()),
        Type::Ref(r) => all_members_for(scope, r, ld),
        Type::Intersect(parts) => {
            let mut out = Vec::new();
            for part in &parts.types {
                out.extend(members_of_alias(scope, part, ld)?);
            }
            Some(out)
        }
        _ => None,
    }
}
