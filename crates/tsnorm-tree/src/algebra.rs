//! Type algebra: union/intersection simplification and optional types.
//!
//! These are free functions over structural equality. Member order is
//! significant for the printer, so deduplication keeps the first occurrence
//! instead of sorting the way an interner would.

use crate::comments::Comments;
use crate::members::Member;
use crate::types::{ObjectType, Type};
use smallvec::SmallVec;
use std::sync::Arc;

type TypeListBuffer = SmallVec<[Type; 8]>;

// =============================================================================
// Unions
// =============================================================================

/// Flatten nested unions, drop structural duplicates (first occurrence wins),
/// collapse a single survivor and turn an empty union into `never`.
pub fn simplify_union(types: Vec<Type>) -> Type {
    let mut flat: TypeListBuffer = SmallVec::new();
    for tpe in types {
        push_union_member(&mut flat, tpe);
    }

    let mut unique: Vec<Type> = Vec::with_capacity(flat.len());
    for tpe in flat {
        if !unique.contains(&tpe) {
            unique.push(tpe);
        }
    }

    match unique.len() {
        0 => Type::never(),
        1 => unique.pop().unwrap_or_else(Type::never),
        _ => Type::union(unique),
    }
}

fn push_union_member(flat: &mut TypeListBuffer, member: Type) {
    match member {
        Type::Union(inner) => {
            for tpe in &inner.types {
                push_union_member(flat, tpe.clone());
            }
        }
        other => flat.push(other),
    }
}

// =============================================================================
// Intersections
// =============================================================================

/// Flatten nested intersections and merge their object-shaped members into a
/// single object. A later member wins over an earlier one of the same name.
///
/// Objects whose body is a mapped type are never merged: their members are
/// generated from a key set and cannot be combined structurally.
pub fn simplify_intersection(types: Vec<Type>) -> Type {
    let mut flat: TypeListBuffer = SmallVec::new();
    for tpe in types {
        push_intersection_member(&mut flat, tpe);
    }

    let mut unique: Vec<Type> = Vec::with_capacity(flat.len());
    for tpe in flat {
        if !unique.contains(&tpe) {
            unique.push(tpe);
        }
    }

    let mut result: Vec<Type> = Vec::with_capacity(unique.len());
    let mut mergeable: Vec<Arc<ObjectType>> = Vec::new();
    let mut merged_slot: Option<usize> = None;

    for tpe in unique {
        match &tpe {
            Type::Object(obj) if !Member::is_type_mapping(&obj.members) => {
                if merged_slot.is_none() {
                    merged_slot = Some(result.len());
                    // Placeholder, replaced below.
                    result.push(Type::This);
                }
                mergeable.push(obj.clone());
            }
            _ => result.push(tpe),
        }
    }

    if let Some(slot) = merged_slot {
        result[slot] = if mergeable.len() == 1 {
            Type::Object(mergeable.swap_remove(0))
        } else {
            merge_objects(&mergeable)
        };
    }

    match result.len() {
        0 => Type::unknown(),
        1 => result.pop().unwrap_or_else(Type::unknown),
        _ => Type::intersect(result),
    }
}

fn push_intersection_member(flat: &mut TypeListBuffer, member: Type) {
    match member {
        Type::Intersect(inner) => {
            for tpe in &inner.types {
                push_intersection_member(flat, tpe.clone());
            }
        }
        other => flat.push(other),
    }
}

/// Concatenate member lists. When a later object declares a name an earlier
/// object already declared, the later members take the earlier position and
/// the earlier ones are dropped.
fn merge_objects(objects: &[Arc<ObjectType>]) -> Type {
    // (origin object index, member)
    let mut merged: Vec<(usize, Member)> = Vec::new();

    for (origin, obj) in objects.iter().enumerate() {
        for member in &obj.members {
            let Some(name) = member.name() else {
                merged.push((origin, member.clone()));
                continue;
            };
            let earlier = merged
                .iter()
                .position(|(o, m)| *o != origin && m.name() == Some(name));
            match earlier {
                Some(pos) => {
                    merged[pos] = (origin, member.clone());
                    let mut i = pos + 1;
                    while i < merged.len() {
                        if merged[i].0 != origin && merged[i].1.name() == Some(name) {
                            merged.remove(i);
                        } else {
                            i += 1;
                        }
                    }
                }
                None => merged.push((origin, member.clone())),
            }
        }
    }

    let comments = objects
        .iter()
        .fold(Comments::none(), |acc, o| acc.concat(&o.comments));
    Type::Object(Arc::new(ObjectType {
        comments,
        members: merged.into_iter().map(|(_, m)| m).collect(),
    }))
}

// =============================================================================
// Optional types
// =============================================================================

/// `T | undefined`, simplified.
pub fn make_optional(tpe: Type) -> Type {
    simplify_union(vec![tpe, Type::undefined()])
}

/// The non-optional part of `T | undefined`, or `None` if `tpe` is not
/// optional.
///
/// A bare `undefined` is its own optional form and extracts to itself, so
/// `extract_optional(make_optional(t)) == Some(t)` holds for every non-union
/// `t`.
pub fn extract_optional(tpe: &Type) -> Option<Type> {
    match tpe {
        Type::Union(u) if u.types.iter().any(Type::is_undefined) => {
            let rest: Vec<Type> = u
                .types
                .iter()
                .filter(|t| !t.is_undefined())
                .cloned()
                .collect();
            Some(simplify_union(rest))
        }
        t if t.is_undefined() => Some(t.clone()),
        _ => None,
    }
}

#[cfg(test)]
#[path = "tests/algebra_merge_tests.rs"]
mod algebra_merge_tests;
