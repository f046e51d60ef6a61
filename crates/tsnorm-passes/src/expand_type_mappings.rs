//! Mapped type expansion.
//!
//! `{ [K in "a" | "b"]?: T[K] }` over a finite key set becomes the object
//! `{ a?: T["a"]; b?: T["b"] }`, with the lookups resolved where the source
//! members can be found. Key sets that stay open (index signatures, abstract
//! type parameters, key remapping with `as`) are left alone.

use crate::pass::{LibraryPass, run_scoped};
use crate::type_rewriter::TypeRewriter;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;
use tsnorm_scope::{LoopDetector, Scope, all_members_for, evaluate_keys};
use tsnorm_transform::{TransformResult, TreeTransformation, scope_follows_tree, visit_type};
use tsnorm_tree::{
    Comments, Ident, Literal, MappedMember, Member, ObjectType, OptionalModifier, ParsedFile,
    PropertyMember, QIdent, ReadonlyModifier, Tree, Type, extract_optional, make_optional,
};

#[derive(Debug, Default)]
pub struct ExpandTypeMappings;

impl TreeTransformation for ExpandTypeMappings {
    scope_follows_tree!();

    fn leave_type(&mut self, scope: &Scope, x: Type) -> TransformResult<Type> {
        let Type::Object(obj) = &x else {
            return Ok(x);
        };
        let [Member::Mapped(mapped)] = obj.members.as_slice() else {
            return Ok(x);
        };
        if mapped.as_name.is_some() {
            return Ok(x);
        }
        let ld = LoopDetector::new();
        let Some(keys) = evaluate_keys(scope, &mapped.from, &ld) else {
            return Ok(x);
        };
        debug!(key = %mapped.key, keys = keys.len(), "expanding mapped type");

        let mut members = Vec::with_capacity(keys.len());
        for key in keys {
            members.push(expand_key(scope, mapped, key)?);
        }
        Ok(Type::Object(Arc::new(ObjectType {
            comments: obj.comments.concat(&mapped.comments),
            members,
        })))
    }
}

fn expand_key(scope: &Scope, mapped: &MappedMember, key: Ident) -> TransformResult<Member> {
    let mut substitution = FxHashMap::default();
    substitution.insert(
        Type::reference(QIdent::of(mapped.key.clone()), Vec::new()),
        Type::str_lit(key.as_str()),
    );
    let substituted = TypeRewriter::new(substitution).rewrite_type(mapped.to.clone())?;
    let mut lookups = ResolveLookups {
        scope: scope.clone(),
    };
    let resolved = visit_type(&mut lookups, &(), substituted)?;

    let tpe = match mapped.optionalize {
        OptionalModifier::Optionalize => make_optional(resolved),
        OptionalModifier::Deoptionalize => extract_optional(&resolved).unwrap_or(resolved),
        OptionalModifier::Noop => resolved,
    };
    Ok(Member::Property(Arc::new(PropertyMember {
        comments: Comments::none(),
        level: mapped.level,
        name: key,
        tpe: Some(tpe),
        expr: None,
        is_static: false,
        is_readonly: mapped.readonly == ReadonlyModifier::Yes,
    })))
}

/// Replaces `T["k"]` with the type of property `k` of `T` when `T` is an
/// object literal or resolves to one.
struct ResolveLookups {
    scope: Scope,
}

impl ResolveLookups {
    fn property_type(&self, from: &Type, key: &Ident) -> Option<Type> {
        let members = match from {
            Type::Object(o) => o.members.clone(),
            Type::Ref(r) => all_members_for(&self.scope, r, &LoopDetector::new())?,
            _ => return None,
        };
        members.into_iter().find_map(|m| match m {
            Member::Property(p) if &p.name == key && !p.is_static => p.tpe.clone(),
            _ => None,
        })
    }
}

impl TreeTransformation for ResolveLookups {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn leave_type(&mut self, _ctx: &(), x: Type) -> TransformResult<Type> {
        let Type::Lookup(lookup) = &x else {
            return Ok(x);
        };
        let Type::Literal(lit) = &lookup.key else {
            return Ok(x);
        };
        let Literal::Str(key) = &**lit else {
            return Ok(x);
        };
        Ok(self
            .property_type(&lookup.from, &Ident::new(key))
            .unwrap_or(x))
    }
}

impl LibraryPass for ExpandTypeMappings {
    fn name(&self) -> &'static str {
        "expand-type-mappings"
    }

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        run_scoped(self, root, file)
    }
}
