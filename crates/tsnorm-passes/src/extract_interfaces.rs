//! Interfaces from inline object types.
//!
//! An object type literal used as the type of a field, parameter or return
//! value is replaced by a reference to a named interface. The interface is
//! generic over the in-scope type parameters the literal mentions.
//!
//! The interface is appended to the outermost enclosing container (file,
//! namespace, module or global block) from which every name the literal
//! mentions still resolves to the same declarations. A literal that only uses
//! file-level names lands at the top of the file; one that uses a
//! namespace's own types stays inside that namespace.
//!
//! Structurally identical literals placed in the same container share one
//! interface. Names come from a
//! [`Marker::NameHint`](tsnorm_tree::Marker::NameHint) when the literal carries
//! one, and are otherwise derived from the configured prefix and the member
//! names.

use crate::conflict_store::ConflictHandlingStore;
use crate::naming::derive_non_conflicting_name;
use crate::pass::{LibraryPass, run_scoped};
use crate::type_params::type_params_referenced;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;
use tsnorm_scope::{LoopDetector, Picker, Scope};
use tsnorm_transform::{TransformResult, TreeTransformation, scope_follows_tree};
use tsnorm_tree::{
    Comments, Decl, Ident, InterfaceDecl, Member, ObjectType, ParsedFile, QIdent, SameNode, Tree,
    Type, TypeParam, TypeRef, for_each_member_type, for_each_type,
};

pub const DEFAULT_PREFIX: &str = "Anon";

#[derive(Debug)]
pub struct ExtractInterfaces {
    prefix: String,
    /// Pending interfaces per container frame, emitted when that container's
    /// member list is rebuilt.
    stores: FxHashMap<u64, ConflictHandlingStore>,
}

impl Default for ExtractInterfaces {
    fn default() -> Self {
        ExtractInterfaces::new(DEFAULT_PREFIX)
    }
}

/// Whether an object literal in the current position should get a name.
///
/// The nearest enclosing node that is not itself a type decides: fields,
/// parameters, signatures (return types) and variables qualify. Bodies of
/// type aliases, heritage clauses, type parameter bounds and mapped types do
/// not. Literals inside conditional types may mention `infer` variables that
/// an interface could not bind, so they stay inline too.
fn in_extractable_position(scope: &Scope) -> bool {
    if scope.within(|t| matches!(t, Tree::Type(Type::Conditional(_)))) {
        return false;
    }
    scope
        .stack()
        .skip(1)
        .find(|t| !matches!(t, Tree::Type(_)))
        .is_some_and(|t| {
            matches!(
                t,
                Tree::Member(Member::Property(_) | Member::Index(_))
                    | Tree::Param(_)
                    | Tree::Sig(_)
                    | Tree::Decl(Decl::Var(_))
            )
        })
}

impl ExtractInterfaces {
    pub fn new(prefix: impl Into<String>) -> Self {
        ExtractInterfaces {
            prefix: prefix.into(),
            stores: FxHashMap::default(),
        }
    }

    /// Whether `name` is pending in the store of any container in `chain`.
    fn pending_in(&self, chain: &[&Scope], name: &Ident) -> bool {
        chain.iter().any(|c| {
            self.stores
                .get(&c.id())
                .is_some_and(|store| store.is_taken(name))
        })
    }

    /// The container an interface for a literal at `scope` goes into.
    fn placement(&self, scope: &Scope, chain: &[&Scope], names: &[QIdent]) -> usize {
        let ld = LoopDetector::new();
        let same_meaning = |container: &Scope, qname: &QIdent| {
            let here = scope.lookup_with(&Picker::All, qname, &ld);
            let there = container.lookup_with(&Picker::All, qname, &ld);
            here.len() == there.len()
                && here.iter().zip(&there).all(|((a, _), (b, _))| a.same_node(b))
        };

        let mut target = 0;
        for (idx, &container) in chain.iter().enumerate().skip(1) {
            // Interfaces still pending inside would become unreachable.
            let pending = names.iter().any(|n| {
                n.head()
                    .is_some_and(|head| self.pending_in(&chain[..idx], head))
            });
            if pending || !names.iter().all(|n| same_meaning(container, n)) {
                break;
            }
            target = idx;
        }
        target
    }

    fn interface_name(
        &mut self,
        scope: &Scope,
        chain: &[&Scope],
        obj: &ObjectType,
        tparams: &[Arc<TypeParam>],
    ) -> Ident {
        let mut names: Vec<QIdent> = Vec::new();
        let mut mentioned = |tpe: &Type| {
            let Type::Ref(r) = tpe else {
                return;
            };
            let bound = r
                .name
                .single()
                .is_some_and(|n| tparams.iter().any(|tp| &tp.name == n));
            if !bound && !names.contains(&r.name) {
                names.push(r.name.clone());
            }
        };
        for member in &obj.members {
            for_each_member_type(member, &mut mentioned);
        }
        for tp in tparams {
            for t in tp.upper_bound.iter().chain(&tp.default) {
                for_each_type(t, &mut mentioned);
            }
        }

        let target = self.placement(scope, chain, &names);
        let container = chain[target];
        let ld = LoopDetector::new();
        let visible = |name: &Ident| {
            !scope
                .lookup_with(&Picker::All, &QIdent::of(name.clone()), &ld)
                .is_empty()
        };

        let reusable = self
            .stores
            .get(&container.id())
            .and_then(|store| store.find_identical(tparams, &obj.members))
            .filter(|name| !visible(*name) && !self.pending_in(&chain[..target], *name))
            .cloned();
        if let Some(existing) = reusable {
            return existing;
        }

        let is_free = |name: &Ident| !self.pending_in(chain, name) && !visible(name);
        let name = match obj.comments.name_hint() {
            Some(hint) if is_free(&Ident::new(hint)) => Ident::new(hint),
            Some(hint) => derive_non_conflicting_name(hint, &obj.members, &is_free),
            None => derive_non_conflicting_name(&self.prefix, &obj.members, &is_free),
        };

        debug!(
            name = %name,
            tparams = tparams.len(),
            container = ?container,
            "extracted interface"
        );
        self.stores
            .entry(container.id())
            .or_default()
            .insert(Arc::new(InterfaceDecl {
                comments: obj.comments.clone(),
                declared: true,
                name: name.clone(),
                tparams: tparams.to_vec(),
                inheritance: Vec::new(),
                members: obj.members.clone(),
                code_path: container.code_path().add(&name),
            }));
        name
    }
}

impl TreeTransformation for ExtractInterfaces {
    scope_follows_tree!();

    fn leave_type(&mut self, scope: &Scope, x: Type) -> TransformResult<Type> {
        let Type::Object(obj) = &x else {
            return Ok(x);
        };
        if obj.members.is_empty()
            || Member::is_dictionary(&obj.members)
            || Member::is_type_mapping(&obj.members)
            || !in_extractable_position(scope)
        {
            return Ok(x);
        }
        // Enclosing containers, innermost first.
        let chain: Vec<&Scope> = scope
            .frames()
            .filter(|s| s.current().is_some_and(|t| t.as_container().is_some()))
            .collect();
        if chain.is_empty() {
            return Ok(x);
        }
        let tparams = type_params_referenced(scope, &x);
        let name = self.interface_name(scope, &chain, obj, &tparams);
        Ok(Type::Ref(Arc::new(TypeRef {
            comments: Comments::none(),
            name: QIdent::of(name),
            targs: tparams.iter().map(|tp| tp.as_type()).collect(),
        })))
    }

    fn new_members(
        &mut self,
        scope: &Scope,
        _container: &Tree,
        mut members: Vec<Decl>,
    ) -> TransformResult<Vec<Decl>> {
        let Some(mut store) = self.stores.remove(&scope.id()) else {
            return Ok(members);
        };
        members.extend(store.drain());
        Ok(members)
    }
}

impl LibraryPass for ExtractInterfaces {
    fn name(&self) -> &'static str {
        "extract-interfaces"
    }

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        run_scoped(self, root, file)
    }
}
