//! Constructor inheritance.
//!
//! A class without constructors inherits those of its nearest ancestor that
//! declares some. The printer needs them spelled out on every class, with the
//! ancestor's type parameters replaced by the arguments given in `extends`.

use crate::pass::{LibraryPass, run_scoped};
use crate::type_rewriter::TypeRewriter;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::trace;
use tsnorm_scope::{LoopDetector, Picker, Scope};
use tsnorm_transform::{TransformResult, TreeTransformation, scope_follows_tree};
use tsnorm_tree::{Decl, FunctionMember, Member, ParsedFile, Type, TypeRef};

#[derive(Debug, Default)]
pub struct ForwardCtors;

/// Constructors `parent` provides, expressed in the type arguments of the
/// reference.
fn inherited_ctors(
    scope: &Scope,
    parent: &TypeRef,
    ld: &LoopDetector,
) -> TransformResult<Vec<Member>> {
    for (decl, owner) in scope.lookup_with(&Picker::Classes, &parent.name, ld) {
        let Decl::Class(class) = &decl else {
            continue;
        };
        let Some(ld) = ld.including_node(&owner, decl.node_id()) else {
            continue;
        };

        let own: Vec<Member> = class
            .members
            .iter()
            .filter(|m| m.is_class_ctor())
            .cloned()
            .collect();
        let found = match &class.parent {
            _ if !own.is_empty() => own,
            Some(Type::Ref(grand)) => inherited_ctors(&owner.enter(decl.clone()), grand, &ld)?,
            _ => Vec::new(),
        };
        if found.is_empty() {
            continue;
        }

        let substitution: FxHashMap<Type, Type> = class
            .tparams
            .iter()
            .enumerate()
            .map(|(i, tp)| {
                let arg = parent
                    .targs
                    .get(i)
                    .cloned()
                    .or_else(|| tp.default.clone())
                    .unwrap_or_else(Type::any);
                (tp.as_type(), arg)
            })
            .filter(|(from, to)| from != to)
            .collect();
        if substitution.is_empty() {
            return Ok(found);
        }

        let mut rewriter = TypeRewriter::new(substitution);
        let mut out = Vec::with_capacity(found.len());
        for member in found {
            match &member {
                Member::Function(f) => {
                    let signature = rewriter.rewrite_sig(f.signature.clone())?;
                    out.push(Member::Function(Arc::new(FunctionMember {
                        signature,
                        ..(**f).clone()
                    })));
                }
                _ => out.push(member),
            }
        }
        return Ok(out);
    }
    Ok(Vec::new())
}

impl TreeTransformation for ForwardCtors {
    scope_follows_tree!();

    fn leave_decl(&mut self, scope: &Scope, x: Decl) -> TransformResult<Decl> {
        let Decl::Class(class) = &x else {
            return Ok(x);
        };
        if class.members.iter().any(Member::is_class_ctor) {
            return Ok(x);
        }
        let Some(Type::Ref(parent)) = &class.parent else {
            return Ok(x);
        };
        let ctors = inherited_ctors(scope, parent, &LoopDetector::new())?;
        if ctors.is_empty() {
            return Ok(x);
        }
        trace!(class = %class.name, ctors = ctors.len(), "forwarding constructors");
        let mut members = ctors;
        members.extend(class.members.iter().cloned());
        Ok(x.with_class_members(members))
    }
}

impl LibraryPass for ForwardCtors {
    fn name(&self) -> &'static str {
        "forward-ctors"
    }

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        run_scoped(self, root, file)
    }
}
