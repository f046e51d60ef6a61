//! Hoisting the members of an `export =` variable.
//!
//! ```text
//! declare const lib: { (a: string): void; version: string; parse(s: string): Ast };
//! export = lib;
//! ```
//!
//! makes `version` and `parse` available as module members and the module
//! itself callable. They are added next to the variable as free-standing
//! declarations whose runtime location points back at the variable's member.
//! Call signatures become functions named `^`, the module's call target.
//! Statics and accessors are not hoisted.

use crate::pass::{LibraryPass, run_scoped};
use rustc_hash::FxHashSet;
use std::sync::Arc;
use tracing::debug;
use tsnorm_scope::{LoopDetector, Scope, all_members_for};
use tsnorm_transform::{TransformResult, TreeTransformation, scope_follows_tree};
use tsnorm_tree::{
    CodePath, Decl, ExportKind, Exportee, FunctionDecl, Ident, Member, MethodType, ParsedFile,
    Tree, Type, VarDecl,
};

#[derive(Debug, Default)]
pub struct Hoisting;

/// Single-segment names exported with `export =`.
fn export_equals_targets(members: &[Decl]) -> Vec<Ident> {
    members
        .iter()
        .filter_map(|d| match d {
            Decl::Export(e) if e.kind == ExportKind::Namespaced => match &e.exportee {
                Exportee::Names { names, from: None } => match names.as_slice() {
                    [(qname, None)] => qname.single().cloned(),
                    _ => None,
                },
                _ => None,
            },
            _ => None,
        })
        .collect()
}

fn hoist(v: &VarDecl, members: Vec<Member>, container: &CodePath) -> TransformResult<Vec<Decl>> {
    let mut out = Vec::new();
    for member in members {
        match member {
            Member::Call(call) => {
                let name = Ident::apply();
                out.push(Decl::Function(Arc::new(FunctionDecl {
                    comments: call.comments.clone(),
                    declared: true,
                    js_location: v.js_location.add(&name),
                    code_path: container.relocated(&name)?,
                    name,
                    signature: call.signature.clone(),
                })));
            }
            Member::Function(f)
                if f.method_type == MethodType::Normal
                    && !f.is_static
                    && !f.name.is_constructor() =>
            {
                out.push(Decl::Function(Arc::new(FunctionDecl {
                    comments: f.comments.clone(),
                    declared: true,
                    name: f.name.clone(),
                    signature: f.signature.clone(),
                    js_location: v.js_location.add(&f.name),
                    code_path: container.relocated(&f.name)?,
                })));
            }
            Member::Property(p) if !p.is_static => {
                out.push(Decl::Var(Arc::new(VarDecl {
                    comments: p.comments.clone(),
                    declared: true,
                    readonly: p.is_readonly,
                    name: p.name.clone(),
                    tpe: p.tpe.clone(),
                    expr: None,
                    js_location: v.js_location.add(&p.name),
                    code_path: container.relocated(&p.name)?,
                })));
            }
            _ => {}
        }
    }
    Ok(out)
}

impl TreeTransformation for Hoisting {
    scope_follows_tree!();

    fn new_members(
        &mut self,
        scope: &Scope,
        _container: &Tree,
        members: Vec<Decl>,
    ) -> TransformResult<Vec<Decl>> {
        let targets = export_equals_targets(&members);
        if targets.is_empty() {
            return Ok(members);
        }
        let existing: FxHashSet<Ident> = members.iter().filter_map(|d| d.name().cloned()).collect();
        let container = scope.code_path();
        let ld = LoopDetector::new();

        let mut out = Vec::with_capacity(members.len());
        for decl in members {
            let hoisted = match &decl {
                Decl::Var(v) if targets.contains(&v.name) => {
                    let source = match &v.tpe {
                        Some(Type::Object(o)) => o.members.clone(),
                        Some(Type::Ref(r)) => all_members_for(scope, r, &ld).unwrap_or_default(),
                        _ => Vec::new(),
                    };
                    hoist(v, source, &container)?
                        .into_iter()
                        .filter(|h| h.name().is_some_and(|n| !existing.contains(n)))
                        .collect()
                }
                _ => Vec::new(),
            };
            if !hoisted.is_empty() {
                debug!(count = hoisted.len(), "hoisted members of export =");
            }
            out.push(decl);
            out.extend(hoisted);
        }
        Ok(out)
    }
}

impl LibraryPass for Hoisting {
    fn name(&self) -> &'static str {
        "hoisting"
    }

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        run_scoped(self, root, file)
    }
}
