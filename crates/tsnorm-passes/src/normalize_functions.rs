//! Function shape normalization.
//!
//! - an object type with a single call signature is a function type
//! - a property of function type is a method; a property whose type only
//!   has call signatures is one method per signature
//! - a variable of function type is a function declaration

use crate::pass::{LibraryPass, run_scoped};
use crate::remove_comment::keep_first_only;
use std::sync::Arc;
use tsnorm_scope::Scope;
use tsnorm_transform::{TransformResult, TreeTransformation, scope_preserved};
use tsnorm_tree::{
    Decl, FunSig, FunctionDecl, FunctionMember, Marker, Member, MethodType, ParsedFile,
    PropertyMember, ProtectionLevel, Tree, Type, VarDecl,
};

#[derive(Debug, Default)]
pub struct NormalizeFunctions;

/// Signatures of a type that is nothing but callable.
fn call_signatures(tpe: &Type) -> Option<Vec<Arc<FunSig>>> {
    match tpe {
        Type::Function(sig) => Some(vec![sig.clone()]),
        Type::Object(o) if !o.members.is_empty() => o
            .members
            .iter()
            .map(|m| match m {
                Member::Call(c) if c.level == ProtectionLevel::Default => Some(c.signature.clone()),
                _ => None,
            })
            .collect(),
        _ => None,
    }
}

fn property_to_methods(p: &PropertyMember) -> Option<Vec<Member>> {
    if p.expr.is_some() {
        return None;
    }
    let tpe = p.tpe.as_ref()?;
    let sigs = call_signatures(tpe)?;
    let comments = match tpe {
        Type::Object(_) => p.comments.with_marker(Marker::ExpandedCallables),
        _ => p.comments.clone(),
    };
    let methods = sigs
        .into_iter()
        .map(|signature| {
            Member::Function(Arc::new(FunctionMember {
                comments: comments.clone(),
                level: p.level,
                name: p.name.clone(),
                method_type: MethodType::Normal,
                signature,
                is_static: p.is_static,
                is_readonly: false,
            }))
        })
        .collect();
    Some(keep_first_only(methods))
}

fn var_to_functions(v: &VarDecl) -> Option<Vec<Decl>> {
    if v.expr.is_some() {
        return None;
    }
    let sigs = call_signatures(v.tpe.as_ref()?)?;
    let functions = sigs
        .into_iter()
        .map(|signature| {
            Decl::Function(Arc::new(FunctionDecl {
                comments: v.comments.clone(),
                declared: v.declared,
                name: v.name.clone(),
                signature,
                js_location: v.js_location.clone(),
                code_path: v.code_path.clone(),
            }))
        })
        .collect();
    Some(keep_first_only(functions))
}

impl TreeTransformation for NormalizeFunctions {
    scope_preserved!();

    fn leave_type(&mut self, _scope: &Scope, x: Type) -> TransformResult<Type> {
        if let Type::Object(o) = &x
            && let [Member::Call(call)] = o.members.as_slice()
            && call.level == ProtectionLevel::Default
        {
            let signature = if call.signature.comments.is_empty() {
                Arc::new(FunSig {
                    comments: o.comments.concat(&call.comments),
                    ..(*call.signature).clone()
                })
            } else {
                call.signature.clone()
            };
            return Ok(Type::Function(signature));
        }
        Ok(x)
    }

    fn new_class_members(
        &mut self,
        _scope: &Scope,
        _owner: &Tree,
        members: Vec<Member>,
    ) -> TransformResult<Vec<Member>> {
        if !members
            .iter()
            .any(|m| matches!(m, Member::Property(p) if property_to_methods(p).is_some()))
        {
            return Ok(members);
        }
        let mut out = Vec::with_capacity(members.len());
        for member in members {
            match &member {
                Member::Property(p) => match property_to_methods(p) {
                    Some(methods) => out.extend(methods),
                    None => out.push(member),
                },
                _ => out.push(member),
            }
        }
        Ok(out)
    }

    fn new_members(
        &mut self,
        _scope: &Scope,
        _container: &Tree,
        members: Vec<Decl>,
    ) -> TransformResult<Vec<Decl>> {
        if !members
            .iter()
            .any(|d| matches!(d, Decl::Var(v) if var_to_functions(v).is_some()))
        {
            return Ok(members);
        }
        let mut out = Vec::with_capacity(members.len());
        for decl in members {
            match &decl {
                Decl::Var(v) => match var_to_functions(v) {
                    Some(functions) => out.extend(functions),
                    None => out.push(decl),
                },
                _ => out.push(decl),
            }
        }
        Ok(out)
    }
}

impl LibraryPass for NormalizeFunctions {
    fn name(&self) -> &'static str {
        "normalize-functions"
    }

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        run_scoped(self, root, file)
    }
}
