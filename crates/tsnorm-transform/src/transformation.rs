//! The transformation trait.

use crate::error::TransformResult;
use std::sync::Arc;
use tsnorm_tree::{Decl, Expr, FunParam, FunSig, Member, ParsedFile, Tree, Type, TypeParam};

/// Per-node-kind hooks driven by the `visit_*` functions.
///
/// `Ctx` is threaded top-down. [`with_tree`](Self::with_tree) derives the
/// context a node and its children see from the context the node was reached
/// with; scope-aware passes extend a scope there, local passes hand it down
/// unchanged (see [`crate::discipline`]).
///
/// Every hook defaults to the identity. Hooks return the node they were given
/// when they have nothing to do, which keeps the node's identity intact.
#[allow(unused_variables)]
pub trait TreeTransformation {
    type Ctx: Clone;

    fn with_tree(&self, ctx: &Self::Ctx, tree: &Tree) -> Self::Ctx;

    fn enter_parsed_file(
        &mut self,
        ctx: &Self::Ctx,
        x: Arc<ParsedFile>,
    ) -> TransformResult<Arc<ParsedFile>> {
        Ok(x)
    }

    fn enter_decl(&mut self, ctx: &Self::Ctx, x: Decl) -> TransformResult<Decl> {
        Ok(x)
    }

    fn enter_member(&mut self, ctx: &Self::Ctx, x: Member) -> TransformResult<Member> {
        Ok(x)
    }

    fn enter_type(&mut self, ctx: &Self::Ctx, x: Type) -> TransformResult<Type> {
        Ok(x)
    }

    fn enter_fun_sig(&mut self, ctx: &Self::Ctx, x: Arc<FunSig>) -> TransformResult<Arc<FunSig>> {
        Ok(x)
    }

    fn enter_fun_param(
        &mut self,
        ctx: &Self::Ctx,
        x: Arc<FunParam>,
    ) -> TransformResult<Arc<FunParam>> {
        Ok(x)
    }

    fn enter_type_param(
        &mut self,
        ctx: &Self::Ctx,
        x: Arc<TypeParam>,
    ) -> TransformResult<Arc<TypeParam>> {
        Ok(x)
    }

    fn enter_expr(&mut self, ctx: &Self::Ctx, x: Expr) -> TransformResult<Expr> {
        Ok(x)
    }

    fn leave_parsed_file(
        &mut self,
        ctx: &Self::Ctx,
        x: Arc<ParsedFile>,
    ) -> TransformResult<Arc<ParsedFile>> {
        Ok(x)
    }

    fn leave_decl(&mut self, ctx: &Self::Ctx, x: Decl) -> TransformResult<Decl> {
        Ok(x)
    }

    fn leave_member(&mut self, ctx: &Self::Ctx, x: Member) -> TransformResult<Member> {
        Ok(x)
    }

    fn leave_type(&mut self, ctx: &Self::Ctx, x: Type) -> TransformResult<Type> {
        Ok(x)
    }

    fn leave_fun_sig(&mut self, ctx: &Self::Ctx, x: Arc<FunSig>) -> TransformResult<Arc<FunSig>> {
        Ok(x)
    }

    fn leave_fun_param(
        &mut self,
        ctx: &Self::Ctx,
        x: Arc<FunParam>,
    ) -> TransformResult<Arc<FunParam>> {
        Ok(x)
    }

    fn leave_type_param(
        &mut self,
        ctx: &Self::Ctx,
        x: Arc<TypeParam>,
    ) -> TransformResult<Arc<TypeParam>> {
        Ok(x)
    }

    fn leave_expr(&mut self, ctx: &Self::Ctx, x: Expr) -> TransformResult<Expr> {
        Ok(x)
    }

    /// Reshape the declaration list of a container (parsed file, namespace,
    /// module, augmented module, global block) after each member has been
    /// transformed. Runs before the container's `leave_*` hook.
    fn new_members(
        &mut self,
        ctx: &Self::Ctx,
        container: &Tree,
        members: Vec<Decl>,
    ) -> TransformResult<Vec<Decl>> {
        Ok(members)
    }

    /// Reshape the member list of a class, interface or object type after
    /// each member has been transformed.
    fn new_class_members(
        &mut self,
        ctx: &Self::Ctx,
        owner: &Tree,
        members: Vec<Member>,
    ) -> TransformResult<Vec<Member>> {
        Ok(members)
    }
}
