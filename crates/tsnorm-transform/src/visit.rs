//! Tree walkers
//!
//! Each `visit_*` function derives the node's context with `with_tree`, runs
//! the `enter_*` hook, visits the children of whatever `enter_*` returned,
//! runs the container hooks, and finally runs the `leave_*` hook.
//!
//! A node is rebuilt only when some child comes back as a different
//! allocation. Untouched subtrees keep their identity, so a pass that rewrites
//! nothing returns the very same tree.

use crate::error::TransformResult;
use crate::transformation::TreeTransformation;
use std::sync::Arc;
use tracing::trace;
use tsnorm_tree::{
    BinaryExpr, CallExpr, CastExpr, ClassDecl, ConditionalType, ConstructorType, Decl, EnumDecl,
    EnumMember, ExportDecl, Exportee, Expr, ExtendsType, FunParam, FunSig, FunctionDecl,
    FunctionMember, IndexMember, Indexing, InterfaceDecl, IntersectType, IsType, LookupType,
    MappedMember, Member, ObjectType, ParsedFile, PropertyMember, SameNode, Tree, TupleElement,
    TupleType, Type, TypeAliasDecl, TypeParam, TypeRef, UnaryExpr, UnionType, VarDecl,
};

// =============================================================================
// Helpers
// =============================================================================

/// Map every item, reporting whether any came back as a different node.
fn map_list<X: SameNode + Clone>(
    items: &[X],
    mut f: impl FnMut(X) -> TransformResult<X>,
) -> TransformResult<(Vec<X>, bool)> {
    let mut changed = false;
    let mut out = Vec::with_capacity(items.len());
    for item in items {
        let next = f(item.clone())?;
        changed |= !next.same_node(item);
        out.push(next);
    }
    Ok((out, changed))
}

fn map_opt<X: SameNode + Clone>(
    item: &Option<X>,
    f: impl FnOnce(X) -> TransformResult<X>,
) -> TransformResult<(Option<X>, bool)> {
    match item {
        Some(x) => {
            let next = f(x.clone())?;
            let changed = !next.same_node(x);
            Ok((Some(next), changed))
        }
        None => Ok((None, false)),
    }
}

fn same_list<X: SameNode>(a: &[X], b: &[X]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_node(y))
}

// =============================================================================
// Parsed file and declarations
// =============================================================================

pub fn visit_parsed_file<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Arc<ParsedFile>,
) -> TransformResult<Arc<ParsedFile>> {
    let tt = t.with_tree(ctx, &Tree::File(x.clone()));
    let entered = t.enter_parsed_file(&tt, x)?;

    let (members, _) = map_list(&entered.members, |d| visit_decl(t, &tt, d))?;
    let members = t.new_members(&tt, &Tree::File(entered.clone()), members)?;
    let rebuilt = if same_list(&members, &entered.members) {
        entered
    } else {
        trace!(
            before = entered.members.len(),
            after = members.len(),
            "file members rewritten"
        );
        entered.with_members(members)
    };
    t.leave_parsed_file(&tt, rebuilt)
}

pub fn visit_decl<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Decl,
) -> TransformResult<Decl> {
    let tt = t.with_tree(ctx, &Tree::Decl(x.clone()));
    let entered = t.enter_decl(&tt, x)?;
    let rebuilt = decl_children(t, &tt, entered)?;
    t.leave_decl(&tt, rebuilt)
}

fn decl_children<T: TreeTransformation + ?Sized>(
    t: &mut T,
    tt: &T::Ctx,
    x: Decl,
) -> TransformResult<Decl> {
    if let Some(container) = x.as_container() {
        let old = container.members().to_vec();
        let (members, _) = map_list(&old, |d| visit_decl(t, tt, d))?;
        let members = t.new_members(tt, &Tree::Decl(x.clone()), members)?;
        return Ok(if same_list(&members, &old) {
            x
        } else {
            trace!(container = ?x.name(), after = members.len(), "container members rewritten");
            x.with_members(members)
        });
    }

    match x {
        Decl::Class(c) => {
            let (tparams, ch_tparams) = map_list(&c.tparams, |tp| visit_type_param(t, tt, tp))?;
            let (parent, ch_parent) = map_opt(&c.parent, |p| visit_type(t, tt, p))?;
            let (implements, ch_impl) = map_list(&c.implements, |i| visit_type(t, tt, i))?;
            let (members, _) = map_list(&c.members, |m| visit_member(t, tt, m))?;
            let members =
                t.new_class_members(tt, &Tree::Decl(Decl::Class(c.clone())), members)?;
            if ch_tparams || ch_parent || ch_impl || !same_list(&members, &c.members) {
                Ok(Decl::Class(Arc::new(ClassDecl {
                    tparams,
                    parent,
                    implements,
                    members,
                    ..(*c).clone()
                })))
            } else {
                Ok(Decl::Class(c))
            }
        }
        Decl::Interface(i) => {
            let (tparams, ch_tparams) = map_list(&i.tparams, |tp| visit_type_param(t, tt, tp))?;
            let (inheritance, ch_inh) = map_list(&i.inheritance, |p| visit_type(t, tt, p))?;
            let (members, _) = map_list(&i.members, |m| visit_member(t, tt, m))?;
            let members =
                t.new_class_members(tt, &Tree::Decl(Decl::Interface(i.clone())), members)?;
            if ch_tparams || ch_inh || !same_list(&members, &i.members) {
                Ok(Decl::Interface(Arc::new(InterfaceDecl {
                    tparams,
                    inheritance,
                    members,
                    ..(*i).clone()
                })))
            } else {
                Ok(Decl::Interface(i))
            }
        }
        Decl::Enum(e) => {
            let mut changed = false;
            let mut members = Vec::with_capacity(e.members.len());
            for member in &e.members {
                let (expr, ch) = map_opt(&member.expr, |x| visit_expr(t, tt, x))?;
                changed |= ch;
                members.push(EnumMember {
                    expr,
                    ..member.clone()
                });
            }
            let (exported_from, ch_from) = map_opt(&e.exported_from, |x| visit_type(t, tt, x))?;
            if changed || ch_from {
                Ok(Decl::Enum(Arc::new(EnumDecl {
                    members,
                    exported_from,
                    ..(*e).clone()
                })))
            } else {
                Ok(Decl::Enum(e))
            }
        }
        Decl::Var(v) => {
            let (tpe, ch_tpe) = map_opt(&v.tpe, |x| visit_type(t, tt, x))?;
            let (expr, ch_expr) = map_opt(&v.expr, |x| visit_expr(t, tt, x))?;
            if ch_tpe || ch_expr {
                Ok(Decl::Var(Arc::new(VarDecl {
                    tpe,
                    expr,
                    ..(*v).clone()
                })))
            } else {
                Ok(Decl::Var(v))
            }
        }
        Decl::Function(f) => {
            let signature = visit_fun_sig(t, tt, f.signature.clone())?;
            if signature.same_node(&f.signature) {
                Ok(Decl::Function(f))
            } else {
                Ok(Decl::Function(Arc::new(FunctionDecl {
                    signature,
                    ..(*f).clone()
                })))
            }
        }
        Decl::TypeAlias(a) => {
            let (tparams, ch_tparams) = map_list(&a.tparams, |tp| visit_type_param(t, tt, tp))?;
            let alias = visit_type(t, tt, a.alias.clone())?;
            if ch_tparams || !alias.same_node(&a.alias) {
                Ok(Decl::TypeAlias(Arc::new(TypeAliasDecl {
                    tparams,
                    alias,
                    ..(*a).clone()
                })))
            } else {
                Ok(Decl::TypeAlias(a))
            }
        }
        Decl::Export(e) => {
            let inner = match &e.exportee {
                Exportee::Tree(inner) => inner.clone(),
                _ => return Ok(Decl::Export(e)),
            };
            let next = visit_decl(t, tt, inner.clone())?;
            if next.same_node(&inner) {
                Ok(Decl::Export(e))
            } else {
                Ok(Decl::Export(Arc::new(ExportDecl {
                    exportee: Exportee::Tree(next),
                    ..(*e).clone()
                })))
            }
        }
        other => Ok(other),
    }
}

// =============================================================================
// Members
// =============================================================================

pub fn visit_member<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Member,
) -> TransformResult<Member> {
    let tt = t.with_tree(ctx, &Tree::Member(x.clone()));
    let entered = t.enter_member(&tt, x)?;
    let rebuilt = member_children(t, &tt, entered)?;
    t.leave_member(&tt, rebuilt)
}

fn member_children<T: TreeTransformation + ?Sized>(
    t: &mut T,
    tt: &T::Ctx,
    x: Member,
) -> TransformResult<Member> {
    match x {
        Member::Call(c) => {
            let signature = visit_fun_sig(t, tt, c.signature.clone())?;
            if signature.same_node(&c.signature) {
                Ok(Member::Call(c))
            } else {
                let mut next = (*c).clone();
                next.signature = signature;
                Ok(Member::Call(Arc::new(next)))
            }
        }
        Member::Ctor(c) => {
            let signature = visit_fun_sig(t, tt, c.signature.clone())?;
            if signature.same_node(&c.signature) {
                Ok(Member::Ctor(c))
            } else {
                let mut next = (*c).clone();
                next.signature = signature;
                Ok(Member::Ctor(Arc::new(next)))
            }
        }
        Member::Function(f) => {
            let signature = visit_fun_sig(t, tt, f.signature.clone())?;
            if signature.same_node(&f.signature) {
                Ok(Member::Function(f))
            } else {
                Ok(Member::Function(Arc::new(FunctionMember {
                    signature,
                    ..(*f).clone()
                })))
            }
        }
        Member::Property(p) => {
            let (tpe, ch_tpe) = map_opt(&p.tpe, |x| visit_type(t, tt, x))?;
            let (expr, ch_expr) = map_opt(&p.expr, |x| visit_expr(t, tt, x))?;
            if ch_tpe || ch_expr {
                Ok(Member::Property(Arc::new(PropertyMember {
                    tpe,
                    expr,
                    ..(*p).clone()
                })))
            } else {
                Ok(Member::Property(p))
            }
        }
        Member::Index(i) => {
            let (indexing, ch_key) = match &i.indexing {
                Indexing::Dict { name, tpe } => {
                    let next = visit_type(t, tt, tpe.clone())?;
                    let changed = !next.same_node(tpe);
                    (
                        Indexing::Dict {
                            name: name.clone(),
                            tpe: next,
                        },
                        changed,
                    )
                }
                single @ Indexing::Single(_) => (single.clone(), false),
            };
            let (value_type, ch_value) = map_opt(&i.value_type, |x| visit_type(t, tt, x))?;
            if ch_key || ch_value {
                Ok(Member::Index(Arc::new(IndexMember {
                    indexing,
                    value_type,
                    ..(*i).clone()
                })))
            } else {
                Ok(Member::Index(i))
            }
        }
        Member::Mapped(m) => {
            let from = visit_type(t, tt, m.from.clone())?;
            let (as_name, ch_as) = map_opt(&m.as_name, |x| visit_type(t, tt, x))?;
            let to = visit_type(t, tt, m.to.clone())?;
            if ch_as || !from.same_node(&m.from) || !to.same_node(&m.to) {
                Ok(Member::Mapped(Arc::new(MappedMember {
                    from,
                    as_name,
                    to,
                    ..(*m).clone()
                })))
            } else {
                Ok(Member::Mapped(m))
            }
        }
    }
}

// =============================================================================
// Types
// =============================================================================

pub fn visit_type<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Type,
) -> TransformResult<Type> {
    let tt = t.with_tree(ctx, &Tree::Type(x.clone()));
    let entered = t.enter_type(&tt, x)?;
    let rebuilt = type_children(t, &tt, entered)?;
    t.leave_type(&tt, rebuilt)
}

fn type_children<T: TreeTransformation + ?Sized>(
    t: &mut T,
    tt: &T::Ctx,
    x: Type,
) -> TransformResult<Type> {
    match x {
        Type::Ref(r) => {
            let (targs, changed) = map_list(&r.targs, |a| visit_type(t, tt, a))?;
            if changed {
                Ok(Type::Ref(Arc::new(TypeRef {
                    targs,
                    ..(*r).clone()
                })))
            } else {
                Ok(Type::Ref(r))
            }
        }
        Type::Object(o) => {
            let (members, _) = map_list(&o.members, |m| visit_member(t, tt, m))?;
            let members = t.new_class_members(tt, &Tree::Type(Type::Object(o.clone())), members)?;
            if same_list(&members, &o.members) {
                Ok(Type::Object(o))
            } else {
                Ok(Type::Object(Arc::new(ObjectType {
                    comments: o.comments.clone(),
                    members,
                })))
            }
        }
        Type::Function(sig) => {
            let next = visit_fun_sig(t, tt, sig.clone())?;
            Ok(Type::Function(next))
        }
        Type::Constructor(c) => {
            let signature = visit_fun_sig(t, tt, c.signature.clone())?;
            if signature.same_node(&c.signature) {
                Ok(Type::Constructor(c))
            } else {
                Ok(Type::Constructor(Arc::new(ConstructorType {
                    is_abstract: c.is_abstract,
                    signature,
                })))
            }
        }
        Type::Tuple(tuple) => {
            let mut changed = false;
            let mut elems = Vec::with_capacity(tuple.elems.len());
            for elem in &tuple.elems {
                let tpe = visit_type(t, tt, elem.tpe.clone())?;
                changed |= !tpe.same_node(&elem.tpe);
                elems.push(TupleElement {
                    label: elem.label.clone(),
                    tpe,
                });
            }
            if changed {
                Ok(Type::Tuple(Arc::new(TupleType { elems })))
            } else {
                Ok(Type::Tuple(tuple))
            }
        }
        Type::Repeated(inner) => {
            let next = visit_type(t, tt, (*inner).clone())?;
            if next.same_node(&inner) {
                Ok(Type::Repeated(inner))
            } else {
                Ok(Type::Repeated(Arc::new(next)))
            }
        }
        Type::KeyOf(inner) => {
            let next = visit_type(t, tt, (*inner).clone())?;
            if next.same_node(&inner) {
                Ok(Type::KeyOf(inner))
            } else {
                Ok(Type::KeyOf(Arc::new(next)))
            }
        }
        Type::Lookup(l) => {
            let from = visit_type(t, tt, l.from.clone())?;
            let key = visit_type(t, tt, l.key.clone())?;
            if from.same_node(&l.from) && key.same_node(&l.key) {
                Ok(Type::Lookup(l))
            } else {
                Ok(Type::Lookup(Arc::new(LookupType { from, key })))
            }
        }
        Type::Union(u) => {
            let (types, changed) = map_list(&u.types, |x| visit_type(t, tt, x))?;
            if changed {
                Ok(Type::Union(Arc::new(UnionType { types })))
            } else {
                Ok(Type::Union(u))
            }
        }
        Type::Intersect(i) => {
            let (types, changed) = map_list(&i.types, |x| visit_type(t, tt, x))?;
            if changed {
                Ok(Type::Intersect(Arc::new(IntersectType { types })))
            } else {
                Ok(Type::Intersect(i))
            }
        }
        Type::Conditional(c) => {
            let pred = visit_type(t, tt, c.pred.clone())?;
            let if_true = visit_type(t, tt, c.if_true.clone())?;
            let if_false = visit_type(t, tt, c.if_false.clone())?;
            if pred.same_node(&c.pred)
                && if_true.same_node(&c.if_true)
                && if_false.same_node(&c.if_false)
            {
                Ok(Type::Conditional(c))
            } else {
                Ok(Type::Conditional(Arc::new(ConditionalType {
                    pred,
                    if_true,
                    if_false,
                })))
            }
        }
        Type::Extends(e) => {
            let tpe = visit_type(t, tt, e.tpe.clone())?;
            let extends = visit_type(t, tt, e.extends.clone())?;
            if tpe.same_node(&e.tpe) && extends.same_node(&e.extends) {
                Ok(Type::Extends(e))
            } else {
                Ok(Type::Extends(Arc::new(ExtendsType { tpe, extends })))
            }
        }
        Type::Infer(tp) => Ok(Type::Infer(visit_type_param(t, tt, tp)?)),
        Type::Is(is) => {
            let tpe = visit_type(t, tt, is.tpe.clone())?;
            if tpe.same_node(&is.tpe) {
                Ok(Type::Is(is))
            } else {
                Ok(Type::Is(Arc::new(IsType {
                    ident: is.ident.clone(),
                    tpe,
                })))
            }
        }
        leaf @ (Type::Literal(_) | Type::Query(_) | Type::This) => Ok(leaf),
    }
}

// =============================================================================
// Signatures and parameters
// =============================================================================

pub fn visit_fun_sig<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Arc<FunSig>,
) -> TransformResult<Arc<FunSig>> {
    let tt = t.with_tree(ctx, &Tree::Sig(x.clone()));
    let entered = t.enter_fun_sig(&tt, x)?;

    let (tparams, ch_tparams) = map_list(&entered.tparams, |tp| visit_type_param(t, &tt, tp))?;
    let (params, ch_params) = map_list(&entered.params, |p| visit_fun_param(t, &tt, p))?;
    let (result_type, ch_result) = map_opt(&entered.result_type, |r| visit_type(t, &tt, r))?;
    let rebuilt = if ch_tparams || ch_params || ch_result {
        Arc::new(FunSig {
            comments: entered.comments.clone(),
            tparams,
            params,
            result_type,
        })
    } else {
        entered
    };
    t.leave_fun_sig(&tt, rebuilt)
}

pub fn visit_fun_param<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Arc<FunParam>,
) -> TransformResult<Arc<FunParam>> {
    let tt = t.with_tree(ctx, &Tree::Param(x.clone()));
    let entered = t.enter_fun_param(&tt, x)?;

    let (tpe, changed) = map_opt(&entered.tpe, |x| visit_type(t, &tt, x))?;
    let rebuilt = if changed {
        Arc::new(FunParam {
            comments: entered.comments.clone(),
            name: entered.name.clone(),
            tpe,
        })
    } else {
        entered
    };
    t.leave_fun_param(&tt, rebuilt)
}

pub fn visit_type_param<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Arc<TypeParam>,
) -> TransformResult<Arc<TypeParam>> {
    let tt = t.with_tree(ctx, &Tree::TypeParam(x.clone()));
    let entered = t.enter_type_param(&tt, x)?;

    let (upper_bound, ch_bound) = map_opt(&entered.upper_bound, |x| visit_type(t, &tt, x))?;
    let (default, ch_default) = map_opt(&entered.default, |x| visit_type(t, &tt, x))?;
    let rebuilt = if ch_bound || ch_default {
        Arc::new(TypeParam {
            comments: entered.comments.clone(),
            name: entered.name.clone(),
            upper_bound,
            default,
        })
    } else {
        entered
    };
    t.leave_type_param(&tt, rebuilt)
}

// =============================================================================
// Expressions
// =============================================================================

/// Expressions introduce no scope; they see the context of their owner.
pub fn visit_expr<T: TreeTransformation + ?Sized>(
    t: &mut T,
    ctx: &T::Ctx,
    x: Expr,
) -> TransformResult<Expr> {
    let entered = t.enter_expr(ctx, x)?;
    let rebuilt = match entered {
        Expr::Call(call) => {
            let function = visit_expr(t, ctx, call.function.clone())?;
            let (params, changed) = map_list(&call.params, |p| visit_expr(t, ctx, p))?;
            if changed || !function.same_node(&call.function) {
                Expr::Call(Arc::new(CallExpr { function, params }))
            } else {
                Expr::Call(call)
            }
        }
        Expr::Unary(u) => {
            let expr = visit_expr(t, ctx, u.expr.clone())?;
            if expr.same_node(&u.expr) {
                Expr::Unary(u)
            } else {
                Expr::Unary(Arc::new(UnaryExpr {
                    op: u.op.clone(),
                    expr,
                }))
            }
        }
        Expr::Binary(b) => {
            let left = visit_expr(t, ctx, b.left.clone())?;
            let right = visit_expr(t, ctx, b.right.clone())?;
            if left.same_node(&b.left) && right.same_node(&b.right) {
                Expr::Binary(b)
            } else {
                Expr::Binary(Arc::new(BinaryExpr {
                    left,
                    op: b.op.clone(),
                    right,
                }))
            }
        }
        Expr::Cast(c) => {
            let expr = visit_expr(t, ctx, c.expr.clone())?;
            let tpe = visit_type(t, ctx, c.tpe.clone())?;
            if expr.same_node(&c.expr) && tpe.same_node(&c.tpe) {
                Expr::Cast(c)
            } else {
                Expr::Cast(Arc::new(CastExpr { expr, tpe }))
            }
        }
        Expr::ArrayOf(inner) => {
            let next = visit_expr(t, ctx, (*inner).clone())?;
            if next.same_node(&inner) {
                Expr::ArrayOf(inner)
            } else {
                Expr::ArrayOf(Arc::new(next))
            }
        }
        leaf @ (Expr::Ref(_) | Expr::Literal(_)) => leaf,
    };
    t.leave_expr(ctx, rebuilt)
}
