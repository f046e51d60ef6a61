//! Node handles, identity and capabilities.
//!
//! [`Tree`] is the any-node handle that scope frames and transformation hooks
//! pass around. Passes rarely match on `Tree` directly; they ask for the
//! capability they need (`as_container`, `as_class_members`, `tparams`,
//! `code_path`) and ignore everything else.

use crate::code_path::{CodePath, JsLocation};
use crate::comments::Comments;
use crate::decls::{
    AugmentedModuleDecl, ClassDecl, Decl, EnumDecl, FunctionDecl, GlobalDecl, InterfaceDecl,
    ModuleDecl, NamespaceDecl, ParsedFile, TypeAliasDecl, VarDecl,
};
use crate::expr::Expr;
use crate::ident::{Ident, QIdent};
use crate::members::{Indexing, Member};
use crate::types::{FunParam, FunSig, ObjectType, Type, TypeParam};
use std::sync::Arc;

// =============================================================================
// Identity
// =============================================================================

/// Whether two handles point at the same allocation.
pub trait SameNode {
    fn same_node(&self, other: &Self) -> bool;
}

impl<T> SameNode for Arc<T> {
    fn same_node(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: SameNode> SameNode for Option<T> {
    fn same_node(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_node(b),
            (None, None) => true,
            _ => false,
        }
    }
}

fn arc_id<T>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc) as *const () as usize
}

/// Implements `SameNode` and `node_id` for an enum whose variants each hold
/// one `Arc`, plus any unit variants.
macro_rules! arc_enum_identity {
    ($ty:ident { $($variant:ident),* $(,)? } $(units { $($unit:ident),* })?) => {
        impl SameNode for $ty {
            fn same_node(&self, other: &Self) -> bool {
                match (self, other) {
                    $(($ty::$variant(a), $ty::$variant(b)) => Arc::ptr_eq(a, b),)*
                    $($(($ty::$unit, $ty::$unit) => true,)*)?
                    _ => false,
                }
            }
        }

        impl $ty {
            /// Allocation address of this node, stable while the node is alive.
            pub fn node_id(&self) -> usize {
                match self {
                    $($ty::$variant(a) => arc_id(a),)*
                    $($($ty::$unit => 0,)*)?
                }
            }
        }
    };
}

arc_enum_identity!(Decl {
    Namespace,
    Module,
    AugmentedModule,
    Global,
    Class,
    Interface,
    Enum,
    Var,
    Function,
    TypeAlias,
    Import,
    Export,
    ExportAsNamespace,
});

arc_enum_identity!(Member {
    Call,
    Ctor,
    Function,
    Property,
    Index,
    Mapped
});

arc_enum_identity!(Type {
    Ref,
    Literal,
    Object,
    Function,
    Constructor,
    Tuple,
    Query,
    Repeated,
    KeyOf,
    Lookup,
    Union,
    Intersect,
    Conditional,
    Extends,
    Infer,
    Is,
} units { This });

arc_enum_identity!(Expr {
    Ref,
    Literal,
    Call,
    Unary,
    Binary,
    Cast,
    ArrayOf
});

// =============================================================================
// Capabilities
// =============================================================================

/// Containers of declarations.
pub trait HasMembers {
    fn members(&self) -> &[Decl];
}

/// Owners of a member list: classes, interfaces and object types.
pub trait HasClassMembers {
    fn class_members(&self) -> &[Member];
}

pub trait HasCodePath {
    fn code_path(&self) -> &CodePath;
}

pub trait HasJsLocation {
    fn js_location(&self) -> &JsLocation;
}

pub trait HasTParams {
    fn tparams(&self) -> &[Arc<TypeParam>];
}

pub trait HasComments {
    fn comments(&self) -> &Comments;
}

macro_rules! impl_has_members {
    ($($ty:ty),*) => {$(
        impl HasMembers for $ty {
            fn members(&self) -> &[Decl] {
                &self.members
            }
        }
    )*};
}

impl_has_members!(
    ParsedFile,
    NamespaceDecl,
    ModuleDecl,
    AugmentedModuleDecl,
    GlobalDecl
);

macro_rules! impl_has_class_members {
    ($($ty:ty),*) => {$(
        impl HasClassMembers for $ty {
            fn class_members(&self) -> &[Member] {
                &self.members
            }
        }
    )*};
}

impl_has_class_members!(ClassDecl, InterfaceDecl, ObjectType);

macro_rules! impl_has_code_path {
    ($($ty:ty),*) => {$(
        impl HasCodePath for $ty {
            fn code_path(&self) -> &CodePath {
                &self.code_path
            }
        }
    )*};
}

impl_has_code_path!(
    ParsedFile,
    NamespaceDecl,
    ModuleDecl,
    AugmentedModuleDecl,
    GlobalDecl,
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    VarDecl,
    FunctionDecl,
    TypeAliasDecl
);

macro_rules! impl_has_js_location {
    ($($ty:ty),*) => {$(
        impl HasJsLocation for $ty {
            fn js_location(&self) -> &JsLocation {
                &self.js_location
            }
        }
    )*};
}

impl_has_js_location!(
    NamespaceDecl,
    ModuleDecl,
    AugmentedModuleDecl,
    ClassDecl,
    EnumDecl,
    VarDecl,
    FunctionDecl
);

macro_rules! impl_has_tparams {
    ($($ty:ty),*) => {$(
        impl HasTParams for $ty {
            fn tparams(&self) -> &[Arc<TypeParam>] {
                &self.tparams
            }
        }
    )*};
}

impl_has_tparams!(ClassDecl, InterfaceDecl, TypeAliasDecl, FunSig);

macro_rules! impl_has_comments {
    ($($ty:ty),*) => {$(
        impl HasComments for $ty {
            fn comments(&self) -> &Comments {
                &self.comments
            }
        }
    )*};
}

impl_has_comments!(
    ParsedFile,
    NamespaceDecl,
    ModuleDecl,
    AugmentedModuleDecl,
    GlobalDecl,
    ClassDecl,
    InterfaceDecl,
    EnumDecl,
    VarDecl,
    FunctionDecl,
    TypeAliasDecl,
    ObjectType,
    FunSig,
    FunParam,
    TypeParam
);

impl Decl {
    pub fn as_container(&self) -> Option<&dyn HasMembers> {
        match self {
            Decl::Namespace(x) => Some(&**x),
            Decl::Module(x) => Some(&**x),
            Decl::AugmentedModule(x) => Some(&**x),
            Decl::Global(x) => Some(&**x),
            _ => None,
        }
    }

    pub fn as_class_members(&self) -> Option<&dyn HasClassMembers> {
        match self {
            Decl::Class(x) => Some(&**x),
            Decl::Interface(x) => Some(&**x),
            _ => None,
        }
    }

    pub fn tparams(&self) -> &[Arc<TypeParam>] {
        match self {
            Decl::Class(x) => &x.tparams,
            Decl::Interface(x) => &x.tparams,
            Decl::TypeAlias(x) => &x.tparams,
            Decl::Function(x) => &x.signature.tparams,
            _ => &[],
        }
    }

    /// Rebuild a container with a new member list. Non-containers are
    /// returned unchanged.
    pub fn with_members(&self, members: Vec<Decl>) -> Decl {
        match self {
            Decl::Namespace(x) => Decl::Namespace(Arc::new(NamespaceDecl {
                members,
                ..(**x).clone()
            })),
            Decl::Module(x) => Decl::Module(Arc::new(ModuleDecl {
                members,
                ..(**x).clone()
            })),
            Decl::AugmentedModule(x) => Decl::AugmentedModule(Arc::new(AugmentedModuleDecl {
                members,
                ..(**x).clone()
            })),
            Decl::Global(x) => Decl::Global(Arc::new(GlobalDecl {
                members,
                ..(**x).clone()
            })),
            _ => self.clone(),
        }
    }

    /// Rebuild a class or interface with a new member list.
    pub fn with_class_members(&self, members: Vec<Member>) -> Decl {
        match self {
            Decl::Class(x) => Decl::Class(Arc::new(ClassDecl {
                members,
                ..(**x).clone()
            })),
            Decl::Interface(x) => Decl::Interface(Arc::new(InterfaceDecl {
                members,
                ..(**x).clone()
            })),
            _ => self.clone(),
        }
    }
}

// =============================================================================
// Tree
// =============================================================================

/// Handle to any node that can introduce a scope frame or receive a hook.
#[derive(Clone, Debug)]
pub enum Tree {
    File(Arc<ParsedFile>),
    Decl(Decl),
    Member(Member),
    Type(Type),
    Sig(Arc<FunSig>),
    Param(Arc<FunParam>),
    TypeParam(Arc<TypeParam>),
}

impl Tree {
    pub fn node_id(&self) -> usize {
        match self {
            Tree::File(x) => arc_id(x),
            Tree::Decl(x) => x.node_id(),
            Tree::Member(x) => x.node_id(),
            Tree::Type(x) => x.node_id(),
            Tree::Sig(x) => arc_id(x),
            Tree::Param(x) => arc_id(x),
            Tree::TypeParam(x) => arc_id(x),
        }
    }

    pub fn as_container(&self) -> Option<&dyn HasMembers> {
        match self {
            Tree::File(x) => Some(&**x),
            Tree::Decl(d) => d.as_container(),
            _ => None,
        }
    }

    pub fn as_class_members(&self) -> Option<&dyn HasClassMembers> {
        match self {
            Tree::Decl(d) => d.as_class_members(),
            Tree::Type(Type::Object(o)) => Some(&**o),
            _ => None,
        }
    }

    /// Type parameters introduced by this node.
    pub fn tparams(&self) -> &[Arc<TypeParam>] {
        match self {
            Tree::Decl(d) => d.tparams(),
            Tree::Sig(s) => &s.tparams,
            Tree::Member(Member::Function(f)) => &f.signature.tparams,
            Tree::Member(Member::Call(c)) => &c.signature.tparams,
            Tree::Member(Member::Ctor(c)) => &c.signature.tparams,
            Tree::Type(Type::Function(s)) => &s.tparams,
            Tree::Type(Type::Constructor(c)) => &c.signature.tparams,
            _ => &[],
        }
    }

    /// The mapped-type key introduced by this node, if any.
    pub fn type_key(&self) -> Option<&Ident> {
        match self {
            Tree::Member(Member::Mapped(m)) => Some(&m.key),
            _ => None,
        }
    }

    pub fn code_path(&self) -> Option<&CodePath> {
        match self {
            Tree::File(f) => Some(&f.code_path),
            Tree::Decl(d) => d.code_path(),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&Ident> {
        match self {
            Tree::Decl(d) => d.name(),
            Tree::Member(m) => m.name(),
            Tree::Param(p) => Some(&p.name),
            Tree::TypeParam(t) => Some(&t.name),
            _ => None,
        }
    }

    pub fn as_decl(&self) -> Option<&Decl> {
        match self {
            Tree::Decl(d) => Some(d),
            _ => None,
        }
    }
}

impl From<Decl> for Tree {
    fn from(value: Decl) -> Self {
        Tree::Decl(value)
    }
}

impl From<Member> for Tree {
    fn from(value: Member) -> Self {
        Tree::Member(value)
    }
}

impl From<Type> for Tree {
    fn from(value: Type) -> Self {
        Tree::Type(value)
    }
}

impl From<Arc<ParsedFile>> for Tree {
    fn from(value: Arc<ParsedFile>) -> Self {
        Tree::File(value)
    }
}

// =============================================================================
// Read-only traversal
// =============================================================================

/// Call `f` for every type node reachable from `tpe`, outermost first.
pub fn for_each_type(tpe: &Type, f: &mut dyn FnMut(&Type)) {
    f(tpe);
    match tpe {
        Type::Ref(r) => r.targs.iter().for_each(|t| for_each_type(t, f)),
        Type::Object(o) => o.members.iter().for_each(|m| for_each_member_type(m, f)),
        Type::Function(sig) => for_each_sig_type(sig, f),
        Type::Constructor(c) => for_each_sig_type(&c.signature, f),
        Type::Tuple(t) => t.elems.iter().for_each(|e| for_each_type(&e.tpe, f)),
        Type::Repeated(t) | Type::KeyOf(t) => for_each_type(t, f),
        Type::Lookup(l) => {
            for_each_type(&l.from, f);
            for_each_type(&l.key, f);
        }
        Type::Union(u) => u.types.iter().for_each(|t| for_each_type(t, f)),
        Type::Intersect(i) => i.types.iter().for_each(|t| for_each_type(t, f)),
        Type::Conditional(c) => {
            for_each_type(&c.pred, f);
            for_each_type(&c.if_true, f);
            for_each_type(&c.if_false, f);
        }
        Type::Extends(e) => {
            for_each_type(&e.tpe, f);
            for_each_type(&e.extends, f);
        }
        Type::Infer(tp) => for_each_tparam_type(tp, f),
        Type::Is(is) => for_each_type(&is.tpe, f),
        Type::Literal(_) | Type::Query(_) | Type::This => {}
    }
}

pub fn for_each_member_type(member: &Member, f: &mut dyn FnMut(&Type)) {
    match member {
        Member::Call(c) => for_each_sig_type(&c.signature, f),
        Member::Ctor(c) => for_each_sig_type(&c.signature, f),
        Member::Function(m) => for_each_sig_type(&m.signature, f),
        Member::Property(p) => {
            if let Some(t) = &p.tpe {
                for_each_type(t, f);
            }
        }
        Member::Index(i) => {
            if let Indexing::Dict { tpe, .. } = &i.indexing {
                for_each_type(tpe, f);
            }
            if let Some(t) = &i.value_type {
                for_each_type(t, f);
            }
        }
        Member::Mapped(m) => {
            for_each_type(&m.from, f);
            if let Some(t) = &m.as_name {
                for_each_type(t, f);
            }
            for_each_type(&m.to, f);
        }
    }
}

pub fn for_each_sig_type(sig: &FunSig, f: &mut dyn FnMut(&Type)) {
    sig.tparams.iter().for_each(|tp| for_each_tparam_type(tp, f));
    for param in &sig.params {
        if let Some(t) = &param.tpe {
            for_each_type(t, f);
        }
    }
    if let Some(t) = &sig.result_type {
        for_each_type(t, f);
    }
}

fn for_each_tparam_type(tp: &TypeParam, f: &mut dyn FnMut(&Type)) {
    if let Some(t) = &tp.upper_bound {
        for_each_type(t, f);
    }
    if let Some(t) = &tp.default {
        for_each_type(t, f);
    }
}

/// Names referenced by type references anywhere below `tpe`.
pub fn referenced_names(tpe: &Type) -> Vec<QIdent> {
    let mut names = Vec::new();
    for_each_type(tpe, &mut |t| {
        if let Type::Ref(r) = t {
            names.push(r.name.clone());
        }
    });
    names
}
