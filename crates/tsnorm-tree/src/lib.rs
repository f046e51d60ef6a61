//! Declaration tree model for the tsnorm rewriting engine.
//!
//! This crate provides the immutable tree every pass consumes and produces:
//! - Identifiers and qualified names (`Ident`, `QIdent`)
//! - Declaration identity (`CodePath`) and runtime location (`JsLocation`)
//! - Comments and pass markers (`Comments`, `Marker`)
//! - Declarations, members, types and expressions as tagged unions of
//!   reference-counted nodes
//! - Capability traits (`HasMembers`, `HasClassMembers`, `HasCodePath`, ...)
//! - The type algebra (`simplify_union`, `simplify_intersection`,
//!   `make_optional`, `extract_optional`)
//!
//! Trees are never mutated. A rewrite builds new nodes along the changed path
//! and shares every untouched child by reference.

pub mod ident;
pub use ident::{Ident, QIdent};

pub mod comments;
pub use comments::{Comment, Comments, Marker};

pub mod code_path;
pub use code_path::{CodePath, JsLocation};

pub mod types;
pub use types::{
    ConditionalType, ConstructorType, ExtendsType, FunParam, FunSig, IntersectType, IsType,
    Literal, LookupType, ObjectType, TupleElement, TupleType, Type, TypeParam, TypeRef, UnionType,
};

pub mod members;
pub use members::{
    CallMember, CtorMember, FunctionMember, IndexMember, Indexing, MappedMember, Member,
    MethodType, OptionalModifier, PropertyMember, ProtectionLevel, ReadonlyModifier,
};

pub mod expr;
pub use expr::{BinaryExpr, CallExpr, CastExpr, Expr, UnaryExpr};

pub mod decls;
pub use decls::{
    AugmentedModuleDecl, ClassDecl, Decl, Directive, EnumDecl, EnumMember, ExportAsNamespaceDecl,
    ExportDecl, ExportKind, Exportee, FunctionDecl, GlobalDecl, ImportDecl, Importee, Imported,
    InterfaceDecl, ModuleDecl, NamespaceDecl, ParsedFile, TypeAliasDecl, VarDecl,
};

pub mod tree;
pub use tree::{
    HasClassMembers, HasCodePath, HasComments, HasJsLocation, HasMembers, HasTParams, SameNode,
    Tree, for_each_member_type, for_each_sig_type, for_each_type, referenced_names,
};

pub mod algebra;
pub use algebra::{extract_optional, make_optional, simplify_intersection, simplify_union};

pub mod error;
pub use error::InvariantViolation;
