//! Type nodes
//!
//! [`Type`] is a tagged union whose variants all hold reference-counted
//! payloads. Cloning a `Type` is a pointer copy, and two handles to the same
//! allocation are the same node (see [`crate::tree::SameNode`]). Equality and
//! hashing are structural.

use crate::comments::Comments;
use crate::ident::{Ident, QIdent};
use crate::members::Member;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Literals
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Literal {
    Num(String),
    Str(String),
    Bool(bool),
}

impl Literal {
    /// The literal as a property key, if it can be one.
    pub fn as_key(&self) -> Option<Ident> {
        match self {
            Literal::Num(n) => Some(Ident::new(n)),
            Literal::Str(s) => Some(Ident::new(s)),
            Literal::Bool(_) => None,
        }
    }
}

// =============================================================================
// Signatures and parameters
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeParam {
    pub comments: Comments,
    pub name: Ident,
    pub upper_bound: Option<Type>,
    pub default: Option<Type>,
}

impl TypeParam {
    pub fn new(name: impl Into<Ident>) -> Arc<TypeParam> {
        Arc::new(TypeParam {
            comments: Comments::none(),
            name: name.into(),
            upper_bound: None,
            default: None,
        })
    }

    /// A reference to this type parameter.
    pub fn as_type(&self) -> Type {
        Type::reference(QIdent::of(self.name.clone()), Vec::new())
    }
}

/// A function parameter. Optional parameters carry `T | undefined`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunParam {
    pub comments: Comments,
    pub name: Ident,
    pub tpe: Option<Type>,
}

impl FunParam {
    pub fn new(name: impl Into<Ident>, tpe: Type) -> Arc<FunParam> {
        Arc::new(FunParam {
            comments: Comments::none(),
            name: name.into(),
            tpe: Some(tpe),
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunSig {
    pub comments: Comments,
    pub tparams: Vec<Arc<TypeParam>>,
    pub params: Vec<Arc<FunParam>>,
    pub result_type: Option<Type>,
}

impl FunSig {
    pub fn new(params: Vec<Arc<FunParam>>, result_type: Option<Type>) -> Arc<FunSig> {
        Arc::new(FunSig {
            comments: Comments::none(),
            tparams: Vec::new(),
            params,
            result_type,
        })
    }
}

// =============================================================================
// Compound type payloads
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub comments: Comments,
    pub name: QIdent,
    pub targs: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectType {
    pub comments: Comments,
    pub members: Vec<Member>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorType {
    pub is_abstract: bool,
    pub signature: Arc<FunSig>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleElement {
    pub label: Option<Ident>,
    pub tpe: Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TupleType {
    pub elems: Vec<TupleElement>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LookupType {
    pub from: Type,
    pub key: Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnionType {
    pub types: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntersectType {
    pub types: Vec<Type>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConditionalType {
    pub pred: Type,
    pub if_true: Type,
    pub if_false: Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtendsType {
    pub tpe: Type,
    pub extends: Type,
}

/// Type predicate `x is T`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IsType {
    pub ident: Ident,
    pub tpe: Type,
}

// =============================================================================
// Type
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    /// Named reference, also used for primitives and type parameters.
    Ref(Arc<TypeRef>),
    Literal(Arc<Literal>),
    /// Member list: an interface body, a mapped type or an anonymous literal.
    Object(Arc<ObjectType>),
    Function(Arc<FunSig>),
    Constructor(Arc<ConstructorType>),
    Tuple(Arc<TupleType>),
    /// `typeof x`
    Query(Arc<QIdent>),
    /// Rest element `...T`
    Repeated(Arc<Type>),
    KeyOf(Arc<Type>),
    /// Indexed access `T[K]`
    Lookup(Arc<LookupType>),
    This,
    Union(Arc<UnionType>),
    Intersect(Arc<IntersectType>),
    Conditional(Arc<ConditionalType>),
    Extends(Arc<ExtendsType>),
    Infer(Arc<TypeParam>),
    Is(Arc<IsType>),
}

impl Type {
    pub fn reference(name: impl Into<QIdent>, targs: Vec<Type>) -> Type {
        Type::Ref(Arc::new(TypeRef {
            comments: Comments::none(),
            name: name.into(),
            targs,
        }))
    }

    pub fn named(name: &str) -> Type {
        Type::reference(QIdent::parse(name), Vec::new())
    }

    pub fn string() -> Type {
        Type::named("string")
    }

    pub fn number() -> Type {
        Type::named("number")
    }

    pub fn boolean() -> Type {
        Type::named("boolean")
    }

    pub fn any() -> Type {
        Type::named("any")
    }

    pub fn void() -> Type {
        Type::named("void")
    }

    pub fn undefined() -> Type {
        Type::named("undefined")
    }

    pub fn null() -> Type {
        Type::named("null")
    }

    pub fn never() -> Type {
        Type::named("never")
    }

    pub fn unknown() -> Type {
        Type::named("unknown")
    }

    pub fn str_lit(value: &str) -> Type {
        Type::Literal(Arc::new(Literal::Str(value.to_string())))
    }

    pub fn num_lit(value: &str) -> Type {
        Type::Literal(Arc::new(Literal::Num(value.to_string())))
    }

    pub fn object(members: Vec<Member>) -> Type {
        Type::Object(Arc::new(ObjectType {
            comments: Comments::none(),
            members,
        }))
    }

    pub fn function(signature: Arc<FunSig>) -> Type {
        Type::Function(signature)
    }

    pub fn constructor(signature: Arc<FunSig>) -> Type {
        Type::Constructor(Arc::new(ConstructorType {
            is_abstract: false,
            signature,
        }))
    }

    /// A raw union. Use [`crate::algebra::simplify_union`] to normalize.
    pub fn union(types: Vec<Type>) -> Type {
        Type::Union(Arc::new(UnionType { types }))
    }

    /// A raw intersection. Use [`crate::algebra::simplify_intersection`] to normalize.
    pub fn intersect(types: Vec<Type>) -> Type {
        Type::Intersect(Arc::new(IntersectType { types }))
    }

    pub fn keyof(tpe: Type) -> Type {
        Type::KeyOf(Arc::new(tpe))
    }

    pub fn lookup(from: Type, key: Type) -> Type {
        Type::Lookup(Arc::new(LookupType { from, key }))
    }

    pub fn as_type_ref(&self) -> Option<&TypeRef> {
        match self {
            Type::Ref(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectType> {
        match self {
            Type::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Whether this is a reference to the given single-segment name with no
    /// type arguments.
    pub fn is_named(&self, name: &str) -> bool {
        match self {
            Type::Ref(r) => {
                r.targs.is_empty() && r.name.single().is_some_and(|n| n.as_str() == name)
            }
            _ => false,
        }
    }

    pub fn is_undefined(&self) -> bool {
        self.is_named("undefined")
    }

    pub fn is_never(&self) -> bool {
        self.is_named("never")
    }
}
