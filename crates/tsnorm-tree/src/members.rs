//! Members of classes, interfaces and object types.

use crate::comments::Comments;
use crate::expr::Expr;
use crate::ident::{Ident, QIdent};
use crate::types::{FunSig, Type};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ProtectionLevel {
    #[default]
    Default,
    Private,
    Protected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum MethodType {
    #[default]
    Normal,
    Getter,
    Setter,
}

/// `+readonly` / `-readonly` on a mapped type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ReadonlyModifier {
    #[default]
    Noop,
    Yes,
    No,
}

/// `+?` / `-?` on a mapped type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum OptionalModifier {
    #[default]
    Noop,
    Optionalize,
    Deoptionalize,
}

/// Call signature `(a: A): R`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallMember {
    pub comments: Comments,
    pub level: ProtectionLevel,
    pub signature: Arc<FunSig>,
}

/// Construct signature `new (a: A): R`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CtorMember {
    pub comments: Comments,
    pub level: ProtectionLevel,
    pub signature: Arc<FunSig>,
}

/// Method, getter or setter. Class constructors are methods named `constructor`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionMember {
    pub comments: Comments,
    pub level: ProtectionLevel,
    pub name: Ident,
    pub method_type: MethodType,
    pub signature: Arc<FunSig>,
    pub is_static: bool,
    pub is_readonly: bool,
}

/// Property. Optional properties carry `T | undefined`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyMember {
    pub comments: Comments,
    pub level: ProtectionLevel,
    pub name: Ident,
    pub tpe: Option<Type>,
    pub expr: Option<Expr>,
    pub is_static: bool,
    pub is_readonly: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Indexing {
    /// `[key: string]: V`
    Dict { name: Ident, tpe: Type },
    /// `[Symbol.iterator]: V`
    Single(QIdent),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexMember {
    pub comments: Comments,
    pub is_readonly: bool,
    pub level: ProtectionLevel,
    pub indexing: Indexing,
    pub value_type: Option<Type>,
}

/// `{ readonly [K in From as As]?: To }`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MappedMember {
    pub comments: Comments,
    pub level: ProtectionLevel,
    pub readonly: ReadonlyModifier,
    pub key: Ident,
    pub from: Type,
    pub as_name: Option<Type>,
    pub optionalize: OptionalModifier,
    pub to: Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Member {
    Call(Arc<CallMember>),
    Ctor(Arc<CtorMember>),
    Function(Arc<FunctionMember>),
    Property(Arc<PropertyMember>),
    Index(Arc<IndexMember>),
    Mapped(Arc<MappedMember>),
}

impl Member {
    pub fn property(name: impl Into<Ident>, tpe: Type) -> Member {
        Member::Property(Arc::new(PropertyMember {
            comments: Comments::none(),
            level: ProtectionLevel::Default,
            name: name.into(),
            tpe: Some(tpe),
            expr: None,
            is_static: false,
            is_readonly: false,
        }))
    }

    pub fn method(name: impl Into<Ident>, signature: Arc<FunSig>) -> Member {
        Member::Function(Arc::new(FunctionMember {
            comments: Comments::none(),
            level: ProtectionLevel::Default,
            name: name.into(),
            method_type: MethodType::Normal,
            signature,
            is_static: false,
            is_readonly: false,
        }))
    }

    pub fn call(signature: Arc<FunSig>) -> Member {
        Member::Call(Arc::new(CallMember {
            comments: Comments::none(),
            level: ProtectionLevel::Default,
            signature,
        }))
    }

    pub fn ctor(signature: Arc<FunSig>) -> Member {
        Member::Ctor(Arc::new(CtorMember {
            comments: Comments::none(),
            level: ProtectionLevel::Default,
            signature,
        }))
    }

    pub fn dict(key_name: impl Into<Ident>, key: Type, value: Type) -> Member {
        Member::Index(Arc::new(IndexMember {
            comments: Comments::none(),
            is_readonly: false,
            level: ProtectionLevel::Default,
            indexing: Indexing::Dict {
                name: key_name.into(),
                tpe: key,
            },
            value_type: Some(value),
        }))
    }

    /// The member name for named members (properties and methods).
    pub fn name(&self) -> Option<&Ident> {
        match self {
            Member::Function(f) => Some(&f.name),
            Member::Property(p) => Some(&p.name),
            _ => None,
        }
    }

    pub fn comments(&self) -> &Comments {
        match self {
            Member::Call(m) => &m.comments,
            Member::Ctor(m) => &m.comments,
            Member::Function(m) => &m.comments,
            Member::Property(m) => &m.comments,
            Member::Index(m) => &m.comments,
            Member::Mapped(m) => &m.comments,
        }
    }

    pub fn is_static(&self) -> bool {
        match self {
            Member::Function(f) => f.is_static,
            Member::Property(p) => p.is_static,
            _ => false,
        }
    }

    /// Class constructors: methods named `constructor`.
    pub fn is_class_ctor(&self) -> bool {
        matches!(self, Member::Function(f) if f.name.is_constructor() && !f.is_static)
    }

    /// Dictionary-only member lists (a single kind of index signature).
    pub fn is_dictionary(members: &[Member]) -> bool {
        !members.is_empty()
            && members.iter().all(|m| {
                matches!(m, Member::Index(i) if matches!(i.indexing, Indexing::Dict { .. }))
            })
    }

    pub fn is_type_mapping(members: &[Member]) -> bool {
        members.iter().any(|m| matches!(m, Member::Mapped(_)))
    }
}
