//! Initializer expressions.
//!
//! Only literal passthrough is needed downstream; expressions are carried as
//! written and never evaluated.

use crate::ident::QIdent;
use crate::types::{Literal, Type};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallExpr {
    pub function: Expr,
    pub params: Vec<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnaryExpr {
    pub op: String,
    pub expr: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BinaryExpr {
    pub left: Expr,
    pub op: String,
    pub right: Expr,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CastExpr {
    pub expr: Expr,
    pub tpe: Type,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Ref(Arc<QIdent>),
    Literal(Arc<Literal>),
    Call(Arc<CallExpr>),
    Unary(Arc<UnaryExpr>),
    Binary(Arc<BinaryExpr>),
    Cast(Arc<CastExpr>),
    ArrayOf(Arc<Expr>),
}

impl Expr {
    pub fn num(value: &str) -> Expr {
        Expr::Literal(Arc::new(Literal::Num(value.to_string())))
    }

    pub fn str(value: &str) -> Expr {
        Expr::Literal(Arc::new(Literal::Str(value.to_string())))
    }

    pub fn reference(name: impl Into<QIdent>) -> Expr {
        Expr::Ref(Arc::new(name.into()))
    }
}
