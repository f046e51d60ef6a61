//! Declaration identity and runtime location.
//!
//! A [`CodePath`] is the library-qualified name of a declaration. It is
//! assigned when the tree is built and only changes when a pass explicitly
//! relocates a declaration. A [`JsLocation`] records where the declaration
//! lives in the runtime namespace, which can differ from the code path after
//! hoisting or renaming.

use crate::error::InvariantViolation;
use crate::ident::{Ident, QIdent};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CodePath {
    #[default]
    NoPath,
    HasPath {
        lib: Ident,
        path: QIdent,
    },
}

impl CodePath {
    pub fn root(lib: Ident) -> Self {
        CodePath::HasPath {
            lib,
            path: QIdent::new(Vec::new()),
        }
    }

    pub fn has_path(&self) -> bool {
        matches!(self, CodePath::HasPath { .. })
    }

    /// Extend the path with a member name. `NoPath` stays `NoPath`.
    pub fn add(&self, name: &Ident) -> CodePath {
        match self {
            CodePath::NoPath => CodePath::NoPath,
            CodePath::HasPath { lib, path } => CodePath::HasPath {
                lib: lib.clone(),
                path: path.add(name.clone()),
            },
        }
    }

    /// Path of a declaration `name` moved under this one. A declaration can
    /// only be relocated relative to a known path.
    pub fn relocated(&self, name: &Ident) -> Result<CodePath, InvariantViolation> {
        if self.has_path() {
            Ok(self.add(name))
        } else {
            Err(InvariantViolation::RelocateWithoutCodePath { name: name.clone() })
        }
    }

    pub fn lib(&self) -> Option<&Ident> {
        match self {
            CodePath::NoPath => None,
            CodePath::HasPath { lib, .. } => Some(lib),
        }
    }

    pub fn path(&self) -> Option<&QIdent> {
        match self {
            CodePath::NoPath => None,
            CodePath::HasPath { path, .. } => Some(path),
        }
    }
}

impl fmt::Debug for CodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodePath::NoPath => f.write_str("<no path>"),
            CodePath::HasPath { lib, path } if path.is_empty() => write!(f, "{lib}"),
            CodePath::HasPath { lib, path } => write!(f, "{lib}:{path}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum JsLocation {
    #[default]
    Zero,
    Global(QIdent),
    Module {
        module: Ident,
        path: Vec<Ident>,
    },
}

impl JsLocation {
    pub fn add(&self, name: &Ident) -> JsLocation {
        // `^` names the owner itself at runtime.
        if name.is_apply() {
            return self.clone();
        }
        match self {
            JsLocation::Zero => JsLocation::Zero,
            JsLocation::Global(path) => JsLocation::Global(path.add(name.clone())),
            JsLocation::Module { module, path } => {
                let mut path = path.clone();
                path.push(name.clone());
                JsLocation::Module {
                    module: module.clone(),
                    path,
                }
            }
        }
    }
}
