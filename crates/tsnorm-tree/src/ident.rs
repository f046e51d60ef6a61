//! Identifiers
//!
//! Simple identifiers (`Ident`) are reference counted strings so that cloning
//! a name while rebuilding a tree never copies the text. Qualified identifiers
//! (`QIdent`) are dotted paths such as `React.Component`.

use once_cell::sync::Lazy;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A simple (unqualified) identifier.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ident(Arc<str>);

impl Ident {
    /// The implicit call target of a module or namespace (`export = fn`).
    pub const APPLY_STR: &'static str = "^";
    pub const CONSTRUCTOR_STR: &'static str = "constructor";
    pub const DEFAULT_STR: &'static str = "default";
    pub const PROTOTYPE_STR: &'static str = "prototype";

    pub fn new(value: impl AsRef<str>) -> Self {
        Ident(Arc::from(value.as_ref()))
    }

    pub fn apply() -> Self {
        Ident::new(Self::APPLY_STR)
    }

    pub fn constructor() -> Self {
        Ident::new(Self::CONSTRUCTOR_STR)
    }

    pub fn default_export() -> Self {
        Ident::new(Self::DEFAULT_STR)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the implicit call target `^`.
    pub fn is_apply(&self) -> bool {
        &*self.0 == Self::APPLY_STR
    }

    pub fn is_constructor(&self) -> bool {
        &*self.0 == Self::CONSTRUCTOR_STR
    }

    pub fn is_primitive(&self) -> bool {
        PRIMITIVES.contains(&*self.0)
    }

    /// The identifier with its first character upper-cased.
    pub fn capitalized(&self) -> String {
        let mut chars = self.0.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }

    /// Append a suffix, producing a new identifier.
    pub fn with_suffix(&self, suffix: &str) -> Ident {
        let mut value = String::with_capacity(self.0.len() + suffix.len());
        value.push_str(&self.0);
        value.push_str(suffix);
        Ident::new(value)
    }
}

impl fmt::Debug for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", &*self.0)
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Ident {
    fn from(value: &str) -> Self {
        Ident::new(value)
    }
}

impl From<String> for Ident {
    fn from(value: String) -> Self {
        Ident(Arc::from(value))
    }
}

/// Names of the built-in types. A reference to one of these never resolves
/// to a declaration.
pub static PRIMITIVES: Lazy<FxHashSet<&'static str>> = Lazy::new(|| {
    [
        "any",
        "bigint",
        "boolean",
        "never",
        "null",
        "number",
        "object",
        "string",
        "symbol",
        "this",
        "undefined",
        "unknown",
        "void",
    ]
    .into_iter()
    .collect()
});

/// A dotted identifier path.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QIdent {
    pub parts: Vec<Ident>,
}

impl QIdent {
    pub fn new(parts: Vec<Ident>) -> Self {
        QIdent { parts }
    }

    pub fn of(name: impl Into<Ident>) -> Self {
        QIdent {
            parts: vec![name.into()],
        }
    }

    /// Parse a dotted string such as `"A.B.C"`.
    pub fn parse(dotted: &str) -> Self {
        QIdent {
            parts: dotted.split('.').map(Ident::new).collect(),
        }
    }

    pub fn head(&self) -> Option<&Ident> {
        self.parts.first()
    }

    pub fn tail(&self) -> &[Ident] {
        self.parts.get(1..).unwrap_or(&[])
    }

    pub fn last(&self) -> Option<&Ident> {
        self.parts.last()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// The single identifier of a one-segment name.
    pub fn single(&self) -> Option<&Ident> {
        match self.parts.as_slice() {
            [only] => Some(only),
            _ => None,
        }
    }

    pub fn add(&self, name: Ident) -> QIdent {
        let mut parts = self.parts.clone();
        parts.push(name);
        QIdent { parts }
    }

    pub fn is_primitive(&self) -> bool {
        self.single().is_some_and(Ident::is_primitive)
    }
}

impl fmt::Debug for QIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl fmt::Display for QIdent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, part) in self.parts.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(part.as_str())?;
        }
        Ok(())
    }
}

impl From<&str> for QIdent {
    fn from(value: &str) -> Self {
        QIdent::parse(value)
    }
}

impl From<Ident> for QIdent {
    fn from(value: Ident) -> Self {
        QIdent::of(value)
    }
}
