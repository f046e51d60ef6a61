//! Declarations and the parsed file.

use crate::code_path::{CodePath, JsLocation};
use crate::comments::Comments;
use crate::error::InvariantViolation;
use crate::expr::Expr;
use crate::ident::{Ident, QIdent};
use crate::members::Member;
use crate::types::{FunSig, Type, TypeParam};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

// =============================================================================
// Parsed file
// =============================================================================

/// Triple-slash directives at the top of a file.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Directive {
    TypesRef(String),
    PathRef(String),
    LibRef(String),
    NoStdLib,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParsedFile {
    pub comments: Comments,
    pub directives: Vec<Directive>,
    pub members: Vec<Decl>,
    pub code_path: CodePath,
}

impl ParsedFile {
    pub fn new(lib: Ident, members: Vec<Decl>) -> Arc<ParsedFile> {
        Arc::new(ParsedFile {
            comments: Comments::none(),
            directives: Vec::new(),
            members,
            code_path: CodePath::root(lib),
        })
    }

    pub fn with_members(&self, members: Vec<Decl>) -> Arc<ParsedFile> {
        Arc::new(ParsedFile {
            members,
            ..self.clone()
        })
    }
}

// =============================================================================
// Containers
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NamespaceDecl {
    pub comments: Comments,
    pub declared: bool,
    pub name: Ident,
    pub members: Vec<Decl>,
    pub code_path: CodePath,
    pub js_location: JsLocation,
}

/// `declare module "name" { ... }`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleDecl {
    pub comments: Comments,
    pub declared: bool,
    pub name: Ident,
    pub members: Vec<Decl>,
    pub code_path: CodePath,
    pub js_location: JsLocation,
}

/// Augmentation of a module declared elsewhere.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AugmentedModuleDecl {
    pub comments: Comments,
    pub name: Ident,
    pub members: Vec<Decl>,
    pub code_path: CodePath,
    pub js_location: JsLocation,
}

/// `declare global { ... }`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GlobalDecl {
    pub comments: Comments,
    pub declared: bool,
    pub members: Vec<Decl>,
    pub code_path: CodePath,
}

// =============================================================================
// Named declarations
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClassDecl {
    pub comments: Comments,
    pub declared: bool,
    pub is_abstract: bool,
    pub name: Ident,
    pub tparams: Vec<Arc<TypeParam>>,
    pub parent: Option<Type>,
    pub implements: Vec<Type>,
    pub members: Vec<Member>,
    pub js_location: JsLocation,
    pub code_path: CodePath,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InterfaceDecl {
    pub comments: Comments,
    pub declared: bool,
    pub name: Ident,
    pub tparams: Vec<Arc<TypeParam>>,
    pub inheritance: Vec<Type>,
    pub members: Vec<Member>,
    pub code_path: CodePath,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumMember {
    pub comments: Comments,
    pub name: Ident,
    pub expr: Option<Expr>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EnumDecl {
    pub comments: Comments,
    pub declared: bool,
    pub is_const: bool,
    pub name: Ident,
    pub members: Vec<EnumMember>,
    pub is_value: bool,
    pub exported_from: Option<Type>,
    pub js_location: JsLocation,
    pub code_path: CodePath,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarDecl {
    pub comments: Comments,
    pub declared: bool,
    pub readonly: bool,
    pub name: Ident,
    pub tpe: Option<Type>,
    pub expr: Option<Expr>,
    pub js_location: JsLocation,
    pub code_path: CodePath,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub comments: Comments,
    pub declared: bool,
    pub name: Ident,
    pub signature: Arc<FunSig>,
    pub js_location: JsLocation,
    pub code_path: CodePath,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeAliasDecl {
    pub comments: Comments,
    pub declared: bool,
    pub name: Ident,
    pub tparams: Vec<Arc<TypeParam>>,
    pub alias: Type,
    pub code_path: CodePath,
}

// =============================================================================
// Imports and exports
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Imported {
    /// `import x from ...` or `import x = ...`
    Ident(Ident),
    /// `import { a, b as c } from ...`
    Destructured(Vec<(Ident, Option<Ident>)>),
    /// `import * as x from ...`
    Star(Option<Ident>),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Importee {
    /// `import x = require("m")`
    Required(Ident),
    /// `... from "m"`
    From(Ident),
    /// `import x = A.B`
    Local(QIdent),
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImportDecl {
    pub type_only: bool,
    pub imported: Vec<Imported>,
    pub from: Importee,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExportKind {
    /// `export ...`
    Named,
    /// `export default ...`
    Defaulted,
    /// `export = ...`
    Namespaced,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Exportee {
    /// `export { a, b as c }` or `export { a } from "m"`
    Names {
        names: Vec<(QIdent, Option<Ident>)>,
        from: Option<Ident>,
    },
    /// `export declare class X {}`
    Tree(Decl),
    /// `export * from "m"` or `export * as x from "m"`
    Star { alias: Option<Ident>, from: Ident },
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportDecl {
    pub comments: Comments,
    pub type_only: bool,
    pub kind: ExportKind,
    pub exportee: Exportee,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExportAsNamespaceDecl {
    pub ident: Ident,
}

// =============================================================================
// Decl
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decl {
    Namespace(Arc<NamespaceDecl>),
    Module(Arc<ModuleDecl>),
    AugmentedModule(Arc<AugmentedModuleDecl>),
    Global(Arc<GlobalDecl>),
    Class(Arc<ClassDecl>),
    Interface(Arc<InterfaceDecl>),
    Enum(Arc<EnumDecl>),
    Var(Arc<VarDecl>),
    Function(Arc<FunctionDecl>),
    TypeAlias(Arc<TypeAliasDecl>),
    Import(Arc<ImportDecl>),
    Export(Arc<ExportDecl>),
    ExportAsNamespace(Arc<ExportAsNamespaceDecl>),
}

impl Decl {
    /// Declared name. Modules answer with their module name.
    pub fn name(&self) -> Option<&Ident> {
        match self {
            Decl::Namespace(x) => Some(&x.name),
            Decl::Module(x) => Some(&x.name),
            Decl::AugmentedModule(x) => Some(&x.name),
            Decl::Class(x) => Some(&x.name),
            Decl::Interface(x) => Some(&x.name),
            Decl::Enum(x) => Some(&x.name),
            Decl::Var(x) => Some(&x.name),
            Decl::Function(x) => Some(&x.name),
            Decl::TypeAlias(x) => Some(&x.name),
            Decl::Global(_) | Decl::Import(_) | Decl::Export(_) | Decl::ExportAsNamespace(_) => {
                None
            }
        }
    }

    pub fn comments(&self) -> Option<&Comments> {
        match self {
            Decl::Namespace(x) => Some(&x.comments),
            Decl::Module(x) => Some(&x.comments),
            Decl::AugmentedModule(x) => Some(&x.comments),
            Decl::Global(x) => Some(&x.comments),
            Decl::Class(x) => Some(&x.comments),
            Decl::Interface(x) => Some(&x.comments),
            Decl::Enum(x) => Some(&x.comments),
            Decl::Var(x) => Some(&x.comments),
            Decl::Function(x) => Some(&x.comments),
            Decl::TypeAlias(x) => Some(&x.comments),
            Decl::Export(x) => Some(&x.comments),
            Decl::Import(_) | Decl::ExportAsNamespace(_) => None,
        }
    }

    pub fn code_path(&self) -> Option<&CodePath> {
        match self {
            Decl::Namespace(x) => Some(&x.code_path),
            Decl::Module(x) => Some(&x.code_path),
            Decl::AugmentedModule(x) => Some(&x.code_path),
            Decl::Global(x) => Some(&x.code_path),
            Decl::Class(x) => Some(&x.code_path),
            Decl::Interface(x) => Some(&x.code_path),
            Decl::Enum(x) => Some(&x.code_path),
            Decl::Var(x) => Some(&x.code_path),
            Decl::Function(x) => Some(&x.code_path),
            Decl::TypeAlias(x) => Some(&x.code_path),
            Decl::Import(_) | Decl::Export(_) | Decl::ExportAsNamespace(_) => None,
        }
    }

    pub fn js_location(&self) -> Option<&JsLocation> {
        match self {
            Decl::Namespace(x) => Some(&x.js_location),
            Decl::Module(x) => Some(&x.js_location),
            Decl::AugmentedModule(x) => Some(&x.js_location),
            Decl::Class(x) => Some(&x.js_location),
            Decl::Enum(x) => Some(&x.js_location),
            Decl::Var(x) => Some(&x.js_location),
            Decl::Function(x) => Some(&x.js_location),
            _ => None,
        }
    }

    /// Types live in a separate namespace from values.
    pub fn is_type(&self) -> bool {
        matches!(
            self,
            Decl::Class(_) | Decl::Interface(_) | Decl::TypeAlias(_) | Decl::Enum(_)
        )
    }

    pub fn is_value(&self) -> bool {
        match self {
            Decl::Var(_) | Decl::Function(_) | Decl::Class(_) | Decl::Namespace(_) => true,
            Decl::Enum(e) => e.is_value,
            _ => false,
        }
    }

    /// Replace the code path. Declarations without one are returned as is.
    pub fn with_code_path(&self, code_path: CodePath) -> Decl {
        match self {
            Decl::Namespace(x) => Decl::Namespace(Arc::new(NamespaceDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Module(x) => Decl::Module(Arc::new(ModuleDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::AugmentedModule(x) => Decl::AugmentedModule(Arc::new(AugmentedModuleDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Global(x) => Decl::Global(Arc::new(GlobalDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Class(x) => Decl::Class(Arc::new(ClassDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Interface(x) => Decl::Interface(Arc::new(InterfaceDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Enum(x) => Decl::Enum(Arc::new(EnumDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Var(x) => Decl::Var(Arc::new(VarDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Function(x) => Decl::Function(Arc::new(FunctionDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::TypeAlias(x) => Decl::TypeAlias(Arc::new(TypeAliasDecl {
                code_path,
                ..(**x).clone()
            })),
            Decl::Import(_) | Decl::Export(_) | Decl::ExportAsNamespace(_) => self.clone(),
        }
    }

    pub fn with_comments(&self, comments: Comments) -> Decl {
        match self {
            Decl::Namespace(x) => Decl::Namespace(Arc::new(NamespaceDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Module(x) => Decl::Module(Arc::new(ModuleDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::AugmentedModule(x) => Decl::AugmentedModule(Arc::new(AugmentedModuleDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Global(x) => Decl::Global(Arc::new(GlobalDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Class(x) => Decl::Class(Arc::new(ClassDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Interface(x) => Decl::Interface(Arc::new(InterfaceDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Enum(x) => Decl::Enum(Arc::new(EnumDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Var(x) => Decl::Var(Arc::new(VarDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Function(x) => Decl::Function(Arc::new(FunctionDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::TypeAlias(x) => Decl::TypeAlias(Arc::new(TypeAliasDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Export(x) => Decl::Export(Arc::new(ExportDecl {
                comments,
                ..(**x).clone()
            })),
            Decl::Import(_) | Decl::ExportAsNamespace(_) => self.clone(),
        }
    }

    /// Rename a named declaration, moving its code path along.
    ///
    /// The implicit call target `^` stands for its enclosing module or
    /// namespace itself; giving it another name would silently change what
    /// the printer emits, so that is refused.
    pub fn renamed(&self, new_name: Ident) -> Result<Decl, InvariantViolation> {
        let Some(old) = self.name() else {
            return Err(InvariantViolation::Unnamed);
        };
        if old.is_apply() && !new_name.is_apply() {
            return Err(InvariantViolation::RenameCallTarget {
                new_name,
                code_path: self.code_path().cloned().unwrap_or_default(),
            });
        }
        let code_path = match self.code_path() {
            Some(CodePath::HasPath { lib, path }) => {
                let mut parts = path.parts.clone();
                parts.pop();
                parts.push(new_name.clone());
                CodePath::HasPath {
                    lib: lib.clone(),
                    path: QIdent::new(parts),
                }
            }
            _ => CodePath::NoPath,
        };
        let renamed = match self {
            Decl::Namespace(x) => Decl::Namespace(Arc::new(NamespaceDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::Class(x) => Decl::Class(Arc::new(ClassDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::Interface(x) => Decl::Interface(Arc::new(InterfaceDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::Enum(x) => Decl::Enum(Arc::new(EnumDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::Var(x) => Decl::Var(Arc::new(VarDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::Function(x) => Decl::Function(Arc::new(FunctionDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::TypeAlias(x) => Decl::TypeAlias(Arc::new(TypeAliasDecl {
                name: new_name,
                code_path,
                ..(**x).clone()
            })),
            Decl::Module(_) | Decl::AugmentedModule(_) => {
                return Err(InvariantViolation::RenameModule {
                    module: old.clone(),
                });
            }
            Decl::Global(_) | Decl::Import(_) | Decl::Export(_) | Decl::ExportAsNamespace(_) => {
                return Err(InvariantViolation::Unnamed);
            }
        };
        Ok(renamed)
    }

    pub fn var(name: impl Into<Ident>, tpe: Type) -> Decl {
        Decl::Var(Arc::new(VarDecl {
            comments: Comments::none(),
            declared: true,
            readonly: true,
            name: name.into(),
            tpe: Some(tpe),
            expr: None,
            js_location: JsLocation::Zero,
            code_path: CodePath::NoPath,
        }))
    }

    pub fn interface(name: impl Into<Ident>, members: Vec<Member>) -> Decl {
        Decl::Interface(Arc::new(InterfaceDecl {
            comments: Comments::none(),
            declared: true,
            name: name.into(),
            tparams: Vec::new(),
            inheritance: Vec::new(),
            members,
            code_path: CodePath::NoPath,
        }))
    }

    pub fn class(name: impl Into<Ident>, parent: Option<Type>, members: Vec<Member>) -> Decl {
        Decl::Class(Arc::new(ClassDecl {
            comments: Comments::none(),
            declared: true,
            is_abstract: false,
            name: name.into(),
            tparams: Vec::new(),
            parent,
            implements: Vec::new(),
            members,
            js_location: JsLocation::Zero,
            code_path: CodePath::NoPath,
        }))
    }

    pub fn function(name: impl Into<Ident>, signature: Arc<FunSig>) -> Decl {
        Decl::Function(Arc::new(FunctionDecl {
            comments: Comments::none(),
            declared: true,
            name: name.into(),
            signature,
            js_location: JsLocation::Zero,
            code_path: CodePath::NoPath,
        }))
    }

    pub fn type_alias(name: impl Into<Ident>, alias: Type) -> Decl {
        Decl::TypeAlias(Arc::new(TypeAliasDecl {
            comments: Comments::none(),
            declared: true,
            name: name.into(),
            tparams: Vec::new(),
            alias,
            code_path: CodePath::NoPath,
        }))
    }

    pub fn namespace(name: impl Into<Ident>, members: Vec<Decl>) -> Decl {
        Decl::Namespace(Arc::new(NamespaceDecl {
            comments: Comments::none(),
            declared: true,
            name: name.into(),
            members,
            code_path: CodePath::NoPath,
            js_location: JsLocation::Zero,
        }))
    }

    pub fn module(name: impl Into<Ident>, members: Vec<Decl>) -> Decl {
        let name = name.into();
        Decl::Module(Arc::new(ModuleDecl {
            comments: Comments::none(),
            declared: true,
            js_location: JsLocation::Module {
                module: name.clone(),
                path: Vec::new(),
            },
            name,
            members,
            code_path: CodePath::NoPath,
        }))
    }

    pub fn export_names(names: Vec<(QIdent, Option<Ident>)>, from: Option<Ident>) -> Decl {
        Decl::Export(Arc::new(ExportDecl {
            comments: Comments::none(),
            type_only: false,
            kind: ExportKind::Named,
            exportee: Exportee::Names { names, from },
        }))
    }

    pub fn export_star(from: impl Into<Ident>) -> Decl {
        Decl::Export(Arc::new(ExportDecl {
            comments: Comments::none(),
            type_only: false,
            kind: ExportKind::Named,
            exportee: Exportee::Star {
                alias: None,
                from: from.into(),
            },
        }))
    }

    pub fn export_equals(name: impl Into<QIdent>) -> Decl {
        Decl::Export(Arc::new(ExportDecl {
            comments: Comments::none(),
            type_only: false,
            kind: ExportKind::Namespaced,
            exportee: Exportee::Names {
                names: vec![(name.into(), None)],
                from: None,
            },
        }))
    }

    pub fn export_decl(decl: Decl) -> Decl {
        Decl::Export(Arc::new(ExportDecl {
            comments: Comments::none(),
            type_only: false,
            kind: ExportKind::Named,
            exportee: Exportee::Tree(decl),
        }))
    }

    pub fn import(imported: Vec<Imported>, from: Importee) -> Decl {
        Decl::Import(Arc::new(ImportDecl {
            type_only: false,
            imported,
            from,
        }))
    }
}
