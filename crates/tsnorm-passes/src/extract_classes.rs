//! Classes from constructor-typed variables.
//!
//! ```text
//! declare var Widget: { new (a: string): Widget; version: string }
//! ```
//!
//! describes a class. The variable is replaced by a class carrying the
//! construct signatures as constructors, the instance members of the
//! constructed type and the remaining members as statics.
//!
//! When another type in the same container already owns the name, the class
//! gets a backup name instead. The common split declaration
//!
//! ```text
//! interface Foo { bar(): void }
//! declare var Foo: { new (a: string): Foo; version: string }
//! ```
//!
//! therefore keeps `interface Foo` and yields `class FooCls implements Foo`,
//! whose constructor, `bar` and static `version` come from both halves.

use crate::pass::{LibraryPass, run_scoped};
use std::sync::Arc;
use tracing::debug;
use tsnorm_scope::{LoopDetector, Picker, Scope, all_members_for};
use tsnorm_transform::{TransformResult, TreeTransformation, scope_follows_tree};
use tsnorm_tree::{
    ClassDecl, Comments, Decl, ExportDecl, Exportee, FunSig, FunctionMember, Ident, Marker, Member,
    MethodType, ParsedFile, PropertyMember, ProtectionLevel, Tree, Type, TypeParam, VarDecl,
};

pub const DEFAULT_BACKUP_SUFFIX: &str = "Cls";

#[derive(Debug)]
pub struct ExtractClasses {
    backup_suffix: String,
}

impl Default for ExtractClasses {
    fn default() -> Self {
        ExtractClasses::new(DEFAULT_BACKUP_SUFFIX)
    }
}

/// The static side of a class as seen through a variable's type.
struct CtorShape {
    ctors: Vec<Arc<FunSig>>,
    statics: Vec<Member>,
    is_abstract: bool,
}

impl CtorShape {
    fn from_members(members: &[Member]) -> Option<CtorShape> {
        let mut ctors = Vec::new();
        let mut statics = Vec::new();
        for member in members {
            match member {
                Member::Ctor(c) => ctors.push(c.signature.clone()),
                // A callable class has no declaration form.
                Member::Call(_) | Member::Index(_) | Member::Mapped(_) => return None,
                Member::Property(p) if p.name.as_str() == "prototype" => {}
                Member::Property(p) => statics.push(Member::Property(Arc::new(PropertyMember {
                    is_static: true,
                    ..(**p).clone()
                }))),
                Member::Function(f) => statics.push(Member::Function(Arc::new(FunctionMember {
                    is_static: true,
                    ..(**f).clone()
                }))),
            }
        }
        if ctors.is_empty() {
            return None;
        }
        Some(CtorShape {
            ctors,
            statics,
            is_abstract: false,
        })
    }
}

fn unwrap_export(decl: &Decl) -> &Decl {
    match decl {
        Decl::Export(e) => match &e.exportee {
            Exportee::Tree(inner) => inner,
            _ => decl,
        },
        _ => decl,
    }
}

/// Instance members contributed by the constructed type.
#[derive(Default)]
struct InstanceSide {
    parent: Option<Type>,
    implements: Vec<Type>,
    members: Vec<Member>,
}

fn instance_members(members: &[Member]) -> Vec<Member> {
    members
        .iter()
        .filter(|m| !matches!(m, Member::Call(_) | Member::Ctor(_)) && !m.is_static())
        .cloned()
        .collect()
}

impl ExtractClasses {
    pub fn new(backup_suffix: impl Into<String>) -> Self {
        ExtractClasses {
            backup_suffix: backup_suffix.into(),
        }
    }

    fn ctor_shape(&self, scope: &Scope, tpe: &Type, ld: &LoopDetector) -> Option<CtorShape> {
        match tpe {
            Type::Constructor(c) => Some(CtorShape {
                ctors: vec![c.signature.clone()],
                statics: Vec::new(),
                is_abstract: c.is_abstract,
            }),
            Type::Object(o) => CtorShape::from_members(&o.members),
            Type::Ref(r) if r.targs.is_empty() => {
                let resolves_to_interface = scope
                    .lookup_type(&r.name, ld)
                    .iter()
                    .any(|(d, _)| matches!(d, Decl::Interface(i) if i.tparams.is_empty()));
                if !resolves_to_interface {
                    return None;
                }
                CtorShape::from_members(&all_members_for(scope, r, ld)?)
            }
            _ => None,
        }
    }

    fn instance_side(
        &self,
        scope: &Scope,
        tparams: &[Arc<TypeParam>],
        result: Option<&Type>,
        ld: &LoopDetector,
    ) -> InstanceSide {
        match result {
            // `new <T>(): T` constructs nothing nameable.
            Some(Type::Ref(r))
                if r.name
                    .single()
                    .is_some_and(|n| tparams.iter().any(|tp| &tp.name == n)) =>
            {
                InstanceSide::default()
            }
            Some(Type::Object(o)) => InstanceSide {
                members: instance_members(&o.members),
                ..InstanceSide::default()
            },
            Some(tpe @ Type::Ref(r)) => {
                let found = scope.lookup_type(&r.name, ld);
                if found.iter().any(|(d, _)| matches!(d, Decl::Class(_))) {
                    InstanceSide {
                        parent: Some(tpe.clone()),
                        ..InstanceSide::default()
                    }
                } else if found.iter().any(|(d, _)| matches!(d, Decl::Interface(_))) {
                    InstanceSide {
                        implements: vec![tpe.clone()],
                        members: all_members_for(scope, r, ld)
                            .map(|members| instance_members(&members))
                            .unwrap_or_default(),
                        ..InstanceSide::default()
                    }
                } else {
                    InstanceSide::default()
                }
            }
            _ => InstanceSide::default(),
        }
    }

    /// The class replacing `decl`, or `None` when the variable is left as is.
    fn extract(
        &self,
        scope: &Scope,
        siblings: &[Decl],
        decl: &Decl,
    ) -> TransformResult<Option<Decl>> {
        match decl {
            Decl::Var(v) => self.extract_var(scope, siblings, decl, v),
            Decl::Export(e) => match &e.exportee {
                Exportee::Tree(inner @ Decl::Var(v)) => {
                    Ok(self.extract_var(scope, siblings, inner, v)?.map(|class| {
                        Decl::Export(Arc::new(ExportDecl {
                            exportee: Exportee::Tree(class),
                            ..(**e).clone()
                        }))
                    }))
                }
                _ => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn extract_var(
        &self,
        scope: &Scope,
        siblings: &[Decl],
        decl: &Decl,
        v: &VarDecl,
    ) -> TransformResult<Option<Decl>> {
        if v.expr.is_some() {
            return Ok(None);
        }
        let Some(tpe) = &v.tpe else {
            return Ok(None);
        };
        let ld = LoopDetector::new();
        let Some(shape) = self.ctor_shape(scope, tpe, &ld) else {
            return Ok(None);
        };

        let Some(first) = shape.ctors.first() else {
            return Ok(None);
        };
        // Constructors cannot be generic; shared type parameters move to the
        // class, anything else keeps the variable.
        if shape.ctors.iter().any(|c| c.tparams != first.tparams) {
            return Ok(None);
        }
        let tparams: Vec<Arc<TypeParam>> = first.tparams.clone();
        let result = if shape.ctors.iter().all(|c| c.result_type == first.result_type) {
            first.result_type.as_ref()
        } else {
            None
        };

        let name = &v.name;
        let existing_class = siblings
            .iter()
            .map(unwrap_export)
            .any(|d| matches!(d, Decl::Class(c) if &c.name == name));
        if existing_class {
            return Ok(None);
        }
        let other_types = Picker::Types.but_not(vec![decl.clone()]);
        let type_taken = |n: &Ident| {
            siblings
                .iter()
                .map(unwrap_export)
                .any(|d| other_types.pick(d) && d.name() == Some(n))
        };
        let backup = if type_taken(name) {
            let backup = name.with_suffix(&self.backup_suffix);
            let used = siblings
                .iter()
                .map(unwrap_export)
                .any(|d| d.name() == Some(&backup));
            if used {
                debug!(name = %name, backup = %backup, "class name and backup both taken");
                return Ok(None);
            }
            Some(backup)
        } else {
            None
        };

        let instance = self.instance_side(scope, &tparams, result, &ld);

        let mut members: Vec<Member> = shape
            .ctors
            .iter()
            .map(|sig| {
                Member::Function(Arc::new(FunctionMember {
                    comments: sig.comments.clone(),
                    level: ProtectionLevel::Default,
                    name: Ident::constructor(),
                    method_type: MethodType::Normal,
                    signature: Arc::new(FunSig {
                        comments: Comments::none(),
                        tparams: Vec::new(),
                        params: sig.params.clone(),
                        result_type: None,
                    }),
                    is_static: false,
                    is_readonly: false,
                }))
            })
            .collect();
        members.extend(instance.members);
        members.extend(shape.statics);

        let class = Decl::Class(Arc::new(ClassDecl {
            comments: v.comments.with_marker(Marker::ExpandedClass),
            declared: v.declared,
            is_abstract: shape.is_abstract,
            name: name.clone(),
            tparams,
            parent: instance.parent,
            implements: instance.implements,
            members,
            js_location: v.js_location.clone(),
            code_path: v.code_path.clone(),
        }));
        debug!(name = %name, backup = ?backup, "extracted class");

        match backup {
            Some(backup) => Ok(Some(class.renamed(backup)?)),
            None => Ok(Some(class)),
        }
    }
}

impl TreeTransformation for ExtractClasses {
    scope_follows_tree!();

    fn new_members(
        &mut self,
        scope: &Scope,
        _container: &Tree,
        members: Vec<Decl>,
    ) -> TransformResult<Vec<Decl>> {
        let mut out = Vec::with_capacity(members.len());
        for decl in &members {
            match self.extract(scope, &members, decl)? {
                Some(class) => out.push(class),
                None => out.push(decl.clone()),
            }
        }
        Ok(out)
    }
}

impl LibraryPass for ExtractClasses {
    fn name(&self) -> &'static str {
        "extract-classes"
    }

    fn run(&mut self, root: &Scope, file: Arc<ParsedFile>) -> TransformResult<Arc<ParsedFile>> {
        run_scoped(self, root, file)
    }
}
