//! Name Lookup
//!
//! Resolves a qualified name to the declarations it denotes. The head of the
//! name is resolved in order:
//!
//! 1. in-scope type parameters and mapped-type keys (abstract, no result)
//! 2. members of the enclosing containers, innermost first, including nested
//!    `declare global` blocks, inline exports and imports
//! 3. ambient modules declared under that name
//! 4. module augmentations in the file
//! 5. the top level of every dependency library
//!
//! When the head resolves to a container and a tail remains, resolution
//! continues inside that container's exports only.

use crate::loop_detector::LoopDetector;
use crate::picker::Picker;
use crate::scope::Scope;
use tracing::warn;
use tsnorm_tree::{Decl, Exportee, Ident, QIdent, Tree};

impl Scope {
    /// Every declaration `qname` denotes, with the scope it was found in.
    ///
    /// On a pedantic root an empty result is reported unless
    /// `skip_validation` is set.
    pub fn lookup(&self, qname: &QIdent, skip_validation: bool) -> Vec<(Decl, Scope)> {
        let found = self.lookup_with(&Picker::All, qname, &LoopDetector::new());
        if found.is_empty() && !skip_validation && self.is_pedantic() && !self.is_abstract(qname)
        {
            warn!(lib = %self.lib(), name = %qname, scope = ?self, "unresolved reference");
        }
        found
    }

    pub fn lookup_type(&self, qname: &QIdent, ld: &LoopDetector) -> Vec<(Decl, Scope)> {
        self.lookup_with(&Picker::Types, qname, ld)
    }

    pub fn lookup_vars(&self, qname: &QIdent, ld: &LoopDetector) -> Vec<(Decl, Scope)> {
        self.lookup_with(&Picker::Vars, qname, ld)
    }

    /// Lookup restricted to declarations accepted by `picker`, continuing the
    /// loop detection path `ld`.
    pub fn lookup_with(
        &self,
        picker: &Picker,
        qname: &QIdent,
        ld: &LoopDetector,
    ) -> Vec<(Decl, Scope)> {
        if qname.is_empty() || qname.is_primitive() || self.is_abstract(qname) {
            return Vec::new();
        }
        let Some(head) = qname.head() else {
            return Vec::new();
        };
        let tail = qname.tail();
        let Some(ld) = ld.including_name(self, qname) else {
            return Vec::new();
        };

        for frame in self.frames() {
            if frame.current().and_then(Tree::as_container).is_none() {
                continue;
            }
            let found = frame.resolve_tail(frame.find_member(head, &ld), picker, tail, &ld);
            if !found.is_empty() {
                return found;
            }
        }

        let mut found = Vec::new();
        for (module, owner) in self.module_scopes(head) {
            found.extend(owner.resolve_tail(vec![(module, owner.clone())], picker, tail, &ld));
        }
        if !found.is_empty() {
            return found;
        }

        for (augmented, owner) in self.augmented_modules() {
            let inner = owner.enter(augmented);
            found.extend(inner.resolve_tail(inner.find_member(head, &ld), picker, tail, &ld));
        }
        if !found.is_empty() {
            return found;
        }

        let deps: Vec<Ident> = self.deps().names().cloned().collect();
        for lib in deps {
            if let Some(dep) = self.dependency_scope(&lib) {
                found.extend(dep.resolve_tail(dep.find_member(head, &ld), picker, tail, &ld));
            }
        }
        found
    }

    /// Declarations named `head` in this frame's container.
    fn find_member(&self, head: &Ident, ld: &LoopDetector) -> Vec<(Decl, Scope)> {
        let mut out = Vec::new();
        if let Some(container) = self.current().and_then(Tree::as_container) {
            self.find_in_members(container.members(), head, ld, &mut out);
        }
        out
    }

    fn find_in_members(
        &self,
        members: &[Decl],
        head: &Ident,
        ld: &LoopDetector,
        out: &mut Vec<(Decl, Scope)>,
    ) {
        for member in members {
            match member {
                Decl::Global(global) => {
                    let inner = self.enter(member.clone());
                    inner.find_in_members(&global.members, head, ld, out);
                }
                Decl::Export(export) => {
                    if let Exportee::Tree(inner) = &export.exportee
                        && !matches!(inner, Decl::Module(_) | Decl::AugmentedModule(_))
                        && inner.name() == Some(head)
                    {
                        out.push((inner.clone(), self.clone()));
                    }
                }
                Decl::Import(_) => out.extend(self.imported_named(member, head, ld)),
                Decl::Module(_) | Decl::AugmentedModule(_) | Decl::ExportAsNamespace(_) => {}
                named => {
                    if named.name() == Some(head) {
                        out.push((named.clone(), self.clone()));
                    }
                }
            }
        }
    }

    /// Continue resolution of `tail` inside each found container. The final
    /// segment is filtered by `picker`.
    fn resolve_tail(
        &self,
        found: Vec<(Decl, Scope)>,
        picker: &Picker,
        tail: &[Ident],
        ld: &LoopDetector,
    ) -> Vec<(Decl, Scope)> {
        let Some((next, rest)) = tail.split_first() else {
            return found.into_iter().filter(|(d, _)| picker.pick(d)).collect();
        };
        let mut out = Vec::new();
        for (decl, owner) in found {
            if decl.as_container().is_some() {
                let inner = owner.enter(decl);
                let hits = inner.exported_named(next, ld);
                out.extend(inner.resolve_tail(hits, picker, rest, ld));
            } else if rest.is_empty() && matches!(decl, Decl::Enum(_)) && picker.pick(&decl) {
                // `E.Member` denotes the enum.
                out.push((decl, owner));
            }
        }
        out
    }

    /// Ambient modules named `name` with the scope that owns them: the
    /// current file, the dependencies' files, and dependency libraries that
    /// carry that name.
    pub fn module_scopes(&self, name: &Ident) -> Vec<(Decl, Scope)> {
        let mut out = Vec::new();

        let mut collect = |owner: &Scope| {
            if let Some(container) = owner.current().and_then(Tree::as_container) {
                for member in container.members() {
                    if let Decl::Module(m) = member
                        && &m.name == name
                    {
                        out.push((member.clone(), owner.clone()));
                    }
                }
            }
        };

        if let Some(file_scope) = self.file_scope() {
            collect(file_scope);
        }
        let deps: Vec<Ident> = self.deps().names().cloned().collect();
        for lib in &deps {
            if let Some(dep) = self.dependency_scope(lib) {
                collect(&dep);
            }
        }

        if let Some(module) = self.deps().library_module(name)
            && let Some(root) = self.dependency_root(name)
        {
            out.push((module.clone(), root));
        }
        out
    }

    /// Module augmentations in this file, at the top level or one module
    /// deep, with their owning scopes.
    pub fn augmented_modules(&self) -> Vec<(Decl, Scope)> {
        let mut out = Vec::new();
        let Some(file_scope) = self.file_scope() else {
            return out;
        };
        let Some(file) = self.file() else {
            return out;
        };
        for member in &file.members {
            match member {
                Decl::AugmentedModule(_) => out.push((member.clone(), file_scope.clone())),
                Decl::Module(m) => {
                    let module_scope = file_scope.enter(member.clone());
                    for inner in &m.members {
                        if matches!(inner, Decl::AugmentedModule(_)) {
                            out.push((inner.clone(), module_scope.clone()));
                        }
                    }
                }
                _ => {}
            }
        }
        out
    }
}
