//! Import and export expansion.
//!
//! An import or export declaration is expanded into the [`Binding`]s it
//! introduces: each local (or exported) name paired with every declaration it
//! stands for and the scope that declaration lives in.

use crate::loop_detector::LoopDetector;
use crate::picker::Picker;
use crate::scope::Scope;
use tracing::trace;
use tsnorm_tree::{Decl, ExportKind, Exportee, Ident, Importee, Imported, Tree};

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: Ident,
    pub decl: Decl,
    pub scope: Scope,
}

impl Binding {
    fn new(name: Ident, decl: Decl, scope: Scope) -> Self {
        Binding { name, decl, scope }
    }

    fn renamed(self, name: Ident) -> Self {
        Binding { name, ..self }
    }
}

impl Scope {
    /// Bindings introduced by the import declaration `decl`, evaluated in this
    /// scope.
    pub fn expand_import(&self, decl: &Decl, ld: &LoopDetector) -> Vec<Binding> {
        if !matches!(decl, Decl::Import(_)) {
            return Vec::new();
        }
        // Checked before the cache so a hit cannot bypass a cycle.
        let Some(ld) = ld.including_node(self, decl.node_id()) else {
            return Vec::new();
        };
        let key = (self.id(), decl.node_id());
        match self.cache() {
            Some(cache) => cache.imports(key, &Tree::Decl(decl.clone()), &ld, || {
                self.expand_import_uncached(decl, &ld)
            }),
            None => self.expand_import_uncached(decl, &ld),
        }
    }

    /// `ld` already includes `decl`.
    fn expand_import_uncached(&self, decl: &Decl, ld: &LoopDetector) -> Vec<Binding> {
        let Decl::Import(import) = decl else {
            return Vec::new();
        };

        let mut out = Vec::new();
        match &import.from {
            Importee::Local(target) => {
                for imported in &import.imported {
                    if let Imported::Ident(name) = imported {
                        for (d, s) in self.lookup_with(&Picker::All, target, ld) {
                            out.push(Binding::new(name.clone(), d, s));
                        }
                    }
                }
            }
            Importee::Required(module) | Importee::From(module) => {
                let required = matches!(import.from, Importee::Required(_));
                let modules = self.module_scopes(module);
                for imported in &import.imported {
                    match imported {
                        // `import x = require("m")` binds the module itself.
                        Imported::Ident(name) if required => {
                            for (m, owner) in &modules {
                                out.push(Binding::new(name.clone(), m.clone(), owner.clone()));
                            }
                        }
                        Imported::Ident(name) => {
                            let default = Ident::default_export();
                            for (m, owner) in &modules {
                                let inner = owner.enter(m.clone());
                                out.extend(
                                    inner
                                        .exported_bindings(ld)
                                        .into_iter()
                                        .filter(|b| b.name == default)
                                        .map(|b| b.renamed(name.clone())),
                                );
                            }
                        }
                        Imported::Star(Some(name)) => {
                            for (m, owner) in &modules {
                                out.push(Binding::new(name.clone(), m.clone(), owner.clone()));
                            }
                        }
                        Imported::Star(None) => {}
                        Imported::Destructured(pairs) => {
                            for (m, owner) in &modules {
                                let exported = owner.enter(m.clone()).exported_bindings(ld);
                                for (original, alias) in pairs {
                                    let local = alias.as_ref().unwrap_or(original);
                                    out.extend(
                                        exported
                                            .iter()
                                            .filter(|b| &b.name == original)
                                            .cloned()
                                            .map(|b| b.renamed(local.clone())),
                                    );
                                }
                            }
                        }
                    }
                }
            }
        }
        trace!(scope = ?self, bindings = out.len(), "expanded import");
        out
    }

    /// Bindings made visible to importers by the export declaration `decl`.
    pub fn expand_export(&self, decl: &Decl, ld: &LoopDetector) -> Vec<Binding> {
        if !matches!(decl, Decl::Export(_)) {
            return Vec::new();
        }
        let Some(ld) = ld.including_node(self, decl.node_id()) else {
            return Vec::new();
        };
        let key = (self.id(), decl.node_id());
        match self.cache() {
            Some(cache) => cache.exports(key, &Tree::Decl(decl.clone()), &ld, || {
                self.expand_export_uncached(decl, &ld)
            }),
            None => self.expand_export_uncached(decl, &ld),
        }
    }

    fn expand_export_uncached(&self, decl: &Decl, ld: &LoopDetector) -> Vec<Binding> {
        let Decl::Export(export) = decl else {
            return Vec::new();
        };

        let mut out = Vec::new();
        match &export.exportee {
            Exportee::Tree(inner) => {
                let name = match export.kind {
                    ExportKind::Defaulted => Some(Ident::default_export()),
                    _ => inner.name().cloned(),
                };
                if let Some(name) = name {
                    out.push(Binding::new(name, inner.clone(), self.clone()));
                }
            }
            Exportee::Names { names, from: None } => {
                for (qname, alias) in names {
                    let found = self.lookup_with(&Picker::All, qname, ld);
                    match export.kind {
                        // `export = x`: x is the module's default, and a
                        // namespace x lends the module its members.
                        ExportKind::Namespaced => {
                            for (d, s) in found {
                                if d.as_container().is_some() {
                                    out.extend(s.enter(d.clone()).exported_bindings(ld));
                                }
                                out.push(Binding::new(Ident::default_export(), d, s));
                            }
                        }
                        ExportKind::Defaulted => {
                            out.extend(
                                found.into_iter().map(|(d, s)| {
                                    Binding::new(Ident::default_export(), d, s)
                                }),
                            );
                        }
                        ExportKind::Named => {
                            let Some(name) = alias.as_ref().or(qname.last()) else {
                                continue;
                            };
                            out.extend(
                                found
                                    .into_iter()
                                    .map(|(d, s)| Binding::new(name.clone(), d, s)),
                            );
                        }
                    }
                }
            }
            Exportee::Names {
                names,
                from: Some(module),
            } => {
                for (m, owner) in self.module_scopes(module) {
                    let exported = owner.enter(m).exported_bindings(ld);
                    for (qname, alias) in names {
                        let Some(original) = qname.last() else {
                            continue;
                        };
                        let public = alias.as_ref().unwrap_or(original);
                        out.extend(
                            exported
                                .iter()
                                .filter(|b| &b.name == original)
                                .cloned()
                                .map(|b| b.renamed(public.clone())),
                        );
                    }
                }
            }
            Exportee::Star {
                alias: Some(alias),
                from,
            } => {
                for (m, owner) in self.module_scopes(from) {
                    out.push(Binding::new(alias.clone(), m, owner));
                }
            }
            Exportee::Star { alias: None, from } => {
                let default = Ident::default_export();
                for (m, owner) in self.module_scopes(from) {
                    out.extend(
                        owner
                            .enter(m)
                            .exported_bindings(ld)
                            .into_iter()
                            .filter(|b| b.name != default),
                    );
                }
            }
        }
        trace!(scope = ?self, bindings = out.len(), "expanded export");
        out
    }

    /// Every name this container makes visible from the outside: its named
    /// members plus whatever its export declarations expand to.
    ///
    /// Ambient modules and namespaces expose all their members, exported or
    /// not, the way declaration files are consumed in practice.
    pub fn exported_bindings(&self, ld: &LoopDetector) -> Vec<Binding> {
        let Some(container) = self.current().and_then(Tree::as_container) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for member in container.members() {
            match member {
                Decl::Export(_) => out.extend(self.expand_export(member, ld)),
                Decl::Import(_)
                | Decl::Global(_)
                | Decl::ExportAsNamespace(_)
                | Decl::Module(_)
                | Decl::AugmentedModule(_) => {}
                named => {
                    if let Some(name) = named.name() {
                        out.push(Binding::new(name.clone(), named.clone(), self.clone()));
                    }
                }
            }
        }
        out
    }

    /// Exported bindings named `name`, as lookup results.
    pub(crate) fn exported_named(&self, name: &Ident, ld: &LoopDetector) -> Vec<(Decl, Scope)> {
        self.exported_bindings(ld)
            .into_iter()
            .filter(|b| &b.name == name)
            .map(|b| (b.decl, b.scope))
            .collect()
    }

    /// Bindings named `name` that an import in this container introduces.
    pub(crate) fn imported_named(
        &self,
        import: &Decl,
        name: &Ident,
        ld: &LoopDetector,
    ) -> Vec<(Decl, Scope)> {
        self.expand_import(import, ld)
            .into_iter()
            .filter(|b| &b.name == name)
            .map(|b| (b.decl, b.scope))
            .collect()
    }
}

