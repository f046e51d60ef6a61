//! The pass pipeline.
//!
//! One library is compiled by running every enabled pass, in the fixed
//! [`PASS_ORDER`], over its parsed file. Each pass sees a root scope rebuilt
//! over the previous pass's output together with the library's dependencies,
//! and, when enabled, a resolution cache that lives exactly as long as that
//! pass.

use crate::config::CompilerOptions;
use anyhow::{Context, Result};
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, debug_span, info_span};
use tsnorm_passes::{
    ExpandTypeMappings, ExtractClasses, ExtractInterfaces, ForwardCtors, Hoisting,
    KeepFirstOverloadComment, LibraryPass, NormalizeFunctions, PASS_ORDER, SetCodePath,
    SimplifyTypes, TypeRewriter,
};
use tsnorm_scope::{Dependencies, Scope, ScopeCache};
use tsnorm_tree::{Ident, ParsedFile, SameNode};

/// A library ready to be compiled: its parsed file and the already-compiled
/// files of its dependencies, in resolution order.
#[derive(Debug, Clone)]
pub struct LibraryInput {
    pub name: Ident,
    pub file: Arc<ParsedFile>,
    pub deps: IndexMap<Ident, Arc<ParsedFile>>,
}

impl LibraryInput {
    pub fn new(name: impl Into<Ident>, file: Arc<ParsedFile>) -> Self {
        LibraryInput {
            name: name.into(),
            file,
            deps: IndexMap::new(),
        }
    }

    pub fn with_dep(mut self, name: impl Into<Ident>, file: Arc<ParsedFile>) -> Self {
        self.deps.insert(name.into(), file);
        self
    }
}

#[derive(Debug, Clone)]
pub struct CompiledLibrary {
    pub name: Ident,
    pub file: Arc<ParsedFile>,
    /// Passes that ran, in order.
    pub passes: Vec<&'static str>,
    /// Passes whose output differed from their input.
    pub changed_by: Vec<&'static str>,
}

pub struct Pipeline {
    options: CompilerOptions,
}

impl Pipeline {
    pub fn new(options: CompilerOptions) -> Self {
        Pipeline { options }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// The enabled passes for `lib`, in run order.
    pub fn passes_for(&self, lib: &Ident) -> Vec<Box<dyn LibraryPass>> {
        let options = &self.options;
        let mut passes: Vec<Box<dyn LibraryPass>> = Vec::with_capacity(PASS_ORDER.len());
        for &name in PASS_ORDER {
            if !options.is_enabled(name) {
                continue;
            }
            let pass: Box<dyn LibraryPass> = match name {
                "set-code-path" => Box::new(SetCodePath::new(lib.clone())),
                "simplify-types" => Box::new(SimplifyTypes),
                "expand-type-mappings" => Box::new(ExpandTypeMappings),
                "normalize-functions" => Box::new(NormalizeFunctions),
                "extract-classes" => {
                    Box::new(ExtractClasses::new(options.class_backup_suffix.clone()))
                }
                "forward-ctors" => Box::new(ForwardCtors),
                "hoisting" => Box::new(Hoisting),
                "extract-interfaces" => Box::new(ExtractInterfaces::new(
                    options.anonymous_interface_prefix.clone(),
                )),
                "type-rewriter" => {
                    if options.type_substitutions.is_empty() {
                        continue;
                    }
                    Box::new(TypeRewriter::new(options.substitution_map()))
                }
                "keep-first-overload-comment" => Box::new(KeepFirstOverloadComment),
                other => {
                    debug!(pass = other, "no implementation registered");
                    continue;
                }
            };
            passes.push(pass);
        }
        passes
    }

    pub fn compile(&self, input: &LibraryInput) -> Result<CompiledLibrary> {
        let _span = info_span!("compile_library", lib = %input.name).entered();
        let deps = Arc::new(Dependencies::new(input.deps.clone()));

        let mut file = input.file.clone();
        let mut passes = Vec::new();
        let mut changed_by = Vec::new();
        for mut pass in self.passes_for(&input.name) {
            let name = pass.name();
            let _pass_span = debug_span!("pass", name).entered();

            let cache = self
                .options
                .enable_scope_cache
                .then(|| Arc::new(ScopeCache::new()));
            let root = Scope::root(
                input.name.clone(),
                self.options.pedantic,
                deps.clone(),
                cache.as_ref(),
            );
            let out = pass
                .run(&root, file.clone())
                .with_context(|| format!("pass '{}' failed on library '{}'", name, input.name))?;

            let changed = !out.same_node(&file);
            if changed {
                changed_by.push(name);
            }
            debug!(changed, "pass finished");
            passes.push(name);
            file = out;
        }

        Ok(CompiledLibrary {
            name: input.name.clone(),
            file,
            passes,
            changed_by,
        })
    }
}
