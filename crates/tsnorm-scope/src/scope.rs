//! Scope Chain
//!
//! A [`Scope`] is a persistent, singly linked chain of frames. The root frame
//! carries the library being compiled, its dependencies and the optional
//! resolution cache. Every other frame records the node that introduced it and
//! inherits the in-scope type parameters and mapped-type keys of its parent.
//!
//! Entering a node allocates one new frame; the parent is never modified, so
//! a scope captured by one pass stays valid while another pass extends it.

use crate::cache::ScopeCache;
use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet, FxHasher};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, Weak};
use tsnorm_tree::{
    CodePath, Comments, Decl, Ident, JsLocation, ModuleDecl, ParsedFile, QIdent, Tree, TypeParam,
};

// =============================================================================
// Dependencies
// =============================================================================

/// Already-compiled libraries visible to the library being compiled, in
/// resolution order.
#[derive(Debug, Default)]
pub struct Dependencies {
    files: IndexMap<Ident, Arc<ParsedFile>>,
    /// Each library viewed as a module named after it, so `import x from "lib"`
    /// resolves without an explicit `declare module "lib"` block.
    modules: IndexMap<Ident, Decl>,
}

impl Dependencies {
    pub fn new(files: IndexMap<Ident, Arc<ParsedFile>>) -> Self {
        let modules = files
            .iter()
            .map(|(name, file)| {
                let module = Decl::Module(Arc::new(ModuleDecl {
                    comments: Comments::none(),
                    declared: true,
                    name: name.clone(),
                    members: file.members.clone(),
                    code_path: file.code_path.clone(),
                    js_location: JsLocation::Module {
                        module: name.clone(),
                        path: Vec::new(),
                    },
                }));
                (name.clone(), module)
            })
            .collect();
        Dependencies { files, modules }
    }

    pub fn empty() -> Self {
        Dependencies::default()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn file(&self, lib: &Ident) -> Option<&Arc<ParsedFile>> {
        self.files.get(lib)
    }

    pub fn names(&self) -> impl Iterator<Item = &Ident> {
        self.files.keys()
    }

    pub(crate) fn library_module(&self, lib: &Ident) -> Option<&Decl> {
        self.modules.get(lib)
    }
}

// =============================================================================
// Root
// =============================================================================

/// State shared by every frame of one library's scope chain.
pub struct RootScope {
    pub lib: Ident,
    pub pedantic: bool,
    pub deps: Arc<Dependencies>,
    /// Held weakly: cached bindings contain scopes, and scopes point back here.
    /// The owner of the pass keeps the strong reference alive.
    cache: Option<Weak<ScopeCache>>,
}

impl RootScope {
    pub fn cache(&self) -> Option<Arc<ScopeCache>> {
        self.cache.as_ref().and_then(Weak::upgrade)
    }
}

// =============================================================================
// Scope
// =============================================================================

struct Frame {
    root: Arc<RootScope>,
    parent: Option<Scope>,
    current: Option<Tree>,
    tparams: Arc<FxHashMap<Ident, Arc<TypeParam>>>,
    tkeys: Arc<FxHashSet<Ident>>,
    id: u64,
}

#[derive(Clone)]
pub struct Scope(Arc<Frame>);

fn root_id(lib: &Ident) -> u64 {
    let mut hasher = FxHasher::default();
    lib.hash(&mut hasher);
    hasher.finish()
}

fn frame_id(parent: u64, node: usize) -> u64 {
    let mut hasher = FxHasher::default();
    parent.hash(&mut hasher);
    node.hash(&mut hasher);
    hasher.finish()
}

impl Scope {
    /// A fresh root for `lib`. Pass the cache that should memoize resolution
    /// for this root; the caller keeps it alive.
    pub fn root(
        lib: Ident,
        pedantic: bool,
        deps: Arc<Dependencies>,
        cache: Option<&Arc<ScopeCache>>,
    ) -> Scope {
        let id = root_id(&lib);
        Scope(Arc::new(Frame {
            root: Arc::new(RootScope {
                lib,
                pedantic,
                deps,
                cache: cache.map(Arc::downgrade),
            }),
            parent: None,
            current: None,
            tparams: Arc::default(),
            tkeys: Arc::default(),
            id,
        }))
    }

    /// Root scope entered into `file`.
    pub fn for_file(
        file: &Arc<ParsedFile>,
        lib: Ident,
        pedantic: bool,
        deps: Arc<Dependencies>,
        cache: Option<&Arc<ScopeCache>>,
    ) -> Scope {
        Scope::root(lib, pedantic, deps, cache).enter(Tree::File(file.clone()))
    }

    /// Extend the chain with `tree`, picking up the type parameters and
    /// mapped-type key it introduces.
    pub fn enter(&self, tree: impl Into<Tree>) -> Scope {
        let tree = tree.into();

        let introduced = tree.tparams();
        let tparams = if introduced.is_empty() {
            self.0.tparams.clone()
        } else {
            let mut map = (*self.0.tparams).clone();
            for tp in introduced {
                map.insert(tp.name.clone(), tp.clone());
            }
            Arc::new(map)
        };

        let tkeys = match tree.type_key() {
            Some(key) => {
                let mut set = (*self.0.tkeys).clone();
                set.insert(key.clone());
                Arc::new(set)
            }
            None => self.0.tkeys.clone(),
        };

        Scope(Arc::new(Frame {
            root: self.0.root.clone(),
            id: frame_id(self.0.id, tree.node_id()),
            parent: Some(self.clone()),
            current: Some(tree),
            tparams,
            tkeys,
        }))
    }

    /// Identity of this frame, derived from the chain of entered nodes.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn root_state(&self) -> &RootScope {
        &self.0.root
    }

    pub fn lib(&self) -> &Ident {
        &self.0.root.lib
    }

    pub fn is_pedantic(&self) -> bool {
        self.0.root.pedantic
    }

    pub fn deps(&self) -> &Arc<Dependencies> {
        &self.0.root.deps
    }

    pub fn cache(&self) -> Option<Arc<ScopeCache>> {
        self.0.root.cache()
    }

    pub fn is_root(&self) -> bool {
        self.0.parent.is_none()
    }

    pub fn parent(&self) -> Option<&Scope> {
        self.0.parent.as_ref()
    }

    /// The node that introduced this frame. `None` for the root.
    pub fn current(&self) -> Option<&Tree> {
        self.0.current.as_ref()
    }

    /// This frame and its ancestors, innermost first.
    pub fn frames(&self) -> impl Iterator<Item = &Scope> {
        std::iter::successors(Some(self), |s| s.parent())
    }

    /// Entered nodes, innermost first.
    pub fn stack(&self) -> impl Iterator<Item = &Tree> {
        self.frames().filter_map(Scope::current)
    }

    pub fn tparam(&self, name: &Ident) -> Option<&Arc<TypeParam>> {
        self.0.tparams.get(name)
    }

    /// Whether `qname` names an in-scope type parameter or mapped-type key.
    /// Only single-segment names can be abstract.
    pub fn is_abstract(&self, qname: &QIdent) -> bool {
        match qname.single() {
            Some(name) => self.0.tparams.contains_key(name) || self.0.tkeys.contains(name),
            None => false,
        }
    }

    /// The frame entered into the parsed file.
    pub fn file_scope(&self) -> Option<&Scope> {
        self.frames()
            .find(|s| matches!(s.current(), Some(Tree::File(_))))
    }

    pub fn file(&self) -> Option<&Arc<ParsedFile>> {
        self.file_scope().and_then(|s| match s.current() {
            Some(Tree::File(f)) => Some(f),
            _ => None,
        })
    }

    /// Code path of the innermost frame that has one.
    pub fn code_path(&self) -> CodePath {
        self.stack()
            .find_map(|t| t.code_path().filter(|cp| cp.has_path()).cloned())
            .unwrap_or_default()
    }

    /// Whether any entered node satisfies `pred`.
    pub fn within(&self, pred: impl Fn(&Tree) -> bool) -> bool {
        self.stack().any(pred)
    }

    /// Root scope of dependency `lib`, sharing this scope's dependency map and
    /// cache so resolution can continue transitively.
    pub fn dependency_root(&self, lib: &Ident) -> Option<Scope> {
        self.deps().file(lib)?;
        let root = &self.0.root;
        let cache = root.cache();
        Some(Scope::root(
            lib.clone(),
            false,
            root.deps.clone(),
            cache.as_ref(),
        ))
    }

    /// Dependency `lib` entered into its parsed file.
    pub fn dependency_scope(&self, lib: &Ident) -> Option<Scope> {
        let file = self.deps().file(lib)?.clone();
        Some(self.dependency_root(lib)?.enter(Tree::File(file)))
    }
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Scope({}", self.lib())?;
        let names: Vec<String> = self
            .stack()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .filter_map(|t| t.name().map(ToString::to_string))
            .collect();
        for name in names {
            write!(f, " / {name}")?;
        }
        f.write_str(")")
    }
}

#[cfg(test)]
#[path = "tests/frame_id_tests.rs"]
mod frame_id_tests;
