use indexmap::IndexMap;
use std::sync::Arc;
use tsnorm_scope::*;
use tsnorm_tree::*;

fn scope_for(members: Vec<Decl>) -> Scope {
    scope_with_deps(members, Vec::new())
}

fn scope_with_deps(members: Vec<Decl>, deps: Vec<(&str, Vec<Decl>)>) -> Scope {
    scope_with_cache(members, deps, None)
}

fn scope_with_cache(
    members: Vec<Decl>,
    deps: Vec<(&str, Vec<Decl>)>,
    cache: Option<&Arc<ScopeCache>>,
) -> Scope {
    let deps: IndexMap<Ident, Arc<ParsedFile>> = deps
        .into_iter()
        .map(|(name, members)| (Ident::new(name), ParsedFile::new(Ident::new(name), members)))
        .collect();
    let file = ParsedFile::new(Ident::new("mylib"), members);
    Scope::for_file(
        &file,
        Ident::new("mylib"),
        false,
        Arc::new(Dependencies::new(deps)),
        cache,
    )
}

fn iface_with(name: &str, prop: &str) -> Decl {
    Decl::interface(name, vec![Member::property(prop, Type::string())])
}

fn prop_names(decl: &Decl) -> Vec<String> {
    decl.as_class_members()
        .map(|c| {
            c.class_members()
                .iter()
                .filter_map(|m| m.name().map(ToString::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[test]
fn test_lookup_qualified_name_through_namespace() {
    let scope = scope_for(vec![Decl::namespace("N", vec![iface_with("I", "a")])]);
    let found = scope.lookup(&QIdent::parse("N.I"), false);
    assert_eq!(found.len(), 1);
    assert!(matches!(found[0].0, Decl::Interface(_)));
    assert!(scope.lookup(&QIdent::parse("N.Missing"), true).is_empty());
}

#[test]
fn test_innermost_container_wins() {
    let inner = iface_with("Foo", "inner");
    let ns = Decl::namespace("N", vec![inner]);
    let scope = scope_for(vec![iface_with("Foo", "outer"), ns.clone()]);

    let from_file = scope.lookup(&QIdent::of("Foo"), false);
    assert_eq!(prop_names(&from_file[0].0), vec!["outer"]);

    let from_ns = scope.enter(ns).lookup(&QIdent::of("Foo"), false);
    assert_eq!(from_ns.len(), 1);
    assert_eq!(prop_names(&from_ns[0].0), vec!["inner"]);
}

#[test]
fn test_primitives_never_resolve() {
    let scope = scope_for(vec![Decl::interface("string", Vec::new())]);
    assert!(scope.lookup(&QIdent::of("string"), false).is_empty());
}

#[test]
fn test_type_parameters_are_abstract() {
    let iface = Decl::Interface(Arc::new(InterfaceDecl {
        comments: Comments::none(),
        declared: true,
        name: Ident::new("Box"),
        tparams: vec![TypeParam::new("T")],
        inheritance: Vec::new(),
        members: Vec::new(),
        code_path: CodePath::NoPath,
    }));
    let scope = scope_for(vec![iface.clone(), iface_with("T", "shadowed")]);
    let inside = scope.enter(iface);

    assert!(inside.is_abstract(&QIdent::of("T")));
    assert!(!inside.is_abstract(&QIdent::parse("T.x")));
    assert!(!scope.is_abstract(&QIdent::of("T")));
    assert!(inside.lookup(&QIdent::of("T"), false).is_empty());
    assert_eq!(scope.lookup(&QIdent::of("T"), false).len(), 1);
}

#[test]
fn test_enter_never_changes_parent() {
    let ns = Decl::namespace("N", Vec::new());
    let scope = scope_for(vec![ns.clone()]);
    let before = scope.stack().count();
    let inner = scope.enter(ns);
    assert_eq!(scope.stack().count(), before);
    assert_eq!(inner.stack().count(), before + 1);
    assert_ne!(inner.id(), scope.id());
}

#[test]
fn test_destructured_import_from_dependency() {
    let scope = scope_with_deps(
        vec![Decl::import(
            vec![Imported::Destructured(vec![(
                Ident::new("Component"),
                Some(Ident::new("C")),
            )])],
            Importee::From(Ident::new("react")),
        )],
        vec![("react", vec![iface_with("Component", "props")])],
    );
    let found = scope.lookup(&QIdent::of("C"), false);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].0.name(), Some(&Ident::new("Component")));
    assert_eq!(found[0].1.lib(), &Ident::new("react"));
}

#[test]
fn test_default_import_of_export_equals_namespace() {
    let module = Decl::module(
        "m",
        vec![
            Decl::namespace("NS", vec![iface_with("Inner", "x")]),
            Decl::export_equals("NS"),
        ],
    );
    let scope = scope_with_deps(
        vec![Decl::import(
            vec![Imported::Ident(Ident::new("x"))],
            Importee::From(Ident::new("m")),
        )],
        vec![("mdep", vec![module])],
    );

    let found = scope.lookup(&QIdent::of("x"), false);
    assert!(found.iter().any(|(d, _)| matches!(d, Decl::Namespace(_))));

    let inner = scope.lookup(&QIdent::parse("x.Inner"), false);
    assert_eq!(inner.len(), 1);
    assert!(matches!(inner[0].0, Decl::Interface(_)));
}

#[test]
fn test_require_import_binds_module() {
    let scope = scope_with_deps(
        vec![Decl::import(
            vec![Imported::Ident(Ident::new("lib"))],
            Importee::Required(Ident::new("dep")),
        )],
        vec![("dep", vec![iface_with("Thing", "a")])],
    );
    let found = scope.lookup(&QIdent::parse("lib.Thing"), false);
    assert_eq!(found.len(), 1);
}

#[test]
fn test_mutually_reexporting_libraries_terminate() {
    let scope = scope_with_deps(
        vec![Decl::import(
            vec![Imported::Destructured(vec![(Ident::new("Foo"), None)])],
            Importee::From(Ident::new("a")),
        )],
        vec![
            ("a", vec![Decl::module("a", vec![Decl::export_star("b")])]),
            ("b", vec![Decl::module("b", vec![Decl::export_star("a")])]),
        ],
    );
    assert!(scope.lookup(&QIdent::of("Foo"), false).is_empty());
}

#[test]
fn test_reexport_chain_resolves() {
    let scope = scope_with_deps(
        vec![Decl::import(
            vec![Imported::Destructured(vec![(Ident::new("Foo"), None)])],
            Importee::From(Ident::new("a")),
        )],
        vec![
            ("a", vec![Decl::module("a", vec![Decl::export_star("b")])]),
            (
                "b",
                vec![Decl::module(
                    "b",
                    vec![
                        Decl::export_star("a"),
                        Decl::export_decl(iface_with("Foo", "found")),
                    ],
                )],
            ),
        ],
    );
    let found = scope.lookup(&QIdent::of("Foo"), false);
    assert!(!found.is_empty());
    assert_eq!(prop_names(&found[0].0), vec!["found"]);
}

#[test]
fn test_dependency_globals_are_visible() {
    let scope = scope_with_deps(Vec::new(), vec![("std", vec![iface_with("Array", "length")])]);
    let found = scope.lookup(&QIdent::of("Array"), false);
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].1.lib(), &Ident::new("std"));
}

#[test]
fn test_global_block_members_are_visible() {
    let global = Decl::Global(Arc::new(GlobalDecl {
        comments: Comments::none(),
        declared: true,
        members: vec![iface_with("Window", "document")],
        code_path: CodePath::NoPath,
    }));
    let scope = scope_for(vec![global]);
    assert_eq!(scope.lookup(&QIdent::of("Window"), false).len(), 1);
}

#[test]
fn test_augmented_module_members_are_visible() {
    let augmented = Decl::AugmentedModule(Arc::new(AugmentedModuleDecl {
        comments: Comments::none(),
        name: Ident::new("vue"),
        members: vec![iface_with("ComponentOptions", "router")],
        code_path: CodePath::NoPath,
        js_location: JsLocation::Zero,
    }));
    let scope = scope_for(vec![augmented]);
    assert_eq!(scope.augmented_modules().len(), 1);
    assert_eq!(scope.lookup(&QIdent::of("ComponentOptions"), false).len(), 1);
}

#[test]
fn test_pickers() {
    let var = Decl::var("X", Type::any());
    let class = Decl::class("X", None, Vec::new());
    let scope = scope_for(vec![var.clone(), class.clone()]);
    let ld = LoopDetector::new();

    assert_eq!(scope.lookup_with(&Picker::All, &QIdent::of("X"), &ld).len(), 2);
    assert_eq!(scope.lookup_vars(&QIdent::of("X"), &ld).len(), 1);
    assert_eq!(scope.lookup_type(&QIdent::of("X"), &ld).len(), 1);

    let but_not = Picker::All.but_not(vec![var.clone()]);
    let found = scope.lookup_with(&but_not, &QIdent::of("X"), &ld);
    assert_eq!(found.len(), 1);
    assert!(matches!(found[0].0, Decl::Class(_)));
}

#[test]
fn test_but_not_requires_difference_from_every_exclusion() {
    let a = Decl::var("a", Type::any());
    let b = Decl::var("b", Type::any());
    let picker = Picker::All.but_not(vec![a.clone(), b.clone()]);
    assert!(!picker.pick(&a));
    assert!(!picker.pick(&b));
    assert!(picker.pick(&Decl::var("c", Type::any())));
}

#[test]
fn test_loop_detector_rejects_revisits() {
    let scope = scope_for(Vec::new());
    let ld = LoopDetector::new();
    let once = ld.including_name(&scope, &QIdent::of("A")).expect("first visit");
    assert_eq!(once.depth(), 1);
    assert!(once.including_name(&scope, &QIdent::of("A")).is_none());
    assert!(once.including_name(&scope, &QIdent::of("B")).is_some());
    // Sibling branches do not see each other.
    assert!(ld.including_name(&scope, &QIdent::of("A")).is_some());
}

#[test]
fn test_cache_is_filled_and_consistent() {
    let deps: IndexMap<Ident, Arc<ParsedFile>> = [(
        Ident::new("react"),
        ParsedFile::new(Ident::new("react"), vec![iface_with("Component", "props")]),
    )]
    .into_iter()
    .collect();
    let file = ParsedFile::new(
        Ident::new("mylib"),
        vec![Decl::import(
            vec![Imported::Star(Some(Ident::new("React")))],
            Importee::From(Ident::new("react")),
        )],
    );
    let cache = Arc::new(ScopeCache::new());
    let scope = Scope::for_file(
        &file,
        Ident::new("mylib"),
        false,
        Arc::new(Dependencies::new(deps)),
        Some(&cache),
    );

    let first = scope.lookup(&QIdent::parse("React.Component"), false);
    assert!(!cache.is_empty());
    let second = scope.lookup(&QIdent::parse("React.Component"), false);
    assert_eq!(first.len(), 1);
    assert_eq!(
        first.iter().map(|(d, _)| d.clone()).collect::<Vec<_>>(),
        second.iter().map(|(d, _)| d.clone()).collect::<Vec<_>>()
    );
}

fn star_cycle() -> Vec<(&'static str, Vec<Decl>)> {
    vec![
        ("a", vec![iface_with("AThing", "a"), Decl::export_star("b")]),
        ("b", vec![iface_with("BThing", "b"), Decl::export_star("c")]),
        ("c", vec![iface_with("CThing", "c"), Decl::export_star("a")]),
    ]
}

#[test]
fn test_cache_does_not_keep_results_cut_by_a_cycle() {
    let queries = ["c.BThing", "a.CThing", "b.AThing", "c.AThing", "a.BThing"];
    let uncached = scope_with_deps(Vec::new(), star_cycle());
    let expected: Vec<usize> = queries
        .iter()
        .map(|q| uncached.lookup(&QIdent::parse(q), false).len())
        .collect();
    assert_eq!(expected, vec![1; queries.len()]);

    let cache = Arc::new(ScopeCache::new());
    let cached = scope_with_cache(Vec::new(), star_cycle(), Some(&cache));
    // Walks a -> b -> c -> a, cutting the last step.
    assert!(cached.lookup(&QIdent::parse("a.Missing"), true).is_empty());

    let actual: Vec<usize> = queries
        .iter()
        .map(|q| cached.lookup(&QIdent::parse(q), false).len())
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn test_cache_hit_still_stops_a_cycle() {
    let cache = Arc::new(ScopeCache::new());
    let scope = scope_with_cache(
        vec![Decl::import(
            vec![Imported::Destructured(vec![(Ident::new("Foo"), None)])],
            Importee::From(Ident::new("a")),
        )],
        vec![
            ("a", vec![Decl::module("a", vec![Decl::export_star("b")])]),
            ("b", vec![Decl::module("b", vec![Decl::export_star("a")])]),
        ],
        Some(&cache),
    );
    assert!(scope.lookup(&QIdent::of("Foo"), false).is_empty());
    assert!(scope.lookup(&QIdent::of("Foo"), false).is_empty());
}
