use std::sync::Arc;
use tsnorm_passes::{ExtractInterfaces, LibraryPass, SetCodePath};
use tsnorm_scope::{Dependencies, Scope};
use tsnorm_tree::*;

fn lib() -> Ident {
    Ident::new("mylib")
}

fn root() -> Scope {
    Scope::root(lib(), false, Arc::new(Dependencies::empty()), None)
}

fn run(members: Vec<Decl>) -> (Arc<ParsedFile>, Arc<ParsedFile>) {
    let file = ParsedFile::new(lib(), members);
    let out = ExtractInterfaces::default()
        .run(&root(), file.clone())
        .expect("extract interfaces");
    (file, out)
}

fn generic_interface(name: &str, tparams: &[&str], members: Vec<Member>) -> Decl {
    Decl::Interface(Arc::new(InterfaceDecl {
        comments: Comments::none(),
        declared: true,
        name: Ident::new(name),
        tparams: tparams.iter().map(|t| TypeParam::new(*t)).collect(),
        inheritance: Vec::new(),
        members,
        code_path: CodePath::NoPath,
    }))
}

fn property_type<'a>(decl: &'a Decl, name: &str) -> Option<&'a Type> {
    decl.as_class_members()?
        .class_members()
        .iter()
        .find_map(|m| match m {
            Member::Property(p) if p.name.as_str() == name => p.tpe.as_ref(),
            _ => None,
        })
}

fn options() -> Type {
    Type::object(vec![Member::property("a", Type::string())])
}

#[test]
fn test_inline_object_in_property_is_extracted() {
    let (_, out) = run(vec![Decl::interface(
        "I",
        vec![Member::property("opts", options())],
    )]);

    assert_eq!(out.members.len(), 2);
    assert_eq!(property_type(&out.members[0], "opts"), Some(&Type::named("AnonA")));
    let Decl::Interface(extracted) = &out.members[1] else {
        panic!("expected an interface, got {:?}", out.members[1]);
    };
    assert_eq!(extracted.name.as_str(), "AnonA");
    assert_eq!(extracted.members, vec![Member::property("a", Type::string())]);
    assert!(extracted.tparams.is_empty());
}

#[test]
fn test_identical_literals_share_one_interface() {
    let (_, out) = run(vec![
        Decl::interface("I", vec![Member::property("opts", options())]),
        Decl::interface("J", vec![Member::property("config", options())]),
    ]);

    assert_eq!(out.members.len(), 3);
    assert_eq!(property_type(&out.members[0], "opts"), Some(&Type::named("AnonA")));
    assert_eq!(property_type(&out.members[1], "config"), Some(&Type::named("AnonA")));
}

#[test]
fn test_extraction_is_deterministic() {
    let members = vec![
        Decl::interface("I", vec![Member::property("opts", options())]),
        Decl::function(
            "f",
            FunSig::new(
                vec![FunParam::new(
                    "o",
                    Type::object(vec![Member::property("b", Type::number())]),
                )],
                Some(Type::object(vec![Member::property("c", Type::boolean())])),
            ),
        ),
    ];
    let (_, first) = run(members.clone());
    let (_, second) = run(members);
    assert_eq!(first, second);

    let names: Vec<&str> = first.members.iter().filter_map(|d| d.name()).map(Ident::as_str).collect();
    assert_eq!(names, vec!["I", "f", "AnonA", "AnonB", "AnonC"]);
}

#[test]
fn test_name_hint_is_preferred() {
    let hinted = Type::Object(Arc::new(ObjectType {
        comments: Comments::marker(Marker::NameHint("Options".to_string())),
        members: vec![Member::property("a", Type::string())],
    }));
    let (_, out) = run(vec![Decl::var("config", hinted)]);

    assert_eq!(out.members[1].name().map(Ident::as_str), Some("Options"));
    let Decl::Var(var) = &out.members[0] else {
        panic!("expected a variable");
    };
    assert_eq!(var.tpe, Some(Type::named("Options")));
}

#[test]
fn test_conflicting_name_gets_next_candidate() {
    let (_, out) = run(vec![
        Decl::interface("AnonA", Vec::new()),
        Decl::interface("I", vec![Member::property("opts", options())]),
    ]);
    assert_eq!(property_type(&out.members[1], "opts"), Some(&Type::named("AnonA1")));
    assert_eq!(out.members[2].name().map(Ident::as_str), Some("AnonA1"));
}

#[test]
fn test_interface_is_generic_over_referenced_tparams() {
    let (_, out) = run(vec![generic_interface(
        "Box",
        &["T", "U"],
        vec![Member::property(
            "value",
            Type::object(vec![Member::property("item", Type::named("T"))]),
        )],
    )]);

    assert_eq!(
        property_type(&out.members[0], "value"),
        Some(&Type::reference(QIdent::of("AnonItem"), vec![Type::named("T")]))
    );
    let Decl::Interface(extracted) = &out.members[1] else {
        panic!("expected an interface");
    };
    let tparams: Vec<&str> = extracted.tparams.iter().map(|tp| tp.name.as_str()).collect();
    assert_eq!(tparams, vec!["T"]);
}

#[test]
fn test_alias_body_and_dictionaries_stay_inline() {
    let (file, out) = run(vec![
        Decl::type_alias("Opts", options()),
        Decl::interface(
            "Lookup",
            vec![Member::property(
                "entries",
                Type::object(vec![Member::dict("key", Type::string(), Type::number())]),
            )],
        ),
    ]);
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_nested_literals_are_extracted_bottom_up() {
    let nested = Type::object(vec![Member::property("inner", options())]);
    let (_, out) = run(vec![Decl::interface("I", vec![Member::property("outer", nested)])]);

    assert_eq!(out.members.len(), 3);
    assert_eq!(out.members[1].name().map(Ident::as_str), Some("AnonA"));
    assert_eq!(out.members[2].name().map(Ident::as_str), Some("AnonInner"));
    assert_eq!(property_type(&out.members[2], "inner"), Some(&Type::named("AnonA")));
}

#[test]
fn test_second_run_is_identity() {
    let (_, once) = run(vec![Decl::interface(
        "I",
        vec![Member::property("opts", options())],
    )]);
    let twice = ExtractInterfaces::default()
        .run(&root(), once.clone())
        .expect("second run");
    assert!(Arc::ptr_eq(&once, &twice));
}

#[test]
fn test_extracted_interface_gets_top_level_code_path() {
    let file = ParsedFile::new(
        lib(),
        vec![Decl::namespace(
            "N",
            vec![Decl::interface("I", vec![Member::property("opts", options())])],
        )],
    );
    let file = SetCodePath::new(lib()).run(&root(), file).expect("code paths");
    let out = ExtractInterfaces::default()
        .run(&root(), file)
        .expect("extract interfaces");

    assert_eq!(
        out.members[1].code_path(),
        Some(&CodePath::HasPath {
            lib: lib(),
            path: QIdent::of("AnonA"),
        })
    );
}

#[test]
fn test_interface_using_local_names_gets_namespace_code_path() {
    let local = Type::object(vec![Member::property("a", Type::named("Foo"))]);
    let file = ParsedFile::new(
        lib(),
        vec![Decl::namespace(
            "N",
            vec![
                Decl::interface("Foo", Vec::new()),
                Decl::interface("I", vec![Member::property("opts", local)]),
            ],
        )],
    );
    let file = SetCodePath::new(lib()).run(&root(), file).expect("code paths");
    let out = ExtractInterfaces::default()
        .run(&root(), file)
        .expect("extract interfaces");

    assert_eq!(out.members.len(), 1);
    let Decl::Namespace(ns) = &out.members[0] else {
        panic!("expected a namespace, got {:?}", out.members[0]);
    };
    assert_eq!(
        ns.members[2].code_path(),
        Some(&CodePath::HasPath {
            lib: lib(),
            path: QIdent::parse("N.AnonA"),
        })
    );
}

#[test]
fn test_interface_stays_next_to_the_names_it_mentions() {
    let local = Type::object(vec![Member::property("a", Type::named("Foo"))]);
    let ns = Decl::namespace(
        "N",
        vec![
            Decl::interface("Foo", vec![Member::property("inner", Type::string())]),
            Decl::interface("I", vec![Member::property("opts", local)]),
        ],
    );
    let (_, out) = run(vec![
        Decl::interface("Foo", vec![Member::property("outer", Type::number())]),
        ns,
    ]);

    let top: Vec<&str> = out.members.iter().filter_map(|d| d.name()).map(Ident::as_str).collect();
    assert_eq!(top, vec!["Foo", "N"]);

    let Decl::Namespace(ns) = &out.members[1] else {
        panic!("expected a namespace, got {:?}", out.members[1]);
    };
    let inner: Vec<&str> = ns.members.iter().filter_map(|d| d.name()).map(Ident::as_str).collect();
    assert_eq!(inner, vec!["Foo", "I", "AnonA"]);
    assert_eq!(property_type(&ns.members[1], "opts"), Some(&Type::named("AnonA")));
    assert_eq!(property_type(&ns.members[2], "a"), Some(&Type::named("Foo")));

    // `Foo` seen from the new interface is still the namespace's own.
    let file_scope = Scope::for_file(&out, lib(), false, Arc::new(Dependencies::empty()), None);
    let extracted = file_scope
        .enter(out.members[1].clone())
        .enter(ns.members[2].clone());
    let found = extracted.lookup(&QIdent::of("Foo"), false);
    assert_eq!(found.len(), 1);
    assert_eq!(property_type(&found[0].0, "inner"), Some(&Type::string()));
}

#[test]
fn test_identical_literals_in_sibling_namespaces_share_one_interface() {
    let (_, out) = run(vec![
        Decl::namespace(
            "N",
            vec![Decl::interface("I", vec![Member::property("opts", options())])],
        ),
        Decl::namespace(
            "M",
            vec![Decl::interface("J", vec![Member::property("opts", options())])],
        ),
    ]);

    let top: Vec<&str> = out.members.iter().filter_map(|d| d.name()).map(Ident::as_str).collect();
    assert_eq!(top, vec!["N", "M", "AnonA"]);
}

#[test]
fn test_literal_built_on_a_local_interface_stays_with_it() {
    // `{ inner: { a: Foo } }` inside N: the inner literal needs N's Foo, so
    // the outer one, which refers to it, cannot move out of N either.
    let nested = Type::object(vec![Member::property(
        "inner",
        Type::object(vec![Member::property("a", Type::named("Foo"))]),
    )]);
    let (_, out) = run(vec![Decl::namespace(
        "N",
        vec![
            Decl::interface("Foo", Vec::new()),
            Decl::interface("I", vec![Member::property("outer", nested)]),
        ],
    )]);

    assert_eq!(out.members.len(), 1);
    let container = out.members[0].as_container().expect("namespace");
    let names: Vec<&str> = container
        .members()
        .iter()
        .filter_map(|d| d.name())
        .map(Ident::as_str)
        .collect();
    assert_eq!(names, vec!["Foo", "I", "AnonA", "AnonInner"]);
}
