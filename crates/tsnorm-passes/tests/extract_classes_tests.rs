use std::sync::Arc;
use tsnorm_passes::{ExtractClasses, LibraryPass, SetCodePath};
use tsnorm_scope::{Dependencies, Scope};
use tsnorm_transform::TransformError;
use tsnorm_tree::*;

fn lib() -> Ident {
    Ident::new("mylib")
}

fn root() -> Scope {
    Scope::root(lib(), false, Arc::new(Dependencies::empty()), None)
}

fn run(members: Vec<Decl>) -> (Arc<ParsedFile>, Arc<ParsedFile>) {
    let file = ParsedFile::new(lib(), members);
    let out = ExtractClasses::default()
        .run(&root(), file.clone())
        .expect("extract classes");
    (file, out)
}

fn ctor(params: Vec<Arc<FunParam>>, result: &str) -> Member {
    Member::ctor(FunSig::new(params, Some(Type::named(result))))
}

fn class_of(decl: &Decl) -> &ClassDecl {
    match decl {
        Decl::Class(c) => c,
        other => panic!("expected a class, got {other:?}"),
    }
}

fn member_names(class: &ClassDecl) -> Vec<&str> {
    class
        .members
        .iter()
        .filter_map(|m| m.name())
        .map(Ident::as_str)
        .collect()
}

#[test]
fn test_ctor_typed_var_becomes_class() {
    let var = Decl::var(
        "X",
        Type::object(vec![ctor(vec![FunParam::new("a", Type::string())], "X")]),
    );
    let (_, out) = run(vec![var]);

    assert_eq!(out.members.len(), 1);
    let class = class_of(&out.members[0]);
    assert_eq!(class.name.as_str(), "X");
    assert!(class.comments.has_marker(&Marker::ExpandedClass));
    assert_eq!(class.parent, None);
    assert_eq!(class.members.len(), 1);
    assert!(class.members[0].is_class_ctor());
    let Member::Function(ctor) = &class.members[0] else {
        panic!("expected a constructor");
    };
    assert_eq!(ctor.signature.params, vec![FunParam::new("a", Type::string())]);
    assert_eq!(ctor.signature.result_type, None);
}

#[test]
fn test_interface_name_collision_uses_backup_name() {
    let iface = Decl::interface(
        "Foo",
        vec![Member::method("bar", FunSig::new(Vec::new(), Some(Type::void())))],
    );
    let var = Decl::var(
        "Foo",
        Type::object(vec![
            ctor(Vec::new(), "Foo"),
            Member::property("version", Type::string()),
            Member::property("prototype", Type::named("Foo")),
        ]),
    );
    let file = ParsedFile::new(lib(), vec![iface, var]);
    let file = SetCodePath::new(lib()).run(&root(), file).expect("code paths");
    let out = ExtractClasses::default()
        .run(&root(), file)
        .expect("extract classes");

    let class = class_of(&out.members[1]);
    assert_eq!(class.name.as_str(), "FooCls");
    assert_eq!(
        class.code_path,
        CodePath::HasPath {
            lib: lib(),
            path: QIdent::of("FooCls"),
        }
    );
    assert_eq!(class.implements, vec![Type::named("Foo")]);
    assert_eq!(member_names(class), vec!["constructor", "bar", "version"]);
    assert!(class.members[2].is_static());
    assert!(!class.members[1].is_static());
}

#[test]
fn test_existing_class_is_left_alone() {
    let (file, out) = run(vec![
        Decl::class("X", None, Vec::new()),
        Decl::var("X", Type::object(vec![ctor(Vec::new(), "X")])),
    ]);
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_taken_backup_name_keeps_the_variable() {
    let (file, out) = run(vec![
        Decl::interface("Foo", Vec::new()),
        Decl::interface("FooCls", Vec::new()),
        Decl::var("Foo", Type::object(vec![ctor(Vec::new(), "Foo")])),
    ]);
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_callable_constructor_is_not_a_class() {
    let (file, out) = run(vec![Decl::var(
        "X",
        Type::object(vec![
            ctor(Vec::new(), "X"),
            Member::call(FunSig::new(Vec::new(), Some(Type::string()))),
        ]),
    )]);
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_constructor_type_extends_class_result() {
    let (_, out) = run(vec![
        Decl::class("Base", None, Vec::new()),
        Decl::var(
            "Widget",
            Type::constructor(FunSig::new(Vec::new(), Some(Type::named("Base")))),
        ),
    ]);
    let class = class_of(&out.members[1]);
    assert_eq!(class.name.as_str(), "Widget");
    assert_eq!(class.parent, Some(Type::named("Base")));
}

#[test]
fn test_constructor_interface_reference() {
    let ctor_iface = Decl::interface(
        "DateConstructor",
        vec![ctor(vec![FunParam::new("value", Type::number())], "Date")],
    );
    let (_, out) = run(vec![
        Decl::interface("Date", vec![Member::property("time", Type::number())]),
        ctor_iface,
        Decl::var("Date", Type::named("DateConstructor")),
    ]);
    let class = class_of(&out.members[2]);
    assert_eq!(class.name.as_str(), "DateCls");
    assert_eq!(member_names(class), vec!["constructor", "time"]);
}

#[test]
fn test_shared_ctor_tparams_move_to_class() {
    let sig = Arc::new(FunSig {
        comments: Comments::none(),
        tparams: vec![TypeParam::new("T")],
        params: vec![FunParam::new("value", Type::named("T"))],
        result_type: Some(Type::object(vec![Member::property("value", Type::named("T"))])),
    });
    let (_, out) = run(vec![Decl::var("Holder", Type::object(vec![Member::ctor(sig)]))]);

    let class = class_of(&out.members[0]);
    let tparams: Vec<&str> = class.tparams.iter().map(|tp| tp.name.as_str()).collect();
    assert_eq!(tparams, vec!["T"]);
    assert_eq!(member_names(class), vec!["constructor", "value"]);
    let Member::Function(ctor) = &class.members[0] else {
        panic!("expected a constructor");
    };
    assert!(ctor.signature.tparams.is_empty());
}

#[test]
fn test_exported_variable_stays_exported() {
    let var = Decl::var("X", Type::object(vec![ctor(Vec::new(), "X")]));
    let (_, out) = run(vec![Decl::export_decl(var)]);

    let Decl::Export(export) = &out.members[0] else {
        panic!("expected an export");
    };
    let Exportee::Tree(inner) = &export.exportee else {
        panic!("expected an exported declaration");
    };
    assert_eq!(class_of(inner).name.as_str(), "X");
}

#[test]
fn test_renaming_the_call_target_is_fatal() {
    let file = ParsedFile::new(
        lib(),
        vec![
            Decl::interface(Ident::apply(), Vec::new()),
            Decl::var(Ident::apply(), Type::object(vec![ctor(Vec::new(), "Foo")])),
        ],
    );
    let err = ExtractClasses::default()
        .run(&root(), file)
        .expect_err("renaming ^ must fail");
    assert!(matches!(
        err,
        TransformError::Invariant(InvariantViolation::RenameCallTarget { .. })
    ));
}
