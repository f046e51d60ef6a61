use std::sync::Arc;
use tsnorm_passes::{ForwardCtors, Hoisting, LibraryPass, NormalizeFunctions, SetCodePath};
use tsnorm_scope::{Dependencies, Scope};
use tsnorm_tree::*;

fn lib() -> Ident {
    Ident::new("mylib")
}

fn root() -> Scope {
    Scope::root(lib(), false, Arc::new(Dependencies::empty()), None)
}

fn run(pass: &mut dyn LibraryPass, members: Vec<Decl>) -> (Arc<ParsedFile>, Arc<ParsedFile>) {
    let file = ParsedFile::new(lib(), members);
    let out = pass.run(&root(), file.clone()).expect("pass");
    (file, out)
}

fn sig(params: Vec<Arc<FunParam>>, result: Type) -> Arc<FunSig> {
    FunSig::new(params, Some(result))
}

fn names(members: &[Decl]) -> Vec<&str> {
    members
        .iter()
        .filter_map(|d| d.name())
        .map(Ident::as_str)
        .collect()
}

fn class_members(decl: &Decl) -> &[Member] {
    decl.as_class_members()
        .map(|c| c.class_members())
        .unwrap_or_default()
}

// =============================================================================
// normalize-functions
// =============================================================================

#[test]
fn test_single_call_object_becomes_function_type() {
    let call = sig(vec![FunParam::new("a", Type::string())], Type::void());
    let (_, out) = run(
        &mut NormalizeFunctions,
        vec![Decl::type_alias("F", Type::object(vec![Member::call(call.clone())]))],
    );
    let Decl::TypeAlias(alias) = &out.members[0] else {
        panic!("expected an alias");
    };
    assert_eq!(alias.alias, Type::Function(call));
}

#[test]
fn test_function_property_becomes_method() {
    let call = sig(Vec::new(), Type::void());
    let (_, out) = run(
        &mut NormalizeFunctions,
        vec![Decl::interface(
            "I",
            vec![Member::property("cb", Type::object(vec![Member::call(call.clone())]))],
        )],
    );
    let members = class_members(&out.members[0]);
    assert_eq!(members, &[Member::method("cb", call)]);
}

#[test]
fn test_overloaded_callable_property_expands_with_first_comment() {
    let documented = Member::Property(Arc::new(PropertyMember {
        comments: Comments::raw("/** handler */"),
        level: ProtectionLevel::Default,
        name: Ident::new("on"),
        tpe: Some(Type::object(vec![
            Member::call(sig(vec![FunParam::new("a", Type::string())], Type::void())),
            Member::call(sig(vec![FunParam::new("a", Type::number())], Type::void())),
        ])),
        expr: None,
        is_static: false,
        is_readonly: false,
    }));
    let (_, out) = run(
        &mut NormalizeFunctions,
        vec![Decl::interface("Emitter", vec![documented])],
    );

    let members = class_members(&out.members[0]);
    assert_eq!(members.len(), 2);
    let texts: Vec<Vec<&str>> = members
        .iter()
        .map(|m| m.comments().raw_texts().collect())
        .collect();
    assert_eq!(texts, vec![vec!["/** handler */"], vec![]]);
    assert!(
        members
            .iter()
            .all(|m| m.comments().has_marker(&Marker::ExpandedCallables))
    );
}

#[test]
fn test_optional_function_property_is_untouched() {
    let optional = make_optional(Type::Function(sig(Vec::new(), Type::void())));
    let (file, out) = run(
        &mut NormalizeFunctions,
        vec![Decl::interface("I", vec![Member::property("cb", optional)])],
    );
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_function_typed_variable_becomes_function() {
    let call = sig(Vec::new(), Type::string());
    let file = ParsedFile::new(lib(), vec![Decl::var("f", Type::Function(call.clone()))]);
    let file = SetCodePath::new(lib()).run(&root(), file).expect("code paths");
    let out = NormalizeFunctions.run(&root(), file).expect("normalize");

    let Decl::Function(f) = &out.members[0] else {
        panic!("expected a function");
    };
    assert_eq!(f.signature, call);
    assert_eq!(
        f.code_path,
        CodePath::HasPath {
            lib: lib(),
            path: QIdent::of("f"),
        }
    );
}

// =============================================================================
// forward-ctors
// =============================================================================

fn ctor_member(params: Vec<Arc<FunParam>>) -> Member {
    Member::Function(Arc::new(FunctionMember {
        comments: Comments::none(),
        level: ProtectionLevel::Default,
        name: Ident::constructor(),
        method_type: MethodType::Normal,
        signature: FunSig::new(params, None),
        is_static: false,
        is_readonly: false,
    }))
}

fn generic_class(name: &str, tparams: &[&str], parent: Option<Type>, members: Vec<Member>) -> Decl {
    Decl::Class(Arc::new(ClassDecl {
        comments: Comments::none(),
        declared: true,
        is_abstract: false,
        name: Ident::new(name),
        tparams: tparams.iter().map(|t| TypeParam::new(*t)).collect(),
        parent,
        implements: Vec::new(),
        members,
        js_location: JsLocation::Zero,
        code_path: CodePath::NoPath,
    }))
}

#[test]
fn test_ctors_are_forwarded_with_type_arguments() {
    let base = generic_class(
        "A",
        &["T"],
        None,
        vec![ctor_member(vec![FunParam::new("x", Type::named("T"))])],
    );
    let derived = Decl::class(
        "B",
        Some(Type::reference(QIdent::of("A"), vec![Type::string()])),
        vec![Member::property("extra", Type::number())],
    );
    let (_, out) = run(&mut ForwardCtors, vec![base, derived]);

    let members = class_members(&out.members[1]);
    assert_eq!(members.len(), 2);
    assert_eq!(members[0], ctor_member(vec![FunParam::new("x", Type::string())]));
    assert_eq!(members[1], Member::property("extra", Type::number()));
}

#[test]
fn test_ctors_are_forwarded_through_intermediate_classes() {
    let a = generic_class(
        "A",
        &["T"],
        None,
        vec![ctor_member(vec![FunParam::new("x", Type::named("T"))])],
    );
    let b = generic_class(
        "B",
        &["U"],
        Some(Type::reference(QIdent::of("A"), vec![Type::named("U")])),
        Vec::new(),
    );
    let c = Decl::class(
        "C",
        Some(Type::reference(QIdent::of("B"), vec![Type::boolean()])),
        Vec::new(),
    );
    let (_, out) = run(&mut ForwardCtors, vec![a, b, c]);

    assert_eq!(
        class_members(&out.members[1]),
        &[ctor_member(vec![FunParam::new("x", Type::named("U"))])]
    );
    assert_eq!(
        class_members(&out.members[2]),
        &[ctor_member(vec![FunParam::new("x", Type::boolean())])]
    );
}

#[test]
fn test_class_with_own_ctor_is_identical() {
    let (file, out) = run(
        &mut ForwardCtors,
        vec![
            Decl::class("A", None, vec![ctor_member(vec![FunParam::new("x", Type::string())])]),
            Decl::class("B", Some(Type::named("A")), vec![ctor_member(Vec::new())]),
        ],
    );
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_cyclic_inheritance_terminates() {
    let (file, out) = run(
        &mut ForwardCtors,
        vec![
            Decl::class("A", Some(Type::named("B")), Vec::new()),
            Decl::class("B", Some(Type::named("A")), Vec::new()),
        ],
    );
    assert!(Arc::ptr_eq(&file, &out));
}

// =============================================================================
// hoisting
// =============================================================================

fn export_equals_module() -> Decl {
    let target = Decl::Var(Arc::new(VarDecl {
        comments: Comments::none(),
        declared: true,
        readonly: true,
        name: Ident::new("lib"),
        tpe: Some(Type::object(vec![
            Member::call(sig(vec![FunParam::new("a", Type::string())], Type::void())),
            Member::property("version", Type::string()),
            Member::method("parse", sig(vec![FunParam::new("s", Type::string())], Type::any())),
            Member::Function(Arc::new(FunctionMember {
                comments: Comments::none(),
                level: ProtectionLevel::Default,
                name: Ident::new("size"),
                method_type: MethodType::Getter,
                signature: FunSig::new(Vec::new(), Some(Type::number())),
                is_static: false,
                is_readonly: false,
            })),
        ])),
        expr: None,
        js_location: JsLocation::Global(QIdent::of("lib")),
        code_path: CodePath::NoPath,
    }));
    Decl::module("m", vec![target, Decl::export_equals("lib")])
}

#[test]
fn test_export_equals_members_are_hoisted() {
    let file = ParsedFile::new(lib(), vec![export_equals_module()]);
    let file = SetCodePath::new(lib()).run(&root(), file).expect("code paths");
    let out = Hoisting.run(&root(), file).expect("hoisting");

    let Decl::Module(module) = &out.members[0] else {
        panic!("expected a module");
    };
    assert_eq!(names(&module.members), vec!["lib", "^", "version", "parse"]);
    assert!(matches!(module.members[4], Decl::Export(_)));

    assert_eq!(
        module.members[1].code_path(),
        Some(&CodePath::HasPath {
            lib: lib(),
            path: QIdent::new(vec![Ident::new("m"), Ident::apply()]),
        })
    );
    assert_eq!(
        module.members[1].js_location(),
        Some(&JsLocation::Global(QIdent::of("lib")))
    );
    assert_eq!(
        module.members[2].js_location(),
        Some(&JsLocation::Global(QIdent::parse("lib.version")))
    );
}

#[test]
fn test_hoisting_twice_is_identity() {
    let (_, once) = run(&mut Hoisting, vec![export_equals_module()]);
    let twice = Hoisting.run(&root(), once.clone()).expect("hoisting");
    assert!(Arc::ptr_eq(&once, &twice));
}

#[test]
fn test_existing_names_are_not_hoisted() {
    let module = match export_equals_module() {
        Decl::Module(m) => {
            let mut members = m.members.clone();
            members.push(Decl::var("version", Type::number()));
            Decl::Module(Arc::new(ModuleDecl {
                members,
                ..(*m).clone()
            }))
        }
        other => other,
    };
    let (_, out) = run(&mut Hoisting, vec![module]);
    let Decl::Module(module) = &out.members[0] else {
        panic!("expected a module");
    };
    assert_eq!(names(&module.members), vec!["lib", "^", "parse", "version"]);
}

#[test]
fn test_no_export_equals_is_identity() {
    let (file, out) = run(
        &mut Hoisting,
        vec![Decl::var(
            "lib",
            Type::object(vec![Member::property("version", Type::string())]),
        )],
    );
    assert!(Arc::ptr_eq(&file, &out));
}

#[test]
fn test_hoisting_without_code_path_is_fatal() {
    let file = ParsedFile::new(lib(), vec![export_equals_module()]);
    let file = Arc::new(ParsedFile {
        code_path: CodePath::NoPath,
        ..(*file).clone()
    });
    let err = Hoisting.run(&root(), file).expect_err("relocation needs a path");
    assert!(matches!(
        err,
        tsnorm_transform::TransformError::Invariant(
            InvariantViolation::RelocateWithoutCodePath { .. }
        )
    ));
}
