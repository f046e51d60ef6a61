use std::sync::Arc;
use tsnorm_scope::{Dependencies, Scope};
use tsnorm_transform::*;
use tsnorm_tree::*;

fn lib() -> Ident {
    Ident::new("mylib")
}

fn sample_file() -> Arc<ParsedFile> {
    ParsedFile::new(
        lib(),
        vec![
            Decl::interface("Keep", vec![Member::property("a", Type::string())]),
            Decl::namespace(
                "N",
                vec![Decl::var("x", Type::named("Foo"))],
            ),
        ],
    )
}

struct Identity;

impl TreeTransformation for Identity {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}
}

#[test]
fn test_identity_transformation_preserves_identity() {
    let file = sample_file();
    let out = visit_parsed_file(&mut Identity, &(), file.clone()).expect("identity");
    assert!(Arc::ptr_eq(&file, &out));
}

struct RenameFoo;

impl TreeTransformation for RenameFoo {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn leave_type(&mut self, _ctx: &(), x: Type) -> TransformResult<Type> {
        Ok(if x.is_named("Foo") { Type::named("Bar") } else { x })
    }
}

#[test]
fn test_rewrite_rebuilds_only_the_changed_path() {
    let file = sample_file();
    let out = visit_parsed_file(&mut RenameFoo, &(), file.clone()).expect("rename");

    assert!(!Arc::ptr_eq(&file, &out));
    assert!(out.members[0].same_node(&file.members[0]));
    assert!(!out.members[1].same_node(&file.members[1]));

    let Decl::Namespace(ns) = &out.members[1] else {
        panic!("expected namespace");
    };
    let Decl::Var(v) = &ns.members[0] else {
        panic!("expected var");
    };
    assert_eq!(v.tpe, Some(Type::named("Bar")));
}

#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl TreeTransformation for Recorder {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn enter_decl(&mut self, _ctx: &(), x: Decl) -> TransformResult<Decl> {
        self.events.push(format!("enter {}", x.name().map_or("?", Ident::as_str)));
        Ok(x)
    }

    fn leave_decl(&mut self, _ctx: &(), x: Decl) -> TransformResult<Decl> {
        self.events.push(format!("leave {}", x.name().map_or("?", Ident::as_str)));
        Ok(x)
    }

    fn new_members(&mut self, _ctx: &(), container: &Tree, members: Vec<Decl>) -> TransformResult<Vec<Decl>> {
        let name = container.name().map_or("file", Ident::as_str).to_string();
        self.events.push(format!("members {name}"));
        Ok(members)
    }
}

#[test]
fn test_hook_order_is_depth_first() {
    let mut recorder = Recorder::default();
    visit_parsed_file(&mut recorder, &(), sample_file()).expect("record");
    assert_eq!(
        recorder.events,
        vec![
            "enter Keep",
            "leave Keep",
            "enter N",
            "enter x",
            "leave x",
            "members N",
            "leave N",
            "members file",
        ]
    );
}

struct AddMarker;

impl TreeTransformation for AddMarker {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn new_members(&mut self, _ctx: &(), container: &Tree, mut members: Vec<Decl>) -> TransformResult<Vec<Decl>> {
        if matches!(container, Tree::File(_)) {
            members.push(Decl::var("added", Type::any()));
        }
        Ok(members)
    }
}

#[test]
fn test_new_members_reshapes_container() {
    let file = sample_file();
    let out = visit_parsed_file(&mut AddMarker, &(), file.clone()).expect("add");
    assert_eq!(out.members.len(), 3);
    assert!(out.members[1].same_node(&file.members[1]));
}

/// Records, for every reference type, how many namespaces enclose it.
#[derive(Default)]
struct NamespaceDepth {
    seen: Vec<(String, usize)>,
}

impl TreeTransformation for NamespaceDepth {
    tsnorm_transform::scope_follows_tree!();

    fn leave_type(&mut self, scope: &Scope, x: Type) -> TransformResult<Type> {
        if let Type::Ref(r) = &x {
            let depth = scope
                .stack()
                .filter(|t| matches!(t, Tree::Decl(Decl::Namespace(_))))
                .count();
            self.seen.push((r.name.to_string(), depth));
        }
        Ok(x)
    }
}

#[test]
fn test_scope_follows_tree() {
    let root = Scope::root(lib(), false, Arc::new(Dependencies::empty()), None);
    let mut t = NamespaceDepth::default();
    visit_parsed_file(&mut t, &root, sample_file()).expect("walk");
    assert_eq!(
        t.seen,
        vec![("string".to_string(), 0), ("Foo".to_string(), 1)]
    );
}

struct RenameCallTarget;

impl TreeTransformation for RenameCallTarget {
    type Ctx = ();

    fn with_tree(&self, _ctx: &(), _tree: &Tree) {}

    fn leave_decl(&mut self, _ctx: &(), x: Decl) -> TransformResult<Decl> {
        Ok(x.renamed(Ident::new("renamed"))?)
    }
}

#[test]
fn test_invariant_violation_surfaces() {
    let file = ParsedFile::new(
        lib(),
        vec![Decl::function("^", FunSig::new(Vec::new(), None))],
    );
    let err = visit_parsed_file(&mut RenameCallTarget, &(), file).unwrap_err();
    assert!(matches!(
        err,
        TransformError::Invariant(InvariantViolation::RenameCallTarget { .. })
    ));
}
