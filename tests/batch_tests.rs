use tsnorm::{CompilerOptions, LibraryInput, compile_batch};
use tsnorm_tree::*;

fn ctor_var(name: &str) -> Decl {
    Decl::var(
        name,
        Type::object(vec![Member::ctor(FunSig::new(
            Vec::new(),
            Some(Type::named(name)),
        ))]),
    )
}

fn library(name: &str, members: Vec<Decl>) -> LibraryInput {
    tsnorm::tracing_config::init_tracing();
    LibraryInput::new(name, ParsedFile::new(Ident::new(name), members))
}

#[test]
fn test_results_keep_input_order() {
    let inputs: Vec<LibraryInput> = (0..16)
        .map(|i| library(&format!("lib{i}"), vec![ctor_var(&format!("C{i}"))]))
        .collect();
    let results = compile_batch(&CompilerOptions::default(), &inputs);

    assert_eq!(results.len(), inputs.len());
    for (i, result) in results.iter().enumerate() {
        let compiled = result.as_ref().expect("compile");
        assert_eq!(compiled.name.as_str(), format!("lib{i}"));
        assert!(matches!(
            &compiled.file.members[0],
            Decl::Class(c) if c.name.as_str() == format!("C{i}")
        ));
    }
}

#[test]
fn test_libraries_compile_independently() {
    let opts = Type::object(vec![Member::property("a", Type::string())]);
    let inputs = vec![
        library(
            "one",
            vec![Decl::interface("I", vec![Member::property("opts", opts.clone())])],
        ),
        library(
            "two",
            vec![Decl::interface("J", vec![Member::property("opts", opts)])],
        ),
    ];
    let results = compile_batch(&CompilerOptions::default(), &inputs);

    // Each library starts its own conflict store, so both get the first name.
    for result in &results {
        let compiled = result.as_ref().expect("compile");
        let names: Vec<&str> = compiled
            .file
            .members
            .iter()
            .filter_map(|d| d.name())
            .map(Ident::as_str)
            .collect();
        assert_eq!(names[1], "AnonA");
    }
}

#[test]
fn test_one_failure_does_not_stop_the_batch() {
    // Turning `^` into a class would rename the call target.
    let call_target = Decl::var(
        Ident::apply(),
        Type::object(vec![Member::ctor(FunSig::new(
            Vec::new(),
            Some(Type::named("Foo")),
        ))]),
    );
    let broken = library(
        "broken",
        vec![Decl::interface(Ident::apply(), Vec::new()), call_target],
    );
    let inputs = vec![library("ok", vec![ctor_var("A")]), broken, library("ok2", Vec::new())];
    let results = compile_batch(&CompilerOptions::default(), &inputs);

    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_ok());
}
