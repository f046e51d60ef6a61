use std::io::Write;
use tsnorm::{CompilerOptions, PASS_ORDER, TypeSubstitution};
use tsnorm_tree::Type;

#[test]
fn test_empty_object_gives_defaults() {
    let options = CompilerOptions::from_json_str("{}").expect("options");
    assert_eq!(options, CompilerOptions::default());
    assert!(!options.pedantic);
    assert!(options.enable_scope_cache);
    assert_eq!(options.anonymous_interface_prefix, "Anon");
    assert_eq!(options.class_backup_suffix, "Cls");
    assert!(options.type_substitutions.is_empty());
    assert!(PASS_ORDER.iter().all(|p| options.is_enabled(p)));
}

#[test]
fn test_camel_case_keys() {
    let options = CompilerOptions::from_json_str(
        r#"{
            "pedantic": true,
            "enableScopeCache": false,
            "anonymousInterfacePrefix": "Inline",
            "classBackupSuffix": "Class",
            "typeSubstitutions": [{ "from": "Promise", "to": "js.Promise" }],
            "disabledPasses": ["hoisting", "forward-ctors"]
        }"#,
    )
    .expect("options");

    assert!(options.pedantic);
    assert!(!options.enable_scope_cache);
    assert_eq!(options.anonymous_interface_prefix, "Inline");
    assert_eq!(options.class_backup_suffix, "Class");
    assert_eq!(
        options.type_substitutions,
        vec![TypeSubstitution {
            from: "Promise".to_string(),
            to: "js.Promise".to_string(),
        }]
    );
    assert!(!options.is_enabled("hoisting"));
    assert!(!options.is_enabled("forward-ctors"));
    assert!(options.is_enabled("extract-classes"));
}

#[test]
fn test_substitution_map_uses_dotted_names() {
    let options = CompilerOptions::from_json_str(
        r#"{ "typeSubstitutions": [{ "from": "ns.Old", "to": "New" }] }"#,
    )
    .expect("options");
    let map = options.substitution_map();
    assert_eq!(map.len(), 1);
    assert_eq!(map.get(&Type::named("ns.Old")), Some(&Type::named("New")));
}

#[test]
fn test_unknown_pass_is_rejected() {
    let err = CompilerOptions::from_json_str(r#"{ "disabledPasses": ["inline-everything"] }"#)
        .expect_err("unknown pass");
    assert!(err.to_string().contains("inline-everything"), "{err}");
}

#[test]
fn test_invalid_prefix_and_substitution_are_rejected() {
    assert!(CompilerOptions::from_json_str(r#"{ "anonymousInterfacePrefix": "1x" }"#).is_err());
    assert!(CompilerOptions::from_json_str(r#"{ "classBackupSuffix": "" }"#).is_err());
    let empty_segment = r#"{ "typeSubstitutions": [{ "from": "a..b", "to": "c" }] }"#;
    assert!(CompilerOptions::from_json_str(empty_segment).is_err());
}

#[test]
fn test_malformed_json_is_an_error() {
    assert!(CompilerOptions::from_json_str("{ pedantic: true").is_err());
    assert!(CompilerOptions::from_json_str(r#"{ "pedantic": "yes" }"#).is_err());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{ "pedantic": true, "disabledPasses": ["hoisting"] }}"#).expect("write");

    let options = CompilerOptions::load(file.path()).expect("load");
    assert!(options.pedantic);
    assert!(!options.is_enabled("hoisting"));
}

#[test]
fn test_load_errors_name_the_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let missing = dir.path().join("tsnorm.json");
    let err = CompilerOptions::load(&missing).expect_err("missing file");
    assert!(format!("{err:#}").contains("tsnorm.json"), "{err:#}");

    let invalid = dir.path().join("invalid.json");
    std::fs::write(&invalid, r#"{ "disabledPasses": ["nope"] }"#).expect("write");
    let err = CompilerOptions::load(&invalid).expect_err("invalid options");
    let message = format!("{err:#}");
    assert!(message.contains("invalid.json"), "{message}");
    assert!(message.contains("nope"), "{message}");
}
