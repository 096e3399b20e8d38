//! End-to-end stub generation over fixture directories.

use std::path::{Path, PathBuf};

use assert_fs::prelude::*;
use json_test_data_codegen::{generate, generate_to_file, StubConfig};
use json_test_data_core::{load_file, ErrorCode, LoadOptions};

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

fn config_for(dir: &str) -> StubConfig {
    StubConfig {
        data_dir: Path::new(FIXTURES_DIR).join(dir),
        ..StubConfig::default()
    }
}

#[test]
fn generates_one_class_per_fixture_file() {
    let generated = generate(&config_for("valid")).unwrap();
    assert!(generated.errors.is_empty());

    let names: Vec<&str> = generated.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["OrdersCheckoutTestData", "UsersTestData"]);

    let contents = &generated.contents;
    assert!(contents.contains("class UsersTestData\n"));
    assert!(contents.contains(" * @method float getUserId()\n"));
    assert!(contents.contains(" * @method bool isActive()\n"));
    assert!(contents.contains(" * @method mixed getLogin()\n"));
    assert!(contents.contains(" * @method array getPermissions()\n"));
    assert!(contents.contains(" * @method string getRole()\n"));
    assert!(contents.contains(" * @method float getTotal()\n"));
}

#[test]
fn broken_fixtures_are_reported_and_skipped() {
    let generated = generate(&config_for("mixed")).unwrap();

    let names: Vec<&str> = generated.classes.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["UsersTestData"]);

    let failed: Vec<&str> = generated.errors.keys().map(String::as_str).collect();
    assert_eq!(failed, vec!["bad_field", "duplicate", "syntax"]);
    assert_eq!(
        generated.errors["duplicate"]
            .parse_error()
            .map(|e| e.error_code()),
        Some(ErrorCode::DuplicateName)
    );
}

#[test]
fn writes_stub_file_into_new_directory() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("data/profile.json")
        .write_str(r#"[{"_name": "t1", "nick_name": "x", "is_admin": false}]"#)
        .unwrap();

    let config = StubConfig {
        data_dir: temp.child("data").path().to_path_buf(),
        class_suffix: "Data".to_string(),
        namespace: Some("Fixtures".to_string()),
        ..StubConfig::default()
    };
    let output: PathBuf = temp.child("out/helper.stub").path().to_path_buf();
    generate_to_file(&config, &output).unwrap();

    let out = temp.child("out/helper.stub");
    out.assert(predicates::str::contains("namespace Fixtures;\n"));
    out.assert(predicates::str::contains("class ProfileData\n"));
    out.assert(predicates::str::contains(" * @method bool isAdmin()\n"));
    out.assert(predicates::str::contains(" * @method string getNickName()\n"));
}

#[test]
fn every_listed_method_resolves_on_every_test_with_the_field() {
    let temp = assert_fs::TempDir::new().unwrap();
    let fixture = temp.child("data/flags.json");
    fixture
        .write_str(
            r#"[
                {"_name": "a", "flag": true, "active": true, "is_active": false, "a": 1},
                {"_name": "b", "flag": "x", "active": "no", "a_": 2},
                {"_name": "c", "is_active": true, "a": 3.5, "a_": "y"}
            ]"#,
        )
        .unwrap();

    let config = StubConfig {
        data_dir: temp.child("data").path().to_path_buf(),
        ..StubConfig::default()
    };
    let generated = generate(&config).unwrap();
    assert!(generated.contents.contains(" * @method mixed getFlag()\n"));

    let data = load_file(fixture.path(), &LoadOptions::default()).unwrap();
    let class = &generated.classes[0];
    assert!(!class.methods.is_empty());
    for method in &class.methods {
        for (name, test) in &data {
            if let Some(expected) = test.get(&method.field) {
                assert_eq!(
                    test.call(&method.accessor),
                    Ok(expected),
                    "{} on test {name}",
                    method.accessor
                );
            }
        }
    }
}

#[test]
fn missing_data_dir_is_an_error() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = StubConfig {
        data_dir: temp.child("absent").path().to_path_buf(),
        ..StubConfig::default()
    };
    let err = generate(&config).unwrap_err();
    assert!(format!("{err:#}").contains("Directory not found"));
}
