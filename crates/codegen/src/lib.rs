//! IDE stub generation for fixture containers.
//!
//! Every fixture file under a data directory becomes one stub class. Its
//! fields are typed by folding all leaves of the file through
//! [`InferStrategy`](json_test_data_core::InferStrategy), and each field is
//! listed as an `@method <type> <accessor>()` line.

pub mod stubs;

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use heck::ToUpperCamelCase;
use json_test_data_core::naming::outranks;
use json_test_data_core::{accessor_name, FieldType, LoadError, LoadOptions};
use serde::{Deserialize, Serialize};

/// Configuration for stub generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct StubConfig {
    /// Directory scanned for fixture files.
    pub data_dir: PathBuf,
    /// Appended to every class name, e.g. `UsersTestData`.
    pub class_suffix: String,
    /// Optional namespace declaration at the top of the stub file.
    pub namespace: Option<String>,
    /// Optional generation timestamp written into the header.
    pub generated_at: Option<String>,
    /// Options for discovering and processing fixture files.
    pub load: LoadOptions,
}

impl Default for StubConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("tests/data"),
            class_suffix: "TestData".to_string(),
            namespace: None,
            generated_at: None,
            load: LoadOptions::default(),
        }
    }
}

impl StubConfig {
    /// Read a config from a JSON file; missing keys take their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))
    }
}

/// One `@method` line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubMethod {
    pub accessor: String,
    pub field: String,
    pub type_name: String,
}

/// One stub class, generated from one fixture file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StubClass {
    pub name: String,
    /// Relative fixture path without extension, e.g. `orders/checkout`.
    pub source: String,
    pub methods: Vec<StubMethod>,
}

/// Result of a generation run.
#[derive(Debug)]
pub struct GeneratedStubs {
    pub contents: String,
    pub classes: Vec<StubClass>,
    /// Fixture files that could not be processed, keyed by relative path.
    pub errors: BTreeMap<String, LoadError>,
}

/// `orders/checkout` + `TestData` → `OrdersCheckoutTestData`.
pub fn class_name(source: &str, suffix: &str) -> String {
    format!("{}{}", source.replace('/', "_").to_upper_camel_case(), suffix)
}

/// Build a stub class from a file's inferred field types.
///
/// Each field is listed once: `isX` when its type is `bool` and it owns that
/// name, `getX` otherwise. Ownership of a shared name follows the same
/// ranking the containers use, with `mixed` fields competing for `isX`
/// because some of their values may be booleans. A field that owns neither
/// name is left out.
pub fn build_class(source: &str, suffix: &str, types: &BTreeMap<String, FieldType>) -> StubClass {
    let getters = claim(
        types
            .keys()
            .map(|field| (accessor_name(field, false), field.as_str())),
    );
    let predicates = claim(
        types
            .iter()
            .filter(|(_, ty)| matches!(ty, FieldType::Bool | FieldType::Mixed))
            .map(|(field, _)| (accessor_name(field, true), field.as_str())),
    );

    let methods = types
        .iter()
        .filter_map(|(field, ty)| {
            let owns = |owners: &BTreeMap<String, &str>, accessor: &String| {
                owners.get(accessor).is_some_and(|owner| *owner == field.as_str())
            };
            let predicate = accessor_name(field, true);
            let getter = accessor_name(field, false);
            let accessor = if ty.is_boolean() && owns(&predicates, &predicate) {
                predicate
            } else if owns(&getters, &getter) {
                getter
            } else {
                tracing::debug!(source, field = %field, "field shadowed by a lookalike key");
                return None;
            };
            Some(StubMethod {
                accessor,
                field: field.clone(),
                type_name: ty.to_string(),
            })
        })
        .collect();

    StubClass {
        name: class_name(source, suffix),
        source: source.to_string(),
        methods,
    }
}

/// Accessor name → owning field, resolving collisions with [`outranks`].
fn claim<'a>(names: impl Iterator<Item = (String, &'a str)>) -> BTreeMap<String, &'a str> {
    let mut owners = BTreeMap::new();
    for (accessor, field) in names {
        match owners.entry(accessor) {
            Entry::Vacant(slot) => {
                slot.insert(field);
            }
            Entry::Occupied(mut slot) => {
                if outranks(slot.key(), field, slot.get()) {
                    slot.insert(field);
                }
            }
        }
    }
    owners
}

/// Scan `config.data_dir`, infer field types per file and render the stubs.
///
/// Broken fixture files are skipped and reported in
/// [`GeneratedStubs::errors`]; only a missing data directory or a template
/// failure aborts the run.
pub fn generate(config: &StubConfig) -> Result<GeneratedStubs> {
    let report = json_test_data_core::infer_dir(&config.data_dir, &config.load)
        .with_context(|| format!("Failed to scan {}", config.data_dir.display()))?;

    let mut classes: Vec<StubClass> = report
        .data
        .iter()
        .map(|(source, types)| build_class(source, &config.class_suffix, types))
        .collect();
    classes.sort_by(|a, b| a.name.cmp(&b.name));
    tracing::debug!(
        classes = classes.len(),
        failed = report.errors.len(),
        "built stub classes"
    );

    let contents = stubs::render(config, &classes)?;
    Ok(GeneratedStubs {
        contents,
        classes,
        errors: report.errors,
    })
}

/// [`generate`] and write the result to `output`.
pub fn generate_to_file(config: &StubConfig, output: &Path) -> Result<GeneratedStubs> {
    let generated = generate(config)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output dir: {}", parent.display()))?;
    }
    fs::write(output, &generated.contents)
        .with_context(|| format!("Failed to write: {}", output.display()))?;
    Ok(generated)
}
