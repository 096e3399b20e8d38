//! Reading fixture files and directories.
//!
//! Every file gets its own processor run. A directory load never aborts on a
//! broken file: per-file failures are collected into [`LoadReport::errors`]
//! and the remaining files are still processed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Component, Path, PathBuf};

use crate::config::LoadOptions;
use crate::container::TestData;
use crate::error::LoadError;
use crate::processor::Processor;
use crate::strategy::{InferStrategy, LeafStrategy, WrapStrategy};
use crate::types::FieldType;

/// Outcome of a directory load.
///
/// Keys are `/`-separated paths relative to the loaded directory, without
/// the fixture extension (`users/admin` for `users/admin.json`).
#[derive(Debug)]
pub struct LoadReport<T> {
    pub data: BTreeMap<String, T>,
    pub errors: BTreeMap<String, LoadError>,
}

impl<T> LoadReport<T> {
    /// True when every file processed without error.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

impl<T> Default for LoadReport<T> {
    fn default() -> Self {
        Self {
            data: BTreeMap::new(),
            errors: BTreeMap::new(),
        }
    }
}

/// Read one fixture file and run `strategy` over it.
pub fn process_file<S: LeafStrategy>(
    path: &Path,
    options: &LoadOptions,
    strategy: S,
) -> Result<S::Output, LoadError> {
    let text = read_fixture(path)?;
    Processor::new(options.process.clone())
        .process(&text, strategy)
        .map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Test name → container for one file.
pub fn load_file(
    path: &Path,
    options: &LoadOptions,
) -> Result<BTreeMap<String, TestData>, LoadError> {
    process_file(path, options, WrapStrategy::new())
}

/// Field name → inferred type for one file.
pub fn infer_file(
    path: &Path,
    options: &LoadOptions,
) -> Result<BTreeMap<String, FieldType>, LoadError> {
    process_file(path, options, InferStrategy::new())
}

/// Run `per_file` over every fixture under `dir`, collecting results and
/// per-file errors.
///
/// Fails as a whole only when `dir` is missing or cannot be listed.
pub fn load_dir<T, F>(
    dir: &Path,
    options: &LoadOptions,
    mut per_file: F,
) -> Result<LoadReport<T>, LoadError>
where
    F: FnMut(&Path, &LoadOptions) -> Result<T, LoadError>,
{
    let files = fixture_files(dir, options)?;
    tracing::debug!(dir = %dir.display(), files = files.len(), "loading fixture directory");

    let mut report = LoadReport::default();
    for path in files {
        let key = relative_key(dir, &path);
        match per_file(&path, options) {
            Ok(value) => {
                report.data.insert(key, value);
            }
            Err(err) => {
                tracing::warn!(file = %key, error = %err, "fixture failed to load");
                report.errors.insert(key, err);
            }
        }
    }
    Ok(report)
}

/// [`load_file`] over every fixture under `dir`.
pub fn wrap_dir(
    dir: &Path,
    options: &LoadOptions,
) -> Result<LoadReport<BTreeMap<String, TestData>>, LoadError> {
    load_dir(dir, options, load_file)
}

/// [`infer_file`] over every fixture under `dir`.
pub fn infer_dir(
    dir: &Path,
    options: &LoadOptions,
) -> Result<LoadReport<BTreeMap<String, FieldType>>, LoadError> {
    load_dir(dir, options, infer_file)
}

/// Fixture files under `dir`, sorted by path.
///
/// Symlinked files are included; symlinked directories are not descended
/// into.
pub fn fixture_files(dir: &Path, options: &LoadOptions) -> Result<Vec<PathBuf>, LoadError> {
    if !dir.is_dir() {
        return Err(LoadError::DirectoryNotFound(dir.to_path_buf()));
    }
    let mut files = Vec::new();
    collect_files(dir, options, &mut files)?;
    files.sort();
    Ok(files)
}

fn collect_files(
    dir: &Path,
    options: &LoadOptions,
    files: &mut Vec<PathBuf>,
) -> Result<(), LoadError> {
    let entries = fs::read_dir(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    for entry in entries {
        let io_error = |source| LoadError::Io {
            path: dir.to_path_buf(),
            source,
        };
        let entry = entry.map_err(io_error)?;
        let file_type = entry.file_type().map_err(io_error)?;
        let path = entry.path();
        if file_type.is_dir() {
            if options.recursive {
                collect_files(&path, options, files)?;
            }
        } else if file_type.is_symlink() && path.is_dir() {
            tracing::debug!(path = %path.display(), "not following directory symlink");
        } else if path.extension().and_then(|ext| ext.to_str()) == Some(options.extension.as_str())
        {
            files.push(path);
        }
    }
    Ok(())
}

fn read_fixture(path: &Path) -> Result<String, LoadError> {
    if !path.is_file() {
        return Err(LoadError::FileNotFound(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// `users/admin` for `<dir>/users/admin.json`.
fn relative_key(dir: &Path, path: &Path) -> String {
    let relative = path.strip_prefix(dir).unwrap_or(path).with_extension("");
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
