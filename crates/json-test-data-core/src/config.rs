//! Configuration for fixture processing and loading.

use serde::{Deserialize, Serialize};

/// Options for processing a single fixture document.
///
/// Fields are serialized in `kebab-case` (e.g. `max-depth`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ProcessOptions {
    /// Maximum nesting of `_children` groups before the document is rejected.
    /// Guards the recursive descent against stack exhaustion.
    pub max_depth: usize,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self { max_depth: 64 }
    }
}

/// Options for loading fixture files from disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct LoadOptions {
    /// File extension (without the dot) of fixture files. Default: `json`.
    pub extension: String,
    /// Descend into subdirectories. Default: true.
    pub recursive: bool,
    /// Options handed to each per-file processor run.
    pub process: ProcessOptions,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            extension: "json".to_string(),
            recursive: true,
            process: ProcessOptions::default(),
        }
    }
}
