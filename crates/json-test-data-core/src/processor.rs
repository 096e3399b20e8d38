//! Recursive descent over hierarchical fixture documents.
//!
//! A fixture document is a JSON array of nodes. Each node is either a
//! *group* (`_children` plus default fields inherited by every descendant)
//! or a *leaf* (`_name` plus its own fields). The walk is depth-first, left
//! to right, and stops at the first violation: no partial results.
//!
//! Levels are reported as dotted paths: the top-level array is `root`, its
//! third element is `root.2`, and the second child of that group is
//! `root.2.1`.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;

use crate::config::ProcessOptions;
use crate::container::{FieldBag, TestData};
use crate::error::DataParseError;
use crate::strategy::{InferStrategy, LeafStrategy, WrapStrategy};
use crate::types::FieldType;

/// Service field marking a leaf.
pub const NAME_FIELD: &str = "_name";
/// Service field marking a group.
pub const CHILDREN_FIELD: &str = "_children";
/// Prefix reserved for service fields.
pub const SERVICE_MARKER: char = '_';
/// Level path of the top-level array.
pub const ROOT_LEVEL: &str = "root";

/// Whether `field` is an acceptable user field name (`^[a-z_]+$`).
pub fn is_valid_field_name(field: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new("^[a-z_]+$").expect("field name pattern compiles"))
        .is_match(field)
}

/// Processes fixture documents with a fixed set of options.
///
/// Holds no per-document state: every call starts with an empty name set.
#[derive(Debug, Clone, Default)]
pub struct Processor {
    options: ProcessOptions,
}

impl Processor {
    pub fn new(options: ProcessOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// Parse `text` and feed every leaf to `strategy`.
    pub fn process<S: LeafStrategy>(
        &self,
        text: &str,
        strategy: S,
    ) -> Result<S::Output, DataParseError> {
        let document: Value = serde_json::from_str(text)?;
        self.process_value(&document, strategy)
    }

    /// Same as [`process`](Processor::process) for an already-decoded document.
    pub fn process_value<S: LeafStrategy>(
        &self,
        document: &Value,
        strategy: S,
    ) -> Result<S::Output, DataParseError> {
        let mut walk = Walk {
            strategy,
            names: HashSet::new(),
            max_depth: self.options.max_depth,
        };
        walk.array(document, ROOT_LEVEL, &FieldBag::new(), 0)?;
        Ok(walk.strategy.finish())
    }

    pub fn wrap(&self, text: &str) -> Result<BTreeMap<String, TestData>, DataParseError> {
        self.process(text, WrapStrategy::new())
    }

    pub fn infer_types(&self, text: &str) -> Result<BTreeMap<String, FieldType>, DataParseError> {
        self.process(text, InferStrategy::new())
    }
}

/// Process `text` with default options and the given strategy.
pub fn process_with<S: LeafStrategy>(text: &str, strategy: S) -> Result<S::Output, DataParseError> {
    Processor::default().process(text, strategy)
}

/// Test name → container, with default options.
pub fn wrap(text: &str) -> Result<BTreeMap<String, TestData>, DataParseError> {
    Processor::default().wrap(text)
}

/// Field name → inferred type across every leaf, with default options.
pub fn infer_types(text: &str) -> Result<BTreeMap<String, FieldType>, DataParseError> {
    Processor::default().infer_types(text)
}

/// Traversal state for one document.
struct Walk<S> {
    strategy: S,
    names: HashSet<String>,
    max_depth: usize,
}

impl<S: LeafStrategy> Walk<S> {
    fn array(
        &mut self,
        node: &Value,
        level: &str,
        defaults: &FieldBag,
        depth: usize,
    ) -> Result<(), DataParseError> {
        let items = node.as_array().ok_or_else(|| DataParseError::ArrayExpected {
            level: level.to_string(),
            found: json_kind(node).to_string(),
        })?;

        for (index, item) in items.iter().enumerate() {
            let child_level = format!("{level}.{index}");
            self.node(item, &child_level, defaults, depth)?;
        }
        Ok(())
    }

    fn node(
        &mut self,
        node: &Value,
        level: &str,
        defaults: &FieldBag,
        depth: usize,
    ) -> Result<(), DataParseError> {
        let object = node.as_object().ok_or_else(|| DataParseError::ObjectExpected {
            level: level.to_string(),
            found: json_kind(node).to_string(),
        })?;

        let mut name = None;
        let mut children = None;
        let mut local = FieldBag::new();
        for (key, value) in object {
            match key.as_str() {
                NAME_FIELD => name = Some(value),
                CHILDREN_FIELD => children = Some(value),
                field if field.starts_with(SERVICE_MARKER) => {
                    return Err(DataParseError::UnknownServiceField {
                        level: level.to_string(),
                        field: field.to_string(),
                    });
                }
                field if !is_valid_field_name(field) => {
                    return Err(DataParseError::InvalidFieldName {
                        level: level.to_string(),
                        field: field.to_string(),
                    });
                }
                _ => {
                    local.insert(key.clone(), value.clone());
                }
            }
        }

        match (name, children) {
            (Some(_), Some(_)) => Err(DataParseError::NameAndChildren {
                level: level.to_string(),
            }),
            (None, None) => Err(DataParseError::MissingNameOrChildren {
                level: level.to_string(),
            }),
            (None, Some(children)) => {
                if depth >= self.max_depth {
                    return Err(DataParseError::DepthExceeded {
                        level: level.to_string(),
                        max_depth: self.max_depth,
                    });
                }
                let defaults = merge(defaults, local);
                tracing::debug!(level, defaults = defaults.len(), "entering group");
                self.array(children, level, &defaults, depth + 1)
            }
            (Some(name), None) => self.leaf(name, local, level, defaults),
        }
    }

    fn leaf(
        &mut self,
        name: &Value,
        local: FieldBag,
        level: &str,
        defaults: &FieldBag,
    ) -> Result<(), DataParseError> {
        let name = name.as_str().ok_or_else(|| DataParseError::NameNotString {
            level: level.to_string(),
        })?;
        if name.is_empty() {
            return Err(DataParseError::EmptyName {
                level: level.to_string(),
            });
        }
        if !self.names.insert(name.to_string()) {
            return Err(DataParseError::DuplicateName {
                level: level.to_string(),
                name: name.to_string(),
            });
        }

        let fields = merge(defaults, local);
        tracing::debug!(level, test = name, fields = fields.len(), "resolved leaf");
        self.strategy.on_leaf(name, fields, level)
    }
}

/// Shallow key-wise override: `local` replaces same-named keys of `defaults`.
fn merge(defaults: &FieldBag, local: FieldBag) -> FieldBag {
    let mut merged = defaults.clone();
    merged.extend(local);
    merged
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn field_name_pattern() {
        assert!(is_valid_field_name("user_id"));
        assert!(is_valid_field_name("_"));
        assert!(!is_valid_field_name(""));
        assert!(!is_valid_field_name("userId"));
        assert!(!is_valid_field_name("field1"));
        assert!(!is_valid_field_name("a-b"));
    }

    #[test]
    fn merge_is_shallow() {
        let defaults = json!({"a": 1, "nested": {"x": 1, "y": 2}});
        let local = json!({"nested": {"x": 9}});
        let merged = merge(
            defaults.as_object().unwrap(),
            local.as_object().unwrap().clone(),
        );
        assert_eq!(Value::Object(merged), json!({"a": 1, "nested": {"x": 9}}));
    }

    #[test]
    fn children_level_is_the_group_level() {
        let err = wrap(r#"[{"_name": "a"}, {"_children": [{"_children": {}}]}]"#).unwrap_err();
        assert_eq!(err.level(), Some("root.1.0"));
        assert!(matches!(err, DataParseError::ArrayExpected { ref found, .. } if found == "object"));
    }

    #[test]
    fn depth_limit_stops_descent() {
        let processor = Processor::new(ProcessOptions { max_depth: 2 });
        let text = r#"[{"_children": [{"_children": [{"_children": [{"_name": "deep"}]}]}]}]"#;
        let err = processor.wrap(text).unwrap_err();
        assert!(matches!(
            err,
            DataParseError::DepthExceeded { ref level, max_depth: 2 } if level == "root.0.0.0"
        ));

        let shallow = r#"[{"_children": [{"_children": [{"_name": "ok"}]}]}]"#;
        assert!(processor.wrap(shallow).is_ok());
    }

    #[test]
    fn each_call_starts_with_fresh_names() {
        let processor = Processor::default();
        let text = r#"[{"_name": "t1"}]"#;
        assert!(processor.wrap(text).is_ok());
        assert!(processor.wrap(text).is_ok());
    }
}
