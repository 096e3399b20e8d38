//! Error types for fixture processing, loading and container access.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stable, machine-readable error codes.
///
/// Variant names and their serialized `snake_case` strings are part of the
/// public contract: tooling that reports fixture failures keys off them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum ErrorCode {
    /// Malformed JSON text.
    JsonParseError,
    /// An array was expected (top level or a `_children` value).
    ArrayExpected,
    /// An array element was not an object.
    ObjectExpected,
    /// Node carries neither `_name` nor `_children`.
    MissingNameOrChildren,
    /// Node carries both `_name` and `_children`.
    NameAndChildren,
    /// `_name` is not a string.
    NameNotString,
    /// `_name` is the empty string.
    EmptyName,
    /// Key starts with the service marker but is not a known service field.
    UnknownServiceField,
    /// Field name is empty or contains characters outside `[a-z_]`.
    InvalidFieldName,
    /// Test name already used elsewhere in the document.
    DuplicateName,
    /// Nesting deeper than the configured maximum.
    DepthExceeded,
}

/// Failure while processing a single fixture document.
///
/// Every structural variant carries the level path (`root.2.1`) of the node
/// where the violation was observed.
#[derive(Debug, Error)]
pub enum DataParseError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Array expected at level {level}, found {found}")]
    ArrayExpected { level: String, found: String },

    #[error("Object expected at level {level}, found {found}")]
    ObjectExpected { level: String, found: String },

    #[error("Node at level {level} has neither `_name` nor `_children`")]
    MissingNameOrChildren { level: String },

    #[error("Node at level {level} has both `_name` and `_children`")]
    NameAndChildren { level: String },

    #[error("`_name` at level {level} must be a string")]
    NameNotString { level: String },

    #[error("`_name` at level {level} must not be empty")]
    EmptyName { level: String },

    #[error("Unknown service field `{field}` at level {level}")]
    UnknownServiceField { level: String, field: String },

    #[error("Invalid field name `{field}` at level {level}: only [a-z_] allowed")]
    InvalidFieldName { level: String, field: String },

    #[error("Non-unique name `{name}` at level {level}")]
    DuplicateName { level: String, name: String },

    #[error("Nesting depth exceeded at level {level} (max: {max_depth})")]
    DepthExceeded { level: String, max_depth: usize },
}

impl DataParseError {
    /// Returns the stable error code for this error variant.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            DataParseError::Json(_) => ErrorCode::JsonParseError,
            DataParseError::ArrayExpected { .. } => ErrorCode::ArrayExpected,
            DataParseError::ObjectExpected { .. } => ErrorCode::ObjectExpected,
            DataParseError::MissingNameOrChildren { .. } => ErrorCode::MissingNameOrChildren,
            DataParseError::NameAndChildren { .. } => ErrorCode::NameAndChildren,
            DataParseError::NameNotString { .. } => ErrorCode::NameNotString,
            DataParseError::EmptyName { .. } => ErrorCode::EmptyName,
            DataParseError::UnknownServiceField { .. } => ErrorCode::UnknownServiceField,
            DataParseError::InvalidFieldName { .. } => ErrorCode::InvalidFieldName,
            DataParseError::DuplicateName { .. } => ErrorCode::DuplicateName,
            DataParseError::DepthExceeded { .. } => ErrorCode::DepthExceeded,
        }
    }

    /// Returns the level path of the offending node, if available.
    ///
    /// Returns `None` for `Json` (the document never reached traversal).
    pub fn level(&self) -> Option<&str> {
        match self {
            DataParseError::Json(_) => None,
            DataParseError::ArrayExpected { level, .. }
            | DataParseError::ObjectExpected { level, .. }
            | DataParseError::MissingNameOrChildren { level }
            | DataParseError::NameAndChildren { level }
            | DataParseError::NameNotString { level }
            | DataParseError::EmptyName { level }
            | DataParseError::UnknownServiceField { level, .. }
            | DataParseError::InvalidFieldName { level, .. }
            | DataParseError::DuplicateName { level, .. }
            | DataParseError::DepthExceeded { level, .. } => Some(level),
        }
    }

    /// Structured form for tooling: `{"code": "...", "message": "...", "level": "..." | null}`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "code": self.error_code(),
            "message": self.to_string(),
            "level": self.level(),
        })
    }
}

/// Failure while reading fixtures from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: DataParseError,
    },
}

impl LoadError {
    /// The parse error behind this load failure, if any.
    pub fn parse_error(&self) -> Option<&DataParseError> {
        match self {
            LoadError::Parse { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Failure resolving an accessor on a [`TestData`](crate::TestData) container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("`{0}` is not a get/is accessor")]
    InvalidAccessor(String),

    #[error("Test `{test}` has no field behind accessor `{accessor}`")]
    UnknownField { accessor: String, test: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn error_code_serializes_snake_case() {
        let json = serde_json::to_value(ErrorCode::UnknownServiceField).unwrap();
        assert_eq!(json, json!("unknown_service_field"));
    }

    #[test]
    fn structural_error_reports_level() {
        let err = DataParseError::InvalidFieldName {
            level: "root.0.1".to_string(),
            field: "userId".to_string(),
        };
        assert_eq!(err.level(), Some("root.0.1"));
        assert_eq!(err.error_code(), ErrorCode::InvalidFieldName);

        let msg = err.to_string();
        assert!(msg.contains("userId"), "message should name the field: {msg}");
        assert!(msg.contains("root.0.1"), "message should name the level: {msg}");
    }

    #[test]
    fn json_error_has_no_level() {
        let source = serde_json::from_str::<serde_json::Value>("[").unwrap_err();
        let err = DataParseError::from(source);
        assert_eq!(err.level(), None);

        let json = err.to_json();
        assert_eq!(json["code"], json!("json_parse_error"));
        assert_eq!(json["level"], json!(null));
    }

    #[test]
    fn load_error_exposes_parse_source() {
        let err = LoadError::Parse {
            path: PathBuf::from("users.json"),
            source: DataParseError::EmptyName {
                level: "root.3".to_string(),
            },
        };
        assert!(err.to_string().contains("users.json"));
        assert_eq!(
            err.parse_error().map(DataParseError::error_code),
            Some(ErrorCode::EmptyName)
        );
        assert!(LoadError::FileNotFound(PathBuf::from("x.json"))
            .parse_error()
            .is_none());
    }
}
