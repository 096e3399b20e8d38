//! Load hierarchical JSON test fixtures into read-only test data containers.
//!
//! A fixture file is a JSON array of nodes. Group nodes (`_children`) carry
//! default fields inherited by everything below them; leaf nodes (`_name`)
//! become one [`TestData`] container each:
//!
//! ```
//! use json_test_data_core::wrap;
//! use serde_json::json;
//!
//! let data = wrap(r#"[
//!     {"role": "user", "_children": [
//!         {"_name": "plain_user", "user_id": 1},
//!         {"_name": "admin", "user_id": 2, "role": "admin", "is_active": true}
//!     ]}
//! ]"#).unwrap();
//!
//! assert_eq!(data["plain_user"].call("getRole").unwrap(), &json!("user"));
//! assert_eq!(data["admin"].call("getUserId").unwrap(), &json!(2));
//! assert_eq!(data["admin"].call("isActive").unwrap(), &json!(true));
//! ```
//!
//! The same traversal can instead infer one [`FieldType`] per field, which
//! the codegen crate turns into IDE stubs:
//!
//! ```
//! use json_test_data_core::{infer_types, FieldType};
//!
//! let types = infer_types(r#"[{"_name": "a", "x": 3}, {"_name": "b", "x": 4.5}]"#).unwrap();
//! assert_eq!(types["x"], FieldType::Float);
//! ```

pub mod config;
pub mod container;
pub mod error;
pub mod loader;
pub mod naming;
pub mod processor;
pub mod strategy;
pub mod types;

pub use config::{LoadOptions, ProcessOptions};
pub use container::{FieldBag, TestData};
pub use error::{AccessError, DataParseError, ErrorCode, LoadError};
pub use loader::{
    fixture_files, infer_dir, infer_file, load_dir, load_file, process_file, wrap_dir, LoadReport,
};
pub use naming::{accessor_name, parse_accessor, Accessor};
pub use processor::{infer_types, is_valid_field_name, process_with, wrap, Processor};
pub use strategy::{InferStrategy, LeafStrategy, WrapStrategy};
pub use types::{classify, combine, FieldType};
