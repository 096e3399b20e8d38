//! What a resolved leaf becomes.
//!
//! The processor does all validation and default merging, then hands each
//! `(name, fields)` pair to a [`LeafStrategy`]. Two strategies ship:
//! [`WrapStrategy`] builds one [`TestData`] per test name, and
//! [`InferStrategy`] folds every field value into an aggregate [`FieldType`].

use std::collections::BTreeMap;

use crate::container::{FieldBag, TestData};
use crate::error::DataParseError;
use crate::types::FieldType;

/// Consumer of validated leaves.
pub trait LeafStrategy {
    type Output;

    /// Called once per leaf, in document order.
    ///
    /// - `name`: the leaf's `_name`, already checked for global uniqueness.
    /// - `fields`: inherited defaults overridden by the leaf's own fields.
    /// - `level`: level path of the leaf, for diagnostics.
    fn on_leaf(&mut self, name: &str, fields: FieldBag, level: &str)
        -> Result<(), DataParseError>;

    /// Consume the strategy once the document has been fully traversed.
    fn finish(self) -> Self::Output;
}

/// Wraps each leaf into a read-only [`TestData`], keyed by test name.
#[derive(Debug, Default)]
pub struct WrapStrategy {
    data: BTreeMap<String, TestData>,
}

impl WrapStrategy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LeafStrategy for WrapStrategy {
    type Output = BTreeMap<String, TestData>;

    fn on_leaf(
        &mut self,
        name: &str,
        fields: FieldBag,
        level: &str,
    ) -> Result<(), DataParseError> {
        if self.data.contains_key(name) {
            return Err(DataParseError::DuplicateName {
                level: level.to_string(),
                name: name.to_string(),
            });
        }
        self.data
            .insert(name.to_string(), TestData::new(name, fields));
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.data
    }
}

/// Infers one [`FieldType`] per field name across every leaf of a document.
#[derive(Debug, Default)]
pub struct InferStrategy {
    types: BTreeMap<String, FieldType>,
}

impl InferStrategy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue folding into types inferred from earlier documents.
    pub fn with_types(types: BTreeMap<String, FieldType>) -> Self {
        Self { types }
    }
}

impl LeafStrategy for InferStrategy {
    type Output = BTreeMap<String, FieldType>;

    fn on_leaf(
        &mut self,
        _name: &str,
        fields: FieldBag,
        _level: &str,
    ) -> Result<(), DataParseError> {
        for (field, value) in &fields {
            let observed = FieldType::classify(value);
            self.types
                .entry(field.clone())
                .and_modify(|ty| *ty = ty.combine(observed))
                .or_insert(observed);
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.types
    }
}
