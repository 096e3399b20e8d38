//! Read-only container for one resolved test case.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::AccessError;
use crate::naming::{accessor_name, outranks, parse_accessor};

/// Resolved fields of a single leaf, keyed by field name.
pub type FieldBag = Map<String, Value>;

/// Immutable test data for one named test case.
///
/// Fields are read either directly with [`get`](TestData::get) or through
/// accessor names (`getUserId`, `isActive`) with [`call`](TestData::call).
/// The accessor table is built once, when the container is created.
#[derive(Debug, Clone)]
pub struct TestData {
    name: String,
    fields: FieldBag,
    accessors: HashMap<String, String>,
}

impl TestData {
    pub fn new(name: impl Into<String>, fields: FieldBag) -> Self {
        let accessors = build_accessors(&fields);
        Self {
            name: name.into(),
            fields,
            accessors,
        }
    }

    /// The test name (`_name`) this container was resolved from.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &FieldBag {
        &self.fields
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Resolve an accessor name to its field value.
    ///
    /// `getX` resolves field `x` whatever its value; `isX` resolves `x` or
    /// `is_x` when that value is a boolean. When several keys map to one
    /// accessor, the key the accessor spells out exactly wins.
    pub fn call(&self, accessor: &str) -> Result<&Value, AccessError> {
        if let Some(field) = self.accessors.get(accessor) {
            if let Some(value) = self.fields.get(field) {
                return Ok(value);
            }
        }
        if parse_accessor(accessor).is_none() {
            return Err(AccessError::InvalidAccessor(accessor.to_string()));
        }
        Err(AccessError::UnknownField {
            accessor: accessor.to_string(),
            test: self.name.clone(),
        })
    }

    /// `(accessor, field)` pairs, sorted by accessor name.
    pub fn accessors(&self) -> Vec<(&str, &str)> {
        let mut pairs: Vec<(&str, &str)> = self
            .accessors
            .iter()
            .map(|(accessor, field)| (accessor.as_str(), field.as_str()))
            .collect();
        pairs.sort_unstable();
        pairs
    }
}

impl PartialEq for TestData {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.fields == other.fields
    }
}

impl Serialize for TestData {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

fn build_accessors(fields: &FieldBag) -> HashMap<String, String> {
    let mut accessors = HashMap::with_capacity(fields.len());
    for (field, value) in fields {
        claim(&mut accessors, accessor_name(field, false), field);
        if value.is_boolean() {
            claim(&mut accessors, accessor_name(field, true), field);
        }
    }
    accessors
}

fn claim(accessors: &mut HashMap<String, String>, accessor: String, field: &str) {
    match accessors.entry(accessor) {
        Entry::Vacant(slot) => {
            slot.insert(field.to_string());
        }
        Entry::Occupied(mut slot) => {
            if outranks(slot.key(), field, slot.get()) {
                slot.insert(field.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn bag(value: Value) -> FieldBag {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn get_accessor_reads_non_boolean_field() {
        let data = TestData::new("t1", bag(json!({"user_id": 7, "login": "bob"})));
        assert_eq!(data.call("getUserId"), Ok(&json!(7)));
        assert_eq!(data.call("getLogin"), Ok(&json!("bob")));
    }

    #[test]
    fn is_accessor_reads_boolean_field_with_or_without_prefix() {
        let data = TestData::new("t1", bag(json!({"is_active": true, "valid": false})));
        assert_eq!(data.call("isActive"), Ok(&json!(true)));
        assert_eq!(data.call("isValid"), Ok(&json!(false)));
    }

    #[test]
    fn plain_boolean_key_wins_accessor_collision() {
        let data = TestData::new("t1", bag(json!({"active": false, "is_active": true})));
        assert_eq!(data.call("isActive"), Ok(&json!(false)));
    }

    #[test]
    fn every_field_has_a_getter() {
        let data = TestData::new("t1", bag(json!({"is_active": true, "flag": false})));
        assert_eq!(data.call("getIsActive"), Ok(&json!(true)));
        assert_eq!(data.call("getFlag"), Ok(&json!(false)));
        assert_eq!(data.call("isFlag"), Ok(&json!(false)));
    }

    #[test]
    fn is_accessor_needs_boolean_value() {
        let data = TestData::new("t1", bag(json!({"flag": "x"})));
        assert_eq!(data.call("getFlag"), Ok(&json!("x")));
        assert!(matches!(
            data.call("isFlag"),
            Err(AccessError::UnknownField { .. })
        ));
    }

    #[test]
    fn exact_key_wins_getter_collision() {
        let data = TestData::new("t1", bag(json!({"a": 1, "a_": 2})));
        assert_eq!(data.call("getA"), Ok(&json!(1)));
        assert!(data.accessors().contains(&("getA", "a")));
        assert!(!data.accessors().iter().any(|(_, field)| *field == "a_"));
    }

    #[test]
    fn unknown_and_invalid_accessors() {
        let data = TestData::new("t1", bag(json!({"a": 1})));
        assert!(matches!(
            data.call("getMissing"),
            Err(AccessError::UnknownField { .. })
        ));
        assert_eq!(
            data.call("a"),
            Err(AccessError::InvalidAccessor("a".to_string()))
        );
    }

    #[test]
    fn serializes_as_field_map() {
        let data = TestData::new("t1", bag(json!({"a": 1, "b": [true]})));
        assert_eq!(
            serde_json::to_value(&data).unwrap(),
            json!({"a": 1, "b": [true]})
        );
    }

    #[test]
    fn accessors_are_sorted() {
        let data = TestData::new("t1", bag(json!({"user_id": 1, "is_admin": true})));
        assert_eq!(
            data.accessors(),
            vec![
                ("getIsAdmin", "is_admin"),
                ("getUserId", "user_id"),
                ("isAdmin", "is_admin"),
            ]
        );
    }
}
