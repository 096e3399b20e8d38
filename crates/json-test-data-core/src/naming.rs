//! Accessor naming: `snake_case` field keys ⇄ `getX` / `isX` method names.
//!
//! - non-boolean `user_id` → `getUserId`
//! - boolean `is_active` → `isActive` (the `is_` prefix is stripped first)
//! - boolean `active` → `isActive`
//!
//! Every field also answers to its `getX` form, booleans included.

use heck::{ToSnakeCase, ToUpperCamelCase};

const GET_PREFIX: &str = "get";
const IS_PREFIX: &str = "is";
const IS_FIELD_PREFIX: &str = "is_";

/// A parsed accessor request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor {
    /// `getUserId` → `user_id`
    Get(String),
    /// `isActive` → `active`
    Is(String),
}

impl Accessor {
    /// The snake_case field stem named by the accessor.
    pub fn field(&self) -> &str {
        match self {
            Accessor::Get(field) | Accessor::Is(field) => field,
        }
    }
}

/// Strip the `is_` prefix of a boolean field key, if something remains after it.
pub fn strip_is_prefix(field: &str) -> &str {
    match field.strip_prefix(IS_FIELD_PREFIX) {
        Some(rest) if !rest.is_empty() => rest,
        _ => field,
    }
}

/// Accessor method name for a field.
pub fn accessor_name(field: &str, boolean: bool) -> String {
    if boolean {
        format!("{IS_PREFIX}{}", strip_is_prefix(field).to_upper_camel_case())
    } else {
        format!("{GET_PREFIX}{}", field.to_upper_camel_case())
    }
}

/// Parse `getXxx` / `isXxx`. The character after the prefix must be an
/// uppercase ASCII letter, so `getter` or `island` are not accessors.
pub fn parse_accessor(method: &str) -> Option<Accessor> {
    if let Some(rest) = split_prefix(method, GET_PREFIX) {
        return Some(Accessor::Get(rest.to_snake_case()));
    }
    split_prefix(method, IS_PREFIX).map(|rest| Accessor::Is(rest.to_snake_case()))
}

/// Whether `candidate` takes `accessor` away from `current` when both
/// fields map to it.
///
/// The field the accessor spells out exactly ranks first (`active` over
/// `is_active` for `isActive`, `a` over `a_` for `getA`), then the
/// lexicographically smaller key. The order is total, so any subset of
/// candidates agrees with the full set on its winner.
pub fn outranks(accessor: &str, candidate: &str, current: &str) -> bool {
    let exact = parse_accessor(accessor);
    let exact = exact.as_ref().map(Accessor::field);
    rank(exact, candidate) < rank(exact, current)
}

fn rank<'a>(exact: Option<&str>, field: &'a str) -> (bool, &'a str) {
    (exact != Some(field), field)
}

fn split_prefix<'a>(method: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = method.strip_prefix(prefix)?;
    rest.chars()
        .next()
        .filter(char::is_ascii_uppercase)
        .map(|_| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn getter_for_non_boolean_field() {
        assert_eq!(accessor_name("user_id", false), "getUserId");
        assert_eq!(accessor_name("login", false), "getLogin");
        assert_eq!(accessor_name("is_active", false), "getIsActive");
    }

    #[test]
    fn is_accessor_for_boolean_field() {
        assert_eq!(accessor_name("is_active", true), "isActive");
        assert_eq!(accessor_name("active", true), "isActive");
        assert_eq!(accessor_name("is_", true), "isIs");
    }

    #[test]
    fn parses_get_and_is() {
        assert_eq!(
            parse_accessor("getUserId"),
            Some(Accessor::Get("user_id".to_string()))
        );
        assert_eq!(
            parse_accessor("isActive"),
            Some(Accessor::Is("active".to_string()))
        );
    }

    #[test]
    fn rejects_non_accessors() {
        assert_eq!(parse_accessor("getter"), None);
        assert_eq!(parse_accessor("island"), None);
        assert_eq!(parse_accessor("get"), None);
        assert_eq!(parse_accessor("userId"), None);
        assert_eq!(parse_accessor(""), None);
    }

    #[test]
    fn exact_field_outranks_lookalikes() {
        assert!(outranks("isActive", "active", "is_active"));
        assert!(!outranks("isActive", "is_active", "active"));
        assert!(outranks("getA", "a", "a_"));
        assert!(!outranks("getA", "a_", "a"));
        // neither is exact: smaller key wins
        assert!(outranks("getAB", "a__b", "a_b_"));
        assert!(!outranks("getAB", "a_b_", "a__b"));
    }

    #[test]
    fn accessor_names_parse_back() {
        for (field, boolean) in [("user_id", false), ("is_valid", true), ("name", false)] {
            let parsed = parse_accessor(&accessor_name(field, boolean)).unwrap();
            let expected = if boolean { strip_is_prefix(field) } else { field };
            assert_eq!(parsed.field(), expected);
        }
    }
}
