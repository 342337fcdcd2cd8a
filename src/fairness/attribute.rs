//! Protected attribute representation and coercion
//!
//! A protected attribute is a categorical vector with an explicit, ordered
//! level set. Raw (non-categorical) inputs are coerced into one; the caller
//! is told whether coercion happened so it can raise an advisory.

use crate::error::{FairnessError, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single raw attribute value before coercion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl AttributeValue {
    /// Canonical string form used as a categorical level
    pub fn to_level(&self) -> String {
        match self {
            AttributeValue::Bool(b) => b.to_string(),
            AttributeValue::Integer(i) => i.to_string(),
            AttributeValue::Float(f) => f.to_string(),
            AttributeValue::Text(s) => s.clone(),
        }
    }

    /// Whether the value is already a string
    pub fn is_text(&self) -> bool {
        matches!(self, AttributeValue::Text(_))
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            AttributeValue::Integer(i) => Some(*i as f64),
            AttributeValue::Float(f) => Some(*f),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_level())
    }
}

impl From<&str> for AttributeValue {
    fn from(s: &str) -> Self {
        AttributeValue::Text(s.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(s: String) -> Self {
        AttributeValue::Text(s)
    }
}

impl From<i64> for AttributeValue {
    fn from(i: i64) -> Self {
        AttributeValue::Integer(i)
    }
}

impl From<i32> for AttributeValue {
    fn from(i: i32) -> Self {
        AttributeValue::Integer(i as i64)
    }
}

impl From<f64> for AttributeValue {
    fn from(f: f64) -> Self {
        AttributeValue::Float(f)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

/// Protected attribute as supplied by the caller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProtectedInput {
    /// Already categorical: values plus their ordered level set
    Categorical {
        values: Vec<String>,
        levels: Vec<String>,
    },
    /// Plain values, coerced to categorical with an induced level order
    Raw(Vec<AttributeValue>),
}

impl ProtectedInput {
    /// Categorical input with explicit level ordering
    pub fn categorical<V, L>(values: V, levels: L) -> Self
    where
        V: IntoIterator,
        V::Item: Into<String>,
        L: IntoIterator,
        L::Item: Into<String>,
    {
        ProtectedInput::Categorical {
            values: values.into_iter().map(Into::into).collect(),
            levels: levels.into_iter().map(Into::into).collect(),
        }
    }

    /// Raw input; levels are induced during resolution
    pub fn raw<V>(values: V) -> Self
    where
        V: IntoIterator,
        V::Item: Into<AttributeValue>,
    {
        ProtectedInput::Raw(values.into_iter().map(Into::into).collect())
    }

    /// Resolve into a validated categorical attribute.
    ///
    /// Returns the attribute and whether a coercion took place.
    pub fn resolve(self) -> Result<(ProtectedAttribute, bool)> {
        match self {
            ProtectedInput::Categorical { values, levels } => {
                Ok((ProtectedAttribute::new(values, levels)?, false))
            }
            ProtectedInput::Raw(raw) => {
                let levels = induced_levels(&raw);
                let values = raw.iter().map(AttributeValue::to_level).collect();
                Ok((ProtectedAttribute::new(values, levels)?, true))
            }
        }
    }
}

/// Level order for raw values: numeric order for all-numeric input,
/// `false < true` for booleans, lexicographic otherwise.
fn induced_levels(raw: &[AttributeValue]) -> Vec<String> {
    let mut distinct: Vec<&AttributeValue> = Vec::new();
    let mut seen = HashSet::new();
    for value in raw {
        if seen.insert(value.to_level()) {
            distinct.push(value);
        }
    }

    let all_numeric = distinct.iter().all(|v| v.as_number().is_some());
    let all_bool = distinct.iter().all(|v| matches!(v, AttributeValue::Bool(_)));

    if all_numeric {
        distinct.sort_by(|a, b| {
            let (x, y) = (a.as_number().unwrap_or(f64::NAN), b.as_number().unwrap_or(f64::NAN));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        });
    } else if all_bool {
        distinct.sort_by_key(|v| matches!(v, AttributeValue::Bool(true)));
    } else {
        distinct.sort_by_key(|v| v.to_level());
    }

    distinct.into_iter().map(AttributeValue::to_level).collect()
}

/// Validated categorical protected attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AttributeParts")]
pub struct ProtectedAttribute {
    values: Vec<String>,
    levels: Vec<String>,
}

/// Unchecked serialized form; deserializing goes through `ProtectedAttribute::new`
#[derive(Deserialize)]
struct AttributeParts {
    values: Vec<String>,
    levels: Vec<String>,
}

impl TryFrom<AttributeParts> for ProtectedAttribute {
    type Error = FairnessError;

    fn try_from(parts: AttributeParts) -> Result<Self> {
        ProtectedAttribute::new(parts.values, parts.levels)
    }
}

impl ProtectedAttribute {
    /// Build an attribute, checking the level set and value membership
    pub fn new(values: Vec<String>, levels: Vec<String>) -> Result<Self> {
        if levels.is_empty() {
            return Err(FairnessError::DomainError(
                "protected attribute has no levels".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        if let Some(dup) = levels.iter().find(|l| !seen.insert(l.as_str())) {
            return Err(FairnessError::ConfigError(format!(
                "protected attribute level '{}' is listed more than once",
                dup
            )));
        }

        if let Some(stray) = values.iter().find(|v| !seen.contains(v.as_str())) {
            return Err(FairnessError::DomainError(format!(
                "protected value '{}' is not one of the attribute levels",
                stray
            )));
        }

        Ok(Self { values, levels })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// Ordered level set
    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn n_levels(&self) -> usize {
        self.levels.len()
    }

    /// Position of a level in the level ordering
    pub fn level_index(&self, level: &str) -> Option<usize> {
        self.levels.iter().position(|l| l == level)
    }

    /// Level index of every observation
    pub fn codes(&self) -> Vec<usize> {
        let lookup: HashMap<&str, usize> = self
            .levels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();
        // membership is checked in `new`
        self.values.iter().map(|v| lookup[v.as_str()]).collect()
    }

    /// Number of observations per level, in level order
    pub fn level_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.n_levels()];
        for code in self.codes() {
            counts[code] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorical_keeps_level_order() {
        let input = ProtectedInput::categorical(["b", "a", "b"], ["b", "a"]);
        let (attr, coerced) = input.resolve().unwrap();
        assert!(!coerced);
        assert_eq!(attr.levels(), &["b".to_string(), "a".to_string()]);
        assert_eq!(attr.codes(), vec![0, 1, 0]);
    }

    #[test]
    fn test_raw_strings_sorted_lexicographically() {
        let (attr, coerced) = ProtectedInput::raw(["male", "female", "male"]).resolve().unwrap();
        assert!(coerced);
        assert_eq!(attr.levels(), &["female".to_string(), "male".to_string()]);
    }

    #[test]
    fn test_raw_numbers_sorted_numerically() {
        let (attr, _) = ProtectedInput::raw([10i64, 2, 10, 1]).resolve().unwrap();
        assert_eq!(attr.levels(), &["1".to_string(), "2".to_string(), "10".to_string()]);
        assert_eq!(attr.values()[0], "10");
    }

    #[test]
    fn test_raw_bools() {
        let (attr, _) = ProtectedInput::raw([true, false, true]).resolve().unwrap();
        assert_eq!(attr.levels(), &["false".to_string(), "true".to_string()]);
    }

    #[test]
    fn test_value_outside_levels() {
        let result = ProtectedInput::categorical(["a", "c"], ["a", "b"]).resolve();
        assert!(matches!(result, Err(FairnessError::DomainError(_))));
    }

    #[test]
    fn test_duplicate_levels() {
        let result = ProtectedInput::categorical(["a"], ["a", "a"]).resolve();
        assert!(matches!(result, Err(FairnessError::ConfigError(_))));
    }

    #[test]
    fn test_empty_level_counts() {
        let (attr, _) = ProtectedInput::categorical(["a", "a"], ["a", "b"]).resolve().unwrap();
        assert_eq!(attr.level_counts(), vec![2, 0]);
    }

    #[test]
    fn test_deserialize_checks_membership() {
        let valid = r#"{"values": ["a", "b"], "levels": ["b", "a"]}"#;
        let attr: ProtectedAttribute = serde_json::from_str(valid).unwrap();
        assert_eq!(attr.level_counts(), vec![1, 1]);

        let stray = r#"{"values": ["a", "zz"], "levels": ["b", "a"]}"#;
        assert!(serde_json::from_str::<ProtectedAttribute>(stray).is_err());

        let no_levels = r#"{"values": [], "levels": []}"#;
        assert!(serde_json::from_str::<ProtectedAttribute>(no_levels).is_err());
    }

    #[test]
    fn test_attribute_value_levels() {
        assert_eq!(AttributeValue::from(1.0).to_level(), "1");
        assert_eq!(AttributeValue::from(2.5).to_level(), "2.5");
        assert_eq!(AttributeValue::from(true).to_level(), "true");
        assert!(AttributeValue::from("x").is_text());
    }
}
