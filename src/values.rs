use std::collections::{BTreeMap, HashMap};

use hashbrown::HashMap as FastHashMap;
use serde::{Deserialize, Serialize};

/// A variable binding: either a single string or an ordered list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TemplateValue {
    Scalar(String),
    List(Vec<String>),
}

pub type MatchValue = TemplateValue;

/// Variables recovered from a matched URI, keyed by name.
pub type MatchResult = FastHashMap<String, MatchValue>;

impl TemplateValue {
    pub fn is_empty(&self) -> bool {
        match self {
            TemplateValue::Scalar(value) => value.is_empty(),
            TemplateValue::List(values) => values.is_empty(),
        }
    }

    pub fn first(&self) -> Option<&str> {
        match self {
            TemplateValue::Scalar(value) => Some(value.as_str()),
            TemplateValue::List(values) => values.first().map(String::as_str),
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            TemplateValue::Scalar(value) => Some(value.as_str()),
            TemplateValue::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            TemplateValue::Scalar(_) => None,
            TemplateValue::List(values) => Some(values.as_slice()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let items: &[String] = match self {
            TemplateValue::Scalar(value) => std::slice::from_ref(value),
            TemplateValue::List(values) => values.as_slice(),
        };
        items.iter().map(String::as_str)
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Scalar(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Scalar(value)
    }
}

impl From<Vec<String>> for TemplateValue {
    fn from(values: Vec<String>) -> Self {
        TemplateValue::List(values)
    }
}

impl From<Vec<&str>> for TemplateValue {
    fn from(values: Vec<&str>) -> Self {
        TemplateValue::List(values.into_iter().map(str::to_string).collect())
    }
}

impl<const N: usize> From<[&str; N]> for TemplateValue {
    fn from(values: [&str; N]) -> Self {
        TemplateValue::List(values.iter().map(|v| v.to_string()).collect())
    }
}

/// Anything that can resolve a variable name to its binding during expansion.
pub trait VariableSource {
    fn lookup(&self, name: &str) -> Option<&TemplateValue>;
}

impl<S: std::hash::BuildHasher> VariableSource for HashMap<String, TemplateValue, S> {
    fn lookup(&self, name: &str) -> Option<&TemplateValue> {
        self.get(name)
    }
}

impl<S: std::hash::BuildHasher> VariableSource for FastHashMap<String, TemplateValue, S> {
    fn lookup(&self, name: &str) -> Option<&TemplateValue> {
        self.get(name)
    }
}

impl VariableSource for BTreeMap<String, TemplateValue> {
    fn lookup(&self, name: &str) -> Option<&TemplateValue> {
        self.get(name)
    }
}

impl<T: VariableSource + ?Sized> VariableSource for &T {
    fn lookup(&self, name: &str) -> Option<&TemplateValue> {
        (**self).lookup(name)
    }
}
