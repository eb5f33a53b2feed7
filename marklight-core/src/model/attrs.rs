//! Node attributes produced by token attribute extractors.

use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Text(String),
}

/// Attribute name → value, as handed to node and mark builders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Attrs(BTreeMap<&'static str, AttrValue>);

impl Attrs {
    pub fn new() -> Self {
        Attrs(BTreeMap::new())
    }

    pub fn with(mut self, name: &'static str, value: AttrValue) -> Self {
        self.0.insert(name, value);
        self
    }

    pub fn with_text(self, name: &'static str, value: impl Into<String>) -> Self {
        self.with(name, AttrValue::Text(value.into()))
    }

    pub fn with_opt_text(self, name: &'static str, value: Option<String>) -> Self {
        match value {
            Some(value) => self.with_text(name, value),
            None => self,
        }
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.get(name)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            AttrValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            AttrValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            AttrValue::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_getters_reject_other_kinds() {
        let attrs = Attrs::new()
            .with("tight", AttrValue::Bool(true))
            .with("order", AttrValue::Int(3))
            .with_text("params", "rust");

        assert_eq!(attrs.bool("tight"), Some(true));
        assert_eq!(attrs.int("order"), Some(3));
        assert_eq!(attrs.text("params"), Some("rust"));
        assert_eq!(attrs.text("order"), None);
        assert_eq!(attrs.bool("missing"), None);
    }

    #[test]
    fn optional_text_is_skipped_when_absent() {
        let attrs = Attrs::new().with_opt_text("title", None);
        assert!(attrs.is_empty());
    }
}
