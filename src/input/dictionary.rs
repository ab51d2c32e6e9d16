//! Static dictionary input definitions

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::LazyLock;

use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use crate::types::{
    Language,
    TranslationEntry,
};

/// Dictionary compiled into the binary.
static EMBEDDED: LazyLock<Dictionary> = LazyLock::new(|| {
    Dictionary::from_json_str(include_str!("../../locales/dictionary.json")).unwrap_or_else(
        |error| {
            tracing::error!(%error, "Embedded dictionary is not valid JSON; starting empty");
            Dictionary::default()
        },
    )
});

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read dictionary file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse dictionary JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Unexpected {0} value; expected a string, an object or null")]
    UnexpectedValue(&'static str),
}

/// A resolvable value at the end of a key path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafValue {
    /// One string per language.
    Record(TranslationEntry),
    /// The same string in every language.
    Invariant(String),
}

impl From<TranslationEntry> for LeafValue {
    fn from(entry: TranslationEntry) -> Self {
        Self::Record(entry)
    }
}

impl From<&str> for LeafValue {
    fn from(value: &str) -> Self {
        Self::Invariant(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DictionaryNode {
    Branch(BTreeMap<String, DictionaryNode>),
    Leaf(LeafValue),
}

/// Nested mapping from key segments to leaves.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    /// Top-level segments
    root: BTreeMap<String, DictionaryNode>,
}

impl Dictionary {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The dictionary shipped with the crate (`locales/dictionary.json`).
    #[must_use]
    pub fn embedded() -> &'static Self {
        &EMBEDDED
    }

    #[must_use]
    pub const fn root(&self) -> &BTreeMap<String, DictionaryNode> {
        &self.root
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Inserts a leaf at `key_path`, creating branches on the way.
    ///
    /// A leaf sitting where a branch is needed is replaced by the branch.
    pub fn insert(&mut self, key_path: &str, separator: &str, leaf: impl Into<LeafValue>) {
        let mut segments: Vec<&str> = key_path.split(separator).collect();
        let Some(last) = segments.pop() else {
            return;
        };

        let mut current = &mut self.root;
        for segment in segments {
            let node = current
                .entry(segment.to_string())
                .or_insert_with(|| DictionaryNode::Branch(BTreeMap::new()));
            if let DictionaryNode::Leaf(_) = node {
                *node = DictionaryNode::Branch(BTreeMap::new());
            }
            let DictionaryNode::Branch(children) = node else {
                return;
            };
            current = children;
        }

        current.insert(last.to_string(), DictionaryNode::Leaf(leaf.into()));
    }

    /// Builder form of [`Dictionary::insert`] with `.` as separator.
    #[must_use]
    pub fn with(mut self, key_path: &str, leaf: impl Into<LeafValue>) -> Self {
        self.insert(key_path, ".", leaf);
        self
    }

    /// Follows `key` segment by segment.
    ///
    /// On failure returns the first segment that could not be followed: a
    /// missing child, or a segment left over after reaching a leaf.
    pub fn walk<'k>(&self, key: &'k str, separator: &str) -> Result<&DictionaryNode, &'k str> {
        let mut children = &self.root;
        let mut found: Option<&DictionaryNode> = None;

        for segment in key.split(separator) {
            if let Some(DictionaryNode::Leaf(_)) = found {
                return Err(segment);
            }
            let node = children.get(segment).ok_or(segment)?;
            if let DictionaryNode::Branch(next) = node {
                children = next;
            }
            found = Some(node);
        }

        found.ok_or(key)
    }

    /// Parses JSON text. Malformed entries inside a valid document are skipped.
    ///
    /// # Errors
    /// Returns error if the text is not JSON.
    pub fn from_json_str(text: &str) -> Result<Self, DictionaryError> {
        let json: Value = serde_json::from_str(text)?;
        Ok(Self::from_json(&json))
    }

    /// Loads a dictionary from a JSON file.
    ///
    /// # Errors
    /// Returns error if file read or JSON parse fails.
    pub fn load_file(path: &Path) -> Result<Self, DictionaryError> {
        tracing::debug!("Loading dictionary from: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Builds a dictionary from a JSON value without failing.
    ///
    /// An object is a leaf record when it has an `en` member holding a string or
    /// `null` and all of its members are language codes holding strings or `null`.
    /// Every other object is a branch. `null` values are skipped; numbers,
    /// booleans and arrays are logged and skipped.
    #[must_use]
    pub fn from_json(json: &Value) -> Self {
        let Value::Object(map) = json else {
            tracing::warn!(kind = value_kind(json), "Dictionary root is not an object; ignoring it");
            return Self::default();
        };

        let mut path = Vec::new();
        Self { root: parse_branch(map, &mut path) }
    }
}

/// Parses every member of `map`, extending `path` while descending.
fn parse_branch(
    map: &Map<String, Value>,
    path: &mut Vec<String>,
) -> BTreeMap<String, DictionaryNode> {
    let mut branch = BTreeMap::new();

    for (key, value) in map {
        path.push(key.clone());
        match parse_node(value, path) {
            Ok(Some(node)) => {
                branch.insert(key.clone(), node);
            }
            Ok(None) => {}
            Err(error) => {
                tracing::warn!(key = %path.join("."), %error, "Skipping malformed dictionary entry");
            }
        }
        path.pop();
    }

    branch
}

/// Classifies one JSON value as a branch, a leaf, or nothing.
fn parse_node(
    value: &Value,
    path: &mut Vec<String>,
) -> Result<Option<DictionaryNode>, DictionaryError> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(DictionaryNode::Leaf(LeafValue::Invariant(s.clone())))),
        Value::Object(map) if is_leaf_record(map) => {
            Ok(Some(DictionaryNode::Leaf(LeafValue::Record(leaf_record(map)))))
        }
        Value::Object(map) => Ok(Some(DictionaryNode::Branch(parse_branch(map, path)))),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) => {
            Err(DictionaryError::UnexpectedValue(value_kind(value)))
        }
    }
}

/// A leaf record: an object with an `en` member that is not itself an object.
///
/// Members other than language codes are ignored when reading the record.
fn is_leaf_record(map: &Map<String, Value>) -> bool {
    map.get(Language::En.code()).is_some_and(|value| !value.is_object())
}

/// Record fields of a leaf; nulls become `None`.
fn leaf_record(map: &Map<String, Value>) -> TranslationEntry {
    let text = |language: Language| {
        map.get(language.code()).and_then(Value::as_str).map(str::to_string)
    };

    TranslationEntry {
        en: text(Language::En),
        de: text(Language::De),
        tr: text(Language::Tr),
    }
}

/// JSON type name for diagnostics.
const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
