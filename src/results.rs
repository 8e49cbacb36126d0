//! Query result types for sparql-batch.
//!
//! A response is classified exactly once, when it is parsed: documents with
//! a top-level `head` member are SELECT-style tables, everything else is an
//! RDF/JSON graph keyed by subject and then predicate. Members this crate
//! does not interpret are carried along so that re-serializing a result
//! yields the same structure that was received.

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::marker::PhantomData;

use crate::error::{Result, SparqlBatchError};

/// A JSON object whose members keep the order they were received in.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(Vec<(String, V)>);

impl<V> OrderedMap<V> {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of members.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the map has no members.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Iterates over members in document order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for OrderedMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de, V: Deserialize<'de>> Deserialize<'de> for OrderedMap<V> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        struct OrderedMapVisitor<V>(PhantomData<V>);

        impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedMapVisitor<V> {
            type Value = OrderedMap<V>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a JSON object")
            }

            fn visit_map<A: MapAccess<'de>>(
                self,
                mut access: A,
            ) -> std::result::Result<Self::Value, A::Error> {
                let mut entries: Vec<(String, V)> = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, V>()? {
                    // A repeated key keeps its first position and its last value.
                    match entries.iter_mut().find(|entry| entry.0 == key) {
                        Some(entry) => entry.1 = value,
                        None => entries.push((key, value)),
                    }
                }
                Ok(OrderedMap(entries))
            }
        }

        deserializer.deserialize_map(OrderedMapVisitor(PhantomData))
    }
}

/// A member that may be absent, explicitly `null`, or set.
///
/// `None` is an absent member and `Some(None)` an explicit `null`, so
/// writing a result back out reproduces the members it was read with.
pub type Nullable<T> = Option<Option<T>>;

fn nullable<'de, D, T>(deserializer: D) -> std::result::Result<Nullable<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// A single RDF term as it appears in a result cell.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Term {
    /// Lexical value (IRI, literal text or blank node label).
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub value: Nullable<String>,

    /// Term type tag: `uri`, `literal`, `bnode`, ...
    #[serde(
        rename = "type",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Nullable<String>,

    /// `xml:lang`, `datatype` and anything else the endpoint sent.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Term {
    /// Creates a term with only a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: Some(Some(value.into())),
            ..Default::default()
        }
    }

    /// Sets the type tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(Some(kind.into()));
        self
    }

    /// Returns the value, or an empty string when the cell has none.
    pub fn value_str(&self) -> &str {
        self.value.as_ref().and_then(Option::as_deref).unwrap_or("")
    }
}

/// One row of a tabular result: variable name to bound term.
pub type Binding = OrderedMap<Term>;

/// The `head` member of a tabular result.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Head {
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub vars: Nullable<Vec<String>>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `results` member of a tabular result.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct Bindings {
    #[serde(default)]
    pub bindings: Vec<Binding>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a SELECT-style query.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct TabularResult {
    pub head: Head,

    /// Absent for boolean (ASK) responses.
    #[serde(
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub results: Nullable<Bindings>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TabularResult {
    /// Creates a table with the given columns and rows.
    pub fn new(vars: Vec<String>, rows: Vec<Binding>) -> Self {
        Self {
            head: Head {
                vars: Some(Some(vars)),
                ..Default::default()
            },
            results: Some(Some(Bindings {
                bindings: rows,
                ..Default::default()
            })),
            extra: Map::new(),
        }
    }

    /// Column names in declared order.
    pub fn vars(&self) -> &[String] {
        self.head
            .vars
            .as_ref()
            .and_then(Option::as_deref)
            .unwrap_or(&[])
    }

    /// Rows in result order.
    pub fn rows(&self) -> &[Binding] {
        self.results
            .as_ref()
            .and_then(Option::as_ref)
            .map(|r| r.bindings.as_slice())
            .unwrap_or(&[])
    }
}

/// Result of a CONSTRUCT/DESCRIBE-style query: subject to predicate to objects.
pub type GraphResult = OrderedMap<OrderedMap<Vec<Term>>>;

/// A parsed endpoint response.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ResultSet {
    /// Named columns and row bindings.
    Tabular(TabularResult),
    /// Triples grouped by subject, then predicate.
    Graph(GraphResult),
}

impl ResultSet {
    /// Parses and classifies a response document.
    pub fn from_json(text: &str) -> Result<Self> {
        let probe: Value = serde_json::from_str(text)?;
        let members = match &probe {
            Value::Object(members) => members,
            other => {
                return Err(SparqlBatchError::decode(format!(
                    "expected a JSON object, found {}",
                    json_kind(other)
                )))
            }
        };

        if members.contains_key("head") {
            Ok(Self::Tabular(serde_json::from_str(text)?))
        } else {
            Ok(Self::Graph(serde_json::from_str(text)?))
        }
    }

    /// Serializes the result back to compact JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Number of results: rows for a table, subjects for a graph.
    pub fn len(&self) -> usize {
        match self {
            Self::Tabular(table) => table.rows().len(),
            Self::Graph(graph) => graph.len(),
        }
    }

    /// Returns true if the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true for the SELECT-style variant.
    pub fn is_tabular(&self) -> bool {
        matches!(self, Self::Tabular(_))
    }

    /// Returns true for the graph variant.
    pub fn is_graph(&self) -> bool {
        matches!(self, Self::Graph(_))
    }
}

/// Counts the results in an optional response; no response counts as zero.
///
/// A graph counts its subjects, not its triples.
pub fn count_results(result: Option<&ResultSet>) -> usize {
    result.map_or(0, ResultSet::len)
}

/// Iterates over the (subject, predicate, object) triples of a graph.
pub fn triples(graph: &GraphResult) -> impl Iterator<Item = (&str, &str, &Term)> {
    graph.iter().flat_map(|(subject, predicates)| {
        predicates.iter().flat_map(move |(predicate, objects)| {
            objects.iter().map(move |object| (subject, predicate, object))
        })
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
