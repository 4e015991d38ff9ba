//! Column type vocabulary and the persisted type schema.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolved semantic type of a column.
///
/// Every column of a freshly ingested table is [`ColumnType::RawString`].
/// Cleaning resolves each one exactly once; the result is never re-inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Text,
    #[serde(alias = "float", alias = "float64")]
    Number,
    Date,
    #[serde(rename = "raw")]
    RawString,
}

impl ColumnType {
    /// Tag used in the schema sidecar.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Date => "date",
            Self::RawString => "raw",
        }
    }

    /// Whether cells of this type are stored as strings.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::RawString)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Mapping from column name to resolved type.
///
/// Serialized as a flat JSON object, e.g. `{"Value": "number"}`. The flat
/// text format of a cleaned table carries no types of its own; this schema is
/// what restores them on load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeSchema(BTreeMap<String, ColumnType>);

impl TypeSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schema typing every given column as [`ColumnType::RawString`].
    pub fn raw<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(
            columns
                .into_iter()
                .map(|name| (name.into(), ColumnType::RawString))
                .collect(),
        )
    }

    pub fn insert(&mut self, column: impl Into<String>, column_type: ColumnType) {
        self.0.insert(column.into(), column_type);
    }

    pub fn remove(&mut self, column: &str) -> Option<ColumnType> {
        self.0.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<ColumnType> {
        self.0.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.0.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnType)> {
        self.0.iter().map(|(name, ty)| (name.as_str(), *ty))
    }

    /// Names of all columns with the given type, in name order.
    pub fn columns_of(&self, column_type: ColumnType) -> Vec<&str> {
        self.iter()
            .filter(|(_, ty)| *ty == column_type)
            .map(|(name, _)| name)
            .collect()
    }

    /// True when the schema keys are exactly the given column names.
    pub fn matches_columns<S: AsRef<str>>(&self, columns: &[S]) -> bool {
        let names: BTreeSet<&str> = columns.iter().map(AsRef::as_ref).collect();
        names.len() == columns.len()
            && names.len() == self.0.len()
            && names.iter().all(|column| self.0.contains_key(*column))
    }
}

impl FromIterator<(String, ColumnType)> for TypeSchema {
    fn from_iter<T: IntoIterator<Item = (String, ColumnType)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
