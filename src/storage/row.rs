use super::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// An ordered column → value mapping.
///
/// Keys keep insertion order so result columns come out in a stable,
/// declaration-like order. Inserting an existing key overwrites the value
/// in place, which is what merging two joined rows relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    entries: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copies the row with every key rewritten as `table.key`.
    pub fn prefixed(&self, table: &str) -> Row {
        Row {
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (format!("{}.{}", table, k), v.clone()))
                .collect(),
        }
    }

    /// Same key shape, every value null.
    pub fn null_template(&self) -> Row {
        Row {
            entries: self
                .entries
                .iter()
                .map(|(k, _)| (k.clone(), Value::Null))
                .collect(),
        }
    }

    /// New row holding `self` overlaid with `other`; keys from `other` win.
    pub fn merged(&self, other: &Row) -> Row {
        let mut out = self.clone();
        for (k, v) in &other.entries {
            out.insert(k.clone(), v.clone());
        }
        out
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (k, v) in iter {
            row.insert(k, v);
        }
        row
    }
}

impl Serialize for Row {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Builds a [`Row`] from `key => value` pairs.
#[macro_export]
macro_rules! row {
    ($($key:expr => $value:expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut row = $crate::storage::Row::new();
        $( row.insert($key, $crate::storage::Value::from($value)); )*
        row
    }};
}
