use std::fmt;

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::SerializeMap,
};
use serde_json::{Map, Value};

/// Ordered list of request parameters.
///
/// This is the exact set of key–value pairs sent for one request, either as the
/// `application/x-www-form-urlencoded` body (POST) or as the query string (GET).
/// Serialized as a JSON object so it can be attached to results under `request`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParams(Vec<(String, String)>);

impl FormParams {
    /// Create an empty parameter list.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Set `key` to `value`.
    ///
    /// An existing entry keeps its position and gets the new value, so extra labels
    /// merged after the base parameters override them.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        let key = key.into();
        let value = value.to_string();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.0.push((key, value)),
        }
    }

    /// Append a pair without replacing earlier entries with the same key.
    ///
    /// Used for repeated parameters such as `match[]`.
    pub fn push<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.0.push((key.into(), value.to_string()));
    }

    /// Set every pair of `other` on top of `self`.
    pub fn merge(&mut self, other: &FormParams) {
        for (key, value) in other.iter() {
            self.set(key, value);
        }
    }

    /// Get the first value stored for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn as_slice(&self) -> &[(String, String)] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FormParams
where
    K: Into<String>,
    V: ToString,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = FormParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

impl Serialize for FormParams {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in &self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FormParams {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Map::<String, Value>::deserialize(deserializer)?;
        Ok(map
            .into_iter()
            .map(|(key, value)| match value {
                Value::String(s) => (key, s),
                other => (key, other.to_string()),
            })
            .collect())
    }
}

impl fmt::Display for FormParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
