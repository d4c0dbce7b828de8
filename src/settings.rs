use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

/// Per-image settings: operation key to that operation's settings fragment.
///
/// Fragments stay opaque `serde_json::Value`s; each operation parses its own
/// fields and ignores keys it does not know. Absence of an operation's key
/// means the operation is skipped entirely by the pipeline, which is distinct
/// from being present with `enabled: false`.
///
/// Entries keep first-insertion order. That order is what serialization
/// emits, so a sidecar file round-trips without being alphabetized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SettingsMap {
    entries: Vec<(String, serde_json::Value)>,
}

impl SettingsMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Inserts or replaces a fragment. Replacing keeps the entry's original
    /// position.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        let idx = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }
}

impl Serialize for SettingsMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SettingsMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MapVisitor;

        impl<'de> Visitor<'de> for MapVisitor {
            type Value = SettingsMap;

            fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
                f.write_str("a map of operation settings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut out = SettingsMap::new();
                while let Some((key, value)) = access.next_entry::<String, serde_json::Value>()? {
                    out.insert(key, value);
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(MapVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_in_insertion_order() {
        let mut settings = SettingsMap::new();
        settings.insert("transparency", json!({ "enabled": true }));
        settings.insert("color", json!({ "enabled": false }));

        let text = serde_json::to_string(&settings).unwrap();
        let t = text.find("transparency").unwrap();
        let c = text.find("color").unwrap();
        assert!(t < c, "insertion order must survive serialization: {text}");
    }

    #[test]
    fn replace_keeps_position() {
        let mut settings = SettingsMap::new();
        settings.insert("transparency", json!(1));
        settings.insert("color", json!(2));
        settings.insert("transparency", json!(3));

        assert_eq!(settings.keys().collect::<Vec<_>>(), ["transparency", "color"]);
        assert_eq!(settings.get("transparency"), Some(&json!(3)));
    }

    #[test]
    fn round_trips_through_json() {
        let mut settings = SettingsMap::new();
        settings.insert("transparency", json!({ "alpha": -50.0 }));
        settings.insert("color", json!({ "hue": 45 }));

        let text = serde_json::to_string_pretty(&settings).unwrap();
        let back: SettingsMap = serde_json::from_str(&text).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn remove_returns_fragment() {
        let mut settings = SettingsMap::new();
        settings.insert("color", json!({ "hue": 10 }));
        assert_eq!(settings.remove("color"), Some(json!({ "hue": 10 })));
        assert!(settings.is_empty());
        assert_eq!(settings.remove("color"), None);
    }
}
