use serde::ser::{Serialize, SerializeMap, Serializer};
use std::fmt;

/// Keys of a [`FeatureSet`], listed in display order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Duration,
    SampleRate,
    Channels,
    RmsEnergy,
    ZeroCrossingRate,
    EstimatedBpm,
}

impl FeatureKey {
    pub const ALL: [FeatureKey; 6] = [
        FeatureKey::Duration,
        FeatureKey::SampleRate,
        FeatureKey::Channels,
        FeatureKey::RmsEnergy,
        FeatureKey::ZeroCrossingRate,
        FeatureKey::EstimatedBpm,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureKey::Duration => "duration",
            FeatureKey::SampleRate => "sampleRate",
            FeatureKey::Channels => "channels",
            FeatureKey::RmsEnergy => "rmsEnergy",
            FeatureKey::ZeroCrossingRate => "zeroCrossingRate",
            FeatureKey::EstimatedBpm => "estimatedBPM",
        }
    }

    /// Human-readable label, e.g. "Zero Crossing Rate".
    pub fn display_label(self) -> String {
        display_label(self.as_str())
    }
}

/// Turn a camelCase key into a label: a space before every capital letter,
/// then the first letter upper-cased. Acronyms are split letter by letter
/// ("estimatedBPM" -> "Estimated B P M").
pub fn display_label(name: &str) -> String {
    let mut spaced = String::with_capacity(name.len() + 4);
    for c in name.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// A formatted feature value. Everything is pre-formatted text except the
/// channel count, which stays a number.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureValue {
    Text(String),
    Integer(u64),
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeatureValue::Text(s) => f.write_str(s),
            FeatureValue::Integer(n) => write!(f, "{}", n),
        }
    }
}

impl Serialize for FeatureValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeatureValue::Text(s) => serializer.serialize_str(s),
            FeatureValue::Integer(n) => serializer.serialize_u64(*n),
        }
    }
}

/// Descriptors of one buffer, in insertion (display) order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureSet {
    entries: Vec<(FeatureKey, FeatureValue)>,
}

impl FeatureSet {
    pub(crate) fn insert(&mut self, key: FeatureKey, value: FeatureValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: FeatureKey) -> Option<&FeatureValue> {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    /// Look up by the camelCase key name.
    pub fn get_by_name(&self, name: &str) -> Option<&FeatureValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureKey, &FeatureValue)> {
        self.entries.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for FeatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key.as_str(), value)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_split_on_capitals() {
        assert_eq!(display_label("zeroCrossingRate"), "Zero Crossing Rate");
        assert_eq!(display_label("sampleRate"), "Sample Rate");
        assert_eq!(display_label("duration"), "Duration");
        assert_eq!(FeatureKey::EstimatedBpm.display_label(), "Estimated B P M");
        assert_eq!(display_label(""), "");
    }

    #[test]
    fn insert_overwrites_in_place() {
        let mut set = FeatureSet::default();
        set.insert(FeatureKey::Duration, FeatureValue::Text("1.00 s".into()));
        set.insert(FeatureKey::Channels, FeatureValue::Integer(2));
        set.insert(FeatureKey::Duration, FeatureValue::Text("2.00 s".into()));
        let keys: Vec<_> = set.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec![FeatureKey::Duration, FeatureKey::Channels]);
        assert_eq!(set.get(FeatureKey::Duration).unwrap().to_string(), "2.00 s");
    }

    #[test]
    fn serializes_in_insertion_order() {
        let mut set = FeatureSet::default();
        set.insert(FeatureKey::SampleRate, FeatureValue::Text("44100 Hz".into()));
        set.insert(FeatureKey::Channels, FeatureValue::Integer(1));
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"{"sampleRate":"44100 Hz","channels":1}"#);
    }
}
