//! Normalized set of webhook event names.
//!
//! Clients send events either as a JSON array or as one comma-joined string.
//! Both forms collapse into the same sorted, de-duplicated set so that equal
//! subscriptions always store and render identically.
//!
//! Names are kept verbatim. `" comment_created"` is a different name from
//! `comment_created` and fails catalog validation; only empty segments of a
//! joined string are dropped.

use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Delimiter of the stored (joined) form
pub const EVENT_DELIMITER: char = ',';

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct EventSet(BTreeSet<String>);

impl EventSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the stored form. Empty segments are dropped.
    pub fn parse_joined(joined: &str) -> Self {
        joined.split(EVENT_DELIMITER).collect()
    }

    /// Render the stored form: names in sorted order joined by commas
    pub fn to_joined(&self) -> String {
        self.0
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Names in sorted order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for EventSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        EventSet(
            iter.into_iter()
                .map(Into::<String>::into)
                .filter(|name| !name.is_empty())
                .collect(),
        )
    }
}

impl fmt::Display for EventSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_joined())
    }
}

impl Serialize for EventSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

struct EventSetVisitor;

impl<'de> Visitor<'de> for EventSetVisitor {
    type Value = EventSet;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of event names or a comma-separated string")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<EventSet, E> {
        Ok(EventSet::parse_joined(value))
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<EventSet, A::Error> {
        let mut names = BTreeSet::new();
        while let Some(name) = seq.next_element::<String>()? {
            if !name.is_empty() {
                names.insert(name);
            }
        }
        Ok(EventSet(names))
    }
}

impl<'de> Deserialize<'de> for EventSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(EventSetVisitor)
    }
}

/// Serde adapter for the stored column form (`"a,b"`).
///
/// Use with `#[serde(with = "crate::models::event_set::joined")]`.
pub mod joined {
    use super::EventSet;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(events: &EventSet, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&events.to_joined())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<EventSet, D::Error> {
        EventSet::deserialize(deserializer)
    }
}
