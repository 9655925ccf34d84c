use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// What an ordinal scale does with a key outside its domain.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unknown<R> {
    /// `lookup_or_insert` appends the key to the domain and assigns it the
    /// next range value.
    #[default]
    Implicit,
    /// Unseen keys map to this value.
    Value(R),
    /// Unseen keys map to nothing.
    Undefined,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(
    default,
    bound(deserialize = "D: Deserialize<'de> + Hash + Eq, R: Deserialize<'de>")
)]
pub struct OrdinalScaleConfig<D, R> {
    pub domain: Vec<D>,
    pub range: Vec<R>,
    pub unknown: Unknown<R>,
}

impl<D, R> Default for OrdinalScaleConfig<D, R> {
    fn default() -> Self {
        Self {
            domain: vec![],
            range: vec![],
            unknown: Unknown::Implicit,
        }
    }
}

/// Maps discrete keys to range values by domain position, cycling through
/// the range when the domain is longer.
#[derive(Clone, Debug)]
pub struct OrdinalScale<D: Clone + Debug + Hash + Eq, R: Clone + Debug> {
    domain: IndexSet<D>,
    range: Vec<R>,
    unknown: Unknown<R>,
}

impl<D: Clone + Debug + Hash + Eq, R: Clone + Debug> OrdinalScale<D, R> {
    pub fn new(config: &OrdinalScaleConfig<D, R>) -> Self {
        Self {
            domain: config.domain.iter().cloned().collect(),
            range: config.range.clone(),
            unknown: config.unknown.clone(),
        }
    }

    pub fn domain(&self) -> Vec<D> {
        self.domain.iter().cloned().collect()
    }

    /// Repeated keys keep their first position.
    pub fn set_domain(&mut self, domain: impl IntoIterator<Item = D>) -> &mut Self {
        self.domain = domain.into_iter().collect();
        self
    }

    pub fn with_domain(mut self, domain: impl IntoIterator<Item = D>) -> Self {
        self.set_domain(domain);
        self
    }

    pub fn range(&self) -> Vec<R> {
        self.range.clone()
    }

    pub fn set_range(&mut self, range: impl IntoIterator<Item = R>) -> &mut Self {
        self.range = range.into_iter().collect();
        self
    }

    pub fn with_range(mut self, range: impl IntoIterator<Item = R>) -> Self {
        self.set_range(range);
        self
    }

    pub fn unknown(&self) -> &Unknown<R> {
        &self.unknown
    }

    pub fn set_unknown(&mut self, unknown: Unknown<R>) -> &mut Self {
        self.unknown = unknown;
        self
    }

    pub fn with_unknown(mut self, unknown: Unknown<R>) -> Self {
        self.unknown = unknown;
        self
    }

    fn value_at(&self, index: usize) -> Option<R> {
        if self.range.is_empty() {
            None
        } else {
            Some(self.range[index % self.range.len()].clone())
        }
    }

    fn unknown_value(&self) -> Option<R> {
        match &self.unknown {
            Unknown::Value(value) => Some(value.clone()),
            Unknown::Implicit | Unknown::Undefined => None,
        }
    }

    /// Range value for `key` without touching the domain. Unseen keys give
    /// the unknown value, or `None` when the scale grows implicitly.
    pub fn lookup(&self, key: &D) -> Option<R> {
        match self.domain.get_index_of(key) {
            Some(i) => self.value_at(i),
            None => self.unknown_value(),
        }
    }

    /// Range value for `key`. With [`Unknown::Implicit`] an unseen key is
    /// appended to the domain first.
    pub fn lookup_or_insert(&mut self, key: D) -> Option<R> {
        if let Some(i) = self.domain.get_index_of(&key) {
            return self.value_at(i);
        }
        if !matches!(self.unknown, Unknown::Implicit) {
            return self.unknown_value();
        }
        tracing::debug!("ordinal scale domain grows with {key:?}");
        let (i, _) = self.domain.insert_full(key);
        self.value_at(i)
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }
}

impl<D: Clone + Debug + Hash + Eq, R: Clone + Debug> Default for OrdinalScale<D, R> {
    fn default() -> Self {
        Self {
            domain: IndexSet::new(),
            range: vec![],
            unknown: Unknown::Implicit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ordinal_scale() {
        let scale = OrdinalScale::default()
            .with_domain(["a", "b", "c"])
            .with_range(["red", "green", "blue"])
            .with_unknown(Unknown::Value("gray"));
        let result: Vec<_> = ["b", "a", "d", "b", "d"]
            .iter()
            .map(|k| scale.lookup(k))
            .collect();
        assert_eq!(
            result,
            vec![Some("green"), Some("red"), Some("gray"), Some("green"), Some("gray")]
        );
    }

    #[test]
    fn test_implicit_growth() {
        let mut scale = OrdinalScale::default().with_range(["foo", "bar"]);
        assert_eq!(scale.lookup_or_insert(0), Some("foo"));
        assert_eq!(scale.domain(), vec![0]);
        assert_eq!(scale.lookup_or_insert(1), Some("bar"));
        assert_eq!(scale.domain(), vec![0, 1]);
        assert_eq!(scale.lookup_or_insert(2), Some("foo"));
        assert_eq!(scale.lookup_or_insert(0), Some("foo"));
        assert_eq!(scale.domain(), vec![0, 1, 2]);
    }

    #[test]
    fn test_pure_lookup_never_grows() {
        let scale = OrdinalScale::default().with_range(["foo", "bar"]);
        assert_eq!(scale.lookup(&"x"), None);
        assert!(scale.domain().is_empty());
    }

    #[test]
    fn test_explicit_unknown_stops_growth() {
        let mut scale = OrdinalScale::default()
            .with_domain(["a"])
            .with_range([1, 2])
            .with_unknown(Unknown::Value(0));
        assert_eq!(scale.lookup_or_insert("z"), Some(0));
        assert_eq!(scale.domain(), vec!["a"]);

        scale.set_unknown(Unknown::Undefined);
        assert_eq!(scale.lookup_or_insert("z"), None);
        assert_eq!(scale.domain(), vec!["a"]);
    }

    #[test]
    fn test_range_cycles() {
        let scale = OrdinalScale::default()
            .with_domain(["a", "b", "c", "d", "e"])
            .with_range(["x", "y"]);
        assert_eq!(scale.lookup(&"c"), Some("x"));
        assert_eq!(scale.lookup(&"d"), Some("y"));
    }

    #[test]
    fn test_empty_range() {
        let mut scale = OrdinalScale::<&str, &str>::default();
        assert_eq!(scale.lookup_or_insert("a"), None);
        assert_eq!(scale.domain(), vec!["a"]);
    }

    #[test]
    fn test_domain_deduplicates() {
        let scale = OrdinalScale::default()
            .with_domain(["b", "a", "b", "c"])
            .with_range([1, 2, 3]);
        assert_eq!(scale.domain(), vec!["b", "a", "c"]);
        assert_eq!(scale.lookup(&"c"), Some(3));
    }

    #[test]
    fn test_custom_types() {
        #[derive(Debug, Clone, Hash, Eq, PartialEq)]
        struct Key(String);

        #[derive(Debug, Clone, PartialEq)]
        struct Mark(i32);

        let scale = OrdinalScale::default()
            .with_domain([Key("a".into()), Key("b".into())])
            .with_range([Mark(1), Mark(2)])
            .with_unknown(Unknown::Value(Mark(0)));
        assert_eq!(scale.lookup(&Key("b".into())), Some(Mark(2)));
        assert_eq!(scale.lookup(&Key("d".into())), Some(Mark(0)));
    }

    #[test]
    fn test_copy_is_independent() {
        let mut a = OrdinalScale::default().with_range(["foo", "bar"]);
        let b = a.copy();
        a.lookup_or_insert("k");
        assert!(b.domain().is_empty());
    }

    #[test]
    fn test_from_config() {
        let config: OrdinalScaleConfig<String, String> = serde_json::from_str(
            r#"{"domain": ["a", "b"], "range": ["red", "blue"], "unknown": {"value": "gray"}}"#,
        )
        .unwrap();
        let scale = OrdinalScale::new(&config);
        assert_eq!(scale.lookup(&"b".to_string()), Some("blue".to_string()));
        assert_eq!(scale.lookup(&"q".to_string()), Some("gray".to_string()));

        let config: OrdinalScaleConfig<String, String> =
            serde_json::from_str(r#"{"range": ["red"]}"#).unwrap();
        assert_eq!(config.unknown, Unknown::Implicit);
    }
}
