//! Accumulator types used by the aggregation pass.

use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;

use crate::model::Outcome;
use crate::report::utility::pct;

/// Minimum number of joined subjects a student needs to pass overall.
pub const MIN_SUBJECTS: usize = 5;

/// Minimum overall percentage a student needs to pass overall.
pub const MIN_TOTAL_PERCENTAGE: f64 = 40.0;

/// String-keyed map that iterates in insertion order.
///
/// Report rows, failed students and pass-rate tie-breaks all depend on
/// first-appearance order, so every accumulator is one of these.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }
}

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut V> {
        self.index.get(key).map(|&i| &mut self.entries[i].1)
    }

    /// Inserts or replaces the value for `key`. A replaced key keeps its position.
    pub fn insert(&mut self, key: &str, value: V) {
        match self.index.get(key) {
            Some(&i) => self.entries[i].1 = value,
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), value));
            }
        }
    }

    /// Returns the value for `key`, appending `default()` first if it is new.
    pub fn get_or_insert_with(&mut self, key: &str, default: impl FnOnce() -> V) -> &mut V {
        let i = match self.index.get(key) {
            Some(&i) => i,
            None => {
                let i = self.entries.len();
                self.index.insert(key.to_string(), i);
                self.entries.push((key.to_string(), default()));
                i
            }
        };
        &mut self.entries[i].1
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Maps every value, keeping keys and order.
    pub fn map_values<U>(&self, mut f: impl FnMut(&V) -> U) -> OrderedMap<U> {
        OrderedMap {
            index: self.index.clone(),
            entries: self
                .entries
                .iter()
                .map(|(k, v)| (k.clone(), f(v)))
                .collect(),
        }
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Running totals for one student.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentAggregate {
    pub total_marks: i64,
    pub subject_count: usize,
    pub all_subjects_passed: bool,
}

impl Default for StudentAggregate {
    fn default() -> Self {
        Self {
            total_marks: 0,
            subject_count: 0,
            all_subjects_passed: true,
        }
    }
}

impl StudentAggregate {
    pub fn record(&mut self, marks_obtained: i64, passed: bool) {
        self.total_marks = self.total_marks.saturating_add(marks_obtained);
        self.subject_count += 1;
        self.all_subjects_passed = self.all_subjects_passed && passed;
    }

    /// Every subject is scored out of 100 here, whatever its own maximum.
    pub fn total_percentage(&self) -> f64 {
        pct(self.total_marks as f64, (self.subject_count * 100) as f64)
    }

    /// The composite pass rule. Both the report lines and the failed list use this.
    pub fn outcome(&self) -> Outcome {
        Outcome::from_passed(
            self.subject_count >= MIN_SUBJECTS
                && self.total_percentage() >= MIN_TOTAL_PERCENTAGE
                && self.all_subjects_passed,
        )
    }
}

/// Highest mark seen so far for a subject.
#[derive(Debug, Clone, PartialEq)]
pub struct SubjectTopScore {
    pub student_name: String,
    pub marks: i64,
}

/// Pass counter for a subject.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectPassRate {
    pub pass_count: usize,
    pub total_count: usize,
}

impl SubjectPassRate {
    pub fn record(&mut self, passed: bool) {
        self.total_count += 1;
        if passed {
            self.pass_count += 1;
        }
    }

    pub fn pass_rate(&self) -> f64 {
        pct(self.pass_count as f64, self.total_count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_map_keeps_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("zeta", 1);
        map.insert("alpha", 2);
        map.insert("mid", 3);
        map.insert("zeta", 10);

        let keys: Vec<_> = map.keys().collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("zeta"), Some(&10));
        assert_eq!(map.len(), 3);
    }

    #[test]
    fn test_get_or_insert_with_only_inserts_once() {
        let mut map: OrderedMap<usize> = OrderedMap::new();
        *map.get_or_insert_with("a", || 5) += 1;
        *map.get_or_insert_with("a", || 100) += 1;
        assert_eq!(map.get("a"), Some(&7));
    }

    #[test]
    fn test_ordered_map_serializes_in_order() {
        let mut map = OrderedMap::new();
        map.insert("Physics", vec!["Bob".to_string()]);
        map.insert("Art", vec!["Alice".to_string()]);
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"Physics":["Bob"],"Art":["Alice"]}"#);
    }

    #[test]
    fn test_student_aggregate_pass_flag_never_resets() {
        let mut agg = StudentAggregate::default();
        agg.record(90, true);
        agg.record(10, false);
        agg.record(95, true);
        assert!(!agg.all_subjects_passed);
        assert_eq!(agg.subject_count, 3);
        assert_eq!(agg.total_marks, 195);
    }

    #[test]
    fn test_total_marks_saturate_instead_of_overflowing() {
        let mut agg = StudentAggregate::default();
        agg.record(i64::MAX, true);
        agg.record(10, true);
        assert_eq!(agg.total_marks, i64::MAX);
        assert_eq!(agg.subject_count, 2);
    }

    #[test]
    fn test_total_percentage() {
        let mut agg = StudentAggregate::default();
        for _ in 0..5 {
            agg.record(40, true);
        }
        assert_eq!(agg.total_percentage(), 40.0);
        assert_eq!(agg.outcome(), Outcome::Pass);
    }

    #[test]
    fn test_pass_rate() {
        let mut rate = SubjectPassRate::default();
        rate.record(true);
        rate.record(false);
        rate.record(false);
        rate.record(true);
        assert_eq!(rate.total_count, 4);
        assert_eq!(rate.pass_rate(), 50.0);
    }
}
