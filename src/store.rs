//! Read-only in-memory view over the loaded flower records.
//!
//! Records keep their load order; sorting is done per call by
//! [`RecordStore::list_all`]. The store is never mutated after
//! construction, so it is shared as `Arc<RecordStore>`.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::models::{FlowerRecord, LoadWarning, SourceFile};

/// Bookkeeping from the load that produced a store.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub sources: Vec<SourceFile>,
    pub warnings: Vec<LoadWarning>,
    /// Rows parsed across all files, before deduplication.
    pub rows_read: usize,
    pub duplicates: usize,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<FlowerRecord>,
    by_name: HashMap<String, usize>,
    report: LoadReport,
}

impl RecordStore {
    /// Builds a store from records with unique names.
    ///
    /// If a name repeats anyway, lookups resolve to its first occurrence
    /// and later ones are dropped.
    pub fn new(records: Vec<FlowerRecord>, report: LoadReport) -> Self {
        let mut by_name = HashMap::with_capacity(records.len());
        let mut unique = Vec::with_capacity(records.len());
        for record in records {
            if by_name.contains_key(&record.name) {
                continue;
            }
            by_name.insert(record.name.clone(), unique.len());
            unique.push(record);
        }
        Self {
            records: unique,
            by_name,
            report,
        }
    }

    pub fn from_records(records: Vec<FlowerRecord>) -> Self {
        Self::new(records, LoadReport::default())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in load order.
    pub fn iter(&self) -> impl Iterator<Item = &FlowerRecord> {
        self.records.iter()
    }

    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    pub fn sources(&self) -> &[SourceFile] {
        &self.report.sources
    }

    pub fn warnings(&self) -> &[LoadWarning] {
        &self.report.warnings
    }

    /// Exact, case-sensitive lookup by primary key.
    pub fn get_by_name(&self, name: &str) -> Option<&FlowerRecord> {
        self.by_name.get(name).map(|&idx| &self.records[idx])
    }

    /// Every record, sorted ascending by name.
    pub fn list_all(&self) -> Vec<&FlowerRecord> {
        let mut all: Vec<&FlowerRecord> = self.records.iter().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }

    /// Sorted names, for selection lists.
    pub fn names(&self) -> Vec<&str> {
        self.list_all().into_iter().map(|r| r.name.as_str()).collect()
    }

    /// Case-insensitive substring match against every field.
    ///
    /// An empty query matches nothing. Results keep load order.
    pub fn search(&self, query: &str) -> Vec<&FlowerRecord> {
        if query.is_empty() {
            return Vec::new();
        }
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                record
                    .fields()
                    .iter()
                    .any(|value| value.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Uniformly random record; `None` only when the store is empty.
    pub fn random_pick(&self) -> Option<&FlowerRecord> {
        self.random_pick_with(&mut rand::thread_rng())
    }

    pub fn random_pick_with<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&FlowerRecord> {
        self.records.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn flower(name: &str, meaning: &str, trivia: &str) -> FlowerRecord {
        FlowerRecord {
            name: name.to_string(),
            meaning: meaning.to_string(),
            trivia: trivia.to_string(),
            ..Default::default()
        }
    }

    fn sample_store() -> RecordStore {
        RecordStore::from_records(vec![
            flower("Tulip", "Perfect love", "Once worth more than houses"),
            flower("Rose", "Love", "Thorns are prickles"),
            flower("Daisy", "Innocence", "Opens at dawn"),
            flower("anemone", "Anticipation", ""),
        ])
    }

    #[test]
    fn test_get_by_name_exact() {
        let store = sample_store();
        assert_eq!(store.get_by_name("Rose").unwrap().meaning, "Love");
        assert!(store.get_by_name("rose").is_none());
        assert!(store.get_by_name("Orchid").is_none());
    }

    #[test]
    fn test_list_all_sorted_case_sensitive() {
        let store = sample_store();
        assert_eq!(store.names(), vec!["Daisy", "Rose", "Tulip", "anemone"]);
        // load order untouched
        let order: Vec<&str> = store.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["Tulip", "Rose", "Daisy", "anemone"]);
    }

    #[test]
    fn test_search_any_field_case_insensitive() {
        let store = sample_store();
        let names: Vec<&str> = store.search("LOVE").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Tulip", "Rose"]);

        let names: Vec<&str> = store.search("dawn").iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Daisy"]);
    }

    #[test]
    fn test_search_is_literal() {
        let store = sample_store();
        assert!(store.search("L.ve").is_empty());
    }

    #[test]
    fn test_search_empty_query_matches_nothing() {
        assert!(sample_store().search("").is_empty());
    }

    #[test]
    fn test_duplicates_keep_first() {
        let store = RecordStore::from_records(vec![
            flower("Rose", "first", ""),
            flower("Rose", "second", ""),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get_by_name("Rose").unwrap().meaning, "first");
    }

    #[test]
    fn test_random_pick_stays_in_store() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let pick = store.random_pick_with(&mut rng).unwrap();
            assert!(store.get_by_name(&pick.name).is_some());
        }
    }

    #[test]
    fn test_random_pick_roughly_uniform() {
        let store = sample_store();
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<&str, usize> = HashMap::new();
        let trials = 4000;
        for _ in 0..trials {
            let pick = store.random_pick_with(&mut rng).unwrap();
            *counts.entry(pick.name.as_str()).or_default() += 1;
        }
        assert_eq!(counts.len(), 4);
        for count in counts.values() {
            // expected 1000 each
            assert!((800..1200).contains(count), "skewed: {:?}", counts);
        }
    }

    #[test]
    fn test_random_pick_empty_store() {
        assert!(RecordStore::default().random_pick().is_none());
    }
}
