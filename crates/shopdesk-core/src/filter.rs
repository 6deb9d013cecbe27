//! Case-insensitive search over selected record fields

use crate::types::{field_text, Record};

/// Substring search over a fixed set of record keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilter {
    keys: Vec<String>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self::new(["name", "mobile"])
    }
}

impl SearchFilter {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    /// Whether `record` matches `query`; an empty query matches everything
    pub fn matches(&self, record: &Record, query: &str) -> bool {
        let needle = normalize(query);
        needle.is_empty() || self.matches_normalized(record, &needle)
    }

    fn matches_normalized(&self, record: &Record, needle: &str) -> bool {
        self.keys.iter().any(|key| {
            field_text(record, key)
                .map(|value| value.to_lowercase().contains(needle))
                .unwrap_or(false)
        })
    }

    /// Records matching `query`, in their original order
    pub fn apply<'a>(&self, records: &'a [Record], query: &str) -> Vec<&'a Record> {
        let needle = normalize(query);
        records
            .iter()
            .filter(|r| needle.is_empty() || self.matches_normalized(r, &needle))
            .collect()
    }

    /// At most `max` matches for autocomplete; nothing for an empty query
    pub fn suggest<'a>(&self, records: &'a [Record], query: &str, max: usize) -> Vec<&'a Record> {
        let needle = normalize(query);
        if needle.is_empty() {
            return Vec::new();
        }
        records
            .iter()
            .filter(|r| self.matches_normalized(r, &needle))
            .take(max)
            .collect()
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records() -> Vec<Record> {
        vec![
            json!({"id": 1, "name": "Rahim Uddin", "mobile": "01711000001"}),
            json!({"id": 2, "name": "Karim", "mobile": "01811000002"}),
            json!({"id": 3, "name": "Fatema Begum", "mobile": 1911000003u64}),
            json!({"id": 4, "mobile": "01711000004"}),
        ]
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
    }

    fn ids(found: &[&Record]) -> Vec<i64> {
        found.iter().filter_map(|r| r["id"].as_i64()).collect()
    }

    #[test]
    fn test_case_insensitive_name_match() {
        let records = records();
        let filter = SearchFilter::default();
        assert_eq!(ids(&filter.apply(&records, "  RAHIM ")), vec![1]);
        assert_eq!(ids(&filter.apply(&records, "im")), vec![1, 2]);
    }

    #[test]
    fn test_mobile_match_including_numbers() {
        let records = records();
        let filter = SearchFilter::default();
        assert_eq!(ids(&filter.apply(&records, "0171")), vec![1, 4]);
        assert_eq!(ids(&filter.apply(&records, "1911")), vec![3]);
    }

    #[test]
    fn test_empty_query_matches_all() {
        let records = records();
        let filter = SearchFilter::default();
        assert_eq!(filter.apply(&records, "   ").len(), 4);
        assert!(filter.matches(&records[3], ""));
    }

    #[test]
    fn test_missing_key_never_matches() {
        let records = records();
        let filter = SearchFilter::new(["name"]);
        assert!(!filter.matches(&records[3], "0171"));
    }

    #[test]
    fn test_suggest_limits_and_skips_empty() {
        let records = records();
        let filter = SearchFilter::default();
        assert_eq!(ids(&filter.suggest(&records, "01", 2)), vec![1, 2]);
        assert!(filter.suggest(&records, "", 5).is_empty());
        assert!(filter.suggest(&records, "nobody", 5).is_empty());
    }
}
