#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Aggregate statistics over the business dataset.
//!
//! Every function is a single pass over an in-memory slice of
//! [`BusinessRecord`]s. Business names are grouped by exact string
//! equality; records without a name share the empty-string key.

pub mod date;

use std::collections::{BTreeMap, BTreeSet};
use std::collections::btree_map::Entry;

use la_business_models::BusinessRecord;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur during aggregation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The aggregate has no value over zero records.
    #[error("Dataset is empty")]
    EmptyDataset,
}

/// A business name with the number of location rows it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationCount {
    /// Business name (empty for records without one).
    pub business_name: String,
    /// Number of records carrying that name.
    pub locations_count: usize,
}

/// Returns the number of distinct business names.
#[must_use]
pub fn unique_count(list: &[BusinessRecord]) -> usize {
    list.iter()
        .map(BusinessRecord::name_key)
        .collect::<BTreeSet<_>>()
        .len()
}

/// Returns the "oldest" business by location start date.
///
/// This is a left fold seeded with the first record, not a plain minimum.
/// For each later record the running result is kept when the record has no
/// start date, or when the running result's date is strictly earlier than
/// the record's date. In every other case the record replaces the running
/// result. Unparsable dates never compare as earlier, so:
///
/// - a running result without a usable date is replaced by the next record
///   that has any non-empty date text;
/// - a record with non-empty but unparsable date text replaces the running
///   result;
/// - of two records with the same date, the later one wins.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if `list` is empty.
pub fn oldest(list: &[BusinessRecord]) -> Result<&BusinessRecord, AnalyticsError> {
    let (first, rest) = list.split_first().ok_or(AnalyticsError::EmptyDataset)?;

    Ok(rest.iter().fold(first, |best, current| {
        let Some(current_date) = current.start_date() else {
            return best;
        };
        if starts_before(best.start_date(), current_date) {
            best
        } else {
            current
        }
    }))
}

/// `true` only when both dates parse and `best` is strictly earlier.
fn starts_before(best: Option<&str>, current: &str) -> bool {
    match (
        best.and_then(date::parse_date_millis),
        date::parse_date_millis(current),
    ) {
        (Some(best), Some(current)) => best < current,
        _ => false,
    }
}

/// Returns the business name with the most location rows.
///
/// Names are counted in first-seen order and a later name only takes over
/// with a strictly greater count, so ties go to the name seen first.
///
/// # Errors
///
/// Returns [`AnalyticsError::EmptyDataset`] if `list` is empty.
pub fn most_locations(list: &[BusinessRecord]) -> Result<LocationCount, AnalyticsError> {
    let mut counts: Vec<(&str, usize)> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();

    for record in list {
        let key = record.name_key();
        match index.entry(key) {
            Entry::Occupied(slot) => counts[*slot.get()].1 += 1,
            Entry::Vacant(slot) => {
                slot.insert(counts.len());
                counts.push((key, 1));
            }
        }
    }

    let (name, count) = counts
        .into_iter()
        .reduce(|best, current| if current.1 > best.1 { current } else { best })
        .ok_or(AnalyticsError::EmptyDataset)?;

    Ok(LocationCount {
        business_name: name.to_string(),
        locations_count: count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(names: &[&str]) -> Vec<BusinessRecord> {
        names.iter().map(|n| BusinessRecord::named(*n)).collect()
    }

    fn dated(entries: &[(&str, Option<&str>)]) -> Vec<BusinessRecord> {
        entries
            .iter()
            .map(|(name, date)| match date {
                Some(date) => BusinessRecord::named(*name).with_start_date(*date),
                None => BusinessRecord::named(*name),
            })
            .collect()
    }

    #[test]
    fn counts_unique_names() {
        assert_eq!(unique_count(&named(&["A", "A", "B"])), 2);
    }

    #[test]
    fn unique_count_of_empty_is_zero() {
        assert_eq!(unique_count(&[]), 0);
    }

    #[test]
    fn unnamed_records_share_one_key() {
        let list = vec![
            BusinessRecord::default(),
            BusinessRecord::named(""),
            BusinessRecord::named("A"),
        ];
        assert_eq!(unique_count(&list), 2);
    }

    #[test]
    fn names_are_case_sensitive() {
        assert_eq!(unique_count(&named(&["Acme", "ACME", "acme"])), 3);
    }

    #[test]
    fn most_locations_picks_largest_group() {
        assert_eq!(
            most_locations(&named(&["A", "B", "B"])).unwrap(),
            LocationCount {
                business_name: "B".to_string(),
                locations_count: 2,
            }
        );
    }

    #[test]
    fn most_locations_tie_keeps_first_seen() {
        let result = most_locations(&named(&["B", "A", "A", "B", "C"])).unwrap();
        assert_eq!(result.business_name, "B");
        assert_eq!(result.locations_count, 2);
    }

    #[test]
    fn most_locations_groups_unnamed_as_empty() {
        let list = vec![
            BusinessRecord::default(),
            BusinessRecord::default(),
            BusinessRecord::named("A"),
        ];
        let result = most_locations(&list).unwrap();
        assert_eq!(result.business_name, "");
        assert_eq!(result.locations_count, 2);
    }

    #[test]
    fn most_locations_serializes_api_shape() {
        let json = serde_json::to_value(most_locations(&named(&["A"])).unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "business_name": "A", "locations_count": 1 })
        );
    }

    #[test]
    fn oldest_follows_fold() {
        // 2020 -> 2019 replaces (2020 is not earlier than 2019);
        // 2019 -> 2021 keeps (2019 is earlier than 2021).
        let list = dated(&[
            ("first", Some("2020-01-01")),
            ("second", Some("2019-01-01")),
            ("third", Some("2021-01-01")),
        ]);
        assert_eq!(oldest(&list).unwrap().name_key(), "second");
    }

    #[test]
    fn oldest_single_record() {
        let list = dated(&[("only", None)]);
        assert_eq!(oldest(&list).unwrap().name_key(), "only");
    }

    #[test]
    fn oldest_skips_records_without_date() {
        let list = dated(&[
            ("first", Some("2019-01-01")),
            ("missing", None),
            ("empty", Some("")),
        ]);
        assert_eq!(oldest(&list).unwrap().name_key(), "first");
    }

    #[test]
    fn oldest_replaces_undated_first_record() {
        let list = dated(&[
            ("undated", None),
            ("late", Some("2021-01-01")),
            ("early", Some("2019-01-01")),
        ]);
        assert_eq!(oldest(&list).unwrap().name_key(), "early");
    }

    #[test]
    fn oldest_takes_unparsable_later_date() {
        let list = dated(&[("dated", Some("2019-01-01")), ("garbage", Some("someday"))]);
        assert_eq!(oldest(&list).unwrap().name_key(), "garbage");
    }

    #[test]
    fn oldest_is_not_a_plain_minimum() {
        // The garbage date takes over, then any dated record replaces it.
        let list = dated(&[
            ("earliest", Some("1990-01-01")),
            ("garbage", Some("n/a")),
            ("recent", Some("2022-06-01")),
        ]);
        assert_eq!(oldest(&list).unwrap().name_key(), "recent");
    }

    #[test]
    fn oldest_equal_dates_prefer_later_record() {
        let list = dated(&[
            ("first", Some("2019-01-01T00:00:00.000")),
            ("second", Some("2019-01-01")),
        ]);
        assert_eq!(oldest(&list).unwrap().name_key(), "second");
    }

    #[test]
    fn empty_dataset_fails() {
        assert_eq!(oldest(&[]).unwrap_err(), AnalyticsError::EmptyDataset);
        assert_eq!(most_locations(&[]).unwrap_err(), AnalyticsError::EmptyDataset);
    }
}
