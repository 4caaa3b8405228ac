use chrono::NaiveDate;

use super::model::{IncidentDataset, IncidentRecord};

// ---------------------------------------------------------------------------
// Date selection
// ---------------------------------------------------------------------------

/// A date picker selection. The picker can report one endpoint or two.
///
/// * `Single(d)` selects the one day `d`.
/// * `Range { start, end }` selects `start..=end`; a reversed range
///   (`start > end`) selects only `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateSelection {
    Single(NaiveDate),
    Range { start: NaiveDate, end: NaiveDate },
}

impl DateSelection {
    /// Build a selection from optional endpoints. One endpoint gives a
    /// single-day selection; none gives no selection.
    pub fn from_endpoints(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<Self> {
        match (start, end) {
            (Some(start), Some(end)) => Some(DateSelection::Range { start, end }),
            (Some(day), None) | (None, Some(day)) => Some(DateSelection::Single(day)),
            (None, None) => None,
        }
    }

    /// Inclusive `(first, last)` day window.
    pub fn window(&self) -> (NaiveDate, NaiveDate) {
        match *self {
            DateSelection::Single(day) => (day, day),
            DateSelection::Range { start, end } if start > end => (start, start),
            DateSelection::Range { start, end } => (start, end),
        }
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        let (first, last) = self.window();
        first <= day && day <= last
    }
}

// ---------------------------------------------------------------------------
// Incident filter
// ---------------------------------------------------------------------------

/// User-selected predicates. `None` means "no constraint"; all present
/// predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    /// Exact, case-sensitive country match.
    pub country: Option<String>,
    /// Exact match on the normalized pollution type.
    pub pollution_type: Option<String>,
    /// Rows without a date never pass an active date selection.
    pub dates: Option<DateSelection>,
}

impl IncidentFilter {
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    pub fn with_pollution_type(mut self, pollution_type: impl Into<String>) -> Self {
        self.pollution_type = Some(pollution_type.into());
        self
    }

    pub fn with_dates(mut self, dates: DateSelection) -> Self {
        self.dates = Some(dates);
        self
    }

    pub fn matches(&self, rec: &IncidentRecord) -> bool {
        if let Some(country) = &self.country {
            if rec.country.as_deref() != Some(country.as_str()) {
                return false;
            }
        }
        if let Some(ptype) = &self.pollution_type {
            if rec.pollution_type != *ptype {
                return false;
            }
        }
        if let Some(dates) = &self.dates {
            match rec.incident_day() {
                Some(day) if dates.contains(day) => {}
                _ => return false,
            }
        }
        true
    }

    /// Conjunction of two filters, or `None` when no row can satisfy both.
    pub fn and(&self, other: &IncidentFilter) -> Option<IncidentFilter> {
        fn both<T: Clone + PartialEq>(a: &Option<T>, b: &Option<T>) -> Option<Option<T>> {
            match (a, b) {
                (Some(x), Some(y)) if x != y => None,
                (Some(x), _) | (None, Some(x)) => Some(Some(x.clone())),
                (None, None) => Some(None),
            }
        }

        let dates = match (self.dates, other.dates) {
            (Some(a), Some(b)) => {
                let (a_first, a_last) = a.window();
                let (b_first, b_last) = b.window();
                let first = a_first.max(b_first);
                let last = a_last.min(b_last);
                if first > last {
                    return None;
                }
                Some(DateSelection::Range {
                    start: first,
                    end: last,
                })
            }
            (a, b) => a.or(b),
        };

        Some(IncidentFilter {
            country: both(&self.country, &other.country)?,
            pollution_type: both(&self.pollution_type, &other.pollution_type)?,
            dates,
        })
    }
}

/// Return indices of incidents that pass every active predicate.
pub fn filtered_indices(dataset: &IncidentDataset, filter: &IncidentFilter) -> Vec<usize> {
    dataset
        .records
        .iter()
        .enumerate()
        .filter(|(_, rec)| filter.matches(rec))
        .map(|(i, _)| i)
        .collect()
}

/// Build a new dataset holding only the incidents that pass `filter`.
/// The input is left untouched.
pub fn filter_dataset(dataset: &IncidentDataset, filter: &IncidentFilter) -> IncidentDataset {
    dataset.subset(&filtered_indices(dataset, filter))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::test_support::*;

    fn sample() -> IncidentDataset {
        let with_time = day(2020, 12, 31).and_hms_opt(23, 59, 0).unwrap();
        dataset(vec![
            record("Indonesia", "Oil Spill", Some(at_midnight(2020, 1, 1))),
            record("Indonesia", "Plastic Waste", Some(with_time)),
            record("Indonesia", "Oil Spill", Some(at_midnight(2021, 1, 1))),
            record("Indonesia", "Oil Spill", None),
            record("Malaysia", "Oil Spill", Some(at_midnight(2020, 6, 1))),
            record("indonesia", "Oil Spill", Some(at_midnight(2020, 6, 1))),
        ])
    }

    #[test]
    fn country_and_year_window() {
        let ds = sample();
        let filter = IncidentFilter::default()
            .with_country("Indonesia")
            .with_dates(DateSelection::Range {
                start: day(2020, 1, 1),
                end: day(2020, 12, 31),
            });

        assert_eq!(filtered_indices(&ds, &filter), vec![0, 1]);
    }

    #[test]
    fn unconstrained_filter_keeps_everything() {
        let ds = sample();
        let filtered = filter_dataset(&ds, &IncidentFilter::default());
        assert_eq!(filtered, ds);
    }

    #[test]
    fn country_match_is_case_sensitive() {
        let ds = sample();
        let filter = IncidentFilter::default().with_country("indonesia");
        assert_eq!(filtered_indices(&ds, &filter), vec![5]);
    }

    #[test]
    fn date_selection_drops_undated_rows() {
        let ds = sample();
        let filter = IncidentFilter::default().with_dates(DateSelection::Range {
            start: day(1900, 1, 1),
            end: day(2100, 1, 1),
        });
        assert!(!filtered_indices(&ds, &filter).contains(&3));
    }

    #[test]
    fn single_and_reversed_selections() {
        let d = day(2020, 6, 1);
        assert_eq!(DateSelection::Single(d).window(), (d, d));
        let reversed = DateSelection::Range {
            start: d,
            end: day(2020, 1, 1),
        };
        assert_eq!(reversed.window(), (d, d));
        assert_eq!(
            DateSelection::from_endpoints(None, Some(d)),
            Some(DateSelection::Single(d))
        );
        assert_eq!(DateSelection::from_endpoints(None, None), None);

        let ds = sample();
        let filter = IncidentFilter::default().with_dates(reversed);
        assert_eq!(filtered_indices(&ds, &filter), vec![4, 5]);
    }

    #[test]
    fn empty_result_is_not_an_error() {
        let ds = sample();
        let filter = IncidentFilter::default().with_country("Atlantis");
        let filtered = filter_dataset(&ds, &filter);
        assert!(filtered.is_empty());
        assert_eq!(filtered.column_names, ds.column_names);
        assert!(filtered.date_bounds.is_none());
    }

    #[test]
    fn filters_compose_conjunctively() {
        let ds = sample();
        let a = IncidentFilter::default().with_country("Indonesia");
        let b = IncidentFilter::default()
            .with_pollution_type("Oil Spill")
            .with_dates(DateSelection::Range {
                start: day(2019, 1, 1),
                end: day(2020, 12, 31),
            });

        let combined = a.and(&b).unwrap();
        let twice = filter_dataset(&filter_dataset(&ds, &a), &b);
        assert_eq!(twice, filter_dataset(&ds, &combined));
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn contradictory_filters_do_not_combine() {
        let a = IncidentFilter::default().with_country("Indonesia");
        let b = IncidentFilter::default().with_country("Malaysia");
        assert_eq!(a.and(&b), None);

        let early = IncidentFilter::default().with_dates(DateSelection::Single(day(2020, 1, 1)));
        let late = IncidentFilter::default().with_dates(DateSelection::Single(day(2021, 1, 1)));
        assert_eq!(early.and(&late), None);
    }

    #[test]
    fn filtering_does_not_mutate_input() {
        let ds = sample();
        let before = ds.clone();
        let _ = filter_dataset(&ds, &IncidentFilter::default().with_country("Malaysia"));
        assert_eq!(ds, before);
    }
}
