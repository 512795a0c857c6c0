//! Read-only MRN search over the case list.

use crate::components::case::Case;

/// Result of filtering cases by MRN.
///
/// The three states are kept distinct so a view can tell "no search active" apart from
/// "searched and found nothing".
#[derive(Debug, PartialEq, Eq)]
pub enum MrnFilter<'a> {
    /// The query was empty; every case is shown.
    Unfiltered(&'a [Case]),
    /// At least one case matched, in original relative order.
    Matches(Vec<&'a Case>),
    /// A query was given and nothing matched.
    NoResults,
}

impl<'a> MrnFilter<'a> {
    /// Cases to display for this filter state.
    pub fn cases(&self) -> Vec<&'a Case> {
        match self {
            MrnFilter::Unfiltered(all) => all.iter().collect(),
            MrnFilter::Matches(found) => found.clone(),
            MrnFilter::NoResults => Vec::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, MrnFilter::Unfiltered(_))
    }
}

/// Filters `cases` by case-insensitive substring match of `query` against each MRN.
///
/// Leading and trailing whitespace in `query` is ignored, so a whitespace-only query counts as
/// empty. The case list is never modified.
pub fn filter_by_mrn<'a>(cases: &'a [Case], query: &str) -> MrnFilter<'a> {
    let query = query.trim();
    if query.is_empty() {
        return MrnFilter::Unfiltered(cases);
    }

    let needle = query.to_lowercase();
    let found: Vec<&Case> = cases
        .iter()
        .filter(|case| case.mrn.to_lowercase().contains(&needle))
        .collect();

    if found.is_empty() {
        MrnFilter::NoResults
    } else {
        MrnFilter::Matches(found)
    }
}
