//! Multi-ticker rebasing for comparison charts.
//!
//! Every series is scaled so its first value is 100. Two alignment modes:
//! - `Positional`: each series is rebased on its own first close and
//!   compared index by index, whatever its dates.
//! - `ByDate`: all series are first cut down to the dates they all share,
//!   then rebased at the first common date.
//!
//! Series that are empty, or whose base value is zero or not finite, are
//! left out of the result rather than filled with NaN.

use crate::domain::BarSeries;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Value every rebased series starts at.
pub const REBASE_VALUE: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignmentPolicy {
    #[default]
    Positional,
    ByDate,
}

/// One rebased series and the dates of its points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedSeries {
    pub dates: Vec<NaiveDate>,
    pub values: Vec<f64>,
}

/// Ticker → rebased series, in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonSet {
    pub series: IndexMap<String, NormalizedSeries>,
}

impl ComparisonSet {
    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn get(&self, ticker: &str) -> Option<&NormalizedSeries> {
        self.series.get(ticker)
    }

    pub fn tickers(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }
}

/// Rebase each close sequence to start at 100.
///
/// `[50, 55, 45]` becomes `[100, 110, 90]`. Excluded inputs (empty, zero or
/// non-finite first value) are absent from the output.
pub fn normalize(series: &IndexMap<String, Vec<f64>>) -> IndexMap<String, Vec<f64>> {
    series
        .iter()
        .filter_map(|(ticker, closes)| rebase(closes).map(|v| (ticker.clone(), v)))
        .collect()
}

fn rebase(closes: &[f64]) -> Option<Vec<f64>> {
    let base = *closes.first()?;
    if base == 0.0 || !base.is_finite() {
        return None;
    }
    Some(closes.iter().map(|c| c / base * REBASE_VALUE).collect())
}

/// Build the comparison set for a batch of series.
pub fn build_comparison(series: &[BarSeries], policy: AlignmentPolicy) -> ComparisonSet {
    let common: Option<BTreeSet<NaiveDate>> = match policy {
        AlignmentPolicy::Positional => None,
        AlignmentPolicy::ByDate => Some(common_dates(series)),
    };

    let mut out = IndexMap::new();
    for s in series {
        let (dates, closes): (Vec<NaiveDate>, Vec<f64>) = s
            .bars()
            .iter()
            .filter(|b| common.as_ref().map_or(true, |c| c.contains(&b.date)))
            .map(|b| (b.date, b.close))
            .unzip();

        if let Some(values) = rebase(&closes) {
            out.insert(s.ticker().to_string(), NormalizedSeries { dates, values });
        }
    }
    ComparisonSet { series: out }
}

/// Dates present in every non-empty series.
fn common_dates(series: &[BarSeries]) -> BTreeSet<NaiveDate> {
    let mut non_empty = series.iter().filter(|s| !s.is_empty());
    let Some(first) = non_empty.next() else {
        return BTreeSet::new();
    };
    let mut common: BTreeSet<NaiveDate> = first.dates().into_iter().collect();
    for s in non_empty {
        let dates: BTreeSet<NaiveDate> = s.dates().into_iter().collect();
        common.retain(|d| dates.contains(d));
    }
    common
}
