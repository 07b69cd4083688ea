// src/report/chart.rs

use serde::Serialize;
use std::collections::BTreeMap;

use super::stats;
use crate::process::CleanRecord;

/// Bin count used for the revenue distribution.
pub const DEFAULT_BINS: usize = 20;

/// Cleaned columns [`numeric_column`] can read, in display order.
pub const NUMERIC_COLUMNS: [&str; 4] = ["tickets_sold", "tickets_available", "Revenue", "Cost_per_ticket"];

/// Mean cost per ticket for one tour (one bar of the bar chart).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TourMean {
    pub tour: String,
    pub mean_cost_per_ticket: Option<f64>,
}

/// Mean cost per ticket grouped by tour, sorted by tour name.
/// Rows without a tour are not grouped.
pub fn mean_cost_by_tour<'a, I>(records: I) -> Vec<TourMean>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let mut groups: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for r in records {
        if let Some(tour) = r.tour.as_deref() {
            groups.entry(tour).or_default().push(r.cost_per_ticket);
        }
    }
    groups
        .into_iter()
        .map(|(tour, costs)| TourMean {
            tour: tour.to_string(),
            mean_cost_per_ticket: stats::mean(costs),
        })
        .collect()
}

/// One histogram bar covering `[lower, upper)`; the last bin is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Equal-width bins spanning the min..max of `values`.
    ///
    /// A constant column is widened on each side by half its magnitude
    /// (at least 0.5). Empty input (or `bins == 0`) yields no bins.
    pub fn build<I>(values: I, bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let xs: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if xs.is_empty() || bins == 0 {
            return Self::default();
        }

        let (mut lo, mut hi) = xs
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if lo == hi {
            let pad = lo.abs().max(1.0) * 0.5;
            lo -= pad;
            hi += pad;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for v in xs {
            let idx = (((v - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        let bins = counts
            .into_iter()
            .enumerate()
            .map(|(i, count)| Bin {
                lower: lo + width * i as f64,
                upper: if i + 1 == bins {
                    hi
                } else {
                    lo + width * (i + 1) as f64
                },
                count,
            })
            .collect();
        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Values of a numeric cleaned column by its display name, or `None` when
/// the column is text (or unknown). Missing costs stay `None`.
pub fn numeric_column<'a, I>(records: I, column: &str) -> Option<Vec<Option<f64>>>
where
    I: IntoIterator<Item = &'a CleanRecord>,
{
    let pick: fn(&CleanRecord) -> Option<f64> = match column {
        "Revenue" => |r: &CleanRecord| Some(r.revenue),
        "tickets_sold" => |r: &CleanRecord| Some(r.tickets_sold as f64),
        "tickets_available" => |r: &CleanRecord| Some(r.tickets_available as f64),
        "Cost_per_ticket" => |r: &CleanRecord| r.cost_per_ticket,
        _ => return None,
    };
    Some(records.into_iter().map(pick).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(tour: Option<&str>, cost: Option<f64>) -> CleanRecord {
        CleanRecord {
            tour: tour.map(String::from),
            cost_per_ticket: cost,
            ..Default::default()
        }
    }

    #[test]
    fn groups_means_sorted_by_tour() {
        let records = vec![
            rec(Some("Red"), Some(50.0)),
            rec(Some("Eras"), Some(200.0)),
            rec(None, Some(1_000.0)),
            rec(Some("Red"), Some(70.0)),
            rec(Some("Eras"), None),
            rec(Some("Fearless"), None),
        ];

        let means = mean_cost_by_tour(&records);
        assert_eq!(
            means,
            vec![
                TourMean { tour: "Eras".into(), mean_cost_per_ticket: Some(200.0) },
                TourMean { tour: "Fearless".into(), mean_cost_per_ticket: None },
                TourMean { tour: "Red".into(), mean_cost_per_ticket: Some(60.0) },
            ]
        );
    }

    #[test]
    fn histogram_bins_span_range() {
        let h = Histogram::build([0.0, 1.0, 2.0, 3.0, 4.0, 10.0], 5);
        assert_eq!(h.bins.len(), 5);
        assert_eq!(h.bins[0].lower, 0.0);
        assert_eq!(h.bins[4].upper, 10.0);
        let counts: Vec<usize> = h.bins.iter().map(|b| b.count).collect();
        // width 2: [0,2) [2,4) [4,6) [6,8) [8,10]
        assert_eq!(counts, vec![2, 2, 1, 0, 1]);
        assert_eq!(h.total(), 6);
    }

    #[test]
    fn constant_values_widen_range() {
        let h = Histogram::build([5.0, 5.0], DEFAULT_BINS);
        assert_eq!(h.bins.len(), DEFAULT_BINS);
        // half of |5| on each side
        assert_eq!(h.bins[0].lower, 2.5);
        assert_eq!(h.bins[DEFAULT_BINS - 1].upper, 7.5);
        assert_eq!(h.total(), 2);
    }

    #[test]
    fn constant_large_values_keep_distinct_edges() {
        let v = 3.0e17;
        let h = Histogram::build([v, v, v], 4);
        assert!(h.bins[0].lower < v);
        assert!(h.bins[3].upper > v);
        for b in &h.bins {
            assert!(b.lower < b.upper, "bin {b:?} has no width");
        }
        assert_eq!(h.total(), 3);
    }

    #[test]
    fn empty_histogram() {
        assert!(Histogram::build(Vec::<f64>::new(), 20).bins.is_empty());
        assert!(Histogram::build([1.0], 0).bins.is_empty());
    }

    #[test]
    fn numeric_columns_by_name() {
        let records = vec![rec(Some("Eras"), Some(2.5)), rec(Some("Eras"), None)];
        assert_eq!(
            numeric_column(&records, "Cost_per_ticket"),
            Some(vec![Some(2.5), None])
        );
        assert_eq!(
            numeric_column(&records, "tickets_sold"),
            Some(vec![Some(0.0), Some(0.0)])
        );
        assert_eq!(numeric_column(&records, "Tour"), None);
        for column in NUMERIC_COLUMNS {
            assert!(numeric_column(&records, column).is_some(), "{column}");
        }
    }
}
