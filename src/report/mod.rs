// src/report/mod.rs
pub mod chart;
pub mod stats;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::process::{CleanRecord, COLUMNS};
pub use chart::{
    mean_cost_by_tour, numeric_column, Bin, Histogram, TourMean, DEFAULT_BINS, NUMERIC_COLUMNS,
};
pub use stats::Summary;

/// Selection text that disables tour filtering.
pub const ALL_TOURS: &str = "All";

/// Which tour(s) a view covers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TourFilter {
    #[default]
    All,
    Tour(String),
}

impl TourFilter {
    /// `"All"` selects everything; any other text is an exact tour name.
    pub fn parse(selection: &str) -> Self {
        if selection == ALL_TOURS {
            TourFilter::All
        } else {
            TourFilter::Tour(selection.to_string())
        }
    }

    pub fn matches(&self, record: &CleanRecord) -> bool {
        match self {
            TourFilter::All => true,
            TourFilter::Tour(t) => record.tour.as_deref() == Some(t.as_str()),
        }
    }
}

impl fmt::Display for TourFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TourFilter::All => f.write_str(ALL_TOURS),
            TourFilter::Tour(t) => f.write_str(t),
        }
    }
}

/// The cleaned table of one session. Built once from a load and only read
/// afterwards; loading again means building a new dataset.
#[derive(Debug, Clone)]
pub struct TourDataset {
    source: String,
    loaded_at: DateTime<Utc>,
    records: Vec<CleanRecord>,
}

impl TourDataset {
    pub fn new(source: impl Into<String>, records: Vec<CleanRecord>) -> Self {
        Self {
            source: source.into(),
            loaded_at: Utc::now(),
            records,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct tours in order of first appearance, missing tours skipped.
    pub fn tours(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for t in self.records.iter().filter_map(|r| r.tour.as_deref()) {
            if !seen.contains(&t) {
                seen.push(t);
            }
        }
        seen
    }

    /// Records matching `filter`, keeping their relative order.
    pub fn filter(&self, filter: &TourFilter) -> Vec<&CleanRecord> {
        self.records.iter().filter(|r| filter.matches(r)).collect()
    }

    /// Everything the dashboard shows for one tour selection.
    pub fn report(&self, filter: &TourFilter, bins: usize) -> Report {
        let rows = self.filter(filter);
        let numeric_summaries = NUMERIC_COLUMNS
            .iter()
            .filter_map(|&column| {
                let values = numeric_column(rows.iter().copied(), column)?;
                Some(ColumnSummary {
                    column: column.to_string(),
                    summary: Summary::describe(values),
                })
            })
            .collect();
        Report {
            source: self.source.clone(),
            loaded_at: self.loaded_at,
            tour: filter.to_string(),
            rows: rows.len(),
            columns: COLUMNS.len(),
            metrics: KeyMetrics::compute(rows.iter().copied()),
            numeric_summaries,
            cost_per_ticket: Summary::describe(rows.iter().map(|r| r.cost_per_ticket)),
            mean_cost_by_tour: mean_cost_by_tour(rows.iter().copied()),
            revenue_histogram: Histogram::build(rows.iter().map(|r| r.revenue), bins),
        }
    }
}

/// Headline numbers for a selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KeyMetrics {
    pub total_revenue: f64,
    pub total_tickets_sold: u64,
    /// Mean over rows with a defined cost per ticket.
    pub avg_cost_per_ticket: Option<f64>,
}

impl KeyMetrics {
    pub fn compute<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a CleanRecord>,
    {
        let mut total_revenue = 0.0;
        let mut total_tickets_sold = 0u64;
        let mut costs = Vec::new();
        for r in records {
            total_revenue += r.revenue;
            total_tickets_sold = total_tickets_sold.saturating_add(r.tickets_sold);
            costs.push(r.cost_per_ticket);
        }
        Self {
            total_revenue,
            total_tickets_sold,
            avg_cost_per_ticket: stats::mean(costs),
        }
    }
}

/// Describe statistics of one numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub column: String,
    pub summary: Summary,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub source: String,
    pub loaded_at: DateTime<Utc>,
    pub tour: String,
    pub rows: usize,
    pub columns: usize,
    pub metrics: KeyMetrics,
    pub numeric_summaries: Vec<ColumnSummary>,
    pub cost_per_ticket: Summary,
    pub mean_cost_by_tour: Vec<TourMean>,
    pub revenue_histogram: Histogram,
}
