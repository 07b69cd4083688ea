use serde::{Deserialize, Serialize};

/// One concert row after cleaning.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CleanRecord {
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Venue")]
    pub venue: Option<String>,
    pub tickets_sold: u64,
    pub tickets_available: u64,
    /// Gross revenue in dollars; `0.0` when the source value was absent or unparsable.
    #[serde(rename = "Revenue")]
    pub revenue: f64,
    /// `None` when no tickets were sold.
    #[serde(rename = "Cost_per_ticket")]
    pub cost_per_ticket: Option<f64>,
    #[serde(rename = "Tour")]
    pub tour: Option<String>,
    #[serde(rename = "Opening_act")]
    pub opening_act: Option<String>,
}

/// Display order of the cleaned columns.
pub const COLUMNS: [&str; 9] = [
    "City",
    "Country",
    "Venue",
    "tickets_sold",
    "tickets_available",
    "Revenue",
    "Cost_per_ticket",
    "Tour",
    "Opening_act",
];
