use serde::{Deserialize, Deserializer};

/// Cell texts treated as "no value", in addition to the empty cell.
const MISSING_MARKERS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "#N/A N/A",
    "#NA", "<NA>", "1.#IND", "1.#QNAN", "-1.#IND", "-1.#QNAN",
];

/// One concert row as it appears in the source file, before any cleaning.
///
/// Headers are matched against the names used by the published tour sheet
/// (`Opening act(s)`, `Attendance (tickets sold / available)`) and against
/// the short names the dashboards rename them to.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "City", default, deserialize_with = "missing_as_none")]
    pub city: Option<String>,

    #[serde(rename = "Country", default, deserialize_with = "missing_as_none")]
    pub country: Option<String>,

    #[serde(rename = "Venue", default, deserialize_with = "missing_as_none")]
    pub venue: Option<String>,

    #[serde(
        rename = "Opening act(s)",
        alias = "Opening_act",
        default,
        deserialize_with = "missing_as_none"
    )]
    pub opening_act: Option<String>,

    #[serde(
        rename = "Attendance (tickets sold / available)",
        alias = "Tickets_sold_and_available",
        alias = "Attendance",
        default,
        deserialize_with = "missing_as_none"
    )]
    pub attendance: Option<String>,

    #[serde(rename = "Revenue", default, deserialize_with = "missing_as_none")]
    pub revenue: Option<String>,

    #[serde(rename = "Tour", default, deserialize_with = "missing_as_none")]
    pub tour: Option<String>,
}

/// True when `raw` (after trimming) denotes an absent value.
pub fn is_missing_marker(raw: &str) -> bool {
    let t = raw.trim();
    t.is_empty() || MISSING_MARKERS.contains(&t)
}

fn missing_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|s| {
        if is_missing_marker(&s) {
            None
        } else {
            Some(s.trim().to_string())
        }
    }))
}
