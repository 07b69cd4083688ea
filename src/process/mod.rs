// src/process/mod.rs
pub mod attendance;
pub mod cost;
pub mod fill;
pub mod record;
pub mod revenue;

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::load::RawRecord;
pub use attendance::{parse_attendance, Attendance};
pub use cost::derive_cost_per_ticket;
pub use fill::{carry_forward, carry_forward_opening_act};
pub use record::{CleanRecord, COLUMNS};
pub use revenue::parse_revenue;

/// Turn raw tour rows into typed records, one output row per input row,
/// in input order.
///
/// Runs in three passes because carry-forward needs the whole sequence:
/// 1) parse revenue and attendance per row,
/// 2) fill missing opening acts from earlier rows,
/// 3) derive cost per ticket per row.
///
/// The first attendance value that contains `/` but does not parse aborts
/// the call with `Error::AttendanceMalformed`.
#[tracing::instrument(level = "info", skip(raw), fields(rows = raw.len()))]
pub fn normalize(raw: &[RawRecord]) -> Result<Vec<CleanRecord>> {
    // ─── 1) per-row parsing ──────────────────────────────────────────
    let mut records = Vec::with_capacity(raw.len());
    for (row, r) in raw.iter().enumerate() {
        let att = parse_attendance(r.attendance.as_deref()).map_err(|e| {
            warn!(row, raw = %e.raw, "attendance not parsable");
            Error::AttendanceMalformed { row, raw: e.raw }
        })?;

        records.push(CleanRecord {
            city: r.city.clone(),
            country: r.country.clone(),
            venue: r.venue.clone(),
            tickets_sold: att.sold,
            tickets_available: att.available,
            revenue: parse_revenue(r.revenue.as_deref()),
            cost_per_ticket: None,
            tour: r.tour.clone(),
            opening_act: r.opening_act.clone(),
        });
    }

    // ─── 2) sequence-wide fill ───────────────────────────────────────
    let missing_acts = records.iter().filter(|r| r.opening_act.is_none()).count();
    carry_forward_opening_act(&mut records);
    debug!(missing_acts, "carried opening acts forward");

    // ─── 3) derived metric ───────────────────────────────────────────
    for rec in records.iter_mut() {
        rec.cost_per_ticket = derive_cost_per_ticket(rec.revenue, rec.tickets_sold);
    }

    let undefined = records.iter().filter(|r| r.cost_per_ticket.is_none()).count();
    info!(rows = records.len(), undefined_cost = undefined, "normalized");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,tourstats::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    fn raw(
        revenue: Option<&str>,
        attendance: Option<&str>,
        opening_act: Option<&str>,
        tour: &str,
    ) -> RawRecord {
        RawRecord {
            revenue: revenue.map(String::from),
            attendance: attendance.map(String::from),
            opening_act: opening_act.map(String::from),
            tour: Some(tour.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn end_to_end_row_inherits_opening_act() {
        init_test_logging();
        let input = vec![
            raw(Some("$5,000"), Some("100/100"), Some("Muna"), "Eras"),
            raw(Some("$10,000"), Some("500/600"), None, "Eras"),
        ];

        let out = normalize(&input).unwrap();
        let r = &out[1];
        assert_eq!(r.revenue, 10_000.0);
        assert_eq!(r.tickets_sold, 500);
        assert_eq!(r.tickets_available, 600);
        assert_eq!(r.opening_act.as_deref(), Some("Muna"));
        assert_eq!(r.cost_per_ticket, Some(20.0));
        assert_eq!(r.tour.as_deref(), Some("Eras"));
    }

    #[test]
    fn preserves_row_count_and_order() {
        let tours = ["Fearless", "Speak Now", "Red", "1989", "Reputation", "Eras"];
        let input: Vec<RawRecord> = tours
            .iter()
            .map(|t| raw(None, None, None, t))
            .collect();

        let out = normalize(&input).unwrap();
        assert_eq!(out.len(), input.len());
        let got: Vec<&str> = out.iter().map(|r| r.tour.as_deref().unwrap()).collect();
        assert_eq!(got, tours);
    }

    #[test]
    fn degraded_fields_become_sentinels() {
        let input = vec![raw(Some("n/a dollars"), Some("sold out"), None, "Red")];
        let out = normalize(&input).unwrap();
        assert_eq!(out[0].revenue, 0.0);
        assert_eq!(out[0].tickets_sold, 0);
        assert_eq!(out[0].tickets_available, 0);
        assert_eq!(out[0].cost_per_ticket, None);
        assert_eq!(out[0].opening_act, None);
    }

    #[test]
    fn malformed_attendance_names_row_and_value() {
        init_test_logging();
        let input = vec![
            raw(Some("$1"), Some("1/1"), None, "Red"),
            raw(Some("$1"), Some("12,000/abc"), None, "Red"),
        ];
        match normalize(&input) {
            Err(Error::AttendanceMalformed { row, raw }) => {
                assert_eq!(row, 1);
                assert_eq!(raw, "12,000/abc");
            }
            other => panic!("expected AttendanceMalformed, got {other:?}"),
        }
    }

    #[test]
    fn empty_input_normalizes_to_empty() {
        assert!(normalize(&[]).unwrap().is_empty());
    }

    #[test]
    fn normalizing_twice_is_identical() {
        let input = vec![
            raw(Some("$3,000"), Some("30/40"), Some("HAIM"), "Eras"),
            raw(Some("$0"), Some("0/40"), None, "Eras"),
        ];
        assert_eq!(normalize(&input).unwrap(), normalize(&input).unwrap());
    }
}
