/// `revenue / tickets_sold`, or `None` when no tickets were sold.
pub fn derive_cost_per_ticket(revenue: f64, tickets_sold: u64) -> Option<f64> {
    if tickets_sold == 0 {
        return None;
    }
    let cost = revenue / tickets_sold as f64;
    cost.is_finite().then_some(cost)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn divides_when_tickets_sold() {
        assert_eq!(derive_cost_per_ticket(1000.0, 100), Some(10.0));
        assert_eq!(derive_cost_per_ticket(0.0, 100), Some(0.0));
    }

    #[test]
    fn zero_tickets_is_missing() {
        assert_eq!(derive_cost_per_ticket(1000.0, 0), None);
        assert_eq!(derive_cost_per_ticket(0.0, 0), None);
    }
}
