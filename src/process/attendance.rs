use std::fmt;

/// Tickets sold and available for one show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Attendance {
    pub sold: u64,
    pub available: u64,
}

/// A `/`-separated attendance value whose sides are not both integers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedAttendance {
    pub raw: String,
}

impl fmt::Display for MalformedAttendance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed attendance {:?}", self.raw)
    }
}

impl std::error::Error for MalformedAttendance {}

/// Parse `"<sold>/<available>"`, e.g. `"12,000/15,000"`.
///
/// Absent text, or text without any `/`, is `(0, 0)`. Once a `/` is present
/// the value must be exactly two non-negative integers (thousands separators
/// and surrounding whitespace allowed); anything else is an error.
pub fn parse_attendance(raw: Option<&str>) -> Result<Attendance, MalformedAttendance> {
    let Some(raw) = raw else {
        return Ok(Attendance::default());
    };
    let Some((sold, available)) = raw.split_once('/') else {
        return Ok(Attendance::default());
    };

    let malformed = || MalformedAttendance {
        raw: raw.to_string(),
    };
    if available.contains('/') {
        return Err(malformed());
    }

    Ok(Attendance {
        sold: parse_count(sold).ok_or_else(malformed)?,
        available: parse_count(available).ok_or_else(malformed)?,
    })
}

fn parse_count(side: &str) -> Option<u64> {
    let digits: String = side.trim().chars().filter(|c| *c != ',').collect();
    // u64's parser accepts a leading '+'
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
