use serde::Serialize;

/// Descriptive statistics over the present values of one column.
///
/// Quartiles use linear interpolation between closest ranks and `std` is
/// the sample standard deviation, so the numbers line up with what a
/// spreadsheet or dataframe `describe()` prints.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    pub q25: Option<f64>,
    pub median: Option<f64>,
    pub q75: Option<f64>,
    pub max: Option<f64>,
}

impl Summary {
    /// `None` entries (and NaN) are skipped; an all-missing input gives
    /// `count == 0` and no statistics.
    pub fn describe<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut xs: Vec<f64> = values
            .into_iter()
            .flatten()
            .filter(|v| !v.is_nan())
            .collect();
        if xs.is_empty() {
            return Self::default();
        }
        xs.sort_by(|a, b| a.total_cmp(b));

        let n = xs.len();
        let mean = xs.iter().sum::<f64>() / n as f64;
        let std = (n > 1).then(|| {
            let ss: f64 = xs.iter().map(|x| (x - mean).powi(2)).sum();
            (ss / (n - 1) as f64).sqrt()
        });

        Self {
            count: n,
            mean: Some(mean),
            std,
            min: xs.first().copied(),
            q25: quantile(&xs, 0.25),
            median: quantile(&xs, 0.5),
            q75: quantile(&xs, 0.75),
            max: xs.last().copied(),
        }
    }

    /// Rows as `(label, value)` in the conventional describe order.
    pub fn rows(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("count", Some(self.count as f64)),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.median),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

/// Linear-interpolated quantile of an ascending slice; `None` when empty.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let pos = q.clamp(0.0, 1.0) * last as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Mean of the present values, `None` if there are none.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = Option<f64>>,
{
    let (sum, n) = values
        .into_iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
