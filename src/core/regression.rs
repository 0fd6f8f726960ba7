/// Least-squares line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearRegression {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearRegression {
    /// Fits a line through `(x, y)` pairs.
    ///
    /// Returns `None` for empty input. A single point, or points sharing one
    /// `x`, yield a flat line through the mean `y`.
    #[must_use]
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        let count = points.len();
        if count == 0 {
            return None;
        }

        let n = count as f64;
        let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
        let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

        let (covariance, variance) =
            points
                .iter()
                .fold((0.0, 0.0), |(covariance, variance), (x, y)| {
                    let dx = x - mean_x;
                    (covariance + dx * (y - mean_y), variance + dx * dx)
                });

        if variance == 0.0 || !variance.is_finite() {
            return Some(Self {
                slope: 0.0,
                intercept: mean_y,
            });
        }

        let slope = covariance / variance;
        Some(Self {
            slope,
            intercept: mean_y - slope * mean_x,
        })
    }

    #[must_use]
    pub fn predict(self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}
