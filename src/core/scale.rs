use crate::error::{ChartError, ChartResult};

/// Linear mapping from a data domain onto a pixel range.
///
/// The range may be inverted (`range_start > range_end`), which is how the
/// vertical axes map larger values towards the top of the plot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
    range_start: f64,
    range_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ChartResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ChartError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
            range_start: 0.0,
            range_end: 1.0,
        })
    }

    pub fn with_range(mut self, range_start: f64, range_end: f64) -> ChartResult<Self> {
        if !range_start.is_finite() || !range_end.is_finite() {
            return Err(ChartError::InvalidData(
                "scale range must be finite".to_owned(),
            ));
        }
        self.range_start = range_start;
        self.range_end = range_end;
        Ok(self)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    #[must_use]
    pub fn range(self) -> (f64, f64) {
        (self.range_start, self.range_end)
    }

    pub fn map(self, value: f64) -> ChartResult<f64> {
        if !value.is_finite() {
            return Err(ChartError::InvalidData("value must be finite".to_owned()));
        }

        let span = self.domain_end - self.domain_start;
        let normalized = (value - self.domain_start) / span;
        Ok(self.range_start + normalized * (self.range_end - self.range_start))
    }

    pub fn invert(self, pixel: f64) -> ChartResult<f64> {
        if !pixel.is_finite() {
            return Err(ChartError::InvalidData("pixel must be finite".to_owned()));
        }

        let range_span = self.range_end - self.range_start;
        if range_span == 0.0 {
            return Err(ChartError::InvalidData(
                "cannot invert a zero-width range".to_owned(),
            ));
        }
        let normalized = (pixel - self.range_start) / range_span;
        Ok(self.domain_start + normalized * (self.domain_end - self.domain_start))
    }

    /// Returns roughly `count` evenly spaced "nice" values (1, 2 or 5 times a
    /// power of ten apart) covering the domain.
    #[must_use]
    pub fn ticks(self, count: usize) -> Vec<f64> {
        let (lo, hi) = if self.domain_start <= self.domain_end {
            (self.domain_start, self.domain_end)
        } else {
            (self.domain_end, self.domain_start)
        };
        let Some(step) = nice_tick_step(lo, hi, count) else {
            return Vec::new();
        };

        let first = (lo / step).ceil() as i64;
        let last = (hi / step).floor() as i64;
        if last < first {
            return Vec::new();
        }
        // Fractional steps divide by the inverse so 3 * 0.1 lands on 0.3 exactly.
        let inverse = (step < 1.0).then(|| (1.0 / step).round());
        (first..=last)
            .map(|index| match inverse {
                Some(inverse) => index as f64 / inverse,
                None => index as f64 * step,
            })
            .collect()
    }
}

/// Chooses a tick step of 1, 2 or 5 × 10^k so that `[start, stop]` splits
/// into about `count` intervals.
#[must_use]
pub fn nice_tick_step(start: f64, stop: f64, count: usize) -> Option<f64> {
    if count == 0 || !start.is_finite() || !stop.is_finite() || start == stop {
        return None;
    }

    let raw_step = (stop - start).abs() / count as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let error = raw_step / magnitude;
    let factor = if error >= 50f64.sqrt() {
        10.0
    } else if error >= 10f64.sqrt() {
        5.0
    } else if error >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    let step = magnitude * factor;
    (step.is_finite() && step > 0.0).then_some(step)
}

/// Padding policy applied to an observed `[min, max]` extent.
///
/// Bounds are computed as `min * lower_factor` and `max * upper_factor`, with
/// the lower bound forced to zero when `zero_baseline` is set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DomainPadding {
    pub lower_factor: f64,
    pub upper_factor: f64,
}

impl DomainPadding {
    #[must_use]
    pub const fn new(lower_factor: f64, upper_factor: f64) -> Self {
        Self {
            lower_factor,
            upper_factor,
        }
    }

    /// Resolves a padded domain that is always usable by [`LinearScale::new`].
    ///
    /// Empty extents fall back to `[0, 1]`; equal bounds are widened by one
    /// unit on each side.
    #[must_use]
    pub fn resolve(self, extent: Option<(f64, f64)>, zero_baseline: bool) -> (f64, f64) {
        let Some((min, max)) = extent else {
            return (0.0, 1.0);
        };

        // Factors are applied per value, so a negative extent flips which
        // product is smaller.
        let lower = if zero_baseline {
            0.0
        } else {
            (min * self.lower_factor).min(max * self.lower_factor)
        };
        let upper = (max * self.upper_factor).max(min * self.upper_factor);

        if !lower.is_finite() || !upper.is_finite() {
            return (0.0, 1.0);
        }
        if lower == upper {
            return (lower - 1.0, upper + 1.0);
        }
        (lower, upper)
    }
}
