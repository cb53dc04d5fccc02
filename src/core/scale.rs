use crate::error::{ExportError, ExportResult};

/// Relative headroom added around plotted values.
pub const DOMAIN_MARGIN_RATIO: f64 = 0.05;

/// Linear value axis mapped onto a vertical pixel range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearScale {
    domain_start: f64,
    domain_end: f64,
}

impl LinearScale {
    pub fn new(domain_start: f64, domain_end: f64) -> ExportResult<Self> {
        if !domain_start.is_finite() || !domain_end.is_finite() || domain_start == domain_end {
            return Err(ExportError::InvalidData(
                "scale domain must be finite and non-zero".to_owned(),
            ));
        }

        Ok(Self {
            domain_start,
            domain_end,
        })
    }

    /// Fits a domain around `values` with a small margin.
    ///
    /// With `anchor_zero` the domain always contains zero and no margin is
    /// added on the zero side, so bars grow from the axis.
    pub fn fit(values: &[f64], anchor_zero: bool) -> ExportResult<Self> {
        let (mut min, mut max) = values
            .iter()
            .copied()
            .filter(|value| value.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), value| {
                (lo.min(value), hi.max(value))
            });
        if !min.is_finite() || !max.is_finite() {
            return Err(ExportError::InvalidData(
                "scale needs at least one finite value".to_owned(),
            ));
        }

        if anchor_zero {
            min = min.min(0.0);
            max = max.max(0.0);
        }

        // Halves keep the span finite even for values near `f64::MAX`.
        let half_span = max / 2.0 - min / 2.0;
        if half_span == 0.0 {
            let pad = (max.abs() * DOMAIN_MARGIN_RATIO).max(1.0);
            return Self::new(clamp_finite(min - pad), clamp_finite(max + pad));
        }

        let pad = half_span * (2.0 * DOMAIN_MARGIN_RATIO);
        let start = if anchor_zero && min == 0.0 { 0.0 } else { clamp_finite(min - pad) };
        let end = if anchor_zero && max == 0.0 { 0.0 } else { clamp_finite(max + pad) };
        Self::new(start, end)
    }

    #[must_use]
    pub fn domain(self) -> (f64, f64) {
        (self.domain_start, self.domain_end)
    }

    /// Maps `value` so that `domain_start` lands on `pixel_start` and
    /// `domain_end` on `pixel_end`. Pass a descending pixel range for y axes.
    pub fn domain_to_pixel(self, value: f64, pixel_start: f64, pixel_end: f64) -> ExportResult<f64> {
        if !value.is_finite() {
            return Err(ExportError::InvalidData("value must be finite".to_owned()));
        }
        if !pixel_start.is_finite() || !pixel_end.is_finite() {
            return Err(ExportError::InvalidData(
                "pixel range must be finite".to_owned(),
            ));
        }

        let half_span = self.domain_end / 2.0 - self.domain_start / 2.0;
        let normalized = (value / 2.0 - self.domain_start / 2.0) / half_span;
        Ok(pixel_start + normalized * (pixel_end - pixel_start))
    }

    /// Round tick values inside the domain, roughly `target_count` of them.
    #[must_use]
    pub fn ticks(self, target_count: usize) -> Vec<f64> {
        let target_count = target_count.max(2);
        // Domains wider than `f64::MAX` are stepped in quarter units.
        let unit = if (self.domain_end - self.domain_start).is_finite() {
            1.0
        } else {
            4.0
        };
        let (start, end) = (self.domain_start / unit, self.domain_end / unit);
        let step = nice_step((end - start) / (target_count - 1) as f64);
        if !step.is_finite() || step <= 0.0 {
            return Vec::new();
        }

        let first = (start / step).ceil() as i64;
        let last = (end / step).floor() as i64;
        (first..=last)
            .map(|index| index as f64 * step * unit)
            // Normalizes `-0.0` so labels never read "-0".
            .map(|tick| if tick == 0.0 { 0.0 } else { tick })
            .collect()
    }
}

fn clamp_finite(value: f64) -> f64 {
    value.clamp(-f64::MAX, f64::MAX)
}

/// Number of ticks that fit `axis_span_px` at `target_spacing_px`.
#[must_use]
pub fn tick_target_count(
    axis_span_px: f64,
    target_spacing_px: f64,
    min_ticks: usize,
    max_ticks: usize,
) -> usize {
    if !axis_span_px.is_finite() || axis_span_px <= 0.0 {
        return min_ticks;
    }
    if !target_spacing_px.is_finite() || target_spacing_px <= 0.0 {
        return min_ticks;
    }

    let raw = (axis_span_px / target_spacing_px).floor() as usize + 1;
    raw.clamp(min_ticks, max_ticks)
}

fn nice_step(raw_step: f64) -> f64 {
    if !raw_step.is_finite() || raw_step <= 0.0 {
        return f64::NAN;
    }
    let magnitude = 10_f64.powf(raw_step.log10().floor());
    let fraction = raw_step / magnitude;
    let nice = if fraction <= 1.0 {
        1.0
    } else if fraction <= 2.0 {
        2.0
    } else if fraction <= 2.5 {
        2.5
    } else if fraction <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
