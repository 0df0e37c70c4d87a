//! Ordinary least-squares line over a single scalar series

use serde::{Deserialize, Serialize};

/// Fitted line `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinearTrend {
    pub slope: f64,
    pub intercept: f64,
}

impl LinearTrend {
    /// Horizontal line through `value`
    pub fn flat(value: f64) -> Self {
        Self {
            slope: 0.0,
            intercept: finite_or_zero(value),
        }
    }

    /// Fit `(x, y)` pairs; `None` with fewer than two points
    ///
    /// A zero denominator (every x identical) yields a zero slope.
    pub fn fit(points: &[(f64, f64)]) -> Option<Self> {
        if points.len() < 2 {
            return None;
        }

        let n = points.len() as f64;
        let sum_x: f64 = points.iter().map(|(x, _)| x).sum();
        let sum_y: f64 = points.iter().map(|(_, y)| y).sum();
        let sum_xy: f64 = points.iter().map(|(x, y)| x * y).sum();
        let sum_xx: f64 = points.iter().map(|(x, _)| x * x).sum();

        let denominator = n * sum_xx - sum_x * sum_x;
        let slope = if denominator.abs() < f64::EPSILON {
            0.0
        } else {
            finite_or_zero((n * sum_xy - sum_x * sum_y) / denominator)
        };
        let intercept = finite_or_zero((sum_y - slope * sum_x) / n);

        Some(Self { slope, intercept })
    }

    /// Evaluate the line at `x`
    pub fn at(&self, x: f64) -> f64 {
        finite_or_zero(self.intercept + self.slope * x)
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}
