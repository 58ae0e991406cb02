//! Compounding salary growth projection.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthPoint {
    pub year: u32,
    pub salary: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthProjection {
    pub base_salary: f64,
    pub rate_percent: f64,
    pub points: Vec<GrowthPoint>,
}

impl GrowthProjection {
    pub fn salaries(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.salary).collect()
    }

    /// Salary at the end of the horizon.
    pub fn final_salary(&self) -> f64 {
        self.points.last().map_or(self.base_salary, |p| p.salary)
    }
}

/// Project `base` forward `years` years at `rate_percent` per year.
///
/// Year `i` is `round(base * (1 + rate/100)^i, 2)`, always compounded from
/// `base` rather than from the previous rounded value.
pub fn project(base: f64, rate_percent: f64, years: u32) -> GrowthProjection {
    let factor = 1.0 + rate_percent / 100.0;
    let points = (0..=years)
        .map(|year| GrowthPoint {
            year,
            salary: round_cents(base * factor.powf(f64::from(year))),
        })
        .collect();

    GrowthProjection {
        base_salary: base,
        rate_percent,
        points,
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
