//! Average salary by U.S. state for the map view.
//!
//! Sample figures, not model output. Override them with `[[regional.states]]`
//! in the config file.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSalary {
    /// Two-letter USPS state code
    pub state: String,
    pub average_salary: f64,
}

impl StateSalary {
    pub fn new(state: &str, average_salary: f64) -> Self {
        Self {
            state: state.to_string(),
            average_salary,
        }
    }
}

pub fn default_state_salaries() -> Vec<StateSalary> {
    vec![
        StateSalary::new("CA", 130_000.0),
        StateSalary::new("TX", 110_000.0),
        StateSalary::new("NY", 125_000.0),
        StateSalary::new("IL", 100_000.0),
        StateSalary::new("FL", 105_000.0),
    ]
}

/// A state's figure with its position on the colour scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadedState {
    pub state: String,
    pub average_salary: f64,
    /// 0.0 at the lowest salary, 1.0 at the highest
    pub intensity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionalSummary {
    pub states: Vec<ShadedState>,
    pub min_salary: Option<f64>,
    pub max_salary: Option<f64>,
}

/// Attach colour-scale intensities. With a single distinct value every state
/// sits at the top of the scale.
pub fn summarize(salaries: &[StateSalary]) -> RegionalSummary {
    let min = salaries.iter().map(|s| s.average_salary).reduce(f64::min);
    let max = salaries.iter().map(|s| s.average_salary).reduce(f64::max);

    let span = match (min, max) {
        (Some(lo), Some(hi)) => hi - lo,
        _ => 0.0,
    };
    let lo = min.unwrap_or(0.0);

    let states = salaries
        .iter()
        .map(|s| ShadedState {
            state: s.state.clone(),
            average_salary: s.average_salary,
            intensity: if span > 0.0 {
                (s.average_salary - lo) / span
            } else {
                1.0
            },
        })
        .collect();

    RegionalSummary {
        states,
        min_salary: min,
        max_salary: max,
    }
}

/// USPS-style code check: exactly two ASCII uppercase letters.
pub fn is_state_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sample_intensities() {
        let summary = summarize(&default_state_salaries());
        assert_eq!(summary.min_salary, Some(100_000.0));
        assert_eq!(summary.max_salary, Some(130_000.0));

        let ca = summary.states.iter().find(|s| s.state == "CA").unwrap();
        let il = summary.states.iter().find(|s| s.state == "IL").unwrap();
        let fl = summary.states.iter().find(|s| s.state == "FL").unwrap();
        assert_eq!(ca.intensity, 1.0);
        assert_eq!(il.intensity, 0.0);
        assert!((fl.intensity - 1.0 / 6.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_value_full_intensity() {
        let summary = summarize(&[StateSalary::new("WA", 90_000.0)]);
        assert_eq!(summary.states[0].intensity, 1.0);
    }

    #[test]
    fn test_empty_summary() {
        let summary = summarize(&[]);
        assert!(summary.states.is_empty());
        assert_eq!(summary.min_salary, None);
    }

    #[test]
    fn test_state_code() {
        assert!(is_state_code("CA"));
        assert!(!is_state_code("ca"));
        assert!(!is_state_code("CAL"));
        assert!(!is_state_code(""));
    }
}
