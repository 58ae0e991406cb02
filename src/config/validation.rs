//! Config validation: unknown-key detection with Levenshtein suggestions
//! and range checks.
//!
//! Two-pass parse approach: first deserialize raw TOML into `toml::Value`,
//! walk the key tree, compare against known field names, and emit warnings
//! with "did you mean?" suggestions. Then proceed with normal serde
//! deserialization. Warnings never break existing configs.

use std::collections::HashSet;

use super::defaults;
use crate::regional::is_state_code;

/// A non-fatal config warning (typo, suspicious value).
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if let Some(ref s) = self.suggestion {
            write!(f, "; did you mean '{s}'?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Known Config Keys
// ============================================================================

/// Returns the complete set of valid dotted key paths for AppConfig.
///
/// Maintained by hand to match the structs in app_config.rs.
pub fn known_config_keys() -> HashSet<&'static str> {
    let keys: &[&str] = &[
        // [server]
        "server",
        "server.addr",
        // [model]
        "model",
        "model.artifact_path",
        "model.features_path",
        // [inputs]
        "inputs",
        "inputs.rating_min",
        "inputs.rating_max",
        "inputs.company_age_min",
        "inputs.company_age_max",
        // [growth]
        "growth",
        "growth.min_years",
        "growth.max_years",
        "growth.default_years",
        "growth.min_rate_percent",
        "growth.max_rate_percent",
        "growth.default_rate_percent",
        "growth.default_base",
        // [regional]
        "regional",
        "regional.states",
        "regional.states.state",
        "regional.states.average_salary",
    ];
    keys.iter().copied().collect()
}

// ============================================================================
// TOML Key Walking
// ============================================================================

/// Recursively walks a `toml::Value` tree and collects all dotted key paths.
///
/// Arrays of tables contribute their members' keys under the array's path,
/// so `[[regional.states]]` entries yield `regional.states.state`.
pub fn walk_toml_keys(value: &toml::Value, prefix: &str) -> Vec<String> {
    let mut keys = Vec::new();
    if let Some(table) = value.as_table() {
        for (k, v) in table {
            let path = if prefix.is_empty() {
                k.clone()
            } else {
                format!("{prefix}.{k}")
            };
            keys.push(path.clone());
            match v {
                toml::Value::Table(_) => keys.extend(walk_toml_keys(v, &path)),
                toml::Value::Array(items) => {
                    for item in items.iter().filter(|i| i.is_table()) {
                        for key in walk_toml_keys(item, &path) {
                            if !keys.contains(&key) {
                                keys.push(key);
                            }
                        }
                    }
                }
                _ => {}
            }
        }
    }
    keys
}

// ============================================================================
// Levenshtein Distance
// ============================================================================

/// Compute the Levenshtein edit distance between two strings.
fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Suggest the closest known key for an unknown key, if within edit distance 3.
pub fn suggest_correction(unknown: &str, known: &HashSet<&str>) -> Option<String> {
    let mut best: Option<(&str, usize)> = None;
    for &k in known {
        let dist = levenshtein(unknown, k);
        if dist > 3 {
            continue;
        }
        // Ties break alphabetically so the suggestion is stable
        let better = match best {
            None => true,
            Some((bk, bd)) => dist < bd || (dist == bd && k < bk),
        };
        if better {
            best = Some((k, dist));
        }
    }
    best.map(|(k, _)| k.to_string())
}

// ============================================================================
// Unknown Key Validation (entry point)
// ============================================================================

/// Parse a raw TOML string and return warnings for any unknown config keys.
///
/// This does NOT fail on unknown keys; it only warns.
pub fn validate_unknown_keys(raw_toml: &str) -> Vec<ValidationWarning> {
    let value: toml::Value = match raw_toml.parse() {
        Ok(v) => v,
        Err(_) => return Vec::new(), // parse errors are handled by serde later
    };

    let known = known_config_keys();
    walk_toml_keys(&value, "")
        .into_iter()
        .filter(|key| !known.contains(key.as_str()))
        .map(|key| ValidationWarning {
            suggestion: suggest_correction(&key, &known),
            message: format!("Unknown config key '{key}'"),
            field: key,
        })
        .collect()
}

// ============================================================================
// Range Validation
// ============================================================================

/// Validate ranges and orderings on a parsed AppConfig.
///
/// Returns (errors, warnings). Errors are impossible values that must
/// prevent startup; warnings are suspicious but not fatal.
pub fn validate_ranges(config: &super::AppConfig) -> (Vec<String>, Vec<ValidationWarning>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if config.server.addr.trim().is_empty() {
        errors.push("server.addr must not be empty".to_string());
    }

    // Inputs
    let i = &config.inputs;
    if !i.rating_min.is_finite() || !i.rating_max.is_finite() {
        errors.push(format!(
            "inputs.rating_min/rating_max must be finite (got {}, {})",
            i.rating_min, i.rating_max
        ));
    } else if i.rating_min > i.rating_max {
        errors.push(format!(
            "inputs.rating_min ({:.1}) must be <= rating_max ({:.1})",
            i.rating_min, i.rating_max
        ));
    } else if i.rating_min < 0.0 || i.rating_max > defaults::RATING_MAX {
        warnings.push(ValidationWarning {
            field: "inputs.rating_max".to_string(),
            message: format!(
                "rating range {:.1}-{:.1} is outside the 0-5 star scale the model was trained on",
                i.rating_min, i.rating_max
            ),
            suggestion: None,
        });
    }
    if i.company_age_min > i.company_age_max {
        errors.push(format!(
            "inputs.company_age_min ({}) must be <= company_age_max ({})",
            i.company_age_min, i.company_age_max
        ));
    }

    // Growth
    let g = &config.growth;
    if g.min_years > g.max_years {
        errors.push(format!(
            "growth.min_years ({}) must be <= max_years ({})",
            g.min_years, g.max_years
        ));
    }
    if g.max_years > defaults::GROWTH_HORIZON_LIMIT {
        errors.push(format!(
            "growth.max_years = {} exceeds the {}-year limit",
            g.max_years,
            defaults::GROWTH_HORIZON_LIMIT
        ));
    }
    if !(g.min_years..=g.max_years).contains(&g.default_years) {
        errors.push(format!(
            "growth.default_years ({}) must be within {}-{}",
            g.default_years, g.min_years, g.max_years
        ));
    }
    let rates = [g.min_rate_percent, g.max_rate_percent, g.default_rate_percent];
    if rates.iter().any(|r| !r.is_finite()) {
        errors.push("growth rates must be finite numbers".to_string());
    } else {
        if g.min_rate_percent > g.max_rate_percent {
            errors.push(format!(
                "growth.min_rate_percent ({}) must be <= max_rate_percent ({})",
                g.min_rate_percent, g.max_rate_percent
            ));
        } else if !(g.min_rate_percent..=g.max_rate_percent).contains(&g.default_rate_percent) {
            errors.push(format!(
                "growth.default_rate_percent ({}) must be within {}-{}",
                g.default_rate_percent, g.min_rate_percent, g.max_rate_percent
            ));
        }
        if g.min_rate_percent <= -100.0 {
            errors.push("growth.min_rate_percent must be > -100".to_string());
        }
        if g.max_rate_percent > 100.0 {
            warnings.push(ValidationWarning {
                field: "growth.max_rate_percent".to_string(),
                message: format!(
                    "max_rate_percent = {} allows more than doubling every year",
                    g.max_rate_percent
                ),
                suggestion: None,
            });
        }
    }
    if !g.default_base.is_finite()
        || g.default_base < 0.0
        || g.default_base > defaults::GROWTH_MAX_BASE
    {
        errors.push(format!(
            "growth.default_base = {} must be between 0 and {}",
            g.default_base,
            defaults::GROWTH_MAX_BASE
        ));
    }

    // Regional
    let mut seen = HashSet::new();
    for s in &config.regional.states {
        if !is_state_code(&s.state) {
            errors.push(format!(
                "regional.states: '{}' is not a two-letter uppercase state code",
                s.state
            ));
        }
        if !seen.insert(s.state.as_str()) {
            errors.push(format!("regional.states: duplicate state '{}'", s.state));
        }
        if !s.average_salary.is_finite() || s.average_salary < 0.0 {
            errors.push(format!(
                "regional.states: average_salary for '{}' must be a non-negative number",
                s.state
            ));
        }
    }
    if config.regional.states.is_empty() {
        warnings.push(ValidationWarning {
            field: "regional.states".to_string(),
            message: "regional.states is empty; the map page will show no data".to_string(),
            suggestion: None,
        });
    }

    (errors, warnings)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::regional::StateSalary;

    #[test]
    fn test_levenshtein_identical() {
        assert_eq!(levenshtein("hello", "hello"), 0);
    }

    #[test]
    fn test_levenshtein_one_edit() {
        assert_eq!(levenshtein("max_yeras", "max_years"), 2);
        assert_eq!(levenshtein("ratng_max", "rating_max"), 1);
    }

    #[test]
    fn test_levenshtein_empty() {
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("abc", ""), 3);
    }

    #[test]
    fn test_walk_toml_keys_nested() {
        let toml: toml::Value = r#"
            [growth]
            max_years = 10
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"growth".to_string()));
        assert!(keys.contains(&"growth.max_years".to_string()));
    }

    #[test]
    fn test_walk_toml_keys_array_of_tables() {
        let toml: toml::Value = r#"
            [[regional.states]]
            state = "CA"
            average_salary = 1.0

            [[regional.states]]
            state = "NY"
            average_salary = 2.0
        "#
        .parse()
        .unwrap();
        let keys = walk_toml_keys(&toml, "");
        assert!(keys.contains(&"regional.states".to_string()));
        assert_eq!(
            keys.iter().filter(|k| *k == "regional.states.state").count(),
            1
        );
    }

    #[test]
    fn test_typo_key_produces_warning_with_suggestion() {
        let warnings = validate_unknown_keys(
            r#"
[growth]
max_yeras = 12
"#,
        );
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].field, "growth.max_yeras");
        assert_eq!(warnings[0].suggestion.as_deref(), Some("growth.max_years"));
        assert!(warnings[0].to_string().contains("did you mean"));
    }

    #[test]
    fn test_all_valid_keys_produce_zero_warnings() {
        let warnings = validate_unknown_keys(
            r#"
[server]
addr = "127.0.0.1:9000"

[model]
artifact_path = "m.json"
features_path = "f.json"

[[regional.states]]
state = "CA"
average_salary = 130000.0
"#,
        );
        assert!(warnings.is_empty(), "Expected 0 warnings, got: {warnings:?}");
    }

    #[test]
    fn test_suggest_correction_no_match_for_garbage() {
        let known = known_config_keys();
        assert!(suggest_correction("completely_unrelated_garbage_key_xyz", &known).is_none());
    }

    #[test]
    fn test_defaults_clean() {
        let (errors, warnings) = validate_ranges(&AppConfig::default());
        assert!(errors.is_empty(), "Defaults should produce no errors: {errors:?}");
        assert!(warnings.is_empty(), "Defaults should produce no warnings: {warnings:?}");
    }

    #[test]
    fn test_default_years_outside_bounds() {
        let mut config = AppConfig::default();
        config.growth.default_years = 20;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("default_years")));
    }

    #[test]
    fn test_horizon_limit() {
        let mut config = AppConfig::default();
        config.growth.max_years = 500;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("year limit")));
    }

    #[test]
    fn test_rating_beyond_star_scale_warns() {
        let mut config = AppConfig::default();
        config.inputs.rating_max = 10.0;
        let (errors, warnings) = validate_ranges(&config);
        assert!(errors.is_empty());
        assert!(warnings.iter().any(|w| w.field == "inputs.rating_max"));
    }

    #[test]
    fn test_bad_state_entries() {
        let mut config = AppConfig::default();
        config.regional.states = vec![
            StateSalary::new("California", 1.0),
            StateSalary::new("NY", -5.0),
            StateSalary::new("TX", 1.0),
            StateSalary::new("TX", 2.0),
        ];
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("California")));
        assert!(errors.iter().any(|e| e.contains("'NY'")));
        assert!(errors.iter().any(|e| e.contains("duplicate state 'TX'")));
    }

    #[test]
    fn test_nan_rate_is_error() {
        let mut config = AppConfig::default();
        config.growth.max_rate_percent = f64::NAN;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("finite")));
    }

    #[test]
    fn test_default_base_ceiling() {
        let mut config = AppConfig::default();
        config.growth.default_base = 1e300;
        let (errors, _) = validate_ranges(&config);
        assert!(errors.iter().any(|e| e.contains("growth.default_base")));
    }
}
