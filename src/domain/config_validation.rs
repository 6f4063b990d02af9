//! Configuration validation for the `[analytics]` and `[input]` sections.
//!
//! Validates all config fields before an analytics run.

use crate::domain::error::TradelensError;
use crate::ports::config_port::ConfigPort;

pub fn validate_analytics_config(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    validate_ma_windows(config)?;
    validate_bin_width(config)?;
    validate_label_offsets(config)?;
    validate_input_format(config)?;
    Ok(())
}

/// Comma-separated list of positive integers, e.g. `5, 10, 20`.
pub fn parse_windows(value: &str) -> Result<Vec<usize>, TradelensError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| match s.parse::<usize>() {
            Ok(w) if w > 0 => Ok(w),
            _ => Err(TradelensError::ConfigInvalid {
                section: "analytics".to_string(),
                key: "ma_windows".to_string(),
                reason: format!("'{}' is not a positive integer", s),
            }),
        })
        .collect()
}

fn validate_ma_windows(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    if let Some(value) = config.get_string("analytics", "ma_windows") {
        parse_windows(&value)?;
    }
    Ok(())
}

fn validate_bin_width(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    let Some(raw) = config.get_string("analytics", "bin_width") else {
        return Ok(());
    };
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
        _ => Err(TradelensError::ConfigInvalid {
            section: "analytics".to_string(),
            key: "bin_width".to_string(),
            reason: "bin_width must be a positive number".to_string(),
        }),
    }
}

fn validate_label_offsets(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    // base may be zero; step must push each same-day label further out
    for (key, allow_zero) in [("label_base_offset", true), ("label_step", false)] {
        let Some(raw) = config.get_string("analytics", key) else {
            continue;
        };
        let ok = match raw.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => v > 0.0 || (allow_zero && v == 0.0),
            _ => false,
        };
        if !ok {
            let bound = if allow_zero { "non-negative" } else { "positive" };
            return Err(TradelensError::ConfigInvalid {
                section: "analytics".to_string(),
                key: key.to_string(),
                reason: format!("{} must be a {} number", key, bound),
            });
        }
    }
    Ok(())
}

fn validate_input_format(config: &dyn ConfigPort) -> Result<(), TradelensError> {
    match config.get_string("input", "format").as_deref().map(str::trim) {
        None | Some("json") | Some("csv") => Ok(()),
        Some(other) => Err(TradelensError::ConfigInvalid {
            section: "input".to_string(),
            key: "format".to_string(),
            reason: format!("unknown format '{}', expected json or csv", other),
        }),
    }
}
