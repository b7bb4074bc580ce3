//! Full configuration validation.
//!
//! Checks numeric ranges and keybind uniqueness, collecting every problem
//! into a single `ConfigError`.

use std::fmt::Display;

use termdock_common::ConfigError;

use crate::keybinds;
use crate::schema::TermdockConfig;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &TermdockConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if let Err(e) = keybinds::validate_no_duplicates(&config.keybinds) {
        errors.push(e.to_string());
    }

    let t = &config.terminal;
    validate_range(&mut errors, "terminal.default_cols", t.default_cols, 10, 500);
    validate_range(&mut errors, "terminal.default_rows", t.default_rows, 2, 500);
    validate_range(&mut errors, "terminal.fit_frames", t.fit_frames, 2, 10);
    validate_range(&mut errors, "terminal.cell_width", t.cell_width, 1.0, 100.0);
    validate_range(&mut errors, "terminal.cell_height", t.cell_height, 1.0, 100.0);

    let r = &config.resize;
    if r.deferred_fit_ms <= r.suppress_ms {
        errors.push(format!(
            "resize.deferred_fit_ms ({}) must be greater than resize.suppress_ms ({})",
            r.deferred_fit_ms, r.suppress_ms
        ));
    }

    let d = &config.detector;
    validate_range(&mut errors, "detector.buffer_chars", d.buffer_chars, 256, 65_536);
    validate_range(&mut errors, "detector.context_chars", d.context_chars, 20, 2048);
    validate_range(
        &mut errors,
        "detector.collection_window_ms",
        d.collection_window_ms,
        100,
        60_000,
    );
    validate_range(&mut errors, "detector.settle_ms", d.settle_ms, 10, 5000);

    validate_range(
        &mut errors,
        "commands.send_delay_ms",
        config.commands.send_delay_ms,
        0,
        10_000,
    );

    if config.probe.retry_delays_ms.is_empty() {
        errors.push("probe.retry_delays_ms must not be empty".into());
    }
    validate_range(
        &mut errors,
        "probe.attempt_timeout_ms",
        config.probe.attempt_timeout_ms,
        50,
        30_000,
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range<T: PartialOrd + Display>(
    errors: &mut Vec<String>,
    field: &str,
    value: T,
    min: T,
    max: T,
) {
    if value < min || value > max {
        errors.push(format!("{field} must be {min}-{max}, got {value}"));
    }
}
