//! Argument parsing for proposal commands.
//!
//! Voting window syntax for `propose --duration`:
//! - bare integer: whole days (e.g. `7`)
//! - humantime: `1d`, `30 days`, `48h`, `2weeks`
//!
//! The value must be a whole number of days. Range checks (1..=30 days) are
//! left to the registry so they surface as `DurationOutOfRange`.

use crate::clock::DAY_SECS;

/// Parse a voting window into whole days.
pub fn parse_duration_days(input: &str) -> Result<u64, String> {
    let input = input.trim();
    if input.is_empty() {
        return Err("Duration must not be empty (e.g., 7d)".to_string());
    }

    if input.chars().all(|c| c.is_ascii_digit()) {
        return input
            .parse()
            .map_err(|_| format!("Invalid day count: {}", input));
    }

    let duration = humantime::parse_duration(input)
        .map_err(|e| format!("Invalid duration '{}': {}", input, e))?;

    let secs = duration.as_secs();
    if secs % DAY_SECS != 0 || duration.subsec_nanos() != 0 {
        return Err(format!(
            "Duration must be a whole number of days. Got: {}",
            input
        ));
    }

    Ok(secs / DAY_SECS)
}
