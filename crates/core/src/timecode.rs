//! `HH:MM:SS` timecode parsing for cut-point selection.
//!
//! The conversion request carries the begin/end cut points as `HH:MM:SS`
//! strings; the converter itself wants a start offset plus a duration in
//! seconds.

use crate::error::CoreError;

/// Parse an `HH:MM:SS` timecode into seconds.
///
/// Minutes and seconds must be below 60. Hours are not capped at 24 (a
/// raw live recording can run past 24h of buffered stream), but the total
/// seconds must fit in a `u32`; anything larger is a validation error.
pub fn parse_hms(input: &str) -> Result<u32, CoreError> {
    let invalid = || CoreError::Validation(format!("Invalid timecode '{input}', expected HH:MM:SS"));

    let mut parts = input.split(':');
    let (hours, minutes, seconds) = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(h), Some(m), Some(s), None) => (h, m, s),
        _ => return Err(invalid()),
    };

    let hours: u32 = hours.parse().map_err(|_| invalid())?;
    let minutes: u32 = minutes.parse().map_err(|_| invalid())?;
    let seconds: u32 = seconds.parse().map_err(|_| invalid())?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    hours
        .checked_mul(3600)
        .and_then(|h| h.checked_add(minutes * 60 + seconds))
        .ok_or_else(invalid)
}

/// Compute the clip duration between two timecodes.
///
/// Fails unless `end` is strictly after `begin`.
pub fn clip_duration(begin: &str, end: &str) -> Result<(u32, u32), CoreError> {
    let start = parse_hms(begin)?;
    let stop = parse_hms(end)?;
    if stop <= start {
        return Err(CoreError::Validation(format!(
            "End time {end} must be after begin time {begin}"
        )));
    }
    Ok((start, stop - start))
}
