// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! HL7v3 timestamp parsing.
//!
//! Signing times are recorded as `yyyyMMddHHmmss`, optionally followed by a
//! fractional-seconds part (`.ffff`) and a UTC offset (`±HHMM`). Without an
//! offset the value is read as UTC. Fractions are accepted and discarded;
//! every comparison in the verifier is at second granularity.

use chrono::NaiveDateTime;

/// Parse an HL7v3 timestamp into unix seconds.
pub fn parse_hl7_datetime(value: &str) -> Result<i64, String> {
    let value = value.trim();

    // The 14-digit date part never contains '+' or '-', so the first such
    // character starts the offset.
    let (main, offset_seconds) = match value.find(['+', '-']) {
        Some(idx) => {
            let (main, offset) = value.split_at(idx);
            (main, parse_offset(value, offset)?)
        }
        None => (value, 0),
    };

    let main = match main.split_once('.') {
        Some((whole, fraction)) => {
            if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
                return Err(format!("invalid HL7 timestamp fraction: {value}"));
            }
            whole
        }
        None => main,
    };

    if main.len() != 14 || !main.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid HL7 timestamp: {value}"));
    }

    let naive = NaiveDateTime::parse_from_str(main, "%Y%m%d%H%M%S")
        .map_err(|e| format!("invalid HL7 timestamp {value}: {e}"))?;

    Ok(naive.and_utc().timestamp() - i64::from(offset_seconds))
}

fn parse_offset(value: &str, offset: &str) -> Result<i32, String> {
    let digits = &offset[1..];
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(format!("invalid UTC offset in HL7 timestamp: {value}"));
    }
    let hours: i32 = digits[..2].parse().map_err(|_| format!("invalid UTC offset in HL7 timestamp: {value}"))?;
    let minutes: i32 = digits[2..].parse().map_err(|_| format!("invalid UTC offset in HL7 timestamp: {value}"))?;
    if hours > 14 || minutes > 59 {
        return Err(format!("invalid UTC offset in HL7 timestamp: {value}"));
    }
    let sign = if offset.starts_with('-') { -1 } else { 1 };
    Ok(sign * (hours * 3600 + minutes * 60))
}
