//! Parsing and validation of caller-supplied values.

use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::error::{RecordsError, Result};

/// Accepted grade values.
pub const GRADE_RANGE: RangeInclusive<i32> = 0..=100;

/// Accepted rating values.
pub const RATING_RANGE: RangeInclusive<i32> = 1..=5;

fn parse_number<T: FromStr>(what: &str, raw: &str) -> Result<T> {
    let trimmed = raw.trim();
    trimmed
        .parse()
        .map_err(|_| RecordsError::InvalidInput(format!("{what} must be a number, got {trimmed:?}")))
}

/// Parse an identifier typed by the user.
pub fn parse_id(raw: &str) -> Result<u64> {
    parse_number("identifier", raw)
}

/// Parse a grade. Range is checked by [`check_grade`], not here.
pub fn parse_grade(raw: &str) -> Result<i32> {
    parse_number("grade", raw)
}

/// Parse a rating. Range is checked by [`check_rating`], not here.
pub fn parse_rating(raw: &str) -> Result<i32> {
    parse_number("rating", raw)
}

pub fn check_grade(grade: i32) -> Result<()> {
    if GRADE_RANGE.contains(&grade) {
        return Ok(());
    }
    Err(RecordsError::InvalidInput(format!(
        "grade must be between {} and {}, got {grade}",
        GRADE_RANGE.start(),
        GRADE_RANGE.end()
    )))
}

pub fn check_rating(rating: i32) -> Result<()> {
    if RATING_RANGE.contains(&rating) {
        return Ok(());
    }
    Err(RecordsError::InvalidInput(format!(
        "rating must be between {} and {}, got {rating}",
        RATING_RANGE.start(),
        RATING_RANGE.end()
    )))
}

/// Reject values that the four-field line format cannot carry.
pub fn check_record_field(what: &str, value: &str) -> Result<()> {
    if value.contains([',', '\n', '\r']) {
        return Err(RecordsError::InvalidInput(format!(
            "{what} may not contain commas or line breaks"
        )));
    }
    Ok(())
}
