//! Timestamps encoded in content filenames (`YYYY-MM-DD-HH:MM:SS.md`).

use chrono::{DateTime, FixedOffset, NaiveDateTime};

use super::util::MARKDOWN_SUFFIX;

/// Content timestamps are recorded at UTC+9 regardless of where the server runs.
pub const CONTENT_UTC_OFFSET_SECS: i32 = 9 * 3600;

const STAMP_FORMAT: &str = "%Y-%m-%d-%H:%M:%S";
const STAMP_SHAPE: &[u8] = b"dddd-dd-dd-dd:dd:dd";

/// Parse the timestamp from a dated filename.
///
/// Anything that is not exactly `YYYY-MM-DD-HH:MM:SS` (before the optional `.md`) or that names an
/// impossible date yields `None`; this is a "no date" signal, not an error.
pub fn parse_filename_date(filename: &str) -> Option<DateTime<FixedOffset>> {
    let stem = filename.strip_suffix(MARKDOWN_SUFFIX).unwrap_or(filename);
    if !matches_shape(stem) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(stem, STAMP_FORMAT).ok()?;
    let offset = FixedOffset::east_opt(CONTENT_UTC_OFFSET_SECS)?;
    naive.and_local_timezone(offset).single()
}

// chrono accepts unpadded fields, the naming convention does not.
fn matches_shape(stem: &str) -> bool {
    let bytes = stem.as_bytes();
    bytes.len() == STAMP_SHAPE.len()
        && bytes.iter().zip(STAMP_SHAPE).all(|(&byte, &shape)| match shape {
            b'd' => byte.is_ascii_digit(),
            sep => byte == sep,
        })
}
