use crate::base::{Error, Result};

/// Split a dotted version string and parse its leading component.
///
/// Returns the raw major text (kept verbatim for header templates) together
/// with its numeric value (used for table lookups). Everything after the
/// first `.` is ignored.
pub fn parse_major_version(version: &str) -> Result<(&str, u32)> {
    let major = version.split_once('.').map_or(version, |(major, _)| major);
    let number = major.parse::<u32>().map_err(|source| Error::VersionParse {
        major: major.to_string(),
        source,
    })?;
    Ok((major, number))
}
