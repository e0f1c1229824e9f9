//! Bucket naming: generated names and S3 naming rules

use crate::error::{Error, Result};
use rand::Rng;

/// Smallest and largest random suffix appended to generated names
const SUFFIX_RANGE: std::ops::RangeInclusive<u32> = 100_000..=999_999;

const MIN_BUCKET_NAME_LEN: usize = 3;
const MAX_BUCKET_NAME_LEN: usize = 63;

/// Build a bucket name from a person's first and last name.
///
/// Both parts are trimmed and lowercased, then a six digit random suffix
/// is appended. Returns `None` when both parts are empty.
pub fn bucket_name_from<R: Rng + ?Sized>(first: &str, last: &str, rng: &mut R) -> Option<String> {
    let stem = format!("{}{}", first.trim(), last.trim()).to_lowercase();
    if stem.is_empty() {
        return None;
    }

    let suffix = rng.gen_range(SUFFIX_RANGE);
    Some(format!("{}{}", stem, suffix))
}

/// Check a bucket name against the S3 naming rules
pub fn validate_bucket_name(name: &str) -> Result<()> {
    if name.len() < MIN_BUCKET_NAME_LEN || name.len() > MAX_BUCKET_NAME_LEN {
        return Err(Error::InvalidInput(format!(
            "Bucket name must be between {} and {} characters (got {})",
            MIN_BUCKET_NAME_LEN,
            MAX_BUCKET_NAME_LEN,
            name.len()
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
    {
        return Err(Error::InvalidInput(
            "Bucket name can only contain lowercase letters, digits, hyphens, and dots".to_string(),
        ));
    }

    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_alphanumeric());
    if !edge_ok(name.chars().next()) || !edge_ok(name.chars().last()) {
        return Err(Error::InvalidInput(
            "Bucket name must start and end with a letter or digit".to_string(),
        ));
    }

    if name.contains("..") {
        return Err(Error::InvalidInput(
            "Bucket name cannot contain two adjacent dots".to_string(),
        ));
    }

    Ok(())
}
