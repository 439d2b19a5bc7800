//! Core semantic-version comparison.
//!
//! Only the numeric `major.minor.patch` triple is compared; pre-release
//! and build-metadata suffixes (`1.2.3-beta.1+build.7`) are ignored.

use crate::ResolveError;

/// Minimum embedded testing-SDK version the CLI can drive.
pub const MIN_SDK_VERSION: &str = "1.0.43";

/// Parses the numeric core of a semantic version.
pub fn core_version(version: &str) -> Result<[u64; 3], ResolveError> {
    let core = version
        .split(['-', '+'])
        .next()
        .unwrap_or(version);

    let parts: Vec<&str> = core.split('.').collect();
    if parts.len() != 3 {
        return Err(ResolveError::InvalidVersion(version.to_string()));
    }

    let mut numbers = [0u64; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|_| ResolveError::InvalidVersion(version.to_string()))?;
    }
    Ok(numbers)
}

/// Numeric component-wise `version >= minimum`.
pub fn is_at_least(version: &str, minimum: &str) -> Result<bool, ResolveError> {
    Ok(core_version(version)? >= core_version(minimum)?)
}
