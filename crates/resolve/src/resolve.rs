//! The reuse-or-upload decision procedure.
//!
//! One state-free call per invocation. Checks run structural-first:
//! existence of registry answers, then completeness of the merged info,
//! then build-type policy, then SDK-version policy. A build missing the
//! SDK entirely fails on completeness, not with a confusing version
//! error.

use chrono::{DateTime, Utc};
use tracing::debug;

use glance_api::Platform;
use glance_api::types::{PerPlatform, RemoteBinaryInfo};
use glance_artifact::LocalBinaryInfo;

use crate::policy::RunIntent;
use crate::semver::{MIN_SDK_VERSION, is_at_least};
use crate::{ResolveError, platform_labels};

/// Reuse marker for a binary the registry already holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReuseInfo {
    pub run_index: u32,
    pub created_at: Option<DateTime<Utc>>,
}

/// Final decision for one platform binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedBinary {
    pub platform: Platform,
    pub hash: String,
    pub is_development_build: bool,
    pub sdk_version: String,
    pub s3_key: String,
    /// True iff the registry returned no ready-to-reuse marker for this
    /// hash and handed out a presigned upload target instead.
    pub needs_upload: bool,
    pub upload_url: Option<String>,
    pub reuse: Option<ReuseInfo>,
}

/// Resolves every tested platform to a reuse-or-upload decision.
///
/// `local` carries what was derived from artifacts on disk, `remote` the
/// registry's answer for the same hashes. Local fields win on merge.
pub fn resolve(
    intent: &RunIntent,
    platforms: &[Platform],
    local: &PerPlatform<LocalBinaryInfo>,
    remote: &PerPlatform<RemoteBinaryInfo>,
) -> Result<PerPlatform<ResolvedBinary>, ResolveError> {
    let policy = intent.policy();

    let mut resolved: PerPlatform<ResolvedBinary> = PerPlatform::default();
    for &platform in platforms {
        let remote_info = remote
            .get(platform)
            .ok_or(ResolveError::MissingRemoteInfo(platform))?;

        let local_info = local.get(platform);
        if local_info.is_none() && policy.requires_platform_paths {
            return Err(ResolveError::MissingLocalInfo(platform));
        }

        resolved.set(platform, merge(platform, local_info, remote_info)?);
    }

    validate_sdk_present(&resolved)?;
    validate_build_type(intent, &resolved)?;
    validate_sdk_versions(&resolved)?;

    Ok(resolved)
}

/// Merges registry state with locally derived fields (local wins) and
/// checks the merged info is complete enough to act on.
fn merge(
    platform: Platform,
    local: Option<&LocalBinaryInfo>,
    remote: &RemoteBinaryInfo,
) -> Result<ResolvedBinary, ResolveError> {
    let hash = local
        .map(|l| l.hash.clone())
        .or_else(|| remote.hash.clone())
        .ok_or(ResolveError::IncompleteBinaryInfo(platform))?;

    let is_development_build = local
        .map(|l| l.is_development_build)
        .or(remote.is_development_build)
        .ok_or(ResolveError::IncompleteBinaryInfo(platform))?;

    let sdk_version = local
        .and_then(|l| l.sdk_version.clone())
        .or_else(|| remote.sdk_version.clone());

    let s3_key = remote
        .s3_key
        .clone()
        .ok_or(ResolveError::IncompleteBinaryInfo(platform))?;

    let needs_upload = remote.upload_url.is_some();
    let reuse = remote.previous_run_index.map(|run_index| ReuseInfo {
        run_index,
        created_at: remote.created_at,
    });

    // Neither an upload target nor a reuse marker: nothing can be done
    // with this binary.
    if !needs_upload && reuse.is_none() {
        return Err(ResolveError::IncompleteBinaryInfo(platform));
    }

    debug!(
        %platform,
        needs_upload,
        reuse = reuse.as_ref().map(|r| r.run_index),
        "merged binary info"
    );

    Ok(ResolvedBinary {
        platform,
        hash,
        is_development_build,
        // Checked for presence across all platforms right after merging.
        sdk_version: sdk_version.unwrap_or_default(),
        s3_key,
        needs_upload,
        upload_url: remote.upload_url.clone(),
        reuse,
    })
}

fn validate_sdk_present(resolved: &PerPlatform<ResolvedBinary>) -> Result<(), ResolveError> {
    let missing: Vec<Platform> = Platform::ALL
        .into_iter()
        .filter(|&p| resolved.get(p).is_some_and(|b| b.sdk_version.is_empty()))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::SdkMissing {
            platforms: platform_labels(&missing),
        })
    }
}

fn validate_build_type(
    intent: &RunIntent,
    resolved: &PerPlatform<ResolvedBinary>,
) -> Result<(), ResolveError> {
    let requires_dev = intent.policy().requires_development_build;

    let offenders: Vec<Platform> = Platform::ALL
        .into_iter()
        .filter(|&p| {
            resolved
                .get(p)
                .is_some_and(|b| b.is_development_build != requires_dev)
        })
        .collect();

    if offenders.is_empty() {
        return Ok(());
    }

    let platforms = platform_labels(&offenders);
    if requires_dev {
        Err(ResolveError::DevelopmentBuildRequired { platforms })
    } else {
        Err(ResolveError::ReleaseBuildRequired { platforms })
    }
}

fn validate_sdk_versions(resolved: &PerPlatform<ResolvedBinary>) -> Result<(), ResolveError> {
    if let (Some(android), Some(ios)) = (resolved.get(Platform::Android), resolved.get(Platform::Ios))
        && android.sdk_version != ios.sdk_version
    {
        return Err(ResolveError::SdkVersionMismatch {
            android: android.sdk_version.clone(),
            ios: ios.sdk_version.clone(),
        });
    }

    let tested: Vec<Platform> = Platform::ALL
        .into_iter()
        .filter(|&p| resolved.get(p).is_some())
        .collect();

    if let Some(binary) = tested.first().and_then(|&p| resolved.get(p))
        && !is_at_least(&binary.sdk_version, MIN_SDK_VERSION)?
    {
        return Err(ResolveError::OutdatedSdk {
            platforms: platform_labels(&tested),
            found: binary.sdk_version.clone(),
            required: MIN_SDK_VERSION.to_string(),
        });
    }

    Ok(())
}
