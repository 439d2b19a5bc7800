//! Run configuration assembly and the open-run call.

use tracing::info;

use glance_api::types::{
    OpenRunRequest, PerPlatform, PlatformRunConfig, RunConfig, RunDevice,
};
use glance_api::{ApiClient, GitInfo, Platform, TokenParts};
use glance_config::{Config, device_platform};
use glance_resolve::ResolvedBinary;

use crate::RunError;

/// Web app domain the results URL points into.
pub const APP_DOMAIN: &str = "https://app.useglance.dev";

/// Outcome of a successfully opened run.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunOutcome {
    pub run_index: u32,
    pub url: String,
}

/// Builds the platform-keyed run configuration sent to the registry.
///
/// Devices are partitioned by their catalog platform; a platform section
/// is present only when that platform is tested and has devices.
pub fn build_run_config(
    config: &Config,
    platforms: &[Platform],
    resolved: &PerPlatform<ResolvedBinary>,
) -> RunConfig {
    let section = |platform: Platform| -> Option<PlatformRunConfig> {
        if !platforms.contains(&platform) {
            return None;
        }

        let devices: Vec<RunDevice> = config
            .devices
            .iter()
            .filter(|d| device_platform(&d.id) == Some(platform))
            .map(|d| RunDevice {
                id: d.id.clone(),
                os_version: d.os_version.clone(),
                locale: d.os_locale.clone(),
                theme: d.os_theme.clone(),
                font_scale: d.font_scale.clone(),
            })
            .collect();
        if devices.is_empty() {
            return None;
        }

        Some(PlatformRunConfig {
            devices,
            s3_key: resolved
                .get(platform)
                .map(|b| b.s3_key.clone())
                .unwrap_or_default(),
        })
    };

    RunConfig {
        include: config.include.clone(),
        exclude: config.exclude.clone(),
        android: section(Platform::Android),
        ios: section(Platform::Ios),
    }
}

/// Human-shareable results URL for a run.
pub fn results_url(team_id: &str, project_index: u32, run_index: u32) -> String {
    format!(
        "{APP_DOMAIN}/run?teamId={team_id}&projectIndex={project_index}&runIndex={run_index}"
    )
}

/// Opens the run on the registry and derives the results URL.
pub async fn open_run(
    client: &ApiClient,
    token: &TokenParts,
    sdk_version: String,
    binary_hashes: PerPlatform<String>,
    run_config: RunConfig,
    git_info: GitInfo,
) -> Result<RunOutcome, RunError> {
    let request = OpenRunRequest {
        team_id: token.team_id.clone(),
        project_index: token.project_index,
        sdk_version,
        binary_hashes,
        run_config,
        git_info,
    };

    let response = client.open_run(&request).await?;
    let run_index = response.run.index;
    let url = results_url(&token.team_id, token.project_index, run_index);

    info!(run_index, url = %url, "run opened");

    Ok(RunOutcome { run_index, url })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glance_config::Device;

    fn device(id: &str, os_version: &str) -> Device {
        Device {
            id: id.into(),
            os_version: os_version.into(),
            os_locale: "en_US".into(),
            os_theme: "light".into(),
            font_scale: None,
        }
    }

    fn resolved(platform: Platform, s3_key: &str) -> ResolvedBinary {
        ResolvedBinary {
            platform,
            hash: "aa".repeat(32),
            is_development_build: false,
            sdk_version: "1.0.50".into(),
            s3_key: s3_key.into(),
            needs_upload: false,
            upload_url: None,
            reuse: None,
        }
    }

    fn config(devices: Vec<Device>) -> Config {
        Config {
            token: "t".into(),
            android: None,
            ios: None,
            include: None,
            exclude: None,
            devices,
        }
    }

    #[test]
    fn partitions_devices_by_platform() {
        let config = config(vec![
            device("pixel.8", "14"),
            device("iphone.15", "17.5"),
            device("pixel.7", "13"),
        ]);
        let mut binaries = PerPlatform::default();
        binaries.set(Platform::Android, resolved(Platform::Android, "builds/a/1"));
        binaries.set(Platform::Ios, resolved(Platform::Ios, "builds/i/1"));

        let run_config = build_run_config(
            &config,
            &[Platform::Android, Platform::Ios],
            &binaries,
        );

        let android = run_config.android.unwrap();
        assert_eq!(android.devices.len(), 2);
        assert_eq!(android.s3_key, "builds/a/1");
        let ios = run_config.ios.unwrap();
        assert_eq!(ios.devices.len(), 1);
        assert_eq!(ios.devices[0].id, "iphone.15");
        assert_eq!(ios.s3_key, "builds/i/1");
    }

    #[test]
    fn untested_platform_has_no_section() {
        let config = config(vec![device("pixel.8", "14"), device("iphone.15", "17.5")]);
        let mut binaries = PerPlatform::default();
        binaries.set(Platform::Android, resolved(Platform::Android, "builds/a/1"));

        let run_config = build_run_config(&config, &[Platform::Android], &binaries);
        assert!(run_config.android.is_some());
        assert!(run_config.ios.is_none());
    }

    #[test]
    fn platform_without_devices_has_no_section() {
        let config = config(vec![device("iphone.15", "17.5")]);
        let binaries = PerPlatform::default();

        let run_config =
            build_run_config(&config, &[Platform::Android, Platform::Ios], &binaries);
        assert!(run_config.android.is_none());
        assert!(run_config.ios.is_some());
    }

    #[test]
    fn device_fields_map_to_wire_names() {
        let mut d = device("iphone.15", "17.5");
        d.os_theme = "dark".into();
        d.os_locale = "de_DE".into();
        d.font_scale = Some("1.5".into());
        let config = config(vec![d]);

        let run_config = build_run_config(&config, &[Platform::Ios], &PerPlatform::default());
        let ios_device = &run_config.ios.unwrap().devices[0];
        assert_eq!(ios_device.theme, "dark");
        assert_eq!(ios_device.locale, "de_DE");
        assert_eq!(ios_device.font_scale.as_deref(), Some("1.5"));
    }

    #[test]
    fn results_url_carries_all_parts() {
        let url = results_url("team-0123456789ab", 4, 17);
        assert_eq!(
            url,
            "https://app.useglance.dev/run?teamId=team-0123456789ab&projectIndex=4&runIndex=17"
        );
    }
}
