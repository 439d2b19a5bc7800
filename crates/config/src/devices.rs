//! Static device catalog.
//!
//! Maps device ids to their platform and supported OS versions. Used for
//! validation only; the registry owns the authoritative catalog.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Deserialize;

use glance_api::Platform;

/// Catalog entry for one device model.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSpec {
    pub os: Platform,
    pub os_versions: Vec<String>,
}

static CATALOG: LazyLock<HashMap<String, DeviceSpec>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("devices.json")).expect("embedded device catalog is valid")
});

/// The full device catalog.
pub fn catalog() -> &'static HashMap<String, DeviceSpec> {
    &CATALOG
}

/// Platform of a known device id, `None` for unknown ids.
pub fn device_platform(id: &str) -> Option<Platform> {
    CATALOG.get(id).map(|spec| spec.os)
}
