//! Scan configuration collected by the generator form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lowest accepted scan timeout in seconds.
pub const MIN_TIMEOUT_SECS: u32 = 1;

/// Highest accepted scan timeout in seconds.
pub const MAX_TIMEOUT_SECS: u32 = 60;

/// Default port list offered to signed-in users.
pub const DEFAULT_PORT_RANGE: &str = "22,80,443,445,3389";

/// Operating system the generated script should target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OsTarget {
    #[default]
    CrossPlatform,
    Linux,
    Windows,
    Macos,
}

impl OsTarget {
    /// All targets in form order.
    pub const ALL: [OsTarget; 4] = [
        OsTarget::CrossPlatform,
        OsTarget::Linux,
        OsTarget::Windows,
        OsTarget::Macos,
    ];

    /// Wire value, also used in the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            OsTarget::CrossPlatform => "cross-platform",
            OsTarget::Linux => "linux",
            OsTarget::Windows => "windows",
            OsTarget::Macos => "macos",
        }
    }

    /// Label shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            OsTarget::CrossPlatform => "Universal",
            OsTarget::Linux => "Linux",
            OsTarget::Windows => "Windows",
            OsTarget::Macos => "macOS",
        }
    }
}

impl fmt::Display for OsTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OsTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OsTarget::ALL
            .into_iter()
            .find(|target| target.as_str() == s)
            .ok_or_else(|| format!("unknown OS target: {}", s))
    }
}

/// Scan options passed to the prompt builder.
///
/// The record is replaced wholesale by form submissions and is treated as
/// immutable once handed to the prompt builder. Field names serialize in
/// camelCase so saved history entries keep the same shape as exported JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScriptConfig {
    pub scan_wifi: bool,
    pub scan_bluetooth: bool,
    pub include_mac: bool,
    pub os_target: OsTarget,
    /// Seconds, 1 to 60.
    pub scan_timeout: u32,
    pub deep_scan: bool,
    pub scan_ports: bool,
    pub port_range: String,
    /// Offline: write a JSON report.
    pub export_report: bool,
    /// Online: public IP and location lookup.
    pub online_geo_ip: bool,
    /// Hybrid: Nmap vulnerability scripts.
    pub vuln_scan: bool,
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            scan_wifi: true,
            scan_bluetooth: true,
            include_mac: true,
            os_target: OsTarget::CrossPlatform,
            scan_timeout: 5,
            deep_scan: false,
            scan_ports: false,
            port_range: DEFAULT_PORT_RANGE.to_string(),
            export_report: false,
            online_geo_ip: false,
            vuln_scan: false,
        }
    }
}

impl ScriptConfig {
    /// Clamp a raw timeout into the accepted range.
    pub fn clamp_timeout(raw: i64) -> u32 {
        raw.clamp(MIN_TIMEOUT_SECS as i64, MAX_TIMEOUT_SECS as i64) as u32
    }

    /// Summary used in activity log details.
    pub fn targets_summary(&self) -> String {
        format!(
            "Targets: WiFi={}, BLE={}, Online={}, Deep={}",
            self.scan_wifi, self.scan_bluetooth, self.online_geo_ip, self.deep_scan
        )
    }
}
