//! Identity-gated scan features.
//!
//! Advanced options only change while an identity is held. Without one the
//! caller is routed to sign-in and the configuration is left alone.

use std::fmt;
use std::str::FromStr;

use crate::config::ScriptConfig;
use crate::identity::GitHubUser;

/// A configuration flag that requires a signed-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GatedFeature {
    DeepScan,
    VulnScan,
    ScanPorts,
    OnlineGeoIp,
}

impl GatedFeature {
    pub const ALL: [GatedFeature; 4] = [
        GatedFeature::DeepScan,
        GatedFeature::VulnScan,
        GatedFeature::ScanPorts,
        GatedFeature::OnlineGeoIp,
    ];

    /// Path segment used by the web form.
    pub fn slug(&self) -> &'static str {
        match self {
            GatedFeature::DeepScan => "deep-scan",
            GatedFeature::VulnScan => "vuln-scan",
            GatedFeature::ScanPorts => "scan-ports",
            GatedFeature::OnlineGeoIp => "online-geo-ip",
        }
    }

    /// Vulnerability scan and GeoIP hang off deep scan.
    pub fn requires_deep_scan(&self) -> bool {
        matches!(self, GatedFeature::VulnScan | GatedFeature::OnlineGeoIp)
    }

    /// Current value of the flag.
    pub fn get(&self, config: &ScriptConfig) -> bool {
        match self {
            GatedFeature::DeepScan => config.deep_scan,
            GatedFeature::VulnScan => config.vuln_scan,
            GatedFeature::ScanPorts => config.scan_ports,
            GatedFeature::OnlineGeoIp => config.online_geo_ip,
        }
    }

    fn set(&self, config: &mut ScriptConfig, value: bool) {
        match self {
            GatedFeature::DeepScan => config.deep_scan = value,
            GatedFeature::VulnScan => config.vuln_scan = value,
            GatedFeature::ScanPorts => config.scan_ports = value,
            GatedFeature::OnlineGeoIp => config.online_geo_ip = value,
        }
    }
}

impl fmt::Display for GatedFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for GatedFeature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GatedFeature::ALL
            .into_iter()
            .find(|feature| feature.slug() == s)
            .ok_or_else(|| format!("unknown feature: {}", s))
    }
}

/// Outcome of a gated toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// The flag was flipped to the contained value.
    Applied(bool),
    /// No identity: start sign-in instead.
    LoginRequired,
    /// Sub-feature toggled while deep scan is off.
    RequiresDeepScan,
    /// The port range was replaced.
    Updated,
    /// Port scanning is off; the port range was left alone.
    Ignored,
}

/// Whether gated options may be changed.
pub fn can_modify(identity: Option<&GitHubUser>) -> bool {
    identity.is_some()
}

/// Flip a gated flag if the identity allows it.
pub fn toggle(
    config: &mut ScriptConfig,
    feature: GatedFeature,
    identity: Option<&GitHubUser>,
) -> GateDecision {
    if !can_modify(identity) {
        return GateDecision::LoginRequired;
    }
    if feature.requires_deep_scan() && !config.deep_scan {
        return GateDecision::RequiresDeepScan;
    }

    let value = !feature.get(config);
    feature.set(config, value);
    GateDecision::Applied(value)
}

/// Update the port range; only accepted while port scanning is unlocked and on.
pub fn set_port_range(
    config: &mut ScriptConfig,
    port_range: &str,
    identity: Option<&GitHubUser>,
) -> GateDecision {
    if !can_modify(identity) {
        return GateDecision::LoginRequired;
    }
    if !config.scan_ports {
        return GateDecision::Ignored;
    }

    config.port_range = port_range.trim().to_string();
    GateDecision::Updated
}

/// Force every gated flag off. Applied on logout.
pub fn reset_gated(config: &mut ScriptConfig) {
    for feature in GatedFeature::ALL {
        feature.set(config, false);
    }
}
