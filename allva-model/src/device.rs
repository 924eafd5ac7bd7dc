//! Device information attached to every login request.

use serde::{Deserialize, Serialize};

/// Reported when no usable network interface is found.
pub const UNKNOWN_MAC_ADDRESS: &str = "UNKNOWN";

/// Reported when no non-loopback IPv4 address is found.
pub const FALLBACK_LOCAL_IP: &str = "127.0.0.1";

/// Best-effort fingerprint of the machine submitting a login.
///
/// Only `device_id` is durable (it lives in the preference store); the
/// remaining fields are collected again for every submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceContext {
    /// Install-scoped UUID persisted in the preference store.
    pub device_id: String,
    /// MAC of the first usable interface, or [`UNKNOWN_MAC_ADDRESS`].
    pub mac_address: String,
    /// First non-loopback IPv4 address, or [`FALLBACK_LOCAL_IP`].
    pub local_ip: String,
    /// Client name, version and platform, e.g. `AllvaDesktop/0.1.0 (linux; x86_64)`.
    pub user_agent: String,
}

impl DeviceContext {
    /// Context carrying only the device id, with every collected field at its
    /// documented fallback.
    pub fn with_fallbacks(
        device_id: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Self {
        Self {
            device_id: device_id.into(),
            mac_address: UNKNOWN_MAC_ADDRESS.to_string(),
            local_ip: FALLBACK_LOCAL_IP.to_string(),
            user_agent: user_agent.into(),
        }
    }
}
