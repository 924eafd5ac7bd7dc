//! Device context attached to every login request.
//!
//! Collection is best-effort: a provider never fails, it falls back to
//! [`UNKNOWN_MAC_ADDRESS`] and [`FALLBACK_LOCAL_IP`] instead.

use std::sync::Arc;

use allva_model::{DeviceContext, FALLBACK_LOCAL_IP, UNKNOWN_MAC_ADDRESS};

use crate::preferences::PreferenceStore;

/// Source of the [`DeviceContext`] attached to each login request.
pub trait DeviceContextProvider: Send + Sync {
    /// Fresh context for one submission. Must not fail.
    fn device_context(&self) -> DeviceContext;
}

/// Provider used by the desktop client.
///
/// The device id comes from the preference store (created on first use).
/// Network identifiers are not looked up and always carry their fallbacks.
#[derive(Debug)]
pub struct LocalDeviceContext {
    preferences: Arc<PreferenceStore>,
    user_agent: String,
}

impl LocalDeviceContext {
    /// Provider reading the device id from `preferences`; see
    /// [`user_agent`] for the reported agent string.
    pub fn new(preferences: Arc<PreferenceStore>, app_version: &str) -> Self {
        Self {
            preferences,
            user_agent: user_agent(app_version),
        }
    }

    /// Agent string sent with every request.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

impl DeviceContextProvider for LocalDeviceContext {
    fn device_context(&self) -> DeviceContext {
        let context = DeviceContext::with_fallbacks(
            self.preferences.device_id(),
            self.user_agent.clone(),
        );
        log::debug!(
            "[DeviceContext] device {} mac={} ip={}",
            short_id(&context.device_id),
            context.mac_address,
            context.local_ip
        );
        context
    }
}

/// `AllvaDesktop/<version> (<os>; <arch>)`, or `AllvaDesktop/<version>`
/// when the platform is unknown.
pub fn user_agent(app_version: &str) -> String {
    let os = std::env::consts::OS;
    let arch = std::env::consts::ARCH;
    if os.is_empty() {
        format!("AllvaDesktop/{app_version}")
    } else {
        format!("AllvaDesktop/{app_version} ({os}; {arch})")
    }
}

/// First 8 characters, enough to correlate log lines.
pub(crate) fn short_id(id: &str) -> &str {
    id.char_indices().nth(8).map_or(id, |(idx, _)| &id[..idx])
}

/// Fixed context for demos and tests.
#[derive(Debug, Clone)]
pub struct StaticDeviceContext(pub DeviceContext);

impl Default for StaticDeviceContext {
    fn default() -> Self {
        Self(DeviceContext {
            device_id: "00000000-0000-4000-8000-000000000000".to_string(),
            mac_address: UNKNOWN_MAC_ADDRESS.to_string(),
            local_ip: FALLBACK_LOCAL_IP.to_string(),
            user_agent: user_agent(env!("CARGO_PKG_VERSION")),
        })
    }
}

impl DeviceContextProvider for StaticDeviceContext {
    fn device_context(&self) -> DeviceContext {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_context_uses_persisted_id_and_fallbacks() {
        let prefs = Arc::new(PreferenceStore::in_memory());
        let provider = LocalDeviceContext::new(Arc::clone(&prefs), "1.2.3");

        let first = provider.device_context();
        let second = provider.device_context();

        assert_eq!(first.device_id, prefs.device_id());
        assert_eq!(first.device_id, second.device_id);
        assert_eq!(first.mac_address, UNKNOWN_MAC_ADDRESS);
        assert_eq!(first.local_ip, FALLBACK_LOCAL_IP);
        assert!(first.user_agent.starts_with("AllvaDesktop/1.2.3"));
    }

    #[test]
    fn short_id_truncates() {
        assert_eq!(short_id("0123456789abcdef"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
