//! Request payload for the authentication client.

use crate::{DeviceContext, LoginCredentials};

/// Device-fingerprinted login request handed to the authentication client.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// What the user typed, normalised.
    pub credentials: LoginCredentials,
    /// Fingerprint of the submitting machine.
    pub device: DeviceContext,
}

impl LoginRequest {
    /// Pair credentials with the device they were entered on.
    pub fn new(credentials: LoginCredentials, device: DeviceContext) -> Self {
        Self {
            credentials,
            device,
        }
    }
}
