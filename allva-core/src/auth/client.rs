//! Authentication service trait and decorators
//!
//! This is the contract the controller uses to reach the remote identity
//! service. The service is the authority for credentials, office membership
//! and device trust. For the offline demo directory see
//! [`SimulatedAuthClient`](super::SimulatedAuthClient).

use std::sync::Arc;
use std::time::Duration;

use allva_model::{LoginRequest, RecoveryFailure, SessionResult};
use async_trait::async_trait;

use super::errors::AuthClientError;

/// Remote authentication collaborator
#[async_trait]
pub trait AuthClient: Send + Sync {
    /// Authenticate the request's credentials from the request's device
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<SessionResult, AuthClientError>;

    /// Ask the service to start a password reset for `user_number`
    async fn request_password_recovery(
        &self,
        user_number: &str,
    ) -> Result<(), RecoveryFailure>;
}

#[async_trait]
impl<T: AuthClient + ?Sized> AuthClient for Arc<T> {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<SessionResult, AuthClientError> {
        (**self).login(request).await
    }

    async fn request_password_recovery(
        &self,
        user_number: &str,
    ) -> Result<(), RecoveryFailure> {
        (**self).request_password_recovery(user_number).await
    }
}

/// Bounds every call on the wrapped client.
///
/// An elapsed login surfaces as [`AuthClientError::Timeout`], which the
/// controller treats like any other connection failure.
#[derive(Debug, Clone)]
pub struct TimeoutAuthClient<C> {
    inner: C,
    timeout: Duration,
}

impl<C> TimeoutAuthClient<C> {
    /// Bound every call on `inner` by `timeout`.
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Deadline applied to each call.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Unwrap the inner client.
    pub fn into_inner(self) -> C {
        self.inner
    }
}

#[async_trait]
impl<C: AuthClient> AuthClient for TimeoutAuthClient<C> {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<SessionResult, AuthClientError> {
        tokio::time::timeout(self.timeout, self.inner.login(request))
            .await
            .map_err(|_| AuthClientError::Timeout(self.timeout))?
    }

    async fn request_password_recovery(
        &self,
        user_number: &str,
    ) -> Result<(), RecoveryFailure> {
        match tokio::time::timeout(
            self.timeout,
            self.inner.request_password_recovery(user_number),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(RecoveryFailure::new(format!(
                "recovery request timed out after {:?}",
                self.timeout
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allva_model::{DeviceContext, LoginCredentials};

    struct Stalled;

    #[async_trait]
    impl AuthClient for Stalled {
        async fn login(
            &self,
            _request: &LoginRequest,
        ) -> Result<SessionResult, AuthClientError> {
            std::future::pending().await
        }

        async fn request_password_recovery(
            &self,
            _user_number: &str,
        ) -> Result<(), RecoveryFailure> {
            std::future::pending().await
        }
    }

    fn request() -> LoginRequest {
        LoginRequest::new(
            LoginCredentials::new("1001", "Admin123!", "abc"),
            DeviceContext::with_fallbacks("device", "test-agent"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_login_times_out() {
        let client = TimeoutAuthClient::new(Stalled, Duration::from_secs(30));
        let err = client.login(&request()).await.unwrap_err();
        assert!(matches!(err, AuthClientError::Timeout(d) if d == Duration::from_secs(30)));
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_recovery_times_out() {
        let client = TimeoutAuthClient::new(Stalled, Duration::from_secs(5));
        let err = client.request_password_recovery("1001").await.unwrap_err();
        assert!(err.detail.contains("timed out"));
    }
}
