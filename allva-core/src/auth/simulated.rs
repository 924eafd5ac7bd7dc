//! Offline authentication service used for demos and local testing.
//!
//! Accepts a small fixed directory of accounts after an artificial delay.
//! Anything else is rejected as a wrong password so the lockout flow can be
//! exercised without a server.

use std::time::Duration;

use allva_config::constants::DEFAULT_SIMULATED_LATENCY;
use allva_model::{
    LoginFailure, LoginFailureReason, LoginRequest, RecoveryFailure,
    SessionResult, UserType,
};
use async_trait::async_trait;
use uuid::Uuid;

use super::client::AuthClient;
use super::errors::AuthClientError;

#[derive(Debug, Clone)]
struct DemoAccount {
    user_number: &'static str,
    password: &'static str,
}

const DEMO_ACCOUNTS: [DemoAccount; 3] = [
    DemoAccount {
        user_number: "9999",
        password: "Test1234!",
    },
    DemoAccount {
        user_number: "1001",
        password: "Admin123!",
    },
    DemoAccount {
        user_number: "1002",
        password: "Usuario123!",
    },
];

const ADMIN_USER_NUMBER: &str = "1001";

/// Offline stand-in for the authentication service.
///
/// Knows a fixed set of demo accounts and answers after a fixed delay.
#[derive(Debug, Clone)]
pub struct SimulatedAuthClient {
    latency: Duration,
}

impl Default for SimulatedAuthClient {
    fn default() -> Self {
        Self::new(DEFAULT_SIMULATED_LATENCY)
    }
}

impl SimulatedAuthClient {
    /// Client that waits `latency` before every answer.
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Delay before each answer.
    pub fn latency(&self) -> Duration {
        self.latency
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

/// Display name for a user number in the demo directory.
pub fn display_name(user_number: &str) -> String {
    match user_number {
        "1001" => "Juan Pérez".to_string(),
        "1002" => "María González".to_string(),
        "1003" => "Carlos Rodríguez".to_string(),
        "1004" => "Ana Martínez".to_string(),
        "9999" => "Test User".to_string(),
        other => format!("User {other}"),
    }
}

#[async_trait]
impl AuthClient for SimulatedAuthClient {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<SessionResult, AuthClientError> {
        self.simulate_latency().await;

        let credentials = &request.credentials;
        let known = DEMO_ACCOUNTS.iter().any(|account| {
            account.user_number == credentials.user_number()
                && account.password == credentials.password()
        });

        if !known {
            return Err(LoginFailure::new(LoginFailureReason::PasswordIncorrect)
                .with_detail("invalid credentials")
                .into());
        }

        let user_type = if credentials.user_number() == ADMIN_USER_NUMBER {
            UserType::Admin
        } else {
            UserType::Employee
        };

        Ok(SessionResult {
            user_name: display_name(credentials.user_number()),
            user_number: credentials.user_number().to_string(),
            office_code: credentials.office_code().to_string(),
            user_type,
            token: format!("token-{}", Uuid::new_v4()),
        })
    }

    async fn request_password_recovery(
        &self,
        user_number: &str,
    ) -> Result<(), RecoveryFailure> {
        self.simulate_latency().await;
        log::info!("[SimulatedAuth] Recovery requested for user {user_number}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use allva_model::{DeviceContext, LoginCredentials};

    fn request(user: &str, password: &str, office: &str) -> LoginRequest {
        LoginRequest::new(
            LoginCredentials::new(user, password, office),
            DeviceContext::with_fallbacks("device", "agent"),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_account_logs_in_with_uppercased_office() {
        let client = SimulatedAuthClient::default();
        let session = client
            .login(&request("9999", "Test1234!", "abc"))
            .await
            .unwrap();

        assert_eq!(session.user_name, "Test User");
        assert_eq!(session.office_code, "ABC");
        assert_eq!(session.user_type, UserType::Employee);
        assert!(session.token.starts_with("token-"));
    }

    #[tokio::test(start_paused = true)]
    async fn admin_account_is_admin() {
        let client = SimulatedAuthClient::new(Duration::ZERO);
        let session = client
            .login(&request("1001", "Admin123!", "MAIN"))
            .await
            .unwrap();
        assert!(session.user_type.is_admin());
        assert_eq!(session.user_name, "Juan Pérez");
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_pair_is_a_wrong_password() {
        let client = SimulatedAuthClient::new(Duration::ZERO);
        let err = client
            .login(&request("1001", "wrong-password", "MAIN"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AuthClientError::Rejected(LoginFailure {
                reason: LoginFailureReason::PasswordIncorrect,
                ..
            })
        ));
    }

    #[test]
    fn unknown_numbers_get_generic_names() {
        assert_eq!(display_name("1003"), "Carlos Rodríguez");
        assert_eq!(display_name("4242"), "User 4242");
    }
}
