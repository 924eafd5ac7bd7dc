//! Shared harness for controller integration tests
//!
//! Provides a scripted authentication service and helpers to wire a
//! controller against in-memory or on-disk preferences.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use allva_config::LoginPolicy;
use allva_core::auth::StaticDeviceContext;
use allva_core::{
    AuthClient, AuthClientError, CatalogLocalization, ControllerDeps,
    Localization, LoginAttemptController, PreferenceStore,
};
use allva_model::{
    LoginFailure, LoginFailureReason, LoginRequest, RecoveryFailure,
    SessionResult, UserType,
};
use async_trait::async_trait;
use parking_lot::Mutex;

/// What the scripted service answers to one login call.
#[derive(Debug, Clone)]
pub enum Reply {
    Accept,
    Reject(LoginFailureReason),
    Unreachable,
    Panic,
}

#[derive(Debug)]
pub struct ScriptedAuthClient {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    recovery_fails: bool,
    login_calls: AtomicUsize,
    recovery_calls: AtomicUsize,
    last_request: Mutex<Option<LoginRequest>>,
}

impl ScriptedAuthClient {
    pub fn always(reply: Reply) -> Arc<Self> {
        Self::scripted([], reply)
    }

    /// Play `replies` in order, then answer `fallback` forever.
    pub fn scripted(
        replies: impl IntoIterator<Item = Reply>,
        fallback: Reply,
    ) -> Arc<Self> {
        Arc::new(Self::build(replies, fallback, false))
    }

    pub fn with_failing_recovery() -> Arc<Self> {
        Arc::new(Self::build([], Reply::Accept, true))
    }

    fn build(
        replies: impl IntoIterator<Item = Reply>,
        fallback: Reply,
        recovery_fails: bool,
    ) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            fallback,
            recovery_fails,
            login_calls: AtomicUsize::new(0),
            recovery_calls: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn login_calls(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn recovery_calls(&self) -> usize {
        self.recovery_calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<LoginRequest> {
        self.last_request.lock().clone()
    }
}

#[async_trait]
impl AuthClient for ScriptedAuthClient {
    async fn login(
        &self,
        request: &LoginRequest,
    ) -> Result<SessionResult, AuthClientError> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock() = Some(request.clone());

        let reply = self
            .script
            .lock()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Accept => Ok(SessionResult {
                user_name: "Scripted User".into(),
                user_number: request.credentials.user_number().into(),
                office_code: request.credentials.office_code().into(),
                user_type: UserType::Employee,
                token: "token-test".into(),
            }),
            Reply::Reject(reason) => Err(LoginFailure::new(reason).into()),
            Reply::Unreachable => Err(AuthClientError::Transport(anyhow::anyhow!(
                "connection refused"
            ))),
            Reply::Panic => panic!("scripted auth client blew up"),
        }
    }

    async fn request_password_recovery(
        &self,
        _user_number: &str,
    ) -> Result<(), RecoveryFailure> {
        self.recovery_calls.fetch_add(1, Ordering::SeqCst);
        if self.recovery_fails {
            Err(RecoveryFailure::new("mail relay down"))
        } else {
            Ok(())
        }
    }
}

pub struct Harness {
    pub controller: LoginAttemptController,
    pub preferences: Arc<PreferenceStore>,
}

pub fn harness(client: Arc<dyn AuthClient>) -> Harness {
    harness_with(client, Arc::new(PreferenceStore::in_memory()))
}

pub fn harness_with(
    client: Arc<dyn AuthClient>,
    preferences: Arc<PreferenceStore>,
) -> Harness {
    harness_full(
        client,
        preferences,
        Arc::new(CatalogLocalization::keys_only()),
    )
}

pub fn harness_full(
    client: Arc<dyn AuthClient>,
    preferences: Arc<PreferenceStore>,
    localization: Arc<dyn Localization>,
) -> Harness {
    build(LoginPolicy::default(), client, preferences, localization)
}

/// Controller running `policy` instead of the defaults.
pub fn harness_with_policy(
    policy: LoginPolicy,
    client: Arc<dyn AuthClient>,
) -> Harness {
    build(
        policy,
        client,
        Arc::new(PreferenceStore::in_memory()),
        Arc::new(CatalogLocalization::keys_only()),
    )
}

fn build(
    policy: LoginPolicy,
    client: Arc<dyn AuthClient>,
    preferences: Arc<PreferenceStore>,
    localization: Arc<dyn Localization>,
) -> Harness {
    let deps = ControllerDeps {
        client,
        device: Arc::new(StaticDeviceContext::default()),
        preferences: Arc::clone(&preferences),
        localization,
    };
    Harness {
        controller: LoginAttemptController::new(policy, deps),
        preferences,
    }
}

pub fn fill(
    controller: &LoginAttemptController,
    user: &str,
    password: &str,
    office: &str,
) {
    controller.set_user_number(user);
    controller.set_password(password);
    controller.set_office_code(office);
}

/// Text currently in the message area, if any.
pub fn message(controller: &LoginAttemptController) -> Option<String> {
    controller.snapshot().message.map(|m| m.text)
}
