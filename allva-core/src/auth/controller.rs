//! Login attempt controller
//!
//! Owns the login form, the loading flag, the message area and the
//! [`AttemptState`]. Every mutation republishes a [`LoginSnapshot`] on a
//! watch channel; lockout and login milestones go out as [`LoginEvent`]s.
//!
//! The lockout countdown runs as a tokio task that ticks every
//! `LoginPolicy::tick_interval`. It is cancelled when the lockout ends,
//! on [`LoginAttemptController::shutdown`], and when the controller is
//! dropped.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use allva_config::LoginPolicy;
use allva_model::{
    LoginCredentials, LoginFailure, LoginFailureReason, LoginRequest,
    RecoveryFailure, SessionResult,
};
use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::{broadcast, watch};
use tokio_util::sync::{CancellationToken, DropGuard};
use zeroize::Zeroizing;

use super::attempts::{
    AttemptState, FailureOutcome, LockoutState, TickOutcome, lockout_minutes,
};
use super::client::AuthClient;
use super::device::DeviceContextProvider;
use super::errors::{AuthClientError, LoginError, RecoveryError};
use super::state_types::{LoginEvent, LoginForm, LoginSnapshot, StatusMessage};
use super::validation::validate;
use crate::localization::{Localization, MessageKey};
use crate::preferences::{PreferenceStore, keys};

const EVENT_CAPACITY: usize = 64;

/// Collaborators the controller talks to.
#[derive(Clone)]
pub struct ControllerDeps {
    /// Remote authentication service.
    pub client: Arc<dyn AuthClient>,
    /// Fingerprint attached to each request.
    pub device: Arc<dyn DeviceContextProvider>,
    /// Remembered session and device id.
    pub preferences: Arc<PreferenceStore>,
    /// Message catalog.
    pub localization: Arc<dyn Localization>,
}

impl fmt::Debug for ControllerDeps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerDeps")
            .field("preferences", &self.preferences)
            .finish_non_exhaustive()
    }
}

/// Drives one login form: validation, submission, the failed-attempt
/// counter and the lockout countdown.
///
/// All methods take `&self`; state sits behind a single lock and every
/// change is published to [`subscribe`](Self::subscribe) receivers.
/// Dropping the controller cancels a running countdown.
pub struct LoginAttemptController {
    shared: Arc<Shared>,
    _shutdown_on_drop: DropGuard,
}

impl fmt::Debug for LoginAttemptController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginAttemptController")
            .field("policy", &self.shared.policy)
            .field("state", &*self.shared.state.lock())
            .finish_non_exhaustive()
    }
}

struct Shared {
    state: Mutex<ControllerState>,
    policy: LoginPolicy,
    client: Arc<dyn AuthClient>,
    device: Arc<dyn DeviceContextProvider>,
    preferences: Arc<PreferenceStore>,
    localization: Arc<dyn Localization>,
    snapshots: watch::Sender<LoginSnapshot>,
    events: broadcast::Sender<LoginEvent>,
    shutdown: CancellationToken,
}

#[derive(Debug, Default)]
struct ControllerState {
    form: LoginForm,
    is_loading: bool,
    message: Option<StatusMessage>,
    attempts: AttemptState,
    countdown: Option<CancellationToken>,
}

impl ControllerState {
    fn can_submit(&self) -> bool {
        !self.is_loading && !self.attempts.is_locked() && self.form.fields_present()
    }
}

impl LoginAttemptController {
    /// Build a controller, pre-filling the form from a remembered session.
    ///
    /// Does not need a runtime; tasks are only spawned by the async
    /// operations.
    pub fn new(policy: LoginPolicy, deps: ControllerDeps) -> Self {
        let mut state = ControllerState::default();
        restore_remembered(&deps.preferences, &mut state.form);

        let shutdown = CancellationToken::new();
        let (snapshots, _) = watch::channel(LoginSnapshot::default());
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        let shared = Arc::new(Shared {
            state: Mutex::new(state),
            policy,
            client: deps.client,
            device: deps.device,
            preferences: deps.preferences,
            localization: deps.localization,
            snapshots,
            events,
            shutdown: shutdown.clone(),
        });
        shared.publish(&shared.state.lock());

        Self {
            shared,
            _shutdown_on_drop: shutdown.drop_guard(),
        }
    }

    /// Policy this controller was built with.
    pub fn policy(&self) -> &LoginPolicy {
        &self.shared.policy
    }

    /// Replace the user number field.
    pub fn set_user_number(&self, value: impl Into<String>) {
        let value = value.into();
        self.shared.update_form(|form| form.user_number = value);
    }

    /// Replace the password field. The old value is zeroed.
    pub fn set_password(&self, value: impl Into<String>) {
        let value = Zeroizing::new(value.into());
        self.shared.update_form(|form| form.password = value);
    }

    /// Replace the office code field.
    pub fn set_office_code(&self, value: impl Into<String>) {
        let value = value.into();
        self.shared.update_form(|form| form.office_code = value);
    }

    /// Whether a successful login should be remembered.
    pub fn set_remember_session(&self, remember: bool) {
        self.shared
            .update_form(|form| form.remember_session = remember);
    }

    /// Not loading, not locked, and every field filled.
    pub fn can_submit(&self) -> bool {
        self.shared.state.lock().can_submit()
    }

    /// A login or recovery request is in flight.
    pub fn is_loading(&self) -> bool {
        self.shared.state.lock().is_loading
    }

    /// Copy of the failure counter and lockout state.
    pub fn attempt_state(&self) -> AttemptState {
        self.shared.state.lock().attempts
    }

    /// Time until the lockout ends, zero when unlocked.
    pub fn lockout_remaining(&self) -> Duration {
        self.attempt_state()
            .lockout_remaining(self.shared.policy.tick_interval)
    }

    /// Latest published view state.
    pub fn snapshot(&self) -> LoginSnapshot {
        self.shared.snapshots.borrow().clone()
    }

    /// Receiver that sees every view state change.
    pub fn subscribe(&self) -> watch::Receiver<LoginSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// One-shot events such as lockout ticks and successful logins.
    ///
    /// Slow receivers may lag and lose events; snapshots never do.
    pub fn events(&self) -> broadcast::Receiver<LoginEvent> {
        self.shared.events.subscribe()
    }

    /// Validate the form and run one login attempt.
    ///
    /// On success the attempt counter resets, remembered-session
    /// preferences are updated and [`LoginEvent::LoginSucceeded`] is sent.
    /// Every failure also lands in the message area.
    pub async fn submit(&self) -> Result<SessionResult, LoginError> {
        let (credentials, remember) = self.shared.begin_submit()?;
        let guard = LoadingGuard::new(&self.shared);

        let user_number = credentials.user_number().to_string();
        let office_code = credentials.office_code().to_string();
        let request =
            LoginRequest::new(credentials, self.shared.device.device_context());
        debug!(
            "[LoginController] Submitting login for user {user_number} at office {office_code}"
        );

        let client = Arc::clone(&self.shared.client);
        let outcome =
            match tokio::spawn(async move { client.login(&request).await }).await {
                Ok(outcome) => outcome,
                Err(join_err) => Err(AuthClientError::Transport(join_err.into())),
            };

        guard.disarm();
        self.shared
            .finish_submit(outcome, remember, &user_number, &office_code)
    }

    /// Ask the service to reset the password of the user number in the form.
    pub async fn request_password_recovery(&self) -> Result<(), RecoveryError> {
        let user_number = self.shared.begin_recovery()?;
        let guard = LoadingGuard::new(&self.shared);

        let client = Arc::clone(&self.shared.client);
        let task_user = user_number.clone();
        let outcome = match tokio::spawn(async move {
            client.request_password_recovery(&task_user).await
        })
        .await
        {
            Ok(outcome) => outcome,
            Err(join_err) => Err(RecoveryFailure::new(join_err.to_string())),
        };

        guard.disarm();
        self.shared.finish_recovery(&user_number, outcome)
    }

    /// Empty the credential fields and the message area.
    pub fn clear_form(&self) {
        let mut state = self.shared.state.lock();
        state.form.clear();
        state.message = None;
        self.shared.publish(&state);
    }

    /// Switch to the next language and clear the message area.
    pub fn toggle_language(&self) {
        self.shared.localization.toggle_language();
        let mut state = self.shared.state.lock();
        state.message = None;
        self.shared.publish(&state);
    }

    /// Return to a fresh login form after a session ends.
    ///
    /// A running lockout is left alone.
    pub fn logout(&self) {
        let mut state = self.shared.state.lock();
        state.form.clear();
        state.message = None;
        restore_remembered(&self.shared.preferences, &mut state.form);
        self.shared.publish(&state);
        info!("[LoginController] Logged out");
    }

    /// Stop the countdown task. The controller is unusable for lockouts
    /// afterwards.
    pub fn shutdown(&self) {
        self.shared.shutdown.cancel();
    }
}

impl Shared {
    fn publish(&self, state: &ControllerState) {
        let snapshot = LoginSnapshot {
            user_number: state.form.user_number.clone(),
            office_code: state.form.office_code.clone(),
            has_password: !state.form.password.is_empty(),
            remember_session: state.form.remember_session,
            is_loading: state.is_loading,
            message: state.message.clone(),
            attempts: state.attempts,
            can_submit: state.can_submit(),
            language: self.localization.language(),
        };
        self.snapshots.send_replace(snapshot);
    }

    fn emit(&self, event: LoginEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }

    fn show_error(
        &self,
        state: &mut ControllerState,
        key: MessageKey,
        args: &[String],
    ) -> String {
        let text = self.localization.format(key, args);
        state.message = Some(StatusMessage::error(text.clone()));
        text
    }

    fn update_form(&self, apply: impl FnOnce(&mut LoginForm)) {
        let mut state = self.state.lock();
        apply(&mut state.form);
        self.publish(&state);
    }

    fn begin_submit(&self) -> Result<(LoginCredentials, bool), LoginError> {
        let mut state = self.state.lock();
        if state.is_loading {
            return Err(LoginError::InFlight);
        }
        if let LockoutState::Locked { ticks_remaining } = state.attempts.lockout() {
            debug!(
                "[LoginController] Submit ignored, locked for {ticks_remaining} more ticks"
            );
            return Err(LoginError::Locked { ticks_remaining });
        }
        if let Err(err) = validate(&state.form, &self.policy) {
            self.show_error(&mut state, err.message_key(), &err.message_args());
            self.publish(&state);
            return Err(err.into());
        }

        state.is_loading = true;
        state.message = None;
        self.publish(&state);
        Ok((state.form.credentials(), state.form.remember_session))
    }

    fn finish_submit(
        self: &Arc<Self>,
        outcome: Result<SessionResult, AuthClientError>,
        remember: bool,
        user_number: &str,
        office_code: &str,
    ) -> Result<SessionResult, LoginError> {
        let mut state = self.state.lock();
        state.is_loading = false;

        let result = match outcome {
            Ok(session) => {
                state.attempts.record_success();
                state.message = None;
                if let Some(countdown) = state.countdown.take() {
                    countdown.cancel();
                }
                self.remember_login(remember, user_number, office_code);
                info!(
                    "[LoginController] Login succeeded for user {} ({}) at office {}",
                    session.user_number, session.user_type, session.office_code
                );
                self.emit(LoginEvent::LoginSucceeded(session.clone()));
                Ok(session)
            }
            Err(AuthClientError::Rejected(failure)) => {
                Err(self.handle_rejection(&mut state, failure))
            }
            Err(err) => {
                warn!("[LoginController] Login request failed: {err}");
                let message =
                    self.show_error(&mut state, MessageKey::ErrorConnection, &[]);
                Err(LoginError::Connection { message })
            }
        };

        self.publish(&state);
        result
    }

    fn handle_rejection(
        self: &Arc<Self>,
        state: &mut ControllerState,
        failure: LoginFailure,
    ) -> LoginError {
        let reason = failure.reason;
        if let Some(detail) = &failure.detail {
            debug!("[LoginController] Server detail for {reason}: {detail}");
        }

        match state.attempts.record_failure(reason, &self.policy) {
            FailureOutcome::LockedOut { ticks_remaining } => {
                let minutes =
                    lockout_minutes(ticks_remaining, self.policy.tick_interval);
                let message = self.show_error(
                    state,
                    MessageKey::ErrorUserBlocked,
                    &[minutes.to_string()],
                );
                info!(
                    "[LoginController] Too many failed attempts, locked for {ticks_remaining} ticks"
                );
                self.start_countdown(state);
                self.emit(LoginEvent::LockoutStarted { ticks_remaining });
                LoginError::LockoutStarted {
                    ticks_remaining,
                    minutes,
                    message,
                }
            }
            FailureOutcome::Counted { failed_count } => {
                debug!(
                    "[LoginController] Login rejected ({reason}), {failed_count} failed attempts"
                );
                let (key, args) = match reason {
                    LoginFailureReason::PasswordIncorrect => (
                        MessageKey::ErrorPasswordIncorrect,
                        vec![
                            self.policy
                                .remaining_attempts(failed_count)
                                .to_string(),
                        ],
                    ),
                    LoginFailureReason::UserNotFound => {
                        (MessageKey::ErrorUserNotFound, Vec::new())
                    }
                    LoginFailureReason::UserBlocked => {
                        (MessageKey::ErrorAccountBlocked, Vec::new())
                    }
                    LoginFailureReason::InvalidOffice => {
                        (MessageKey::ErrorOfficeInvalid, Vec::new())
                    }
                    LoginFailureReason::NoOfficePermission => {
                        (MessageKey::ErrorNoPermission, Vec::new())
                    }
                    LoginFailureReason::CompanyInactive => {
                        (MessageKey::ErrorCompanyInactive, Vec::new())
                    }
                    LoginFailureReason::DeviceUnauthorized => {
                        (MessageKey::ErrorDeviceUnauthorized, Vec::new())
                    }
                    LoginFailureReason::Generic => {
                        (MessageKey::ErrorGeneric, Vec::new())
                    }
                };
                let message = self.show_error(state, key, &args);
                LoginError::Rejected { reason, message }
            }
        }
    }

    fn remember_login(&self, remember: bool, user_number: &str, office_code: &str) {
        if remember {
            self.preferences.set(keys::LAST_USER, user_number);
            self.preferences.set(keys::LAST_OFFICE, office_code);
            self.preferences.set(keys::REMEMBER_SESSION, true);
        } else {
            self.preferences.remove_all(&[
                keys::LAST_USER,
                keys::LAST_OFFICE,
                keys::REMEMBER_SESSION,
            ]);
        }
    }

    fn start_countdown(self: &Arc<Self>, state: &mut ControllerState) {
        if let Some(previous) = state.countdown.take() {
            previous.cancel();
        }
        let token = self.shutdown.child_token();
        state.countdown = Some(token.clone());
        tokio::spawn(run_countdown(Arc::clone(self), token));
    }

    /// Apply one countdown tick. Returns whether the countdown continues.
    fn apply_tick(&self, token: &CancellationToken) -> bool {
        let mut state = self.state.lock();
        if token.is_cancelled() {
            return false;
        }

        let keep_running = match state.attempts.tick() {
            TickOutcome::Remaining { ticks_remaining } => {
                let minutes =
                    lockout_minutes(ticks_remaining, self.policy.tick_interval);
                self.show_error(
                    &mut state,
                    MessageKey::ErrorUserBlockedRemaining,
                    &[minutes.to_string()],
                );
                debug!("[LoginController] Lockout tick, {ticks_remaining} left");
                self.emit(LoginEvent::LockoutTick { ticks_remaining });
                true
            }
            TickOutcome::Unlocked => {
                state.message = None;
                state.countdown = None;
                info!("[LoginController] Lockout ended");
                self.emit(LoginEvent::LockoutEnded);
                false
            }
            TickOutcome::Idle => {
                state.countdown = None;
                false
            }
        };

        self.publish(&state);
        keep_running
    }

    fn begin_recovery(&self) -> Result<String, RecoveryError> {
        let mut state = self.state.lock();
        if state.is_loading {
            return Err(RecoveryError::InFlight);
        }
        let user_number = state.form.user_number.trim().to_string();
        if user_number.is_empty() {
            self.show_error(
                &mut state,
                MessageKey::RecoveryUserRequiredMessage,
                &[],
            );
            self.publish(&state);
            return Err(RecoveryError::UserRequired);
        }

        state.is_loading = true;
        state.message = None;
        self.publish(&state);
        Ok(user_number)
    }

    fn finish_recovery(
        &self,
        user_number: &str,
        outcome: Result<(), RecoveryFailure>,
    ) -> Result<(), RecoveryError> {
        let mut state = self.state.lock();
        state.is_loading = false;

        let result = match outcome {
            Ok(()) => {
                info!("[LoginController] Password recovery requested for user {user_number}");
                let text = self.localization.get(MessageKey::RecoverySuccessMessage);
                state.message = Some(StatusMessage::notice(text));
                Ok(())
            }
            Err(failure) => {
                warn!(
                    "[LoginController] Password recovery failed for user {user_number}: {}",
                    failure.detail
                );
                let message =
                    self.show_error(&mut state, MessageKey::RecoveryErrorGeneric, &[]);
                Err(RecoveryError::Failed { message })
            }
        };

        self.publish(&state);
        result
    }
}

async fn run_countdown(shared: Arc<Shared>, token: CancellationToken) {
    let interval = shared.policy.tick_interval;
    loop {
        tokio::select! {
            () = token.cancelled() => {
                debug!("[LoginController] Lockout countdown cancelled");
                return;
            }
            () = tokio::time::sleep(interval) => {}
        }
        if !shared.apply_tick(&token) {
            return;
        }
    }
}

fn restore_remembered(preferences: &PreferenceStore, form: &mut LoginForm) {
    if !preferences.get(keys::REMEMBER_SESSION, false) {
        return;
    }
    form.user_number = preferences.get_str(keys::LAST_USER, "");
    form.office_code = preferences.get_str(keys::LAST_OFFICE, "");
    form.remember_session = true;
    debug!(
        "[LoginController] Restored remembered user {}",
        form.user_number
    );
}

/// Clears the loading flag if the awaiting future is dropped mid-request.
struct LoadingGuard<'a> {
    shared: &'a Shared,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(shared: &'a Shared) -> Self {
        Self {
            shared,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.shared.state.lock();
            state.is_loading = false;
            self.shared.publish(&state);
        }
    }
}
