//! Login core of the Allva desktop client.
//!
//! [`PreferenceStore`] keeps the small per-device settings file and
//! [`LoginAttemptController`] drives a login form against an
//! [`AuthClient`], counting failures and running the lockout countdown.

pub mod auth;
pub mod localization;
pub mod preferences;

pub use auth::{
    AttemptState, AuthClient, AuthClientError, ControllerDeps,
    DeviceContextProvider, LocalDeviceContext, LockoutState,
    LoginAttemptController, LoginError, LoginEvent, LoginSnapshot,
    RecoveryError, SimulatedAuthClient, TimeoutAuthClient, ValidationError,
};
pub use localization::{CatalogLocalization, Localization, MessageKey};
pub use preferences::{PreferenceError, PreferenceStore};
