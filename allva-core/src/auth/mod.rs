//! Login attempt handling: validation, lockout, and the collaborator seams
//! the controller reaches through.

pub mod attempts;
pub mod client;
pub mod controller;
pub mod device;
pub mod errors;
pub mod simulated;
pub mod state_types;
pub mod validation;

pub use attempts::{AttemptState, LockoutState};
pub use client::{AuthClient, TimeoutAuthClient};
pub use controller::{ControllerDeps, LoginAttemptController};
pub use device::{DeviceContextProvider, LocalDeviceContext, StaticDeviceContext};
pub use errors::{AuthClientError, LoginError, RecoveryError, ValidationError};
pub use simulated::SimulatedAuthClient;
pub use state_types::{
    LoginEvent, LoginForm, LoginSnapshot, MessageKind, StatusMessage,
};
