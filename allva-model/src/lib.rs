//! Core data model definitions shared across Allva crates.
//!
//! Everything here is plain data: credentials captured per submission, the
//! device context attached to a login request, the session produced by a
//! successful login, and the failure taxonomy reported by the remote
//! authentication service.

pub mod credentials;
pub mod device;
pub mod failure;
pub mod request;
pub mod session;

pub use credentials::LoginCredentials;
pub use device::{DeviceContext, FALLBACK_LOCAL_IP, UNKNOWN_MAC_ADDRESS};
pub use failure::{LoginFailure, LoginFailureReason, RecoveryFailure};
pub use request::LoginRequest;
pub use session::{SessionResult, UserType};
