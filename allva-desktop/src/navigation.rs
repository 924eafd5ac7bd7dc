//! Boundary where a successful login leaves the login screen.
//!
//! The desktop shell swaps the login window for the main window here. The
//! headless driver reports the session instead.

use allva_model::SessionResult;

/// Leave the login screen for `session`.
pub fn enter_main_window(session: &SessionResult) {
    log::info!(
        "[Navigation] Opening main window for user {} at office {}",
        session.user_number,
        session.office_code
    );
    println!("Welcome, {}", session.user_name);
    println!("  user:   {}", session.user_number);
    println!("  office: {}", session.office_code);
    println!("  role:   {}", session.user_type);
}
