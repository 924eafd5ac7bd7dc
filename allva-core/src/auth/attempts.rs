//! Failed-attempt counter and lockout state machine.
//!
//! Pure state: the controller owns one [`AttemptState`] behind its lock and
//! drives it from login outcomes and countdown ticks.

use std::time::Duration;

use allva_config::LoginPolicy;
use allva_model::LoginFailureReason;

/// Whether the form is currently locked out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LockoutState {
    /// Submissions allowed.
    #[default]
    Unlocked,
    /// Never constructed with zero ticks.
    Locked {
        /// Ticks left before the form unlocks.
        ticks_remaining: u32,
    },
}

/// What a recorded failure did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureOutcome {
    /// Below the threshold.
    Counted {
        /// Consecutive failures so far.
        failed_count: u32,
    },
    /// This failure reached the threshold.
    LockedOut {
        /// Full lockout length in ticks.
        ticks_remaining: u32,
    },
}

/// What a countdown tick did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Nothing was locked.
    Idle,
    /// Still locked.
    Remaining {
        /// Ticks left after this one.
        ticks_remaining: u32,
    },
    /// That was the last tick; the counter is reset.
    Unlocked,
}

/// Consecutive failure count plus lockout state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttemptState {
    failed_count: u32,
    lockout: LockoutState,
}

impl AttemptState {
    /// Consecutive password-incorrect failures since the last reset.
    pub fn failed_count(&self) -> u32 {
        self.failed_count
    }

    /// Current lockout state.
    pub fn lockout(&self) -> LockoutState {
        self.lockout
    }

    /// True while a countdown is running.
    pub fn is_locked(&self) -> bool {
        matches!(self.lockout, LockoutState::Locked { .. })
    }

    /// Zero when unlocked.
    pub fn ticks_remaining(&self) -> u32 {
        match self.lockout {
            LockoutState::Unlocked => 0,
            LockoutState::Locked { ticks_remaining } => ticks_remaining,
        }
    }

    /// Time left before the form unlocks, assuming ticks arrive on schedule.
    /// Saturates at `Duration::MAX`.
    pub fn lockout_remaining(&self, tick_interval: Duration) -> Duration {
        tick_interval
            .checked_mul(self.ticks_remaining())
            .unwrap_or(Duration::MAX)
    }

    pub(crate) fn record_success(&mut self) {
        *self = Self::default();
    }

    /// Every rejection counts. Only a wrong password can start a lockout.
    pub(crate) fn record_failure(
        &mut self,
        reason: LoginFailureReason,
        policy: &LoginPolicy,
    ) -> FailureOutcome {
        self.failed_count = self.failed_count.saturating_add(1);

        if reason == LoginFailureReason::PasswordIncorrect
            && self.failed_count >= policy.max_failed_attempts
        {
            let ticks_remaining = policy.lockout_ticks.max(1);
            self.lockout = LockoutState::Locked { ticks_remaining };
            FailureOutcome::LockedOut { ticks_remaining }
        } else {
            FailureOutcome::Counted {
                failed_count: self.failed_count,
            }
        }
    }

    pub(crate) fn tick(&mut self) -> TickOutcome {
        match self.lockout {
            LockoutState::Unlocked => TickOutcome::Idle,
            LockoutState::Locked { ticks_remaining } if ticks_remaining > 1 => {
                let ticks_remaining = ticks_remaining - 1;
                self.lockout = LockoutState::Locked { ticks_remaining };
                TickOutcome::Remaining { ticks_remaining }
            }
            LockoutState::Locked { .. } => {
                *self = Self::default();
                TickOutcome::Unlocked
            }
        }
    }
}

/// Whole minutes shown to the user for `ticks` countdown ticks, rounded up.
pub fn lockout_minutes(ticks: u32, tick_interval: Duration) -> u64 {
    let total_ms = tick_interval.as_millis() * u128::from(ticks);
    u64::try_from(total_ms.div_ceil(60_000)).unwrap_or(u64::MAX)
}
