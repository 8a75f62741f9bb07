//! Session Timer state machine
//!
//! Counts a meditation session down one second per tick:
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --start--> Running
//!                    |
//!                 tick to 0
//!                    v
//!                Completed  (terminal until reset)
//! ```
//!
//! The timer never schedules anything itself; whoever owns it calls `tick()`
//! once per elapsed second while it is running.

use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::error::{AmbientError, Result};

/// Durations offered to the user, in seconds
pub const DEFAULT_DURATION_PRESETS: [u32; 7] = [300, 600, 900, 1200, 1800, 2700, 3600];

/// Duration a new timer starts with
pub const DEFAULT_DURATION_SECS: u32 = 600;

/// Countdown states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    /// Full duration remaining, not running (default state)
    #[default]
    Idle,
    /// Counting down
    Running,
    /// Remaining time frozen
    Paused,
    /// Reached zero
    Completed,
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimerState::Idle => write!(f, "Idle"),
            TimerState::Running => write!(f, "Running"),
            TimerState::Paused => write!(f, "Paused"),
            TimerState::Completed => write!(f, "Completed"),
        }
    }
}

/// Notification emitted by the timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerEvent {
    /// Emitted once per run when the countdown reaches zero
    Completed {
        duration_secs: u32,
        at: DateTime<Utc>,
    },
}

/// Countdown for one session
#[derive(Debug, Clone)]
pub struct SessionTimer {
    state: TimerState,
    duration_secs: u32,
    remaining_secs: u32,
    presets: Vec<u32>,
    completed_at: Option<DateTime<Utc>>,
}

impl Default for SessionTimer {
    fn default() -> Self {
        Self {
            state: TimerState::Idle,
            duration_secs: DEFAULT_DURATION_SECS,
            remaining_secs: DEFAULT_DURATION_SECS,
            presets: DEFAULT_DURATION_PRESETS.to_vec(),
            completed_at: None,
        }
    }
}

impl SessionTimer {
    /// Create an idle timer using the default presets
    ///
    /// # Errors
    /// * `InvalidDuration` - If `duration_secs` is not a default preset
    ///
    /// # Example
    /// ```
    /// use ambient::timer::SessionTimer;
    /// let timer = SessionTimer::new(300).unwrap();
    /// assert!(timer.is_idle());
    /// assert_eq!(timer.remaining_secs(), 300);
    /// ```
    pub fn new(duration_secs: u32) -> Result<Self> {
        Self::with_presets(duration_secs, &DEFAULT_DURATION_PRESETS)
    }

    /// Create an idle timer restricted to custom presets
    ///
    /// # Errors
    /// * `InvalidConfig` - If `presets` is empty or contains zero
    /// * `InvalidDuration` - If `duration_secs` is not in `presets`
    pub fn with_presets(duration_secs: u32, presets: &[u32]) -> Result<Self> {
        if presets.is_empty() || presets.contains(&0) {
            return Err(AmbientError::InvalidConfig {
                reason: format!("timer presets must be non-empty and non-zero, got {:?}", presets),
            });
        }
        if !presets.contains(&duration_secs) {
            return Err(AmbientError::InvalidDuration {
                seconds: duration_secs,
                allowed: presets.to_vec(),
            });
        }

        Ok(Self {
            state: TimerState::Idle,
            duration_secs,
            remaining_secs: duration_secs,
            presets: presets.to_vec(),
            completed_at: None,
        })
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    /// Start or resume the countdown
    ///
    /// State transitions: Idle/Paused -> Running. No-op when already running
    /// or completed. Returns whether the timer is now running because of this
    /// call.
    pub fn start(&mut self) -> bool {
        match self.state {
            TimerState::Idle | TimerState::Paused => {
                debug!("[TIMER] {} -> Running ({}s left)", self.state, self.remaining_secs);
                self.state = TimerState::Running;
                true
            }
            TimerState::Running => {
                debug!("[TIMER] Already running");
                false
            }
            TimerState::Completed => {
                debug!("[TIMER] Completed, reset before starting again");
                false
            }
        }
    }

    /// Freeze the countdown
    ///
    /// State transition: Running -> Paused. No-op otherwise.
    pub fn pause(&mut self) -> bool {
        if self.state == TimerState::Running {
            self.state = TimerState::Paused;
            debug!("[TIMER] Paused at {}s", self.remaining_secs);
            true
        } else {
            false
        }
    }

    /// Return to idle with the full duration remaining
    ///
    /// `new_duration` replaces the duration when it is one of the presets;
    /// an unknown duration is ignored and the current one kept. Returns false
    /// only in that case.
    pub fn reset(&mut self, new_duration: Option<u32>) -> bool {
        let accepted = match new_duration {
            Some(secs) if self.presets.contains(&secs) => {
                self.duration_secs = secs;
                true
            }
            Some(secs) => {
                warn!("[TIMER] Ignoring non-preset duration {}s on reset", secs);
                false
            }
            None => true,
        };

        self.state = TimerState::Idle;
        self.remaining_secs = self.duration_secs;
        self.completed_at = None;
        debug!("[TIMER] Reset to {}s", self.duration_secs);
        accepted
    }

    /// Change the duration of an idle timer
    ///
    /// Rejected while running, paused or completed, and for durations that
    /// are not presets.
    pub fn set_duration(&mut self, secs: u32) -> bool {
        if self.state != TimerState::Idle {
            warn!("[TIMER] Cannot change duration while {}", self.state);
            return false;
        }
        if !self.presets.contains(&secs) {
            warn!("[TIMER] {}s is not a preset duration", secs);
            return false;
        }

        self.duration_secs = secs;
        self.remaining_secs = secs;
        true
    }

    /// Advance by one elapsed second
    ///
    /// Only counts while running. Returns the completion event on the tick
    /// that reaches zero.
    pub fn tick(&mut self) -> Option<TimerEvent> {
        if self.state != TimerState::Running {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs > 0 {
            return None;
        }

        let at = Utc::now();
        self.state = TimerState::Completed;
        self.completed_at = Some(at);
        info!("[TIMER] Session of {}s completed", self.duration_secs);

        Some(TimerEvent::Completed {
            duration_secs: self.duration_secs,
            at,
        })
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == TimerState::Idle
    }

    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    pub fn is_paused(&self) -> bool {
        self.state == TimerState::Paused
    }

    pub fn is_completed(&self) -> bool {
        self.state == TimerState::Completed
    }

    pub fn duration_secs(&self) -> u32 {
        self.duration_secs
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn elapsed_secs(&self) -> u32 {
        self.duration_secs - self.remaining_secs
    }

    /// Elapsed fraction of the duration, `0.0..=1.0`
    pub fn progress(&self) -> f32 {
        self.elapsed_secs() as f32 / self.duration_secs as f32
    }

    /// Remaining time as `MM:SS`
    pub fn format_remaining(&self) -> String {
        format!("{:02}:{:02}", self.remaining_secs / 60, self.remaining_secs % 60)
    }

    pub fn presets(&self) -> &[u32] {
        &self.presets
    }

    /// When the last run completed, if the timer is completed
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_bounds(timer: &SessionTimer) {
        assert!(timer.remaining_secs() <= timer.duration_secs());
    }

    // ------------------------------------------------------------------------
    // Basic State Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_default_state_is_idle() {
        let timer = SessionTimer::default();
        assert!(timer.is_idle());
        assert_eq!(timer.state(), TimerState::Idle);
        assert_eq!(timer.remaining_secs(), DEFAULT_DURATION_SECS);
        assert_eq!(timer.duration_secs(), DEFAULT_DURATION_SECS);
    }

    #[test]
    fn test_new_rejects_non_preset() {
        let err = SessionTimer::new(42).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_DURATION");
    }

    #[test]
    fn test_custom_presets() {
        let timer = SessionTimer::with_presets(3, &[3, 5]).unwrap();
        assert_eq!(timer.presets(), &[3, 5]);
        assert!(SessionTimer::with_presets(3, &[]).is_err());
        assert!(SessionTimer::with_presets(0, &[0, 5]).is_err());
    }

    // ------------------------------------------------------------------------
    // State Transition Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_idle_to_running() {
        let mut timer = SessionTimer::new(300).unwrap();
        assert!(timer.start());
        assert!(timer.is_running());
    }

    #[test]
    fn test_running_to_paused_and_back() {
        let mut timer = SessionTimer::new(300).unwrap();
        timer.start();
        timer.tick();
        assert!(timer.pause());
        assert!(timer.is_paused());

        // Frozen while paused
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 299);

        assert!(timer.start());
        timer.tick();
        assert_eq!(timer.remaining_secs(), 298);
    }

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut timer = SessionTimer::new(300).unwrap();
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 300);
    }

    #[test]
    fn test_runs_to_completion_exactly_once() {
        let mut timer = SessionTimer::new(300).unwrap();
        timer.start();

        let mut completions = 0;
        for _ in 0..300 {
            if let Some(TimerEvent::Completed { duration_secs, .. }) = timer.tick() {
                assert_eq!(duration_secs, 300);
                completions += 1;
            }
            assert_bounds(&timer);
        }

        assert_eq!(completions, 1);
        assert!(timer.is_completed());
        assert_eq!(timer.remaining_secs(), 0);
        assert!(timer.completed_at().is_some());

        // Further ticks do nothing
        assert_eq!(timer.tick(), None);
        assert_eq!(timer.remaining_secs(), 0);
    }

    #[test]
    fn test_start_on_completed_is_noop() {
        let mut timer = SessionTimer::with_presets(2, &[2]).unwrap();
        timer.start();
        timer.tick();
        timer.tick();
        assert!(timer.is_completed());

        assert!(!timer.start());
        assert!(timer.is_completed());
    }

    #[test]
    fn test_reset_from_any_state() {
        let mut timer = SessionTimer::new(300).unwrap();
        timer.start();
        timer.tick();
        assert!(timer.reset(None));
        assert!(timer.is_idle());
        assert_eq!(timer.remaining_secs(), 300);

        timer.start();
        timer.pause();
        assert!(timer.reset(Some(900)));
        assert!(timer.is_idle());
        assert_eq!(timer.duration_secs(), 900);
        assert_eq!(timer.remaining_secs(), 900);
    }

    #[test]
    fn test_reset_after_completion_allows_restart() {
        let mut timer = SessionTimer::with_presets(1, &[1]).unwrap();
        timer.start();
        assert!(timer.tick().is_some());

        timer.reset(None);
        assert!(timer.completed_at().is_none());
        assert!(timer.start());
        assert!(timer.tick().is_some());
    }

    #[test]
    fn test_reset_with_unknown_duration_keeps_current() {
        let mut timer = SessionTimer::new(600).unwrap();
        timer.start();
        assert!(!timer.reset(Some(7)));
        assert!(timer.is_idle());
        assert_eq!(timer.duration_secs(), 600);
    }

    // ------------------------------------------------------------------------
    // Duration Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_set_duration_while_idle() {
        let mut timer = SessionTimer::new(600).unwrap();
        assert!(timer.set_duration(1200));
        assert_eq!(timer.duration_secs(), 1200);
        assert_eq!(timer.remaining_secs(), 1200);
    }

    #[test]
    fn test_set_duration_rejected_while_running_or_paused() {
        let mut timer = SessionTimer::new(600).unwrap();
        timer.start();
        assert!(!timer.set_duration(300));
        timer.pause();
        assert!(!timer.set_duration(300));
        assert_eq!(timer.duration_secs(), 600);
    }

    #[test]
    fn test_set_duration_rejects_non_preset() {
        let mut timer = SessionTimer::new(600).unwrap();
        assert!(!timer.set_duration(61));
        assert_eq!(timer.duration_secs(), 600);
    }

    // ------------------------------------------------------------------------
    // Display Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_progress_and_format() {
        let mut timer = SessionTimer::new(300).unwrap();
        assert_eq!(timer.format_remaining(), "05:00");
        timer.start();
        for _ in 0..75 {
            timer.tick();
        }
        assert_eq!(timer.format_remaining(), "03:45");
        assert_eq!(timer.elapsed_secs(), 75);
        assert_relative_eq!(timer.progress(), 0.25);
    }

    #[test]
    fn test_timer_state_display() {
        assert_eq!(format!("{}", TimerState::Idle), "Idle");
        assert_eq!(format!("{}", TimerState::Running), "Running");
        assert_eq!(format!("{}", TimerState::Paused), "Paused");
        assert_eq!(format!("{}", TimerState::Completed), "Completed");
    }
}
