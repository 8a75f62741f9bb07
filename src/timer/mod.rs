//! Session Timer Module
//!
//! - Countdown state machine
//! - Tick scheduling capabilities

pub mod countdown;
pub mod ticker;

pub use countdown::{
    SessionTimer, TimerEvent, TimerState, DEFAULT_DURATION_PRESETS, DEFAULT_DURATION_SECS,
};
pub use ticker::{ManualTicker, ThreadTicker, Tick, Ticker};
