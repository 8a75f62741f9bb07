//! Ambient - Meditation Session Engine
//!
//! Plays a looping seasonal background track with any number of user-chosen
//! ambient layers on top, all under one master volume and mute switch, while
//! a countdown times the session.
//!
//! # Architecture
//!
//! - Sound Catalog: static sounds, categories, seasons and curated lists
//! - Audio Track Controllers: one looping resource each, behind a trait
//! - Mix Engine: owns every live track and applies effective volumes
//! - Session Timer: countdown state machine driven by an injected ticker
//! - Session: the object a front end creates per meditation and ends on exit

pub mod audio;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod mix;
pub mod session;
pub mod timer;

pub use config::SessionConfig;
pub use error::{AmbientError, Result};
pub use session::{Session, SessionSnapshot};
