//! Audio Track Controllers
//!
//! - `AudioTrack` / `TrackBackend` traits the mix engine depends on
//! - WAV backend decoding assets with hound
//! - Mock backend recording controller calls
//! - WAV file I/O helpers

pub mod io;
pub mod mock;
pub mod track;
pub mod wav;

pub use io::{
    decode_loop, write_mixdown, MixdownWriter, DEFAULT_SAMPLE_RATE, MAX_LOOP_SECS, MAX_SAMPLE_RATE,
    MIN_SAMPLE_RATE,
};
pub use mock::{MockBackend, MockTrack, TrackLedger, TrackRecord};
pub use track::{AudioTrack, TrackBackend};
pub use wav::{resolve_source, WavBackend, WavTrack};
