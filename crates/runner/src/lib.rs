//! Host-loop drivers for the simulation engine.
//!
//! The engine itself is passive: something has to feed it time. This
//! crate provides the two stock drivers:
//!
//! - [`RealtimeDriver`] scales wall-clock frame deltas by the configured
//!   speed multiplier, with a per-frame cap so a stalled host (slow
//!   frame, backgrounded tab equivalent) cannot inject a huge jump.
//! - [`run_instant`] runs the whole simulation in one call with
//!   event-driven time jumps, no fixed tick size.
//!
//! Step mode has no driver here: it waits indefinitely for an explicit
//! acknowledgment through the engine's step API.

mod instant;
mod realtime;

pub use instant::{run_instant, InstantRunError};
pub use realtime::{RealtimeDriver, DEFAULT_FRAME_CAP_MS};
