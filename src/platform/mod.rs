//! Platform abstraction layer
//!
//! Handles the host side of the Render/Clock service:
//! - Raw millisecond timestamps into monotonic seconds
//! - One simulation tick per delivered frame
//! - Stopping the loop (no further re-registration)

pub mod frame_loop;
pub mod time;

pub use frame_loop::FrameLoop;
pub use time::FrameClock;
