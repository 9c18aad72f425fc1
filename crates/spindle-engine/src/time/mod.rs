//! Time subsystem.
//!
//! Frame timing without coupling to the runtime:
//! - one `FrameClock` per render loop
//! - call `tick()` once per presented frame to obtain `FrameTime`
//! - `FrameRate` smooths the per-frame delta into a readout for the host UI

mod frame_clock;
mod frame_rate;

pub use frame_clock::{FrameClock, FrameTime};
pub use frame_rate::FrameRate;
