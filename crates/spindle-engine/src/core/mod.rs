//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop)
//! and the application driving the window: lifecycle callbacks plus the
//! contexts handed to them.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, SetupCtx, WindowCtx};
