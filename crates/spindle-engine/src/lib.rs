//! Spindle engine crate.
//!
//! This crate owns the platform + GPU runtime pieces used by higher layers:
//! the window loop, the wgpu device, frame timing, and the graphics backend
//! contract that scene code talks to.

pub mod device;
pub mod window;
pub mod time;
pub mod core;

pub mod logging;
pub mod coords;
pub mod render;
