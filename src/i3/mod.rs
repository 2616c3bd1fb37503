//! i3-specific implementations.
//!
//! This module provides the concrete backend for the
//! [`WindowManager`](crate::traits::WindowManager) trait, powered by i3's IPC
//! socket.  sway speaks the same protocol and works unchanged.
//!
//! Nothing outside this module should reference i3 directly.

pub mod wm;
