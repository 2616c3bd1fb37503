//! **wkswitch** — xmonad-style workspace switching for i3 and sway.
//!
//! Switching to workspace `N` always shows it on the *focused* output.  If
//! `N` is currently visible on another output, the two outputs trade
//! workspaces instead of focus jumping across screens.
//!
//! # Architecture
//!
//! * [`switcher`] holds the decision logic: it reads a snapshot of outputs
//!   and workspaces, plans the commands for the request, and executes them.
//! * [`traits::WindowManager`] abstracts the window manager so the switcher
//!   is not coupled to a specific IPC transport.
//! * [`i3`] implements that trait over the i3-ipc socket protocol.
//! * [`command`] is the shared vocabulary; [`cli`] holds the exit-status
//!   policy, and [`config`] and [`logging`] are the ambient plumbing used by
//!   the binary.

pub mod cli;
pub mod command;
pub mod config;
pub mod i3;
pub mod logging;
pub mod switcher;
pub mod traits;
