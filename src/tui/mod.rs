//! TUI module for the interactive wallpaper generator.
//!
//! Organized along FP/Unix boundaries:
//! - `state`: Pure data types (Screen, Session, Action, Transition)
//! - `update`: Pure transitions
//! - `view`: Pure rendering
//! - `theme`: Color semantics
//! - `run`: Effects (terminal, threads, network, disk)

pub mod run;
pub mod state;
pub mod theme;
pub mod update;
pub mod view;
