//! Fleshclick library crate — re-exports all modules for integration testing.
//!
//! The binary crate (`main.rs`) is the actual engine entry point.
//! This library crate exposes the same modules so that `tests/`
//! integration tests can import types, systems, and resources and drive
//! the whole state engine headless.

pub mod data;
pub mod economy;
pub mod leaderboard;
pub mod mods;
pub mod save;
pub mod shared;
