//! lazybeads - terminal UI for browsing and editing beads (`bd`) issues
//!
//! This library crate exposes internal modules for integration testing.

pub mod beads;
pub mod commands;
pub mod config;
pub mod data;
pub mod tui;
