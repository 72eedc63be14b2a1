//! Headless demos for arbor.

/// Scripted hub and menu demo.
pub mod menu;
