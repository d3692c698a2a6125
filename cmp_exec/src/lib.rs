//! # Trajectory comparison library.
//!
//! This library allows other crates in the workspace to access items defined inside the
//! comparison crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Bounds - computes the view window framing both trajectories
pub mod bounds;

/// Comparison - builds the panels of the figure from the settings and the logs
pub mod comparison;

/// Renderer - lays out and draws the panels into an image
pub mod render;

/// Trajectory logs - loads and validates the CSV logs
pub mod traj_log;
