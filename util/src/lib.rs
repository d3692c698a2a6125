//! Utility library for the trajectory comparison software

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

pub mod logger;
pub mod maths;
pub mod session;
pub mod settings;
pub mod time;
