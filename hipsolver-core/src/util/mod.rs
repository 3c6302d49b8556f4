//! Utility functions.
//!
//! Environment switches and diagnostic output.

pub mod logging;
