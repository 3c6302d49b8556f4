//! Linear algebra layer.
//!
//! Runtime-loaded vendor sparse libraries used by the GPU solve path.

pub mod backends;
