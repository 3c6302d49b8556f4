//! GPU library backends.

pub mod rocsparse;
