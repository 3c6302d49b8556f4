//! hipSOLVER core: vendor library bindings for the GPU sparse solvers.
//!
//! The solver routines hand CSR matrices to rocSPARSE for format conversion
//! and need rocSPARSE handles and matrix descriptors to do so. rocSPARSE is
//! an optional runtime dependency: it is opened on first use and the caller
//! checks availability before touching it.
//!
//! # Example
//!
//! ```no_run
//! use hipsolver_core::linalg::backends::rocsparse;
//!
//! if rocsparse::ensure_loaded() {
//!     let api = rocsparse::rocsparse().unwrap();
//!     println!("{:?}", api);
//! } else {
//!     println!("rocSPARSE unavailable: {:?}", rocsparse::rocsparse_load_error());
//! }
//! ```

#![warn(clippy::all)]

pub mod linalg;
pub mod util;

pub use linalg::backends::rocsparse::{ensure_loaded, RocsparseApi};
