//! rocSPARSE, loaded at runtime.
//!
//! The solver needs a handful of rocSPARSE routines (handle and descriptor
//! management, CSR to dense conversion) on AMD GPUs. Rather than linking
//! against the library, this module opens it on first use and binds the
//! entry points it needs, so the crate builds and runs on machines without
//! ROCm and simply reports rocSPARSE as unavailable there.
//!
//! # Loading
//!
//! 1. **Link mode**: a `static-rocsparse` build never opens anything.
//! 2. **Open**: `librocsparse.so.1` (or `rocsparse.dll`), immediate binding.
//! 3. **Bind**: every symbol in [`SYMBOL_NAMES`] must resolve; the first
//!    missing one fails the whole load and releases the library.
//!
//! The outcome is decided once per process and shared by all threads.
//!
//! # Example
//!
//! ```no_run
//! use hipsolver_core::linalg::backends::rocsparse::{self, MatDescr, SparseHandle};
//!
//! if !rocsparse::ensure_loaded() {
//!     eprintln!("rocSPARSE not available, using the CPU path");
//!     return;
//! }
//! let handle = SparseHandle::create().unwrap();
//! let descr = MatDescr::create().unwrap();
//! assert!(!handle.as_raw().is_null());
//! println!("index base: {:?}", descr.index_base());
//! ```

mod config;
mod error;
mod ffi;
mod handle;
mod loader;

#[cfg(test)]
mod test_support;

pub use config::{LinkMode, LoaderConfig, VERBOSE_ENV};
pub use error::{check_status, LoadError, RocsparseError, RocsparseResult, RocsparseStatus};
pub use ffi::*;
pub use handle::{
    csr2dense, require_rocsparse, Csr2Dense, IndexBase, MatDescr, MatrixType, SparseHandle,
};
pub use loader::{
    ensure_loaded, rocsparse, rocsparse_load_error, rocsparse_state, LoadState, LoadedModule,
    PlatformLoader, RocsparseLoader, SystemLoader, ROCSPARSE_LIBRARY,
};
