//! Report whether rocSPARSE can be loaded on this machine.
//!
//! Run with `RUST_LOG=hipsolver=debug` to see each load step.

use hipsolver_core::linalg::backends::rocsparse::{
    self, MatDescr, SparseHandle, ROCSPARSE_LIBRARY, SYMBOL_NAMES,
};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    println!("library: {}", ROCSPARSE_LIBRARY);
    println!("symbols: {}", SYMBOL_NAMES.len());

    if !rocsparse::ensure_loaded() {
        match rocsparse::rocsparse_load_error() {
            Some(e) => println!("unavailable: {}", e),
            None => println!("unavailable"),
        }
        return;
    }

    println!("loaded");
    match (SparseHandle::create(), MatDescr::create()) {
        (Ok(_handle), Ok(descr)) => {
            println!("default matrix type: {:?}", descr.matrix_type());
            println!("default index base: {:?}", descr.index_base());
        }
        (Err(e), _) | (_, Err(e)) => println!("rocSPARSE call failed: {}", e),
    }
}
