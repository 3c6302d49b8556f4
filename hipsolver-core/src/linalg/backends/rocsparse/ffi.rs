//! Raw rocSPARSE types and the dynamically bound entry point table.
//!
//! The types follow `rocsparse.h`. Only the entry points the solver needs are
//! bound: handle and matrix descriptor management, the two descriptor
//! getters, and the CSR to dense conversions in all four precisions.

use std::ffi::{c_int, c_void};
use std::mem;

use super::error::LoadError;
use super::loader::LoadedModule;

// ============================================================================
// rocSPARSE types
// ============================================================================

/// `rocsparse_status`
pub type RocsparseStatusT = c_int;

/// `rocsparse_int` (32-bit index build)
pub type RocsparseInt = i32;

/// `rocsparse_handle`
pub type RocsparseHandleT = *mut c_void;

/// `rocsparse_mat_descr`
pub type RocsparseMatDescrT = *mut c_void;

/// `rocsparse_matrix_type`
pub type RocsparseMatrixTypeT = c_int;

/// `rocsparse_index_base`
pub type RocsparseIndexBaseT = c_int;

/// `rocsparse_float_complex`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RocsparseFloatComplex {
    pub x: f32,
    pub y: f32,
}

/// `rocsparse_double_complex`
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RocsparseDoubleComplex {
    pub x: f64,
    pub y: f64,
}

impl RocsparseFloatComplex {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { x: re, y: im }
    }
}

impl RocsparseDoubleComplex {
    pub const fn new(re: f64, im: f64) -> Self {
        Self { x: re, y: im }
    }
}

// ============================================================================
// Symbol names
// ============================================================================

pub const ROCSPARSE_CREATE_HANDLE: &str = "rocsparse_create_handle";
pub const ROCSPARSE_DESTROY_HANDLE: &str = "rocsparse_destroy_handle";
pub const ROCSPARSE_CREATE_MAT_DESCR: &str = "rocsparse_create_mat_descr";
pub const ROCSPARSE_DESTROY_MAT_DESCR: &str = "rocsparse_destroy_mat_descr";
pub const ROCSPARSE_GET_MAT_TYPE: &str = "rocsparse_get_mat_type";
pub const ROCSPARSE_GET_MAT_INDEX_BASE: &str = "rocsparse_get_mat_index_base";
pub const ROCSPARSE_SCSR2DENSE: &str = "rocsparse_scsr2dense";
pub const ROCSPARSE_DCSR2DENSE: &str = "rocsparse_dcsr2dense";
pub const ROCSPARSE_CCSR2DENSE: &str = "rocsparse_ccsr2dense";
pub const ROCSPARSE_ZCSR2DENSE: &str = "rocsparse_zcsr2dense";

/// Every required symbol, in the order they are resolved.
pub const SYMBOL_NAMES: [&str; 10] = [
    ROCSPARSE_CREATE_HANDLE,
    ROCSPARSE_DESTROY_HANDLE,
    ROCSPARSE_CREATE_MAT_DESCR,
    ROCSPARSE_DESTROY_MAT_DESCR,
    ROCSPARSE_GET_MAT_TYPE,
    ROCSPARSE_GET_MAT_INDEX_BASE,
    ROCSPARSE_SCSR2DENSE,
    ROCSPARSE_DCSR2DENSE,
    ROCSPARSE_CCSR2DENSE,
    ROCSPARSE_ZCSR2DENSE,
];

// ============================================================================
// Function pointer types
// ============================================================================

pub type CreateHandleFn = unsafe extern "C" fn(handle: *mut RocsparseHandleT) -> RocsparseStatusT;
pub type DestroyHandleFn = unsafe extern "C" fn(handle: RocsparseHandleT) -> RocsparseStatusT;
pub type CreateMatDescrFn =
    unsafe extern "C" fn(descr: *mut RocsparseMatDescrT) -> RocsparseStatusT;
pub type DestroyMatDescrFn = unsafe extern "C" fn(descr: RocsparseMatDescrT) -> RocsparseStatusT;
pub type GetMatTypeFn = unsafe extern "C" fn(descr: RocsparseMatDescrT) -> RocsparseMatrixTypeT;
pub type GetMatIndexBaseFn =
    unsafe extern "C" fn(descr: RocsparseMatDescrT) -> RocsparseIndexBaseT;

/// `rocsparse_Xcsr2dense`: CSR (`m` x `n`) into column-major dense `a` with
/// leading dimension `ld`.
pub type Csr2DenseFn<T> = unsafe extern "C" fn(
    handle: RocsparseHandleT,
    m: RocsparseInt,
    n: RocsparseInt,
    descr: RocsparseMatDescrT,
    csr_val: *const T,
    csr_row_ptr: *const RocsparseInt,
    csr_col_ind: *const RocsparseInt,
    a: *mut T,
    ld: RocsparseInt,
) -> RocsparseStatusT;

// ============================================================================
// Bound table
// ============================================================================

/// The rocSPARSE entry points, bound from an open library.
///
/// A value of this type only exists once every symbol resolved, so holding
/// a reference is proof that all pointers are callable. The owning module
/// is kept alive for as long as the table is.
pub struct RocsparseApi {
    _module: Box<dyn LoadedModule>,

    pub create_handle: CreateHandleFn,
    pub destroy_handle: DestroyHandleFn,
    pub create_mat_descr: CreateMatDescrFn,
    pub destroy_mat_descr: DestroyMatDescrFn,
    pub get_mat_type: GetMatTypeFn,
    pub get_mat_index_base: GetMatIndexBaseFn,

    pub scsr2dense: Csr2DenseFn<f32>,
    pub dcsr2dense: Csr2DenseFn<f64>,
    pub ccsr2dense: Csr2DenseFn<RocsparseFloatComplex>,
    pub zcsr2dense: Csr2DenseFn<RocsparseDoubleComplex>,
}

impl RocsparseApi {
    /// Resolve every required symbol from `module`, in `SYMBOL_NAMES` order.
    ///
    /// Stops at the first missing symbol. The module is dropped on failure,
    /// which releases the library.
    pub(crate) fn bind(module: Box<dyn LoadedModule>) -> Result<Self, LoadError> {
        // SAFETY: each slot's type is the rocsparse.h prototype of the symbol
        // bound into it.
        unsafe {
            let create_handle = resolve::<CreateHandleFn>(&*module, ROCSPARSE_CREATE_HANDLE)?;
            let destroy_handle = resolve::<DestroyHandleFn>(&*module, ROCSPARSE_DESTROY_HANDLE)?;
            let create_mat_descr =
                resolve::<CreateMatDescrFn>(&*module, ROCSPARSE_CREATE_MAT_DESCR)?;
            let destroy_mat_descr =
                resolve::<DestroyMatDescrFn>(&*module, ROCSPARSE_DESTROY_MAT_DESCR)?;
            let get_mat_type = resolve::<GetMatTypeFn>(&*module, ROCSPARSE_GET_MAT_TYPE)?;
            let get_mat_index_base =
                resolve::<GetMatIndexBaseFn>(&*module, ROCSPARSE_GET_MAT_INDEX_BASE)?;

            let scsr2dense = resolve::<Csr2DenseFn<f32>>(&*module, ROCSPARSE_SCSR2DENSE)?;
            let dcsr2dense = resolve::<Csr2DenseFn<f64>>(&*module, ROCSPARSE_DCSR2DENSE)?;
            let ccsr2dense =
                resolve::<Csr2DenseFn<RocsparseFloatComplex>>(&*module, ROCSPARSE_CCSR2DENSE)?;
            let zcsr2dense =
                resolve::<Csr2DenseFn<RocsparseDoubleComplex>>(&*module, ROCSPARSE_ZCSR2DENSE)?;

            Ok(Self {
                _module: module,
                create_handle,
                destroy_handle,
                create_mat_descr,
                destroy_mat_descr,
                get_mat_type,
                get_mat_index_base,
                scsr2dense,
                dcsr2dense,
                ccsr2dense,
                zcsr2dense,
            })
        }
    }
}

impl std::fmt::Debug for RocsparseApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocsparseApi")
            .field("symbols", &SYMBOL_NAMES.len())
            .finish_non_exhaustive()
    }
}

/// Look up `name` and reinterpret its address as the function type `F`.
///
/// # Safety
///
/// `F` must be a function pointer type matching the symbol's real signature.
unsafe fn resolve<F: Copy>(module: &dyn LoadedModule, name: &str) -> Result<F, LoadError> {
    let addr = module.symbol(name)?;
    debug_assert_eq!(mem::size_of::<F>(), mem::size_of::<*const c_void>());
    tracing::trace!(target: "hipsolver::rocsparse", symbol = name, ?addr, "resolved");
    Ok(mem::transmute_copy::<*const c_void, F>(&addr))
}
