//! rocSPARSE handle, matrix descriptor and CSR to dense conversion.
//!
//! This module provides owned wrappers over the objects rocSPARSE hands out:
//! - `SparseHandle`: library context (`rocsparse_handle`).
//! - `MatDescr`: matrix descriptor (`rocsparse_mat_descr`).
//!
//! Both release their object on drop through the same table that created it.

use std::ffi::c_int;
use std::ptr;

use tracing::warn;

use super::error::{check_status, RocsparseError, RocsparseResult, RocsparseStatus};
use super::ffi::*;
use super::loader::rocsparse;

/// `rocsparse_matrix_type`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixType {
    General,
    Symmetric,
    Hermitian,
    Triangular,
}

impl TryFrom<c_int> for MatrixType {
    type Error = RocsparseError;

    fn try_from(value: c_int) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::General),
            1 => Ok(Self::Symmetric),
            2 => Ok(Self::Hermitian),
            3 => Ok(Self::Triangular),
            _ => Err(RocsparseError::InvalidEnum {
                what: "rocsparse_matrix_type",
                value,
            }),
        }
    }
}

/// `rocsparse_index_base`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexBase {
    Zero,
    One,
}

impl TryFrom<c_int> for IndexBase {
    type Error = RocsparseError;

    fn try_from(value: c_int) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Zero),
            1 => Ok(Self::One),
            _ => Err(RocsparseError::InvalidEnum {
                what: "rocsparse_index_base",
                value,
            }),
        }
    }
}

/// Get the process-wide rocSPARSE table, or `Unavailable`.
pub fn require_rocsparse() -> RocsparseResult<&'static RocsparseApi> {
    rocsparse().ok_or(RocsparseError::Unavailable)
}

/// Owned `rocsparse_handle`.
pub struct SparseHandle<'a> {
    api: &'a RocsparseApi,
    raw: RocsparseHandleT,
}

impl<'a> SparseHandle<'a> {
    pub fn new(api: &'a RocsparseApi) -> RocsparseResult<Self> {
        let mut raw = ptr::null_mut();
        // SAFETY: `raw` is a valid out-pointer.
        check_status(unsafe { (api.create_handle)(&mut raw) }, ROCSPARSE_CREATE_HANDLE)?;
        Ok(Self { api, raw })
    }

    pub fn as_raw(&self) -> RocsparseHandleT {
        self.raw
    }

    pub fn api(&self) -> &'a RocsparseApi {
        self.api
    }
}

impl SparseHandle<'static> {
    /// Create a handle on the process-wide rocSPARSE.
    pub fn create() -> RocsparseResult<Self> {
        Self::new(require_rocsparse()?)
    }
}

impl Drop for SparseHandle<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from create_handle on the same table and is destroyed once.
        let status = RocsparseStatus::from_raw(unsafe { (self.api.destroy_handle)(self.raw) });
        if !status.is_success() {
            warn!(target: "hipsolver::rocsparse", %status, "rocsparse_destroy_handle failed");
        }
    }
}

/// Owned `rocsparse_mat_descr`.
pub struct MatDescr<'a> {
    api: &'a RocsparseApi,
    raw: RocsparseMatDescrT,
}

impl<'a> MatDescr<'a> {
    pub fn new(api: &'a RocsparseApi) -> RocsparseResult<Self> {
        let mut raw = ptr::null_mut();
        // SAFETY: `raw` is a valid out-pointer.
        check_status(
            unsafe { (api.create_mat_descr)(&mut raw) },
            ROCSPARSE_CREATE_MAT_DESCR,
        )?;
        Ok(Self { api, raw })
    }

    pub fn matrix_type(&self) -> RocsparseResult<MatrixType> {
        // SAFETY: `raw` is a live descriptor.
        MatrixType::try_from(unsafe { (self.api.get_mat_type)(self.raw) })
    }

    pub fn index_base(&self) -> RocsparseResult<IndexBase> {
        // SAFETY: `raw` is a live descriptor.
        IndexBase::try_from(unsafe { (self.api.get_mat_index_base)(self.raw) })
    }

    pub fn as_raw(&self) -> RocsparseMatDescrT {
        self.raw
    }
}

impl MatDescr<'static> {
    /// Create a descriptor on the process-wide rocSPARSE.
    pub fn create() -> RocsparseResult<Self> {
        Self::new(require_rocsparse()?)
    }
}

impl Drop for MatDescr<'_> {
    fn drop(&mut self) {
        // SAFETY: `raw` came from create_mat_descr on the same table and is destroyed once.
        let status = RocsparseStatus::from_raw(unsafe { (self.api.destroy_mat_descr)(self.raw) });
        if !status.is_success() {
            warn!(target: "hipsolver::rocsparse", %status, "rocsparse_destroy_mat_descr failed");
        }
    }
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for super::RocsparseFloatComplex {}
    impl Sealed for super::RocsparseDoubleComplex {}
}

/// Element types with a rocSPARSE CSR to dense routine.
pub trait Csr2Dense: Copy + sealed::Sealed {
    /// Exported name of the routine for this precision.
    const SYMBOL: &'static str;

    fn entry_point(api: &RocsparseApi) -> Csr2DenseFn<Self>;
}

impl Csr2Dense for f32 {
    const SYMBOL: &'static str = ROCSPARSE_SCSR2DENSE;

    fn entry_point(api: &RocsparseApi) -> Csr2DenseFn<Self> {
        api.scsr2dense
    }
}

impl Csr2Dense for f64 {
    const SYMBOL: &'static str = ROCSPARSE_DCSR2DENSE;

    fn entry_point(api: &RocsparseApi) -> Csr2DenseFn<Self> {
        api.dcsr2dense
    }
}

impl Csr2Dense for RocsparseFloatComplex {
    const SYMBOL: &'static str = ROCSPARSE_CCSR2DENSE;

    fn entry_point(api: &RocsparseApi) -> Csr2DenseFn<Self> {
        api.ccsr2dense
    }
}

impl Csr2Dense for RocsparseDoubleComplex {
    const SYMBOL: &'static str = ROCSPARSE_ZCSR2DENSE;

    fn entry_point(api: &RocsparseApi) -> Csr2DenseFn<Self> {
        api.zcsr2dense
    }
}

/// Convert an `m` x `n` CSR matrix into column-major dense storage `a`.
///
/// Sizes are checked before the call; the status is converted afterwards.
///
/// # Safety
///
/// The pointers must be device allocations valid for rocSPARSE: `csr_row_ptr`
/// holds `m + 1` entries, `csr_val` and `csr_col_ind` hold as many entries as
/// the row pointers describe, and `a` holds `ld * n` elements.
#[allow(clippy::too_many_arguments)]
pub unsafe fn csr2dense<T: Csr2Dense>(
    handle: &SparseHandle<'_>,
    m: RocsparseInt,
    n: RocsparseInt,
    descr: &MatDescr<'_>,
    csr_val: *const T,
    csr_row_ptr: *const RocsparseInt,
    csr_col_ind: *const RocsparseInt,
    a: *mut T,
    ld: RocsparseInt,
) -> RocsparseResult<()> {
    if m < 0 || n < 0 {
        return Err(RocsparseError::InvalidArgument(format!(
            "{}: negative size {} x {}",
            T::SYMBOL,
            m,
            n
        )));
    }
    if ld < m {
        return Err(RocsparseError::DimensionMismatch {
            expected: i64::from(m),
            actual: i64::from(ld),
            context: format!("{} leading dimension", T::SYMBOL),
        });
    }

    let convert = T::entry_point(handle.api());
    let status = convert(
        handle.as_raw(),
        m,
        n,
        descr.as_raw(),
        csr_val,
        csr_row_ptr,
        csr_col_ind,
        a,
        ld,
    );
    check_status(status, T::SYMBOL)
}
