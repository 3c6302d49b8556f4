//! In-process stand-in for librocsparse used by the unit tests.
//!
//! The stub entry points operate on host memory, so the conversions can be
//! checked numerically.

use std::cell::Cell;
use std::ffi::{c_int, c_void};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::error::LoadError;
use super::ffi::*;
use super::handle::Csr2Dense;
use super::loader::{LoadedModule, PlatformLoader};

#[derive(Default)]
struct Counters {
    opens: AtomicUsize,
    live: AtomicUsize,
    opened: Mutex<Vec<String>>,
    lookups: Mutex<Vec<String>>,
}

/// A platform loader whose only library is a fake rocSPARSE.
#[derive(Clone)]
pub(crate) struct FakeRocsparse {
    present: bool,
    missing: Option<&'static str>,
    open_delay: Duration,
    counters: Arc<Counters>,
}

impl FakeRocsparse {
    pub fn new() -> Self {
        Self {
            present: true,
            missing: None,
            open_delay: Duration::ZERO,
            counters: Arc::default(),
        }
    }

    /// No library at all.
    pub fn absent() -> Self {
        Self {
            present: false,
            ..Self::new()
        }
    }

    /// The library exports everything except `symbol`.
    pub fn without(mut self, symbol: &'static str) -> Self {
        self.missing = Some(symbol);
        self
    }

    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = delay;
        self
    }

    pub fn opens(&self) -> usize {
        self.counters.opens.load(Ordering::SeqCst)
    }

    pub fn live_modules(&self) -> usize {
        self.counters.live.load(Ordering::SeqCst)
    }

    pub fn opened_names(&self) -> Vec<String> {
        self.counters.opened.lock().unwrap().clone()
    }

    pub fn lookups(&self) -> Vec<String> {
        self.counters.lookups.lock().unwrap().clone()
    }
}

impl PlatformLoader for FakeRocsparse {
    fn open(&self, library: &str) -> Result<Box<dyn LoadedModule>, LoadError> {
        self.counters.opens.fetch_add(1, Ordering::SeqCst);
        self.counters.opened.lock().unwrap().push(library.to_string());
        if !self.open_delay.is_zero() {
            thread::sleep(self.open_delay);
        }
        if !self.present {
            return Err(LoadError::LibraryNotFound {
                library: library.to_string(),
                reason: "no such file".to_string(),
            });
        }
        self.counters.live.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeModule {
            library: library.to_string(),
            missing: self.missing,
            counters: Arc::clone(&self.counters),
        }))
    }
}

struct FakeModule {
    library: String,
    missing: Option<&'static str>,
    counters: Arc<Counters>,
}

impl Drop for FakeModule {
    fn drop(&mut self) {
        self.counters.live.fetch_sub(1, Ordering::SeqCst);
    }
}

impl LoadedModule for FakeModule {
    fn symbol(&self, name: &str) -> Result<*const c_void, LoadError> {
        self.counters.lookups.lock().unwrap().push(name.to_string());
        if self.missing == Some(name) {
            return Err(LoadError::MissingSymbol {
                library: self.library.clone(),
                symbol: name.to_string(),
                reason: "undefined symbol".to_string(),
            });
        }
        let addr = match name {
            ROCSPARSE_CREATE_HANDLE => create_handle as CreateHandleFn as *const c_void,
            ROCSPARSE_DESTROY_HANDLE => destroy_handle as DestroyHandleFn as *const c_void,
            ROCSPARSE_CREATE_MAT_DESCR => create_mat_descr as CreateMatDescrFn as *const c_void,
            ROCSPARSE_DESTROY_MAT_DESCR => destroy_mat_descr as DestroyMatDescrFn as *const c_void,
            ROCSPARSE_GET_MAT_TYPE => get_mat_type as GetMatTypeFn as *const c_void,
            ROCSPARSE_GET_MAT_INDEX_BASE => get_mat_index_base as GetMatIndexBaseFn as *const c_void,
            ROCSPARSE_SCSR2DENSE => scsr2dense_addr(),
            ROCSPARSE_DCSR2DENSE => dcsr2dense_addr(),
            ROCSPARSE_CCSR2DENSE => ccsr2dense as Csr2DenseFn<RocsparseFloatComplex> as *const c_void,
            ROCSPARSE_ZCSR2DENSE => zcsr2dense as Csr2DenseFn<RocsparseDoubleComplex> as *const c_void,
            _ => {
                return Err(LoadError::MissingSymbol {
                    library: self.library.clone(),
                    symbol: name.to_string(),
                    reason: "not exported".to_string(),
                })
            }
        };
        Ok(addr)
    }
}

pub(crate) fn scsr2dense_addr() -> *const c_void {
    scsr2dense as Csr2DenseFn<f32> as *const c_void
}

pub(crate) fn dcsr2dense_addr() -> *const c_void {
    dcsr2dense as Csr2DenseFn<f64> as *const c_void
}

// ============================================================================
// Stub entry points
// ============================================================================

thread_local! {
    static LAST_CONVERSION: Cell<Option<&'static str>> = const { Cell::new(None) };
    static DESTROYED_HANDLES: Cell<usize> = const { Cell::new(0) };
    static DESTROYED_DESCRS: Cell<usize> = const { Cell::new(0) };
}

/// Symbol of the last conversion run on this thread.
pub(crate) fn last_conversion() -> Option<&'static str> {
    LAST_CONVERSION.with(Cell::get)
}

pub(crate) fn destroyed_handles() -> usize {
    DESTROYED_HANDLES.with(Cell::get)
}

pub(crate) fn destroyed_descrs() -> usize {
    DESTROYED_DESCRS.with(Cell::get)
}

const SUCCESS: c_int = 0;
const INVALID_HANDLE: c_int = 1;
const INVALID_POINTER: c_int = 3;
const INVALID_SIZE: c_int = 4;

// rocSPARSE defaults: general matrix, zero based.
struct FakeDescr {
    matrix_type: c_int,
    index_base: c_int,
}

static HANDLE_TOKEN: u8 = 0;

unsafe extern "C" fn create_handle(handle: *mut RocsparseHandleT) -> RocsparseStatusT {
    if handle.is_null() {
        return INVALID_POINTER;
    }
    *handle = &HANDLE_TOKEN as *const u8 as *mut c_void;
    SUCCESS
}

unsafe extern "C" fn destroy_handle(handle: RocsparseHandleT) -> RocsparseStatusT {
    if handle.is_null() {
        return INVALID_HANDLE;
    }
    DESTROYED_HANDLES.with(|c| c.set(c.get() + 1));
    SUCCESS
}

unsafe extern "C" fn create_mat_descr(descr: *mut RocsparseMatDescrT) -> RocsparseStatusT {
    if descr.is_null() {
        return INVALID_POINTER;
    }
    let raw = Box::into_raw(Box::new(FakeDescr {
        matrix_type: 0,
        index_base: 0,
    }));
    *descr = raw as *mut c_void;
    SUCCESS
}

unsafe extern "C" fn destroy_mat_descr(descr: RocsparseMatDescrT) -> RocsparseStatusT {
    if descr.is_null() {
        return INVALID_POINTER;
    }
    drop(Box::from_raw(descr as *mut FakeDescr));
    DESTROYED_DESCRS.with(|c| c.set(c.get() + 1));
    SUCCESS
}

unsafe extern "C" fn get_mat_type(descr: RocsparseMatDescrT) -> RocsparseMatrixTypeT {
    (*(descr as *const FakeDescr)).matrix_type
}

unsafe extern "C" fn get_mat_index_base(descr: RocsparseMatDescrT) -> RocsparseIndexBaseT {
    (*(descr as *const FakeDescr)).index_base
}

/// Host-memory CSR to column-major dense, with rocSPARSE's argument checks.
#[allow(clippy::too_many_arguments)]
unsafe fn host_csr2dense<T: Csr2Dense + Default>(
    handle: RocsparseHandleT,
    m: RocsparseInt,
    n: RocsparseInt,
    descr: RocsparseMatDescrT,
    csr_val: *const T,
    csr_row_ptr: *const RocsparseInt,
    csr_col_ind: *const RocsparseInt,
    a: *mut T,
    ld: RocsparseInt,
) -> RocsparseStatusT {
    if handle.is_null() {
        return INVALID_HANDLE;
    }
    if m < 0 || n < 0 || ld < m {
        return INVALID_SIZE;
    }
    if descr.is_null() || a.is_null() || csr_row_ptr.is_null() {
        return INVALID_POINTER;
    }
    LAST_CONVERSION.with(|c| c.set(Some(T::SYMBOL)));

    let (m, n, ld) = (m as usize, n as usize, ld as usize);
    let base = (*(descr as *const FakeDescr)).index_base;

    for col in 0..n {
        for row in 0..m {
            *a.add(col * ld + row) = T::default();
        }
    }
    for row in 0..m {
        let start = (*csr_row_ptr.add(row) - base) as usize;
        let end = (*csr_row_ptr.add(row + 1) - base) as usize;
        for p in start..end {
            let col = (*csr_col_ind.add(p) - base) as usize;
            *a.add(col * ld + row) = *csr_val.add(p);
        }
    }
    SUCCESS
}

macro_rules! stub_csr2dense {
    ($name:ident, $t:ty) => {
        unsafe extern "C" fn $name(
            handle: RocsparseHandleT,
            m: RocsparseInt,
            n: RocsparseInt,
            descr: RocsparseMatDescrT,
            csr_val: *const $t,
            csr_row_ptr: *const RocsparseInt,
            csr_col_ind: *const RocsparseInt,
            a: *mut $t,
            ld: RocsparseInt,
        ) -> RocsparseStatusT {
            host_csr2dense::<$t>(handle, m, n, descr, csr_val, csr_row_ptr, csr_col_ind, a, ld)
        }
    };
}

stub_csr2dense!(scsr2dense, f32);
stub_csr2dense!(dcsr2dense, f64);
stub_csr2dense!(ccsr2dense, RocsparseFloatComplex);
stub_csr2dense!(zcsr2dense, RocsparseDoubleComplex);
