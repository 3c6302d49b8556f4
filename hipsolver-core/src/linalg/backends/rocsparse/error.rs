//! Error types for the rocSPARSE backend.

use std::ffi::c_int;
use std::fmt;

use thiserror::Error;

/// Result type for calls made through the bound rocSPARSE table.
pub type RocsparseResult<T> = Result<T, RocsparseError>;

/// Why the one-time load of rocSPARSE did not produce a usable table.
///
/// The availability query folds all of these into `false`; the variant is
/// kept only so the failure can be logged and inspected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    /// rocSPARSE is linked statically, so the dynamic path is never taken.
    #[error("rocSPARSE is statically linked; dynamic loading is disabled")]
    StaticBuild,

    /// The shared library could not be opened.
    #[error("error loading {library}: {reason}")]
    LibraryNotFound { library: String, reason: String },

    /// The library opened but one of the required entry points is absent.
    #[error("error loading {library}: missing symbol {symbol}: {reason}")]
    MissingSymbol {
        library: String,
        symbol: String,
        reason: String,
    },
}

/// Errors from using rocSPARSE after it has been loaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RocsparseError {
    /// rocSPARSE could not be loaded in this process.
    #[error("rocSPARSE is not available")]
    Unavailable,

    /// A rocSPARSE call returned a non-success status.
    #[error("{context} failed with {code}")]
    Status {
        code: RocsparseStatus,
        context: String,
    },

    /// A getter returned a value outside the documented enumeration.
    #[error("unexpected {what} value {value}")]
    InvalidEnum { what: &'static str, value: c_int },

    /// Sizes handed to a conversion routine are inconsistent.
    #[error("dimension mismatch in {context}: expected at least {expected}, got {actual}")]
    DimensionMismatch {
        expected: i64,
        actual: i64,
        context: String,
    },

    /// An argument was rejected before reaching rocSPARSE.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// `rocsparse_status` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RocsparseStatus {
    Success,
    InvalidHandle,
    NotImplemented,
    InvalidPointer,
    InvalidSize,
    MemoryError,
    InternalError,
    InvalidValue,
    ArchMismatch,
    ZeroPivot,
    NotInitialized,
    TypeMismatch,
    RequiresSortedStorage,
    ThrownException,
    Continue,
    Unknown(c_int),
}

impl RocsparseStatus {
    pub fn from_raw(code: c_int) -> Self {
        match code {
            0 => Self::Success,
            1 => Self::InvalidHandle,
            2 => Self::NotImplemented,
            3 => Self::InvalidPointer,
            4 => Self::InvalidSize,
            5 => Self::MemoryError,
            6 => Self::InternalError,
            7 => Self::InvalidValue,
            8 => Self::ArchMismatch,
            9 => Self::ZeroPivot,
            10 => Self::NotInitialized,
            11 => Self::TypeMismatch,
            12 => Self::RequiresSortedStorage,
            13 => Self::ThrownException,
            14 => Self::Continue,
            other => Self::Unknown(other),
        }
    }

    pub fn as_raw(self) -> c_int {
        match self {
            Self::Success => 0,
            Self::InvalidHandle => 1,
            Self::NotImplemented => 2,
            Self::InvalidPointer => 3,
            Self::InvalidSize => 4,
            Self::MemoryError => 5,
            Self::InternalError => 6,
            Self::InvalidValue => 7,
            Self::ArchMismatch => 8,
            Self::ZeroPivot => 9,
            Self::NotInitialized => 10,
            Self::TypeMismatch => 11,
            Self::RequiresSortedStorage => 12,
            Self::ThrownException => 13,
            Self::Continue => 14,
            Self::Unknown(code) => code,
        }
    }

    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl fmt::Display for RocsparseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "rocsparse_status_success",
            Self::InvalidHandle => "rocsparse_status_invalid_handle",
            Self::NotImplemented => "rocsparse_status_not_implemented",
            Self::InvalidPointer => "rocsparse_status_invalid_pointer",
            Self::InvalidSize => "rocsparse_status_invalid_size",
            Self::MemoryError => "rocsparse_status_memory_error",
            Self::InternalError => "rocsparse_status_internal_error",
            Self::InvalidValue => "rocsparse_status_invalid_value",
            Self::ArchMismatch => "rocsparse_status_arch_mismatch",
            Self::ZeroPivot => "rocsparse_status_zero_pivot",
            Self::NotInitialized => "rocsparse_status_not_initialized",
            Self::TypeMismatch => "rocsparse_status_type_mismatch",
            Self::RequiresSortedStorage => "rocsparse_status_requires_sorted_storage",
            Self::ThrownException => "rocsparse_status_thrown_exception",
            Self::Continue => "rocsparse_status_continue",
            Self::Unknown(code) => return write!(f, "unknown rocsparse_status {}", code),
        };
        f.write_str(name)
    }
}

/// Check a rocSPARSE status code and convert to `RocsparseResult`.
pub fn check_status(code: c_int, context: &str) -> RocsparseResult<()> {
    let status = RocsparseStatus::from_raw(code);
    if status.is_success() {
        Ok(())
    } else {
        Err(RocsparseError::Status {
            code: status,
            context: context.to_string(),
        })
    }
}
