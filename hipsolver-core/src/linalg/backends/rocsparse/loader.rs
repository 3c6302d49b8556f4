//! One-time loading of the rocSPARSE shared library.
//!
//! The first availability query in the process opens the library and binds
//! every entry point; the outcome is memoized in a `OnceLock` and returned to
//! all later (and concurrent) callers. A failed attempt is final: there is no
//! retry, reload or unload.

use std::ffi::c_void;
use std::sync::OnceLock;

use libloading::Library;
use tracing::{debug, info, warn};

use super::config::{LinkMode, LoaderConfig};
use super::error::LoadError;
use super::ffi::RocsparseApi;
use crate::util::logging;

/// Canonical rocSPARSE library name for this platform.
#[cfg(windows)]
pub const ROCSPARSE_LIBRARY: &str = "rocsparse.dll";

/// Canonical rocSPARSE library name for this platform.
#[cfg(not(windows))]
pub const ROCSPARSE_LIBRARY: &str = "librocsparse.so.1";

const LOG_TARGET: &str = "hipsolver::rocsparse";

// ============================================================================
// Platform loader capability
// ============================================================================

/// An opened shared module.
pub trait LoadedModule: Send + Sync {
    /// Address of the exported symbol `name`.
    fn symbol(&self, name: &str) -> Result<*const c_void, LoadError>;
}

/// Opens shared modules by name.
pub trait PlatformLoader: Send + Sync {
    fn open(&self, library: &str) -> Result<Box<dyn LoadedModule>, LoadError>;
}

/// The operating system's dynamic loader.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

struct SystemModule {
    library: String,
    lib: Library,
}

impl PlatformLoader for SystemLoader {
    fn open(&self, library: &str) -> Result<Box<dyn LoadedModule>, LoadError> {
        let lib = open_library(library).map_err(|e| LoadError::LibraryNotFound {
            library: library.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Box::new(SystemModule {
            library: library.to_string(),
            lib,
        }))
    }
}

#[cfg(unix)]
fn open_library(name: &str) -> Result<Library, libloading::Error> {
    use libloading::os::unix::{Library as UnixLibrary, RTLD_LOCAL, RTLD_NOW};

    // SAFETY: opening runs the library's initializers; rocSPARSE's are sound.
    let lib = unsafe { UnixLibrary::open(Some(name), RTLD_NOW | RTLD_LOCAL) }?;
    Ok(lib.into())
}

#[cfg(windows)]
fn open_library(name: &str) -> Result<Library, libloading::Error> {
    // Callers who want to suppress the missing-DLL message box must call
    // SetErrorMode(SEM_FAILCRITICALERRORS) themselves; it is process-global.
    // SAFETY: as above.
    unsafe { Library::new(name) }
}

impl LoadedModule for SystemModule {
    fn symbol(&self, name: &str) -> Result<*const c_void, LoadError> {
        let missing = |reason: String| LoadError::MissingSymbol {
            library: self.library.clone(),
            symbol: name.to_string(),
            reason,
        };

        // SAFETY: the address is only reinterpreted by `RocsparseApi::bind`,
        // which gives it the symbol's real type.
        let addr = unsafe { self.lib.get::<*mut c_void>(name.as_bytes()) }
            .map(|sym| *sym as *const c_void)
            .map_err(|e| missing(e.to_string()))?;

        if addr.is_null() {
            return Err(missing("symbol resolved to a null address".to_string()));
        }
        Ok(addr)
    }
}

// ============================================================================
// Lazy loader
// ============================================================================

/// Progress of the one-time load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Nobody has asked yet.
    Unattempted,
    /// The library is open and every symbol is bound.
    Loaded,
    /// The attempt failed; it will not be repeated.
    Failed,
}

/// Exactly-once loader for the rocSPARSE entry points.
///
/// Safe to share between threads. Whichever thread asks first runs the load;
/// threads arriving meanwhile block until it finishes and then see the same
/// outcome. No caller can observe a partially bound table.
pub struct RocsparseLoader {
    config: LoaderConfig,
    library: String,
    platform: Box<dyn PlatformLoader>,
    outcome: OnceLock<Result<RocsparseApi, LoadError>>,
}

impl RocsparseLoader {
    /// Loader for the platform's canonical rocSPARSE name, via the system loader.
    pub fn new(config: LoaderConfig) -> Self {
        Self::with_platform(config, ROCSPARSE_LIBRARY, SystemLoader)
    }

    /// Loader using a custom platform loader and library name.
    pub fn with_platform(
        config: LoaderConfig,
        library: impl Into<String>,
        platform: impl PlatformLoader + 'static,
    ) -> Self {
        Self {
            config,
            library: library.into(),
            platform: Box::new(platform),
            outcome: OnceLock::new(),
        }
    }

    /// Whether rocSPARSE is usable. Loads on first call.
    pub fn ensure_loaded(&self) -> bool {
        self.outcome().is_ok()
    }

    /// The bound table, or `None` when rocSPARSE is unavailable. Loads on first call.
    pub fn api(&self) -> Option<&RocsparseApi> {
        self.outcome().as_ref().ok()
    }

    /// Current state, without triggering a load.
    pub fn state(&self) -> LoadState {
        match self.outcome.get() {
            None => LoadState::Unattempted,
            Some(Ok(_)) => LoadState::Loaded,
            Some(Err(_)) => LoadState::Failed,
        }
    }

    /// Why the attempt failed, if it has run and failed.
    pub fn load_error(&self) -> Option<&LoadError> {
        self.outcome.get()?.as_ref().err()
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn library(&self) -> &str {
        &self.library
    }

    fn outcome(&self) -> &Result<RocsparseApi, LoadError> {
        self.outcome.get_or_init(|| self.load())
    }

    fn load(&self) -> Result<RocsparseApi, LoadError> {
        let result = self.try_load();
        match &result {
            Ok(_) => info!(target: LOG_TARGET, library = %self.library, "rocSPARSE loaded"),
            Err(LoadError::StaticBuild) => {
                debug!(target: LOG_TARGET, "static rocSPARSE build, skipping dynamic load")
            }
            Err(e) => {
                warn!(target: LOG_TARGET, library = %self.library, error = %e, "rocSPARSE unavailable");
                if self.config.verbose {
                    logging::diag(format_args!("{}", e));
                }
            }
        }
        result
    }

    fn try_load(&self) -> Result<RocsparseApi, LoadError> {
        if self.config.link_mode == LinkMode::Static {
            return Err(LoadError::StaticBuild);
        }

        debug!(target: LOG_TARGET, library = %self.library, "opening");
        let module = self.platform.open(&self.library)?;
        RocsparseApi::bind(module)
    }
}

impl std::fmt::Debug for RocsparseLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocsparseLoader")
            .field("library", &self.library)
            .field("config", &self.config)
            .field("state", &self.state())
            .finish()
    }
}

// ============================================================================
// Process-wide instance
// ============================================================================

static ROCSPARSE: OnceLock<RocsparseLoader> = OnceLock::new();

fn global_loader() -> &'static RocsparseLoader {
    ROCSPARSE.get_or_init(|| RocsparseLoader::new(LoaderConfig::from_env()))
}

/// Whether rocSPARSE is available to this process.
///
/// The first call opens the library and binds every entry point; later calls
/// return the memoized answer. Check this (or use [`rocsparse`]) before
/// calling into rocSPARSE.
pub fn ensure_loaded() -> bool {
    global_loader().ensure_loaded()
}

/// The process-wide rocSPARSE table, if available.
pub fn rocsparse() -> Option<&'static RocsparseApi> {
    global_loader().api()
}

/// State of the process-wide load, without triggering it.
pub fn rocsparse_state() -> LoadState {
    ROCSPARSE
        .get()
        .map_or(LoadState::Unattempted, RocsparseLoader::state)
}

/// Why the process-wide load failed, if it has.
pub fn rocsparse_load_error() -> Option<&'static LoadError> {
    ROCSPARSE.get()?.load_error()
}
