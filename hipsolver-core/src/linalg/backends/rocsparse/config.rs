//! Loader configuration.

use crate::util::logging::env_flag;

/// Environment variable that turns load diagnostics on or off.
pub const VERBOSE_ENV: &str = "HIPSOLVER_VERBOSE";

/// How rocSPARSE reaches the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkMode {
    /// Opened at runtime through the platform loader.
    Dynamic,
    /// Linked into the binary; the dynamic path always reports unavailable.
    Static,
}

impl LinkMode {
    /// The mode this crate was built for.
    pub const fn from_build() -> Self {
        if cfg!(feature = "static-rocsparse") {
            LinkMode::Static
        } else {
            LinkMode::Dynamic
        }
    }
}

impl Default for LinkMode {
    fn default() -> Self {
        Self::from_build()
    }
}

/// Configuration for [`RocsparseLoader`](super::RocsparseLoader).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderConfig {
    /// Static or dynamic rocSPARSE.
    pub link_mode: LinkMode,

    /// Print a line on stderr when loading fails.
    pub verbose: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            link_mode: LinkMode::default(),
            verbose: cfg!(debug_assertions),
        }
    }
}

impl LoaderConfig {
    /// Defaults, with `HIPSOLVER_VERBOSE` overriding the diagnostic switch.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(verbose) = env_flag(VERBOSE_ENV) {
            config.verbose = verbose;
        }
        config
    }

    pub fn with_link_mode(mut self, link_mode: LinkMode) -> Self {
        self.link_mode = link_mode;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}
