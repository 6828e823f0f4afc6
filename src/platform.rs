//! Operating system detection.
use std::fmt;

/// Detected operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux and other non-macOS Unix systems.
    Linux,
    /// macOS.
    MacOs,
    /// Windows.
    Windows,
}

impl Os {
    /// The `uname -s` style identifier used in `supported_oses` lists.
    #[must_use]
    pub const fn sysname(self) -> &'static str {
        match self {
            Self::Linux => "Linux",
            Self::MacOs => "Darwin",
            Self::Windows => "Windows",
        }
    }

    /// Whether a registry identifier names this OS.
    ///
    /// Accepts the `uname` sysname (`Linux`, `Darwin`, `Windows`) and the
    /// common lowercase aliases, case-insensitively.
    #[must_use]
    pub fn matches_identifier(self, ident: &str) -> bool {
        let ident = ident.trim().to_ascii_lowercase();
        match self {
            Self::Linux => ident == "linux",
            Self::MacOs => matches!(ident.as_str(), "darwin" | "macos" | "osx"),
            Self::Windows => ident == "windows",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sysname())
    }
}

/// Identifiers recognised in `supported_oses`.
pub const KNOWN_OS_IDENTIFIERS: &[&str] = &["linux", "darwin", "macos", "osx", "windows"];

/// Platform information for the current system.
#[derive(Debug, Clone)]
pub struct Platform {
    /// Operating system the binary is running on.
    pub os: Os,
}

impl Platform {
    /// Detect the current platform.
    #[must_use]
    pub const fn detect() -> Self {
        Self {
            os: Self::detect_os(),
        }
    }

    /// Create a platform with an explicit OS.
    #[must_use]
    pub const fn new(os: Os) -> Self {
        Self { os }
    }

    /// Whether an app restricted to `supported_oses` may run here.
    ///
    /// An empty list places no restriction.
    #[must_use]
    pub fn supports(&self, supported_oses: &[String]) -> bool {
        supported_oses.is_empty()
            || supported_oses
                .iter()
                .any(|ident| self.os.matches_identifier(ident))
    }

    const fn detect_os() -> Os {
        if cfg!(target_os = "windows") {
            Os::Windows
        } else if cfg!(target_os = "macos") {
            Os::MacOs
        } else {
            // Default to Linux for other Unix-like systems
            Os::Linux
        }
    }
}
