//! Operating system family selection

use once_cell::sync::Lazy;
use std::fmt;
use std::str::FromStr;

/// Host family, read once per process
static HOST_PLATFORM: Lazy<Platform> = Lazy::new(|| Platform::from_os_name(std::env::consts::OS));

/// Operating system family a capture backend targets
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    MacOs,
    Windows,
    Linux,
    /// Any other family, carrying the OS name as reported by the toolchain
    Other(String),
}

impl Platform {
    /// Family of the running process
    pub fn current() -> Platform {
        HOST_PLATFORM.clone()
    }

    /// Map a `std::env::consts::OS`-style name to a family
    pub fn from_os_name(name: &str) -> Platform {
        match name.trim().to_ascii_lowercase().as_str() {
            "macos" | "darwin" | "osx" => Platform::MacOs,
            "windows" | "win32" => Platform::Windows,
            "linux" => Platform::Linux,
            other => Platform::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Platform::MacOs => "macos",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
            Platform::Other(name) => name,
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Platform::from_os_name(s))
    }
}
