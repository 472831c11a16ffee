//! Configuration for msfkit
//!
//! Writer options with sensible defaults. The reader always takes its page
//! size from the container header.

use crate::error::{MsfError, Result};
use crate::format::DEFAULT_PAGE_SIZE;

/// Smallest page size the writer accepts
pub const MIN_PAGE_SIZE: u32 = 512;

/// Largest page size the writer accepts
pub const MAX_PAGE_SIZE: u32 = 65536;

/// Main configuration for writing containers
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Layout Configuration
    // -------------------------------------------------------------------------
    /// Bytes per page in written containers.
    /// Must be a power of two in `MIN_PAGE_SIZE..=MAX_PAGE_SIZE`.
    pub page_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE, // 4 KB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the options describe a layout the writer can produce
    pub fn validate(&self) -> Result<()> {
        let size = self.page_size;
        if !size.is_power_of_two() || !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&size) {
            return Err(MsfError::Config(format!(
                "page size {} must be a power of two between {} and {}",
                size, MIN_PAGE_SIZE, MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the page size used when writing
    pub fn page_size(mut self, size: u32) -> Self {
        self.config.page_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
