//! Environment partition configuration.
//!
//! Fixed layout constants plus the small set of runtime options a board
//! integration may override.

/// Sector size every offset and size must be aligned to.
pub const SECTOR_SIZE: u64 = 512;

/// Prefix of the environment variable holding a device's definition.
pub const ENV_KEY_PREFIX: &str = "envparts_";

/// Size of the key buffer; keys must be strictly shorter than this.
pub const ENV_KEY_MAX_LEN: usize = 32;

/// Size of the partition name buffer, terminator included.
pub const PART_NAME_LEN: usize = 32;

/// Number of entries advertised to the partition driver layer.
pub const MAX_ENTRIES: usize = 128;

/// Runtime options for locating and parsing definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvPartsConfig {
    /// Prefix of the environment key, before class name and device number.
    pub key_prefix: &'static str,
    /// Reject entries that reach past the disk instead of shrinking them.
    pub strict_bounds: bool,
}

impl Default for EnvPartsConfig {
    fn default() -> Self {
        Self {
            key_prefix: ENV_KEY_PREFIX,
            strict_bounds: false,
        }
    }
}

impl EnvPartsConfig {
    /// Create config reading keys with a different prefix.
    pub fn with_prefix(prefix: &'static str) -> Self {
        Self {
            key_prefix: prefix,
            ..Default::default()
        }
    }

    /// Fail on out-of-bounds entries rather than clamping them.
    pub fn strict(mut self) -> Self {
        self.strict_bounds = true;
        self
    }
}
