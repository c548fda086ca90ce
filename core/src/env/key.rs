//! Environment key buffer

use crate::config::ENV_KEY_MAX_LEN;
use crate::disk::DeviceClass;
use crate::error::{EnvPartError, Result};
use core::fmt::{self, Write};

/// Locally owned key buffer; holds at most `ENV_KEY_MAX_LEN - 1` bytes
#[derive(Clone, Copy)]
pub struct EnvKey {
    buf: [u8; ENV_KEY_MAX_LEN],
    len: usize,
}

impl EnvKey {
    /// Longest key that fits
    pub const MAX: usize = ENV_KEY_MAX_LEN - 1;

    pub const fn new() -> Self {
        Self {
            buf: [0; ENV_KEY_MAX_LEN],
            len: 0,
        }
    }

    /// Build `<prefix><class><devnum>`, e.g. `envparts_mmc1`
    pub fn for_device(prefix: &str, class: DeviceClass, devnum: u32) -> Result<Self> {
        let mut key = Self::new();
        write!(key, "{}{}{}", prefix, class.name(), devnum)
            .map_err(|_| EnvPartError::KeyTooLong { max: Self::MAX })?;
        Ok(key)
    }

    pub fn as_str(&self) -> &str {
        // Written only through fmt::Write, whole str pieces at a time
        core::str::from_utf8(&self.buf[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for EnvKey {
    fn default() -> Self {
        Self::new()
    }
}

impl Write for EnvKey {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > Self::MAX {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl fmt::Debug for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for EnvKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
