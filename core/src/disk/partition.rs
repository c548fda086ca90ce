// Partition descriptors produced from environment definitions

use crate::config::{PART_NAME_LEN, SECTOR_SIZE};
use core::fmt;
use gpt_disk_types::{BlockSize, Lba};

/// Partition name held inline, at most `PART_NAME_LEN - 1` bytes
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct PartName {
    bytes: [u8; PART_NAME_LEN],
    len: usize,
}

impl PartName {
    pub const fn empty() -> Self {
        Self {
            bytes: [0; PART_NAME_LEN],
            len: 0,
        }
    }

    /// Copy a name in, or `None` if it does not fit with its terminator
    pub fn new(name: &str) -> Option<Self> {
        let src = name.as_bytes();
        if src.len() >= PART_NAME_LEN {
            return None;
        }
        let mut bytes = [0u8; PART_NAME_LEN];
        bytes[..src.len()].copy_from_slice(src);
        Some(Self {
            bytes,
            len: src.len(),
        })
    }

    pub fn as_str(&self) -> &str {
        // Only ever filled from a &str, so the prefix is valid UTF-8
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl Default for PartName {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for PartName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl PartialEq<&str> for PartName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// One resolved entry, in bytes
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PartitionDef {
    pub offset: u64,
    pub size: u64,
    pub name: PartName,
}

impl PartitionDef {
    pub fn end(&self) -> u64 {
        self.offset + self.size
    }

    /// Convert to sector units. Offsets and sizes are sector aligned, so the
    /// division is exact.
    pub fn to_partition(&self, index: u32) -> EnvPartition {
        EnvPartition {
            index,
            start: self.offset / SECTOR_SIZE,
            size: self.size / SECTOR_SIZE,
            name: self.name,
        }
    }
}

/// Partition information handed to the block layer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct EnvPartition {
    /// 1-based position in the definition
    pub index: u32,
    /// First sector
    pub start: u64,
    /// Number of sectors
    pub size: u64,
    pub name: PartName,
}

impl EnvPartition {
    pub fn blksz(&self) -> BlockSize {
        BlockSize::BS_512
    }

    pub fn start_lba(&self) -> Lba {
        Lba(self.start)
    }

    /// Last sector (inclusive), `None` for an empty partition
    pub fn end_lba(&self) -> Option<Lba> {
        if self.size == 0 {
            None
        } else {
            Some(Lba(self.start + self.size - 1))
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.size * SECTOR_SIZE
    }

    pub fn size_mb(&self) -> u64 {
        self.size_bytes() / (1024 * 1024)
    }
}
