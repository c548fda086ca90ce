//! Error types for environment partition lookups
//!
//! Every variant is terminal for the call that produced it. Parser errors
//! carry the 1-based number of the entry being finalized.

use thiserror::Error;

/// Result type for environment partition operations
pub type Result<T> = core::result::Result<T, EnvPartError>;

/// Errors that can occur while locating or parsing a partition definition
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EnvPartError {
    /// Device class is not eligible for environment definitions
    #[error("device class '{0}' does not take environment partitions")]
    Unsupported(&'static str),

    /// Device is a non-primary hardware partition (eMMC boot area)
    #[error("refusing to read partitions for hardware partition {0}")]
    Refused(u32),

    /// Lookup key does not fit the key buffer
    #[error("environment key exceeds {max} characters")]
    KeyTooLong {
        /// Longest accepted key, in bytes
        max: usize,
    },

    /// No definition stored for the device
    #[error("no partition definition in environment")]
    NotFound,

    /// Entry does not start with digits or `-`
    #[error("partition {entry} does not have a valid size definition")]
    InvalidSize {
        /// Entry number
        entry: u32,
    },

    /// Character after the size digits is not a unit suffix
    #[error("partition {entry} has unrecognized suffix '{suffix}' in size")]
    InvalidSizeSuffix {
        /// Entry number
        entry: u32,
        /// Offending character
        suffix: char,
    },

    /// `@` is not followed by digits
    #[error("partition {entry} does not have a valid offset definition")]
    InvalidOffset {
        /// Entry number
        entry: u32,
    },

    /// Character after the offset digits is not a unit suffix
    #[error("partition {entry} has unrecognized suffix '{suffix}' in offset")]
    InvalidOffsetSuffix {
        /// Entry number
        entry: u32,
        /// Offending character
        suffix: char,
    },

    /// More than one `@` in a single entry
    #[error("multiple occurrences of '@' in partition {entry}")]
    DuplicateOffset {
        /// Entry number
        entry: u32,
    },

    /// Resolved size is not a whole number of sectors
    #[error("partition {entry}'s size {size} is not a multiple of the sector size")]
    MisalignedSize {
        /// Entry number
        entry: u32,
        /// Size in bytes after clamping
        size: u64,
    },

    /// Resolved offset is not a whole number of sectors
    #[error("partition {entry}'s offset {offset} is not a multiple of the sector size")]
    MisalignedOffset {
        /// Entry number
        entry: u32,
        /// Offset in bytes after clamping
        offset: u64,
    },

    /// `(` without `)` or the reverse
    #[error("partition {entry} has an unpaired bracket")]
    UnpairedBracket {
        /// Entry number
        entry: u32,
    },

    /// Second `(` or `)` inside one entry
    #[error("multiple occurrences of '{bracket}' in partition {entry}")]
    DuplicateBracket {
        /// Entry number
        entry: u32,
        /// The repeated bracket
        bracket: char,
    },

    /// Name does not fit the name buffer
    #[error("partition {entry}'s name is too long")]
    NameTooLong {
        /// Entry number
        entry: u32,
    },

    /// Entry reaches past the end of the disk (strict mode only)
    #[error("partition {entry} exceeds the disk's end")]
    ExceedsDisk {
        /// Entry number
        entry: u32,
    },

    /// Definition has fewer entries than the requested index
    #[error("partition {0} does not exist")]
    IndexNotFound(u32),
}

impl EnvPartError {
    /// True when the error only means the table has no more entries.
    pub fn is_end_of_table(&self) -> bool {
        matches!(self, Self::IndexNotFound(_))
    }

    /// True for errors raised by the locator before any parsing
    pub fn is_lookup_error(&self) -> bool {
        matches!(
            self,
            Self::Unsupported(_) | Self::Refused(_) | Self::KeyTooLong { .. } | Self::NotFound
        )
    }
}
