//! Definition parser
//!
//! A definition is a comma separated list of entries in the style of the
//! Linux `blkdevparts=` option, without the device name:
//!
//! ```text
//! 880K(bootloader),80K(dtb),64K(env),15M(initramfs),50M(kernel),-(data)
//! ```
//!
//! Each entry is `size[@offset][(name)]`, name and offset in either order.
//! `-` as size takes everything left after the previous entry, and an entry
//! without `@offset` starts where the previous one ended.
//!
//! Resolution walks the entries left to right and stops at the requested
//! one. Entries before it are fully validated, entries after it are never
//! looked at.

mod number;
mod scanner;

pub use number::{parse_quantity, to_bytes, QuantityError, Unit};
pub use scanner::EntryFields;

use crate::config::{EnvPartsConfig, SECTOR_SIZE};
use crate::disk::PartitionDef;
use crate::error::{EnvPartError, Result};

/// Characters allowed right after size digits in place of a suffix
const SIZE_TERMINATORS: &[char] = &['@', '('];

/// Characters allowed right after offset digits in place of a suffix
const OFFSET_TERMINATORS: &[char] = &['('];

/// Resolve entry `target` (1-based) of `definition` on a disk of
/// `capacity` bytes, with default options.
pub fn resolve(definition: &str, target: u32, capacity: u64) -> Result<PartitionDef> {
    resolve_with(definition, target, capacity, &EnvPartsConfig::default())
}

/// Resolve entry `target` (1-based) of `definition`.
pub fn resolve_with(
    definition: &str,
    target: u32,
    capacity: u64,
    config: &EnvPartsConfig,
) -> Result<PartitionDef> {
    let mut layout = Layout::new(definition, capacity, config.strict_bounds);

    if target != 0 && !definition.is_empty() {
        for (number, text) in (1u32..).zip(definition.split(',')) {
            let fields = EntryFields::scan(text, number).map_err(|e| report(e, definition))?;
            let (offset, size) = layout.place(&fields).map_err(|e| report(e, definition))?;

            if number == target {
                let name = fields.name().map_err(|e| report(e, definition))?;
                return Ok(PartitionDef { offset, size, name });
            }
            fields
                .check_brackets()
                .map_err(|e| report(e, definition))?;
        }
    }

    tracing::debug!(
        "Partition number '{}' does not exist in env '{}'",
        target,
        definition
    );
    Err(EnvPartError::IndexNotFound(target))
}

fn report(err: EnvPartError, definition: &str) -> EnvPartError {
    tracing::error!("{} in env '{}'", err, definition);
    err
}

/// Running placement state. Only the end of the previous entry carries over
/// from one entry to the next.
struct Layout<'a> {
    definition: &'a str,
    capacity: u64,
    strict: bool,
    end_last: u64,
}

impl<'a> Layout<'a> {
    fn new(definition: &'a str, capacity: u64, strict: bool) -> Self {
        Self {
            definition,
            capacity,
            strict,
            end_last: 0,
        }
    }

    /// Resolve size and offset of `fields`, clamp to the disk and advance
    /// `end_last`. Returns `(offset, size)` in bytes.
    fn place(&mut self, fields: &EntryFields<'_>) -> Result<(u64, u64)> {
        let entry = fields.number;
        let mut size = self.size(fields)?;
        let mut offset = match fields.offset {
            Some(field) => parse_quantity(field, OFFSET_TERMINATORS).map_err(|e| match e {
                QuantityError::NoDigits => EnvPartError::InvalidOffset { entry },
                QuantityError::Suffix(suffix) => EnvPartError::InvalidOffsetSuffix { entry, suffix },
            })?,
            None => self.end_last,
        };

        if offset > self.capacity {
            if self.strict {
                return Err(EnvPartError::ExceedsDisk { entry });
            }
            tracing::warn!(
                "Partition {}'s offset {} exceeds disk's end in env '{}', shrink to {}",
                entry,
                offset,
                self.definition,
                self.capacity
            );
            offset = self.capacity;
        }

        if size > self.capacity - offset {
            if self.strict {
                return Err(EnvPartError::ExceedsDisk { entry });
            }
            tracing::warn!(
                "Partition {}'s end exceeds disk's end in env '{}', shrink size from {} to {}",
                entry,
                self.definition,
                size,
                self.capacity - offset
            );
            size = self.capacity - offset;
            self.end_last = self.capacity;
        } else {
            self.end_last = offset + size;
        }

        if size % SECTOR_SIZE != 0 {
            return Err(EnvPartError::MisalignedSize { entry, size });
        }
        if offset % SECTOR_SIZE != 0 {
            return Err(EnvPartError::MisalignedOffset { entry, offset });
        }

        Ok((offset, size))
    }

    fn size(&self, fields: &EntryFields<'_>) -> Result<u64> {
        let entry = fields.number;
        if let Some(rest) = fields.text.strip_prefix('-') {
            return match rest.chars().next() {
                Some(suffix) if !SIZE_TERMINATORS.contains(&suffix) => {
                    Err(EnvPartError::InvalidSizeSuffix { entry, suffix })
                }
                _ => Ok(self.capacity - self.end_last),
            };
        }

        parse_quantity(fields.text, SIZE_TERMINATORS).map_err(|e| match e {
            QuantityError::NoDigits => EnvPartError::InvalidSize { entry },
            QuantityError::Suffix(suffix) => EnvPartError::InvalidSizeSuffix { entry, suffix },
        })
    }
}
