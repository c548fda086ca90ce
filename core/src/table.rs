//! Partition table view over the environment
//!
//! Every query goes back to the store and re-parses the definition from the
//! start; nothing is cached between calls.

use crate::config::EnvPartsConfig;
use crate::disk::{BlockDevice, EnvPartition};
use crate::env::{locate, EnvStore};
use crate::error::{EnvPartError, Result};
use crate::parser::resolve_with;
use core::cell::Cell;
use core::fmt;
use core::iter::FusedIterator;

/// Partition table backend reading definitions from an environment store
#[derive(Debug, Clone)]
pub struct EnvParts<S> {
    store: S,
    config: EnvPartsConfig,
}

impl<S: EnvStore> EnvParts<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, EnvPartsConfig::default())
    }

    pub fn with_config(store: S, config: EnvPartsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &EnvPartsConfig {
        &self.config
    }

    /// Raw definition text for `device`
    pub fn definition(&self, device: &BlockDevice) -> Result<&str> {
        locate(&self.store, &self.config, device)
    }

    /// True if a definition is stored for `device`, whether or not it parses
    pub fn has_definition(&self, device: &BlockDevice) -> bool {
        self.definition(device).is_ok()
    }

    /// Resolve partition `part` (1-based) in sectors
    pub fn get_info(&self, device: &BlockDevice, part: u32) -> Result<EnvPartition> {
        let definition = self.definition(device)?;
        let def = resolve_with(definition, part, device.capacity_bytes(), &self.config)?;
        Ok(def.to_partition(part))
    }

    /// Iterate partitions 1, 2, 3, ... until the definition runs out
    pub fn partitions(&self, device: &BlockDevice) -> Partitions<'_, S> {
        Partitions {
            parts: self,
            device: *device,
            next: 1,
            done: false,
        }
    }

    /// Printable table of the partitions of `device`
    pub fn listing(&self, device: &BlockDevice) -> Listing<'_, S> {
        Listing {
            parts: self,
            device: *device,
            failure: Cell::new(None),
        }
    }
}

/// Iterator over the partitions of one device.
///
/// Ends with `None` once the definition has no further entry. Any other
/// failure is yielded once as `Some(Err(_))`, after which the iterator is
/// exhausted.
#[derive(Debug, Clone)]
pub struct Partitions<'t, S> {
    parts: &'t EnvParts<S>,
    device: BlockDevice,
    next: u32,
    done: bool,
}

impl<S: EnvStore> Iterator for Partitions<'_, S> {
    type Item = Result<EnvPartition>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.parts.get_info(&self.device, self.next) {
            Ok(part) => {
                self.next += 1;
                Some(Ok(part))
            }
            Err(e) if e.is_end_of_table() => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<S: EnvStore> FusedIterator for Partitions<'_, S> {}

/// Human-readable partition table, one row per partition.
///
/// Rows stop at the first entry that fails to resolve. The failure is kept
/// so callers can report it without walking the table a second time.
pub struct Listing<'t, S> {
    parts: &'t EnvParts<S>,
    device: BlockDevice,
    failure: Cell<Option<EnvPartError>>,
}

impl<S> Listing<'_, S> {
    /// Error that cut the last rendering short, if any
    pub fn failure(&self) -> Option<EnvPartError> {
        self.failure.get()
    }
}

impl<S: EnvStore> fmt::Display for Listing<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.failure.set(None);
        writeln!(f, "Part\tStart Sector\tNum Sectors\tName")?;
        for part in self.parts.partitions(&self.device) {
            let part = match part {
                Ok(part) => part,
                Err(e) => {
                    self.failure.set(Some(e));
                    break;
                }
            };
            writeln!(
                f,
                "{:3}\t{:<10}\t{:<10}\t{}",
                part.index, part.start, part.size, part.name
            )?;
        }
        Ok(())
    }
}
