//! Environment-declared partitions
//!
//! Derives a block device's partition table from a definition stored in
//! the firmware environment instead of from an on-disk table.
//! Designed to be no_std compatible, allocation free.
//!
//! # Usage
//!
//! ```ignore
//! use envparts::{BlockDevice, DeviceClass, EnvParts};
//!
//! // envparts_mmc1=880K(bootloader),80K(dtb),64K(env),15M(initramfs),50M(kernel),-(data)
//! let parts = EnvParts::new(&env);
//! let device = BlockDevice::from_block_io(DeviceClass::Mmc, 1, &mut block_io)?;
//! for part in parts.partitions(&device) {
//!     let part = part?;
//!     // part.start, part.size are in 512-byte sectors
//! }
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::new_without_default)]

pub mod config;
pub mod disk;
pub mod driver;
pub mod env;
pub mod error;
pub mod parser;
pub mod table;

pub use config::{EnvPartsConfig, SECTOR_SIZE};
pub use disk::{BlockDevice, DeviceClass, EnvPartition, PartName, PartitionDef};
pub use driver::PartitionDriver;
pub use env::{locate, EnvKey, EnvStore};
pub use error::{EnvPartError, Result};
pub use parser::{resolve, resolve_with};
pub use table::{EnvParts, Listing, Partitions};
