//! Partition table backend interface
//!
//! The block layer picks one backend per device by probing each registered
//! driver in turn. `EnvParts` is the driver for environment definitions.

use crate::config;
use crate::disk::{BlockDevice, EnvPartition};
use crate::env::EnvStore;
use crate::error::Result;
use crate::table::EnvParts;
use core::fmt;

/// A selectable partition table type
pub trait PartitionDriver {
    /// Short name shown by the block layer
    const NAME: &'static str;
    /// Highest partition number the backend may report
    const MAX_ENTRIES: usize;

    /// Whether this backend describes `device`
    fn test(&self, device: &BlockDevice) -> bool;

    /// Partition `part` (1-based) of `device`
    fn get_info(&self, device: &BlockDevice, part: u32) -> Result<EnvPartition>;

    /// Write the partition table of `device` to `out`
    fn print(&self, device: &BlockDevice, out: &mut dyn fmt::Write) -> fmt::Result;
}

impl<S: EnvStore> PartitionDriver for EnvParts<S> {
    const NAME: &'static str = "ENV";
    const MAX_ENTRIES: usize = config::MAX_ENTRIES;

    fn test(&self, device: &BlockDevice) -> bool {
        self.has_definition(device)
    }

    fn get_info(&self, device: &BlockDevice, part: u32) -> Result<EnvPartition> {
        EnvParts::get_info(self, device, part)
    }

    fn print(&self, device: &BlockDevice, out: &mut dyn fmt::Write) -> fmt::Result {
        write!(out, "{}", self.listing(device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::disk::DeviceClass;

    fn probe<D: PartitionDriver>(driver: &D, device: &BlockDevice) -> Option<&'static str> {
        driver.test(device).then_some(D::NAME)
    }

    #[test]
    fn test_env_driver() {
        let parts = EnvParts::new([("envparts_mmc0", "-(all)")]);
        let dev = BlockDevice::new(DeviceClass::Mmc, 0, 2048);

        assert_eq!(probe(&parts, &dev), Some("ENV"));
        assert_eq!(<EnvParts<[(&str, &str); 1]> as PartitionDriver>::MAX_ENTRIES, 128);

        let part = PartitionDriver::get_info(&parts, &dev, 1).unwrap();
        assert_eq!(part.size, 2048);

        let mut out = String::new();
        parts.print(&dev, &mut out).unwrap();
        assert!(out.ends_with("\tall\n"));
    }

    #[test]
    fn test_probe_other_devices() {
        let parts = EnvParts::new([("envparts_mmc0", "-(all)")]);
        assert_eq!(probe(&parts, &BlockDevice::new(DeviceClass::Usb, 0, 2048)), None);
        assert_eq!(probe(&parts, &BlockDevice::new(DeviceClass::Mmc, 1, 2048)), None);
    }
}
