// Block device identity and geometry

use crate::config::SECTOR_SIZE;
use core::fmt;
use gpt_disk_io::BlockIo;
use gpt_disk_types::BlockSize;

/// Block device classes known to the firmware block layer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Ide,
    Scsi,
    Usb,
    Mmc,
    Sata,
    Host,
    Nvme,
    Efi,
    Virtio,
    Pvblock,
    Blkmap,
}

impl DeviceClass {
    const ALL: [DeviceClass; 11] = [
        DeviceClass::Ide,
        DeviceClass::Scsi,
        DeviceClass::Usb,
        DeviceClass::Mmc,
        DeviceClass::Sata,
        DeviceClass::Host,
        DeviceClass::Nvme,
        DeviceClass::Efi,
        DeviceClass::Virtio,
        DeviceClass::Pvblock,
        DeviceClass::Blkmap,
    ];

    /// Class name as used in environment keys and device paths
    pub fn name(&self) -> &'static str {
        match self {
            DeviceClass::Ide => "ide",
            DeviceClass::Scsi => "scsi",
            DeviceClass::Usb => "usb",
            DeviceClass::Mmc => "mmc",
            DeviceClass::Sata => "sata",
            DeviceClass::Host => "host",
            DeviceClass::Nvme => "nvme",
            DeviceClass::Efi => "efi",
            DeviceClass::Virtio => "virtio",
            DeviceClass::Pvblock => "pvblock",
            DeviceClass::Blkmap => "blkmap",
        }
    }

    /// Look up a class by its name, ignoring ASCII case
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|class| class.name().eq_ignore_ascii_case(name))
    }

    /// Only SD/MMC storage carries environment definitions for now.
    pub fn takes_env_parts(&self) -> bool {
        matches!(self, DeviceClass::Mmc)
    }
}

impl fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Represents a block device as seen by the partition layer
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockDevice {
    pub class: DeviceClass,
    pub devnum: u32,
    /// Hardware partition; 0 is the user area, eMMC boot areas are 1 and 2
    pub hwpart: u32,
    pub num_blocks: u64,
    pub block_size: BlockSize,
}

impl BlockDevice {
    pub fn new(class: DeviceClass, devnum: u32, num_blocks: u64) -> Self {
        Self {
            class,
            devnum,
            hwpart: 0,
            num_blocks,
            block_size: BlockSize::BS_512,
        }
    }

    /// Measure geometry from a block I/O handle
    pub fn from_block_io<B: BlockIo>(
        class: DeviceClass,
        devnum: u32,
        block_io: &mut B,
    ) -> Result<Self, B::Error> {
        let num_blocks = block_io.num_blocks()?;
        Ok(Self {
            class,
            devnum,
            hwpart: 0,
            num_blocks,
            block_size: block_io.block_size(),
        })
    }

    pub fn with_hwpart(mut self, hwpart: u32) -> Self {
        self.hwpart = hwpart;
        self
    }

    pub fn with_block_size(mut self, block_size: BlockSize) -> Self {
        self.block_size = block_size;
        self
    }

    pub fn is_primary(&self) -> bool {
        self.hwpart == 0
    }

    /// Total size in bytes, saturating at the last whole sector below `u64::MAX`
    pub fn capacity_bytes(&self) -> u64 {
        self.num_blocks
            .checked_mul(self.block_size.to_u64())
            .unwrap_or(u64::MAX - u64::MAX % SECTOR_SIZE)
    }
}

impl fmt::Display for BlockDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.devnum)?;
        if self.hwpart != 0 {
            write!(f, " (hwpart {})", self.hwpart)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_names_round_trip() {
        for class in DeviceClass::ALL {
            assert_eq!(DeviceClass::from_name(class.name()), Some(class));
        }
        assert_eq!(DeviceClass::from_name("MMC"), Some(DeviceClass::Mmc));
        assert_eq!(DeviceClass::from_name("floppy"), None);
    }

    #[test]
    fn test_only_mmc_takes_env_parts() {
        let eligible: usize = DeviceClass::ALL
            .iter()
            .filter(|class| class.takes_env_parts())
            .count();
        assert_eq!(eligible, 1);
        assert!(DeviceClass::Mmc.takes_env_parts());
    }

    #[test]
    fn test_capacity() {
        let dev = BlockDevice::new(DeviceClass::Mmc, 1, 2048);
        assert_eq!(dev.capacity_bytes(), 1024 * 1024);

        let dev = BlockDevice::new(DeviceClass::Mmc, 1, u64::MAX)
            .with_block_size(BlockSize::BS_4096);
        assert_eq!(dev.capacity_bytes(), u64::MAX - 511);
        assert_eq!(dev.capacity_bytes() % SECTOR_SIZE, 0);
    }

    #[test]
    fn test_saturated_capacity_takes_rest() {
        let dev = BlockDevice::new(DeviceClass::Mmc, 0, u64::MAX)
            .with_block_size(BlockSize::BS_4096);
        let rest = crate::parser::resolve("1M,-", 2, dev.capacity_bytes()).unwrap();
        assert_eq!(rest.offset, 1024 * 1024);
        assert_eq!(rest.end(), dev.capacity_bytes());
        assert_eq!(rest.size % SECTOR_SIZE, 0);
    }

    #[test]
    fn test_display() {
        let dev = BlockDevice::new(DeviceClass::Mmc, 2, 0);
        assert_eq!(format!("{}", dev), "mmc2");
        assert_eq!(format!("{}", dev.with_hwpart(1)), "mmc2 (hwpart 1)");
    }
}
