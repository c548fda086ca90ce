//! Common test utilities and mock block devices

#![allow(dead_code)]

use envparts::{BlockDevice, DeviceClass};
use gpt_disk_io::BlockIo;
use gpt_disk_types::{BlockSize, Lba};
use std::io;

pub const KIB: u64 = 1 << 10;
pub const MIB: u64 = 1 << 20;
pub const GIB: u64 = 1 << 30;

/// Definition used throughout the board documentation
pub const BOARD_LAYOUT: &str =
    "880K(bootloader),80K(dtb),64K(env),15M(initramfs),50M(kernel),-(data)";

/// Block device that only knows its size; reads return zeroes
#[derive(Debug, Clone)]
pub struct MemoryBlockDevice {
    pub num_blocks: u64,
    pub block_size: u32,
}

impl MemoryBlockDevice {
    /// Device of `bytes` bytes in 512-byte blocks
    pub fn with_capacity(bytes: u64) -> Self {
        Self {
            num_blocks: bytes / 512,
            block_size: 512,
        }
    }
}

impl BlockIo for MemoryBlockDevice {
    type Error = io::Error;

    fn block_size(&self) -> BlockSize {
        BlockSize::new(self.block_size).expect("valid block size")
    }

    fn num_blocks(&mut self) -> Result<u64, Self::Error> {
        Ok(self.num_blocks)
    }

    fn read_blocks(&mut self, start_lba: Lba, dst: &mut [u8]) -> Result<(), Self::Error> {
        let blocks = (dst.len() as u64).div_ceil(self.block_size as u64);
        if start_lba.0 + blocks > self.num_blocks {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "read beyond end of device",
            ));
        }
        dst.fill(0);
        Ok(())
    }

    fn write_blocks(&mut self, _start_lba: Lba, _src: &[u8]) -> Result<(), Self::Error> {
        Err(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "memory device is read-only",
        ))
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// MMC device `devnum` of `bytes` bytes, measured through `BlockIo`
pub fn mmc(devnum: u32, bytes: u64) -> BlockDevice {
    let mut io = MemoryBlockDevice::with_capacity(bytes);
    BlockDevice::from_block_io(DeviceClass::Mmc, devnum, &mut io).expect("memory device")
}
